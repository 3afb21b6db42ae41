use log::{debug, warn};

use super::census::StateFipsMap;
use super::feed::CaseRecord;


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
	pub resolved: usize,
	pub unresolved: usize,
}


/// Assign the state-level FIPS to every `Unknown` county row. Rows of states
/// without a state-level code end up without FIPS and are dropped by the
/// census join.
pub fn resolve_unknown_counties(records: &mut [CaseRecord], states: &StateFipsMap) -> ResolveStats {
	let mut stats = ResolveStats::default();
	for rec in records.iter_mut() {
		if !rec.is_unknown_county() {
			continue
		}
		match states.get(rec.state.as_str()) {
			Some(fips) => {
				*rec.fips = Some(*fips);
				stats.resolved += 1;
			},
			None => {
				debug!("no state-level fips for {:?}, {} left unresolved", rec.state, rec.date);
				*rec.fips = None;
				stats.unresolved += 1;
			},
		}
	}
	if stats.unresolved > 0 {
		warn!("{} unknown-county rows have no state-level fips", stats.unresolved);
	}
	stats
}


#[cfg(test)]
mod tests {
	use super::*;

	use chrono::NaiveDate;

	use crate::fips::{Fips, MaybeFips};

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(2020, 4, d).unwrap()
	}

	fn states() -> StateFipsMap {
		let mut result = StateFipsMap::new();
		result.insert("Rhode Island".into(), "44000".parse().unwrap());
		result
	}

	#[test]
	fn unknown_rows_get_state_level_fips() {
		let mut records = vec![
			CaseRecord::new(day(1), "Unknown", "Rhode Island", MaybeFips(None), 10, 0),
			CaseRecord::new(day(1), "Unknown", "Puerto Rico", MaybeFips(None), 3, 0),
			CaseRecord::new(day(1), "Providence", "Rhode Island", "44007".parse().unwrap(), 5, 1),
			CaseRecord::new(day(1), "Joplin", "Missouri", MaybeFips(None), 5, 1),
		];
		let stats = resolve_unknown_counties(&mut records, &states());
		assert_eq!(stats, ResolveStats{resolved: 1, unresolved: 1});

		let expected: Fips = "44000".parse().unwrap();
		assert_eq!(*records[0].fips, Some(expected));
		assert_eq!(*records[1].fips, None);
		assert_eq!(*records[2].fips, Some("44007".parse().unwrap()));
		assert_eq!(*records[3].fips, None);
	}
}
