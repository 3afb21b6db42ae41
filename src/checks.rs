use std::collections::HashSet;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::fips::Fips;
use super::output::MergedRecord;


pub const DEFAULT_MAX_AGE_DAYS: i64 = 2;


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
	Empty,
	Duplicates(Vec<(NaiveDate, Fips)>),
	Stale{latest: NaiveDate, oldest_allowed: NaiveDateTime},
}

impl fmt::Display for CheckFailure {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("no rows"),
			Self::Duplicates(keys) => {
				write!(f, "{} duplicate (Date, FIPS) pairs", keys.len())?;
				if let Some((date, fips)) = keys.first() {
					write!(f, ", first: ({}, {})", date, fips)?;
				}
				Ok(())
			},
			Self::Stale{latest, oldest_allowed} => write!(f, "latest date {} is older than {}", latest, oldest_allowed),
		}
	}
}

impl std::error::Error for CheckFailure {}


/// All (date, FIPS) pairs which occur more than once, in order of their
/// second occurrence.
pub fn find_duplicate_keys(records: &[MergedRecord]) -> Vec<(NaiveDate, Fips)> {
	let mut seen = HashSet::with_capacity(records.len());
	let mut result = Vec::new();
	for rec in records {
		let k = (rec.date, rec.fips);
		if !seen.insert(k) {
			result.push(k);
		}
	}
	result
}

pub fn check_unique(records: &[MergedRecord]) -> Result<(), CheckFailure> {
	let dups = find_duplicate_keys(records);
	if dups.is_empty() {
		Ok(())
	} else {
		Err(CheckFailure::Duplicates(dups))
	}
}

pub fn latest_date(records: &[MergedRecord]) -> Option<NaiveDate> {
	records.iter().map(|r| r.date).max()
}

/// The newest date in the table, taken as midnight, must be at most
/// `max_age_days` whole days before `now`. The time of day of `now` counts,
/// so a date exactly two days old passes only until that time of day.
pub fn check_fresh(records: &[MergedRecord], now: NaiveDateTime, max_age_days: i64) -> Result<(), CheckFailure> {
	let latest = latest_date(records).ok_or(CheckFailure::Empty)?;
	let oldest_allowed = now - Duration::days(max_age_days);
	if latest.and_time(NaiveTime::MIN) >= oldest_allowed {
		Ok(())
	} else {
		Err(CheckFailure::Stale{latest, oldest_allowed})
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(2020, 4, d).unwrap()
	}

	fn row(d: u32, fips: &str) -> MergedRecord {
		MergedRecord{
			date: day(d),
			county: "County".into(),
			state: "State".into(),
			cumulative_cases: 0,
			cumulative_deaths: 0,
			daily_cases: 0,
			daily_deaths: 0,
			census_2010: 0,
			estimate_2019: 0,
			fips: fips.parse().unwrap(),
		}
	}

	#[test]
	fn unique_table_passes() {
		let rows = vec![row(1, "01001"), row(2, "01001"), row(1, "01003")];
		assert_eq!(check_unique(&rows), Ok(()));
	}

	#[test]
	fn duplicates_are_reported() {
		let rows = vec![row(1, "01001"), row(2, "01001"), row(1, "01001")];
		assert_eq!(
			check_unique(&rows),
			Err(CheckFailure::Duplicates(vec![(day(1), "01001".parse().unwrap())])),
		);
	}

	fn at(d: u32, h: u32) -> NaiveDateTime {
		day(d).and_hms_opt(h, 0, 0).unwrap()
	}

	#[test]
	fn freshness_window() {
		let rows = vec![row(1, "01001"), row(8, "01001")];
		assert!(check_fresh(&rows, at(9, 12), DEFAULT_MAX_AGE_DAYS).is_ok());
		assert!(check_fresh(&rows, at(10, 0), DEFAULT_MAX_AGE_DAYS).is_ok());
		assert_eq!(
			check_fresh(&rows, at(11, 0), DEFAULT_MAX_AGE_DAYS),
			Err(CheckFailure::Stale{latest: day(8), oldest_allowed: at(9, 0)}),
		);
		assert_eq!(check_fresh(&[], at(1, 0), DEFAULT_MAX_AGE_DAYS), Err(CheckFailure::Empty));
	}

	#[test]
	fn freshness_counts_time_of_day() {
		let rows = vec![row(8, "01001")];
		// 48 hours after midnight of the latest date is the last passing moment
		assert!(check_fresh(&rows, at(10, 0), DEFAULT_MAX_AGE_DAYS).is_ok());
		assert_eq!(
			check_fresh(&rows, at(10, 1), DEFAULT_MAX_AGE_DAYS),
			Err(CheckFailure::Stale{latest: day(8), oldest_allowed: at(8, 1)}),
		);
	}
}
