use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use log::warn;

use num_traits::Zero;

use chrono::NaiveDate;

use super::feed::{CaseRecord, Counts, Metric};
use super::fips::{Fips, MaybeFips};


pub trait TimeSeriesKey: Hash + Ord + Clone + std::fmt::Debug {}
impl<T: Hash + Ord + Clone + std::fmt::Debug> TimeSeriesKey for T {}


/// Indices of a record slice, grouped by key and ordered by date within each
/// group. Groups are ordered by key. Records sharing key and date keep their
/// input order.
#[derive(Debug, Clone)]
pub struct SortedGroups<K: TimeSeriesKey> {
	groups: BTreeMap<K, Vec<usize>>,
}

impl<K: TimeSeriesKey> SortedGroups<K> {
	pub fn build<T, FK: Fn(&T) -> K, FD: Fn(&T) -> NaiveDate>(records: &[T], key: FK, date: FD) -> Self {
		let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
		for (i, rec) in records.iter().enumerate() {
			groups.entry(key(rec)).or_default().push(i);
		}
		for indices in groups.values_mut() {
			// sort_by_key is stable
			indices.sort_by_key(|i| date(&records[*i]));
		}
		Self{groups}
	}

	/// All indices, group by group.
	pub fn order(&self) -> Vec<usize> {
		self.groups.values().flat_map(|v| v.iter().copied()).collect()
	}

	/// For every record, the value of the record preceding it within its
	/// group, or `fill` for the first record of a group. The result is
	/// aligned with the record slice the groups were built from.
	pub fn previous_values<T, V: Copy, FV: Fn(&T) -> V>(&self, records: &[T], value: FV, fill: V) -> Vec<V> {
		let mut result = vec![fill; records.len()];
		for indices in self.groups.values() {
			let mut prev = fill;
			for i in indices.iter() {
				result[*i] = prev;
				prev = value(&records[*i]);
			}
		}
		result
	}
}


/// Convenience wrapper: group, sort and shift in one go, filling with zero.
pub fn previous_values<T, K: TimeSeriesKey, V: Copy + Zero, FK: Fn(&T) -> K, FD: Fn(&T) -> NaiveDate, FV: Fn(&T) -> V>(
	records: &[T],
	key: FK,
	date: FD,
	value: FV,
) -> Vec<V> {
	SortedGroups::build(records, key, date).previous_values(records, value, V::zero())
}


/// A case record with the daily change of its counters attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCaseRecord {
	pub record: CaseRecord,
	pub daily: Counts<i64>,
}

impl DailyCaseRecord {
	pub fn daily_cases(&self) -> i64 {
		self.daily[Metric::Cases]
	}

	pub fn daily_deaths(&self) -> i64 {
		self.daily[Metric::Deaths]
	}
}


fn signed(v: u64) -> i64 {
	if v > i64::MAX as u64 {
		i64::MAX
	} else {
		v as i64
	}
}


/// Keep only the last row in input order for every (FIPS, date) pair.
/// Rows without FIPS are kept as they are. Returns the surviving rows in
/// input order and the number of rows dropped.
pub fn collapse_same_day(records: Vec<CaseRecord>) -> (Vec<CaseRecord>, usize) {
	let mut last: HashMap<(Fips, NaiveDate), usize> = HashMap::with_capacity(records.len());
	for (i, rec) in records.iter().enumerate() {
		if let Some(fips) = *rec.fips {
			last.insert((fips, rec.date), i);
		}
	}
	let n = records.len();
	let result: Vec<_> = records.into_iter().enumerate()
		.filter(|(i, rec)| match *rec.fips {
			Some(fips) => last.get(&(fips, rec.date)) == Some(i),
			None => true,
		})
		.map(|(_, rec)| rec)
		.collect();
	let dropped = n - result.len();
	(result, dropped)
}


/// Difference cumulative counters per FIPS into daily changes.
///
/// Several rows for one FIPS on one date are collapsed first, the last one
/// in input order wins. The first date of each FIPS is differenced against zero. Gaps in the
/// dates are not filled: the previous value is the last date present.
/// Downward revisions upstream show up as negative daily values and are
/// passed through.
///
/// The output is ordered by FIPS, then date; rows without FIPS come first.
pub fn daily_deltas(records: Vec<CaseRecord>) -> Vec<DailyCaseRecord> {
	let (records, dropped) = collapse_same_day(records);
	if dropped > 0 {
		warn!("collapsed {} rows sharing fips and date with a later row", dropped);
	}
	let groups = SortedGroups::<MaybeFips>::build(&records, |r| r.fips, |r| r.date);
	let mut previous: Counts<Vec<u64>> = Counts::default();
	for metric in Metric::ALL.iter() {
		previous[*metric] = groups.previous_values(&records, |r| r.cumulative[*metric], 0u64);
	}

	let mut slots: Vec<Option<CaseRecord>> = records.into_iter().map(Some).collect();
	let mut result = Vec::with_capacity(slots.len());
	for i in groups.order() {
		let record = match slots[i].take() {
			Some(record) => record,
			None => continue,
		};
		let mut daily = Counts::default();
		for metric in Metric::ALL.iter() {
			daily[*metric] = signed(record.cumulative[*metric]) - signed(previous[*metric][i]);
		}
		result.push(DailyCaseRecord{record, daily});
	}
	result
}
