use std::collections::HashSet;

use log::{debug, info};

use smartstring::alias::{String as SmartString};

use super::census::{CensusMap, StateFipsMap};
use super::feed::{CaseRecord, Metric};
use super::output::MergedRecord;
use super::reallocate::{reallocate_cities, split_metropolises};
use super::resolve::resolve_unknown_counties;
use super::shares::ShareTable;
use super::timeseries::{daily_deltas, DailyCaseRecord};


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
	pub joined: usize,
	pub without_fips: usize,
	pub not_in_census: usize,
}


/// Run the case feed through unknown-county resolution, city reallocation,
/// metropolis splitting and differencing.
pub fn transform_cases(
		mut records: Vec<CaseRecord>,
		states: &StateFipsMap,
		shares: ShareTable,
		metropolis_labels: &HashSet<SmartString>,
) -> Vec<DailyCaseRecord> {
	resolve_unknown_counties(&mut records, states);
	let (cities, metros) = shares.partition(metropolis_labels);
	reallocate_cities(&mut records, &cities);
	let (records, _) = split_metropolises(records, &metros);
	daily_deltas(records)
}


/// Inner join of the daily records with the census on FIPS. Rows without
/// FIPS and rows whose FIPS the census does not know are dropped.
pub fn merge_with_census(records: Vec<DailyCaseRecord>, census: &CensusMap) -> (Vec<MergedRecord>, JoinStats) {
	let mut stats = JoinStats::default();
	let mut result = Vec::with_capacity(records.len());
	for DailyCaseRecord{record, daily} in records.into_iter() {
		let fips = match *record.fips {
			Some(fips) => fips,
			None => {
				stats.without_fips += 1;
				continue
			},
		};
		let info = match census.get(&fips) {
			Some(info) => info,
			None => {
				debug!("fips {} ({}, {}) not in census, dropped", fips, record.county, record.state);
				stats.not_in_census += 1;
				continue
			},
		};
		result.push(MergedRecord{
			date: record.date,
			county: record.county,
			state: record.state,
			cumulative_cases: record.cumulative[Metric::Cases],
			cumulative_deaths: record.cumulative[Metric::Deaths],
			daily_cases: daily[Metric::Cases],
			daily_deaths: daily[Metric::Deaths],
			census_2010: info.census_2010,
			estimate_2019: info.estimate_2019,
			fips,
		});
	}
	stats.joined = result.len();
	info!(
		"joined {} rows with the census, dropped {} without fips and {} unknown to the census",
		stats.joined, stats.without_fips, stats.not_in_census,
	);
	(result, stats)
}


#[cfg(test)]
mod tests {
	use super::*;

	use std::sync::Arc;

	use chrono::NaiveDate;

	use crate::census::CountyInfo;
	use crate::fips::{Fips, MaybeFips};
	use crate::shares::PopulationShare;

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(2020, 4, d).unwrap()
	}

	fn fips(s: &str) -> Fips {
		s.parse().unwrap()
	}

	fn census(codes: &[&str]) -> CensusMap {
		codes.iter().map(|c| {
			let info = CountyInfo{
				fips: fips(c),
				state_name: "State".into(),
				county_name: "County".into(),
				census_2010: 1000,
				estimate_2019: 1100,
			};
			(info.fips, Arc::new(info))
		}).collect()
	}

	#[test]
	fn unknown_county_scenario() {
		let mut states = StateFipsMap::new();
		states.insert("Nowhere".into(), fips("99000"));
		let records = vec![
			CaseRecord::new(day(2), "Unknown", "Nowhere", MaybeFips(None), 15, 0),
			CaseRecord::new(day(1), "Unknown", "Nowhere", MaybeFips(None), 10, 0),
		];
		let daily = transform_cases(records, &states, ShareTable::new(), &HashSet::new());
		let (merged, stats) = merge_with_census(daily, &census(&["99000"]));
		assert_eq!(stats.joined, 2);
		assert_eq!(merged[0].fips, fips("99000"));
		assert_eq!((merged[0].date, merged[0].daily_cases), (day(1), 10));
		assert_eq!((merged[1].date, merged[1].daily_cases), (day(2), 5));
		assert_eq!(merged[1].estimate_2019, 1100);
	}

	#[test]
	fn city_and_metropolis_scenario() {
		let shares: ShareTable = vec![
			PopulationShare::new("Kansas City,Missouri", fips("29095"), "Jackson", 0.6),
			PopulationShare::new("Kansas City,Missouri", fips("29047"), "Clay", 0.3),
			PopulationShare::new("New York City,New York", fips("36061"), "New York", 0.5),
			PopulationShare::new("New York City,New York", fips("36047"), "Kings", 0.5),
		].into_iter().collect();
		let mut metros = HashSet::new();
		metros.insert(SmartString::from("New York City,New York"));

		let records = vec![
			CaseRecord::new(day(1), "Kansas City", "Missouri", MaybeFips(None), 100, 0),
			CaseRecord::new(day(1), "Jackson", "Missouri", MaybeFips(Some(fips("29095"))), 1, 0),
			CaseRecord::new(day(1), "Clay", "Missouri", MaybeFips(Some(fips("29047"))), 2, 0),
			CaseRecord::new(day(1), "New York City", "New York", MaybeFips(None), 11, 3),
		];
		let daily = transform_cases(records, &StateFipsMap::new(), shares, &metros);
		let (merged, stats) = merge_with_census(
			daily,
			&census(&["29095", "29047", "36061", "36047"]),
		);
		// the two coarse rows carry no fips and fall out of the join
		assert_eq!(stats.without_fips, 2);
		let by_fips: Vec<_> = merged.iter().map(|m| (m.fips.to_string(), m.cumulative_cases, m.cumulative_deaths)).collect();
		assert_eq!(by_fips, vec![
			("29047".to_string(), 2 + 30, 0),
			("29095".to_string(), 1 + 60, 0),
			("36047".to_string(), 5, 1),
			("36061".to_string(), 5, 1),
		]);
	}

	#[test]
	fn rows_unknown_to_census_are_dropped() {
		let records = vec![
			CaseRecord::new(day(1), "Somewhere", "Guam", MaybeFips(Some(fips("66010"))), 1, 0),
		];
		let daily = transform_cases(records, &StateFipsMap::new(), ShareTable::new(), &HashSet::new());
		let (merged, stats) = merge_with_census(daily, &census(&["01001"]));
		assert!(merged.is_empty());
		assert_eq!(stats.not_in_census, 1);
	}
}
