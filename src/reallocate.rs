//! Redistribution of counts reported for coarse units (cities spanning
//! several counties, or a metropolis reported as one unit) onto counties.
//!
//! Every allocation is `floor(share * total)`, so a coarse unit never hands
//! out more than it reported as long as its shares sum to at most one.

use std::collections::HashMap;

use chrono::NaiveDate;

use log::{debug, info};

use smartstring::alias::{String as SmartString};

use super::feed::{CaseRecord, Counts, Metric};
use super::fips::{Fips, MaybeFips};
use super::shares::{PopulationShare, ShareTable};


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReallocationStats {
	/// fine-grained rows which received a share of a coarse unit
	pub rows_adjusted: usize,
	/// rows synthesized for metropolis constituents
	pub rows_emitted: usize,
}


fn allocate_counts(share: &PopulationShare, totals: &Counts<u64>) -> Counts<u64> {
	let mut result = Counts::default();
	for metric in Metric::ALL.iter() {
		result[*metric] = share.allocate(totals[*metric]);
	}
	result
}


/// Add each city's cumulative totals, weighted by population share, to the
/// rows of its constituent counties on the same date.
///
/// City rows themselves are left alone. Counties without a row on a date
/// the city reported get nothing; no rows are synthesized here.
pub fn reallocate_cities(records: &mut [CaseRecord], cities: &ShareTable) -> ReallocationStats {
	let mut stats = ReallocationStats::default();
	if cities.is_empty() {
		return stats
	}

	let mut constituents: HashMap<Fips, Vec<&PopulationShare>> = HashMap::new();
	for (_, shares) in cities.iter() {
		for share in shares {
			constituents.entry(share.fips).or_default().push(share);
		}
	}

	// totals are taken before any row is modified
	let mut city_totals: HashMap<(SmartString, NaiveDate), Counts<u64>> = HashMap::new();
	for rec in records.iter() {
		let label = rec.label();
		if cities.get(&label).is_none() {
			continue
		}
		city_totals.entry((label, rec.date)).or_insert_with(|| rec.cumulative.clone());
	}
	debug!("found {} city rows to reallocate", city_totals.len());

	for rec in records.iter_mut() {
		let fips = match *rec.fips {
			Some(fips) => fips,
			None => continue,
		};
		let shares = match constituents.get(&fips) {
			Some(shares) => shares,
			None => continue,
		};
		let mut adjusted = false;
		for share in shares {
			let totals = match city_totals.get(&(share.label.clone(), rec.date)) {
				Some(totals) => totals,
				None => continue,
			};
			let extra = allocate_counts(share, totals);
			for metric in Metric::ALL.iter() {
				rec.cumulative[*metric] += extra[*metric];
			}
			adjusted = true;
		}
		if adjusted {
			stats.rows_adjusted += 1;
		}
	}

	info!("added city counts onto {} county rows", stats.rows_adjusted);
	stats
}


/// Emit one new row per constituent county for every metropolis row, with
/// counts scaled down by the county's population share.
///
/// The metropolis row itself is kept unchanged, directly followed by its
/// constituent rows. It carries no FIPS of its own, so the census join
/// drops it.
pub fn split_metropolises(records: Vec<CaseRecord>, metros: &ShareTable) -> (Vec<CaseRecord>, ReallocationStats) {
	let mut stats = ReallocationStats::default();
	if metros.is_empty() {
		return (records, stats)
	}

	let mut result = Vec::with_capacity(records.len());
	for rec in records.into_iter() {
		let shares = metros.get(&rec.label());
		result.push(rec);
		let shares = match shares {
			Some(shares) => shares,
			None => continue,
		};
		let aggregate_index = result.len() - 1;
		for share in shares {
			let aggregate = &result[aggregate_index];
			let constituent = CaseRecord{
				date: aggregate.date,
				county: share.county.clone(),
				state: aggregate.state.clone(),
				fips: MaybeFips(Some(share.fips)),
				cumulative: allocate_counts(share, &aggregate.cumulative),
			};
			result.push(constituent);
			stats.rows_emitted += 1;
		}
	}

	info!("split metropolis rows into {} county rows", stats.rows_emitted);
	(result, stats)
}
