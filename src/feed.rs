use std::fmt;
use std::io;

use chrono::NaiveDate;

use enum_map::{Enum, EnumMap};

use log::info;

use serde::Deserialize;

use smartstring::alias::{String as SmartString};

use super::error::{require_columns, Result};
use super::fips::MaybeFips;
use super::progress::{CountMeter, ProgressSink};


pub static FEED_COLUMNS: &[&str] = &["date", "county", "state", "fips", "cases", "deaths"];

/// County name the feed uses for cases which could not be attributed to a
/// county within the state.
pub static UNKNOWN_COUNTY: &str = "Unknown";


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Metric {
	Cases,
	Deaths,
}

impl Metric {
	pub const ALL: [Metric; 2] = [Metric::Cases, Metric::Deaths];
}

impl fmt::Display for Metric {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Cases => f.write_str("cases"),
			Self::Deaths => f.write_str("deaths"),
		}
	}
}

pub type Counts<V> = EnumMap<Metric, V>;

pub fn counts<V: Default>(cases: V, deaths: V) -> Counts<V> {
	let mut result = Counts::default();
	result[Metric::Cases] = cases;
	result[Metric::Deaths] = deaths;
	result
}


#[derive(Debug, Clone, Deserialize)]
pub struct RawFeedRow {
	pub date: NaiveDate,
	pub county: SmartString,
	pub state: SmartString,
	pub fips: MaybeFips,
	pub cases: Option<u64>,
	pub deaths: Option<u64>,
}


/// One row of the case feed with cumulative counters as of `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
	pub date: NaiveDate,
	pub county: SmartString,
	pub state: SmartString,
	pub fips: MaybeFips,
	pub cumulative: Counts<u64>,
}

impl CaseRecord {
	pub fn new(date: NaiveDate, county: &str, state: &str, fips: MaybeFips, cases: u64, deaths: u64) -> Self {
		Self{
			date,
			county: county.into(),
			state: state.into(),
			fips,
			cumulative: counts(cases, deaths),
		}
	}

	/// The `county,state` label coarse units are matched by.
	pub fn label(&self) -> SmartString {
		let mut label = SmartString::new();
		label.push_str(&self.county);
		label.push(',');
		label.push_str(&self.state);
		label
	}

	pub fn is_unknown_county(&self) -> bool {
		self.county.as_str() == UNKNOWN_COUNTY
	}

	pub fn cases(&self) -> u64 {
		self.cumulative[Metric::Cases]
	}

	pub fn deaths(&self) -> u64 {
		self.cumulative[Metric::Deaths]
	}
}

impl From<RawFeedRow> for CaseRecord {
	fn from(other: RawFeedRow) -> Self {
		Self{
			date: other.date,
			county: other.county,
			state: other.state,
			fips: other.fips,
			cumulative: counts(other.cases.unwrap_or(0), other.deaths.unwrap_or(0)),
		}
	}
}


/// Read the county feed. Empty counters are read as zero.
pub fn load_feed<R: io::Read, S: ProgressSink + ?Sized>(s: &mut S, r: R) -> Result<Vec<CaseRecord>> {
	let mut r = csv::Reader::from_reader(r);
	require_columns("feed", r.headers()?, FEED_COLUMNS)?;
	let mut result = Vec::new();
	let mut pm = CountMeter::new(s);
	let mut n = 0;
	for (i, row) in r.deserialize().enumerate() {
		let rec: RawFeedRow = row?;
		result.push(rec.into());
		if i % 500000 == 499999 {
			pm.update(i+1);
		}
		n = i+1;
	}
	pm.finish(n);
	info!("loaded {} feed rows", result.len());
	Ok(result)
}


#[cfg(test)]
mod tests {
	use super::*;

	use crate::progress::NullProgress;

	static FEED: &str = "date,county,state,fips,cases,deaths
2020-01-21,Snohomish,Washington,53061,1,0
2020-03-01,New York City,New York,,1,
2020-03-02,Unknown,Rhode Island,,2,0
";

	#[test]
	fn parses_rows_and_coerces_missing_counters() {
		let records = load_feed(&mut NullProgress, FEED.as_bytes()).unwrap();
		assert_eq!(records.len(), 3);

		assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2020, 1, 21).unwrap());
		assert_eq!(records[0].fips.unwrap().as_str(), "53061");
		assert_eq!(records[0].cases(), 1);

		assert_eq!(*records[1].fips, None);
		assert_eq!(records[1].deaths(), 0);
		assert_eq!(records[1].label().as_str(), "New York City,New York");

		assert!(records[2].is_unknown_county());
		assert!(!records[0].is_unknown_county());
	}

	#[test]
	fn missing_deaths_column_is_schema_error() {
		let data = "date,county,state,fips,cases\n2020-01-21,Snohomish,Washington,53061,1\n";
		match load_feed(&mut NullProgress, data.as_bytes()) {
			Err(crate::Error::MissingColumn{column, ..}) => assert_eq!(column, "deaths"),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn malformed_counter_is_fatal() {
		let data = "date,county,state,fips,cases,deaths\n2020-01-21,Snohomish,Washington,53061,many,0\n";
		assert!(matches!(load_feed(&mut NullProgress, data.as_bytes()), Err(crate::Error::Csv(_))));
	}

	#[test]
	fn counts_are_indexed_by_metric() {
		let c = counts(7u64, 2u64);
		assert_eq!(c[Metric::Cases], 7);
		assert_eq!(c[Metric::Deaths], 2);
	}
}
