use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use log::{debug, info};

use serde::Deserialize;

use smartstring::alias::{String as SmartString};

use super::error::{require_columns, Error, Result};
use super::fips::Fips;
use super::progress::{CountMeter, ProgressSink};


pub static CENSUS_COLUMNS: &[&str] = &[
	"STATE", "COUNTY", "STNAME", "CTYNAME", "CENSUS2010POP", "POPESTIMATE2019",
];

pub static STATE_FIPS_COLUMNS: &[&str] = &["STNAME", "FIPS"];


#[derive(Debug, Clone, Deserialize)]
pub struct RawCensusRow {
	#[serde(rename = "STATE")]
	pub state_code: u16,
	#[serde(rename = "COUNTY")]
	pub county_code: u16,
	#[serde(rename = "STNAME")]
	pub state_name: SmartString,
	#[serde(rename = "CTYNAME")]
	pub county_name: SmartString,
	#[serde(rename = "CENSUS2010POP")]
	pub census_2010: u64,
	#[serde(rename = "POPESTIMATE2019")]
	pub estimate_2019: u64,
}


#[derive(Debug, Clone, PartialEq)]
pub struct CountyInfo {
	pub fips: Fips,
	pub state_name: SmartString,
	pub county_name: SmartString,
	pub census_2010: u64,
	pub estimate_2019: u64,
}

impl CountyInfo {
	fn from_raw(rec: RawCensusRow) -> Result<Self> {
		Ok(Self{
			fips: Fips::from_numeric(rec.state_code, rec.county_code)?,
			state_name: rec.state_name,
			county_name: rec.county_name,
			census_2010: rec.census_2010,
			estimate_2019: rec.estimate_2019,
		})
	}
}


pub type CensusMap = HashMap<Fips, Arc<CountyInfo>>;


/// Load the county population estimates. Both county rows and the state
/// summary rows (county code 0) are kept.
pub fn load_census<R: io::Read, S: ProgressSink + ?Sized>(s: &mut S, r: R) -> Result<CensusMap> {
	let mut r = csv::Reader::from_reader(r);
	// the upstream file is latin-1, so names are decoded lossily
	let headers = csv::StringRecord::from_byte_record_lossy(r.byte_headers()?.clone());
	require_columns("census", &headers, CENSUS_COLUMNS)?;

	let mut result = HashMap::new();
	let mut pm = CountMeter::new(s);
	let mut n = 0;
	for (i, row) in r.byte_records().enumerate() {
		let row = csv::StringRecord::from_byte_record_lossy(row?);
		let rec: RawCensusRow = row.deserialize(Some(&headers))?;
		let info = CountyInfo::from_raw(rec)?;
		if result.contains_key(&info.fips) {
			return Err(Error::DuplicateFips(info.fips.to_string()))
		}
		result.insert(info.fips, Arc::new(info));
		if i % 1000 == 999 {
			pm.update(i+1);
		}
		n = i+1;
	}
	pm.finish(n);
	info!("loaded {} census rows", result.len());
	Ok(result)
}


#[derive(Debug, Clone, Deserialize)]
pub struct StateFipsRecord {
	#[serde(rename = "STNAME")]
	pub state_name: SmartString,
	#[serde(rename = "FIPS")]
	pub fips: Fips,
}

pub type StateFipsMap = HashMap<SmartString, Fips>;

/// Load the `|`-separated state name to state-level FIPS table. The codes are
/// taken verbatim.
pub fn load_state_fips<R: io::Read>(r: R) -> Result<StateFipsMap> {
	let mut r = csv::ReaderBuilder::new()
		.delimiter(b'|')
		.from_reader(r);
	require_columns("state fips", r.headers()?, STATE_FIPS_COLUMNS)?;
	let mut result = HashMap::new();
	for row in r.deserialize() {
		let rec: StateFipsRecord = row?;
		debug!("state {} -> {}", rec.state_name, rec.fips);
		result.insert(rec.state_name, rec.fips);
	}
	Ok(result)
}
