use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use log::info;

use serde::{Deserialize, Serialize};

use smartstring::alias::{String as SmartString};

use super::error::{Error, Result};
use super::fips::Fips;
use super::progress::{ProgressSink, StepMeter};


/// One row of the final table: a county on a date with its counters and
/// population figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
	#[serde(rename = "Date")]
	pub date: NaiveDate,
	#[serde(rename = "County")]
	pub county: SmartString,
	#[serde(rename = "State")]
	pub state: SmartString,
	#[serde(rename = "Cumulative Cases to Date")]
	pub cumulative_cases: u64,
	#[serde(rename = "Cumulative Deaths to Date")]
	pub cumulative_deaths: u64,
	#[serde(rename = "Daily Cases")]
	pub daily_cases: i64,
	#[serde(rename = "Daily Deaths")]
	pub daily_deaths: i64,
	#[serde(rename = "2010 Census Actual Population")]
	pub census_2010: u64,
	#[serde(rename = "Estimated 2019 Population")]
	pub estimate_2019: u64,
	#[serde(rename = "FIPS")]
	pub fips: Fips,
}


pub fn write_records<W: io::Write, S: ProgressSink + ?Sized>(s: &mut S, w: W, records: &[MergedRecord]) -> Result<()> {
	let mut w = csv::Writer::from_writer(w);
	let mut pm = StepMeter::new(s, records.len());
	for (i, rec) in records.iter().enumerate() {
		w.serialize(rec)?;
		if i % 100000 == 99999 {
			pm.update(i+1);
		}
	}
	w.flush()?;
	pm.finish();
	Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
	let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
	name.push(".tmp");
	path.with_file_name(name)
}

/// Write the table next to `path` and move it into place once complete, so
/// a failed run never leaves a partial file behind.
pub fn write_file<P: AsRef<Path>, S: ProgressSink + ?Sized>(s: &mut S, path: P, records: &[MergedRecord]) -> Result<()> {
	let path = path.as_ref();
	let tmp = tmp_path(path);
	let result = fs::File::create(&tmp)
		.map_err(Error::from)
		.and_then(|f| write_records(s, io::BufWriter::new(f), records))
		.and_then(|_| fs::rename(&tmp, path).map_err(Error::from));
	if let Err(e) = result {
		let _ = fs::remove_file(&tmp);
		return Err(e)
	}
	info!("wrote {} rows to {}", records.len(), path.display());
	Ok(())
}

pub fn read_records<R: io::Read>(r: R) -> Result<Vec<MergedRecord>> {
	let mut r = csv::Reader::from_reader(r);
	let mut result = Vec::new();
	for row in r.deserialize() {
		result.push(row?);
	}
	Ok(result)
}
