use std::collections::{BTreeMap, HashSet};
use std::io;

use log::{debug, warn};

use serde::Deserialize;

use smartstring::alias::{String as SmartString};

use super::error::{require_columns, Result};
use super::fips::Fips;


pub static SHARE_COLUMNS: &[&str] = &["City,State", "FIPS", "County", "County Population Proportion"];


#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationShare {
	#[serde(rename = "City,State")]
	pub label: SmartString,
	#[serde(rename = "FIPS")]
	pub fips: Fips,
	#[serde(rename = "County")]
	pub county: SmartString,
	#[serde(rename = "County Population Proportion")]
	pub proportion: f64,
}

impl PopulationShare {
	pub fn new(label: &str, fips: Fips, county: &str, proportion: f64) -> Self {
		Self{
			label: label.into(),
			fips,
			county: county.into(),
			proportion,
		}
	}

	/// `floor(proportion * total)`, evaluated in floating point.
	pub fn allocate(&self, total: u64) -> u64 {
		let v = (self.proportion * total as f64).floor();
		if v <= 0.0 {
			0
		} else {
			v as u64
		}
	}
}


/// Population shares grouped by coarse unit label, in file order within each
/// unit.
#[derive(Debug, Clone, Default)]
pub struct ShareTable {
	units: BTreeMap<SmartString, Vec<PopulationShare>>,
}

impl ShareTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, share: PopulationShare) {
		if !(0.0..=1.0).contains(&share.proportion) {
			warn!("share {} of {} for {} is outside [0, 1]", share.proportion, share.label, share.fips);
		}
		self.units.entry(share.label.clone()).or_default().push(share);
	}

	pub fn get(&self, label: &str) -> Option<&[PopulationShare]> {
		self.units.get(label).map(|v| &v[..])
	}

	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.units.keys().map(|k| k.as_str())
	}

	pub fn len(&self) -> usize {
		self.units.len()
	}

	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[PopulationShare])> {
		self.units.iter().map(|(k, v)| (k.as_str(), &v[..]))
	}

	/// Split into (cities, metropolises) by label.
	pub fn partition(self, metropolis_labels: &HashSet<SmartString>) -> (ShareTable, ShareTable) {
		let mut cities = ShareTable::new();
		let mut metros = ShareTable::new();
		for (label, shares) in self.units.into_iter() {
			if metropolis_labels.contains(&label) {
				metros.units.insert(label, shares);
			} else {
				cities.units.insert(label, shares);
			}
		}
		(cities, metros)
	}
}

impl std::iter::FromIterator<PopulationShare> for ShareTable {
	fn from_iter<I: IntoIterator<Item = PopulationShare>>(iter: I) -> Self {
		let mut result = ShareTable::new();
		for share in iter {
			result.insert(share);
		}
		result
	}
}


/// Load the `|`-separated table of county population shares for coarse
/// reporting units.
pub fn load_shares<R: io::Read>(r: R) -> Result<ShareTable> {
	let mut r = csv::ReaderBuilder::new()
		.delimiter(b'|')
		.from_reader(r);
	require_columns("population shares", r.headers()?, SHARE_COLUMNS)?;
	let mut result = ShareTable::new();
	for row in r.deserialize() {
		let share: PopulationShare = row?;
		result.insert(share);
	}
	debug!("loaded population shares for {} coarse units", result.len());
	Ok(result)
}


#[cfg(test)]
mod tests {
	use super::*;

	static SHARES: &str = "City,State|FIPS|County|Population|County Population Proportion
Kansas City,Missouri|29095|Jackson|700307|0.46
Kansas City,Missouri|29047|Clay|249948|0.25
New York City,New York|36061|New York|1628706|0.19
New York City,New York|36047|Kings|2559903|0.30
";

	fn fips(s: &str) -> Fips {
		s.parse().unwrap()
	}

	#[test]
	fn groups_by_label_in_file_order() {
		let table = load_shares(SHARES.as_bytes()).unwrap();
		assert_eq!(table.len(), 2);
		let kc = table.get("Kansas City,Missouri").unwrap();
		assert_eq!(kc.len(), 2);
		assert_eq!(kc[0].fips, fips("29095"));
		assert_eq!(kc[1].county.as_str(), "Clay");
		assert!((kc[1].proportion - 0.25).abs() < 1e-12);
	}

	#[test]
	fn partitions_metropolis_labels() {
		let table = load_shares(SHARES.as_bytes()).unwrap();
		let mut metro_labels = HashSet::new();
		metro_labels.insert(SmartString::from("New York City,New York"));
		let (cities, metros) = table.partition(&metro_labels);
		assert_eq!(cities.labels().collect::<Vec<_>>(), vec!["Kansas City,Missouri"]);
		assert_eq!(metros.labels().collect::<Vec<_>>(), vec!["New York City,New York"]);
	}

	#[test]
	fn allocation_floors() {
		let share = PopulationShare::new("X,Y", fips("01001"), "A", 0.6);
		assert_eq!(share.allocate(100), 60);
		assert_eq!(share.allocate(3), 1);
		let share = PopulationShare::new("X,Y", fips("01001"), "A", 0.3);
		assert_eq!(share.allocate(100), 30);
		let zero = PopulationShare::new("X,Y", fips("01001"), "A", 0.0);
		assert_eq!(zero.allocate(1_000_000), 0);
	}

	#[test]
	fn allocations_never_exceed_total() {
		let shares = vec![0.46, 0.25, 0.19, 0.1];
		for total in 0..2000u64 {
			let sum: u64 = shares.iter()
				.map(|p| PopulationShare::new("X,Y", fips("01001"), "A", *p).allocate(total))
				.sum();
			assert!(sum <= total, "sum {} exceeds total {}", sum, total);
		}
	}

	#[test]
	fn missing_proportion_column_is_schema_error() {
		let data = "City,State|FIPS|County\nKansas City,Missouri|29095|Jackson\n";
		assert!(matches!(load_shares(data.as_bytes()), Err(crate::Error::MissingColumn{..})));
	}
}
