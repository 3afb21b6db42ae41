use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use smartstring::alias::{String as SmartString};

use super::error::{Error, Result};


pub static DEFAULT_FEED_URL: &str = "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-counties.csv";
pub static DEFAULT_CENSUS_PATH: &str = "./data/co-est2019-alldata.csv";
pub static DEFAULT_STATE_FIPS_PATH: &str = "./data/state_level_fips_codes.csv";
pub static DEFAULT_SHARES_PATH: &str = "./data/missing_fips_population_proportion.csv";
pub static DEFAULT_METROPOLIS_LABELS: &str = "New York City,New York";
pub static DEFAULT_OUTPUT_PATH: &str = "covid19data_withpopulationdata.csv";


#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	/// local path or http(s) URL of the county case feed
	pub feed: String,
	pub census: String,
	pub state_fips: String,
	pub shares: String,
	pub metropolis_labels: HashSet<SmartString>,
	pub output: PathBuf,
}

impl Default for Config {
	fn default() -> Self {
		Self{
			feed: DEFAULT_FEED_URL.into(),
			census: DEFAULT_CENSUS_PATH.into(),
			state_fips: DEFAULT_STATE_FIPS_PATH.into(),
			shares: DEFAULT_SHARES_PATH.into(),
			metropolis_labels: parse_labels(DEFAULT_METROPOLIS_LABELS),
			output: DEFAULT_OUTPUT_PATH.into(),
		}
	}
}

/// `;`-separated list of `City,State` labels.
pub fn parse_labels(s: &str) -> HashSet<SmartString> {
	s.split(';')
		.map(|l| l.trim())
		.filter(|l| !l.is_empty())
		.map(Into::into)
		.collect()
}

impl Config {
	/// Read the configuration through `lookup`, falling back to the defaults
	/// for unset variables.
	pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
		let mut result = Self::default();
		let non_empty = |name: &str| -> Result<Option<String>> {
			match lookup(name) {
				Some(v) if v.trim().is_empty() => Err(Error::Config(format!("{} is set but empty", name))),
				v => Ok(v),
			}
		};
		if let Some(v) = non_empty("COVID_FEED_URL")? {
			result.feed = v;
		}
		if let Some(v) = non_empty("CENSUS_PATH")? {
			result.census = v;
		}
		if let Some(v) = non_empty("STATE_FIPS_PATH")? {
			result.state_fips = v;
		}
		if let Some(v) = non_empty("SHARES_PATH")? {
			result.shares = v;
		}
		if let Some(v) = lookup("METROPOLIS_LABELS") {
			// an empty list disables the metropolis split
			result.metropolis_labels = parse_labels(&v);
		}
		if let Some(v) = non_empty("OUTPUT_PATH")? {
			result.output = v.into();
		}
		Ok(result)
	}

	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| env::var(name).ok())
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	use std::collections::HashMap;

	fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |name| map.get(name).cloned()
	}

	#[test]
	fn defaults_apply_when_unset() {
		let config = Config::from_lookup(lookup_in(&[])).unwrap();
		assert_eq!(config, Config::default());
		assert!(config.metropolis_labels.contains("New York City,New York"));
	}

	#[test]
	fn variables_override_defaults() {
		let config = Config::from_lookup(lookup_in(&[
			("COVID_FEED_URL", "./feed.csv.gz"),
			("METROPOLIS_LABELS", "New York City,New York; Example City,Example"),
			("OUTPUT_PATH", "/tmp/out.csv"),
		])).unwrap();
		assert_eq!(config.feed, "./feed.csv.gz");
		assert_eq!(config.metropolis_labels.len(), 2);
		assert!(config.metropolis_labels.contains("Example City,Example"));
		assert_eq!(config.output, PathBuf::from("/tmp/out.csv"));
		assert_eq!(config.census, DEFAULT_CENSUS_PATH);
	}

	#[test]
	fn empty_metropolis_list_disables_split() {
		let config = Config::from_lookup(lookup_in(&[("METROPOLIS_LABELS", "")])).unwrap();
		assert!(config.metropolis_labels.is_empty());
	}

	#[test]
	fn empty_path_is_rejected() {
		assert!(matches!(
			Config::from_lookup(lookup_in(&[("CENSUS_PATH", " ")])),
			Err(Error::Config(_)),
		));
	}
}
