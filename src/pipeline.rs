use log::info;

use super::census::{load_census, load_state_fips};
use super::config::Config;
use super::error::Result;
use super::feed::load_feed;
use super::ioutil::open_source;
use super::merge::{merge_with_census, transform_cases};
use super::output::{write_file, MergedRecord};
use super::progress::ProgressSink;
use super::shares::load_shares;


/// Load all inputs named by `config`, transform the case feed and join it
/// with the census. Nothing is written.
pub fn build<S: ProgressSink + ?Sized>(s: &mut S, config: &Config) -> Result<Vec<MergedRecord>> {
	info!("loading case feed from {} ...", config.feed);
	let records = load_feed(s, open_source(&config.feed)?)?;

	info!("loading state-level fips from {} ...", config.state_fips);
	let states = load_state_fips(open_source(&config.state_fips)?)?;

	info!("loading population shares from {} ...", config.shares);
	let shares = load_shares(open_source(&config.shares)?)?;

	info!("loading census from {} ...", config.census);
	let census = load_census(s, open_source(&config.census)?)?;

	info!("reconciling {} feed rows ...", records.len());
	let daily = transform_cases(records, &states, shares, &config.metropolis_labels);

	let (merged, _) = merge_with_census(daily, &census);
	Ok(merged)
}

/// `build` followed by writing the output file. Either the whole table is
/// written or nothing is.
pub fn run<S: ProgressSink + ?Sized>(s: &mut S, config: &Config) -> Result<usize> {
	let merged = build(s, config)?;
	info!("writing {} rows to {} ...", merged.len(), config.output.display());
	write_file(s, &config.output, &merged)?;
	Ok(merged.len())
}
