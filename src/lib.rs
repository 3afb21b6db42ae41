mod error;
mod ioutil;
mod progress;
mod fips;
mod census;
mod feed;
mod shares;
mod resolve;
mod reallocate;
mod timeseries;
mod merge;
mod output;
mod checks;
mod config;
mod pipeline;

pub use error::*;
pub use ioutil::{fetch, is_remote, magic_open, open_source};
pub use progress::*;
pub use fips::*;
pub use census::*;
pub use feed::*;
pub use shares::*;
pub use resolve::*;
pub use reallocate::*;
pub use timeseries::*;
pub use merge::*;
pub use output::*;
pub use checks::*;
pub use config::*;
pub use pipeline::{build, run};


/// Initialize log output for the binaries. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_logging() {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
	// a second initialization (e.g. from tests) is harmless
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}
