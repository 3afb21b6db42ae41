use std::fmt;
use std::io;

use smartstring::alias::{String as SmartString};


#[derive(Debug)]
pub enum Error {
	Io(io::Error),
	Fetch(reqwest::Error),
	Csv(csv::Error),
	MissingColumn{source: SmartString, column: &'static str},
	InvalidFips(String),
	DuplicateFips(String),
	Config(String),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Io(e) => fmt::Display::fmt(e, f),
			Self::Fetch(e) => write!(f, "fetch failed: {}", e),
			Self::Csv(e) => fmt::Display::fmt(e, f),
			Self::MissingColumn{source, column} => write!(f, "{}: missing column {:?}", source, column),
			Self::InvalidFips(s) => write!(f, "invalid fips code {:?}", s),
			Self::DuplicateFips(s) => write!(f, "fips code {} occurs more than once in the reference data", s),
			Self::Config(s) => write!(f, "invalid configuration: {}", s),
		}
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Self::Fetch(err)
	}
}

impl From<csv::Error> for Error {
	fn from(err: csv::Error) -> Self {
		Self::Csv(err)
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(e) => Some(e),
			Self::Fetch(e) => Some(e),
			Self::Csv(e) => Some(e),
			_ => None,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;


/// Verify that all `required` columns are present in a header row.
pub fn require_columns(source: &str, headers: &csv::StringRecord, required: &[&'static str]) -> Result<()> {
	for column in required {
		if !headers.iter().any(|h| h.trim() == *column) {
			return Err(Error::MissingColumn{
				source: source.into(),
				column: *column,
			})
		}
	}
	Ok(())
}
