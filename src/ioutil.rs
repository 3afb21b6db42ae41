use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;

use flate2;

use log::{debug, info};

use super::error::Result;


pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	match path.extension() {
		Some(x) if x == "gz" => {
			Ok(Box::new(flate2::read::GzDecoder::new(fs::File::open(path)?)))
		},
		_ => Ok(Box::new(fs::File::open(path)?)),
	}
}

pub fn is_remote(location: &str) -> bool {
	location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch a remote file into memory. Any non-success status is an error.
pub fn fetch(url: &str) -> Result<Bytes> {
	info!("fetching {}", url);
	let resp = reqwest::blocking::get(url)?;
	let resp = resp.error_for_status()?;
	let body = resp.bytes()?;
	debug!("fetched {} bytes from {}", body.len(), url);
	Ok(body)
}

/// Open either a local path or an http(s) URL. A `.gz` suffix selects gzip
/// decompression in both cases.
pub fn open_source(location: &str) -> Result<Box<dyn Read>> {
	if !is_remote(location) {
		return Ok(magic_open(location)?)
	}
	let body = io::Cursor::new(fetch(location)?);
	if location.ends_with(".gz") {
		Ok(Box::new(flate2::read::GzDecoder::new(body)))
	} else {
		Ok(Box::new(body))
	}
}
