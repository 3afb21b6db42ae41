use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::error::Error;


pub const STATE_WIDTH: usize = 2;
pub const COUNTY_WIDTH: usize = 3;
pub const FIPS_LEN: usize = STATE_WIDTH + COUNTY_WIDTH;


/// Five digit county identifier, two state digits followed by three county
/// digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fips([u8; FIPS_LEN]);

fn pad_into(dst: &mut [u8], code: &str) -> Result<(), Error> {
	if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
		return Err(Error::InvalidFips(code.into()))
	}
	let significant = code.trim_start_matches('0').as_bytes();
	if significant.len() > dst.len() {
		return Err(Error::InvalidFips(code.into()))
	}
	let pad = dst.len() - significant.len();
	dst[..pad].fill(b'0');
	dst[pad..].copy_from_slice(significant);
	Ok(())
}

impl Fips {
	/// Zero-pad a state code to two and a county code to three digits and
	/// concatenate them.
	pub fn from_codes(state: &str, county: &str) -> Result<Self, Error> {
		let mut buf = [0u8; FIPS_LEN];
		pad_into(&mut buf[..STATE_WIDTH], state.trim()).map_err(|_| Error::InvalidFips(format!("{}/{}", state, county)))?;
		pad_into(&mut buf[STATE_WIDTH..], county.trim()).map_err(|_| Error::InvalidFips(format!("{}/{}", state, county)))?;
		Ok(Self(buf))
	}

	pub fn from_numeric(state: u16, county: u16) -> Result<Self, Error> {
		Self::from_codes(&state.to_string(), &county.to_string())
	}

	pub fn as_str(&self) -> &str {
		// only ascii digits are ever stored
		std::str::from_utf8(&self.0[..]).unwrap_or_default()
	}

	pub fn state_code(&self) -> &str {
		&self.as_str()[..STATE_WIDTH]
	}

	pub fn county_code(&self) -> &str {
		&self.as_str()[STATE_WIDTH..]
	}

	pub fn is_state_level(&self) -> bool {
		self.county_code() == "000"
	}
}

impl fmt::Display for Fips {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Debug for Fips {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "Fips({:?})", self.as_str())
	}
}

impl FromStr for Fips {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.len() != FIPS_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
			return Err(Error::InvalidFips(s.into()))
		}
		let mut buf = [0u8; FIPS_LEN];
		buf.copy_from_slice(s.as_bytes());
		Ok(Self(buf))
	}
}

impl<'de> Deserialize<'de> for Fips {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where D: Deserializer<'de>
	{
		let s = String::deserialize(deserializer)?;
		FromStr::from_str(&s).map_err(de::Error::custom)
	}
}

impl Serialize for Fips {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where S: Serializer
	{
		serializer.serialize_str(self.as_str())
	}
}


/// A FIPS column which may be empty in the source.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MaybeFips(pub Option<Fips>);

impl Deref for MaybeFips {
	type Target = Option<Fips>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for MaybeFips {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl From<MaybeFips> for Option<Fips> {
	fn from(other: MaybeFips) -> Self {
		other.0
	}
}

impl From<Option<Fips>> for MaybeFips {
	fn from(other: Option<Fips>) -> Self {
		Self(other)
	}
}

impl FromStr for MaybeFips {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.trim().is_empty() {
			return Ok(MaybeFips(None))
		}
		Ok(MaybeFips(Some(s.parse::<Fips>()?)))
	}
}

impl<'de> Deserialize<'de> for MaybeFips {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where D: Deserializer<'de>
	{
		let s = Option::<String>::deserialize(deserializer)?;
		match s {
			Some(s) => FromStr::from_str(&s).map_err(de::Error::custom),
			None => Ok(MaybeFips(None)),
		}
	}
}
