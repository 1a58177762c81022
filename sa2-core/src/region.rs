//! Statistical areas and their identifying codes.

use std::borrow::Borrow;
use std::fmt;

use geo::MultiPolygon;
use thiserror::Error;

/// Identifier of an SA2 region, stable across every input dataset.
///
/// Codes are compared as strings, so ordering is lexicographic.
///
/// # Examples
/// ```
/// use sa2_core::RegionCode;
///
/// let code = RegionCode::new("117031337").unwrap();
/// assert_eq!(code.as_str(), "117031337");
/// assert!(RegionCode::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct RegionCode(String);

/// Errors returned by [`RegionCode::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionCodeError {
    /// The supplied code was empty or whitespace.
    #[error("region code must not be blank")]
    Blank,
}

impl RegionCode {
    /// Validate and wrap a region code. Surrounding whitespace is trimmed.
    pub fn new(code: impl Into<String>) -> Result<Self, RegionCodeError> {
        let raw = code.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RegionCodeError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegionCode {
    type Error = RegionCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

impl AsRef<str> for RegionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RegionCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An SA2 statistical area with its boundary.
///
/// Geometry is WGS84 (EPSG:4326) with `x = longitude` and `y = latitude`.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Unique SA2 code.
    pub code: RegionCode,
    /// Human readable SA2 name.
    pub name: String,
    /// Name of the parent SA4 zone.
    pub zone: String,
    /// Land area in square kilometres.
    pub area_sqkm: f64,
    /// Region boundary.
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    /// Construct a region from its parts.
    pub fn new(
        code: RegionCode,
        name: impl Into<String>,
        zone: impl Into<String>,
        area_sqkm: f64,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            zone: zone.into(),
            area_sqkm,
            geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_codes_are_rejected(#[case] raw: &str) {
        assert_eq!(RegionCode::new(raw), Err(RegionCodeError::Blank));
    }

    #[rstest]
    fn codes_are_trimmed() {
        let code = RegionCode::new(" 102011028 ").expect("valid code");
        assert_eq!(code.as_str(), "102011028");
        assert_eq!(code.to_string(), "102011028");
    }

    #[rstest]
    fn codes_order_lexicographically() {
        let a = RegionCode::new("A").expect("valid code");
        let b = RegionCode::new("B").expect("valid code");
        assert!(a < b);
    }
}
