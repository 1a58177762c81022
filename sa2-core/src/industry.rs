//! Industry categories tracked by the business metric.
//!
//! Only five ANZSIC divisions contribute to a region's business density. The
//! enum keeps the allowlist closed so unknown labels are rejected at the edge.
//!
//! # Examples
//! ```
//! use sa2_core::Industry;
//!
//! assert_eq!(Industry::RetailTrade.as_str(), "Retail Trade");
//! assert_eq!("retail trade".parse::<Industry>(), Ok(Industry::RetailTrade));
//! ```

use thiserror::Error;

/// A tracked industry division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Industry {
    /// Shops and other retail outlets.
    RetailTrade,
    /// Schools, colleges and training providers.
    EducationAndTraining,
    /// Medical, aged care and social services.
    HealthCareAndSocialAssistance,
    /// Hotels, cafes and restaurants.
    AccommodationAndFoodServices,
    /// Venues, sport and recreation services.
    ArtsAndRecreationServices,
}

/// Returned when parsing a label that is not a tracked industry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown industry '{label}'")]
pub struct UnknownIndustry {
    /// The label that failed to parse.
    pub label: String,
}

impl Industry {
    /// Every tracked industry in declaration order.
    pub const ALL: [Self; 5] = [
        Self::RetailTrade,
        Self::EducationAndTraining,
        Self::HealthCareAndSocialAssistance,
        Self::AccommodationAndFoodServices,
        Self::ArtsAndRecreationServices,
    ];

    /// Return the published division label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RetailTrade => "Retail Trade",
            Self::EducationAndTraining => "Education and Training",
            Self::HealthCareAndSocialAssistance => "Health Care and Social Assistance",
            Self::AccommodationAndFoodServices => "Accommodation and Food Services",
            Self::ArtsAndRecreationServices => "Arts and Recreation Services",
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Industry {
    type Err = UnknownIndustry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|industry| industry.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownIndustry {
                label: s.to_owned(),
            })
    }
}

impl TryFrom<String> for Industry {
    type Error = UnknownIndustry;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Industry> for String {
    fn from(industry: Industry) -> Self {
        industry.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn display_matches_as_str() {
        for industry in Industry::ALL {
            assert_eq!(industry.to_string(), industry.as_str());
        }
    }

    #[test]
    fn parsing_round_trips_labels() {
        for industry in Industry::ALL {
            assert_eq!(Industry::from_str(industry.as_str()), Ok(industry));
        }
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(
            Industry::from_str("  health care and social assistance "),
            Ok(Industry::HealthCareAndSocialAssistance)
        );
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = Industry::from_str("Mining").unwrap_err();
        assert!(err.to_string().contains("unknown industry"));
    }
}
