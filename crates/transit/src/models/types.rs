//! Core data types and enums for bike-share data.

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Operator API a contract's stations are fetched from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Provider {
    Unknown,
    #[default]
    CityBikes,
}

impl Provider {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "CityBikes" => Self::CityBikes,
            _ => Self::Unknown,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::CityBikes => "CityBikes",
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BikeShareError {
    #[error("Contract not found: {0}")]
    ContractNotFound(ContractName),

    #[error("Contract has no station url: {0}")]
    MissingUrl(ContractName),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, BikeShareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_tag() {
        assert_eq!(Provider::from_tag("CityBikes"), Provider::CityBikes);
        assert_eq!(Provider::from_tag("JCDecaux"), Provider::Unknown);
        assert_eq!(Provider::from_tag(""), Provider::Unknown);
    }

    #[test]
    fn test_provider_tag_round_trip() {
        assert_eq!(Provider::from_tag(Provider::CityBikes.tag()), Provider::CityBikes);
        assert_eq!(Provider::default(), Provider::CityBikes);
    }

    #[test]
    fn test_error_display() {
        let err = BikeShareError::MissingUrl(ContractName::new("Lyon"));
        assert_eq!(err.to_string(), "Contract has no station url: Lyon");
    }
}
