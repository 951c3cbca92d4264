//! Names keying the bike-share model.
//!
//! A contract name keys both the resolver and the station cache, so it is
//! cloned on every lookup and shares its text through `Arc<str>`.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

macro_rules! text_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::new(s))
            }
        }
    };
}

text_key! {
    /// Operator-facing name of a contract, e.g. `Toulouse`
    ContractName
}

text_key! {
    /// ISO 3166 alpha-2 country of a contract, stored uppercase
    CountryCode
}

impl ContractName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().into())
    }
}

impl CountryCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_cache_lookup_by_str() {
        let mut counts: HashMap<ContractName, u32> = HashMap::new();
        counts.insert(ContractName::new("Toulouse"), 278);

        assert_eq!(counts.get("Toulouse"), Some(&278));
        assert_eq!(counts.get("toulouse"), None);
    }

    #[test]
    fn test_clone_shares_name() {
        let lyon = ContractName::new("Lyon");
        let copy = lyon.clone();
        assert!(Arc::ptr_eq(&lyon.0, &copy.0));
        assert_eq!(lyon, ContractName::from(String::from("Lyon")));
    }

    #[test]
    fn test_country_code_is_uppercase() {
        assert_eq!(CountryCode::new(" fr ").as_str(), "FR");
        assert_eq!(CountryCode::from("Be").to_string(), "BE");
        assert!(CountryCode::new("").is_empty());
    }
}
