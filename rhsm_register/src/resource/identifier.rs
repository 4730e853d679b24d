//! Resource identity: the registration server hostname

use super::error::ValidationError;
use super::validation::validate_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated, lowercased registration server hostname
///
/// The only way to obtain one is through [`validate_identifier`] (directly or
/// via `FromStr`/`TryFrom`/serde), so two identifiers compare equal exactly
/// when the hostnames they were built from match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub(crate) fn from_validated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a raw hostname
    pub fn matches(&self, other: &str) -> bool {
        identifiers_match(&self.0, other)
    }
}

/// True when both hostnames name the same registration server
pub fn identifiers_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_identifier(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_identifier(&value)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_match_ignores_case() {
        assert!(identifiers_match("RHN.Redhat.COM", "rhn.redhat.com"));
        assert!(identifiers_match("sat", "SAT"));
        assert!(!identifiers_match("sat1", "sat2"));
    }

    #[test]
    fn test_differently_cased_hostnames_are_one_entity() {
        let a: Identifier = "Satellite.Example.COM".parse().unwrap();
        let b: Identifier = "satellite.example.com".parse().unwrap();

        assert_eq!(a, b);
        assert!(a.matches("SATELLITE.example.com"));
    }

    #[test]
    fn test_serde_validates_and_munges() {
        let identifier: Identifier = serde_json::from_str("\"RHN.redhat.com\"").unwrap();
        assert_eq!(identifier.as_str(), "rhn.redhat.com");
        assert_eq!(
            serde_json::to_string(&identifier).unwrap(),
            "\"rhn.redhat.com\""
        );

        assert!(serde_json::from_str::<Identifier>("\"not a host\"").is_err());
    }
}
