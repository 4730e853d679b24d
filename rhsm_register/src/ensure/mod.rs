//! The `ensure` property: a two-state lifecycle and its in-sync decision

use crate::resource::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registration lifecycle state, desired or observed
///
/// There are no transitional states; a provider leaves the system in exactly
/// one of these or reports an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsureState {
    #[default]
    Present,
    Absent,
}

impl EnsureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnsureState::Present => "present",
            EnsureState::Absent => "absent",
        }
    }
}

impl fmt::Display for EnsureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnsureState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(EnsureState::Present),
            "absent" => Ok(EnsureState::Absent),
            other => Err(ValidationError::InvalidFormat {
                parameter: "ensure",
                value: other.to_string(),
                expected: "one of 'present' or 'absent'",
            }),
        }
    }
}

/// Decide whether the observed state already satisfies the desired one
///
/// `desired` lists every acceptable state in declaration order. The first
/// exact match wins; an exhausted (or empty) list means out of sync.
pub fn in_sync(desired: &[EnsureState], observed: EnsureState) -> bool {
    for should in desired {
        match should {
            EnsureState::Present if observed == EnsureState::Present => return true,
            EnsureState::Absent if observed == EnsureState::Absent => return true,
            _ => {}
        }
    }
    false
}
