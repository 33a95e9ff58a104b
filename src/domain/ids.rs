//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Open Contracting ID newtype wrapper
///
/// Identifies one procurement process across all of its release versions.
/// Format is `{prefix}-{publisher}-{local id}`, e.g. `ocds-h6vhtk-04f1c2`.
///
/// # Examples
///
/// ```
/// use tenderflow::domain::ids::Ocid;
/// use std::str::FromStr;
///
/// let ocid = Ocid::from_str("ocds-h6vhtk-04f1c2").unwrap();
/// assert_eq!(ocid.local_segment(), "04f1c2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ocid(String);

impl Ocid {
    /// Creates a new Ocid, rejecting empty or whitespace-only values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("OCID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the OCID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final `-`-delimited segment, unique per notice within a publisher
    pub fn local_segment(&self) -> &str {
        local_segment(&self.0)
    }
}

/// Final `-`-delimited segment of a raw OCID string
///
/// Returns the whole input when it contains no `-`.
pub fn local_segment(ocid: &str) -> &str {
    ocid.rsplit('-').next().unwrap_or(ocid)
}

impl fmt::Display for Ocid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ocid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Ocid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
