//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers Ward deals with. The SSN is the
//! business key of a patient; the numeric ids are assigned by the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social security number newtype wrapper
///
/// The business identifier of a patient. Always formatted as three digits,
/// hyphen, two digits, hyphen, four digits.
///
/// # Examples
///
/// ```
/// use ward::domain::ids::Ssn;
/// use std::str::FromStr;
///
/// let ssn = Ssn::from_str("123-45-6789").unwrap();
/// assert_eq!(ssn.as_str(), "123-45-6789");
/// assert!(Ssn::new("123456789").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ssn(String);

impl Ssn {
    /// Creates a new Ssn, validating the `DDD-DD-DDDD` format
    ///
    /// # Arguments
    ///
    /// * `ssn` - The SSN string
    ///
    /// # Returns
    ///
    /// Returns `Ok(Ssn)` if the format is valid, `Err` otherwise
    pub fn new(ssn: impl Into<String>) -> Result<Self, String> {
        let ssn = ssn.into();
        if ssn.trim().is_empty() {
            return Err("SSN is required".to_string());
        }
        if !is_ssn_format(&ssn) {
            return Err("SSN must be in format XXX-XX-XXXX".to_string());
        }
        Ok(Self(ssn))
    }

    /// Returns the SSN as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

// ASCII digits only; three-two-four groups separated by hyphens
fn is_ssn_format(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 11
        && bytes.iter().enumerate().all(|(i, b)| match i {
            3 | 6 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl fmt::Display for Ssn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ssn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ssn {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ssn> for String {
    fn from(ssn: Ssn) -> Self {
        ssn.0
    }
}

impl AsRef<str> for Ssn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Store-assigned patient identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(i64);

impl PatientId {
    /// Wraps a raw identifier
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PatientId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Store-assigned appointment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(i64);

impl AppointmentId {
    /// Wraps a raw identifier
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AppointmentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
