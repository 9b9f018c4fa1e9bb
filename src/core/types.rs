//! core::types
//!
//! Strong types for gradebook identifiers and values.
//!
//! # Types
//!
//! - [`StudentId`] - Student identifier
//! - [`AssignmentId`] - Assignment identifier
//! - [`GroupId`] - Student group number
//! - [`GradeValue`] - Grade on the 1..=10 scale
//!
//! # Validation
//!
//! Values that have a restricted range are checked at construction time,
//! so an out-of-range grade cannot be represented.
//!
//! # Examples
//!
//! ```
//! use gradebook::core::types::{GradeValue, StudentId};
//!
//! let id: StudentId = "1234".parse().unwrap();
//! assert_eq!(id.get(), 1234);
//!
//! assert!(GradeValue::new(10).is_ok());
//! assert!(GradeValue::new(0).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid {kind} '{value}': expected a non-negative whole number")]
    InvalidId { kind: &'static str, value: String },

    #[error("invalid grade {0}: must be between 1 and 10")]
    InvalidGrade(i64),

    #[error("invalid grade '{0}': expected a whole number")]
    UnparsableGrade(String),

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw identifier.
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u32>()
                    .map(Self)
                    .map_err(|_| TypeError::InvalidId {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Unique student identifier.
    StudentId,
    "student id"
);

numeric_id!(
    /// Unique assignment identifier.
    AssignmentId,
    "assignment id"
);

numeric_id!(
    /// Student group number.
    GroupId,
    "group"
);

/// A grade between [`GradeValue::MIN`] and [`GradeValue::MAX`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GradeValue(u8);

impl GradeValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Create a validated grade.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidGrade` if `value` is outside `1..=10`.
    pub fn new(value: i64) -> Result<Self, TypeError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // In range, so the narrowing cannot truncate.
            Ok(Self(value as u8))
        } else {
            Err(TypeError::InvalidGrade(value))
        }
    }

    /// The grade as a number.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for GradeValue {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<GradeValue> for u8 {
    fn from(value: GradeValue) -> Self {
        value.0
    }
}

impl FromStr for GradeValue {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| TypeError::UnparsableGrade(s.to_string()))?;
        Self::new(raw)
    }
}

impl fmt::Display for GradeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a `YYYY-MM-DD` deadline.
///
/// # Errors
///
/// Returns `TypeError::InvalidDate` if the string is not a calendar date.
pub fn parse_date(s: &str) -> Result<chrono::NaiveDate, TypeError> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| TypeError::InvalidDate(s.to_string()))
}

/// Trim `value`, rejecting it if nothing is left.
///
/// # Errors
///
/// Returns `TypeError::Empty` naming `field`.
pub fn non_empty(field: &'static str, value: &str) -> Result<String, TypeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(TypeError::Empty(field))
    } else {
        Ok(trimmed.to_string())
    }
}
