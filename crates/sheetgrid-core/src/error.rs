//! Error types for sheetgrid.
//!
//! Provides [`GridError`] for conditions that stop a page's reconstruction
//! and [`TokenDefect`] describing why a single token was rejected.

use std::fmt;

/// Coordinate axis of a token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
}

impl Axis {
    /// Returns the lowercase field name for this axis.
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a token could not be accepted for reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenDefect {
    /// A required field (`text`, `x` or `y`) was absent.
    MissingField(&'static str),
    /// A field held a value of the wrong type, or the entry was not an
    /// object at all (reported as `"token"`).
    WrongType(&'static str),
    /// A position was NaN or infinite.
    NonFinite {
        /// Axis carrying the bad value.
        axis: Axis,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for TokenDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenDefect::MissingField(name) => write!(f, "missing field '{name}'"),
            TokenDefect::WrongType(name) => write!(f, "wrong type for '{name}'"),
            TokenDefect::NonFinite { axis, value } => {
                write!(f, "non-finite {axis} position ({value})")
            }
        }
    }
}

/// Fatal error for a single reconstruction call.
///
/// A reconstruction either produces a complete [`Sheet`](crate::Sheet) or one
/// of these; partially processed pages are never returned.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A settings value is outside its valid domain.
    InvalidConfiguration {
        /// Name of the offending setting (e.g., "row_tolerance").
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },
    /// A token was missing data, had a wrongly typed field, or carried a
    /// non-finite position.
    MalformedToken {
        /// Index of the token within its page (0-based).
        index: usize,
        /// What was wrong with it.
        defect: TokenDefect,
    },
    /// A page index beyond the end of the document was requested.
    PageOutOfRange {
        /// The requested page (0-based).
        index: usize,
        /// Number of pages available.
        page_count: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidConfiguration {
                field,
                value,
                reason,
            } => write!(f, "invalid configuration: {field} = {value} ({reason})"),
            GridError::MalformedToken { index, defect } => {
                write!(f, "malformed token #{index}: {defect}")
            }
            GridError::PageOutOfRange { index, page_count } => write!(
                f,
                "page index {index} out of range (document has {page_count} pages)"
            ),
        }
    }
}

impl std::error::Error for GridError {}

impl GridError {
    /// Returns `true` for errors caused by settings rather than page content.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GridError::InvalidConfiguration { .. })
    }
}
