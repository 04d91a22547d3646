//! Error types for point-mass parsing and combination.
//!
//! [`ParseError`] is per-record and recoverable: ingestion counts it and
//! moves on. [`CombineError`] is an invariant violation: a reduction that
//! hits one must abort rather than report a wrong barycenter.

use std::error::Error;
use std::fmt;

use crate::point::PointMass;

/// One of the four fields of an `X:Y:Z:MASS` record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// First spatial coordinate.
    X,
    /// Second spatial coordinate.
    Y,
    /// Third spatial coordinate.
    Z,
    /// Mass of the point.
    Mass,
}

impl RecordField {
    /// Fields in record order.
    pub const ALL: [RecordField; 4] = [Self::X, Self::Y, Self::Z, Self::Mass];
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
            Self::Mass => write!(f, "mass"),
        }
    }
}

/// Why a single record could not be turned into a [`PointMass`](crate::PointMass).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The line is empty.
    Blank,
    /// The line does not split into exactly four colon-separated fields.
    FieldCount {
        /// Number of fields actually found.
        found: usize,
    },
    /// A field is not a decimal real number. Surrounding whitespace
    /// counts as malformed.
    InvalidNumber {
        /// Which field failed.
        field: RecordField,
        /// The offending text.
        text: String,
    },
    /// A field parsed to infinity or NaN.
    NonFinite {
        /// Which field failed.
        field: RecordField,
    },
    /// The mass field is zero or negative.
    NonPositiveMass {
        /// Display form of the rejected mass.
        mass: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "blank record"),
            Self::FieldCount { found } => {
                write!(f, "expected 4 colon-separated fields, found {found}")
            }
            Self::InvalidNumber { field, text } => {
                write!(f, "field {field} is not a number: {text:?}")
            }
            Self::NonFinite { field } => write!(f, "field {field} is not finite"),
            Self::NonPositiveMass { mass } => {
                write!(f, "mass must be strictly positive, got {mass}")
            }
        }
    }
}

impl Error for ParseError {}

/// Errors from [`PointMass::combine`](crate::PointMass::combine).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CombineError {
    /// An operand has zero, negative, or NaN mass; combining it would
    /// divide by a non-positive total.
    DegenerateMass {
        /// Mass of the left operand.
        left: f64,
        /// Mass of the right operand.
        right: f64,
    },
    /// The weighted sum overflowed, so the combined coordinate or mass is
    /// infinite or NaN.
    NonFiniteResult {
        /// Left operand. For a [`WeightedSum`](crate::WeightedSum), the
        /// barycenter accumulated so far (all zeros when empty).
        left: PointMass,
        /// Right operand.
        right: PointMass,
    },
}

impl fmt::Display for CombineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateMass { left, right } => write!(
                f,
                "cannot combine point masses with masses {left} and {right}: both must be positive"
            ),
            Self::NonFiniteResult { left, right } => write!(
                f,
                "combining {left} with {right} overflows to a non-finite result"
            ),
        }
    }
}

impl Error for CombineError {}
