//! Core types for the bary barycenter engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the [`PointMass`] value, the mass-weighted combinator used by every
//! reduction strategy, the `X:Y:Z:MASS` record parser, and the error
//! types those operations return.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod parse;
pub mod point;

pub use error::{CombineError, ParseError, RecordField};
pub use parse::{parse_record, FIELD_DELIMITER};
pub use point::{PointMass, WeightedSum};
