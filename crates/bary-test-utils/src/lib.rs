//! Test utilities and fixtures for bary development.
//!
//! Provides shorthand point construction, record-text builders, seeded
//! random collections, multiset comparison, and a reader that fails
//! part-way through a stream.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    assert_bit_identical, bit_key, failing_reader, pm, random_points, records, sorted_by_bits,
    FailingReader,
};
