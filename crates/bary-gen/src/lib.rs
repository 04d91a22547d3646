//! Synthetic point-mass data for exercising the bary engine.
//!
//! Produces records in the exact `X:Y:Z:MASS` format the record parser
//! accepts. Coordinates are integers uniform in
//! `[-position_bound, position_bound)` and masses are integers uniform in
//! `[1, mass_bound)`.
//!
//! Respects the determinism contract: every [`Generator`] owns a
//! `ChaCha8Rng` seeded from [`GeneratorConfig::seed`], so identical
//! configurations produce identical files. There is no process-wide RNG.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::error::Error;
use std::fmt;
use std::io::{self, Write};

use bary_core::PointMass;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Default maximum deviation from the origin along any axis.
pub const DEFAULT_POSITION_BOUND: i64 = 100;

/// Default exclusive upper bound on generated masses.
pub const DEFAULT_MASS_BOUND: i64 = 5;

// ── GeneratorConfig ───────────────────────────────────────────────

/// Shape of a synthetic data set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of records to produce.
    pub count: u64,
    /// Coordinates fall in `[-position_bound, position_bound)`. Must be at least 1.
    pub position_bound: i64,
    /// Masses fall in `[1, mass_bound)`. Must be at least 2.
    pub mass_bound: i64,
    /// RNG seed.
    pub seed: u64,
}

impl GeneratorConfig {
    /// `count` records with the default bounds and the given seed.
    pub fn new(count: u64, seed: u64) -> Self {
        Self {
            count,
            position_bound: DEFAULT_POSITION_BOUND,
            mass_bound: DEFAULT_MASS_BOUND,
            seed,
        }
    }

    /// Check bounds.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.position_bound < 1 {
            return Err(GeneratorError::InvalidPositionBound {
                value: self.position_bound,
            });
        }
        if self.mass_bound < 2 {
            return Err(GeneratorError::InvalidMassBound {
                value: self.mass_bound,
            });
        }
        Ok(())
    }
}

// ── GeneratorError ────────────────────────────────────────────────

/// Errors from configuring or running the generator.
#[derive(Debug)]
pub enum GeneratorError {
    /// `position_bound` is below 1.
    InvalidPositionBound {
        /// The rejected value.
        value: i64,
    },
    /// `mass_bound` is below 2, leaving no positive mass to draw.
    InvalidMassBound {
        /// The rejected value.
        value: i64,
    },
    /// Writing records failed.
    Io(io::Error),
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPositionBound { value } => {
                write!(f, "position_bound must be at least 1, got {value}")
            }
            Self::InvalidMassBound { value } => {
                write!(f, "mass_bound must be at least 2, got {value}")
            }
            Self::Io(e) => write!(f, "writing records: {e}"),
        }
    }
}

impl Error for GeneratorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GeneratorError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ── Generator ─────────────────────────────────────────────────────

/// Iterator over `count` synthetic point masses.
#[derive(Debug)]
pub struct Generator {
    rng: ChaCha8Rng,
    remaining: u64,
    position_bound: i64,
    mass_bound: i64,
}

impl Generator {
    /// Build a generator from a validated configuration.
    pub fn new(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            remaining: config.count,
            position_bound: config.position_bound,
            mass_bound: config.mass_bound,
        })
    }

    fn coordinate(&mut self) -> f64 {
        self.rng
            .random_range(-self.position_bound..self.position_bound) as f64
    }
}

impl Iterator for Generator {
    type Item = PointMass;

    fn next(&mut self) -> Option<PointMass> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let x = self.coordinate();
        let y = self.coordinate();
        let z = self.coordinate();
        let mass = self.rng.random_range(1..self.mass_bound) as f64;
        Some(PointMass::new(x, y, z, mass))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Write `config.count` records to `out`, one per line. Returns the
/// number of records written.
pub fn write_records<W: Write>(config: &GeneratorConfig, mut out: W) -> Result<u64, GeneratorError> {
    let mut written = 0u64;
    for point in Generator::new(config)? {
        writeln!(out, "{point}")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
