//! Reusable point-mass fixtures.
//!
//! - [`pm`]: terse [`PointMass`] constructor.
//! - [`records`]: render points as `X:Y:Z:MASS` text, one per line.
//! - [`random_points`]: deterministic collection from the generator.
//! - [`sorted_by_bits`]: canonical order for multiset comparison.
//! - [`FailingReader`]: serves a prefix, then returns an I/O error.

use std::io::{self, BufReader, Read};

use bary_core::PointMass;
use bary_gen::{Generator, GeneratorConfig};

pub fn pm(x: f64, y: f64, z: f64, mass: f64) -> PointMass {
    PointMass::new(x, y, z, mass)
}

/// Newline-terminated record text for `points`, in order.
pub fn records(points: &[PointMass]) -> String {
    let mut out = String::new();
    for p in points {
        out.push_str(&p.to_string());
        out.push('\n');
    }
    out
}

/// `count` generated points with the default bounds.
pub fn random_points(count: u64, seed: u64) -> Vec<PointMass> {
    Generator::new(&GeneratorConfig::new(count, seed))
        .expect("default generator config is valid")
        .collect()
}

/// Bit patterns of every component, usable as a total-order sort key.
pub fn bit_key(p: &PointMass) -> [u64; 4] {
    [
        p.x().to_bits(),
        p.y().to_bits(),
        p.z().to_bits(),
        p.mass().to_bits(),
    ]
}

/// Sort into a canonical order so two multisets compare with `==`.
pub fn sorted_by_bits(mut points: Vec<PointMass>) -> Vec<PointMass> {
    points.sort_by_key(bit_key);
    points
}

/// Panics unless every component of `a` and `b` has the same bits.
pub fn assert_bit_identical(a: &PointMass, b: &PointMass) {
    assert_eq!(bit_key(a), bit_key(b), "{a:?} and {b:?} differ bitwise");
}

/// Serves `prefix`, then fails every subsequent read.
pub struct FailingReader {
    prefix: io::Cursor<Vec<u8>>,
}

impl FailingReader {
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: io::Cursor::new(prefix.into()),
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.prefix.read(buf)? {
            0 => Err(io::Error::other("injected read failure")),
            n => Ok(n),
        }
    }
}

/// A buffered [`FailingReader`], ready to hand to an ingestion entry point.
pub fn failing_reader(prefix: impl Into<Vec<u8>>) -> BufReader<FailingReader> {
    BufReader::new(FailingReader::new(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    #[test]
    fn records_round_trip_through_display() {
        let text = records(&[pm(1.0, 2.0, 3.0, 4.0), pm(-0.5, 0.0, 9.0, 1.5)]);
        assert_eq!(text, "1:2:3:4\n-0.5:0:9:1.5\n");
    }

    #[test]
    fn random_points_are_deterministic() {
        assert_eq!(random_points(20, 5), random_points(20, 5));
    }

    #[test]
    fn sorted_by_bits_ignores_input_order() {
        let a = vec![pm(1.0, 0.0, 0.0, 1.0), pm(0.0, 0.0, 0.0, 2.0)];
        let b = vec![pm(0.0, 0.0, 0.0, 2.0), pm(1.0, 0.0, 0.0, 1.0)];
        assert_eq!(sorted_by_bits(a), sorted_by_bits(b));
    }

    #[test]
    fn failing_reader_fails_after_prefix() {
        let mut r = failing_reader("1:1:1:1\n");
        let mut line = String::new();
        assert_eq!(r.read_line(&mut line).unwrap(), 8);
        line.clear();
        assert!(r.read_line(&mut line).is_err());
    }
}
