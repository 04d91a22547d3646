//! The [`PointMass`] value and its mass-weighted combinators.
//!
//! Combination happens in mass-weighted space: each operand's position is
//! scaled by its mass, the scaled positions and masses are summed, and
//! the sum is scaled back by the total mass. A plain arithmetic mean of two
//! aggregates would pull the centroid toward whichever side holds fewer
//! original points, so the unweighted form is never used.

use std::fmt;

use crate::error::CombineError;

/// A position in three-dimensional space with an associated mass.
///
/// Values are immutable once constructed; [`combine`](Self::combine)
/// always returns a fresh value. Anything produced by the record parser
/// or by combination has a strictly positive mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMass {
    x: f64,
    y: f64,
    z: f64,
    mass: f64,
}

impl PointMass {
    /// Create a point mass from raw components.
    ///
    /// No validation is performed here; [`parse_record`](crate::parse_record)
    /// is the checked entry point for external data.
    pub const fn new(x: f64, y: f64, z: f64, mass: f64) -> Self {
        Self { x, y, z, mass }
    }

    /// First spatial coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Second spatial coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Third spatial coordinate.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Position as `[x, y, z]`.
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.mass.is_finite()
    }

    /// Whether the mass is strictly positive (false for NaN).
    pub fn has_positive_mass(&self) -> bool {
        self.mass > 0.0
    }

    /// Combine two point masses into their mass-weighted centroid.
    ///
    /// The resulting mass is exactly `self.mass() + other.mass()`.
    /// The operation is bit-for-bit commutative but not associative, so
    /// callers that need reproducible output must fix the pairing order.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::DegenerateMass`] if either mass is not
    /// strictly positive, and [`CombineError::NonFiniteResult`] if the
    /// weighted sum overflows.
    pub fn combine(&self, other: &PointMass) -> Result<PointMass, CombineError> {
        if !self.has_positive_mass() || !other.has_positive_mass() {
            return Err(CombineError::DegenerateMass {
                left: self.mass,
                right: other.mass,
            });
        }
        let a = self.to_weighted();
        let b = other.to_weighted();
        let combined =
            PointMass::new(a.x + b.x, a.y + b.y, a.z + b.z, a.mass + b.mass).from_weighted();
        if !combined.is_finite() {
            return Err(CombineError::NonFiniteResult {
                left: *self,
                right: *other,
            });
        }
        Ok(combined)
    }

    /// Scale position by mass. Mass is carried unchanged.
    fn to_weighted(self) -> PointMass {
        PointMass::new(
            self.x * self.mass,
            self.y * self.mass,
            self.z * self.mass,
            self.mass,
        )
    }

    /// Inverse of [`to_weighted`](Self::to_weighted). Caller guarantees `mass > 0`.
    fn from_weighted(self) -> PointMass {
        PointMass::new(
            self.x / self.mass,
            self.y / self.mass,
            self.z / self.mass,
            self.mass,
        )
    }
}

/// Renders the `X:Y:Z:MASS` record form. Uses the shortest float
/// representation that round-trips, so the output parses back to the
/// identical value.
impl fmt::Display for PointMass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.x, self.y, self.z, self.mass)
    }
}

/// Single-pass accumulator in mass-weighted space.
///
/// Sums `x*m, y*m, z*m, m` over every pushed point and divides once in
/// [`finish`](Self::finish). This is the linear counterpart of repeated
/// [`PointMass::combine`] calls and rounds differently from it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeightedSum {
    wx: f64,
    wy: f64,
    wz: f64,
    mass: f64,
    count: usize,
}

impl WeightedSum {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one point.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::DegenerateMass`] if the point's mass is not
    /// strictly positive, and [`CombineError::NonFiniteResult`] if adding
    /// it would overflow the sums or the barycenter. Either way the
    /// accumulator is left unchanged, so [`finish`](Self::finish) only
    /// ever yields finite values.
    pub fn push(&mut self, p: &PointMass) -> Result<(), CombineError> {
        if !p.has_positive_mass() {
            return Err(CombineError::DegenerateMass {
                left: self.mass,
                right: p.mass,
            });
        }
        let next = Self {
            wx: self.wx + p.x * p.mass,
            wy: self.wy + p.y * p.mass,
            wz: self.wz + p.z * p.mass,
            mass: self.mass + p.mass,
            count: self.count + 1,
        };
        if !next.barycenter().is_finite() {
            return Err(CombineError::NonFiniteResult {
                left: self.finish().unwrap_or(PointMass::new(0.0, 0.0, 0.0, 0.0)),
                right: *p,
            });
        }
        *self = next;
        Ok(())
    }

    /// Number of points accumulated so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The barycenter of everything pushed, or `None` if nothing was.
    pub fn finish(&self) -> Option<PointMass> {
        if self.count == 0 {
            return None;
        }
        Some(self.barycenter())
    }

    fn barycenter(&self) -> PointMass {
        PointMass::new(self.wx, self.wy, self.wz, self.mass).from_weighted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_masses_meet_in_the_middle() {
        let a = PointMass::new(0.0, 0.0, 0.0, 1.0);
        let b = PointMass::new(10.0, 0.0, 0.0, 1.0);
        let c = a.combine(&b).unwrap();
        assert_eq!(c, PointMass::new(5.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn heavier_point_pulls_the_centroid() {
        let a = PointMass::new(0.0, 0.0, 0.0, 1.0);
        let b = PointMass::new(10.0, 0.0, 0.0, 3.0);
        let c = a.combine(&b).unwrap();
        assert_eq!(c.x(), 7.5);
        assert_eq!(c.mass(), 4.0);
    }

    #[test]
    fn combine_does_not_touch_operands() {
        let a = PointMass::new(1.0, 2.0, 3.0, 4.0);
        let b = PointMass::new(-1.0, -2.0, -3.0, 4.0);
        let _ = a.combine(&b).unwrap();
        assert_eq!(a, PointMass::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(b, PointMass::new(-1.0, -2.0, -3.0, 4.0));
    }

    #[test]
    fn zero_mass_is_degenerate() {
        let a = PointMass::new(0.0, 0.0, 0.0, 0.0);
        let b = PointMass::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(
            a.combine(&b),
            Err(CombineError::DegenerateMass {
                left: 0.0,
                right: 1.0
            })
        );
        assert!(b.combine(&a).is_err());
    }

    #[test]
    fn negative_and_nan_mass_are_degenerate() {
        let ok = PointMass::new(0.0, 0.0, 0.0, 1.0);
        assert!(ok.combine(&PointMass::new(0.0, 0.0, 0.0, -1.0)).is_err());
        assert!(ok.combine(&PointMass::new(0.0, 0.0, 0.0, f64::NAN)).is_err());
    }

    #[test]
    fn display_is_record_format() {
        let p = PointMass::new(-3.0, 4.5, 100.0, 2.0);
        assert_eq!(p.to_string(), "-3:4.5:100:2");
    }

    #[test]
    fn weighted_sum_matches_hand_computation() {
        let mut sum = WeightedSum::new();
        sum.push(&PointMass::new(0.0, 0.0, 0.0, 1.0)).unwrap();
        sum.push(&PointMass::new(10.0, 0.0, 0.0, 3.0)).unwrap();
        let c = sum.finish().unwrap();
        assert_eq!(c.x(), 7.5);
        assert_eq!(c.mass(), 4.0);
        assert_eq!(sum.count(), 2);
    }

    #[test]
    fn weighted_sum_empty_and_rejects() {
        let mut sum = WeightedSum::new();
        assert!(sum.finish().is_none());
        assert!(sum.push(&PointMass::new(1.0, 1.0, 1.0, 0.0)).is_err());
        assert_eq!(sum.count(), 0);
    }

    #[test]
    fn overflowing_total_mass_is_rejected() {
        let a = PointMass::new(1.0, 0.0, 0.0, 1e308);
        let b = PointMass::new(3.0, 0.0, 0.0, 1e308);
        assert_eq!(
            a.combine(&b),
            Err(CombineError::NonFiniteResult { left: a, right: b })
        );
    }

    #[test]
    fn overflowing_weighted_coordinate_is_rejected() {
        let a = PointMass::new(1e300, 0.0, 0.0, 1e10);
        let b = PointMass::new(-1e300, 0.0, 0.0, 1e10);
        assert!(matches!(
            a.combine(&b),
            Err(CombineError::NonFiniteResult { .. })
        ));
    }

    #[test]
    fn weighted_sum_rejects_overflow_and_keeps_state() {
        let mut sum = WeightedSum::new();
        sum.push(&PointMass::new(1.0, 0.0, 0.0, 1e308)).unwrap();
        let err = sum.push(&PointMass::new(3.0, 0.0, 0.0, 1e308)).unwrap_err();
        assert!(matches!(err, CombineError::NonFiniteResult { .. }));
        assert_eq!(sum.count(), 1);
        assert_eq!(sum.finish(), Some(PointMass::new(1.0, 0.0, 0.0, 1e308)));

        let mut sum = WeightedSum::new();
        assert!(sum.push(&PointMass::new(1e300, 0.0, 0.0, 1e10)).is_err());
        assert!(sum.finish().is_none());
    }

    // ── proptest ───────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_point() -> impl Strategy<Value = PointMass> {
            (
                -1.0e6f64..1.0e6,
                -1.0e6f64..1.0e6,
                -1.0e6f64..1.0e6,
                1.0e-3f64..1.0e6,
            )
                .prop_map(|(x, y, z, m)| PointMass::new(x, y, z, m))
        }

        proptest! {
            #[test]
            fn mass_is_additive(a in arb_point(), b in arb_point()) {
                let c = a.combine(&b).unwrap();
                prop_assert_eq!(c.mass(), a.mass() + b.mass());
            }

            #[test]
            fn combine_is_commutative_bitwise(a in arb_point(), b in arb_point()) {
                let ab = a.combine(&b).unwrap();
                let ba = b.combine(&a).unwrap();
                prop_assert_eq!(ab.x().to_bits(), ba.x().to_bits());
                prop_assert_eq!(ab.y().to_bits(), ba.y().to_bits());
                prop_assert_eq!(ab.z().to_bits(), ba.z().to_bits());
                prop_assert_eq!(ab.mass().to_bits(), ba.mass().to_bits());
            }

            #[test]
            fn centroid_lies_between_operands(a in arb_point(), b in arb_point()) {
                let c = a.combine(&b).unwrap();
                for (pa, pb, pc) in [(a.x(), b.x(), c.x()), (a.y(), b.y(), c.y()), (a.z(), b.z(), c.z())] {
                    let lo = pa.min(pb);
                    let hi = pa.max(pb);
                    let slack = 1e-9 * (1.0 + lo.abs().max(hi.abs()));
                    prop_assert!(pc >= lo - slack && pc <= hi + slack, "{pc} outside [{lo}, {hi}]");
                }
            }
        }
    }
}
