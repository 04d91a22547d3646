//! Parser for `X:Y:Z:MASS` point-mass records.
//!
//! One record per line, four decimal real numbers separated by `:`.
//! The line handed to [`parse_record`] must already have its terminator
//! stripped; any remaining whitespace makes the record malformed.

use crate::error::{ParseError, RecordField};
use crate::point::PointMass;

/// Separator between the fields of a record.
pub const FIELD_DELIMITER: char = ':';

/// Parse a single record into a [`PointMass`].
///
/// # Errors
///
/// Returns a [`ParseError`] for blank lines, the wrong number of fields,
/// non-numeric or non-finite fields, and masses that are not strictly
/// positive. Every error is per-record; callers skip the line and
/// continue.
pub fn parse_record(line: &str) -> Result<PointMass, ParseError> {
    if line.trim().is_empty() {
        return Err(ParseError::Blank);
    }

    let mut values = [0.0f64; 4];
    let mut found = 0usize;
    for (i, text) in line.split(FIELD_DELIMITER).enumerate() {
        found += 1;
        if i >= values.len() {
            continue;
        }
        let field = RecordField::ALL[i];
        let value: f64 = text.parse().map_err(|_| ParseError::InvalidNumber {
            field,
            text: text.to_string(),
        })?;
        if !value.is_finite() {
            return Err(ParseError::NonFinite { field });
        }
        values[i] = value;
    }
    if found != values.len() {
        return Err(ParseError::FieldCount { found });
    }

    let [x, y, z, mass] = values;
    if mass <= 0.0 {
        return Err(ParseError::NonPositiveMass {
            mass: mass.to_string(),
        });
    }
    Ok(PointMass::new(x, y, z, mass))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_record() {
        let p = parse_record("-3:4:100:2").unwrap();
        assert_eq!(p, PointMass::new(-3.0, 4.0, 100.0, 2.0));
    }

    #[test]
    fn parses_real_record() {
        let p = parse_record("0.5:-1.25:1e3:0.001").unwrap();
        assert_eq!(p, PointMass::new(0.5, -1.25, 1000.0, 0.001));
    }

    #[test]
    fn blank_lines_are_rejected() {
        assert_eq!(parse_record(""), Err(ParseError::Blank));
        assert_eq!(parse_record("   "), Err(ParseError::Blank));
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        assert!(matches!(
            parse_record(" 1:2:3:4"),
            Err(ParseError::InvalidNumber {
                field: RecordField::X,
                ..
            })
        ));
        assert!(matches!(
            parse_record("1:2:3:4 "),
            Err(ParseError::InvalidNumber {
                field: RecordField::Mass,
                ..
            })
        ));
        assert!(parse_record("1:2:3:4\n").is_err());
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        assert_eq!(parse_record("1:2:3"), Err(ParseError::FieldCount { found: 3 }));
        assert_eq!(
            parse_record("1:2:3:4:5"),
            Err(ParseError::FieldCount { found: 5 })
        );
        assert!(matches!(
            parse_record("abc"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        assert_eq!(
            parse_record("1:two:3:4"),
            Err(ParseError::InvalidNumber {
                field: RecordField::Y,
                text: "two".into()
            })
        );
        assert!(parse_record("1::3:4").is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            parse_record("inf:0:0:1"),
            Err(ParseError::NonFinite {
                field: RecordField::X
            })
        );
        assert_eq!(
            parse_record("0:0:0:NaN"),
            Err(ParseError::NonFinite {
                field: RecordField::Mass
            })
        );
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        assert!(matches!(
            parse_record("0:0:0:0"),
            Err(ParseError::NonPositiveMass { .. })
        ));
        assert!(matches!(
            parse_record("0:0:0:-2.5"),
            Err(ParseError::NonPositiveMass { .. })
        ));
        assert!(parse_record("0:0:0:-0").is_err());
    }

    #[test]
    fn display_output_parses_back() {
        let p = PointMass::new(0.1, -7.25, 1.0e-7, 3.5);
        assert_eq!(parse_record(&p.to_string()), Ok(p));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positive_mass_records_parse(
                x in -1.0e9f64..1.0e9,
                y in -1.0e9f64..1.0e9,
                z in -1.0e9f64..1.0e9,
                m in 1.0e-9f64..1.0e9,
            ) {
                let p = PointMass::new(x, y, z, m);
                prop_assert_eq!(parse_record(&p.to_string()), Ok(p));
            }

            #[test]
            fn non_positive_mass_never_parses(m in -1.0e9f64..=0.0) {
                let line = format!("1:2:3:{m}");
                prop_assert!(parse_record(&line).is_err());
            }

            #[test]
            fn arbitrary_text_never_panics(s in "\\PC*") {
                let _ = parse_record(&s);
            }
        }
    }
}
