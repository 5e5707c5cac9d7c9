// operations.rs

use crate::error::{CalcError, Result};
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntegerDivide,
    Percent,
    AbsoluteDifference,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::Divide,
        OperationKind::Power,
        OperationKind::Root,
        OperationKind::Modulus,
        OperationKind::IntegerDivide,
        OperationKind::Percent,
        OperationKind::AbsoluteDifference,
    ];

    /// Command word, also the name stored in the history file.
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Multiply => "multiply",
            OperationKind::Divide => "divide",
            OperationKind::Power => "power",
            OperationKind::Root => "root",
            OperationKind::Modulus => "modulus",
            OperationKind::IntegerDivide => "int_divide",
            OperationKind::Percent => "percent",
            OperationKind::AbsoluteDifference => "abs_diff",
        }
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            OperationKind::Add => Ok(a + b),
            OperationKind::Subtract => Ok(a - b),
            OperationKind::Multiply => Ok(a * b),
            OperationKind::Divide => {
                nonzero(b, "Division by zero is not allowed")?;
                Ok(a / b)
            }
            OperationKind::Power => {
                let result = a.powf(b);
                if !result.is_finite() {
                    return Err(CalcError::Domain(format!(
                        "Invalid result for power operation: {} ** {}",
                        a, b
                    )));
                }
                Ok(result)
            }
            OperationKind::Root => root(a, b),
            OperationKind::Modulus => {
                nonzero(b, "Modulus by zero is not allowed")?;
                let r = a % b;
                if r == 0.0 {
                    return Ok(0.0);
                }
                // Remainder takes the sign of the divisor.
                if (r < 0.0) != (b < 0.0) {
                    Ok(r + b)
                } else {
                    Ok(r)
                }
            }
            OperationKind::IntegerDivide => {
                nonzero(b, "Integer division by zero is not allowed")?;
                Ok((a / b).floor())
            }
            OperationKind::Percent => {
                nonzero(b, "Cannot calculate percentage with zero denominator")?;
                Ok((a / b) * 100.0)
            }
            OperationKind::AbsoluteDifference => Ok((a - b).abs()),
        }
    }
}

fn nonzero(b: f64, message: &str) -> Result<()> {
    if b == 0.0 {
        return Err(CalcError::Domain(message.to_string()));
    }
    Ok(())
}

fn root(a: f64, b: f64) -> Result<f64> {
    nonzero(b, "Cannot calculate 0th root")?;
    let result = if a < 0.0 {
        let odd_integer = b.fract() == 0.0 && b % 2.0 != 0.0;
        if !odd_integer {
            return Err(CalcError::Domain(
                "Cannot calculate even or fractional root of negative number".to_string(),
            ));
        }
        -(-a).powf(1.0 / b)
    } else {
        a.powf(1.0 / b)
    };
    if !result.is_finite() {
        return Err(CalcError::Domain(format!("Error computing root: {} root {}", a, b)));
    }
    Ok(result)
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_lowercase();
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| CalcError::InvalidOperation {
                name: wanted,
                available: OperationKind::ALL.iter().map(|k| k.name()).join(", "),
            })
    }
}

/// Maps operation names to their computation, guarding the operand range.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    max_input_value: f64,
}

impl OperationRegistry {
    pub fn new(max_input_value: f64) -> Self {
        Self { max_input_value }
    }

    pub fn compute(&self, kind: OperationKind, a: f64, b: f64) -> Result<f64> {
        self.check_range(a)?;
        self.check_range(b)?;
        kind.apply(a, b)
    }

    /// Parses operand text; `nan` is not a number here, `inf` is out of range.
    pub fn parse_operand(&self, text: &str) -> Result<f64> {
        match text.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => {
                self.check_range(v)?;
                Ok(v)
            }
            _ => Err(CalcError::Parse(text.to_string())),
        }
    }

    fn check_range(&self, value: f64) -> Result<()> {
        if value.abs() > self.max_input_value {
            return Err(CalcError::InputOutOfRange {
                value,
                max: self.max_input_value,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> OperationRegistry {
        OperationRegistry::new(1e308)
    }

    fn is_domain(r: Result<f64>) -> bool {
        matches!(r, Err(CalcError::Domain(_)))
    }

    #[test]
    fn basic_arithmetic() {
        let reg = registry();
        assert_eq!(reg.compute(OperationKind::Add, 2.0, 3.0).unwrap(), 5.0);
        assert_eq!(reg.compute(OperationKind::Subtract, 5.0, 3.0).unwrap(), 2.0);
        assert_eq!(reg.compute(OperationKind::Multiply, 4.0, 2.5).unwrap(), 10.0);
        assert_eq!(reg.compute(OperationKind::Divide, 9.0, 2.0).unwrap(), 4.5);
        assert_eq!(reg.compute(OperationKind::Percent, 25.0, 200.0).unwrap(), 12.5);
        assert_eq!(reg.compute(OperationKind::AbsoluteDifference, 3.0, 10.0).unwrap(), 7.0);
    }

    #[test]
    fn power_and_root_are_inverse() {
        let reg = registry();
        assert_eq!(reg.compute(OperationKind::Power, 2.0, 8.0).unwrap(), 256.0);
        let r = reg.compute(OperationKind::Root, 256.0, 8.0).unwrap();
        assert!((r - 2.0).abs() < 1e-9);
    }

    #[test]
    fn odd_root_of_negative_is_real() {
        let r = registry().compute(OperationKind::Root, -27.0, 3.0).unwrap();
        assert!((r + 3.0).abs() < 1e-9);
    }

    #[test]
    fn root_domain_errors() {
        let reg = registry();
        assert!(is_domain(reg.compute(OperationKind::Root, 8.0, 0.0)));
        assert!(is_domain(reg.compute(OperationKind::Root, -16.0, 2.0)));
        assert!(is_domain(reg.compute(OperationKind::Root, -16.0, 2.5)));
    }

    #[test]
    fn power_domain_errors() {
        let reg = registry();
        assert!(is_domain(reg.compute(OperationKind::Power, -8.0, 0.5)));
        assert!(is_domain(reg.compute(OperationKind::Power, 10.0, 400.0)));
        assert!(is_domain(reg.compute(OperationKind::Power, 0.0, -1.0)));
        assert_eq!(reg.compute(OperationKind::Power, -2.0, 3.0).unwrap(), -8.0);
    }

    #[test]
    fn modulus_follows_divisor_sign() {
        let reg = registry();
        assert_eq!(reg.compute(OperationKind::Modulus, 10.0, 3.0).unwrap(), 1.0);
        assert_eq!(reg.compute(OperationKind::Modulus, -10.0, 3.0).unwrap(), 2.0);
        assert_eq!(reg.compute(OperationKind::Modulus, 10.0, -3.0).unwrap(), -2.0);
        assert_eq!(reg.compute(OperationKind::Modulus, 9.0, 3.0).unwrap(), 0.0);
        let zero = reg.compute(OperationKind::Modulus, -3.0, 3.0).unwrap();
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_positive());
    }

    #[test]
    fn integer_divide_floors() {
        let reg = registry();
        assert_eq!(reg.compute(OperationKind::IntegerDivide, 7.0, 2.0).unwrap(), 3.0);
        assert_eq!(reg.compute(OperationKind::IntegerDivide, -7.0, 2.0).unwrap(), -4.0);
    }

    #[test]
    fn division_family_rejects_zero_divisor() {
        let reg = registry();
        for kind in [
            OperationKind::Divide,
            OperationKind::Modulus,
            OperationKind::IntegerDivide,
            OperationKind::Percent,
        ] {
            assert!(is_domain(reg.compute(kind, 5.0, 0.0)), "{kind}");
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.name().parse::<OperationKind>().unwrap(), kind);
        }
        assert_eq!("ADD".parse::<OperationKind>().unwrap(), OperationKind::Add);
    }

    #[test]
    fn unknown_name_is_invalid_operation() {
        let err = "sqrt".parse::<OperationKind>().unwrap_err();
        match err {
            CalcError::InvalidOperation { name, available } => {
                assert_eq!(name, "sqrt");
                assert!(available.starts_with("add, subtract"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn operands_are_range_checked() {
        let reg = OperationRegistry::new(100.0);
        assert!(matches!(
            reg.compute(OperationKind::Add, 101.0, 1.0),
            Err(CalcError::InputOutOfRange { .. })
        ));
        assert!(matches!(
            reg.compute(OperationKind::Add, 1.0, -101.0),
            Err(CalcError::InputOutOfRange { .. })
        ));
        assert_eq!(reg.compute(OperationKind::Add, 100.0, -100.0).unwrap(), 0.0);
    }

    #[test]
    fn parse_operand_rejects_garbage_and_nan() {
        let reg = registry();
        assert_eq!(reg.parse_operand(" 2.5 ").unwrap(), 2.5);
        assert!(matches!(reg.parse_operand("abc"), Err(CalcError::Parse(_))));
        assert!(matches!(reg.parse_operand("nan"), Err(CalcError::Parse(_))));
        assert!(matches!(reg.parse_operand("inf"), Err(CalcError::InputOutOfRange { .. })));
    }

    proptest! {
        #[test]
        fn add_subtract_multiply_are_exact(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            let reg = registry();
            prop_assert_eq!(reg.compute(OperationKind::Add, a, b).unwrap(), a + b);
            prop_assert_eq!(reg.compute(OperationKind::Subtract, a, b).unwrap(), a - b);
            prop_assert_eq!(reg.compute(OperationKind::Multiply, a, b).unwrap(), a * b);
            prop_assert_eq!(reg.compute(OperationKind::AbsoluteDifference, a, b).unwrap(), (a - b).abs());
        }

        #[test]
        fn division_by_zero_never_yields_a_value(a in -1e6f64..1e6) {
            let reg = registry();
            for kind in [OperationKind::Divide, OperationKind::Modulus, OperationKind::IntegerDivide, OperationKind::Percent] {
                prop_assert!(is_domain(reg.compute(kind, a, 0.0)));
            }
        }
    }
}
