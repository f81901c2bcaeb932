//! Binary, comparison, and unary operators.
//!
//! Grounded on `littrs::operators`' shape (one `apply_*` entry point per
//! operator family, small numeric helpers underneath), reworked around the
//! common-type rule of `spec.md` §4.3 instead of Python's implicit int/float
//! promotion: operands are first widened to a shared `Type` via
//! [`crate::types::get_common_type`], then the operation runs on that type.

use crate::error::{Error, Result};
use crate::types::{get_common_type, Type, TypeTag};
use crate::value::Value;

/// Apply an arithmetic operator (`+`, `-`, `*`, `/`, `%`).
pub fn apply_arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> Result<Value> {
    let left_is_string = left.type_tag() == TypeTag::String;
    let right_is_string = right.type_tag() == TypeTag::String;

    if left_is_string && right_is_string {
        if op == ArithmeticOp::Add {
            return Ok(Value::String(format!("{}{}", left.print_form(), right.print_form())));
        }
        return Err(Error::IncompatibleTypes {
            lhs: left.type_tag().to_string(),
            rhs: right.type_tag().to_string(),
        });
    }
    // A string mixed with a non-string has no arithmetic path: the
    // number<->string conversions `is_compatible` allows exist for explicit
    // `convert()` calls, not for silently coercing one side of `+`/`-`/etc.
    if left_is_string || right_is_string {
        return Err(Error::IncompatibleTypes {
            lhs: left.type_tag().to_string(),
            rhs: right.type_tag().to_string(),
        });
    }

    let common = get_common_type(&left.runtime_type(), &right.runtime_type())?;
    let (a, b) = (left.convert(&common)?, right.convert(&common)?);

    if common.tag.is_integer() {
        return apply_integer_arithmetic(op, &a, &b, common.tag);
    }
    apply_float_arithmetic(op, &a, &b, common.tag)
}

fn apply_integer_arithmetic(op: ArithmeticOp, a: &Value, b: &Value, tag: TypeTag) -> Result<Value> {
    let (x, y) = (as_i128(a), as_i128(b));
    let result = match op {
        ArithmeticOp::Add => x + y,
        ArithmeticOp::Subtract => x - y,
        ArithmeticOp::Multiply => x * y,
        ArithmeticOp::Divide => {
            if y == 0 {
                return Err(Error::DivisionByZero);
            }
            x / y
        }
        ArithmeticOp::Modulus => {
            if y == 0 {
                return Err(Error::ModulusByZero);
            }
            x % y
        }
    };
    Value::Int64(result as i64).convert(&Type::simple(tag))
}

fn apply_float_arithmetic(op: ArithmeticOp, a: &Value, b: &Value, tag: TypeTag) -> Result<Value> {
    let (x, y) = (as_f64(a), as_f64(b));
    let result = match op {
        ArithmeticOp::Add => x + y,
        ArithmeticOp::Subtract => x - y,
        ArithmeticOp::Multiply => x * y,
        ArithmeticOp::Divide => {
            if y == 0.0 {
                return Err(Error::DivisionByZero);
            }
            x / y
        }
        ArithmeticOp::Modulus => {
            if y == 0.0 {
                return Err(Error::ModulusByZero);
            }
            x.rem_euclid(y)
        }
    };
    if tag == TypeTag::Float32 {
        Ok(Value::Float32(result as f32))
    } else {
        Ok(Value::Float64(result))
    }
}

/// Apply a comparison operator. String comparison is lexicographic.
pub fn apply_comparison(op: ComparisonOp, left: &Value, right: &Value) -> Result<bool> {
    if op == ComparisonOp::Equal {
        return Ok(values_equal(left, right));
    }
    if op == ComparisonOp::NotEqual {
        return Ok(!values_equal(left, right));
    }

    if let (Value::String(a), Value::String(b)) = (left, right) {
        use std::cmp::Ordering::*;
        return Ok(match (op, a.cmp(b)) {
            (ComparisonOp::LessThan, Less) => true,
            (ComparisonOp::LessThanOrEqual, Less | Equal) => true,
            (ComparisonOp::GreaterThan, Greater) => true,
            (ComparisonOp::GreaterThanOrEqual, Greater | Equal) => true,
            _ => false,
        });
    }
    if left.type_tag() == TypeTag::String || right.type_tag() == TypeTag::String {
        return Err(Error::IncompatibleTypes {
            lhs: left.type_tag().to_string(),
            rhs: right.type_tag().to_string(),
        });
    }

    let common = get_common_type(&left.runtime_type(), &right.runtime_type())?;
    let (a, b) = (left.convert(&common)?, right.convert(&common)?);
    // Stay in i128 for integers, same as apply_arithmetic: casting through
    // f64 loses precision above 2^53 and makes adjacent i64s compare equal.
    if common.tag.is_integer() {
        let (x, y) = (as_i128(&a), as_i128(&b));
        return Ok(match op {
            ComparisonOp::LessThan => x < y,
            ComparisonOp::LessThanOrEqual => x <= y,
            ComparisonOp::GreaterThan => x > y,
            ComparisonOp::GreaterThanOrEqual => x >= y,
            ComparisonOp::Equal | ComparisonOp::NotEqual => unreachable!("handled above"),
        });
    }
    let (x, y) = (as_f64(&a), as_f64(&b));
    Ok(match op {
        ComparisonOp::LessThan => x < y,
        ComparisonOp::LessThanOrEqual => x <= y,
        ComparisonOp::GreaterThan => x > y,
        ComparisonOp::GreaterThanOrEqual => x >= y,
        ComparisonOp::Equal | ComparisonOp::NotEqual => unreachable!("handled above"),
    })
}

fn values_equal(left: &Value, right: &Value) -> bool {
    if left.type_tag() == right.type_tag() {
        return left == right;
    }
    match get_common_type(&left.runtime_type(), &right.runtime_type()) {
        Ok(common) => match (left.convert(&common), right.convert(&common)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        },
        Err(_) => false,
    }
}

/// Apply a logical operator (`and`/`or`) using truthiness. Both operands are
/// always evaluated before this runs — the parser emits both operand
/// sequences unconditionally, so `AND`/`OR` are plain value ops, not
/// short-circuiting control flow.
pub fn apply_logical(op: LogicalOp, left: &Value, right: &Value) -> Value {
    let result = match op {
        LogicalOp::And => left.is_truthy() && right.is_truthy(),
        LogicalOp::Or => left.is_truthy() || right.is_truthy(),
    };
    Value::Bool(result)
}

/// Apply a unary operator (`-`, `not`).
pub fn apply_unary(op: UnaryOp, value: &Value) -> Result<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        UnaryOp::Negate => match value {
            Value::Int8(i) => Ok(Value::Int8(-i)),
            Value::Int16(i) => Ok(Value::Int16(-i)),
            Value::Int32(i) => Ok(Value::Int32(-i)),
            Value::Int64(i) => Ok(Value::Int64(-i)),
            Value::Float32(f) => Ok(Value::Float32(-f)),
            Value::Float64(f) => Ok(Value::Float64(-f)),
            other => Err(Error::IncompatibleTypes {
                lhs: other.type_tag().to_string(),
                rhs: "negatable number".to_string(),
            }),
        },
    }
}

fn as_i128(v: &Value) -> i128 {
    match v {
        Value::Int8(i) => *i as i128,
        Value::Int16(i) => *i as i128,
        Value::Int32(i) => *i as i128,
        Value::Int64(i) => *i as i128,
        Value::UInt8(i) => *i as i128,
        Value::UInt16(i) => *i as i128,
        Value::UInt32(i) => *i as i128,
        Value::UInt64(i) => *i as i128,
        Value::Bool(b) => *b as i128,
        _ => 0,
    }
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Float32(f) => *f as f64,
        Value::Float64(f) => *f,
        other => as_i128(other) as f64,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_division_by_zero_errors() {
        let err = apply_arithmetic(ArithmeticOp::Divide, &Value::Int32(1), &Value::Int32(0))
            .unwrap_err();
        assert_eq!(err, Error::DivisionByZero);
    }

    #[test]
    fn modulus_by_zero_errors() {
        let err = apply_arithmetic(ArithmeticOp::Modulus, &Value::Int32(5), &Value::Int32(0))
            .unwrap_err();
        assert_eq!(err, Error::ModulusByZero);
    }

    #[test]
    fn mixed_int_float_widens_to_float() {
        let result =
            apply_arithmetic(ArithmeticOp::Add, &Value::Int32(1), &Value::Float64(2.5)).unwrap();
        assert_eq!(result, Value::Float64(3.5));
    }

    #[test]
    fn string_concatenation_via_add() {
        let result = apply_arithmetic(
            ArithmeticOp::Add,
            &Value::String("a".into()),
            &Value::String("b".into()),
        )
        .unwrap();
        assert_eq!(result, Value::String("ab".into()));
    }

    #[test]
    fn large_int64_comparison_does_not_lose_precision_through_f64() {
        let result = apply_comparison(
            ComparisonOp::GreaterThan,
            &Value::Int64(9_007_199_254_740_993),
            &Value::Int64(9_007_199_254_740_992),
        )
        .unwrap();
        assert!(result);
    }

    #[test]
    fn string_comparison_is_lexicographic() {
        let result = apply_comparison(
            ComparisonOp::LessThan,
            &Value::String("apple".into()),
            &Value::String("banana".into()),
        )
        .unwrap();
        assert!(result);
    }

    #[test]
    fn negate_flips_sign() {
        let result = apply_unary(UnaryOp::Negate, &Value::Int32(5)).unwrap();
        assert_eq!(result, Value::Int32(-5));
    }

    #[test]
    fn not_flips_truthiness() {
        assert_eq!(apply_unary(UnaryOp::Not, &Value::Bool(false)).unwrap(), Value::Bool(true));
    }
}
