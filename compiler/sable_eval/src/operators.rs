//! Binary and unary operators over runtime values.
//!
//! The numeric tower: `int op int` stays integral (checked), a decimal
//! operand lifts an int to decimal, and any float operand makes the result
//! a float. `&&`/`||` short-circuit and are handled by the interpreter.

use std::cmp::Ordering;

use sable_diagnostic::ScriptResult;
use sable_ir::ast::{BinaryOp, UnaryOp};
use sable_value::errors::{
    decimal_error, division_by_zero, integer_overflow, invalid_binary_op, invalid_unary_op,
};
use sable_value::{BigDecimal, Value};

fn checked_arith(result: Option<i64>, op_name: &'static str) -> ScriptResult<Value> {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

fn compare(op: BinaryOp, ordering: Option<Ordering>) -> Value {
    let Some(ordering) = ordering else {
        return Value::Bool(false);
    };
    Value::Bool(match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::GtEq => ordering.is_ge(),
        BinaryOp::Eq => ordering.is_eq(),
        _ => ordering.is_ne(),
    })
}

fn is_numeric(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Float(_) | Value::Decimal(_))
}

/// Equality as scripts see it: numbers compare by value across types.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Decimal(b)) | (Value::Decimal(b), Value::Int(a)) => {
            BigDecimal::from(*a) == **b
        }
        (Value::Float(_), _) | (_, Value::Float(_)) if is_numeric(left) && is_numeric(right) => {
            left.as_f64() == right.as_f64()
        }
        _ => left == right,
    }
}

pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> ScriptResult<Value> {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!values_equal(left, right))),
        _ => {}
    }
    match (left, right) {
        (Value::Str(_), _) | (_, Value::Str(_)) if op == BinaryOp::Add => {
            Ok(Value::string(format!("{left}{right}")))
        }
        (Value::Str(a), Value::Str(b)) if op.is_comparison() => Ok(compare(op, Some(a.cmp(b)))),
        (Value::Int(a), Value::Int(b)) => eval_int_binary(op, *a, *b),
        (Value::Decimal(a), Value::Decimal(b)) => eval_decimal_binary(op, a, b),
        (Value::Decimal(a), Value::Int(b)) => eval_decimal_binary(op, a, &BigDecimal::from(*b)),
        (Value::Int(a), Value::Decimal(b)) => eval_decimal_binary(op, &BigDecimal::from(*a), b),
        _ if is_numeric(left) && is_numeric(right) => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => eval_float_binary(op, a, b)
                .ok_or_else(|| invalid_binary_op(op.as_symbol(), left, right)),
            _ => Err(invalid_binary_op(op.as_symbol(), left, right)),
        },
        _ => Err(invalid_binary_op(op.as_symbol(), left, right)),
    }
}

fn eval_int_binary(op: BinaryOp, a: i64, b: i64) -> ScriptResult<Value> {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked_arith(a.checked_div(b), "division"),
        BinaryOp::Mod if b == 0 => Err(division_by_zero()),
        BinaryOp::Mod => checked_arith(a.checked_rem(b), "remainder"),
        BinaryOp::And | BinaryOp::Or => Err(invalid_binary_op(
            op.as_symbol(),
            &Value::Int(a),
            &Value::Int(b),
        )),
        _ => Ok(compare(op, Some(a.cmp(&b)))),
    }
}

fn eval_decimal_binary(op: BinaryOp, a: &BigDecimal, b: &BigDecimal) -> ScriptResult<Value> {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a.checked_mul(b).map_err(decimal_error)?,
        BinaryOp::Div => a.checked_div(b).map_err(decimal_error)?,
        BinaryOp::Mod => a.checked_rem(b).map_err(decimal_error)?,
        BinaryOp::And | BinaryOp::Or => {
            return Err(invalid_binary_op(
                op.as_symbol(),
                &Value::decimal(a.clone()),
                &Value::decimal(b.clone()),
            ))
        }
        _ => return Ok(compare(op, Some(a.cmp(b)))),
    };
    Ok(Value::decimal(value))
}

fn eval_float_binary(op: BinaryOp, a: f64, b: f64) -> Option<Value> {
    Some(match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        BinaryOp::Div => Value::Float(a / b),
        BinaryOp::Mod => Value::Float(a % b),
        BinaryOp::And | BinaryOp::Or => return None,
        _ => compare(op, a.partial_cmp(&b)),
    })
}

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> ScriptResult<Value> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(i)) => checked_arith(i.checked_neg(), "negation"),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Neg, Value::Decimal(d)) => Ok(Value::decimal(-&**d)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(invalid_unary_op(op.as_symbol(), operand)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sable_diagnostic::ErrorCode;

    fn dec(text: &str) -> Value {
        match BigDecimal::parse(text) {
            Ok(d) => Value::decimal(d),
            Err(e) => panic!("bad decimal {text}: {e}"),
        }
    }

    fn eval(op: BinaryOp, left: &Value, right: &Value) -> Value {
        match evaluate_binary(op, left, right) {
            Ok(value) => value,
            Err(e) => panic!("{left} {} {right} failed: {e}", op.as_symbol()),
        }
    }

    fn code(op: BinaryOp, left: &Value, right: &Value) -> ErrorCode {
        match evaluate_binary(op, left, right) {
            Ok(value) => panic!("expected failure, got {value}"),
            Err(e) => e.code(),
        }
    }

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(eval(BinaryOp::Add, &Value::Int(2), &Value::Int(3)), Value::Int(5));
        assert_eq!(eval(BinaryOp::Div, &Value::Int(7), &Value::Int(2)), Value::Int(3));
        assert_eq!(eval(BinaryOp::Mod, &Value::Int(-7), &Value::Int(2)), Value::Int(-1));
        assert_eq!(eval(BinaryOp::Lt, &Value::Int(1), &Value::Int(2)), Value::Bool(true));
    }

    #[test]
    fn test_int_errors() {
        assert_eq!(code(BinaryOp::Div, &Value::Int(1), &Value::Int(0)), ErrorCode::E5001);
        assert_eq!(code(BinaryOp::Mod, &Value::Int(1), &Value::Int(0)), ErrorCode::E5001);
        assert_eq!(
            code(BinaryOp::Add, &Value::Int(i64::MAX), &Value::Int(1)),
            ErrorCode::E5002
        );
        assert_eq!(
            code(BinaryOp::Sub, &Value::Bool(true), &Value::Int(1)),
            ErrorCode::E3002
        );
    }

    #[test]
    fn test_numeric_tower() {
        assert_eq!(eval(BinaryOp::Add, &Value::Int(1), &dec("0.25")), dec("1.25"));
        assert_eq!(eval(BinaryOp::Mul, &dec("1.5"), &Value::Float(2.0)), Value::Float(3.0));
        assert_eq!(eval(BinaryOp::Add, &Value::Int(1), &Value::Float(0.5)), Value::Float(1.5));
        assert_eq!(eval(BinaryOp::Div, &dec("1"), &dec("4")), dec("0.25"));
        assert_eq!(code(BinaryOp::Div, &dec("1"), &dec("0")), ErrorCode::E5001);
    }

    #[test]
    fn test_equality_across_types() {
        assert_eq!(eval(BinaryOp::Eq, &Value::Int(1), &dec("1.00")), Value::Bool(true));
        assert_eq!(eval(BinaryOp::Eq, &Value::Int(2), &Value::Float(2.0)), Value::Bool(true));
        assert_eq!(eval(BinaryOp::NotEq, &Value::string("a"), &Value::Int(1)), Value::Bool(true));
        assert_eq!(eval(BinaryOp::Eq, &Value::Void, &Value::Void), Value::Bool(true));
    }

    #[test]
    fn test_string_concat_and_compare() {
        assert_eq!(
            eval(BinaryOp::Add, &Value::string("n="), &Value::Int(4)),
            Value::string("n=4")
        );
        assert_eq!(
            eval(BinaryOp::Lt, &Value::string("abc"), &Value::string("abd")),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(evaluate_unary(UnaryOp::Neg, &Value::Int(3)).ok(), Some(Value::Int(-3)));
        assert_eq!(evaluate_unary(UnaryOp::Not, &Value::Bool(true)).ok(), Some(Value::Bool(false)));
        assert_eq!(evaluate_unary(UnaryOp::Neg, &dec("1.5")).ok(), Some(dec("-1.5")));
        assert!(evaluate_unary(UnaryOp::Neg, &Value::Int(i64::MIN)).is_err());
        assert!(evaluate_unary(UnaryOp::Not, &Value::Int(1)).is_err());
    }
}
