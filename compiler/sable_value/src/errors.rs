//! Evaluation error kinds and factories.
//!
//! Factories are the public API: each builds an unlocated [`ScriptError`]
//! with the right [`ErrorCode`]. The interpreter attaches the location of
//! the node where the error surfaces.

use std::error::Error;
use std::fmt;

use sable_diagnostic::{ErrorCode, ScriptError};

use crate::decimal::DecimalError;
use crate::pack::PackError;
use crate::value::Value;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Names
    UndefinedVariable { name: String },
    UndefinedFunction { name: String },
    UndefinedClass { name: String },
    UndefinedMember { member: String, class: String },
    UndefinedLabel { label: String },
    NameConflict { name: String },

    // Arity and types
    ArityMismatch { name: String, expected: String, got: usize },
    TypeMismatch { expected: String, got: String },
    InvalidBinaryOp { op: &'static str, left: String, right: String },
    InvalidUnaryOp { op: &'static str, operand: String },
    NotCallable { type_name: String },
    NotAVariable { name: String, kind: String },
    InvalidAssignmentTarget,
    InvalidClass { message: String },
    CannotInstantiate { class: String, modifier: String },

    // Scope
    ScopeViolation { member: String, class: String, scope: String },
    ReadOnly { name: String },
    StaticMisuse { member: String, class: String },
    ImmutableItem { type_name: String },

    // Arithmetic
    DivisionByZero,
    IntegerOverflow { operation: &'static str },

    // Runtime
    MisplacedJump { jump: &'static str },
    StackOverflow { depth: usize },
    IndexOutOfRange { index: i64, len: usize },
}

impl EvalErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndefinedVariable { .. } => ErrorCode::E2001,
            Self::UndefinedFunction { .. } => ErrorCode::E2002,
            Self::UndefinedClass { .. } => ErrorCode::E2003,
            Self::UndefinedMember { .. } => ErrorCode::E2004,
            Self::UndefinedLabel { .. } => ErrorCode::E2005,
            Self::NameConflict { .. } => ErrorCode::E2006,
            Self::ArityMismatch { .. } => ErrorCode::E3001,
            Self::TypeMismatch { .. } | Self::InvalidBinaryOp { .. } | Self::InvalidUnaryOp { .. } => {
                ErrorCode::E3002
            }
            Self::NotCallable { .. } => ErrorCode::E3003,
            Self::NotAVariable { .. } | Self::InvalidAssignmentTarget => ErrorCode::E3004,
            Self::InvalidClass { .. } => ErrorCode::E3005,
            Self::CannotInstantiate { .. } => ErrorCode::E3006,
            Self::ScopeViolation { .. } => ErrorCode::E4001,
            Self::ReadOnly { .. } | Self::ImmutableItem { .. } => ErrorCode::E4002,
            Self::StaticMisuse { .. } => ErrorCode::E4003,
            Self::DivisionByZero => ErrorCode::E5001,
            Self::IntegerOverflow { .. } => ErrorCode::E5002,
            Self::MisplacedJump { .. } => ErrorCode::E9002,
            Self::StackOverflow { .. } => ErrorCode::E9003,
            Self::IndexOutOfRange { .. } => ErrorCode::E9004,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable `{name}`"),
            Self::UndefinedFunction { name } => write!(f, "undefined function `{name}`"),
            Self::UndefinedClass { name } => write!(f, "undefined class `{name}`"),
            Self::UndefinedMember { member, class } => {
                write!(f, "no member `{member}` on `{class}`")
            }
            Self::UndefinedLabel { label } => write!(f, "missing label `{label}`"),
            Self::NameConflict { name } => write!(f, "`{name}` is already declared in this scope"),

            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let word = if expected == "1" { "argument" } else { "arguments" };
                write!(f, "`{name}` expects {expected} {word}, got {got}")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::InvalidBinaryOp { op, left, right } => {
                write!(f, "operator `{op}` cannot be applied to {left} and {right}")
            }
            Self::InvalidUnaryOp { op, operand } => {
                write!(f, "operator `{op}` cannot be applied to {operand}")
            }
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::NotAVariable { name, kind } => {
                write!(f, "`{name}` is a {kind}, not a variable")
            }
            Self::InvalidAssignmentTarget => write!(f, "invalid assignment target"),
            Self::InvalidClass { message } => f.write_str(message),
            Self::CannotInstantiate { class, modifier } => {
                write!(f, "cannot instantiate {modifier} class `{class}`")
            }

            Self::ScopeViolation {
                member,
                class,
                scope,
            } => write!(f, "{scope} member `{class}::{member}` is not accessible here"),
            Self::ReadOnly { name } => write!(f, "cannot assign to read-only `{name}`"),
            Self::StaticMisuse { member, class } => {
                write!(f, "static member `{class}::{member}` cannot be used through an instance")
            }
            Self::ImmutableItem { type_name } => write!(f, "{type_name} items cannot be assigned"),

            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),

            Self::MisplacedJump { jump } => write!(f, "`{jump}` is not allowed here"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for length {len}")
            }
        }
    }
}

#[cold]
fn from_kind(kind: EvalErrorKind) -> ScriptError {
    ScriptError::new(kind.code(), kind.to_string())
}

#[cold]
pub fn undefined_variable(name: &str) -> ScriptError {
    from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> ScriptError {
    from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_owned(),
    })
}

#[cold]
pub fn undefined_class(name: &str) -> ScriptError {
    from_kind(EvalErrorKind::UndefinedClass {
        name: name.to_owned(),
    })
}

#[cold]
pub fn undefined_member(member: &str, class: &str) -> ScriptError {
    from_kind(EvalErrorKind::UndefinedMember {
        member: member.to_owned(),
        class: class.to_owned(),
    })
}

#[cold]
pub fn undefined_label(label: &str) -> ScriptError {
    from_kind(EvalErrorKind::UndefinedLabel {
        label: label.to_owned(),
    })
}

#[cold]
pub fn name_conflict(name: &str) -> ScriptError {
    from_kind(EvalErrorKind::NameConflict {
        name: name.to_owned(),
    })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: &str, got: usize) -> ScriptError {
    from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected: expected.to_owned(),
        got,
    })
}

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> ScriptError {
    from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_owned(),
        got: got.to_owned(),
    })
}

#[cold]
pub fn invalid_binary_op(op: &'static str, left: &Value, right: &Value) -> ScriptError {
    from_kind(EvalErrorKind::InvalidBinaryOp {
        op,
        left: left.type_name().to_owned(),
        right: right.type_name().to_owned(),
    })
}

#[cold]
pub fn invalid_unary_op(op: &'static str, operand: &Value) -> ScriptError {
    from_kind(EvalErrorKind::InvalidUnaryOp {
        op,
        operand: operand.type_name().to_owned(),
    })
}

#[cold]
pub fn not_callable(value: &Value) -> ScriptError {
    from_kind(EvalErrorKind::NotCallable {
        type_name: value.type_name().to_owned(),
    })
}

#[cold]
pub fn not_a_variable(name: &str, kind: &str) -> ScriptError {
    from_kind(EvalErrorKind::NotAVariable {
        name: name.to_owned(),
        kind: kind.to_owned(),
    })
}

#[cold]
pub fn invalid_assignment_target() -> ScriptError {
    from_kind(EvalErrorKind::InvalidAssignmentTarget)
}

#[cold]
pub fn invalid_class(message: &str) -> ScriptError {
    from_kind(EvalErrorKind::InvalidClass {
        message: message.to_owned(),
    })
}

#[cold]
pub fn cannot_instantiate(class: &str, modifier: &str) -> ScriptError {
    from_kind(EvalErrorKind::CannotInstantiate {
        class: class.to_owned(),
        modifier: modifier.to_owned(),
    })
}

#[cold]
pub fn scope_violation(member: &str, class: &str, scope: &str) -> ScriptError {
    from_kind(EvalErrorKind::ScopeViolation {
        member: member.to_owned(),
        class: class.to_owned(),
        scope: scope.to_owned(),
    })
}

#[cold]
pub fn read_only(name: &str) -> ScriptError {
    from_kind(EvalErrorKind::ReadOnly {
        name: name.to_owned(),
    })
}

#[cold]
pub fn static_misuse(member: &str, class: &str) -> ScriptError {
    from_kind(EvalErrorKind::StaticMisuse {
        member: member.to_owned(),
        class: class.to_owned(),
    })
}

#[cold]
pub fn immutable_item(container: &Value) -> ScriptError {
    from_kind(EvalErrorKind::ImmutableItem {
        type_name: container.type_name().to_owned(),
    })
}

#[cold]
pub fn division_by_zero() -> ScriptError {
    from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> ScriptError {
    from_kind(EvalErrorKind::IntegerOverflow { operation })
}

#[cold]
pub fn misplaced_jump(jump: &'static str) -> ScriptError {
    from_kind(EvalErrorKind::MisplacedJump { jump })
}

#[cold]
pub fn stack_overflow(depth: usize) -> ScriptError {
    from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> ScriptError {
    from_kind(EvalErrorKind::IndexOutOfRange { index, len })
}

/// Wrap a decimal failure, keeping it as the error's cause.
#[cold]
pub fn decimal_error(err: DecimalError) -> ScriptError {
    let code = match err {
        DecimalError::DivisionByZero => ErrorCode::E5001,
        DecimalError::Malformed(_)
        | DecimalError::ExponentOutOfRange(_)
        | DecimalError::ScaleOverflow => ErrorCode::E5003,
    };
    ScriptError::from_source(code, err)
}

/// Wrap a pack-format failure, keeping it as the error's cause.
#[cold]
pub fn pack_error(err: PackError) -> ScriptError {
    let code = match &err {
        PackError::ValueCount { .. } => ErrorCode::E3001,
        err if err.is_format_error() => ErrorCode::E6001,
        _ => ErrorCode::E6002,
    };
    ScriptError::from_source(code, err)
}

/// A script value raised with `throw`.
///
/// Carried as the cause of the [`ScriptError`] so `catch` can recover the
/// original value by downcasting.
#[derive(Debug, Clone)]
pub struct ThrownValue(pub Value);

impl fmt::Display for ThrownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uncaught exception: {}", self.0)
    }
}

impl Error for ThrownValue {}

#[cold]
pub fn thrown(value: Value) -> ScriptError {
    ScriptError::from_source(ErrorCode::E9001, ThrownValue(value))
}

/// The value a `throw` raised, if this error came from one.
pub fn thrown_value(err: &ScriptError) -> Option<Value> {
    err.cause()
        .and_then(|cause| cause.downcast_ref::<ThrownValue>())
        .map(|thrown| thrown.0.clone())
}
