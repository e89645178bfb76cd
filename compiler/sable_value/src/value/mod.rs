//! Runtime values.
//!
//! Scalars are stored inline. Everything larger sits behind `Rc`, so a
//! `Value` clone costs at most a reference-count bump. Objects, functions
//! and classes compare by identity; every other variant compares
//! structurally.

use std::fmt;
use std::rc::Rc;

use crate::class::{Class, Object};
use crate::decimal::BigDecimal;
use crate::function::Function;

#[derive(Clone)]
pub enum Value {
    Void,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Rc<BigDecimal>),
    Str(Rc<str>),
    Blob(Rc<[u8]>),
    List(Rc<Vec<Value>>),
    Tuple(Rc<Vec<Value>>),
    Object(Rc<Object>),
    Function(Rc<Function>),
    Class(Rc<Class>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn decimal(d: BigDecimal) -> Value {
        Value::Decimal(Rc::new(d))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(items))
    }

    pub fn blob(bytes: Vec<u8>) -> Value {
        Value::Blob(bytes.into())
    }

    /// Script-visible type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "string",
            Value::Blob(_) => "blob",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Object(_) => "object",
            Value::Function(_) => "closure",
            Value::Class(_) => "class",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view as a float, for mixed-type arithmetic.
    #[expect(
        clippy::cast_precision_loss,
        reason = "int to float promotion follows the numeric tower"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Decimal(d) => Some(d.to_f64()),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match item {
            Value::Str(s) => write!(f, "{s:?}")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Str(s) => f.write_str(s),
            Value::Blob(bytes) => {
                f.write_str("b\"")?;
                for byte in bytes.iter() {
                    write!(f, "\\x{byte:02x}")?;
                }
                f.write_str("\"")
            }
            Value::List(items) => write_seq(f, "[", items, "]"),
            Value::Tuple(items) => write_seq(f, "(", items, ")"),
            Value::Object(obj) => write!(f, "<{} object>", obj.class().display_name()),
            Value::Function(func) => write!(f, "{func}"),
            Value::Class(class) => write!(f, "<class {}>", class.display_name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({s:?})"),
            other => write!(f, "{}({other})", other.type_name()),
        }
    }
}
