//! Named bindings stored in frames.

use std::fmt;
use std::rc::Rc;

use crate::class::Class;
use crate::function::Function;
use crate::value::Value;

/// Identity of a method frame, stable for the frame's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u32);

impl FrameId {
    /// The outermost frame of every run.
    pub const ROOT: FrameId = FrameId(0);

    pub const fn new(raw: u32) -> Self {
        FrameId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Binding kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameItemKind {
    Class,
    Function,
    Constant,
    Variable,
    Label,
}

impl fmt::Display for FrameItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameItemKind::Class => "class",
            FrameItemKind::Function => "function",
            FrameItemKind::Constant => "constant",
            FrameItemKind::Variable => "variable",
            FrameItemKind::Label => "label",
        })
    }
}

/// A binding: what a name denotes in a frame.
///
/// Only `Variable` is mutable after declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameItem {
    Class(Rc<Class>),
    Function(Rc<Function>),
    Constant(Value),
    Variable(Value),
    /// Statement address within the declaring block.
    Label(usize),
}

impl FrameItem {
    pub fn kind(&self) -> FrameItemKind {
        match self {
            FrameItem::Class(_) => FrameItemKind::Class,
            FrameItem::Function(_) => FrameItemKind::Function,
            FrameItem::Constant(_) => FrameItemKind::Constant,
            FrameItem::Variable(_) => FrameItemKind::Variable,
            FrameItem::Label(_) => FrameItemKind::Label,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, FrameItem::Variable(_))
    }

    /// The value a reference to this binding evaluates to, if any.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            FrameItem::Class(class) => Some(Value::Class(Rc::clone(class))),
            FrameItem::Function(function) => Some(Value::Function(Rc::clone(function))),
            FrameItem::Constant(value) | FrameItem::Variable(value) => Some(value.clone()),
            FrameItem::Label(_) => None,
        }
    }
}
