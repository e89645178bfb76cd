//! Expression nodes.
//!
//! Each variant of [`Expr`] wraps its own node struct so that translators
//! receive the concrete node type through double dispatch.

use std::rc::Rc;

use super::{AssignOp, BinaryOp, FunctionDef, UnaryOp};
use crate::{Name, Span, Spanned};

/// Literal payloads.
///
/// Decimal literals keep their source text; the value layer parses them.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Void,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Decimal(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableRef {
    pub name: Name,
    pub span: Span,
}

/// `target op value` where `target` is a variable, property, static property
/// or item reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub target: Box<Expr>,
    pub op: AssignOp,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ternary {
    pub test: Box<Expr>,
    pub if_true: Box<Expr>,
    pub if_false: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListInit {
    pub items: Vec<Expr>,
    pub span: Span,
}

/// `(a, b, ...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleInit {
    pub items: Vec<Expr>,
    pub span: Span,
}

/// `target[index]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemRef {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// An anonymous function expression; evaluates to a closure.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFunction {
    pub function: Rc<FunctionDef>,
    pub span: Span,
}

/// `name(args)`: a call resolved through the frame chain.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `(callee)(args)`: a call of an arbitrary callable value.
#[derive(Clone, Debug, PartialEq)]
pub struct AnonymousCall {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodCall {
    pub target: Box<Expr>,
    pub name: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StaticMethodCall {
    pub class: Name,
    pub name: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRef {
    pub target: Box<Expr>,
    pub name: Name,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StaticPropertyRef {
    pub class: Name,
    pub name: Name,
    pub span: Span,
}

/// `new Class(args)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorCall {
    pub class: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `super::name(args)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParentMethodCall {
    pub name: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `super(args)` inside a constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct ParentConstructorCall {
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `this`.
#[derive(Clone, Debug, PartialEq)]
pub struct SelfRef {
    pub span: Span,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Literal),
    VariableRef(VariableRef),
    Assignment(Assignment),
    Binary(Binary),
    Unary(Unary),
    Ternary(Ternary),
    ListInit(ListInit),
    TupleInit(TupleInit),
    ItemRef(ItemRef),
    InlineFunction(InlineFunction),
    FunctionCall(FunctionCall),
    AnonymousCall(AnonymousCall),
    MethodCall(MethodCall),
    StaticMethodCall(StaticMethodCall),
    PropertyRef(PropertyRef),
    StaticPropertyRef(StaticPropertyRef),
    ConstructorCall(ConstructorCall),
    ParentMethodCall(ParentMethodCall),
    ParentConstructorCall(ParentConstructorCall),
    SelfRef(SelfRef),
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::VariableRef(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Ternary(e) => e.span,
            Expr::ListInit(e) => e.span,
            Expr::TupleInit(e) => e.span,
            Expr::ItemRef(e) => e.span,
            Expr::InlineFunction(e) => e.span,
            Expr::FunctionCall(e) => e.span,
            Expr::AnonymousCall(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::StaticMethodCall(e) => e.span,
            Expr::PropertyRef(e) => e.span,
            Expr::StaticPropertyRef(e) => e.span,
            Expr::ConstructorCall(e) => e.span,
            Expr::ParentMethodCall(e) => e.span,
            Expr::ParentConstructorCall(e) => e.span,
            Expr::SelfRef(e) => e.span,
        }
    }
}

impl Expr {
    /// Void literal with a dummy span.
    pub fn void() -> Expr {
        Expr::Literal(Literal {
            value: LiteralValue::Void,
            span: Span::DUMMY,
        })
    }
}
