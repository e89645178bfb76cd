//! Statement nodes.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{ClassDef, Expr, FunctionDef, Literal};
use crate::{Name, Span, Spanned};

/// Label table: label name to the index of its `Label` statement.
pub type LabelTable = FxHashMap<Name, usize>;

/// Collect the labels declared directly in `statements`.
pub fn collect_labels(statements: &[Stmt]) -> LabelTable {
    statements
        .iter()
        .enumerate()
        .filter_map(|(address, stmt)| match stmt {
            Stmt::Label(label) => Some((label.name, address)),
            _ => None,
        })
        .collect()
}

/// A braced statement sequence with its own scope and label table.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub labels: LabelTable,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, span: Span) -> Self {
        let labels = collect_labels(&statements);
        Block {
            statements,
            labels,
            span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfElse {
    pub test: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileLoop {
    pub test: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// `do body while (test)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DoLoop {
    pub test: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// `for (initializers; guard; updaters) body`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub initializers: Vec<Stmt>,
    pub guard: Option<Expr>,
    pub updaters: Vec<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// `foreach (index => value in source) body`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForEach {
    pub index: Option<Name>,
    pub value: Name,
    pub source: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Continue {
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Break {
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Goto {
    pub label: Name,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Throw {
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub name: Name,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TryCatch {
    pub body: Block,
    pub catch: Option<CatchClause>,
    pub finally: Option<Block>,
    pub span: Span,
}

/// `case value:` inside a switch; `address` indexes the switch body.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseLabel {
    pub value: Literal,
    pub address: usize,
}

/// `switch (subject) { ... }`.
///
/// The body is one flat statement sequence. Case and default labels are
/// entry addresses into it; execution falls through until a `break`.
#[derive(Clone, Debug, PartialEq)]
pub struct Switch {
    pub subject: Expr,
    pub cases: Vec<CaseLabel>,
    pub default: Option<usize>,
    pub body: Block,
    pub span: Span,
}

/// `name:` marks a `goto` target inside the enclosing statement sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub name: Name,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarBinding {
    pub name: Name,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub bindings: Vec<VarBinding>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstBinding {
    pub name: Name,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstDecl {
    pub bindings: Vec<ConstBinding>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Name,
    pub function: Rc<FunctionDef>,
    pub span: Span,
}

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Block(Block),
    Expr(ExprStmt),
    IfElse(IfElse),
    While(WhileLoop),
    DoLoop(DoLoop),
    For(ForLoop),
    ForEach(ForEach),
    Switch(Switch),
    Continue(Continue),
    Break(Break),
    Goto(Goto),
    Return(Return),
    Throw(Throw),
    TryCatch(TryCatch),
    Label(Label),
    VarDecl(VarDecl),
    ConstDecl(ConstDecl),
    FunctionDecl(FunctionDecl),
    ClassDef(ClassDef),
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Block(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::IfElse(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoLoop(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForEach(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Goto(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::TryCatch(s) => s.span,
            Stmt::Label(s) => s.span,
            Stmt::VarDecl(s) => s.span,
            Stmt::ConstDecl(s) => s.span,
            Stmt::FunctionDecl(s) => s.span,
            Stmt::ClassDef(s) => s.span,
        }
    }
}
