//! AST node model.
//!
//! The hierarchy is closed: [`Expr`] and [`Stmt`] enumerate every node
//! kind, and each kind is its own struct so the [`Translator`](crate::Translator)
//! protocol can hand strategies the concrete node.
//!
//! Nodes own their children exclusively. The one exception is
//! [`FunctionDef`] (and field initializers), which sit behind `Rc` so that
//! runtime closures and class tables can keep a body alive after the
//! declaring statement has run.

mod expr;
mod items;
mod operators;
mod program;
mod stmt;

pub use expr::{
    AnonymousCall, Assignment, Binary, ConstructorCall, Expr, FunctionCall, InlineFunction,
    ItemRef, ListInit, Literal, LiteralValue, MethodCall, ParentConstructorCall,
    ParentMethodCall, PropertyRef, SelfRef, StaticMethodCall, StaticPropertyRef, Ternary,
    TupleInit, Unary, VariableRef,
};
pub use items::{
    accepts, required_arity, ClassDef, FunctionDef, MemberDecl, MemberDeclKind, Modifier, Param,
    Scope,
};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use program::Program;
pub use stmt::{
    collect_labels, Block, Break, CaseLabel, CatchClause, ConstBinding, ConstDecl, Continue,
    DoLoop, ExprStmt, ForEach, ForLoop, FunctionDecl, Goto, IfElse, Label, LabelTable, Return,
    Stmt, Switch, Throw, TryCatch, VarBinding, VarDecl, WhileLoop,
};

#[cfg(test)]
mod tests;
