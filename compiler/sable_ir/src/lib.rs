//! Sable IR - syntax tree and translation protocol.
//!
//! This crate contains the data structures shared by every stage of the
//! Sable engine:
//! - [`Location`]/[`Span`] for source positions
//! - [`Name`] and [`StringInterner`] for identifiers
//! - AST nodes ([`ast::Expr`], [`ast::Stmt`], [`ast::Program`], ...)
//! - the [`Translator`] double-dispatch protocol
//! - [`SourcePrinter`], a translator that regenerates script text
//!
//! # Design Philosophy
//!
//! - **Closed hierarchy**: node kinds are enums of per-node structs.
//! - **Strategies over nodes**: behaviour lives in translators, never on nodes.
//! - **Intern identifiers**: strings become `Name(u32)`, compared by handle.

pub mod ast;
mod interner;
mod name;
mod printer;
mod span;
pub mod translator;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use printer::SourcePrinter;
pub use span::{Location, Span, SpanError, Spanned};
pub use translator::{ExprNode, StmtNode, Translator};
