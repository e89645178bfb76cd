//! Sable evaluator: a tree-walking interpreter over the Sable AST.
//!
//! # Architecture
//!
//! - [`Interpreter`]: the evaluating [`Translator`](sable_ir::Translator);
//!   expressions produce a [`Value`](sable_value::Value), statements a [`Jump`]
//! - [`frame`]: block frames, method frames and closure re-synchronization
//! - [`operators`]: binary and unary operators over the numeric tower
//! - [`item`]/[`with_item`]: indexed reads and list item assignment
//! - [`builtins`]: native functions seeded into the root frame
//! - [`PrintHandler`]: where `print`/`println` output goes
//! - [`ScriptContext`]: host bindings, search paths and references
//!
//! Configuration goes through [`InterpreterBuilder`].

mod builtins;
mod context;
pub mod frame;
mod interpreter;
mod items;
mod jump;
mod operators;
mod print_handler;
mod stack;

pub use builtins::builtins;
pub use context::ScriptContext;
pub use frame::{BlockFrame, Frame, InvocationContext, MethodFrame};
pub use interpreter::{Interpreter, InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use items::{item, with_item};
pub use jump::Jump;
pub use operators::{evaluate_binary, evaluate_unary, values_equal};
pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandler, SharedPrintHandler,
    StdoutPrintHandler,
};
pub use stack::ensure_sufficient_stack;
