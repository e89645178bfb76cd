//! Sable: an embeddable scripting engine.
//!
//! A host hands the engine a parsed [`Program`] (or a single [`Expr`]) and
//! gets back a [`Value`] or a located [`ScriptError`]. Parsing is the host's
//! business; this crate ties together the pieces that execute:
//!
//! - [`ir`]: spans, interned names, the AST and the translator protocol
//! - [`value`]: runtime values, classes, `BigDecimal` and the pack codec
//! - [`eval`]: the tree-walking interpreter
//! - [`diagnostic`]: error codes and [`ScriptError`]
//!
//! ```text
//! let mut engine = Engine::builder().file_name("main.sbl").build();
//! let value = engine.execute_program(&program)?;
//! ```
//!
//! The engine only emits `tracing` events. A host without a subscriber of its
//! own can call [`tracing_setup::init`] once at startup.

pub mod tracing_setup;

pub use sable_diagnostic as diagnostic;
pub use sable_eval as eval;
pub use sable_ir as ir;
pub use sable_value as value;

pub use sable_diagnostic::{ErrorCode, ScriptError, ScriptResult};
pub use sable_eval::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandler, ScriptContext,
    SharedPrintHandler, DEFAULT_MAX_CALL_DEPTH,
};
pub use sable_ir::ast::{Expr, Program};
pub use sable_ir::SharedInterner;
pub use sable_value::Value;

use sable_eval::{Interpreter, InterpreterBuilder};

/// A configured interpreter together with the interner its ASTs use.
pub struct Engine {
    interpreter: Interpreter,
}

impl Engine {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Interner that names in submitted ASTs must come from.
    pub fn interner(&self) -> &SharedInterner {
        self.interpreter.interner()
    }

    pub fn execute_program(&mut self, program: &Program) -> ScriptResult<Value> {
        self.interpreter.execute_program(program)
    }

    pub fn evaluate(&mut self, expr: &Expr) -> ScriptResult<Value> {
        self.interpreter.evaluate(expr)
    }

    /// Value of a top-level binding, by name.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.interpreter.global(name)
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    interner: Option<SharedInterner>,
    file_name: Option<String>,
    context: Option<ScriptContext>,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: Option<usize>,
}

impl EngineBuilder {
    /// Share an existing interner, e.g. the one the host's parser used.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn context(mut self, context: ScriptContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    pub fn build(self) -> Engine {
        let mut builder = InterpreterBuilder::new(self.interner.unwrap_or_default());
        if let Some(file_name) = self.file_name {
            builder = builder.file_name(file_name);
        }
        if let Some(context) = self.context {
            builder = builder.context(context);
        }
        if let Some(handler) = self.print_handler {
            builder = builder.print_handler(handler);
        }
        if let Some(depth) = self.max_call_depth {
            builder = builder.max_call_depth(depth);
        }
        Engine {
            interpreter: builder.build(),
        }
    }
}
