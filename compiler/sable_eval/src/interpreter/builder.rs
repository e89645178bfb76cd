//! `InterpreterBuilder` for creating configured `Interpreter` instances.

use std::rc::Rc;

use sable_ir::SharedInterner;
use sable_value::{Class, FrameId, FrameItem, FrameItems};

use super::exception::{ExceptionNames, EXCEPTION_CLASS};
use super::Interpreter;
use crate::builtins::builtins;
use crate::context::ScriptContext;
use crate::frame::{InvocationContext, MethodFrame};
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Calls allowed on the frame stack before evaluation fails.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Builder for creating Interpreter instances with various configurations.
pub struct InterpreterBuilder {
    interner: SharedInterner,
    file_name: Option<String>,
    context: ScriptContext,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: usize,
}

impl InterpreterBuilder {
    pub fn new(interner: SharedInterner) -> Self {
        Self {
            interner,
            file_name: None,
            context: ScriptContext::default(),
            print_handler: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// File name reported by errors raised outside any program, e.g. from
    /// [`Interpreter::evaluate`]. Programs report their own file name.
    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the host context whose bindings seed the root frame.
    #[must_use]
    pub fn context(mut self, context: ScriptContext) -> Self {
        self.context = context;
        self
    }

    /// Set the print handler used by `print` and `println`.
    ///
    /// Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter {
        let print_handler = self.print_handler.unwrap_or_else(stdout_handler);

        let exception_class = Class::record(EXCEPTION_CLASS, &ExceptionNames::FIELDS, &self.interner);
        let exception_names = ExceptionNames::new(&self.interner);

        let mut items: FrameItems = builtins(&self.interner, &print_handler);
        items.insert(
            exception_class.name(),
            FrameItem::Class(Rc::clone(&exception_class)),
        );
        for (name, value) in self.context.bindings() {
            items.insert(self.interner.intern(name), FrameItem::Variable(value.clone()));
        }
        tracing::debug!(bindings = items.len(), "root frame seeded");

        Interpreter {
            file_name: Rc::from(self.file_name.as_deref().unwrap_or("<script>")),
            root: MethodFrame::with_items(FrameId::ROOT, InvocationContext::function(), items),
            calls: Vec::new(),
            next_frame: FrameId::ROOT.raw(),
            max_call_depth: self.max_call_depth,
            print_handler,
            context: self.context,
            exception_class,
            exception_names,
            interner: self.interner,
        }
    }
}
