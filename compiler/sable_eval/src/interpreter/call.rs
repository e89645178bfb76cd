//! Functions and closures: creation, invocation and binding re-synchronization.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use sable_diagnostic::ScriptResult;
use sable_ir::ast::{required_arity, FunctionCall, FunctionDef, Param};
use sable_ir::Name;
use sable_value::errors::{
    arity_mismatch, misplaced_jump, not_callable, undefined_function, undefined_label,
};
use sable_value::{Closure, FrameId, FrameItem, FrameItems, Function, FunctionKind, Value};

use super::Interpreter;
use crate::frame::{Frame, InvocationContext};
use crate::jump::Jump;

/// Arity of a parameter list, for error messages.
pub(super) fn arity_text(params: &[Param]) -> String {
    let required = required_arity(params);
    if required == params.len() {
        required.to_string()
    } else {
        format!("{required} to {}", params.len())
    }
}

impl Interpreter {
    /// Create a closure over the current frame's visible bindings.
    ///
    /// Top-level bindings are never captured: every frame already reaches
    /// them through the root fallback of `lookup`, so a copy could only go
    /// stale. At the root only the blocks above the root block are captured.
    pub(super) fn make_closure(&self, def: &Rc<FunctionDef>, name: Option<Name>) -> Rc<Function> {
        let frame = self.current();
        let captured = if frame.id() == FrameId::ROOT {
            frame.inner_snapshot()
        } else {
            frame.snapshot()
        };
        let context = frame.context();
        let closure = Closure::new(Rc::clone(def), frame.id(), captured)
            .with_receiver(context.holder.clone(), context.target.clone());
        let display_name = name.map_or("", |name| self.name_str(name));
        Rc::new(Function::script(name, display_name, closure))
    }

    pub(super) fn eval_function_call(&mut self, node: &FunctionCall) -> ScriptResult<Value> {
        let function = match self.lookup(node.name) {
            Some(
                FrameItem::Function(function)
                | FrameItem::Variable(Value::Function(function))
                | FrameItem::Constant(Value::Function(function)),
            ) => Rc::clone(function),
            Some(other) => {
                return Err(not_callable(&other.to_value().unwrap_or(Value::Void)));
            }
            None => return Err(undefined_function(self.name_str(node.name))),
        };
        let args = self.eval_args(&node.args)?;
        self.call_function(&function, args)
    }

    pub(super) fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> ScriptResult<Value> {
        match callee {
            Value::Function(function) => self.call_function(function, args),
            other => Err(not_callable(other)),
        }
    }

    pub(super) fn call_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        match function.kind() {
            FunctionKind::Native(native) => {
                if !native.accepts(args.len()) {
                    return Err(arity_mismatch(
                        function.display_name(),
                        &function.arity_text(),
                        args.len(),
                    ));
                }
                native.call(&args)
            }
            FunctionKind::Script(closure) => self.call_closure(function, closure, args),
        }
    }

    /// Invoke a script closure.
    ///
    /// The call frame starts from the captured bindings, refreshed from the
    /// declaring frame when that frame is still live, plus the function
    /// itself under its own name. Afterwards the final values of the
    /// captured bindings are written back into the capture and synced into
    /// the declaring frame. Bindings the body declared itself stay local.
    #[tracing::instrument(level = "debug", skip_all, fields(function = function.display_name()))]
    fn call_closure(
        &mut self,
        function: &Rc<Function>,
        closure: &Closure,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        let mut items = closure.captured_items();
        if let Some(declaring) = self.frame(closure.declaring_frame()) {
            for (name, item) in items.iter_mut().filter(|(_, item)| item.is_variable()) {
                if let Some(live) = declaring.get(*name).filter(|live| live.is_variable()) {
                    *item = live.clone();
                }
            }
        }
        if let Some(name) = function.name() {
            items.insert(name, FrameItem::Function(Rc::clone(function)));
        }

        let context = InvocationContext::closure(
            closure.holder().cloned(),
            closure.target().cloned(),
        );
        let (value, final_items) =
            self.invoke(closure.def(), context, items, args, function.display_name())?;

        closure.update_captured(&final_items);
        let skip: FxHashSet<Name> = closure
            .def()
            .params
            .iter()
            .map(|param| param.name)
            .chain(function.name())
            .collect();
        let captured = closure.captured_items();
        if let Some(frame) = self.frame_mut(closure.declaring_frame()) {
            frame.sync_items(&captured, &skip);
        }
        Ok(value)
    }

    /// Bind arguments and run a function body in a new frame.
    pub(super) fn invoke(
        &mut self,
        def: &FunctionDef,
        context: InvocationContext,
        items: FrameItems,
        args: Vec<Value>,
        display_name: &str,
    ) -> ScriptResult<(Value, FrameItems)> {
        if !def.accepts(args.len()) {
            return Err(arity_mismatch(
                display_name,
                &arity_text(&def.params),
                args.len(),
            ));
        }
        self.with_frame(context, items, |this| this.run_body(def, args))
    }

    fn run_body(&mut self, def: &FunctionDef, args: Vec<Value>) -> ScriptResult<Value> {
        let mut args = args.into_iter();
        for param in &def.params {
            let value = match (args.next(), &param.default) {
                (Some(value), _) => value,
                (None, Some(default)) => self.eval_expr(default)?,
                (None, None) => Value::Void,
            };
            self.current_mut()
                .declare(param.name, FrameItem::Variable(value));
        }

        match self.exec_block(&def.body)? {
            Jump::None => Ok(Value::Void),
            Jump::Return(value) => Ok(value),
            Jump::Goto(label) => Err(undefined_label(self.name_str(label))),
            other => Err(misplaced_jump(other.keyword())),
        }
    }
}
