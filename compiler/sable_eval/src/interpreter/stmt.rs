//! Loops, switch and exception handling.

use sable_diagnostic::ScriptResult;
use sable_ir::ast::{DoLoop, ForEach, ForLoop, Stmt, Switch, TryCatch, WhileLoop};
use sable_value::errors::{misplaced_jump, type_mismatch};
use sable_value::{FrameItem, FrameItems, Value};

use super::{label_items, Interpreter};
use crate::jump::Jump;
use crate::operators::values_equal;

/// What a loop does with its body's signal.
enum LoopStep {
    Next,
    Exit,
    Propagate(Jump),
}

impl From<Jump> for LoopStep {
    fn from(jump: Jump) -> Self {
        match jump {
            Jump::None | Jump::Continue => LoopStep::Next,
            Jump::Break => LoopStep::Exit,
            other => LoopStep::Propagate(other),
        }
    }
}

/// Elements a `foreach` walks over.
fn iteration_items(source: &Value) -> ScriptResult<Vec<Value>> {
    match source {
        Value::List(items) | Value::Tuple(items) => Ok(items.to_vec()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        Value::Blob(bytes) => Ok(bytes.iter().map(|b| Value::Int(i64::from(*b))).collect()),
        other => Err(type_mismatch("list, tuple, string or blob", other.type_name())),
    }
}

impl Interpreter {
    fn loop_body(&mut self, body: &Stmt) -> ScriptResult<LoopStep> {
        self.exec_stmt(body).map(LoopStep::from)
    }

    pub(super) fn exec_while(&mut self, node: &WhileLoop) -> ScriptResult<Jump> {
        while self.condition(&node.test)? {
            match self.loop_body(&node.body)? {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Propagate(jump) => return Ok(jump),
            }
        }
        Ok(Jump::None)
    }

    pub(super) fn exec_do_loop(&mut self, node: &DoLoop) -> ScriptResult<Jump> {
        loop {
            match self.loop_body(&node.body)? {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Propagate(jump) => return Ok(jump),
            }
            if !self.condition(&node.test)? {
                break;
            }
        }
        Ok(Jump::None)
    }

    /// `for`: initializers run once in a scope enclosing the whole loop;
    /// updaters also run after a `continue`.
    pub(super) fn exec_for(&mut self, node: &ForLoop) -> ScriptResult<Jump> {
        self.with_block(FrameItems::default(), |this| {
            for init in &node.initializers {
                let jump = this.exec_stmt(init)?;
                if !jump.is_none() {
                    return Ok(jump);
                }
            }
            loop {
                if let Some(guard) = &node.guard {
                    if !this.condition(guard)? {
                        break;
                    }
                }
                match this.loop_body(&node.body)? {
                    LoopStep::Next => {}
                    LoopStep::Exit => break,
                    LoopStep::Propagate(jump) => return Ok(jump),
                }
                for update in &node.updaters {
                    this.eval_expr(update)?;
                }
            }
            Ok(Jump::None)
        })
    }

    /// `foreach`: each iteration binds the element (and its index) in a
    /// fresh block.
    pub(super) fn exec_for_each(&mut self, node: &ForEach) -> ScriptResult<Jump> {
        let source = self.eval_expr(&node.source)?;
        for (index, item) in iteration_items(&source)?.into_iter().enumerate() {
            let mut items = FrameItems::default();
            if let Some(index_name) = node.index {
                let index = i64::try_from(index).unwrap_or(i64::MAX);
                items.insert(index_name, FrameItem::Variable(Value::Int(index)));
            }
            items.insert(node.value, FrameItem::Variable(item));
            match self.with_block(items, |this| this.loop_body(&node.body))? {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Propagate(jump) => return Ok(jump),
            }
        }
        Ok(Jump::None)
    }

    /// `switch`: enter the body at the first case equal to the subject, else
    /// at `default`, else skip it. Execution falls through the following
    /// statements until a `break`, which ends the switch.
    pub(super) fn exec_switch(&mut self, node: &Switch) -> ScriptResult<Jump> {
        let subject = self.eval_expr(&node.subject)?;
        let mut entry = None;
        for case in &node.cases {
            if values_equal(&subject, &Self::eval_literal(&case.value)?) {
                entry = Some(case.address);
                break;
            }
        }
        let Some(start) = entry.or(node.default) else {
            return Ok(Jump::None);
        };
        tracing::trace!(start, "switch");
        let body = &node.body;
        let jump = self.with_block(label_items(&body.labels), |this| {
            this.exec_sequence(&body.statements, &body.labels, false, start)
        })?;
        Ok(match jump {
            Jump::Break => Jump::None,
            other => other,
        })
    }

    /// `try`/`catch`/`finally`.
    ///
    /// `finally` runs whatever happened before it and must complete
    /// normally. Once it has, the pending signal or error from the try or
    /// catch block is restored.
    pub(super) fn exec_try_catch(&mut self, node: &TryCatch) -> ScriptResult<Jump> {
        let outcome = match (self.exec_block(&node.body), &node.catch) {
            (Err(err), Some(catch)) => {
                tracing::debug!(code = %err.code(), "caught");
                let mut items = FrameItems::default();
                items.insert(catch.name, FrameItem::Variable(self.exception_value(&err)));
                self.with_block(items, |this| this.exec_block(&catch.body))
            }
            (outcome, _) => outcome,
        };

        if let Some(finally) = &node.finally {
            let jump = self.exec_block(finally)?;
            if !jump.is_none() {
                return Err(misplaced_jump(jump.keyword()));
            }
        }
        outcome
    }
}
