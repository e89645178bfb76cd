//! Expression evaluation: literals, variables, assignment and operators.

use sable_diagnostic::ScriptResult;
use sable_ir::ast::{Assignment, Binary, BinaryOp, Expr, Literal, LiteralValue};
use sable_ir::Name;
use sable_value::errors::{
    decimal_error, invalid_assignment_target, not_a_variable, read_only, type_mismatch,
    undefined_variable,
};
use sable_value::{BigDecimal, FrameItem, FrameItemKind, Value};

use super::Interpreter;
use crate::frame::Frame;
use crate::items::{item, with_item};
use crate::operators::evaluate_binary;

impl Interpreter {
    pub(super) fn eval_literal(node: &Literal) -> ScriptResult<Value> {
        Ok(match &node.value {
            LiteralValue::Void => Value::Void,
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Int(i) => Value::Int(*i),
            LiteralValue::Float(f) => Value::Float(*f),
            LiteralValue::Str(s) => Value::string(s.as_str()),
            LiteralValue::Decimal(text) => {
                Value::decimal(BigDecimal::parse(text).map_err(decimal_error)?)
            }
        })
    }

    pub(super) fn read_variable(&self, name: Name) -> ScriptResult<Value> {
        match self.lookup(name) {
            Some(item) => item
                .to_value()
                .ok_or_else(|| not_a_variable(self.name_str(name), &item.kind().to_string())),
            None => Err(undefined_variable(self.name_str(name))),
        }
    }

    /// Store into an existing variable wherever it is visible.
    fn write_variable(&mut self, name: Name, value: Value) -> ScriptResult<()> {
        match self.lookup(name).map(FrameItem::kind) {
            Some(FrameItemKind::Variable) => {}
            Some(FrameItemKind::Constant) => return Err(read_only(self.name_str(name))),
            Some(kind) => return Err(not_a_variable(self.name_str(name), &kind.to_string())),
            None => return Err(undefined_variable(self.name_str(name))),
        }
        let frame = if self.current().get(name).is_some() {
            self.current_mut()
        } else {
            &mut self.root
        };
        frame.put(name, FrameItem::Variable(value));
        Ok(())
    }

    /// The value an assignment stores: the right-hand side, or for a
    /// compound operator, the current value combined with it.
    fn assigned_value(
        &mut self,
        node: &Assignment,
        current: impl FnOnce(&mut Self) -> ScriptResult<Value>,
    ) -> ScriptResult<Value> {
        match node.op.binary() {
            None => self.eval_expr(&node.value),
            Some(op) => {
                let left = current(self)?;
                let right = self.eval_expr(&node.value)?;
                evaluate_binary(op, &left, &right)
            }
        }
    }

    pub(super) fn eval_assignment(&mut self, node: &Assignment) -> ScriptResult<Value> {
        match node.target.as_ref() {
            Expr::VariableRef(target) => {
                let value = self.assigned_value(node, |this| this.read_variable(target.name))?;
                self.write_variable(target.name, value.clone())?;
                Ok(value)
            }
            Expr::PropertyRef(target) => {
                let object = self.eval_expr(&target.target)?;
                let value =
                    self.assigned_value(node, |this| this.read_property(&object, target.name))?;
                self.write_property(&object, target.name, value.clone())?;
                Ok(value)
            }
            Expr::StaticPropertyRef(target) => {
                let class = self.find_class(target.class)?;
                let value =
                    self.assigned_value(node, |this| this.read_static(&class, target.name))?;
                self.write_static(&class, target.name, value.clone())?;
                Ok(value)
            }
            Expr::ItemRef(target) => {
                let container = self.eval_expr(&target.target)?;
                let index = self.eval_expr(&target.index)?;
                let value = self.assigned_value(node, |_| item(&container, &index))?;
                let updated = with_item(&container, &index, value.clone())?;
                self.store(&target.target, updated)?;
                Ok(value)
            }
            _ => Err(invalid_assignment_target()),
        }
    }

    /// Write a rebuilt container back to the place it was read from.
    fn store(&mut self, target: &Expr, value: Value) -> ScriptResult<()> {
        match target {
            Expr::VariableRef(target) => self.write_variable(target.name, value),
            Expr::PropertyRef(target) => {
                let object = self.eval_expr(&target.target)?;
                self.write_property(&object, target.name, value)
            }
            Expr::StaticPropertyRef(target) => {
                let class = self.find_class(target.class)?;
                self.write_static(&class, target.name, value)
            }
            Expr::ItemRef(target) => {
                let container = self.eval_expr(&target.target)?;
                let index = self.eval_expr(&target.index)?;
                let updated = with_item(&container, &index, value)?;
                self.store(&target.target, updated)
            }
            _ => Err(invalid_assignment_target()),
        }
    }

    /// Evaluate a condition, which must be a bool.
    pub(super) fn condition(&mut self, expr: &Expr) -> ScriptResult<bool> {
        let value = self.eval_expr(expr)?;
        value
            .as_bool()
            .ok_or_else(|| type_mismatch("bool", value.type_name()))
    }

    pub(super) fn eval_binary(&mut self, node: &Binary) -> ScriptResult<Value> {
        match node.op {
            BinaryOp::And => {
                let result = self.condition(&node.left)? && self.condition(&node.right)?;
                Ok(Value::Bool(result))
            }
            BinaryOp::Or => {
                let result = self.condition(&node.left)? || self.condition(&node.right)?;
                Ok(Value::Bool(result))
            }
            op => {
                let left = self.eval_expr(&node.left)?;
                let right = self.eval_expr(&node.right)?;
                evaluate_binary(op, &left, &right)
            }
        }
    }
}
