//! Tree-walking interpreter.
//!
//! [`Interpreter`] is the evaluating [`Translator`] strategy: expressions
//! translate to a [`Value`], statements to a [`Jump`]. State is a root
//! frame plus a stack of method frames, one per active call.
//!
//! Name resolution looks in the current frame, then in the root frame.
//! Closures carry a copy of their declaring frame's bindings; after each
//! call the copy is written back and the declaring frame's variables are
//! re-synchronized (see [`MethodFrame::sync_items`]).
//!
//! Every sub-evaluation goes through [`Interpreter::eval_expr`] or
//! [`Interpreter::exec_stmt`], which grow the stack when needed and locate
//! errors at the node they surface from.

mod builder;
mod call;
mod exception;
mod expr;
mod object;
mod stmt;

pub use builder::{InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};

use std::rc::Rc;

use sable_diagnostic::{ScriptError, ScriptResult};
use sable_ir::ast::{
    AnonymousCall, Assignment, Binary, Block, Break, ClassDef, ConstDecl, ConstructorCall,
    Continue, DoLoop, Expr, ExprStmt, ForEach, ForLoop, FunctionCall, FunctionDecl, Goto, IfElse,
    InlineFunction, ItemRef, Label, LabelTable, ListInit, Literal, MethodCall,
    ParentConstructorCall, ParentMethodCall, Program, PropertyRef, Return, SelfRef,
    StaticMethodCall, StaticPropertyRef, Stmt, Switch, Ternary, Throw, TryCatch, TupleInit, Unary,
    VarDecl, VariableRef, WhileLoop,
};
use sable_ir::{ExprNode, Name, SharedInterner, Span, Spanned, StmtNode, Translator};
use sable_value::errors::{misplaced_jump, name_conflict, stack_overflow, undefined_label};
use sable_value::{Class, FrameId, FrameItem, FrameItems, Value};

use crate::context::ScriptContext;
use crate::frame::{Frame, InvocationContext, MethodFrame};
use crate::jump::Jump;
use crate::print_handler::SharedPrintHandler;
use crate::stack::ensure_sufficient_stack;
use exception::ExceptionNames;

/// The evaluating translator.
pub struct Interpreter {
    interner: SharedInterner,
    file_name: Rc<str>,
    root: MethodFrame,
    calls: Vec<MethodFrame>,
    next_frame: u32,
    max_call_depth: usize,
    print_handler: SharedPrintHandler,
    context: ScriptContext,
    exception_class: Rc<Class>,
    exception_names: ExceptionNames,
}

impl Interpreter {
    pub fn builder(interner: SharedInterner) -> InterpreterBuilder {
        InterpreterBuilder::new(interner)
    }

    /// Run a program to completion.
    ///
    /// A top-level `return` ends the program with its value; otherwise the
    /// result is void.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %program.file_name))]
    pub fn execute_program(&mut self, program: &Program) -> ScriptResult<Value> {
        match program.accept(self)? {
            Jump::None => Ok(Value::Void),
            Jump::Return(value) => Ok(value),
            other => Err(misplaced_jump(other.keyword())),
        }
    }

    /// Evaluate one expression against the root frame.
    pub fn evaluate(&mut self, expr: &Expr) -> ScriptResult<Value> {
        self.eval_expr(expr)
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn context(&self) -> &ScriptContext {
        &self.context
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn root_frame(&self) -> &MethodFrame {
        &self.root
    }

    /// Value of a root-frame binding, by name.
    pub fn global(&self, name: &str) -> Option<Value> {
        let name = self.interner.intern(name);
        self.root.get(name).and_then(FrameItem::to_value)
    }

    /// Number of active calls.
    pub fn call_depth(&self) -> usize {
        self.calls.len()
    }

    // Frames

    fn current(&self) -> &MethodFrame {
        self.calls.last().unwrap_or(&self.root)
    }

    fn current_mut(&mut self) -> &mut MethodFrame {
        self.calls.last_mut().unwrap_or(&mut self.root)
    }

    fn frame(&self, id: FrameId) -> Option<&MethodFrame> {
        if id == FrameId::ROOT {
            return Some(&self.root);
        }
        self.calls.iter().rev().find(|frame| frame.id() == id)
    }

    fn frame_mut(&mut self, id: FrameId) -> Option<&mut MethodFrame> {
        if id == FrameId::ROOT {
            return Some(&mut self.root);
        }
        self.calls.iter_mut().rev().find(|frame| frame.id() == id)
    }

    fn next_frame_id(&mut self) -> FrameId {
        self.next_frame = self.next_frame.wrapping_add(1).max(1);
        FrameId::new(self.next_frame)
    }

    /// The class whose code is running, if any.
    fn caller_class(&self) -> Option<Rc<Class>> {
        self.current().context().holder.clone()
    }

    /// Resolve a name in the current frame, then the root frame.
    fn lookup(&self, name: Name) -> Option<&FrameItem> {
        self.current().get(name).or_else(|| self.root.get(name))
    }

    /// Bind a new name in the current block. Redeclaring within the same
    /// block is an error; shadowing an outer block is not.
    fn declare(&mut self, name: Name, item: FrameItem) -> ScriptResult<()> {
        if self.current().current_block().contains(name) {
            return Err(name_conflict(self.name_str(name)));
        }
        self.current_mut().declare(name, item);
        Ok(())
    }

    /// Run `f` inside a new block seeded with `items`; the block is popped
    /// whatever the outcome.
    fn with_block<R>(
        &mut self,
        items: FrameItems,
        f: impl FnOnce(&mut Self) -> ScriptResult<R>,
    ) -> ScriptResult<R> {
        self.current_mut().push_block(items);
        let result = f(self);
        self.current_mut().pop_block();
        result
    }

    /// Run `f` inside a new method frame. Returns its result together with
    /// the frame's final root-block bindings.
    fn with_frame<R>(
        &mut self,
        context: InvocationContext,
        items: FrameItems,
        f: impl FnOnce(&mut Self) -> ScriptResult<R>,
    ) -> ScriptResult<(R, FrameItems)> {
        if self.calls.len() >= self.max_call_depth {
            return Err(stack_overflow(self.max_call_depth));
        }
        let id = self.next_frame_id();
        self.calls.push(MethodFrame::with_items(id, context, items));
        let result = f(self);
        let items = self
            .calls
            .pop()
            .map(MethodFrame::into_root_items)
            .unwrap_or_default();
        result.map(|value| (value, items))
    }

    // Evaluation entry points

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> ScriptResult<Value> {
        ensure_sufficient_stack(|| expr.accept(self)).map_err(|err| self.locate(err, expr.span()))
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> ScriptResult<Jump> {
        ensure_sufficient_stack(|| stmt.accept(self)).map_err(|err| self.locate(err, stmt.span()))
    }

    fn eval_args(&mut self, args: &[Expr]) -> ScriptResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Execute a statement sequence by address, starting at `start`.
    ///
    /// A `goto` to one of this sequence's labels continues at the label.
    /// Any other signal stops the sequence and is returned, except that an
    /// unknown label is an error when `boundary` is set (program level).
    fn exec_sequence(
        &mut self,
        statements: &[Stmt],
        labels: &LabelTable,
        boundary: bool,
        start: usize,
    ) -> ScriptResult<Jump> {
        let mut address = start;
        while let Some(stmt) = statements.get(address) {
            match self.exec_stmt(stmt)? {
                Jump::None => address += 1,
                Jump::Goto(label) => match labels.get(&label) {
                    Some(&target) => {
                        tracing::debug!(label = self.name_str(label), target, "goto");
                        address = target;
                    }
                    None if boundary => {
                        return Err(self.locate(undefined_label(self.name_str(label)), stmt.span()))
                    }
                    None => return Ok(Jump::Goto(label)),
                },
                other => return Ok(other),
            }
        }
        Ok(Jump::None)
    }

    /// Execute a block in a fresh scope holding its labels.
    fn exec_block(&mut self, block: &Block) -> ScriptResult<Jump> {
        self.with_block(label_items(&block.labels), |this| {
            this.exec_sequence(&block.statements, &block.labels, false, 0)
        })
    }

    fn locate(&self, err: ScriptError, span: Span) -> ScriptError {
        err.located_at(&self.file_name, span)
    }

    fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }
}

fn label_items(labels: &LabelTable) -> FrameItems {
    labels
        .iter()
        .map(|(name, address)| (*name, FrameItem::Label(*address)))
        .collect()
}

impl Translator for Interpreter {
    type ExprOutput = ScriptResult<Value>;
    type StmtOutput = ScriptResult<Jump>;

    fn translate_program(&mut self, node: &Program) -> ScriptResult<Jump> {
        self.file_name = Rc::from(node.file_name.as_str());
        for (name, address) in node.labels() {
            self.root.declare(*name, FrameItem::Label(*address));
        }
        self.exec_sequence(node.statements(), node.labels(), true, 0)
    }

    // Expressions

    fn translate_literal(&mut self, node: &Literal) -> ScriptResult<Value> {
        Self::eval_literal(node)
    }

    fn translate_variable_ref(&mut self, node: &VariableRef) -> ScriptResult<Value> {
        self.read_variable(node.name)
    }

    fn translate_assignment(&mut self, node: &Assignment) -> ScriptResult<Value> {
        self.eval_assignment(node)
    }

    fn translate_binary(&mut self, node: &Binary) -> ScriptResult<Value> {
        self.eval_binary(node)
    }

    fn translate_unary(&mut self, node: &Unary) -> ScriptResult<Value> {
        let operand = self.eval_expr(&node.operand)?;
        crate::operators::evaluate_unary(node.op, &operand)
    }

    fn translate_ternary(&mut self, node: &Ternary) -> ScriptResult<Value> {
        if self.condition(&node.test)? {
            self.eval_expr(&node.if_true)
        } else {
            self.eval_expr(&node.if_false)
        }
    }

    fn translate_list_init(&mut self, node: &ListInit) -> ScriptResult<Value> {
        self.eval_args(&node.items).map(Value::list)
    }

    fn translate_tuple_init(&mut self, node: &TupleInit) -> ScriptResult<Value> {
        self.eval_args(&node.items).map(Value::tuple)
    }

    fn translate_item_ref(&mut self, node: &ItemRef) -> ScriptResult<Value> {
        let target = self.eval_expr(&node.target)?;
        let index = self.eval_expr(&node.index)?;
        crate::items::item(&target, &index)
    }

    fn translate_inline_function(&mut self, node: &InlineFunction) -> ScriptResult<Value> {
        Ok(Value::Function(self.make_closure(&node.function, None)))
    }

    fn translate_function_call(&mut self, node: &FunctionCall) -> ScriptResult<Value> {
        self.eval_function_call(node)
    }

    fn translate_anonymous_call(&mut self, node: &AnonymousCall) -> ScriptResult<Value> {
        let callee = self.eval_expr(&node.callee)?;
        let args = self.eval_args(&node.args)?;
        self.call_value(&callee, args)
    }

    fn translate_method_call(&mut self, node: &MethodCall) -> ScriptResult<Value> {
        let target = self.eval_expr(&node.target)?;
        let args = self.eval_args(&node.args)?;
        self.call_method_on(&target, node.name, args)
    }

    fn translate_static_method_call(&mut self, node: &StaticMethodCall) -> ScriptResult<Value> {
        let class = self.find_class(node.class)?;
        let args = self.eval_args(&node.args)?;
        self.call_static(&class, node.name, args)
    }

    fn translate_property_ref(&mut self, node: &PropertyRef) -> ScriptResult<Value> {
        let target = self.eval_expr(&node.target)?;
        self.read_property(&target, node.name)
    }

    fn translate_static_property_ref(&mut self, node: &StaticPropertyRef) -> ScriptResult<Value> {
        let class = self.find_class(node.class)?;
        self.read_static(&class, node.name)
    }

    fn translate_constructor_call(&mut self, node: &ConstructorCall) -> ScriptResult<Value> {
        let class = self.find_class(node.class)?;
        let args = self.eval_args(&node.args)?;
        self.instantiate(&class, args).map(Value::Object)
    }

    fn translate_parent_method_call(&mut self, node: &ParentMethodCall) -> ScriptResult<Value> {
        let args = self.eval_args(&node.args)?;
        self.call_parent_method(node.name, args)
    }

    fn translate_parent_constructor_call(
        &mut self,
        node: &ParentConstructorCall,
    ) -> ScriptResult<Value> {
        let args = self.eval_args(&node.args)?;
        self.call_parent_constructor(args)?;
        Ok(Value::Void)
    }

    fn translate_self_ref(&mut self, _node: &SelfRef) -> ScriptResult<Value> {
        self.self_value()
    }

    // Statements

    fn translate_block(&mut self, node: &Block) -> ScriptResult<Jump> {
        self.exec_block(node)
    }

    fn translate_expr_stmt(&mut self, node: &ExprStmt) -> ScriptResult<Jump> {
        self.eval_expr(&node.expr)?;
        Ok(Jump::None)
    }

    fn translate_if_else(&mut self, node: &IfElse) -> ScriptResult<Jump> {
        if self.condition(&node.test)? {
            self.exec_stmt(&node.then_branch)
        } else if let Some(else_branch) = &node.else_branch {
            self.exec_stmt(else_branch)
        } else {
            Ok(Jump::None)
        }
    }

    fn translate_while(&mut self, node: &WhileLoop) -> ScriptResult<Jump> {
        self.exec_while(node)
    }

    fn translate_do_loop(&mut self, node: &DoLoop) -> ScriptResult<Jump> {
        self.exec_do_loop(node)
    }

    fn translate_for(&mut self, node: &ForLoop) -> ScriptResult<Jump> {
        self.exec_for(node)
    }

    fn translate_for_each(&mut self, node: &ForEach) -> ScriptResult<Jump> {
        self.exec_for_each(node)
    }

    fn translate_switch(&mut self, node: &Switch) -> ScriptResult<Jump> {
        self.exec_switch(node)
    }

    fn translate_continue(&mut self, _node: &Continue) -> ScriptResult<Jump> {
        Ok(Jump::Continue)
    }

    fn translate_break(&mut self, _node: &Break) -> ScriptResult<Jump> {
        Ok(Jump::Break)
    }

    fn translate_goto(&mut self, node: &Goto) -> ScriptResult<Jump> {
        Ok(Jump::Goto(node.label))
    }

    fn translate_return(&mut self, node: &Return) -> ScriptResult<Jump> {
        let value = match &node.value {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::Void,
        };
        Ok(Jump::Return(value))
    }

    fn translate_throw(&mut self, node: &Throw) -> ScriptResult<Jump> {
        let value = self.eval_expr(&node.value)?;
        Err(sable_value::errors::thrown(value))
    }

    fn translate_try_catch(&mut self, node: &TryCatch) -> ScriptResult<Jump> {
        self.exec_try_catch(node)
    }

    fn translate_label(&mut self, _node: &Label) -> ScriptResult<Jump> {
        Ok(Jump::None)
    }

    fn translate_var_decl(&mut self, node: &VarDecl) -> ScriptResult<Jump> {
        for binding in &node.bindings {
            let value = match &binding.init {
                Some(init) => self.eval_expr(init)?,
                None => Value::Void,
            };
            self.declare(binding.name, FrameItem::Variable(value))?;
        }
        Ok(Jump::None)
    }

    fn translate_const_decl(&mut self, node: &ConstDecl) -> ScriptResult<Jump> {
        for binding in &node.bindings {
            let value = self.eval_expr(&binding.value)?;
            self.declare(binding.name, FrameItem::Constant(value))?;
        }
        Ok(Jump::None)
    }

    fn translate_function_decl(&mut self, node: &FunctionDecl) -> ScriptResult<Jump> {
        let function = self.make_closure(&node.function, Some(node.name));
        self.declare(node.name, FrameItem::Function(function))?;
        Ok(Jump::None)
    }

    fn translate_class_def(&mut self, node: &ClassDef) -> ScriptResult<Jump> {
        self.define_class(node)?;
        Ok(Jump::None)
    }
}
