//! AST construction helpers shared by the end-to-end tests.
//!
//! There is no parser in this workspace, so tests spell programs out as
//! trees. Every builder method interns names in the script's own interner,
//! which is also handed to the engine.

#![allow(dead_code)]

use std::rc::Rc;
use std::sync::Arc;

use sable::ir::ast::{
    AnonymousCall, AssignOp, Assignment, Binary, BinaryOp, Block, Break, CaseLabel, CatchClause,
    ClassDef, ConstBinding, ConstDecl, ConstructorCall, Continue, DoLoop, Expr, ExprStmt, ForEach,
    ForLoop, FunctionCall, FunctionDecl, FunctionDef, Goto, IfElse, InlineFunction, ItemRef,
    Label, ListInit, Literal, LiteralValue, MemberDecl, MemberDeclKind, MethodCall, Modifier,
    Param, ParentConstructorCall, ParentMethodCall, Program, PropertyRef, Return, Scope, SelfRef,
    StaticMethodCall, StaticPropertyRef, Stmt, Switch, Ternary, Throw, TryCatch, TupleInit, Unary,
    UnaryOp, VarBinding, VarDecl, VariableRef, WhileLoop,
};
use sable::ir::{Name, Span};
use sable::{
    buffer_handler, BufferPrintHandler, Engine, ErrorCode, ScriptContext, ScriptError,
    ScriptResult, SharedInterner, Value,
};

pub const FILE: &str = "test.sbl";

pub fn ok<T>(result: ScriptResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("unexpected error: {err}"),
    }
}

pub fn err<T: std::fmt::Debug>(result: ScriptResult<T>) -> ScriptError {
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(err) => err,
    }
}

pub fn code<T: std::fmt::Debug>(result: ScriptResult<T>) -> ErrorCode {
    err(result).code()
}

// Literals and operators

fn literal(value: LiteralValue) -> Expr {
    Expr::Literal(Literal {
        value,
        span: Span::DUMMY,
    })
}

pub fn void() -> Expr {
    Expr::void()
}

pub fn int(v: i64) -> Expr {
    literal(LiteralValue::Int(v))
}

pub fn float(v: f64) -> Expr {
    literal(LiteralValue::Float(v))
}

pub fn boolean(b: bool) -> Expr {
    literal(LiteralValue::Bool(b))
}

pub fn text(s: &str) -> Expr {
    literal(LiteralValue::Str(s.to_owned()))
}

pub fn dec(s: &str) -> Expr {
    literal(LiteralValue::Decimal(s.to_owned()))
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary(Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span: Span::DUMMY,
    })
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary(Unary {
        op,
        operand: Box::new(operand),
        span: Span::DUMMY,
    })
}

pub fn ternary(test: Expr, if_true: Expr, if_false: Expr) -> Expr {
    Expr::Ternary(Ternary {
        test: Box::new(test),
        if_true: Box::new(if_true),
        if_false: Box::new(if_false),
        span: Span::DUMMY,
    })
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::ListInit(ListInit {
        items,
        span: Span::DUMMY,
    })
}

pub fn tuple(items: Vec<Expr>) -> Expr {
    Expr::TupleInit(TupleInit {
        items,
        span: Span::DUMMY,
    })
}

pub fn item(target: Expr, index: Expr) -> Expr {
    Expr::ItemRef(ItemRef {
        target: Box::new(target),
        index: Box::new(index),
        span: Span::DUMMY,
    })
}

pub fn call_value(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::AnonymousCall(AnonymousCall {
        callee: Box::new(callee),
        args,
        span: Span::DUMMY,
    })
}

pub fn this() -> Expr {
    Expr::SelfRef(SelfRef { span: Span::DUMMY })
}

pub fn parent_ctor(args: Vec<Expr>) -> Stmt {
    stmt(Expr::ParentConstructorCall(ParentConstructorCall {
        args,
        span: Span::DUMMY,
    }))
}

// Statements

pub fn stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        expr,
        span: Span::DUMMY,
    })
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return(Return {
        value: Some(value),
        span: Span::DUMMY,
    })
}

pub fn brk() -> Stmt {
    Stmt::Break(Break { span: Span::DUMMY })
}

pub fn cont() -> Stmt {
    Stmt::Continue(Continue { span: Span::DUMMY })
}

pub fn body(statements: Vec<Stmt>) -> Block {
    Block::new(statements, Span::DUMMY)
}

pub fn block(statements: Vec<Stmt>) -> Stmt {
    Stmt::Block(body(statements))
}

pub fn if_else(test: Expr, then: Vec<Stmt>, otherwise: Option<Vec<Stmt>>) -> Stmt {
    Stmt::IfElse(IfElse {
        test,
        then_branch: Box::new(block(then)),
        else_branch: otherwise.map(|statements| Box::new(block(statements))),
        span: Span::DUMMY,
    })
}

pub fn if_then(test: Expr, then: Vec<Stmt>) -> Stmt {
    if_else(test, then, None)
}

pub fn while_loop(test: Expr, statements: Vec<Stmt>) -> Stmt {
    Stmt::While(WhileLoop {
        test,
        body: Box::new(block(statements)),
        span: Span::DUMMY,
    })
}

pub fn do_loop(statements: Vec<Stmt>, test: Expr) -> Stmt {
    Stmt::DoLoop(DoLoop {
        test,
        body: Box::new(block(statements)),
        span: Span::DUMMY,
    })
}

pub fn for_loop(
    initializers: Vec<Stmt>,
    guard: Option<Expr>,
    updaters: Vec<Expr>,
    statements: Vec<Stmt>,
) -> Stmt {
    Stmt::For(ForLoop {
        initializers,
        guard,
        updaters,
        body: Box::new(block(statements)),
        span: Span::DUMMY,
    })
}

/// `switch (subject)` over `statements`; each case enters at its address.
pub fn switch(
    subject: Expr,
    cases: Vec<(Expr, usize)>,
    default: Option<usize>,
    statements: Vec<Stmt>,
) -> Stmt {
    Stmt::Switch(Switch {
        subject,
        cases: cases
            .into_iter()
            .filter_map(|(value, address)| match value {
                Expr::Literal(value) => Some(CaseLabel { value, address }),
                _ => None,
            })
            .collect(),
        default,
        body: body(statements),
        span: Span::DUMMY,
    })
}

pub fn throw(value: Expr) -> Stmt {
    Stmt::Throw(Throw {
        value,
        span: Span::DUMMY,
    })
}

/// Builds ASTs against one interner and runs them.
pub struct Script {
    interner: SharedInterner,
}

impl Script {
    pub fn new() -> Self {
        Script {
            interner: SharedInterner::default(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// An engine sharing this script's interner, with captured output.
    pub fn engine(&self) -> (Engine, Arc<BufferPrintHandler>) {
        let out = buffer_handler();
        let engine = Engine::builder()
            .interner(self.interner.clone())
            .print_handler(out.clone())
            .build();
        (engine, out)
    }

    pub fn engine_with_context(&self, context: ScriptContext) -> Engine {
        Engine::builder()
            .interner(self.interner.clone())
            .print_handler(buffer_handler())
            .context(context)
            .build()
    }

    pub fn program(&self, statements: Vec<Stmt>) -> Program {
        Program::new(FILE, statements)
    }

    /// Run `statements` in a fresh engine.
    pub fn run(&self, statements: Vec<Stmt>) -> (Engine, ScriptResult<Value>) {
        let (mut engine, _) = self.engine();
        let result = engine.execute_program(&self.program(statements));
        (engine, result)
    }

    // Names and assignment

    pub fn var(&self, name: &str) -> Expr {
        Expr::VariableRef(VariableRef {
            name: self.name(name),
            span: Span::DUMMY,
        })
    }

    pub fn assignment(&self, target: Expr, op: AssignOp, value: Expr) -> Expr {
        Expr::Assignment(Assignment {
            target: Box::new(target),
            op,
            value: Box::new(value),
            span: Span::DUMMY,
        })
    }

    pub fn assign_to(&self, target: Expr, op: AssignOp, value: Expr) -> Stmt {
        stmt(self.assignment(target, op, value))
    }

    pub fn assign(&self, name: &str, value: Expr) -> Stmt {
        self.assign_to(self.var(name), AssignOp::Assign, value)
    }

    pub fn let_var(&self, name: &str, init: Expr) -> Stmt {
        Stmt::VarDecl(VarDecl {
            bindings: vec![VarBinding {
                name: self.name(name),
                init: Some(init),
            }],
            span: Span::DUMMY,
        })
    }

    pub fn const_var(&self, name: &str, value: Expr) -> Stmt {
        Stmt::ConstDecl(ConstDecl {
            bindings: vec![ConstBinding {
                name: self.name(name),
                value,
            }],
            span: Span::DUMMY,
        })
    }

    pub fn goto(&self, label: &str) -> Stmt {
        Stmt::Goto(Goto {
            label: self.name(label),
            span: Span::DUMMY,
        })
    }

    pub fn label(&self, name: &str) -> Stmt {
        Stmt::Label(Label {
            name: self.name(name),
            span: Span::DUMMY,
        })
    }

    pub fn for_each(
        &self,
        index: Option<&str>,
        value: &str,
        source: Expr,
        statements: Vec<Stmt>,
    ) -> Stmt {
        Stmt::ForEach(ForEach {
            index: index.map(|index| self.name(index)),
            value: self.name(value),
            source,
            body: Box::new(block(statements)),
            span: Span::DUMMY,
        })
    }

    pub fn try_catch(
        &self,
        statements: Vec<Stmt>,
        catch: Option<(&str, Vec<Stmt>)>,
        finally: Option<Vec<Stmt>>,
    ) -> Stmt {
        Stmt::TryCatch(TryCatch {
            body: body(statements),
            catch: catch.map(|(name, statements)| CatchClause {
                name: self.name(name),
                body: body(statements),
            }),
            finally: finally.map(body),
            span: Span::DUMMY,
        })
    }

    // Functions

    pub fn params(&self, params: &[&str]) -> Vec<Param> {
        params
            .iter()
            .map(|param| Param {
                name: self.name(param),
                default: None,
            })
            .collect()
    }

    pub fn def(&self, params: &[&str], statements: Vec<Stmt>) -> Rc<FunctionDef> {
        Rc::new(FunctionDef {
            params: self.params(params),
            body: body(statements),
        })
    }

    pub fn function(&self, name: &str, params: &[&str], statements: Vec<Stmt>) -> Stmt {
        Stmt::FunctionDecl(FunctionDecl {
            name: self.name(name),
            function: self.def(params, statements),
            span: Span::DUMMY,
        })
    }

    pub fn closure(&self, params: &[&str], statements: Vec<Stmt>) -> Expr {
        Expr::InlineFunction(InlineFunction {
            function: self.def(params, statements),
            span: Span::DUMMY,
        })
    }

    pub fn call(&self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::FunctionCall(FunctionCall {
            name: self.name(name),
            args,
            span: Span::DUMMY,
        })
    }

    // Classes

    pub fn class(
        &self,
        name: &str,
        super_class: Option<&str>,
        modifier: Modifier,
        members: Vec<MemberDecl>,
    ) -> Stmt {
        Stmt::ClassDef(ClassDef {
            name: self.name(name),
            super_class: super_class.map(|parent| self.name(parent)),
            modifier,
            members,
            span: Span::DUMMY,
        })
    }

    pub fn field(
        &self,
        name: &str,
        scope: Scope,
        modifier: Modifier,
        init: Option<Expr>,
    ) -> MemberDecl {
        MemberDecl {
            name: self.name(name),
            scope,
            modifier,
            kind: MemberDeclKind::Field {
                init: init.map(Rc::new),
            },
            span: Span::DUMMY,
        }
    }

    pub fn method(
        &self,
        name: &str,
        scope: Scope,
        modifier: Modifier,
        params: &[&str],
        statements: Vec<Stmt>,
    ) -> MemberDecl {
        MemberDecl {
            name: self.name(name),
            scope,
            modifier,
            kind: MemberDeclKind::Method(self.def(params, statements)),
            span: Span::DUMMY,
        }
    }

    pub fn abstract_method(&self, name: &str, params: &[&str]) -> MemberDecl {
        MemberDecl {
            name: self.name(name),
            scope: Scope::Public,
            modifier: Modifier::Abstract,
            kind: MemberDeclKind::AbstractMethod {
                params: self.params(params),
            },
            span: Span::DUMMY,
        }
    }

    pub fn new_object(&self, class: &str, args: Vec<Expr>) -> Expr {
        Expr::ConstructorCall(ConstructorCall {
            class: self.name(class),
            args,
            span: Span::DUMMY,
        })
    }

    pub fn method_call(&self, target: Expr, name: &str, args: Vec<Expr>) -> Expr {
        Expr::MethodCall(MethodCall {
            target: Box::new(target),
            name: self.name(name),
            args,
            span: Span::DUMMY,
        })
    }

    pub fn static_call(&self, class: &str, name: &str, args: Vec<Expr>) -> Expr {
        Expr::StaticMethodCall(StaticMethodCall {
            class: self.name(class),
            name: self.name(name),
            args,
            span: Span::DUMMY,
        })
    }

    pub fn parent_call(&self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::ParentMethodCall(ParentMethodCall {
            name: self.name(name),
            args,
            span: Span::DUMMY,
        })
    }

    pub fn prop(&self, target: Expr, name: &str) -> Expr {
        Expr::PropertyRef(PropertyRef {
            target: Box::new(target),
            name: self.name(name),
            span: Span::DUMMY,
        })
    }

    pub fn static_prop(&self, class: &str, name: &str) -> Expr {
        Expr::StaticPropertyRef(StaticPropertyRef {
            class: self.name(class),
            name: self.name(name),
            span: Span::DUMMY,
        })
    }

    /// `this.name = value`.
    pub fn set_field(&self, name: &str, value: Expr) -> Stmt {
        self.assign_to(self.prop(this(), name), AssignOp::Assign, value)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

pub fn string(s: &str) -> Value {
    Value::string(s)
}
