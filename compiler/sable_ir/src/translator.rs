//! Double-dispatch translation protocol.
//!
//! A [`Translator`] is a strategy with one method per node kind. Nodes
//! implement [`ExprNode`] or [`StmtNode`], whose `accept` calls straight
//! back into the strategy with the concrete node. Adding a strategy touches
//! no node type; adding a node kind means adding a method here, which every
//! strategy must then implement.
//!
//! # Example
//!
//! ```text
//! struct CountCalls { count: usize }
//!
//! impl Translator for CountCalls {
//!     type ExprOutput = ();
//!     type StmtOutput = ();
//!     fn translate_function_call(&mut self, node: &FunctionCall) {
//!         self.count += 1;
//!         for arg in &node.args { arg.accept(self); }
//!     }
//!     // ...
//! }
//! ```

use crate::ast::{
    AnonymousCall, Assignment, Binary, Block, Break, ClassDef, ConstDecl, ConstructorCall,
    Continue, DoLoop, Expr, ExprStmt, ForEach, ForLoop, FunctionCall, FunctionDecl, Goto, IfElse,
    InlineFunction, ItemRef, Label, ListInit, Literal, MethodCall, ParentConstructorCall,
    ParentMethodCall, Program, PropertyRef, Return, SelfRef, StaticMethodCall, StaticPropertyRef,
    Stmt, Switch, Ternary, Throw, TryCatch, TupleInit, Unary, VarDecl, VariableRef, WhileLoop,
};

/// A translation strategy over the closed AST.
pub trait Translator {
    /// Result of translating an expression.
    type ExprOutput;
    /// Result of translating a statement or a program.
    type StmtOutput;

    fn translate_program(&mut self, node: &Program) -> Self::StmtOutput;

    // Expressions

    fn translate_literal(&mut self, node: &Literal) -> Self::ExprOutput;
    fn translate_variable_ref(&mut self, node: &VariableRef) -> Self::ExprOutput;
    fn translate_assignment(&mut self, node: &Assignment) -> Self::ExprOutput;
    fn translate_binary(&mut self, node: &Binary) -> Self::ExprOutput;
    fn translate_unary(&mut self, node: &Unary) -> Self::ExprOutput;
    fn translate_ternary(&mut self, node: &Ternary) -> Self::ExprOutput;
    fn translate_list_init(&mut self, node: &ListInit) -> Self::ExprOutput;
    fn translate_tuple_init(&mut self, node: &TupleInit) -> Self::ExprOutput;
    fn translate_item_ref(&mut self, node: &ItemRef) -> Self::ExprOutput;
    fn translate_inline_function(&mut self, node: &InlineFunction) -> Self::ExprOutput;
    fn translate_function_call(&mut self, node: &FunctionCall) -> Self::ExprOutput;
    fn translate_anonymous_call(&mut self, node: &AnonymousCall) -> Self::ExprOutput;
    fn translate_method_call(&mut self, node: &MethodCall) -> Self::ExprOutput;
    fn translate_static_method_call(&mut self, node: &StaticMethodCall) -> Self::ExprOutput;
    fn translate_property_ref(&mut self, node: &PropertyRef) -> Self::ExprOutput;
    fn translate_static_property_ref(&mut self, node: &StaticPropertyRef) -> Self::ExprOutput;
    fn translate_constructor_call(&mut self, node: &ConstructorCall) -> Self::ExprOutput;
    fn translate_parent_method_call(&mut self, node: &ParentMethodCall) -> Self::ExprOutput;
    fn translate_parent_constructor_call(
        &mut self,
        node: &ParentConstructorCall,
    ) -> Self::ExprOutput;
    fn translate_self_ref(&mut self, node: &SelfRef) -> Self::ExprOutput;

    // Statements

    fn translate_block(&mut self, node: &Block) -> Self::StmtOutput;
    fn translate_expr_stmt(&mut self, node: &ExprStmt) -> Self::StmtOutput;
    fn translate_if_else(&mut self, node: &IfElse) -> Self::StmtOutput;
    fn translate_while(&mut self, node: &WhileLoop) -> Self::StmtOutput;
    fn translate_do_loop(&mut self, node: &DoLoop) -> Self::StmtOutput;
    fn translate_for(&mut self, node: &ForLoop) -> Self::StmtOutput;
    fn translate_for_each(&mut self, node: &ForEach) -> Self::StmtOutput;
    fn translate_switch(&mut self, node: &Switch) -> Self::StmtOutput;
    fn translate_continue(&mut self, node: &Continue) -> Self::StmtOutput;
    fn translate_break(&mut self, node: &Break) -> Self::StmtOutput;
    fn translate_goto(&mut self, node: &Goto) -> Self::StmtOutput;
    fn translate_return(&mut self, node: &Return) -> Self::StmtOutput;
    fn translate_throw(&mut self, node: &Throw) -> Self::StmtOutput;
    fn translate_try_catch(&mut self, node: &TryCatch) -> Self::StmtOutput;
    fn translate_label(&mut self, node: &Label) -> Self::StmtOutput;
    fn translate_var_decl(&mut self, node: &VarDecl) -> Self::StmtOutput;
    fn translate_const_decl(&mut self, node: &ConstDecl) -> Self::StmtOutput;
    fn translate_function_decl(&mut self, node: &FunctionDecl) -> Self::StmtOutput;
    fn translate_class_def(&mut self, node: &ClassDef) -> Self::StmtOutput;
}

/// An expression node that can be handed to a translator.
pub trait ExprNode {
    fn accept<T: Translator + ?Sized>(&self, translator: &mut T) -> T::ExprOutput;
}

/// A statement node (or program) that can be handed to a translator.
pub trait StmtNode {
    fn accept<T: Translator + ?Sized>(&self, translator: &mut T) -> T::StmtOutput;
}

macro_rules! expr_nodes {
    ($($node:ident => $method:ident),* $(,)?) => {
        $(
            impl ExprNode for $node {
                #[inline]
                fn accept<T: Translator + ?Sized>(&self, translator: &mut T) -> T::ExprOutput {
                    translator.$method(self)
                }
            }
        )*
    };
}

macro_rules! stmt_nodes {
    ($($node:ident => $method:ident),* $(,)?) => {
        $(
            impl StmtNode for $node {
                #[inline]
                fn accept<T: Translator + ?Sized>(&self, translator: &mut T) -> T::StmtOutput {
                    translator.$method(self)
                }
            }
        )*
    };
}

expr_nodes! {
    Literal => translate_literal,
    VariableRef => translate_variable_ref,
    Assignment => translate_assignment,
    Binary => translate_binary,
    Unary => translate_unary,
    Ternary => translate_ternary,
    ListInit => translate_list_init,
    TupleInit => translate_tuple_init,
    ItemRef => translate_item_ref,
    InlineFunction => translate_inline_function,
    FunctionCall => translate_function_call,
    AnonymousCall => translate_anonymous_call,
    MethodCall => translate_method_call,
    StaticMethodCall => translate_static_method_call,
    PropertyRef => translate_property_ref,
    StaticPropertyRef => translate_static_property_ref,
    ConstructorCall => translate_constructor_call,
    ParentMethodCall => translate_parent_method_call,
    ParentConstructorCall => translate_parent_constructor_call,
    SelfRef => translate_self_ref,
}

stmt_nodes! {
    Program => translate_program,
    Block => translate_block,
    ExprStmt => translate_expr_stmt,
    IfElse => translate_if_else,
    WhileLoop => translate_while,
    DoLoop => translate_do_loop,
    ForLoop => translate_for,
    ForEach => translate_for_each,
    Switch => translate_switch,
    Continue => translate_continue,
    Break => translate_break,
    Goto => translate_goto,
    Return => translate_return,
    Throw => translate_throw,
    TryCatch => translate_try_catch,
    Label => translate_label,
    VarDecl => translate_var_decl,
    ConstDecl => translate_const_decl,
    FunctionDecl => translate_function_decl,
    ClassDef => translate_class_def,
}

impl ExprNode for Expr {
    fn accept<T: Translator + ?Sized>(&self, translator: &mut T) -> T::ExprOutput {
        match self {
            Expr::Literal(node) => node.accept(translator),
            Expr::VariableRef(node) => node.accept(translator),
            Expr::Assignment(node) => node.accept(translator),
            Expr::Binary(node) => node.accept(translator),
            Expr::Unary(node) => node.accept(translator),
            Expr::Ternary(node) => node.accept(translator),
            Expr::ListInit(node) => node.accept(translator),
            Expr::TupleInit(node) => node.accept(translator),
            Expr::ItemRef(node) => node.accept(translator),
            Expr::InlineFunction(node) => node.accept(translator),
            Expr::FunctionCall(node) => node.accept(translator),
            Expr::AnonymousCall(node) => node.accept(translator),
            Expr::MethodCall(node) => node.accept(translator),
            Expr::StaticMethodCall(node) => node.accept(translator),
            Expr::PropertyRef(node) => node.accept(translator),
            Expr::StaticPropertyRef(node) => node.accept(translator),
            Expr::ConstructorCall(node) => node.accept(translator),
            Expr::ParentMethodCall(node) => node.accept(translator),
            Expr::ParentConstructorCall(node) => node.accept(translator),
            Expr::SelfRef(node) => node.accept(translator),
        }
    }
}

impl StmtNode for Stmt {
    fn accept<T: Translator + ?Sized>(&self, translator: &mut T) -> T::StmtOutput {
        match self {
            Stmt::Block(node) => node.accept(translator),
            Stmt::Expr(node) => node.accept(translator),
            Stmt::IfElse(node) => node.accept(translator),
            Stmt::While(node) => node.accept(translator),
            Stmt::DoLoop(node) => node.accept(translator),
            Stmt::For(node) => node.accept(translator),
            Stmt::ForEach(node) => node.accept(translator),
            Stmt::Switch(node) => node.accept(translator),
            Stmt::Continue(node) => node.accept(translator),
            Stmt::Break(node) => node.accept(translator),
            Stmt::Goto(node) => node.accept(translator),
            Stmt::Return(node) => node.accept(translator),
            Stmt::Throw(node) => node.accept(translator),
            Stmt::TryCatch(node) => node.accept(translator),
            Stmt::Label(node) => node.accept(translator),
            Stmt::VarDecl(node) => node.accept(translator),
            Stmt::ConstDecl(node) => node.accept(translator),
            Stmt::FunctionDecl(node) => node.accept(translator),
            Stmt::ClassDef(node) => node.accept(translator),
        }
    }
}
