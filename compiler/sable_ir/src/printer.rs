//! Source printer: a translator that turns an AST back into script text.
//!
//! Output is canonical rather than faithful: one statement per line, four
//! spaces per indentation level, every block braced.

use std::fmt::Write as _;

use crate::ast::{
    AnonymousCall, Assignment, Binary, Block, Break, ClassDef, ConstDecl, ConstructorCall,
    Continue, DoLoop, Expr, ExprStmt, ForEach, ForLoop, FunctionCall, FunctionDecl, FunctionDef,
    Goto, IfElse, InlineFunction, ItemRef, Label, ListInit, Literal, LiteralValue,
    MemberDeclKind, MethodCall, Modifier, Param, ParentConstructorCall, ParentMethodCall, Program,
    PropertyRef, Return, SelfRef, StaticMethodCall, StaticPropertyRef, Stmt, Switch, Ternary,
    Throw, TryCatch, TupleInit, Unary, VarDecl, VariableRef, WhileLoop,
};
use crate::translator::{ExprNode, StmtNode, Translator};
use crate::{Name, StringInterner};

const INDENT: &str = "    ";

pub struct SourcePrinter<'a> {
    interner: &'a StringInterner,
    depth: usize,
}

impl<'a> SourcePrinter<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        SourcePrinter { interner, depth: 0 }
    }

    /// Print a whole program.
    pub fn print_program(interner: &'a StringInterner, program: &Program) -> String {
        program.accept(&mut SourcePrinter::new(interner))
    }

    /// Print a single expression.
    pub fn print_expr(interner: &'a StringInterner, expr: &Expr) -> String {
        expr.accept(&mut SourcePrinter::new(interner))
    }

    fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn line(&self, text: &str) -> String {
        format!("{}{text}\n", INDENT.repeat(self.depth))
    }

    fn args(&mut self, args: &[Expr]) -> String {
        args.iter()
            .map(|arg| arg.accept(self))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn params(&mut self, params: &[Param]) -> String {
        params
            .iter()
            .map(|param| match &param.default {
                Some(default) => format!("{} = {}", self.name(param.name), default.accept(self)),
                None => self.name(param.name).to_owned(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Braced block whose opening brace continues the current line.
    fn block_tail(&mut self, block: &Block) -> String {
        let mut out = String::from("{\n");
        self.depth += 1;
        for stmt in &block.statements {
            out.push_str(&stmt.accept(self));
        }
        self.depth -= 1;
        out.push_str(&INDENT.repeat(self.depth));
        out.push('}');
        out
    }

    /// Body of a compound statement, always rendered as a braced block.
    fn body_tail(&mut self, body: &Stmt) -> String {
        match body {
            Stmt::Block(block) => self.block_tail(block),
            other => {
                let mut out = String::from("{\n");
                self.depth += 1;
                out.push_str(&other.accept(self));
                self.depth -= 1;
                out.push_str(&INDENT.repeat(self.depth));
                out.push('}');
                out
            }
        }
    }

    fn function_tail(&mut self, function: &FunctionDef) -> String {
        let params = self.params(&function.params);
        let body = self.block_tail(&function.body);
        format!("({params}) {body}")
    }

    /// `case`/`default` lines that enter a switch body at `address`.
    fn switch_labels(&mut self, node: &Switch, address: usize) -> String {
        let mut out = String::new();
        for case in node.cases.iter().filter(|case| case.address == address) {
            let value = self.translate_literal(&case.value);
            out.push_str(&self.line(&format!("case {value}:")));
        }
        if node.default == Some(address) {
            out.push_str(&self.line("default:"));
        }
        out
    }
}

impl Translator for SourcePrinter<'_> {
    type ExprOutput = String;
    type StmtOutput = String;

    fn translate_program(&mut self, node: &Program) -> String {
        node.statements()
            .iter()
            .map(|stmt| stmt.accept(self))
            .collect()
    }

    fn translate_literal(&mut self, node: &Literal) -> String {
        match &node.value {
            LiteralValue::Void => "null".to_owned(),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Int(i) => i.to_string(),
            LiteralValue::Float(f) => format!("{f:?}"),
            LiteralValue::Str(s) => format!("{s:?}"),
            LiteralValue::Decimal(text) => format!("{text}m"),
        }
    }

    fn translate_variable_ref(&mut self, node: &VariableRef) -> String {
        self.name(node.name).to_owned()
    }

    fn translate_assignment(&mut self, node: &Assignment) -> String {
        let target = node.target.accept(self);
        let value = node.value.accept(self);
        format!("{target} {} {value}", node.op.as_symbol())
    }

    fn translate_binary(&mut self, node: &Binary) -> String {
        let left = node.left.accept(self);
        let right = node.right.accept(self);
        format!("({left} {} {right})", node.op.as_symbol())
    }

    fn translate_unary(&mut self, node: &Unary) -> String {
        format!("{}{}", node.op.as_symbol(), node.operand.accept(self))
    }

    fn translate_ternary(&mut self, node: &Ternary) -> String {
        let test = node.test.accept(self);
        let a = node.if_true.accept(self);
        let b = node.if_false.accept(self);
        format!("({test} ? {a} : {b})")
    }

    fn translate_list_init(&mut self, node: &ListInit) -> String {
        format!("[{}]", self.args(&node.items))
    }

    fn translate_tuple_init(&mut self, node: &TupleInit) -> String {
        let items = self.args(&node.items);
        if node.items.len() == 1 {
            format!("({items},)")
        } else {
            format!("({items})")
        }
    }

    fn translate_item_ref(&mut self, node: &ItemRef) -> String {
        let target = node.target.accept(self);
        format!("{target}[{}]", node.index.accept(self))
    }

    fn translate_inline_function(&mut self, node: &InlineFunction) -> String {
        format!("function {}", self.function_tail(&node.function))
    }

    fn translate_function_call(&mut self, node: &FunctionCall) -> String {
        format!("{}({})", self.name(node.name), self.args(&node.args))
    }

    fn translate_anonymous_call(&mut self, node: &AnonymousCall) -> String {
        let callee = node.callee.accept(self);
        format!("({callee})({})", self.args(&node.args))
    }

    fn translate_method_call(&mut self, node: &MethodCall) -> String {
        let target = node.target.accept(self);
        format!("{target}.{}({})", self.name(node.name), self.args(&node.args))
    }

    fn translate_static_method_call(&mut self, node: &StaticMethodCall) -> String {
        format!(
            "{}::{}({})",
            self.name(node.class),
            self.name(node.name),
            self.args(&node.args)
        )
    }

    fn translate_property_ref(&mut self, node: &PropertyRef) -> String {
        format!("{}.{}", node.target.accept(self), self.name(node.name))
    }

    fn translate_static_property_ref(&mut self, node: &StaticPropertyRef) -> String {
        format!("{}::{}", self.name(node.class), self.name(node.name))
    }

    fn translate_constructor_call(&mut self, node: &ConstructorCall) -> String {
        format!("new {}({})", self.name(node.class), self.args(&node.args))
    }

    fn translate_parent_method_call(&mut self, node: &ParentMethodCall) -> String {
        format!("super::{}({})", self.name(node.name), self.args(&node.args))
    }

    fn translate_parent_constructor_call(&mut self, node: &ParentConstructorCall) -> String {
        format!("super({})", self.args(&node.args))
    }

    fn translate_self_ref(&mut self, _node: &SelfRef) -> String {
        "this".to_owned()
    }

    fn translate_block(&mut self, node: &Block) -> String {
        let tail = self.block_tail(node);
        self.line(&tail)
    }

    fn translate_expr_stmt(&mut self, node: &ExprStmt) -> String {
        let expr = node.expr.accept(self);
        self.line(&format!("{expr};"))
    }

    fn translate_if_else(&mut self, node: &IfElse) -> String {
        let test = node.test.accept(self);
        let then = self.body_tail(&node.then_branch);
        let mut text = format!("if ({test}) {then}");
        if let Some(else_branch) = &node.else_branch {
            let other = self.body_tail(else_branch);
            let _ = write!(text, " else {other}");
        }
        self.line(&text)
    }

    fn translate_while(&mut self, node: &WhileLoop) -> String {
        let test = node.test.accept(self);
        let body = self.body_tail(&node.body);
        self.line(&format!("while ({test}) {body}"))
    }

    fn translate_do_loop(&mut self, node: &DoLoop) -> String {
        let body = self.body_tail(&node.body);
        let test = node.test.accept(self);
        self.line(&format!("do {body} while ({test});"))
    }

    fn translate_for(&mut self, node: &ForLoop) -> String {
        let saved = self.depth;
        self.depth = 0;
        let init = node
            .initializers
            .iter()
            .map(|stmt| stmt.accept(self).trim_end().trim_end_matches(';').to_owned())
            .collect::<Vec<_>>()
            .join(", ");
        self.depth = saved;
        let guard = node
            .guard
            .as_ref()
            .map(|g| g.accept(self))
            .unwrap_or_default();
        let updaters = self.args(&node.updaters);
        let body = self.body_tail(&node.body);
        self.line(&format!("for ({init}; {guard}; {updaters}) {body}"))
    }

    fn translate_for_each(&mut self, node: &ForEach) -> String {
        let source = node.source.accept(self);
        let binding = match node.index {
            Some(index) => format!("{} => {}", self.name(index), self.name(node.value)),
            None => self.name(node.value).to_owned(),
        };
        let body = self.body_tail(&node.body);
        self.line(&format!("foreach ({binding} in {source}) {body}"))
    }

    fn translate_switch(&mut self, node: &Switch) -> String {
        let subject = node.subject.accept(self);
        let mut out = self.line(&format!("switch ({subject}) {{"));
        self.depth += 1;
        for (address, stmt) in node.body.statements.iter().enumerate() {
            out.push_str(&self.switch_labels(node, address));
            self.depth += 1;
            out.push_str(&stmt.accept(self));
            self.depth -= 1;
        }
        out.push_str(&self.switch_labels(node, node.body.statements.len()));
        self.depth -= 1;
        out.push_str(&self.line("}"));
        out
    }

    fn translate_continue(&mut self, _node: &Continue) -> String {
        self.line("continue;")
    }

    fn translate_break(&mut self, _node: &Break) -> String {
        self.line("break;")
    }

    fn translate_goto(&mut self, node: &Goto) -> String {
        self.line(&format!("goto {};", self.name(node.label)))
    }

    fn translate_return(&mut self, node: &Return) -> String {
        match &node.value {
            Some(value) => {
                let value = value.accept(self);
                self.line(&format!("return {value};"))
            }
            None => self.line("return;"),
        }
    }

    fn translate_throw(&mut self, node: &Throw) -> String {
        let value = node.value.accept(self);
        self.line(&format!("throw {value};"))
    }

    fn translate_try_catch(&mut self, node: &TryCatch) -> String {
        let mut text = format!("try {}", self.block_tail(&node.body));
        if let Some(catch) = &node.catch {
            let body = self.block_tail(&catch.body);
            let _ = write!(text, " catch ({}) {body}", self.name(catch.name));
        }
        if let Some(finally) = &node.finally {
            let body = self.block_tail(finally);
            let _ = write!(text, " finally {body}");
        }
        self.line(&text)
    }

    fn translate_label(&mut self, node: &Label) -> String {
        self.line(&format!("{}:", self.name(node.name)))
    }

    fn translate_var_decl(&mut self, node: &VarDecl) -> String {
        let bindings = node
            .bindings
            .iter()
            .map(|binding| match &binding.init {
                Some(init) => format!("{} = {}", self.name(binding.name), init.accept(self)),
                None => self.name(binding.name).to_owned(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.line(&format!("var {bindings};"))
    }

    fn translate_const_decl(&mut self, node: &ConstDecl) -> String {
        let bindings = node
            .bindings
            .iter()
            .map(|binding| format!("{} = {}", self.name(binding.name), binding.value.accept(self)))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(&format!("const {bindings};"))
    }

    fn translate_function_decl(&mut self, node: &FunctionDecl) -> String {
        let tail = self.function_tail(&node.function);
        self.line(&format!("function {}{tail}", self.name(node.name)))
    }

    fn translate_class_def(&mut self, node: &ClassDef) -> String {
        let mut header = String::new();
        if node.modifier != Modifier::Default {
            let _ = write!(header, "{} ", node.modifier);
        }
        let _ = write!(header, "class {}", self.name(node.name));
        if let Some(parent) = node.super_class {
            let _ = write!(header, " : {}", self.name(parent));
        }
        header.push_str(" {");
        let mut out = self.line(&header);
        self.depth += 1;
        for member in &node.members {
            let mut text = member.scope.to_string();
            if member.modifier != Modifier::Default {
                let _ = write!(text, " {}", member.modifier);
            }
            let name = self.name(member.name);
            match &member.kind {
                MemberDeclKind::Field { init: Some(init) } => {
                    let init = init.accept(self);
                    let _ = write!(text, " {name} = {init};");
                }
                MemberDeclKind::Field { init: None } => {
                    let _ = write!(text, " {name};");
                }
                MemberDeclKind::Method(function) => {
                    let tail = self.function_tail(function);
                    let _ = write!(text, " function {name}{tail}");
                }
                MemberDeclKind::AbstractMethod { params } => {
                    let params = self.params(params);
                    let _ = write!(text, " function {name}({params});");
                }
            }
            out.push_str(&self.line(&text));
        }
        self.depth -= 1;
        out.push_str(&self.line("}"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, CaseLabel, VarBinding};
    use crate::Span;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn int(i: i64) -> Expr {
        Expr::Literal(Literal {
            value: LiteralValue::Int(i),
            span: Span::DUMMY,
        })
    }

    fn var(name: Name) -> Expr {
        Expr::VariableRef(VariableRef {
            name,
            span: Span::DUMMY,
        })
    }

    #[test]
    fn test_print_expression() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let expr = Expr::Binary(Binary {
            op: BinaryOp::Add,
            left: Box::new(var(x)),
            right: Box::new(int(2)),
            span: Span::DUMMY,
        });
        assert_eq!(SourcePrinter::print_expr(&interner, &expr), "(x + 2)");
    }

    #[test]
    fn test_print_program_with_function_and_loop() {
        let interner = StringInterner::new();
        let f = interner.intern("f");
        let n = interner.intern("n");
        let body = Block::new(
            vec![Stmt::While(WhileLoop {
                test: var(n),
                body: Box::new(Stmt::Break(Break { span: Span::DUMMY })),
                span: Span::DUMMY,
            })],
            Span::DUMMY,
        );
        let program = Program::new(
            "t.sbl",
            vec![
                Stmt::VarDecl(VarDecl {
                    bindings: vec![VarBinding {
                        name: n,
                        init: Some(int(1)),
                    }],
                    span: Span::DUMMY,
                }),
                Stmt::FunctionDecl(FunctionDecl {
                    name: f,
                    function: Rc::new(FunctionDef {
                        params: vec![Param {
                            name: n,
                            default: None,
                        }],
                        body,
                    }),
                    span: Span::DUMMY,
                }),
            ],
        );
        let expected = "var n = 1;\n\
                        function f(n) {\n\
                        \x20   while (n) {\n\
                        \x20       break;\n\
                        \x20   }\n\
                        }\n";
        assert_eq!(SourcePrinter::print_program(&interner, &program), expected);
    }

    #[test]
    fn test_print_items_and_tuples() {
        let interner = StringInterner::new();
        let xs = interner.intern("xs");
        let item = Expr::ItemRef(ItemRef {
            target: Box::new(var(xs)),
            index: Box::new(int(-1)),
            span: Span::DUMMY,
        });
        assert_eq!(SourcePrinter::print_expr(&interner, &item), "xs[-1]");

        let pair = Expr::TupleInit(TupleInit {
            items: vec![int(1), item],
            span: Span::DUMMY,
        });
        assert_eq!(SourcePrinter::print_expr(&interner, &pair), "(1, xs[-1])");

        let single = Expr::TupleInit(TupleInit {
            items: vec![int(1)],
            span: Span::DUMMY,
        });
        assert_eq!(SourcePrinter::print_expr(&interner, &single), "(1,)");
    }

    #[test]
    fn test_print_switch_places_labels_at_addresses() {
        let interner = StringInterner::new();
        let n = interner.intern("n");
        let literal = |i| Literal {
            value: LiteralValue::Int(i),
            span: Span::DUMMY,
        };
        let switch = Stmt::Switch(Switch {
            subject: var(n),
            cases: vec![
                CaseLabel {
                    value: literal(1),
                    address: 0,
                },
                CaseLabel {
                    value: literal(2),
                    address: 0,
                },
            ],
            default: Some(1),
            body: Block::new(
                vec![
                    Stmt::Break(Break { span: Span::DUMMY }),
                    Stmt::Break(Break { span: Span::DUMMY }),
                ],
                Span::DUMMY,
            ),
            span: Span::DUMMY,
        });
        let program = Program::new("t.sbl", vec![switch]);
        let expected = "switch (n) {\n\
                        \x20   case 1:\n\
                        \x20   case 2:\n\
                        \x20       break;\n\
                        \x20   default:\n\
                        \x20       break;\n\
                        }\n";
        assert_eq!(SourcePrinter::print_program(&interner, &program), expected);
    }
}
