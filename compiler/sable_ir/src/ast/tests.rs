use super::*;
use crate::{Name, Span, Spanned, StringInterner};
use pretty_assertions::assert_eq;

fn label(name: Name) -> Stmt {
    Stmt::Label(Label {
        name,
        span: Span::DUMMY,
    })
}

fn brk() -> Stmt {
    Stmt::Break(Break { span: Span::DUMMY })
}

#[test]
fn test_block_collects_labels() {
    let interner = StringInterner::new();
    let top = interner.intern("top");
    let end = interner.intern("end");
    let block = Block::new(vec![label(top), brk(), brk(), label(end)], Span::DUMMY);
    assert_eq!(block.labels.get(&top), Some(&0));
    assert_eq!(block.labels.get(&end), Some(&3));
    assert_eq!(block.labels.len(), 2);
}

#[test]
fn test_nested_block_labels_stay_local() {
    let interner = StringInterner::new();
    let inner = interner.intern("inner");
    let nested = Stmt::Block(Block::new(vec![label(inner)], Span::DUMMY));
    let outer = Block::new(vec![brk(), nested], Span::DUMMY);
    assert!(outer.labels.is_empty());
}

#[test]
fn test_program_append_is_copy_on_write() {
    let interner = StringInterner::new();
    let again = interner.intern("again");
    let mut program = Program::new("main.sbl", vec![brk()]);
    let snapshot = program.clone();

    program.append([label(again)]).append([brk()]);

    assert_eq!(snapshot.statements().len(), 1);
    assert_eq!(program.statements().len(), 3);
    assert_eq!(program.labels().get(&again), Some(&1));
    assert!(snapshot.labels().is_empty());
}

#[test]
fn test_program_insert_shifts_labels() {
    let interner = StringInterner::new();
    let here = interner.intern("here");
    let mut program = Program::new("main.sbl", vec![label(here)]);
    program.insert(0, [brk(), brk()]);
    assert_eq!(program.labels().get(&here), Some(&2));

    program.insert(99, [brk()]);
    assert_eq!(program.statements().len(), 4);
}

#[test]
fn test_function_arity_with_defaults() {
    let interner = StringInterner::new();
    let def = FunctionDef {
        params: vec![
            Param {
                name: interner.intern("a"),
                default: None,
            },
            Param {
                name: interner.intern("b"),
                default: Some(Expr::void()),
            },
        ],
        body: Block::new(vec![], Span::DUMMY),
    };
    assert_eq!(def.required_arity(), 1);
    assert!(!def.accepts(0));
    assert!(def.accepts(1));
    assert!(def.accepts(2));
    assert!(!def.accepts(3));
}

#[test]
fn test_modifier_predicates() {
    assert!(Modifier::StaticFinal.is_static());
    assert!(Modifier::StaticFinal.is_final());
    assert!(!Modifier::Final.is_static());
    assert!(Modifier::Abstract.is_abstract());
    assert_eq!(Modifier::StaticFinal.to_string(), "static final");
    assert_eq!(Scope::default(), Scope::Public);
}

#[test]
fn test_stmt_span() {
    let span = Span::on_line(0, 0, 3, 9);
    let stmt = Stmt::Continue(Continue { span });
    assert_eq!(stmt.span(), span);
}
