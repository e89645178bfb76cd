mod common;

use common::*;
use pretty_assertions::assert_eq;
use sable::ir::ast::{AssignOp, Binary, BinaryOp, Expr, UnaryOp};
use sable::ir::Span;
use sable::{ErrorCode, Value};

#[test]
fn test_break_inside_nested_conditional() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("i", int(0)),
        while_loop(
            boolean(true),
            vec![
                s.assign_to(s.var("i"), AssignOp::Add, int(1)),
                if_then(bin(BinaryOp::Eq, s.var("i"), int(3)), vec![brk()]),
            ],
        ),
    ]);
    ok(result);
    assert_eq!(engine.global("i"), Some(Value::Int(3)));
}

#[test]
fn test_continue_in_for_still_runs_updaters() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("sum", int(0)),
        for_loop(
            vec![s.let_var("i", int(0))],
            Some(bin(BinaryOp::Lt, s.var("i"), int(4))),
            vec![s.assignment(s.var("i"), AssignOp::Add, int(1))],
            vec![
                if_then(bin(BinaryOp::Eq, s.var("i"), int(2)), vec![cont()]),
                s.assign_to(s.var("sum"), AssignOp::Add, s.var("i")),
            ],
        ),
    ]);
    ok(result);
    assert_eq!(engine.global("sum"), Some(Value::Int(4)));
    assert_eq!(engine.global("i"), None);
}

#[test]
fn test_do_loop_runs_body_once() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("n", int(0)),
        do_loop(vec![s.assign_to(s.var("n"), AssignOp::Add, int(1))], boolean(false)),
    ]);
    ok(result);
    assert_eq!(engine.global("n"), Some(Value::Int(1)));
}

#[test]
fn test_foreach_over_list_with_index() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("acc", int(0)),
        s.for_each(
            Some("i"),
            "v",
            list(vec![int(10), int(20), int(30)]),
            vec![s.assign_to(
                s.var("acc"),
                AssignOp::Add,
                bin(BinaryOp::Mul, s.var("i"), s.var("v")),
            )],
        ),
    ]);
    ok(result);
    assert_eq!(engine.global("acc"), Some(Value::Int(80)));
}

#[test]
fn test_foreach_over_string_characters() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("out", text("")),
        s.for_each(
            None,
            "c",
            text("abc"),
            vec![s.assign("out", bin(BinaryOp::Add, s.var("c"), s.var("out")))],
        ),
    ]);
    ok(result);
    assert_eq!(engine.global("out"), Some(string("cba")));
}

#[test]
fn test_foreach_rejects_non_iterable() {
    let s = Script::new();
    let (_, result) = s.run(vec![s.for_each(None, "x", int(5), vec![])]);
    assert_eq!(code(result), ErrorCode::E3002);
}

#[test]
fn test_goto_from_inner_block_to_enclosing_label() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("n", int(0)),
        block(vec![
            s.label("again"),
            s.assign_to(s.var("n"), AssignOp::Add, int(1)),
            if_then(bin(BinaryOp::Lt, s.var("n"), int(3)), vec![s.goto("again")]),
        ]),
    ]);
    ok(result);
    assert_eq!(engine.global("n"), Some(Value::Int(3)));
}

#[test]
fn test_goto_into_a_label_of_another_function_fails() {
    let s = Script::new();
    let (_, result) = s.run(vec![
        s.label("outside"),
        s.function("f", &[], vec![s.goto("outside")]),
        stmt(s.call("f", vec![])),
    ]);
    assert_eq!(code(result), ErrorCode::E2005);
}

#[test]
fn test_return_from_inside_a_loop() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.function(
            "find",
            &[],
            vec![
                s.let_var("i", int(0)),
                while_loop(
                    boolean(true),
                    vec![
                        if_then(
                            bin(BinaryOp::Eq, s.var("i"), int(4)),
                            vec![ret(bin(BinaryOp::Mul, s.var("i"), int(10)))],
                        ),
                        s.assign_to(s.var("i"), AssignOp::Add, int(1)),
                    ],
                ),
            ],
        ),
        s.let_var("r", s.call("find", vec![])),
    ]);
    ok(result);
    assert_eq!(engine.global("r"), Some(Value::Int(40)));
}

#[test]
fn test_top_level_return_value_ends_program() {
    let s = Script::new();
    let (engine, result) = s.run(vec![ret(int(7)), s.let_var("after", int(1))]);
    assert_eq!(ok(result), Value::Int(7));
    assert_eq!(engine.global("after"), None);
}

#[test]
fn test_thrown_value_crosses_calls() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("caught", void()),
        s.function("fail", &[], vec![throw(text("boom"))]),
        s.function("middle", &[], vec![stmt(s.call("fail", vec![]))]),
        s.try_catch(
            vec![stmt(s.call("middle", vec![]))],
            Some(("e", vec![s.assign("caught", s.var("e"))])),
            None,
        ),
    ]);
    ok(result);
    assert_eq!(engine.global("caught"), Some(string("boom")));
}

#[test]
fn test_uncaught_throw_reports_thrown_value() {
    let s = Script::new();
    let (_, result) = s.run(vec![throw(int(3))]);
    let error = err(result);
    assert_eq!(error.code(), ErrorCode::E9001);
}

#[test]
fn test_engine_error_becomes_exception_object() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("name", void()),
        s.let_var("message", void()),
        s.try_catch(
            vec![stmt(bin(BinaryOp::Div, int(1), int(0)))],
            Some((
                "e",
                vec![
                    s.assign("name", s.prop(s.var("e"), "name")),
                    s.assign("message", s.prop(s.var("e"), "message")),
                ],
            )),
            None,
        ),
    ]);
    ok(result);
    assert_eq!(engine.global("name"), Some(string(ErrorCode::E5001.title())));
    assert_eq!(engine.global("message"), Some(string("division by zero")));
}

#[test]
fn test_catch_and_finally_order() {
    let s = Script::new();
    let (mut engine, out) = s.engine();
    let program = s.program(vec![s.try_catch(
        vec![throw(int(1)), stmt(s.call("println", vec![text("unreached")]))],
        Some(("e", vec![stmt(s.call("println", vec![text("caught "), s.var("e")]))])),
        Some(vec![stmt(s.call("println", vec![text("done")]))]),
    )]);
    ok(engine.execute_program(&program));
    assert_eq!(out.output(), "caught 1\ndone\n");
}

#[test]
fn test_located_error_display() {
    let s = Script::new();
    let division = Expr::Binary(Binary {
        op: BinaryOp::Div,
        left: Box::new(int(1)),
        right: Box::new(int(0)),
        span: Span::on_line(2, 20, 24, 29),
    });
    let (_, result) = s.run(vec![s.let_var("x", division)]);
    let error = err(result);
    assert!(error.is_located());
    assert_eq!(
        error.to_string(),
        "test.sbl:3:5: error[E5001]: division by zero"
    );
}

#[test]
fn test_switch_on_strings_with_fall_through() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("score", int(0)),
        s.function(
            "rate",
            &["grade"],
            vec![
                s.assign("score", int(0)),
                switch(
                    s.var("grade"),
                    vec![(text("a"), 0), (text("b"), 1), (text("c"), 3)],
                    Some(4),
                    vec![
                        s.assign_to(s.var("score"), AssignOp::Add, int(10)),
                        s.assign_to(s.var("score"), AssignOp::Add, int(5)),
                        brk(),
                        s.assign_to(s.var("score"), AssignOp::Add, int(1)),
                        ret(unary(UnaryOp::Neg, int(1))),
                    ],
                ),
                ret(s.var("score")),
            ],
        ),
        s.let_var("a", s.call("rate", vec![text("a")])),
        s.let_var("b", s.call("rate", vec![text("b")])),
        s.let_var("c", s.call("rate", vec![text("c")])),
        s.let_var("other", s.call("rate", vec![text("z")])),
    ]);
    ok(result);
    assert_eq!(engine.global("a"), Some(Value::Int(15)));
    assert_eq!(engine.global("b"), Some(Value::Int(5)));
    assert_eq!(engine.global("c"), Some(Value::Int(-1)));
    assert_eq!(engine.global("other"), Some(Value::Int(-1)));
}

#[test]
fn test_goto_inside_switch_body() {
    let s = Script::new();
    let (engine, result) = s.run(vec![
        s.let_var("n", int(0)),
        switch(
            int(1),
            vec![(int(1), 0)],
            None,
            vec![
                s.goto("skip"),
                s.assign("n", int(99)),
                s.label("skip"),
                s.assign_to(s.var("n"), AssignOp::Add, int(1)),
            ],
        ),
    ]);
    ok(result);
    assert_eq!(engine.global("n"), Some(Value::Int(1)));
}
