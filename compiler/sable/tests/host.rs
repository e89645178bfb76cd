mod common;

use common::*;
use pretty_assertions::assert_eq;
use sable::{tracing_setup, Engine, Value};

#[test]
fn test_building_an_engine_leaves_tracing_to_the_host() {
    std::env::set_var(tracing_setup::LOG_ENV, "off");

    let mut engine = Engine::new();
    assert_eq!(ok(engine.evaluate(&int(1))), Value::Int(1));
    assert!(!tracing::dispatcher::has_been_set());

    tracing_setup::init();
    assert!(tracing::dispatcher::has_been_set());
    tracing_setup::init();

    let mut engine = Engine::builder().build();
    assert_eq!(ok(engine.evaluate(&int(2))), Value::Int(2));
}
