use super::*;
use pretty_assertions::assert_eq;

#[derive(Debug)]
struct Cause;

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("disk on fire")
    }
}

impl Error for Cause {}

fn file() -> Rc<str> {
    Rc::from("main.sbl")
}

#[test]
fn test_unlocated_display() {
    let err = ScriptError::new(ErrorCode::E2001, "undefined variable `x`");
    assert!(!err.is_located());
    assert_eq!(err.to_string(), "error[E2001]: undefined variable `x`");
}

#[test]
fn test_located_at_sets_location() {
    let span = Span::on_line(2, 20, 24, 25);
    let err = ScriptError::new(ErrorCode::E2001, "undefined variable `x`").located_at(&file(), span);
    assert!(err.is_located());
    assert_eq!(err.span(), span);
    assert_eq!(err.file_name(), Some("main.sbl"));
    assert_eq!(
        err.to_string(),
        "main.sbl:3:5: error[E2001]: undefined variable `x`"
    );
}

#[test]
fn test_located_at_applies_once() {
    let inner = Span::on_line(5, 100, 104, 110);
    let outer = Span::on_line(1, 10, 10, 30);
    let err = ScriptError::new(ErrorCode::E5001, "division by zero")
        .located_at(&file(), inner)
        .located_at(&Rc::from("other.sbl"), outer);
    assert_eq!(err.span(), inner);
    assert_eq!(err.file_name(), Some("main.sbl"));
}

#[test]
fn test_dummy_span_does_not_locate() {
    let err = ScriptError::new(ErrorCode::E5001, "division by zero").located_at(&file(), Span::DUMMY);
    assert!(!err.is_located());
    assert_eq!(err.file_name(), None);
}

#[test]
fn test_source_supplies_message() {
    let err = ScriptError::from_source(ErrorCode::E9001, Cause);
    assert_eq!(err.message(), "disk on fire");
    assert!(err.cause().is_some_and(|c| c.downcast_ref::<Cause>().is_some()));
    assert!(Error::source(&err).is_some());
}
