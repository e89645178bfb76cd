//! Jump signals: the control-flow outcome of executing a statement.

use sable_ir::Name;
use sable_value::Value;

/// What a statement asks its enclosing construct to do next.
///
/// Sequences stop at the first signal that is not `None` and hand it to
/// their caller. Loops absorb `Continue` and `Break`, function bodies absorb
/// `Return`, and a sequence that owns the label absorbs `Goto`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Jump {
    #[default]
    None,
    Continue,
    Break,
    Goto(Name),
    Return(Value),
}

impl Jump {
    pub fn is_none(&self) -> bool {
        matches!(self, Jump::None)
    }

    /// Keyword for diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            Jump::None => "none",
            Jump::Continue => "continue",
            Jump::Break => "break",
            Jump::Goto(_) => "goto",
            Jump::Return(_) => "return",
        }
    }
}
