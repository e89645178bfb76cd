use std::fmt;

/// Error codes for every diagnostic the engine can raise.
///
/// Format: E#### where the first digit is the category:
/// - E1xxx: Syntax errors (raised by the parser, before execution)
/// - E2xxx: Unresolved names
/// - E3xxx: Arity and type errors
/// - E4xxx: Scope violations and write protection
/// - E5xxx: Arithmetic errors
/// - E6xxx: Pack-format errors
/// - E9xxx: Runtime errors (user throws, jumps, resource limits)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax (E1xxx)
    /// Malformed source
    E1001,

    // Unresolved names (E2xxx)
    /// Undefined variable
    E2001,
    /// Undefined function
    E2002,
    /// Undefined class
    E2003,
    /// No such member (method, field or property)
    E2004,
    /// Undefined label
    E2005,
    /// Name already declared in this scope
    E2006,

    // Arity and type (E3xxx)
    /// Wrong number of arguments
    E3001,
    /// Operand or argument type mismatch
    E3002,
    /// Value is not callable
    E3003,
    /// Invalid assignment target or non-variable binding
    E3004,
    /// Invalid class definition (inheritance or override rule)
    E3005,
    /// Cannot instantiate an abstract or static class
    E3006,

    // Scope violations (E4xxx)
    /// Member not accessible from the calling context
    E4001,
    /// Write to a constant or final binding
    E4002,
    /// Static member used through an instance, or instance member without one
    E4003,

    // Arithmetic (E5xxx)
    /// Division by zero
    E5001,
    /// Integer overflow
    E5002,
    /// Malformed decimal literal
    E5003,

    // Pack format (E6xxx)
    /// Malformed format string
    E6001,
    /// Values or bytes do not match the format
    E6002,

    // Runtime (E9xxx)
    /// Exception thrown by a script
    E9001,
    /// Misplaced jump (break/continue outside a loop, jump out of finally)
    E9002,
    /// Call depth limit exceeded
    E9003,
    /// Item index out of range
    E9004,
}

/// Broad error taxonomy, derived from the code's leading digit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCategory {
    Syntax,
    UnresolvedName,
    ArityOrType,
    ScopeViolation,
    Arithmetic,
    Format,
    Runtime,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
            ErrorCode::E9004 => "E9004",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.as_str().as_bytes().get(1) {
            Some(b'1') => ErrorCategory::Syntax,
            Some(b'2') => ErrorCategory::UnresolvedName,
            Some(b'3') => ErrorCategory::ArityOrType,
            Some(b'4') => ErrorCategory::ScopeViolation,
            Some(b'5') => ErrorCategory::Arithmetic,
            Some(b'6') => ErrorCategory::Format,
            _ => ErrorCategory::Runtime,
        }
    }

    /// Short name used for the `name` field of script-visible exceptions.
    pub fn title(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Syntax => "SyntaxError",
            ErrorCategory::UnresolvedName => "NameError",
            ErrorCategory::ArityOrType => "TypeError",
            ErrorCategory::ScopeViolation => "ScopeError",
            ErrorCategory::Arithmetic => "ArithmeticError",
            ErrorCategory::Format => "FormatError",
            ErrorCategory::Runtime => "RuntimeError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(ErrorCode::E1001.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::E2005.category(), ErrorCategory::UnresolvedName);
        assert_eq!(ErrorCode::E3001.category(), ErrorCategory::ArityOrType);
        assert_eq!(ErrorCode::E4001.category(), ErrorCategory::ScopeViolation);
        assert_eq!(ErrorCode::E5001.category(), ErrorCategory::Arithmetic);
        assert_eq!(ErrorCode::E6001.category(), ErrorCategory::Format);
        assert_eq!(ErrorCode::E9001.category(), ErrorCategory::Runtime);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::E4001.to_string(), "E4001");
        assert_eq!(ErrorCode::E5001.title(), "ArithmeticError");
        assert_eq!(ErrorCode::E9004.to_string(), "E9004");
        assert_eq!(ErrorCode::E9004.title(), "RuntimeError");
    }
}
