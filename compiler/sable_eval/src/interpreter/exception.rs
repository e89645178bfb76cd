//! Pre-interned names for the built-in `Exception` class.

use sable_ir::{Name, StringInterner};

pub(crate) const EXCEPTION_CLASS: &str = "Exception";

/// Field names of `Exception`, interned once at construction.
#[derive(Clone, Copy)]
pub(crate) struct ExceptionNames {
    pub(crate) name: Name,
    pub(crate) message: Name,
    pub(crate) file: Name,
    pub(crate) line: Name,
}

impl ExceptionNames {
    pub(crate) const FIELDS: [&'static str; 4] = ["name", "message", "file", "line"];

    pub(crate) fn new(interner: &StringInterner) -> Self {
        let [name, message, file, line] = Self::FIELDS.map(|field| interner.intern(field));
        Self {
            name,
            message,
            file,
            line,
        }
    }
}
