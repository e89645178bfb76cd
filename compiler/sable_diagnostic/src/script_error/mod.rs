//! Located script errors.
//!
//! [`ScriptError`] is the only error type that crosses from the engine to
//! the host. It carries an [`ErrorCode`], a message, the file name and span
//! of the node that raised it, and optionally the platform error that caused
//! it.
//!
//! Location is attached exactly once: [`ScriptError::located_at`] is a no-op
//! on an error that already has a non-dummy span, so an error re-raised
//! through nested calls keeps the innermost location.

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use sable_ir::Span;

use crate::ErrorCode;

/// A script error with optional source position and cause.
#[derive(Clone)]
pub struct ScriptError {
    code: ErrorCode,
    message: String,
    file_name: Option<Rc<str>>,
    span: Span,
    source: Option<Rc<dyn Error>>,
}

/// Result alias for fallible engine operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

impl ScriptError {
    /// Create an unlocated error.
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ScriptError {
            code,
            message: message.into(),
            file_name: None,
            span: Span::DUMMY,
            source: None,
        }
    }

    /// Wrap a platform error; the message is taken from it.
    #[cold]
    pub fn from_source(code: ErrorCode, source: impl Error + 'static) -> Self {
        ScriptError {
            code,
            message: String::new(),
            file_name: None,
            span: Span::DUMMY,
            source: Some(Rc::new(source)),
        }
    }

    /// Attach an originating error.
    #[must_use]
    pub fn with_source(mut self, source: Rc<dyn Error>) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach a location unless one is already present.
    #[must_use]
    pub fn located_at(mut self, file_name: &Rc<str>, span: Span) -> Self {
        if self.span.is_dummy() && !span.is_dummy() {
            self.span = span;
            self.file_name = Some(Rc::clone(file_name));
        } else if self.file_name.is_none() && !self.span.is_dummy() {
            self.file_name = Some(Rc::clone(file_name));
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The message, falling back to the cause's message.
    pub fn message(&self) -> String {
        match (&self.source, self.message.is_empty()) {
            (Some(source), true) => source.to_string(),
            _ => self.message.clone(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn is_located(&self) -> bool {
        !self.span.is_dummy()
    }

    /// The originating error, for downcasting.
    pub fn cause(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref()
    }

    /// Shared handle to the originating error.
    pub fn cause_rc(&self) -> Option<&Rc<dyn Error>> {
        self.source.as_ref()
    }
}

impl fmt::Debug for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptError")
            .field("code", &self.code)
            .field("message", &self.message())
            .field("file_name", &self.file_name)
            .field("span", &self.span)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_located() {
            let file = self.file_name.as_deref().unwrap_or("<script>");
            write!(f, "{file}:{}: ", self.span.start)?;
        }
        write!(f, "error[{}]: {}", self.code, self.message())
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests;
