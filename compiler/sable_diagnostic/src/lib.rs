//! Sable diagnostics.
//!
//! Error codes ([`ErrorCode`]) and the located [`ScriptError`] that every
//! engine failure is reported through.

mod error_code;
mod script_error;

pub use error_code::{ErrorCategory, ErrorCode};
pub use script_error::{ScriptError, ScriptResult};
