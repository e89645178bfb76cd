//! Host context: what an embedding application hands the engine up front.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use sable_value::Value;

/// Pre-declared bindings, import search paths and referenced modules.
///
/// Bindings become variables of the root frame. Search paths and references
/// are kept for host-side module loading; the interpreter itself only
/// exposes them.
#[derive(Clone, Debug, Default)]
pub struct ScriptContext {
    bindings: FxHashMap<String, Value>,
    search_paths: Vec<PathBuf>,
    references: Vec<String>,
}

impl ScriptContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bind(name, value);
        self
    }

    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(reference.into());
        self
    }

    /// Add or replace a binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn search_paths(&self) -> impl Iterator<Item = &Path> {
        self.search_paths.iter().map(PathBuf::as_path)
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }
}
