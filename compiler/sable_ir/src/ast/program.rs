//! Program root node.

use std::rc::Rc;

use super::{collect_labels, LabelTable, Stmt};

/// A parsed script: file name, top-level statements and their label table.
///
/// The statement list is copy-on-write: [`Program::append`] and
/// [`Program::insert`] never mutate a sequence that another clone still
/// observes.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub file_name: String,
    statements: Rc<Vec<Stmt>>,
    labels: LabelTable,
}

impl Program {
    pub fn new(file_name: impl Into<String>, statements: Vec<Stmt>) -> Self {
        let labels = collect_labels(&statements);
        Program {
            file_name: file_name.into(),
            statements: Rc::new(statements),
            labels,
        }
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Append statements at the end.
    pub fn append(&mut self, statements: impl IntoIterator<Item = Stmt>) -> &mut Self {
        Rc::make_mut(&mut self.statements).extend(statements);
        self.labels = collect_labels(&self.statements);
        self
    }

    /// Insert statements before `index` (clamped to the current length).
    pub fn insert(
        &mut self,
        index: usize,
        statements: impl IntoIterator<Item = Stmt>,
    ) -> &mut Self {
        let target = Rc::make_mut(&mut self.statements);
        let at = index.min(target.len());
        target.splice(at..at, statements);
        self.labels = collect_labels(&self.statements);
        self
    }
}
