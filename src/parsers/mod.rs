pub mod common;
pub mod go;

use std::path::PathBuf;

pub use go::GoParser;

/// Syntactic kind of a file-scope symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Const,
    Var,
    Type,
    Func,
}

impl DeclarationKind {
    /// Constants and variables are the only kinds subject to renaming.
    pub fn is_value(self) -> bool {
        matches!(self, DeclarationKind::Const | DeclarationKind::Var)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub line_number: usize,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind, line_number: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line_number,
        }
    }
}

/// One parsed Go source file: its package clause and file-scope symbols in
/// source order.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub package: String,
    pub declarations: Vec<Declaration>,
}

impl ParsedFile {
    pub fn is_test(&self) -> bool {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with("_test.go"))
            .unwrap_or(false)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
