//! # GONAME
//!
//! Renames underscore-separated Go identifiers to mixedCaps.
//!
//! GONAME parses the files of one Go package, collects the package-level
//! constants and variables whose names are written like `MAX_RETRY_COUNT`
//! or `default_timeout`, and either lists the proposed names or hands each
//! one to `gorename` so every reference in the package is rewritten.
//!
//! ## Pipeline
//!
//! - **Load**: [`core::PackageLoader`] resolves the package and parses its
//!   files (in-package tests included) with tree-sitter
//! - **Scan**: [`core::DeclarationScanner`] applies [`core::rename`] to each
//!   file-scope constant and variable
//! - **Execute**: [`core::RenameExecutor`] prints the targets or applies them

pub mod core;
pub mod parsers;
