use super::loader::Package;
use super::naming::rename;
use super::target::{RenameTarget, RenameTargets};
use crate::parsers::ParsedFile;

/// Collects rename targets from the file-scope constants and variables of
/// parsed Go files.
pub struct DeclarationScanner;

impl DeclarationScanner {
    pub fn new() -> Self {
        Self
    }

    /// Appends a target for every constant or variable in `file` whose name
    /// changes under [`rename`]. Existing entries in `targets` are untouched.
    pub fn scan_file(&self, file: &ParsedFile, package_spec: &str, targets: &mut RenameTargets) {
        for declaration in &file.declarations {
            if !declaration.kind.is_value() {
                continue;
            }

            let formatted = rename(&declaration.name);
            if formatted != declaration.name {
                targets.push(RenameTarget::new(package_spec, &declaration.name, formatted));
            }
        }
    }

    pub fn scan_package(&self, package: &Package, package_spec: &str) -> RenameTargets {
        let mut targets = RenameTargets::new();
        for file in &package.files {
            self.scan_file(file, package_spec, &mut targets);
        }
        targets
    }
}

impl Default for DeclarationScanner {
    fn default() -> Self {
        Self::new()
    }
}
