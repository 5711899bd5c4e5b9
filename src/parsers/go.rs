use anyhow::Result;
use std::path::Path;
use tree_sitter::Node as TSNode;

use super::common::{extract_text, find_child_by_kind, find_children_by_kind, TreeSitterParser};
use super::{Declaration, DeclarationKind, ParsedFile};

/// Extracts the package clause and the file-scope symbol table of a Go file.
pub struct GoParser {
    parser: TreeSitterParser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let language = tree_sitter_go::language();
        let parser = TreeSitterParser::new(language)?;
        Ok(Self { parser })
    }

    pub fn parse_file(&mut self, file_path: &Path) -> Result<ParsedFile> {
        let source = self.parser.read_source(file_path)?;
        self.parse_source(&source, file_path)
    }

    pub fn parse_source(&mut self, source: &str, file_path: &Path) -> Result<ParsedFile> {
        let tree = self.parser.parse_source(source, file_path)?;
        let source_bytes = source.as_bytes();
        let root_node = tree.root_node();

        let package = self
            .extract_package(&root_node, source_bytes)
            .ok_or_else(|| anyhow::anyhow!("{}: missing package clause", file_path.display()))?;

        let mut declarations = Vec::new();
        self.extract_declarations(&root_node, source_bytes, &mut declarations);

        Ok(ParsedFile {
            path: file_path.to_path_buf(),
            package,
            declarations,
        })
    }

    fn extract_package(&self, root: &TSNode, source: &[u8]) -> Option<String> {
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            if child.kind() == "package_clause" {
                return find_child_by_kind(&child, "package_identifier")
                    .map(|identifier| extract_text(&identifier, source).to_string());
            }
        }
        None
    }

    fn extract_declarations(
        &self,
        root: &TSNode,
        source: &[u8],
        declarations: &mut Vec<Declaration>,
    ) {
        let mut cursor = root.walk();

        // Only direct children of the root are file scope; methods are bound
        // to their receiver type and never enter it.
        for child in root.children(&mut cursor) {
            match child.kind() {
                "const_declaration" => self.process_value_declaration(
                    &child,
                    "const_spec",
                    DeclarationKind::Const,
                    source,
                    declarations,
                ),
                "var_declaration" => self.process_value_declaration(
                    &child,
                    "var_spec",
                    DeclarationKind::Var,
                    source,
                    declarations,
                ),
                "type_declaration" => self.process_type_declaration(&child, source, declarations),
                "function_declaration" => {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        push_declaration(&name_node, DeclarationKind::Func, source, declarations);
                    }
                }
                _ => {}
            }
        }
    }

    fn process_value_declaration(
        &self,
        declaration: &TSNode,
        spec_kind: &str,
        kind: DeclarationKind,
        source: &[u8],
        declarations: &mut Vec<Declaration>,
    ) {
        // Grouped specs sit directly under the declaration in older grammars
        // and inside a `*_spec_list` node in newer ones.
        let list_kind = format!("{spec_kind}_list");
        let container = find_child_by_kind(declaration, &list_kind).unwrap_or(*declaration);

        let mut cursor = container.walk();
        for spec in container.children(&mut cursor) {
            if spec.kind() != spec_kind {
                continue;
            }
            // Names are the leading direct identifiers; types and values are
            // nested under their own nodes.
            for identifier in find_children_by_kind(&spec, "identifier") {
                push_declaration(&identifier, kind, source, declarations);
            }
        }
    }

    fn process_type_declaration(
        &self,
        type_decl: &TSNode,
        source: &[u8],
        declarations: &mut Vec<Declaration>,
    ) {
        let mut cursor = type_decl.walk();
        for spec in type_decl.children(&mut cursor) {
            if spec.kind() == "type_spec" || spec.kind() == "type_alias" {
                if let Some(name) = spec.child_by_field_name("name") {
                    push_declaration(&name, DeclarationKind::Type, source, declarations);
                }
            }
        }
    }
}

fn push_declaration(
    name_node: &TSNode,
    kind: DeclarationKind,
    source: &[u8],
    declarations: &mut Vec<Declaration>,
) {
    let name = extract_text(name_node, source);
    if name.is_empty() || name == "_" {
        return;
    }
    let line_number = name_node.start_position().row + 1;
    declarations.push(Declaration::new(name, kind, line_number));
}
