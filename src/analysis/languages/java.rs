//! Java front end using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node};

use super::helpers::{
    capture_texts, child_of_kind, children_of_kind, count_of_kind, field_text, node_text,
    parse_source, split_qualified,
};
use crate::analysis::{
    ExecutableDecl, ExecutableRole, LanguageFrontend, NodeKind, ParsedFile, TypeDecl, TypeFlavor,
};

/// Tree-sitter query for the package declaration.
const PACKAGE_QUERY: &str = r#"
(package_declaration
  [(scoped_identifier) (identifier)] @package_name
)
"#;

pub struct JavaFrontend {
    language: Language,
}

impl JavaFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn type_decl(node: Node, source: &[u8], flavor: TypeFlavor) -> NodeKind {
        let arity = count_of_kind(node.child_by_field_name("type_parameters"), "type_parameter");
        match field_text(node, "name", source) {
            Some(name) => NodeKind::Type(TypeDecl::named(name, flavor).with_arity(arity)),
            None => NodeKind::Other,
        }
    }

    fn executable(node: Node, source: &[u8], role: ExecutableRole) -> NodeKind {
        let Some(name) = field_text(node, "name", source) else {
            return NodeKind::Other;
        };
        NodeKind::Executable(
            ExecutableDecl::named(name, role).with_parameters(Self::parameter_types(node, source)),
        )
    }

    fn parameter_types(node: Node, source: &[u8]) -> Vec<String> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut types = Vec::new();
        for param in children_of_kind(params, &["formal_parameter", "spread_parameter"]) {
            if param.kind() == "formal_parameter" {
                if let Some(ty) = field_text(param, "type", source) {
                    types.push(ty);
                }
            } else {
                let mut cursor = param.walk();
                let ty = param
                    .named_children(&mut cursor)
                    .find(|c| c.kind() != "modifiers" && c.kind() != "variable_declarator");
                if let Some(ty) = ty {
                    types.push(format!("{}...", node_text(ty, source)));
                }
            }
        }
        types
    }
}

impl Default for JavaFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFrontend for JavaFrontend {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        parse_source(&self.language, "Java", path, source)
    }

    fn classify(&self, node: Node, source: &[u8]) -> NodeKind {
        match node.kind() {
            "class_declaration" | "enum_declaration" | "record_declaration" => {
                Self::type_decl(node, source, TypeFlavor::Class)
            }
            "interface_declaration" => Self::type_decl(node, source, TypeFlavor::Interface),
            "annotation_type_declaration" => Self::type_decl(node, source, TypeFlavor::Annotation),
            "object_creation_expression" if child_of_kind(node, &["class_body"]).is_some() => {
                NodeKind::Type(TypeDecl::anonymous())
            }
            "method_declaration" => Self::executable(node, source, ExecutableRole::Method),
            "constructor_declaration" | "compact_constructor_declaration" => {
                Self::executable(node, source, ExecutableRole::Constructor)
            }
            "lambda_expression" => NodeKind::Executable(ExecutableDecl::anonymous()),
            _ => NodeKind::Other,
        }
    }

    fn file_namespace(&self, parsed: &ParsedFile) -> Vec<String> {
        capture_texts(&self.language, PACKAGE_QUERY, "package_name", parsed)
            .ok()
            .and_then(|names| names.into_iter().next())
            .map(|name| split_qualified(&name, "."))
            .unwrap_or_default()
    }
}
