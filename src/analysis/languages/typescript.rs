//! TypeScript front end using tree-sitter.
//!
//! Shares declaration shapes with JavaScript and adds interfaces, enums,
//! abstract classes, namespaces, signatures and typed parameters.

use std::path::Path;

use tree_sitter::{Language, Node};

use super::helpers::{children_of_kind, count_of_kind, field_text, node_text, parse_source, split_qualified};
use super::javascript::classify_script;
use crate::analysis::{
    ExecutableDecl, ExecutableRole, LanguageFrontend, NodeKind, ParsedFile, TypeDecl, TypeFlavor,
};

/// Parameter type recorded when no annotation is present.
const UNTYPED_PARAMETER: &str = "any";

pub struct TypeScriptFrontend {
    typescript: Language,
    tsx: Language,
}

impl TypeScriptFrontend {
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn arity(node: Node) -> usize {
        count_of_kind(node.child_by_field_name("type_parameters"), "type_parameter")
    }

    fn parameter_types(node: Node, source: &[u8]) -> Vec<String> {
        // `x => x` has a bare identifier parameter.
        if node.child_by_field_name("parameter").is_some() {
            return vec![UNTYPED_PARAMETER.to_string()];
        }
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        children_of_kind(params, &["required_parameter", "optional_parameter"])
            .into_iter()
            .map(|param| {
                param
                    .child_by_field_name("type")
                    .and_then(|annotation| annotation.named_child(0))
                    .map(|ty| node_text(ty, source).to_string())
                    .unwrap_or_else(|| UNTYPED_PARAMETER.to_string())
            })
            .collect()
    }

    fn namespace(node: Node, source: &[u8]) -> NodeKind {
        match field_text(node, "name", source) {
            Some(name) => {
                let name = name.trim_matches(|c| c == '"' || c == '\'');
                NodeKind::Namespace(split_qualified(name, "."))
            }
            None => NodeKind::Other,
        }
    }
}

impl Default for TypeScriptFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFrontend for TypeScriptFrontend {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx", "mts"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let is_tsx = path.extension().and_then(|e| e.to_str()) == Some("tsx");
        if is_tsx {
            parse_source(&self.tsx, "TSX", path, source)
        } else {
            parse_source(&self.typescript, "TypeScript", path, source)
        }
    }

    fn classify(&self, node: Node, source: &[u8]) -> NodeKind {
        let typed_type = |flavor| match field_text(node, "name", source) {
            Some(name) => NodeKind::Type(TypeDecl::named(name, flavor).with_arity(Self::arity(node))),
            None => NodeKind::Other,
        };
        let signature = |role| match field_text(node, "name", source) {
            Some(name) => NodeKind::Executable(
                ExecutableDecl::named(name, role).with_parameters(Self::parameter_types(node, source)),
            ),
            None => NodeKind::Other,
        };

        match node.kind() {
            "interface_declaration" => typed_type(TypeFlavor::Interface),
            "abstract_class_declaration" | "enum_declaration" => typed_type(TypeFlavor::Class),
            "internal_module" | "module" => Self::namespace(node, source),
            "method_signature" | "abstract_method_signature" => signature(ExecutableRole::Method),
            "function_signature" => signature(ExecutableRole::Function),
            _ => match classify_script(node, source) {
                NodeKind::Type(decl) => NodeKind::Type(decl.with_arity(Self::arity(node))),
                NodeKind::Executable(decl) => NodeKind::Executable(
                    decl.with_parameters(Self::parameter_types(node, source)),
                ),
                other => other,
            },
        }
    }
}
