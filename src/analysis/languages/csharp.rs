//! C# front end using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node};

use super::helpers::{
    child_of_kind, children_of_kind, count_of_kind, field_text, node_text, parse_source,
    split_qualified,
};
use crate::analysis::{
    ExecutableDecl, ExecutableRole, LanguageFrontend, NodeKind, ParsedFile, TypeDecl, TypeFlavor,
};

pub struct CSharpFrontend {
    language: Language,
}

impl CSharpFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }

    fn type_decl(node: Node, source: &[u8], flavor: TypeFlavor) -> NodeKind {
        let arity = count_of_kind(child_of_kind(node, &["type_parameter_list"]), "type_parameter");
        match field_text(node, "name", source) {
            Some(name) => NodeKind::Type(TypeDecl::named(name, flavor).with_arity(arity)),
            None => NodeKind::Other,
        }
    }

    fn executable(node: Node, source: &[u8], role: ExecutableRole) -> NodeKind {
        let Some(name) = field_text(node, "name", source) else {
            return NodeKind::Other;
        };
        let params = node
            .child_by_field_name("parameters")
            .or_else(|| child_of_kind(node, &["parameter_list"]));
        let parameter_types = params
            .map(|list| {
                children_of_kind(list, &["parameter"])
                    .into_iter()
                    .filter_map(|param| field_text(param, "type", source))
                    .collect()
            })
            .unwrap_or_default();

        NodeKind::Executable(ExecutableDecl::named(name, role).with_parameters(parameter_types))
    }
}

impl Default for CSharpFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFrontend for CSharpFrontend {
    fn language_id(&self) -> &'static str {
        "csharp"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["cs"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        parse_source(&self.language, "C#", path, source)
    }

    fn classify(&self, node: Node, source: &[u8]) -> NodeKind {
        match node.kind() {
            "namespace_declaration" => match field_text(node, "name", source) {
                Some(name) => NodeKind::Namespace(split_qualified(&name, ".")),
                None => NodeKind::Other,
            },
            "class_declaration"
            | "struct_declaration"
            | "record_declaration"
            | "record_struct_declaration"
            | "enum_declaration" => Self::type_decl(node, source, TypeFlavor::Class),
            "interface_declaration" => Self::type_decl(node, source, TypeFlavor::Interface),
            "anonymous_object_creation_expression" => NodeKind::Type(TypeDecl::anonymous()),
            "method_declaration" => Self::executable(node, source, ExecutableRole::Method),
            "constructor_declaration" => Self::executable(node, source, ExecutableRole::Constructor),
            "local_function_statement" => Self::executable(node, source, ExecutableRole::Function),
            "lambda_expression" | "anonymous_method_expression" => {
                NodeKind::Executable(ExecutableDecl::anonymous())
            }
            _ => NodeKind::Other,
        }
    }

    fn file_namespace(&self, parsed: &ParsedFile) -> Vec<String> {
        let root = parsed.tree.root_node();
        child_of_kind(root, &["file_scoped_namespace_declaration"])
            .and_then(|ns| ns.child_by_field_name("name"))
            .map(|name| split_qualified(node_text(name, &parsed.source), "."))
            .unwrap_or_default()
    }
}
