//! Go front end using tree-sitter.
//!
//! Go packages span a directory, so the path prefix drops the file name.
//! Methods are declared at file level with a receiver and are attached to
//! the receiver's type name.

use std::path::Path;

use tree_sitter::{Language, Node};

use super::helpers::{children_of_kind, field_text, node_text, parse_source};
use crate::analysis::naming::with_arity;
use crate::analysis::{
    ExecutableDecl, ExecutableRole, LanguageFrontend, NodeKind, PackageScope, ParsedFile,
    TypeDecl, TypeFlavor,
};

pub struct GoFrontend {
    language: Language,
}

impl GoFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    fn type_spec(node: Node, source: &[u8]) -> NodeKind {
        let flavor = match node.child_by_field_name("type").map(|t| t.kind()) {
            Some("struct_type") => TypeFlavor::Class,
            Some("interface_type") => TypeFlavor::Interface,
            _ => return NodeKind::Other,
        };
        let Some(name) = field_text(node, "name", source) else {
            return NodeKind::Other;
        };
        let arity = node
            .child_by_field_name("type_parameters")
            .map(|list| {
                children_of_kind(list, &["type_parameter_declaration"])
                    .into_iter()
                    .map(|decl| count_names(decl).max(1))
                    .sum()
            })
            .unwrap_or(0);

        NodeKind::Type(TypeDecl::named(name, flavor).with_arity(arity))
    }

    fn function(node: Node, source: &[u8], role: ExecutableRole) -> NodeKind {
        let parameters = Self::parameter_types(node, source);
        match field_text(node, "name", source) {
            Some(name) => NodeKind::Executable(
                ExecutableDecl::named(name, role)
                    .with_parameters(parameters)
                    .with_receiver(Self::receiver_type(node, source)),
            ),
            None => NodeKind::Executable(ExecutableDecl::anonymous().with_parameters(parameters)),
        }
    }

    /// One entry per declared parameter; `a, b int` yields two.
    fn parameter_types(node: Node, source: &[u8]) -> Vec<String> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut types = Vec::new();
        for param in children_of_kind(
            params,
            &["parameter_declaration", "variadic_parameter_declaration"],
        ) {
            let Some(ty) = param.child_by_field_name("type") else {
                continue;
            };
            let ty = node_text(ty, source);
            let ty = if param.kind() == "variadic_parameter_declaration" {
                format!("...{ty}")
            } else {
                ty.to_string()
            };
            for _ in 0..count_names(param).max(1) {
                types.push(ty.clone());
            }
        }
        types
    }

    /// Receiver base type with pointers stripped.
    ///
    /// Type arguments are replaced by the arity suffix so the name matches
    /// the generic type's declaration.
    fn receiver_type(node: Node, source: &[u8]) -> Option<String> {
        let list = node.child_by_field_name("receiver")?;
        let param = children_of_kind(list, &["parameter_declaration"])
            .into_iter()
            .next()?;
        let mut ty = param.child_by_field_name("type")?;
        let mut arity = 0;
        loop {
            match ty.kind() {
                "pointer_type" | "parenthesized_type" => ty = ty.named_child(0)?,
                "generic_type" => {
                    arity = ty
                        .child_by_field_name("type_arguments")
                        .map(|args| args.named_child_count())
                        .unwrap_or(0);
                    ty = ty.child_by_field_name("type")?;
                }
                _ => return Some(with_arity(node_text(ty, source), arity)),
            }
        }
    }
}

fn count_names(node: Node) -> usize {
    let mut cursor = node.walk();
    let count = node.children_by_field_name("name", &mut cursor).count();
    count
}

impl Default for GoFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFrontend for GoFrontend {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        parse_source(&self.language, "Go", path, source)
    }

    fn classify(&self, node: Node, source: &[u8]) -> NodeKind {
        match node.kind() {
            "type_spec" => Self::type_spec(node, source),
            "function_declaration" => Self::function(node, source, ExecutableRole::Function),
            "method_declaration" => Self::function(node, source, ExecutableRole::Method),
            "func_literal" => Self::function(node, source, ExecutableRole::Function),
            _ => NodeKind::Other,
        }
    }

    fn package_scope(&self) -> PackageScope {
        PackageScope::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::languages::helpers::testing::{extract_source, full_names};
    use crate::analysis::DepthPolicy;

    const SERVER: &str = r#"
package server

type Server struct{ addr string }

type Handler interface { Serve() }

type Pair[K comparable, V any] struct{}

func (s *Server) Start(port int, hosts ...string) error {
	go func() {}()
	return nil
}

func New(addr, name string) *Server { return nil }
"#;

    #[test]
    fn test_structs_interfaces_and_receivers() {
        let out = extract_source(
            &GoFrontend::new(),
            "internal/server/server.go",
            SERVER,
            DepthPolicy::default(),
        );
        let (types, executables) = full_names(&out);

        assert_eq!(
            types,
            vec![
                "internal/server$Server",
                "internal/server$Handler",
                "internal/server$Pair`2",
            ]
        );
        assert!(out.types[1].is_interface);
        assert_eq!(
            executables,
            vec![
                "internal/server$Server.Start(int, ...string)",
                "internal/server$New(string, string)",
            ]
        );
        assert_eq!(out.executables[0].parent_name, "internal/server$Server");
        assert!(out.executables[1].is_free());
    }

    #[test]
    fn test_root_package_has_no_prefix() {
        let source = "package main\n\nfunc main() {\n\tgo func() {}()\n}\n";
        let out = extract_source(&GoFrontend::new(), "main.go", source, DepthPolicy::default());
        let (_, executables) = full_names(&out);
        assert_eq!(executables, vec!["main()", "main().KW_ANONYMOUS_FUNCTION_1()"]);
        assert_eq!(out.executables[1].parent_name, "main()");
    }

    #[test]
    fn test_generic_receiver_matches_type_arity() {
        let source = r#"
package stack

type Stack[T any] struct{ items []T }

func (s *Stack[T]) Push(item T) {}

func (m Map[K, V]) Len() int { return 0 }
"#;
        let out = extract_source(&GoFrontend::new(), "s/stack.go", source, DepthPolicy::default());
        let (types, executables) = full_names(&out);

        assert_eq!(types, vec!["s$Stack`1"]);
        assert_eq!(executables, vec!["s$Stack`1.Push(T)", "s$Map`2.Len()"]);
        assert_eq!(out.executables[0].parent_name, out.types[0].full_name);
        assert_eq!(out.executables[0].simple_name, "Push");
    }

    #[test]
    fn test_package_level_literals_unique_across_files() {
        let frontend = GoFrontend::new();
        let source = "package s\n\nvar Handler = func() {}\n";
        let a = extract_source(&frontend, "s/a.go", source, DepthPolicy::default());
        let b = extract_source(&frontend, "s/b.go", source, DepthPolicy::default());

        assert_eq!(a.executables[0].full_name, "s/a$KW_ANONYMOUS_FUNCTION_1()");
        assert_eq!(b.executables[0].full_name, "s/b$KW_ANONYMOUS_FUNCTION_1()");
        assert_ne!(a.executables[0].full_name, b.executables[0].full_name);
        assert!(a.executables[0].is_free());
    }
}
