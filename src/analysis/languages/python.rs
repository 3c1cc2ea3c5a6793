//! Python front end using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node};

use super::helpers::{field_text, parse_source};
use crate::analysis::{
    ExecutableDecl, ExecutableRole, LanguageFrontend, NodeKind, ParsedFile, TypeDecl, TypeFlavor,
};

const INITIALIZER_NAME: &str = "__init__";

pub struct PythonFrontend {
    language: Language,
}

impl PythonFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }
}

impl Default for PythonFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFrontend for PythonFrontend {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        parse_source(&self.language, "Python", path, source)
    }

    fn classify(&self, node: Node, source: &[u8]) -> NodeKind {
        match node.kind() {
            "class_definition" => match field_text(node, "name", source) {
                Some(name) => NodeKind::Type(TypeDecl::named(name, TypeFlavor::Class)),
                None => NodeKind::Other,
            },
            "function_definition" => match field_text(node, "name", source) {
                Some(name) => {
                    let role = if name == INITIALIZER_NAME {
                        ExecutableRole::Constructor
                    } else {
                        ExecutableRole::Function
                    };
                    NodeKind::Executable(ExecutableDecl::named(name, role))
                }
                None => NodeKind::Other,
            },
            "lambda" => NodeKind::Executable(ExecutableDecl::anonymous()),
            _ => NodeKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::languages::helpers::testing::{extract_source, full_names};
    use crate::analysis::DepthPolicy;

    #[test]
    fn test_class_methods_and_functions() {
        let source = r#"
class Greeter:
    def __init__(self, name):
        self.name = name

    def greet(self):
        return list(map(lambda n: n.upper(), [self.name]))


def main():
    pass
"#;
        let out = extract_source(&PythonFrontend::new(), "pkg/greeter.py", source, DepthPolicy::default());
        let (types, executables) = full_names(&out);

        assert_eq!(types, vec!["pkg/greeter$Greeter"]);
        assert_eq!(
            executables,
            vec![
                "pkg/greeter$Greeter.__init__()",
                "pkg/greeter$Greeter.greet()",
                "pkg/greeter$main()",
            ]
        );
        assert_eq!(out.executables[1].parent_name, "pkg/greeter$Greeter");
        assert!(out.executables[2].is_free());
    }

    #[test]
    fn test_module_level_lambda() {
        let source = "key = lambda item: item.id\n";
        let out = extract_source(&PythonFrontend::new(), "util.py", source, DepthPolicy::default());
        let (_, executables) = full_names(&out);
        assert_eq!(executables, vec!["util$KW_ANONYMOUS_FUNCTION_1()"]);
        assert_eq!(out.executables[0].content, "lambda item: item.id");
    }
}
