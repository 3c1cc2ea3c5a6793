//! Entity records produced by extraction.
//!
//! Field names serialize in camelCase so the persisted JSON keeps the
//! `typeData.json` / `methodData.json` layout consumed downstream.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A class, interface, or annotation declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    pub simple_name: String,
    pub full_name: String,
    /// Path relative to the repository root, `/`-separated.
    pub file_path: String,
    pub service_name: String,
    /// Verbatim source text of the declaration.
    pub content: String,
    pub is_interface: bool,
    pub is_annotation: bool,
}

/// A method, constructor, or function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Executable {
    pub simple_name: String,
    pub full_name: String,
    /// Full name of the nearest emitted enclosing entity; empty for free functions.
    #[serde(default)]
    pub parent_name: String,
    pub service_name: String,
    pub content: String,
}

impl Executable {
    /// Whether this executable has no enclosing emitted entity.
    pub fn is_free(&self) -> bool {
        self.parent_name.is_empty()
    }
}

/// One independently analyzable root of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub service_name: String,
    pub root_path: PathBuf,
}

impl ServiceDescriptor {
    pub fn new(service_name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            service_name: service_name.into(),
            root_path: root_path.into(),
        }
    }
}

/// The pair of entity collections produced for a file, a service, or a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub types: Vec<Type>,
    pub executables: Vec<Executable>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another extraction, preserving its order after ours.
    pub fn merge(&mut self, other: Extraction) {
        self.types.extend(other.types);
        self.executables.extend(other.executables);
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.executables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_serializes_camel_case() {
        let ty = Type {
            simple_name: "Cart".to_string(),
            full_name: "shop.Cart".to_string(),
            file_path: "src/Cart.java".to_string(),
            service_name: "shop".to_string(),
            content: "class Cart {}".to_string(),
            is_interface: false,
            is_annotation: false,
        };

        let json = serde_json::to_value(&ty).unwrap();
        assert_eq!(json["simpleName"], "Cart");
        assert_eq!(json["fullName"], "shop.Cart");
        assert_eq!(json["filePath"], "src/Cart.java");
        assert_eq!(json["isInterface"], false);
        assert_eq!(json["isAnnotation"], false);
    }

    #[test]
    fn test_executable_missing_parent_defaults_to_free() {
        let json = r#"{
            "simpleName": "main",
            "fullName": "main$main()",
            "serviceName": "",
            "content": "func main() {}"
        }"#;
        let exec: Executable = serde_json::from_str(json).unwrap();
        assert!(exec.is_free());
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = Extraction::new();
        first.executables.push(Executable {
            simple_name: "a".to_string(),
            full_name: "a()".to_string(),
            parent_name: String::new(),
            service_name: String::new(),
            content: String::new(),
        });
        let mut second = Extraction::new();
        second.executables.push(Executable {
            simple_name: "b".to_string(),
            full_name: "b()".to_string(),
            parent_name: String::new(),
            service_name: String::new(),
            content: String::new(),
        });

        first.merge(second);
        let names: Vec<_> = first.executables.iter().map(|e| e.simple_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!first.is_empty());
    }
}
