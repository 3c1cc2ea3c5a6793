//! Qualified-name construction.
//!
//! Names are built from an explicit ancestor chain of [`Segment`]s. Three
//! delimiter classes exist and are never mixed: `.` between namespace
//! components and between a declaration and its members, `+` between an
//! enclosing type and a nested type, and `/` inside a path-derived package
//! which is closed by `$` before the first declared name.

use std::path::{Component, Path};

use super::tree::PackageScope;

pub const NAMESPACE_DELIMITER: &str = ".";
pub const NESTED_TYPE_DELIMITER: &str = "+";
pub const MEMBER_DELIMITER: &str = ".";
pub const PACKAGE_DELIMITER: &str = "/";
pub const PACKAGE_BOUNDARY: &str = "$";
pub const ARITY_MARKER: char = '`';

pub const ANONYMOUS_CLASS_PREFIX: &str = "KW_ANONYMOUS_CLASS";
pub const ANONYMOUS_FUNCTION_PREFIX: &str = "KW_ANONYMOUS_FUNCTION";
pub const ANONYMOUS_ID_DELIMITER: &str = "_";

/// What an ancestor segment stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Path-derived package (only when no namespace is declared).
    Package,
    Namespace,
    Type,
    Executable,
}

/// One entry of the ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub simple_name: String,
    pub full_name: String,
    /// Whether a record exists for this segment. Packages and namespaces
    /// never have one; depth-gated declarations don't either.
    pub emitted: bool,
}

impl Segment {
    fn scope(kind: SegmentKind, full_name: String) -> Self {
        Self {
            kind,
            simple_name: full_name.clone(),
            full_name,
            emitted: false,
        }
    }
}

/// Ordered ancestor chain, outermost first.
#[derive(Debug, Clone, Default)]
pub struct ScopeChain {
    segments: Vec<Segment>,
    /// File-level package for anonymous declarations of directory-scoped
    /// files; per-file counters would collide across a package otherwise.
    anonymous_package: Option<String>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the chain for one file.
    ///
    /// A declared namespace wins; otherwise the path relative to the service
    /// root becomes the package. Files directly at the root of a
    /// directory-scoped language get no prefix at all.
    pub fn for_file(relative_path: &Path, scope: PackageScope, namespace: &[String]) -> Self {
        let mut chain = Self::new();
        if namespace.is_empty() && scope == PackageScope::Directory {
            let package = package_path(relative_path, PackageScope::File);
            if !package.is_empty() {
                chain.anonymous_package = Some(package);
            }
        }
        if !namespace.is_empty() {
            chain.segments.push(Segment::scope(
                SegmentKind::Namespace,
                namespace.join(NAMESPACE_DELIMITER),
            ));
        } else {
            let package = package_path(relative_path, scope);
            if !package.is_empty() {
                chain
                    .segments
                    .push(Segment::scope(SegmentKind::Package, package));
            }
        }
        chain
    }

    /// Qualified name a new `kind` segment named `simple_name` would get.
    pub fn qualify(&self, kind: SegmentKind, simple_name: &str) -> String {
        let Some(top) = self.segments.last() else {
            return simple_name.to_string();
        };
        match (top.kind, kind) {
            // A nested namespace declaration replaces the file's package.
            (SegmentKind::Package, SegmentKind::Namespace) => simple_name.to_string(),
            (SegmentKind::Package, _) => format!("{}{}{}", top.full_name, PACKAGE_BOUNDARY, simple_name),
            (SegmentKind::Type, SegmentKind::Type) => {
                format!("{}{}{}", top.full_name, NESTED_TYPE_DELIMITER, simple_name)
            }
            (SegmentKind::Namespace, _) => {
                format!("{}{}{}", top.full_name, NAMESPACE_DELIMITER, simple_name)
            }
            _ => format!("{}{}{}", top.full_name, MEMBER_DELIMITER, simple_name),
        }
    }

    /// Qualified name for an anonymous declaration.
    ///
    /// Outside any type or executable of a directory-scoped file the file
    /// stem joins the package; everywhere else this is [`Self::qualify`].
    pub fn qualify_anonymous(&self, kind: SegmentKind, simple_name: &str) -> String {
        let top_level = !self
            .segments
            .iter()
            .any(|s| matches!(s.kind, SegmentKind::Type | SegmentKind::Executable));
        match &self.anonymous_package {
            Some(package) if top_level => format!("{package}{PACKAGE_BOUNDARY}{simple_name}"),
            _ => self.qualify(kind, simple_name),
        }
    }

    /// Push a namespace scope, returning its qualified name.
    pub fn push_namespace(&mut self, names: &[String]) -> String {
        let full_name = self.qualify(SegmentKind::Namespace, &names.join(NAMESPACE_DELIMITER));
        self.segments
            .push(Segment::scope(SegmentKind::Namespace, full_name.clone()));
        full_name
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Number of type segments on the chain.
    pub fn type_depth(&self) -> usize {
        self.count(SegmentKind::Type)
    }

    /// Number of executable segments on the chain.
    pub fn executable_depth(&self) -> usize {
        self.count(SegmentKind::Executable)
    }

    /// Nearest enclosing segment that produced a record.
    pub fn nearest_emitted(&self) -> Option<&Segment> {
        self.segments.iter().rev().find(|s| {
            s.emitted && matches!(s.kind, SegmentKind::Type | SegmentKind::Executable)
        })
    }

    /// Nearest enclosing type, emitted or not.
    pub fn nearest_type(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.kind == SegmentKind::Type)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn count(&self, kind: SegmentKind) -> usize {
        self.segments.iter().filter(|s| s.kind == kind).count()
    }
}

/// Package path for a file relative to its service root.
///
/// `File` scope keeps the file stem as the last component, `Directory`
/// scope drops the file name entirely.
pub fn package_path(relative_path: &Path, scope: PackageScope) -> String {
    let mut parts: Vec<String> = relative_path
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if scope == PackageScope::File {
        if let Some(stem) = relative_path.file_stem() {
            parts.push(stem.to_string_lossy().into_owned());
        }
    }

    parts.join(PACKAGE_DELIMITER)
}

/// Append the generic arity suffix.
pub fn with_arity(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{name}{ARITY_MARKER}{arity}")
    }
}

/// `qualified(p1, p2)`.
pub fn syntactic_signature(qualified: &str, parameter_types: &[String]) -> String {
    format!("{}({})", qualified, parameter_types.join(", "))
}

/// Per-file counters for anonymous declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousCounters {
    classes: u32,
    functions: u32,
}

impl AnonymousCounters {
    pub fn next_class(&mut self) -> String {
        self.classes += 1;
        anonymous_name(ANONYMOUS_CLASS_PREFIX, self.classes)
    }

    pub fn next_function(&mut self) -> String {
        self.functions += 1;
        anonymous_name(ANONYMOUS_FUNCTION_PREFIX, self.functions)
    }
}

fn anonymous_name(prefix: &str, n: u32) -> String {
    format!("{prefix}{ANONYMOUS_ID_DELIMITER}{n}")
}
