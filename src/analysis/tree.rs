//! Language-neutral declaration tree.
//!
//! Front ends lower a tree-sitter tree into a [`SyntaxTree`]: an arena of
//! nodes that keeps only declarations and scopes. Nodes classified as
//! [`NodeKind::Other`] are flattened away, their declaration descendants are
//! re-parented onto the nearest kept ancestor. Children stay in source order.

use std::ops::Range;

use super::traits::{LanguageFrontend, ParsedFile};

/// Index of a node inside its [`SyntaxTree`].
pub type NodeId = usize;

/// Flavor of a type-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlavor {
    Class,
    Interface,
    Annotation,
}

/// A class, interface, struct, enum, or annotation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Declared identifier; `None` for anonymous classes.
    pub name: Option<String>,
    /// Number of declared type parameters.
    pub arity: usize,
    pub flavor: TypeFlavor,
}

impl TypeDecl {
    pub fn named(name: impl Into<String>, flavor: TypeFlavor) -> Self {
        Self {
            name: Some(name.into()),
            arity: 0,
            flavor,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            name: None,
            arity: 0,
            flavor: TypeFlavor::Class,
        }
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }
}

/// Role of an executable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableRole {
    Function,
    Method,
    Constructor,
}

/// A method, constructor, function, or lambda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableDecl {
    /// Declared identifier; `None` for lambdas and anonymous functions.
    pub name: Option<String>,
    pub role: ExecutableRole,
    /// Source text of each parameter type, in declaration order.
    pub parameter_types: Vec<String>,
    /// Receiver type name for methods declared outside their type (Go).
    pub receiver: Option<String>,
}

impl ExecutableDecl {
    pub fn named(name: impl Into<String>, role: ExecutableRole) -> Self {
        Self {
            name: Some(name.into()),
            role,
            parameter_types: Vec::new(),
            receiver: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            name: None,
            role: ExecutableRole::Function,
            parameter_types: Vec::new(),
            receiver: None,
        }
    }

    pub fn with_parameters(mut self, parameter_types: Vec<String>) -> Self {
        self.parameter_types = parameter_types;
        self
    }

    pub fn with_receiver(mut self, receiver: Option<String>) -> Self {
        self.receiver = receiver;
        self
    }
}

/// Node classification consumed by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A namespace or module scope; contributes to names only.
    Namespace(Vec<String>),
    Type(TypeDecl),
    Executable(ExecutableDecl),
    Other,
}

/// How the path-derived package prefix is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageScope {
    /// Directories plus the file stem (one module per file).
    File,
    /// Directories only (one package per directory).
    Directory,
}

/// A node of the lowered tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Byte range of the declaration in the source.
    pub range: Range<usize>,
    pub children: Vec<NodeId>,
}

/// Lowered declaration tree for one file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    source: Vec<u8>,
    namespace: Vec<String>,
    package_scope: PackageScope,
    has_errors: bool,
}

impl SyntaxTree {
    /// The root node, spanning the whole file.
    pub const ROOT: NodeId = 0;

    /// Create a tree holding only the root node.
    pub fn new(source: Vec<u8>, package_scope: PackageScope) -> Self {
        let root = SyntaxNode {
            kind: NodeKind::Other,
            range: 0..source.len(),
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            source,
            namespace: Vec::new(),
            package_scope,
            has_errors: false,
        }
    }

    /// Set the file-level namespace.
    pub fn with_namespace(mut self, namespace: Vec<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Lower a parsed file through its front end.
    ///
    /// The walk is iterative: a stack of pending concrete nodes, children
    /// pushed in reverse so they are visited in source order.
    pub fn lower(parsed: &ParsedFile, frontend: &dyn LanguageFrontend) -> Self {
        let mut tree = SyntaxTree::new(parsed.source.clone(), frontend.package_scope())
            .with_namespace(frontend.file_namespace(parsed));

        let root = parsed.tree.root_node();
        tree.has_errors = root.has_error();

        let mut stack = Vec::new();
        push_children(&mut stack, root, Self::ROOT);

        while let Some((node, parent)) = stack.pop() {
            let kind = frontend.classify(node, &parsed.source);
            let owner = match kind {
                NodeKind::Other => parent,
                kind => tree.push(parent, kind, node.byte_range()),
            };
            push_children(&mut stack, node, owner);
        }

        tree
    }

    /// Append a node under `parent` and return its id.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, range: Range<usize>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SyntaxNode {
            kind,
            range,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Verbatim source text covered by a node.
    pub fn text(&self, id: NodeId) -> String {
        let range = self.nodes[id].range.clone();
        let end = range.end.min(self.source.len());
        let start = range.start.min(end);
        String::from_utf8_lossy(&self.source[start..end]).into_owned()
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    pub fn package_scope(&self) -> PackageScope {
        self.package_scope
    }

    /// Whether the concrete tree contained syntax errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

fn push_children<'t>(
    stack: &mut Vec<(tree_sitter::Node<'t>, NodeId)>,
    node: tree_sitter::Node<'t>,
    owner: NodeId,
) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    for child in children.into_iter().rev() {
        stack.push((child, owner));
    }
}
