//! Entity extraction over a lowered [`SyntaxTree`].
//!
//! Dispatch happens through [`DeclarationVisitor`]: one method per node kind
//! plus `descend` for recursing into children. [`Extractor`] is the visitor
//! that names declarations, applies the depth policy and collects records.

use tracing::{debug, trace};

use super::context::AnalysisContext;
use super::naming::{syntactic_signature, with_arity, Segment, SegmentKind};
use super::traits::SignatureResolver;
use super::tree::{ExecutableDecl, ExecutableRole, NodeId, NodeKind, SyntaxTree, TypeDecl, TypeFlavor};
use crate::model::{Executable, Extraction, Type};

/// Visitor over the declaration tree.
pub trait DeclarationVisitor {
    fn visit_namespace(&mut self, tree: &SyntaxTree, id: NodeId, _names: &[String]) {
        self.descend(tree, id);
    }

    fn visit_type(&mut self, tree: &SyntaxTree, id: NodeId, decl: &TypeDecl);

    fn visit_executable(&mut self, tree: &SyntaxTree, id: NodeId, decl: &ExecutableDecl);

    /// Visit every child of `id` in source order.
    fn descend(&mut self, tree: &SyntaxTree, id: NodeId) {
        for &child in tree.children(id) {
            walk(self, tree, child);
        }
    }
}

/// Dispatch one node to the matching visitor method.
pub fn walk<V: DeclarationVisitor + ?Sized>(visitor: &mut V, tree: &SyntaxTree, id: NodeId) {
    match &tree.node(id).kind {
        NodeKind::Namespace(names) => visitor.visit_namespace(tree, id, names),
        NodeKind::Type(decl) => visitor.visit_type(tree, id, decl),
        NodeKind::Executable(decl) => visitor.visit_executable(tree, id, decl),
        NodeKind::Other => visitor.descend(tree, id),
    }
}

/// Extract all entities of one file.
pub fn extract(
    tree: &SyntaxTree,
    ctx: AnalysisContext,
    signatures: Option<&dyn SignatureResolver>,
) -> Extraction {
    let mut extractor = Extractor::new(ctx);
    if let Some(resolver) = signatures {
        extractor = extractor.with_signature_resolver(resolver);
    }
    extractor.extract(tree)
}

/// Collects Type and Executable records while walking a tree.
pub struct Extractor<'a> {
    ctx: AnalysisContext,
    signatures: Option<&'a dyn SignatureResolver>,
    output: Extraction,
}

impl<'a> Extractor<'a> {
    pub fn new(ctx: AnalysisContext) -> Self {
        Self {
            ctx,
            signatures: None,
            output: Extraction::new(),
        }
    }

    pub fn with_signature_resolver(mut self, resolver: &'a dyn SignatureResolver) -> Self {
        self.signatures = Some(resolver);
        self
    }

    /// Walk the whole tree and return the collected records.
    pub fn extract(mut self, tree: &SyntaxTree) -> Extraction {
        self.descend(tree, SyntaxTree::ROOT);
        debug!(
            file = %self.ctx.file_path,
            types = self.output.types.len(),
            executables = self.output.executables.len(),
            "extracted file"
        );
        self.output
    }

    /// Simple name of an executable and whether it was generated.
    fn executable_name(&mut self, decl: &ExecutableDecl) -> (String, bool) {
        match (&decl.name, decl.role) {
            (Some(name), _) => (name.clone(), false),
            (None, ExecutableRole::Constructor) => match self.ctx.chain.nearest_type() {
                Some(owner) => (owner.simple_name.clone(), false),
                None => (self.ctx.counters.next_function(), true),
            },
            (None, _) => (self.ctx.counters.next_function(), true),
        }
    }

    fn signature(&self, tree: &SyntaxTree, id: NodeId, qualified: &str, decl: &ExecutableDecl) -> String {
        self.signatures
            .and_then(|resolver| resolver.resolve_signature(tree, id))
            .filter(|signature| !signature.is_empty())
            .unwrap_or_else(|| syntactic_signature(qualified, &decl.parameter_types))
    }
}

impl DeclarationVisitor for Extractor<'_> {
    fn visit_namespace(&mut self, tree: &SyntaxTree, id: NodeId, names: &[String]) {
        let full_name = self.ctx.chain.push_namespace(names);
        trace!(namespace = %full_name, "entering namespace");
        self.descend(tree, id);
        self.ctx.chain.pop();
    }

    fn visit_type(&mut self, tree: &SyntaxTree, id: NodeId, decl: &TypeDecl) {
        let (simple_name, anonymous) = match &decl.name {
            Some(name) => (name.clone(), false),
            None => (self.ctx.counters.next_class(), true),
        };
        let qualified_name = with_arity(&simple_name, decl.arity);
        let full_name = if anonymous {
            self.ctx.chain.qualify_anonymous(SegmentKind::Type, &qualified_name)
        } else {
            self.ctx.chain.qualify(SegmentKind::Type, &qualified_name)
        };
        let emitted = self.ctx.emits_type();

        if emitted {
            self.output.types.push(Type {
                simple_name: simple_name.clone(),
                full_name: full_name.clone(),
                file_path: self.ctx.file_path.clone(),
                service_name: self.ctx.service_name.clone(),
                content: tree.text(id),
                is_interface: decl.flavor == TypeFlavor::Interface,
                is_annotation: decl.flavor == TypeFlavor::Annotation,
            });
        } else {
            trace!(name = %full_name, "type exceeds class depth");
        }

        self.ctx.chain.push(Segment {
            kind: SegmentKind::Type,
            simple_name,
            full_name,
            emitted,
        });
        self.descend(tree, id);
        self.ctx.chain.pop();
    }

    fn visit_executable(&mut self, tree: &SyntaxTree, id: NodeId, decl: &ExecutableDecl) {
        let (simple_name, anonymous) = self.executable_name(decl);

        // Receiver methods live under their receiver type even though the
        // declaration sits at file level.
        let receiver = decl.receiver.as_ref().map(|receiver| {
            let full_name = self.ctx.chain.qualify(SegmentKind::Type, receiver);
            Segment {
                kind: SegmentKind::Type,
                simple_name: receiver.clone(),
                full_name,
                emitted: true,
            }
        });
        let has_receiver = receiver.is_some();
        if let Some(segment) = receiver {
            self.ctx.chain.push(segment);
        }

        let qualified = if anonymous {
            self.ctx.chain.qualify_anonymous(SegmentKind::Executable, &simple_name)
        } else {
            self.ctx.chain.qualify(SegmentKind::Executable, &simple_name)
        };
        let full_name = self.signature(tree, id, &qualified, decl);
        let emitted = self.ctx.emits_executable();

        if emitted {
            let parent_name = self
                .ctx
                .chain
                .nearest_emitted()
                .map(|segment| segment.full_name.clone())
                .unwrap_or_default();
            self.output.executables.push(Executable {
                simple_name: simple_name.clone(),
                full_name: full_name.clone(),
                parent_name,
                service_name: self.ctx.service_name.clone(),
                content: tree.text(id),
            });
        } else {
            trace!(name = %full_name, "executable exceeds method depth");
        }

        self.ctx.chain.push(Segment {
            kind: SegmentKind::Executable,
            simple_name,
            full_name,
            emitted,
        });
        self.descend(tree, id);
        self.ctx.chain.pop();
        if has_receiver {
            self.ctx.chain.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::context::DepthPolicy;
    use crate::analysis::tree::PackageScope;

    struct Builder {
        tree: SyntaxTree,
    }

    impl Builder {
        fn new(source: &str) -> Self {
            Self {
                tree: SyntaxTree::new(source.as_bytes().to_vec(), PackageScope::File),
            }
        }

        fn add(&mut self, parent: NodeId, kind: NodeKind, snippet: &str) -> NodeId {
            let source = String::from_utf8_lossy(self.tree.source()).into_owned();
            let start = source.find(snippet).expect("snippet present");
            self.tree.push(parent, kind, start..start + snippet.len())
        }
    }

    fn class(name: &str) -> NodeKind {
        NodeKind::Type(TypeDecl::named(name, TypeFlavor::Class))
    }

    fn method(name: &str) -> NodeKind {
        NodeKind::Executable(ExecutableDecl::named(name, ExecutableRole::Method))
    }

    fn lambda() -> NodeKind {
        NodeKind::Executable(ExecutableDecl::anonymous())
    }

    fn context(policy: DepthPolicy) -> AnalysisContext {
        AnalysisContext::new("src/Shop.java", "shop", policy)
    }

    struct FixedSignature;

    impl SignatureResolver for FixedSignature {
        fn resolve_signature(&self, tree: &SyntaxTree, node: NodeId) -> Option<String> {
            match &tree.node(node).kind {
                NodeKind::Executable(decl) if decl.name.as_deref() == Some("total") => {
                    Some("Shop.total(java.util.List<Item>)".to_string())
                }
                _ => None,
            }
        }
    }

    #[test]
    fn test_class_and_method() {
        let mut b = Builder::new("class Shop { void total() {} }");
        let shop = b.add(SyntaxTree::ROOT, class("Shop"), "class Shop { void total() {} }");
        b.add(shop, method("total"), "void total() {}");

        let out = extract(&b.tree, context(DepthPolicy::default()), None);
        assert_eq!(out.types.len(), 1);
        assert_eq!(out.types[0].full_name, "Shop");
        assert_eq!(out.types[0].file_path, "src/Shop.java");
        assert_eq!(out.executables.len(), 1);
        assert_eq!(out.executables[0].full_name, "Shop.total()");
        assert_eq!(out.executables[0].parent_name, "Shop");
        assert_eq!(out.executables[0].content, "void total() {}");
    }

    #[test]
    fn test_anonymous_functions_numbered_in_preorder() {
        let src = "run(() => { a(() => 1); }); go(() => 2);";
        let mut b = Builder::new(src);
        let first = b.add(SyntaxTree::ROOT, lambda(), "() => { a(() => 1); }");
        b.add(first, lambda(), "() => 1");
        b.add(SyntaxTree::ROOT, lambda(), "() => 2");

        let policy = DepthPolicy {
            max_class_depth: 0,
            max_method_depth: 0,
        };
        let out = extract(&b.tree, context(policy), None);
        let names: Vec<_> = out.executables.iter().map(|e| e.simple_name.as_str()).collect();
        // The nested lambda is gated but still consumes number 2.
        assert_eq!(names, vec!["KW_ANONYMOUS_FUNCTION_1", "KW_ANONYMOUS_FUNCTION_3"]);
    }

    #[test]
    fn test_inner_class_method_parent_is_outer() {
        let src = "class Outer { class Inner { void run() {} } }";
        let mut b = Builder::new(src);
        let outer = b.add(SyntaxTree::ROOT, class("Outer"), src);
        let inner = b.add(outer, class("Inner"), "class Inner { void run() {} }");
        b.add(inner, method("run"), "void run() {}");

        let policy = DepthPolicy {
            max_class_depth: 0,
            max_method_depth: 2,
        };
        let out = extract(&b.tree, context(policy), None);
        assert_eq!(out.types.len(), 1);
        assert_eq!(out.types[0].simple_name, "Outer");
        assert_eq!(out.executables.len(), 1);
        assert_eq!(out.executables[0].full_name, "Outer+Inner.run()");
        assert_eq!(out.executables[0].parent_name, "Outer");
    }

    #[test]
    fn test_signature_resolver_preferred() {
        let mut b = Builder::new("class Shop { void total() {} void clear() {} }");
        let shop = b.add(SyntaxTree::ROOT, class("Shop"), "class Shop { void total() {} void clear() {} }");
        b.add(shop, method("total"), "void total() {}");
        b.add(shop, method("clear"), "void clear() {}");

        let resolver = FixedSignature;
        let out = extract(&b.tree, context(DepthPolicy::default()), Some(&resolver));
        assert_eq!(out.executables[0].full_name, "Shop.total(java.util.List<Item>)");
        assert_eq!(out.executables[1].full_name, "Shop.clear()");
    }

    #[test]
    fn test_receiver_method_owned_by_type() {
        let mut b = Builder::new("func (s *Server) Start() { go func() {}() }");
        let start = b.add(
            SyntaxTree::ROOT,
            NodeKind::Executable(
                ExecutableDecl::named("Start", ExecutableRole::Method)
                    .with_receiver(Some("Server".to_string())),
            ),
            "func (s *Server) Start() { go func() {}() }",
        );
        b.add(start, lambda(), "func() {}");

        let ctx = AnalysisContext::new("server.go", "", DepthPolicy::default());
        let out = extract(&b.tree, ctx, None);
        assert_eq!(out.executables.len(), 1);
        assert_eq!(out.executables[0].full_name, "Server.Start()");
        assert_eq!(out.executables[0].parent_name, "Server");
    }

    #[test]
    fn test_constructor_takes_class_name() {
        let src = "class Cart { constructor() {} }";
        let mut b = Builder::new(src);
        let cart = b.add(SyntaxTree::ROOT, class("Cart"), src);
        b.add(
            cart,
            NodeKind::Executable(ExecutableDecl {
                name: None,
                role: ExecutableRole::Constructor,
                parameter_types: Vec::new(),
                receiver: None,
            }),
            "constructor() {}",
        );

        let out = extract(&b.tree, context(DepthPolicy::default()), None);
        assert_eq!(out.executables[0].simple_name, "Cart");
        assert_eq!(out.executables[0].full_name, "Cart.Cart()");
    }
}
