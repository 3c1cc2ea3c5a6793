//! Per-file analysis context.
//!
//! The AnalysisContext carries everything the extractor needs while walking
//! one file:
//! - the repository-relative file path and owning service name
//! - the nesting-depth policy
//! - the anonymous declaration counters
//! - the current ancestor chain
//!
//! A fresh context is built for every file and dropped afterwards, so
//! counters never leak across files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::naming::{AnonymousCounters, ScopeChain};
use super::tree::SyntaxTree;

/// Nesting limits for emitted entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthPolicy {
    /// Maximum number of enclosing types a type may have and still be emitted.
    pub max_class_depth: usize,
    /// Maximum enclosing types plus enclosing executables for an emitted executable.
    pub max_method_depth: usize,
}

impl Default for DepthPolicy {
    fn default() -> Self {
        Self {
            max_class_depth: 0,
            max_method_depth: 1,
        }
    }
}

/// Analysis context for a single file.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    /// Path relative to the repository root, `/`-separated.
    pub file_path: String,
    pub service_name: String,
    pub policy: DepthPolicy,
    pub counters: AnonymousCounters,
    pub chain: ScopeChain,
}

impl AnalysisContext {
    /// Create a context with an empty ancestor chain.
    pub fn new(
        file_path: impl Into<String>,
        service_name: impl Into<String>,
        policy: DepthPolicy,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            service_name: service_name.into(),
            policy,
            counters: AnonymousCounters::default(),
            chain: ScopeChain::new(),
        }
    }

    /// Create a context seeded with the file's namespace or package.
    ///
    /// `service_relative` is the file path relative to the service root; it
    /// drives the package prefix when the file declares no namespace.
    pub fn for_tree(
        tree: &SyntaxTree,
        service_relative: &Path,
        file_path: impl Into<String>,
        service_name: impl Into<String>,
        policy: DepthPolicy,
    ) -> Self {
        let mut ctx = Self::new(file_path, service_name, policy);
        ctx.chain = ScopeChain::for_file(service_relative, tree.package_scope(), tree.namespace());
        ctx
    }

    /// Whether a type declared at the current position is emitted.
    pub fn emits_type(&self) -> bool {
        self.chain.type_depth() <= self.policy.max_class_depth
    }

    /// Whether an executable declared at the current position is emitted.
    pub fn emits_executable(&self) -> bool {
        self.chain.type_depth() + self.chain.executable_depth() <= self.policy.max_method_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::naming::{Segment, SegmentKind};
    use crate::analysis::tree::PackageScope;

    fn push(ctx: &mut AnalysisContext, kind: SegmentKind, name: &str) {
        let full_name = ctx.chain.qualify(kind, name);
        ctx.chain.push(Segment {
            kind,
            simple_name: name.to_string(),
            full_name,
            emitted: true,
        });
    }

    #[test]
    fn test_default_policy() {
        let mut ctx = AnalysisContext::new("a/B.java", "svc", DepthPolicy::default());
        assert!(ctx.emits_type());
        assert!(ctx.emits_executable());

        push(&mut ctx, SegmentKind::Type, "B");
        assert!(!ctx.emits_type());
        assert!(ctx.emits_executable());

        push(&mut ctx, SegmentKind::Executable, "run");
        assert!(!ctx.emits_executable());
    }

    #[test]
    fn test_for_tree_uses_namespace() {
        let tree = SyntaxTree::new(Vec::new(), PackageScope::File)
            .with_namespace(vec!["com".to_string(), "acme".to_string()]);
        let ctx = AnalysisContext::for_tree(
            &tree,
            Path::new("src/Cart.java"),
            "svc/src/Cart.java",
            "svc",
            DepthPolicy::default(),
        );
        assert_eq!(ctx.chain.len(), 1);
        assert_eq!(ctx.chain.segments()[0].full_name, "com.acme");
    }
}
