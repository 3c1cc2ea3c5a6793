//! Language-specific front end implementations.

mod csharp;
mod go;
pub(crate) mod helpers;
mod java;
mod javascript;
mod python;
mod ruby;
mod typescript;

pub use csharp::CSharpFrontend;
pub use go::GoFrontend;
pub use java::JavaFrontend;
pub use javascript::JavaScriptFrontend;
pub use python::PythonFrontend;
pub use ruby::RubyFrontend;
pub use typescript::TypeScriptFrontend;

use super::LanguageFrontend;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Static storage for C# front end.
static CSHARP_FRONTEND: OnceCell<CSharpFrontend> = OnceCell::new();

/// Static storage for Go front end.
static GO_FRONTEND: OnceCell<GoFrontend> = OnceCell::new();

/// Static storage for Java front end.
static JAVA_FRONTEND: OnceCell<JavaFrontend> = OnceCell::new();

/// Static storage for JavaScript front end.
static JAVASCRIPT_FRONTEND: OnceCell<JavaScriptFrontend> = OnceCell::new();

/// Static storage for Python front end.
static PYTHON_FRONTEND: OnceCell<PythonFrontend> = OnceCell::new();

/// Static storage for Ruby front end.
static RUBY_FRONTEND: OnceCell<RubyFrontend> = OnceCell::new();

/// Static storage for TypeScript front end.
static TYPESCRIPT_FRONTEND: OnceCell<TypeScriptFrontend> = OnceCell::new();

/// Whether front ends have been registered.
static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register all available language front ends.
///
/// This is idempotent - calling it multiple times is safe.
pub fn register_frontends() {
    if REGISTERED.swap(true, Ordering::SeqCst) {
        return;
    }

    CSHARP_FRONTEND.get_or_init(CSharpFrontend::new);
    GO_FRONTEND.get_or_init(GoFrontend::new);
    JAVA_FRONTEND.get_or_init(JavaFrontend::new);
    JAVASCRIPT_FRONTEND.get_or_init(JavaScriptFrontend::new);
    PYTHON_FRONTEND.get_or_init(PythonFrontend::new);
    RUBY_FRONTEND.get_or_init(RubyFrontend::new);
    TYPESCRIPT_FRONTEND.get_or_init(TypeScriptFrontend::new);
}

/// Get a front end for the given file extension.
///
/// Returns None if no front end is registered for the extension.
pub fn get_frontend(ext: &str) -> Option<&'static dyn LanguageFrontend> {
    // Ensure front ends are registered
    register_frontends();

    match ext {
        "cs" => CSHARP_FRONTEND.get().map(|f| f as &'static dyn LanguageFrontend),
        "go" => GO_FRONTEND.get().map(|f| f as &'static dyn LanguageFrontend),
        "java" => JAVA_FRONTEND.get().map(|f| f as &'static dyn LanguageFrontend),
        "js" | "jsx" | "mjs" | "cjs" => {
            JAVASCRIPT_FRONTEND.get().map(|f| f as &'static dyn LanguageFrontend)
        }
        "py" => PYTHON_FRONTEND.get().map(|f| f as &'static dyn LanguageFrontend),
        "rb" => RUBY_FRONTEND.get().map(|f| f as &'static dyn LanguageFrontend),
        "ts" | "tsx" | "mts" => {
            TYPESCRIPT_FRONTEND.get().map(|f| f as &'static dyn LanguageFrontend)
        }
        _ => None,
    }
}

/// Get a front end for a path, by extension.
pub fn frontend_for_path(path: &std::path::Path) -> Option<&'static dyn LanguageFrontend> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(get_frontend)
}

/// Get all registered language IDs.
pub fn registered_languages() -> Vec<&'static str> {
    vec!["csharp", "go", "java", "javascript", "python", "ruby", "typescript"]
}

/// Get all registered file extensions.
pub fn registered_extensions() -> Vec<&'static str> {
    vec![
        "cs", "go", "java", "js", "jsx", "mjs", "cjs", "py", "rb", "ts", "tsx", "mts",
    ]
}
