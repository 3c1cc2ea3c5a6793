//! Service boundary detection and repository layout inspection.

mod detector;
mod markers;
mod tree;

pub use detector::{exclude_nested, service_name, MarkerScan, ServiceDetector, SERVICE_NAME_DELIMITER};
pub use markers::{MarkerKind, MarkerMatcher};
pub use tree::{DirectoryTree, TreeEntry};
