//! Outline Builder (spec §3, §4.1): converts a flat accessibility-node
//! list into a stable, reference-tagged textual outline.

pub mod builder;
pub mod node;
pub mod roles;

pub use builder::{build_outline, build_outline_with_mode, BuildMode, HandleMap};
pub use node::AccessibilityNode;
pub use roles::RoleTable;
