//! Baseline variant (spec §4.2 closing note): a raw-to-tagged outline built
//! without running reducers 1-10. Assigns refs with the same rules as the
//! normal Outline Builder, skips unnamed purely-structural nodes, then drops
//! any subtree left with no reference anywhere inside it.

use super::interactive_only::interactive_only;
use crate::outline::{build_outline_with_mode, AccessibilityNode, BuildMode, HandleMap, RoleTable};

pub fn build_baseline_outline(nodes: &[AccessibilityNode], roles: &RoleTable) -> (String, HandleMap) {
    let (outline, handles) = build_outline_with_mode(nodes, roles, BuildMode::Baseline);
    (interactive_only(&outline), handles)
}
