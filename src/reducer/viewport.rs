//! Reducer 9 (optional): Viewport-only (spec §4.2). Given the set of
//! currently-visible refs, drops every other ref-bearing line and any
//! structural ancestor left with nothing visible beneath it.

use std::collections::HashSet;

use super::doc::{build_tree, flatten_tree, to_doc, from_doc, TreeNode};

pub fn viewport_only(outline: &str, visible: &HashSet<String>) -> String {
    let doc = to_doc(outline);
    let tree = build_tree(&doc);
    let filtered = filter(&tree, visible);
    let mut out = Vec::new();
    flatten_tree(&filtered, &mut out);
    from_doc(&out)
}

fn filter(nodes: &[TreeNode], visible: &HashSet<String>) -> Vec<TreeNode> {
    nodes
        .iter()
        .filter_map(|n| match &n.line.parsed {
            Some(p) if p.reference.is_some() => {
                let r = p.reference.as_ref().unwrap();
                if visible.contains(r) {
                    let children = filter(&n.children, visible);
                    Some(TreeNode { line: n.line.clone(), children })
                } else {
                    None
                }
            }
            None if n.line.indent.is_none() => None,
            _ => {
                let children = filter(&n.children, visible);
                if children.is_empty() {
                    None
                } else {
                    Some(TreeNode { line: n.line.clone(), children })
                }
            }
        })
        .collect()
}
