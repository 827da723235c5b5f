//! Reducer 10 (optional): Interactive-only (spec §4.2). Keeps only lines
//! that carry a reference, or are structural ancestors of one that does.

use super::doc::{build_tree, flatten_tree, to_doc, from_doc, TreeNode};

pub fn interactive_only(outline: &str) -> String {
    let doc = to_doc(outline);
    let tree = build_tree(&doc);
    let filtered = filter(&tree);
    let mut out = Vec::new();
    flatten_tree(&filtered, &mut out);
    from_doc(&out)
}

fn filter(nodes: &[TreeNode]) -> Vec<TreeNode> {
    nodes
        .iter()
        .filter_map(|n| match &n.line.parsed {
            Some(p) if p.reference.is_some() => {
                let children = filter(&n.children);
                Some(TreeNode { line: n.line.clone(), children })
            }
            None if n.line.indent.is_none() => None,
            _ => {
                let children = filter(&n.children);
                if children.is_empty() {
                    None
                } else {
                    Some(TreeNode { line: n.line.clone(), children })
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_ref_bearing_lines_and_their_ancestors() {
        let outline = "- region\n  - text \"caption\"\n  - button \"Go\" [ref=e1]";
        let out = interactive_only(outline);
        assert!(out.contains("[ref=e1]"));
        assert!(!out.contains("caption"));
        assert!(out.contains("- region"));
    }

    #[test]
    fn drops_subtrees_with_no_reference_at_all() {
        let outline = "- region\n  - text \"static content\"\n- button \"Go\" [ref=e1]";
        let out = interactive_only(outline);
        assert!(!out.contains("region"));
        assert!(out.contains("[ref=e1]"));
    }
}
