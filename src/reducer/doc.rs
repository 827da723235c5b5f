//! Indent-based tree helpers shared by several reducers, so each one doesn't
//! re-derive "subtree of this line" from scratch.

use crate::line::{self, ParsedLine};

/// One line of an outline. `indent` is `None` for blank lines, which never
/// terminate a subtree and are treated as transparent filler.
#[derive(Debug, Clone)]
pub struct DocLine {
    pub raw: String,
    pub indent: Option<usize>,
    pub parsed: Option<ParsedLine>,
}

pub fn to_doc(outline: &str) -> Vec<DocLine> {
    outline
        .lines()
        .map(|raw| {
            let parsed = line::parse(raw);
            let indent = parsed.as_ref().map(|p| p.indent).or_else(|| {
                let trimmed = raw.trim_start_matches(' ');
                if trimmed.starts_with("- ") {
                    Some(raw.len() - trimmed.len())
                } else {
                    None
                }
            });
            DocLine { raw: raw.to_string(), indent, parsed }
        })
        .collect()
}

pub fn from_doc(doc: &[DocLine]) -> String {
    doc.iter().map(|l| l.raw.as_str()).collect::<Vec<_>>().join("\n")
}

/// Exclusive end index of the subtree rooted at `start` (whose indent is
/// `start_indent`): every following line with a strictly greater indent,
/// plus any blank lines interleaved among them.
pub fn subtree_end(doc: &[DocLine], start: usize, start_indent: usize) -> usize {
    let mut end = start + 1;
    while end < doc.len() {
        match doc[end].indent {
            Some(indent) if indent <= start_indent => break,
            _ => end += 1,
        }
    }
    end
}

/// References (`[ref=e<n>]`) carried by any line in `slice`.
pub fn collect_refs(slice: &[DocLine]) -> Vec<String> {
    slice
        .iter()
        .filter_map(|dl| dl.parsed.as_ref().and_then(|p| p.reference.clone()))
        .collect()
}

/// A real (non-blank) tree built from indentation, for reducers that need
/// bottom-up "does this subtree survive" decisions (viewport/interactive-only).
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub line: DocLine,
    pub children: Vec<TreeNode>,
}

pub fn build_tree(doc: &[DocLine]) -> Vec<TreeNode> {
    fn helper(doc: &[DocLine], pos: &mut usize, parent_indent: Option<usize>) -> Vec<TreeNode> {
        let mut nodes = Vec::new();
        while *pos < doc.len() {
            let dl = &doc[*pos];
            match dl.indent {
                None => {
                    nodes.push(TreeNode { line: dl.clone(), children: Vec::new() });
                    *pos += 1;
                }
                Some(indent) => {
                    if let Some(p) = parent_indent {
                        if indent <= p {
                            break;
                        }
                    }
                    let line = dl.clone();
                    *pos += 1;
                    let children = helper(doc, pos, Some(indent));
                    nodes.push(TreeNode { line, children });
                }
            }
        }
        nodes
    }
    let mut pos = 0;
    helper(doc, &mut pos, None)
}

pub fn flatten_tree(nodes: &[TreeNode], out: &mut Vec<DocLine>) {
    for n in nodes {
        out.push(n.line.clone());
        flatten_tree(&n.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtree_end_stops_at_first_sibling_or_shallower_line() {
        let doc = to_doc("- a\n  - b\n  - c\n- d");
        assert_eq!(subtree_end(&doc, 0, 0), 3);
    }

    #[test]
    fn build_tree_then_flatten_round_trips() {
        let outline = "- a\n  - b\n- c";
        let doc = to_doc(outline);
        let tree = build_tree(&doc);
        let mut out = Vec::new();
        flatten_tree(&tree, &mut out);
        assert_eq!(from_doc(&out), outline);
    }
}
