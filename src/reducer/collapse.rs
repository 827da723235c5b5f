//! Reducer 5: Collapse redundant children (spec §4.2).
//!
//! A `link`/`button` whose name is over 40 characters has its descendants
//! dropped if every one of them is non-interactive and restates words
//! already present in the parent's name. A descendant that itself carries
//! an interactive reference is never collapsed away.

use super::doc::{subtree_end, to_doc, from_doc, DocLine};
use crate::outline::roles::INTERACTIVE_ROLES;

const NAME_LEN_THRESHOLD: usize = 40;
const WORD_OVERLAP_RATIO: f64 = 0.6;

pub fn collapse_redundant_children(outline: &str) -> String {
    let doc = to_doc(outline);
    let mut kept: Vec<DocLine> = Vec::new();
    let mut i = 0;

    while i < doc.len() {
        let dl = &doc[i];
        if let (Some(indent), Some(parsed)) = (dl.indent, &dl.parsed) {
            if matches!(parsed.role.as_str(), "link" | "button") {
                let name = parsed.name.clone().unwrap_or_default();
                if name.chars().count() > NAME_LEN_THRESHOLD {
                    let end = subtree_end(&doc, i, indent);
                    let descendants = &doc[i + 1..end];
                    if should_collapse(&name, descendants) {
                        kept.push(dl.clone());
                        i = end;
                        continue;
                    }
                }
            }
        }
        kept.push(dl.clone());
        i += 1;
    }

    from_doc(&kept)
}

fn should_collapse(parent_name: &str, descendants: &[DocLine]) -> bool {
    if descendants.is_empty() {
        return false;
    }
    let parent_lower = parent_name.to_lowercase();
    descendants.iter().all(|d| {
        let Some(parsed) = &d.parsed else { return true };
        if parsed.reference.is_some() && INTERACTIVE_ROLES.contains(&parsed.role.as_str()) {
            return false;
        }
        if INTERACTIVE_ROLES.contains(&parsed.role.as_str()) {
            return false;
        }
        let name = parsed.name.clone().unwrap_or_default();
        let words: Vec<&str> = name.split_whitespace().filter(|w| w.chars().count() > 3).collect();
        if words.is_empty() {
            return true;
        }
        let matched = words.iter().filter(|w| parent_lower.contains(&w.to_lowercase())).count();
        (matched as f64) / (words.len() as f64) >= WORD_OVERLAP_RATIO
    })
}
