//! Reducer 8: Smart truncate (spec §4.2).
//!
//! Among sibling `listitem`/`row`/`article` elements at the same indent,
//! keeps the first `K` (default 5) and replaces the rest with a single
//! summary line naming how many were hidden and up to three of their refs.

use super::doc::{collect_refs, subtree_end, to_doc, from_doc, DocLine};
use crate::line;

pub fn smart_truncate(outline: &str, max_items: usize) -> String {
    let doc = to_doc(outline);
    let mut kept: Vec<DocLine> = Vec::new();
    let mut i = 0;

    while i < doc.len() {
        let candidate = match (doc[i].indent, &doc[i].parsed) {
            (Some(indent), Some(parsed)) if is_truncatable_role(&parsed.role) => {
                Some((indent, parsed.role.clone()))
            }
            _ => None,
        };

        let Some((indent, role)) = candidate else {
            kept.push(doc[i].clone());
            i += 1;
            continue;
        };

        let mut members: Vec<(usize, usize)> = Vec::new();
        let mut j = i;
        while j < doc.len() {
            match (doc[j].indent, doc[j].parsed.as_ref()) {
                (Some(ind), Some(p)) if ind == indent && p.role == role => {
                    let end = subtree_end(&doc, j, indent);
                    members.push((j, end));
                    j = end;
                }
                _ => break,
            }
        }

        if members.len() > max_items {
            for &(start, end) in &members[..max_items] {
                kept.extend(doc[start..end].iter().cloned());
            }
            let skipped = &members[max_items..];
            let m = skipped.len();
            let mut hidden_refs: Vec<String> = Vec::new();
            for &(start, end) in skipped {
                hidden_refs.extend(collect_refs(&doc[start..end]));
            }
            kept.push(summary_line(indent, m, &role, &hidden_refs));
        } else {
            for &(start, end) in &members {
                kept.extend(doc[start..end].iter().cloned());
            }
        }

        i = j;
    }

    from_doc(&kept)
}

fn is_truncatable_role(role: &str) -> bool {
    matches!(role, "listitem" | "row" | "article")
}

fn summary_line(indent: usize, hidden_count: usize, role: &str, hidden_refs: &[String]) -> DocLine {
    let indent_str = " ".repeat(indent);
    let raw = if hidden_refs.is_empty() {
        format!("{indent_str}- text \"... and {hidden_count} more {role}s\"")
    } else {
        let shown: Vec<&str> = hidden_refs.iter().take(3).map(|s| s.as_str()).collect();
        format!(
            "{indent_str}- text \"... and {hidden_count} more {role}s ({} refs hidden: {}...)\"",
            hidden_refs.len(),
            shown.join(","),
        )
    };
    DocLine { raw: raw.clone(), indent: Some(indent), parsed: line::parse(&raw) }
}
