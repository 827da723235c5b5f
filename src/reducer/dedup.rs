//! Reducer 4: Dedup links (spec §4.2): within each `article` subtree, drop a
//! `link` whose name repeats one already kept in that article (first
//! occurrence wins). Also drops `img` lines with no name, everywhere.
//!
//! A dropped duplicate's own ref is never discarded outright: it's folded
//! into the kept line's suffix as a `[dup-ref=e<n>]` tag, the same rescue
//! shape Smart Truncate uses for the refs it hides (spec §3's "kept
//! verbatim, relocated into a preserved summary line, or dropped only as
//! part of a subtree with no surviving reference at all").

use std::collections::HashMap;

use super::doc::{to_doc, from_doc, DocLine};
use crate::line;

pub fn dedup_links(outline: &str) -> String {
    let doc = to_doc(outline);
    let mut kept: Vec<DocLine> = Vec::new();
    let mut stack: Vec<(usize, HashMap<String, usize>)> = Vec::new();

    for dl in doc {
        if let Some(indent) = dl.indent {
            while let Some(&(top_indent, _)) = stack.last() {
                if indent <= top_indent {
                    stack.pop();
                } else {
                    break;
                }
            }
        }

        if let Some(parsed) = &dl.parsed {
            if parsed.role == "img" && parsed.name.as_deref().unwrap_or("").trim().is_empty() {
                continue;
            }

            if parsed.role == "link" {
                let name = parsed.name.clone().unwrap_or_default();
                if !name.is_empty() {
                    if let Some((_, seen)) = stack.last_mut() {
                        if let Some(&first_idx) = seen.get(&name) {
                            if let Some(dup_ref) = &parsed.reference {
                                rescue_ref(&mut kept[first_idx], dup_ref);
                            }
                            continue;
                        }
                        seen.insert(name, kept.len());
                    }
                }
            }

            if parsed.role == "article" {
                stack.push((dl.indent.unwrap_or(0), HashMap::new()));
            }
        }

        kept.push(dl);
    }

    from_doc(&kept)
}

/// Append `dup_ref` to the kept line's suffix so the reference that would
/// otherwise vanish with its dropped duplicate stays discoverable.
fn rescue_ref(kept_line: &mut DocLine, dup_ref: &str) {
    if let Some(parsed) = &mut kept_line.parsed {
        parsed.suffix.push_str(&format!(" [dup-ref={dup_ref}]"));
        kept_line.raw = line::render(parsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_duplicate_link_line_but_rescues_its_ref_onto_the_kept_line() {
        let outline = "- article\n  - link \"Read more\" [ref=e1]\n  - text \"body\"\n  - link \"Read more\" [ref=e2]";
        let out = dedup_links(outline);
        assert_eq!(out.lines().filter(|l| l.contains("Read more")).count(), 1, "the duplicate line itself is dropped:\n{out}");
        assert!(out.contains("[ref=e1]"));
        assert!(out.contains("[dup-ref=e2]"), "e2 should survive as a rescued tag:\n{out}");
    }

    #[test]
    fn same_name_link_in_different_articles_is_kept_in_both() {
        let outline = "- article\n  - link \"Read more\" [ref=e1]\n- article\n  - link \"Read more\" [ref=e2]";
        let out = dedup_links(outline);
        assert!(out.contains("[ref=e1]"));
        assert!(out.contains("[ref=e2]"));
    }

    #[test]
    fn links_outside_any_article_are_never_deduped() {
        let outline = "- link \"Home\" [ref=e1]\n- link \"Home\" [ref=e2]";
        let out = dedup_links(outline);
        assert!(out.contains("[ref=e1]"));
        assert!(out.contains("[ref=e2]"));
    }

    #[test]
    fn unnamed_img_lines_are_dropped_everywhere() {
        let outline = "- img\n- img \"A chart\" [ref=e1]";
        let out = dedup_links(outline);
        assert!(!out.lines().any(|l| l == "- img"));
        assert!(out.contains("A chart"));
    }
}
