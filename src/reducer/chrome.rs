//! Reducer 1: Strip chrome (spec §4.2).
//!
//! Drops site-chrome subtrees (banners, footers, top-level nav, cookie/skip
//! links, ad slots) but rescues any interactive reference found inside one
//! under a synthesized `chrome-actions` group, so sign-in/search stay
//! reachable even after their container is gone.

use std::sync::OnceLock;

use regex::Regex;

use super::doc::{subtree_end, to_doc, from_doc, DocLine};
use crate::line::{self, ParsedLine};
use crate::outline::roles::INTERACTIVE_ROLES;

fn skip_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)skip to|cookie|privacy|terms of service").unwrap())
}

fn ad_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(Advertisement|Promoted|Sponsored)").unwrap())
}

pub fn strip_chrome(outline: &str) -> String {
    let doc = to_doc(outline);
    let mut kept: Vec<DocLine> = Vec::new();
    let mut rescued: Vec<(String, String, String)> = Vec::new();

    let mut i = 0;
    while i < doc.len() {
        let candidate = match (doc[i].indent, &doc[i].parsed) {
            (Some(indent), Some(parsed)) => Some((indent, parsed.clone())),
            _ => None,
        };

        if let Some((indent, parsed)) = candidate {
            if should_strip(&parsed, indent) {
                let end = subtree_end(&doc, i, indent);
                collect_interactive_refs(&doc[i..end], &mut rescued);
                i = end;
                continue;
            }
        }

        kept.push(doc[i].clone());
        i += 1;
    }

    if !rescued.is_empty() {
        kept.push(make_line("- group \"chrome-actions\"", 0));
        for (role, name, reference) in rescued {
            let name_part = if name.is_empty() { String::new() } else { format!(" \"{}\"", line::escape(&name)) };
            kept.push(make_line(&format!("  - {role}{name_part} [ref={reference}]"), 2));
        }
    }

    from_doc(&kept)
}

fn should_strip(parsed: &ParsedLine, indent: usize) -> bool {
    let top_level = indent <= 2;

    match parsed.role.as_str() {
        "banner" | "contentinfo" => return true,
        "navigation" if top_level => return true,
        _ => {}
    }

    if top_level {
        if let Some(name) = &parsed.name {
            if skip_name_re().is_match(name) {
                return true;
            }
        }
    }

    if let Some(name) = &parsed.name {
        if ad_name_re().is_match(name) {
            return true;
        }
    }

    false
}

fn collect_interactive_refs(slice: &[DocLine], out: &mut Vec<(String, String, String)>) {
    for dl in slice {
        if let Some(p) = &dl.parsed {
            if let Some(r) = &p.reference {
                if INTERACTIVE_ROLES.contains(&p.role.as_str()) {
                    out.push((p.role.clone(), p.name.clone().unwrap_or_default(), r.clone()));
                }
            }
        }
    }
}

fn make_line(raw: &str, indent: usize) -> DocLine {
    DocLine { raw: raw.to_string(), indent: Some(indent), parsed: line::parse(raw) }
}
