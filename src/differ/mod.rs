//! Differ (spec §4.3): structurally diffs two outlines, matching elements
//! by reference first and by `(role, name)` second, then renders a report
//! the agent loop can drop straight into an observation.

use std::collections::{HashMap, HashSet};

use crate::outline::roles::{RoleTable, DIFFER_NOISE_ROLES};

/// One outline line, parsed and restricted to the known ARIA vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRecord {
    pub role: String,
    pub name: Option<String>,
    pub reference: Option<String>,
    pub indent: usize,
}

#[derive(Debug, Clone)]
pub struct DiffReport {
    pub added: Vec<ElementRecord>,
    pub removed: Vec<ElementRecord>,
    pub changed: Vec<(ElementRecord, ElementRecord)>,
    pub unchanged_count: usize,
    pub diff_ratio: f64,
    pub is_empty: bool,
    pub is_large_diff: bool,
    pub text: String,
}

/// Parse every line of `outline` into an `ElementRecord`, skipping lines
/// whose role isn't in the known ARIA vocabulary (warn, don't fail — spec
/// §9 Open Question: an unrecognized role should not end the session).
pub fn parse_elements(outline: &str, roles: &RoleTable) -> Vec<ElementRecord> {
    outline
        .lines()
        .filter_map(|l| {
            let parsed = crate::line::parse(l)?;
            if !roles.is_known_aria_role(&parsed.role) {
                tracing::warn!(role = %parsed.role, line = %l, "differ: skipping line with unrecognized role");
                return None;
            }
            Some(ElementRecord {
                role: parsed.role,
                name: parsed.name,
                reference: parsed.reference,
                indent: parsed.indent,
            })
        })
        .collect()
}

/// Diff `prev_outline` against `cur_outline` and render the report (§4.3).
pub fn diff(
    prev_outline: &str,
    cur_outline: &str,
    prev_url: &str,
    cur_url: &str,
    roles: &RoleTable,
    large_diff_threshold: f64,
) -> DiffReport {
    let prev = parse_elements(prev_outline, roles);
    let cur = parse_elements(cur_outline, roles);

    let mut prev_by_ref: HashMap<&str, usize> = HashMap::new();
    let mut prev_by_key: HashMap<(String, String), usize> = HashMap::new();
    for (i, e) in prev.iter().enumerate() {
        if let Some(r) = &e.reference {
            prev_by_ref.entry(r.as_str()).or_insert(i);
        }
        let key = (e.role.clone(), e.name.clone().unwrap_or_default());
        prev_by_key.entry(key).or_insert(i);
    }

    let mut used_prev: HashSet<usize> = HashSet::new();
    let mut added: Vec<ElementRecord> = Vec::new();
    let mut changed: Vec<(ElementRecord, ElementRecord)> = Vec::new();
    let mut unchanged_count = 0usize;

    for cur_el in &cur {
        let mut matched_idx = cur_el.reference.as_deref().and_then(|r| prev_by_ref.get(r).copied());
        if matched_idx.is_none() {
            let key = (cur_el.role.clone(), cur_el.name.clone().unwrap_or_default());
            matched_idx = prev_by_key.get(&key).copied();
        }

        match matched_idx {
            Some(idx) => {
                used_prev.insert(idx);
                let prev_el = &prev[idx];
                let identical_ref = prev_el.reference.is_some() && prev_el.reference == cur_el.reference;
                if identical_ref && prev_el.name != cur_el.name {
                    changed.push((prev_el.clone(), cur_el.clone()));
                } else {
                    unchanged_count += 1;
                }
            }
            None => added.push(cur_el.clone()),
        }
    }

    let removed: Vec<ElementRecord> = prev
        .iter()
        .enumerate()
        .filter(|(i, _)| !used_prev.contains(i))
        .map(|(_, e)| e.clone())
        .collect();

    let is_noise = |e: &ElementRecord| DIFFER_NOISE_ROLES.contains(&e.role.as_str());
    let added: Vec<ElementRecord> = added.into_iter().filter(|e| !is_noise(e)).collect();
    let removed: Vec<ElementRecord> = removed.into_iter().filter(|e| !is_noise(e)).collect();

    let diff_ratio = if cur.is_empty() {
        0.0
    } else {
        (added.len() + removed.len() + changed.len()) as f64 / cur.len() as f64
    };
    let is_empty = added.is_empty() && removed.is_empty() && changed.is_empty();
    let is_large_diff = diff_ratio > large_diff_threshold;

    let text = render(&added, &removed, &changed, unchanged_count, prev_url, cur_url, &cur);

    DiffReport { added, removed, changed, unchanged_count, diff_ratio, is_empty, is_large_diff, text }
}

fn render(
    added: &[ElementRecord],
    removed: &[ElementRecord],
    changed: &[(ElementRecord, ElementRecord)],
    unchanged_count: usize,
    prev_url: &str,
    cur_url: &str,
    cur: &[ElementRecord],
) -> String {
    let mut out = format!("URL: {cur_url}\n");
    if prev_url != cur_url {
        out.push_str(&format!("CHANGED from {prev_url}\n"));
    }
    if let Some(title) = cur.iter().find(|e| e.role == "heading").and_then(|e| e.name.clone()) {
        out.push_str(&format!("Title: {title}\n"));
    }
    out.push('\n');

    for e in added {
        out.push_str(&format!("+ {}\n", render_element(e)));
    }
    for e in removed {
        out.push_str(&format!("- {}\n", render_element(e)));
    }
    for (old, new) in changed {
        let reference = new.reference.clone().unwrap_or_default();
        let old_name = old.name.clone().unwrap_or_default();
        let new_name = new.name.clone().unwrap_or_default();
        out.push_str(&format!("~ {} [ref={reference}]: \"{old_name}\" \u{2192} \"{new_name}\"\n", new.role));
    }
    if unchanged_count > 0 {
        out.push_str(&format!("= {unchanged_count} unchanged elements (not shown)\n"));
    }

    out.trim_end().to_string()
}

fn render_element(e: &ElementRecord) -> String {
    let mut s = e.role.clone();
    if let Some(name) = &e.name {
        s.push_str(&format!(" \"{name}\""));
    }
    if let Some(r) = &e.reference {
        s.push_str(&format!(" [ref={r}]"));
    }
    s
}
