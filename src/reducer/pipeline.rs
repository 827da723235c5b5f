//! Composes the ten reducers in the fixed order spec'd (§9 Open Question:
//! order is load-bearing, never reshuffle it), then collapses blank-line
//! runs. Reducers 9 and 10 are opt-in per call, not part of the core eight.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::compress::AirportTable;
use super::{attrs, chrome, collapse, compress, dedup, interactive_only, noise, smart_truncate, truncate, viewport};
use crate::config::BrowseConfig;

pub struct PipelineOptions {
    pub truncate_name_len: usize,
    pub smart_truncate_max_items: usize,
    pub airports: AirportTable,
    /// Reducer 9: when set, only these refs (and their ancestors) survive.
    pub viewport_refs: Option<HashSet<String>>,
    /// Reducer 10: when true, drop every non-reference-bearing subtree.
    pub interactive_only: bool,
}

impl PipelineOptions {
    pub fn from_config(cfg: &BrowseConfig) -> Self {
        Self {
            truncate_name_len: cfg.truncate_name_len,
            smart_truncate_max_items: cfg.smart_truncate_max_items,
            airports: AirportTable::default(),
            viewport_refs: None,
            interactive_only: false,
        }
    }
}

/// Run reducers 1-8 unconditionally, then 9 and/or 10 if requested, then
/// collapse blank-line runs of three or more down to two and trim.
pub fn run(outline: &str, opts: &PipelineOptions) -> String {
    let mut out = outline.to_string();
    out = chrome::strip_chrome(&out);
    out = attrs::prune_attributes(&out);
    out = noise::remove_noise(&out);
    out = dedup::dedup_links(&out);
    out = collapse::collapse_redundant_children(&out);
    out = compress::semantic_compress(&out, &opts.airports);
    out = truncate::truncate_long_names(&out, opts.truncate_name_len);
    out = smart_truncate::smart_truncate(&out, opts.smart_truncate_max_items);

    if let Some(visible) = &opts.viewport_refs {
        out = viewport::viewport_only(&out, visible);
    }
    if opts.interactive_only {
        out = interactive_only::interactive_only(&out);
    }

    collapse_blank_runs(&out)
}

pub fn collapse_blank_runs(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap());
    re.replace_all(text, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> PipelineOptions {
        PipelineOptions {
            truncate_name_len: 120,
            smart_truncate_max_items: 5,
            airports: AirportTable::default(),
            viewport_refs: None,
            interactive_only: false,
        }
    }

    #[test]
    fn pipeline_is_idempotent_on_its_own_output() {
        let outline = "- banner\n  - link \"Skip to content\"\n- main\n  - button \"Go\" [ref=e1]\n  - text \"  \"";
        let once = run(outline, &opts());
        let twice = run(&once, &opts());
        assert_eq!(once, twice);
    }

    #[test]
    fn collapses_long_blank_runs() {
        let text = "a\n\n\n\n\nb";
        assert_eq!(collapse_blank_runs(text), "a\n\nb");
    }

    #[test]
    fn full_pipeline_strips_chrome_and_compresses_prices() {
        let outline = concat!(
            "- banner\n",
            "  - link \"Skip to content\"\n",
            "- main\n",
            "  - link \"Flight to Denver, From 200 US dollars round trip\" [ref=e1]\n",
        );
        let out = run(outline, &opts());
        assert!(!out.contains("banner"));
        assert!(out.contains("$200"));
        assert!(out.contains("[ref=e1]"));
    }

    #[test]
    fn viewport_and_interactive_only_are_opt_in() {
        let outline = "- region\n  - text \"caption\"\n  - button \"Go\" [ref=e1]";
        let mut o = opts();
        o.interactive_only = true;
        let out = run(outline, &o);
        assert!(!out.contains("caption"));
        assert!(out.contains("[ref=e1]"));
    }
}
