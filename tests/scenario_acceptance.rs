//! Acceptance scenarios from spec §8 that don't need a live browser: the
//! Reducer Pipeline and Differ wired together exactly as the Agent Loop
//! wires them (S4-S7). S1-S3 (which need a real page) live in
//! `browser_integration.rs`.

use outline_agent::differ::diff;
use outline_agent::outline::RoleTable;
use outline_agent::reducer::{run as reduce, PipelineOptions};

fn opts() -> PipelineOptions {
    PipelineOptions {
        truncate_name_len: 120,
        smart_truncate_max_items: 5,
        airports: outline_agent::reducer::AirportTable::default(),
        viewport_refs: None,
        interactive_only: false,
    }
}

/// S4 — empty diff: the observation carries no outline, no `Changes:` block.
#[test]
fn s4_empty_diff_observation_has_no_outline_or_changes_block() {
    let roles = RoleTable::default();
    let outline = "- button \"Go\" [ref=e1]\n- text \"Welcome\"";
    let report = diff(outline, outline, "https://x.test", "https://x.test", &roles, 0.7);

    assert!(report.is_empty);
    let observation = format!("Action: {}\n{}", "Clicked at (10, 20)", "No visible changes on the page.");
    assert_eq!(observation, "Action: Clicked at (10, 20)\nNo visible changes on the page.");
    assert!(!observation.contains("Changes:"));
}

/// S5 — large diff triggers the full post-reduction outline instead of a diff block.
#[test]
fn s5_large_diff_surfaces_new_page_snapshot() {
    let roles = RoleTable::default();
    let prev = "- heading \"Home\" [ref=e1]\n- link \"A\" [ref=e2]\n- link \"B\" [ref=e3]\n- link \"C\" [ref=e4]";
    let cur = "- heading \"Checkout\" [ref=e5]\n- button \"Pay\" [ref=e6]\n- text \"Total: $40\" [ref=e7]\n- button \"Cancel\" [ref=e8]";

    let report = diff(prev, cur, "https://shop.test/cart", "https://shop.test/checkout", &roles, 0.7);

    assert!(report.is_large_diff, "ratio {} should exceed the 0.7 threshold", report.diff_ratio);
    assert!(!report.text.contains("Changes:"));
}

/// S6 — smart truncate collapses a run of 20 same-role siblings to 5 kept
/// items plus one summary line naming the hidden count and up to three refs.
#[test]
fn s6_smart_truncate_collapses_twenty_listitems_to_five_plus_summary() {
    let mut outline = String::from("- list\n");
    for i in 1..=20 {
        outline.push_str(&format!("  - listitem \"Row {i}\" [ref=e{i}]\n"));
    }

    let reduced = reduce(&outline, &opts());

    let kept = reduced.matches("- listitem").count();
    assert_eq!(kept, 5, "expected exactly 5 kept listitems, got:\n{reduced}");

    let summary_re = regex::Regex::new(
        r#"^\s*- text "\.\.\. and 15 more listitems( \(\d+ refs hidden: e\d+(,e\d+){0,2}\.\.\.\))?"$"#,
    )
    .unwrap();
    assert!(
        reduced.lines().any(|line| summary_re.is_match(line)),
        "no line matched the S6 summary pattern:\n{reduced}"
    );
}

/// S7 — a verbose flight-itinerary link name compresses to the fixed-shorthand form.
#[test]
fn s7_flight_itinerary_compresses_to_shorthand() {
    let outline = concat!(
        "- link \"From 320 US dollars round trip. United. Leaves San Francisco International ",
        "at 7:15 AM. Arrives John F. Kennedy International at 3:40 PM. ",
        "Total duration 5 hr 25 min. Nonstop\" [ref=e1]",
    );

    let reduced = reduce(outline, &opts());

    assert!(
        reduced.contains("United SFO 7:15AM\u{2192}JFK 3:40PM 5h25 nonstop $320"),
        "got:\n{reduced}"
    );
    assert!(reduced.contains("[ref=e1]"));
}
