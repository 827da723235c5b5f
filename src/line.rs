//! Generic outline-line parsing, shared by the reducer pipeline and (in a
//! stricter form) the differ. An outline line looks like:
//!
//! ```text
//!   - role "optional name" [ref=e3] [suffix=tag]...
//! ```
//!
//! This parser is permissive about `role` (any non-whitespace token) since
//! reducers must handle whatever the role table currently maps to, including
//! roles that don't yet exist when this code was written. The differ uses
//! its own, stricter parser restricted to the known ARIA role vocabulary.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub indent: usize,
    pub role: String,
    pub name: Option<String>,
    pub reference: Option<String>,
    /// Trailing `[tag]` groups after the ref, verbatim (leading space kept).
    pub suffix: String,
}

fn generic_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?x)
            ^(?P<indent>\x20*)-\x20
            (?P<role>[^\s"\[]+)
            (?:\x20"(?P<name>(?:\\.|[^"\\])*)")?
            (?:\x20\[ref=(?P<ref>e\d+)\])?
            (?P<suffix>(?:\x20\[[^\]]*\])*)
            $
            "#,
        )
        .unwrap()
    })
}

/// Parse one element line. Returns `None` for blank lines and synthetic
/// pseudo-lines (`- /url: ...`, `- /placeholder: ...`) that don't fit the
/// `role "name" [ref=...]` grammar.
pub fn parse(line: &str) -> Option<ParsedLine> {
    let caps = generic_regex().captures(line)?;
    let indent = caps.name("indent").map(|m| m.as_str().len()).unwrap_or(0);
    let role = caps.name("role")?.as_str().to_string();
    let name = caps.name("name").map(|m| unescape(m.as_str()));
    let reference = caps.name("ref").map(|m| m.as_str().to_string());
    let suffix = caps.name("suffix").map(|m| m.as_str().to_string()).unwrap_or_default();
    Some(ParsedLine { indent, role, name, reference, suffix })
}

pub fn render(line: &ParsedLine) -> String {
    let indent = " ".repeat(line.indent);
    let mut out = format!("{indent}- {}", line.role);
    if let Some(name) = &line.name {
        out.push_str(&format!(" \"{}\"", escape(name)));
    }
    if let Some(r) = &line.reference {
        out.push_str(&format!(" [ref={r}]"));
    }
    out.push_str(&line.suffix);
    out
}

pub fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"")
}

pub fn escape(s: &str) -> String {
    s.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_name_ref_and_suffix() {
        let p = parse("  - button \"Go\" [ref=e3] [focused]").unwrap();
        assert_eq!(p.indent, 2);
        assert_eq!(p.role, "button");
        assert_eq!(p.name.as_deref(), Some("Go"));
        assert_eq!(p.reference.as_deref(), Some("e3"));
        assert_eq!(p.suffix, " [focused]");
    }

    #[test]
    fn parses_nameless_and_refless_lines() {
        let p = parse("- group").unwrap();
        assert_eq!(p.role, "group");
        assert!(p.name.is_none());
        assert!(p.reference.is_none());
    }

    #[test]
    fn does_not_match_synthetic_pseudo_lines() {
        assert!(parse("  - /url: https://example.com").is_none());
        assert!(parse("  - /placeholder: Search").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn render_round_trips_parse() {
        let raw = "    - link \"Say \\\"hi\\\"\" [ref=e12] [level=2]";
        let parsed = parse(raw).unwrap();
        assert_eq!(render(&parsed), raw);
    }
}
