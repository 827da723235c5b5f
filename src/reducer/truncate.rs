//! Reducer 7: Truncate long names (spec §4.2): names over the configured
//! limit (default 120 chars) are cut at the last whitespace before the
//! limit and suffixed with `...`. Ref and suffix tags are untouched.

use crate::line;

pub fn truncate_long_names(outline: &str, limit: usize) -> String {
    outline.lines().map(|l| truncate_line(l, limit)).collect::<Vec<_>>().join("\n")
}

fn truncate_line(raw: &str, limit: usize) -> String {
    let Some(mut parsed) = line::parse(raw) else { return raw.to_string() };
    let Some(name) = &parsed.name else { return raw.to_string() };
    if name.chars().count() <= limit {
        return raw.to_string();
    }
    let cut = cut_at_last_whitespace(name, limit);
    parsed.name = Some(format!("{cut}..."));
    line::render(&parsed)
}

fn cut_at_last_whitespace(name: &str, limit: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    let prefix: String = chars[..limit.min(chars.len())].iter().collect();
    match prefix.rfind(char::is_whitespace) {
        Some(idx) => prefix[..idx].trim_end().to_string(),
        None => prefix,
    }
}
