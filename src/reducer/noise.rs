//! Reducer 3: Remove noise (spec §4.2): drops `/placeholder:` lines and
//! empty-or-whitespace-only `text` lines.

use crate::line;

pub fn remove_noise(outline: &str) -> String {
    outline
        .lines()
        .filter(|l| {
            let trimmed = l.trim_start();
            if trimmed.starts_with("- /placeholder:") {
                return false;
            }
            if let Some(parsed) = line::parse(l) {
                if parsed.role == "text" {
                    let empty = parsed.name.as_deref().map(|n| n.trim().is_empty()).unwrap_or(true);
                    if empty {
                        return false;
                    }
                }
            }
            true
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_placeholder_lines() {
        let outline = "- textbox\n  - /placeholder: Search this site";
        assert_eq!(remove_noise(outline), "- textbox");
    }

    #[test]
    fn drops_empty_text_lines_but_keeps_named_ones() {
        let outline = "- text \"  \"\n- text \"real content\"\n- text";
        let out = remove_noise(outline);
        assert!(!out.contains("\"  \""));
        assert!(out.contains("real content"));
        assert!(!out.lines().any(|l| l == "- text"));
    }

    #[test]
    fn non_text_lines_pass_through_untouched() {
        let outline = "- button \"Go\" [ref=e1]";
        assert_eq!(remove_noise(outline), outline);
    }
}
