//! Reducer 2: Prune attributes (spec §4.2).
//!
//! Drops `/url:` lines, shortens bare-URL names to `host+path`, and strips a
//! fixed set of low-value bracket tags. Refs are protected with an opaque
//! placeholder for the duration so none of these text substitutions can
//! clobber a `[ref=e<n>]` token.

use std::sync::OnceLock;

use regex::{Captures, Regex};

const REF_GUARD: char = '\u{E000}';

fn ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[ref=(e\d+)\]").unwrap())
}

fn restore_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"{REF_GUARD}REF(e\d+){REF_GUARD}")).unwrap())
}

fn bare_url_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""(https?://[^"]+)""#).unwrap())
}

fn noise_tag_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r#"\s\[url=[^\]]*\]"#,
            r#"\s\[description=""\]"#,
            r#"\s\[focused\]"#,
            r#"\s\[disabled=false\]"#,
            r#"\s\[level=\d+\]"#,
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

pub fn prune_attributes(outline: &str) -> String {
    let guarded = ref_re().replace_all(outline, |c: &Captures| format!("{REF_GUARD}REF{}{REF_GUARD}", &c[1]));

    let mut text: String = guarded
        .lines()
        .filter(|l| !l.trim_start().starts_with("- /url:"))
        .collect::<Vec<_>>()
        .join("\n");

    text = shorten_bare_url_names(&text);

    for re in noise_tag_res() {
        text = re.replace_all(&text, "").into_owned();
    }

    restore_re().replace_all(&text, "[ref=$1]").into_owned()
}

fn shorten_bare_url_names(text: &str) -> String {
    bare_url_name_re()
        .replace_all(text, |c: &Captures| {
            let raw = &c[1];
            match url::Url::parse(raw) {
                Ok(u) => {
                    let host = u.host_str().unwrap_or("");
                    let path = u.path();
                    let shortened = if path == "/" { host.to_string() } else { format!("{host}{path}") };
                    format!("\"{shortened}\"")
                }
                Err(_) => c[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_url_lines_and_noise_tags() {
        let outline = "- link \"Home\" [ref=e1] [focused] [level=2]\n  - /url: https://example.com/home\n- text \"\" [description=\"\"]";
        let out = prune_attributes(outline);
        assert!(!out.contains("/url:"));
        assert!(!out.contains("[focused]"));
        assert!(!out.contains("[level=2]"));
        assert!(!out.contains("[description"));
        assert!(out.contains("[ref=e1]"));
    }

    #[test]
    fn shortens_bare_url_names_to_host_plus_path() {
        let outline = "- link \"https://example.com/docs/guide?x=1\" [ref=e1]";
        let out = prune_attributes(outline);
        assert!(out.contains("\"example.com/docs/guide\""));
        assert!(out.contains("[ref=e1]"));
    }

    #[test]
    fn root_url_shortens_to_bare_host() {
        let outline = "- link \"https://example.com/\" [ref=e1]";
        let out = prune_attributes(outline);
        assert!(out.contains("\"example.com\""));
    }

    #[test]
    fn refs_survive_unaffected_by_any_substitution() {
        let outline = "- button \"Go\" [ref=e42] [disabled=false]";
        let out = prune_attributes(outline);
        assert!(out.contains("[ref=e42]"));
        assert!(!out.contains("disabled"));
    }
}
