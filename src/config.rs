//! Runtime configuration, resolved from environment variables with typed
//! defaults (the teacher's `config/legal.rs` resolve-with-fallback idiom).

use std::path::PathBuf;

use crate::error::ConfigError;

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("could not parse '{raw}'"),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected a boolean, got '{other}'"),
            }),
        },
        Err(_) => Ok(default),
    }
}

fn optional_path_env(key: &str) -> Option<PathBuf> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty()).map(PathBuf::from)
}

/// Tunables for the reducer pipeline, the differ, and the agent loop.
///
/// Resolution order: explicit environment variable, else the hardcoded
/// default below. `.env` is loaded first via `dotenvy` by the CLI entry
/// point, so file-based overrides flow through the same environment path.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    /// §4.5: max agent-loop steps before returning partial results.
    pub max_steps: usize,
    /// §4.5: token cap passed to the model on every completion call.
    pub model_max_tokens: u32,
    /// §6: explicit Chrome/Chromium binary, else PATH search.
    pub chrome_path: Option<PathBuf>,
    /// §6: `--headless=new` when true.
    pub headless: bool,
    /// §5: temp profile dir, owned by the session and removed on close.
    pub profile_dir: Option<PathBuf>,
    /// §6: default `9222 + rand(0..999)` when unset.
    pub debugger_port: Option<u16>,
    /// §5: debugger-ready probe fails `LaunchFailure` after this many ms.
    pub debugger_ready_timeout_ms: u64,
    /// §5: `waitForSelector` poll interval.
    pub selector_poll_interval_ms: u64,
    /// §5: default `waitForSelector` timeout when the caller doesn't specify one.
    pub selector_default_timeout_ms: u64,
    /// §6: `--window-size=<w>,<h>`.
    pub viewport: (u32, u32),
    /// §4.2 reducer 7 ("configurable").
    pub truncate_name_len: usize,
    /// §4.2 reducer 8 default `K`.
    pub smart_truncate_max_items: usize,
    /// §3/§8: `isLargeDiff` threshold.
    pub large_diff_threshold: f64,
}

impl BrowseConfig {
    pub fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            max_steps: parse_env("OUTLINE_AGENT_MAX_STEPS", 25)?,
            model_max_tokens: parse_env("OUTLINE_AGENT_MODEL_MAX_TOKENS", 1024)?,
            chrome_path: optional_path_env("CHROME_PATH"),
            headless: parse_bool_env("OUTLINE_AGENT_HEADLESS", true)?,
            profile_dir: optional_path_env("OUTLINE_AGENT_PROFILE_DIR"),
            debugger_port: match std::env::var("OUTLINE_AGENT_DEBUGGER_PORT") {
                Ok(raw) if !raw.trim().is_empty() => {
                    Some(raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                        key: "OUTLINE_AGENT_DEBUGGER_PORT".to_string(),
                        message: format!("could not parse '{raw}' as a port"),
                    })?)
                }
                _ => None,
            },
            debugger_ready_timeout_ms: parse_env("OUTLINE_AGENT_DEBUGGER_READY_TIMEOUT_MS", 6000)?,
            selector_poll_interval_ms: parse_env("OUTLINE_AGENT_SELECTOR_POLL_INTERVAL_MS", 200)?,
            selector_default_timeout_ms: parse_env("OUTLINE_AGENT_SELECTOR_DEFAULT_TIMEOUT_MS", 5000)?,
            viewport: (
                parse_env("OUTLINE_AGENT_VIEWPORT_WIDTH", 1280)?,
                parse_env("OUTLINE_AGENT_VIEWPORT_HEIGHT", 900)?,
            ),
            truncate_name_len: parse_env("OUTLINE_AGENT_TRUNCATE_NAME_LEN", 120)?,
            smart_truncate_max_items: parse_env("OUTLINE_AGENT_SMART_TRUNCATE_MAX_ITEMS", 5)?,
            large_diff_threshold: parse_env("OUTLINE_AGENT_LARGE_DIFF_THRESHOLD", 0.7)?,
        })
    }

    /// Resolve the debugger port, picking `9222 + rand(0..999)` when unset (§6).
    pub fn resolve_debugger_port(&self) -> u16 {
        self.debugger_port.unwrap_or_else(|| 9222 + rand::random::<u16>() % 1000)
    }
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self::resolve().expect("hardcoded defaults always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global; serialize config tests
    // through a single lock so they don't stomp on each other.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn defaults_match_spec() {
        let _guard = ENV_LOCK.lock().unwrap();
        for key in [
            "OUTLINE_AGENT_MAX_STEPS",
            "OUTLINE_AGENT_MODEL_MAX_TOKENS",
            "OUTLINE_AGENT_LARGE_DIFF_THRESHOLD",
        ] {
            unsafe { std::env::remove_var(key) };
        }
        let cfg = BrowseConfig::resolve().unwrap();
        assert_eq!(cfg.max_steps, 25);
        assert_eq!(cfg.model_max_tokens, 1024);
        assert_eq!(cfg.large_diff_threshold, 0.7);
        assert_eq!(cfg.viewport, (1280, 900));
    }

    #[test]
    fn invalid_bool_is_rejected_with_key_and_message() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { std::env::set_var("OUTLINE_AGENT_HEADLESS", "sideways") };
        let err = BrowseConfig::resolve().expect_err("must reject non-boolean");
        let ConfigError::InvalidValue { key, message } = err;
        assert_eq!(key, "OUTLINE_AGENT_HEADLESS");
        assert!(message.contains("sideways"));
        unsafe { std::env::remove_var("OUTLINE_AGENT_HEADLESS") };
    }

    #[test]
    fn debugger_port_falls_in_documented_range_when_unset() {
        let cfg = BrowseConfig { debugger_port: None, ..BrowseConfig::default() };
        let port = cfg.resolve_debugger_port();
        assert!((9222..9222 + 999).contains(&port));
    }
}
