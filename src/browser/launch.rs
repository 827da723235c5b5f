//! Chrome discovery and launch (spec §6). Reuses the teacher's
//! `find_chrome`/`which_chrome_in_path` binary-discovery idiom from
//! `tools/builtin/browser/session.rs` verbatim in behavior, but launches
//! with spec §6's exact flag set instead of the teacher's stealth flags,
//! and polls `GET http://127.0.0.1:<port>/json` directly via `reqwest`
//! instead of `chromiumoxide::Browser::launch`'s own internal polling, so
//! the 30x200ms / 6s `LaunchFailure` contract (§5, §7) is this crate's own
//! observable behavior rather than a library default.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde::Deserialize;

use crate::config::BrowseConfig;
use crate::error::AgentError;

/// One entry of the `/json` target list.
#[derive(Debug, Deserialize)]
struct DevtoolsTarget {
    #[serde(rename = "type")]
    target_type: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: Option<String>,
}

/// A launched Chrome process plus the resolved debugger WebSocket URL of its
/// first page target. Dropping this kills the child process (§5: the
/// browser subprocess is a scoped resource released unconditionally).
pub struct LaunchedChrome {
    pub child: Child,
    pub debugger_ws_url: String,
    pub profile_dir: Option<PathBuf>,
    owns_profile_dir: bool,
}

impl Drop for LaunchedChrome {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "chrome process already exited");
        }
        let _ = self.child.wait();
        if self.owns_profile_dir {
            if let Some(dir) = &self.profile_dir {
                if let Err(e) = std::fs::remove_dir_all(dir) {
                    tracing::warn!(dir = %dir.display(), error = %e, "failed to remove temp profile dir");
                }
            }
        }
    }
}

/// Launch Chrome per spec §6 and wait for the debugger to become ready,
/// polling `/json` up to 30 times at 200ms intervals before failing
/// `LaunchFailure` at the 6s mark (§5, §7).
pub async fn launch(cfg: &BrowseConfig) -> Result<LaunchedChrome, AgentError> {
    let chrome_path = resolve_chrome_path(cfg)
        .ok_or_else(|| AgentError::LaunchFailure("Chrome/Chromium not found. Install Chrome or set CHROME_PATH.".to_string()))?;

    let port = cfg.resolve_debugger_port();

    let (profile_dir, owns_profile_dir) = match &cfg.profile_dir {
        Some(dir) => (dir.clone(), false),
        None => {
            let dir = std::env::temp_dir().join(format!("outline-agent-profile-{port}"));
            std::fs::create_dir_all(&dir).map_err(|e| {
                AgentError::LaunchFailure(format!("failed to create temp profile dir: {e}"))
            })?;
            (dir, true)
        }
    };

    let mut command = Command::new(&chrome_path);
    command
        .arg(format!("--remote-debugging-port={port}"))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-background-timer-throttling")
        .arg("--disable-backgrounding-occluded-windows")
        .arg("--disable-renderer-backgrounding")
        .arg(format!("--window-size={},{}", cfg.viewport.0, cfg.viewport.1))
        .arg(format!("--user-data-dir={}", profile_dir.display()));

    if cfg.headless {
        command.arg("--headless=new");
    }

    command
        .arg("about:blank")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let child = command
        .spawn()
        .map_err(|e| AgentError::LaunchFailure(format!("failed to spawn {}: {e}", chrome_path.display())))?;

    let debugger_ws_url = poll_debugger_ready(port, cfg.debugger_ready_timeout_ms).await?;

    Ok(LaunchedChrome { child, debugger_ws_url, profile_dir: Some(profile_dir), owns_profile_dir })
}

/// Poll `/json` every 200ms until a page target answers or the timeout
/// elapses (§5: "30 tries x 200ms"; §7: `LaunchFailure` at the boundary).
async fn poll_debugger_ready(port: u16, timeout_ms: u64) -> Result<String, AgentError> {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{port}/json");
    let deadline = std::time::Instant::now() + Duration::from_millis(timeout_ms);
    let poll_interval = Duration::from_millis(200);

    loop {
        if let Ok(resp) = client.get(&url).send().await {
            if let Ok(targets) = resp.json::<Vec<DevtoolsTarget>>().await {
                if let Some(target) = targets
                    .into_iter()
                    .find(|t| t.target_type == "page" && t.web_socket_debugger_url.is_some())
                {
                    return Ok(target.web_socket_debugger_url.expect("checked above"));
                }
            }
        }

        if std::time::Instant::now() >= deadline {
            return Err(AgentError::LaunchFailure(format!(
                "debugger never became ready at {url} within {timeout_ms}ms"
            )));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Explicit config override, else the teacher's per-OS candidate search,
/// else a PATH scan.
fn resolve_chrome_path(cfg: &BrowseConfig) -> Option<PathBuf> {
    if let Some(path) = &cfg.chrome_path {
        if path.exists() {
            return Some(path.clone());
        }
    }
    find_chrome()
}

/// Search common locations for a Chrome/Chromium binary (ported from the
/// teacher's `find_chrome`).
pub fn find_chrome() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CHROME_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
            "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
        ]
    } else if cfg!(target_os = "linux") {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    } else {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    };

    for candidate in candidates {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }

    which_chrome_in_path()
}

fn which_chrome_in_path() -> Option<PathBuf> {
    let path_var = std::env::var("PATH").ok()?;
    let separator = if cfg!(windows) { ';' } else { ':' };
    for name in &["google-chrome", "chromium", "chromium-browser", "chrome"] {
        for dir in path_var.split(separator) {
            let candidate = Path::new(dir).join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_chrome_returns_path_or_none() {
        let result = find_chrome();
        if let Some(path) = &result {
            assert!(path.exists(), "find_chrome returned non-existent path: {path:?}");
        }
    }

    #[test]
    fn resolve_chrome_path_prefers_explicit_config_path_when_it_exists() {
        let mut cfg = BrowseConfig::default();
        let existing = std::env::current_exe().unwrap();
        cfg.chrome_path = Some(existing.clone());
        assert_eq!(resolve_chrome_path(&cfg), Some(existing));
    }

    #[test]
    fn resolve_chrome_path_falls_back_when_explicit_path_is_missing() {
        let mut cfg = BrowseConfig::default();
        cfg.chrome_path = Some(PathBuf::from("/nonexistent/definitely/not/chrome"));
        assert_eq!(resolve_chrome_path(&cfg), find_chrome());
    }
}
