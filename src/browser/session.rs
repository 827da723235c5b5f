//! Browser session management (spec §4.4, §5, §6).
//!
//! Owns the Chrome process lifecycle (via `browser::launch`), the
//! `chromiumoxide` connection, and the single handle map an outline refresh
//! replaces atomically (spec §3 Handle-map invariants). Generalizes the
//! teacher's `BrowserSession` from `tools/builtin/browser/session.rs`: same
//! CDP call sequence for reading the page and dispatching input, but
//! references resolve against the outline-produced `HandleMap` instead of
//! an internal `ElementRefMap` scoped to one tool object, since this
//! crate's Differ needs outlines (not just ref maps) to persist across a
//! step (see SPEC_FULL.md §5).

use futures::StreamExt;
use tokio::task::JoinHandle;

use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::accessibility::GetFullAxTreeParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;

use crate::browser::launch::{self, LaunchedChrome};
use crate::config::BrowseConfig;
use crate::error::AgentError;
use crate::outline::{build_outline, AccessibilityNode, HandleMap, RoleTable};

/// Owns the Chrome process and the one page this crate drives (spec §1:
/// no multi-tab management is in scope; the teacher's tab map is reduced
/// to a single active page).
pub struct BrowserSession {
    _chrome: LaunchedChrome,
    browser: Browser,
    _handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// Launch Chrome, connect over CDP, enable the domains this crate uses,
    /// and open the initial blank page (spec §6).
    pub async fn launch(cfg: &BrowseConfig) -> Result<Self, AgentError> {
        let chrome = launch::launch(cfg).await?;

        let (browser, mut handler) = Browser::connect(&chrome.debugger_ws_url)
            .await
            .map_err(AgentError::from)?;

        // The handler must be polled continuously or the CDP connection dies,
        // exactly as in the teacher's session.rs.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("browser handler error: {:?}", event);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(AgentError::from)?;

        page.execute(chromiumoxide::cdp::browser_protocol::page::EnableParams::default())
            .await
            .map_err(AgentError::from)?;
        page.execute(chromiumoxide::cdp::js_protocol::runtime::EnableParams::default())
            .await
            .map_err(AgentError::from)?;
        page.execute(chromiumoxide::cdp::browser_protocol::dom::EnableParams::default())
            .await
            .map_err(AgentError::from)?;
        page.execute(chromiumoxide::cdp::browser_protocol::accessibility::EnableParams::default())
            .await
            .map_err(AgentError::from)?;

        Ok(Self { _chrome: chrome, browser, _handler_task: handler_task, page })
    }

    /// The page this session drives.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Current page URL, or `about:blank` if Chrome hasn't reported one yet.
    pub async fn current_url(&self) -> Result<String, AgentError> {
        Ok(self
            .page
            .url()
            .await
            .map_err(AgentError::from)?
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    pub async fn navigate(&self, url: &str) -> Result<(), AgentError> {
        self.page.goto(url).await.map_err(AgentError::from)?;
        Ok(())
    }

    /// Fetch the full accessibility tree, convert it to this crate's
    /// `AccessibilityNode` list, and run the Outline Builder (spec §4.1).
    /// Returns the outline text and the handle map that replaces the
    /// previous one atomically (spec §3).
    pub async fn take_outline(&self, roles: &RoleTable) -> Result<(String, HandleMap), AgentError> {
        let ax_result = self
            .page
            .execute(GetFullAxTreeParams::default())
            .await
            .map_err(AgentError::from)?;

        let nodes: Vec<AccessibilityNode> =
            ax_result.result.nodes.iter().map(convert_ax_node).collect();

        Ok(build_outline(&nodes, roles))
    }

    pub async fn screenshot(&self) -> Result<String, AgentError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let bytes = self.page.screenshot(params).await.map_err(AgentError::from)?;
        use base64::Engine;
        Ok(base64::engine::general_purpose::STANDARD.encode(&bytes))
    }

    /// Extract `document.body.innerText`, or a selector's `innerText` when
    /// one is supplied (spec §6 utility tool `extract_text`).
    pub async fn extract_text(&self, selector: Option<&str>) -> Result<String, AgentError> {
        let js = match selector {
            Some(sel) => {
                let escaped = serde_json::to_string(sel).unwrap_or_else(|_| "null".to_string());
                format!(
                    "(() => {{ const el = document.querySelector({escaped}); return el ? el.innerText : null; }})()"
                )
            }
            None => "document.body.innerText".to_string(),
        };

        let value = self
            .page
            .evaluate(js.as_str())
            .await
            .map_err(AgentError::from)?
            .into_value::<Option<String>>()
            .map_err(|e| AgentError::EvaluationError(e.to_string()))?;

        Ok(value.unwrap_or_default())
    }

    pub async fn scroll(&self, direction: &str, amount: u32) -> Result<(), AgentError> {
        let (dx, dy) = match direction {
            "up" => (0, -(amount as i32 * 100)),
            "down" => (0, amount as i32 * 100),
            other => {
                return Err(AgentError::ToolError(format!(
                    "invalid scroll direction '{other}'. Use: up, down"
                )));
            }
        };
        let js = format!("window.scrollBy({dx}, {dy})");
        self.page.evaluate(js.as_str()).await.map_err(AgentError::from)?;
        // §5: 200ms settle delay after scroll.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        Ok(())
    }

    /// Poll for a CSS selector to appear (§4.5/§9's `wait` tool, wired in
    /// per the Open-Questions decision in SPEC_FULL.md §9.4).
    pub async fn wait_for_selector(&self, selector: &str, timeout_ms: u64, poll_interval_ms: u64) -> Result<(), AgentError> {
        let escaped = serde_json::to_string(selector).unwrap_or_else(|_| "null".to_string());
        let deadline = std::time::Instant::now() + std::time::Duration::from_millis(timeout_ms);

        loop {
            let js = format!("!!document.querySelector({escaped})");
            let found: bool = self
                .page
                .evaluate(js.as_str())
                .await
                .map_err(AgentError::from)?
                .into_value()
                .unwrap_or(false);

            if found {
                return Ok(());
            }
            if std::time::Instant::now() >= deadline {
                return Err(AgentError::Timeout(format!(
                    "selector '{selector}' did not appear within {timeout_ms}ms"
                )));
            }
            tokio::time::sleep(std::time::Duration::from_millis(poll_interval_ms)).await;
        }
    }

    /// Open a fresh tab. Reserved for future tab-management tools; not part
    /// of the spec's tool schema today (kept for parity with the teacher's
    /// `new_tab`, since `browser` owns `Browser` either way).
    #[allow(dead_code)]
    pub async fn new_tab(&self, url: &str) -> Result<Page, AgentError> {
        self.browser.new_page(url).await.map_err(AgentError::from)
    }
}

/// Convert one CDP `AxNode` into this crate's pure `AccessibilityNode`
/// (SPEC_FULL.md §2: keeps the pure outline core free of any CDP
/// dependency).
fn convert_ax_node(node: &chromiumoxide::cdp::browser_protocol::accessibility::AxNode) -> AccessibilityNode {
    let id = node.node_id.inner().to_string();
    let parent_id = node.parent_id.as_ref().map(|p| p.inner().to_string());
    let role = ax_value_str(&node.role).unwrap_or_else(|| "generic".to_string());
    let name = ax_value_str(&node.name);

    let mut n = AccessibilityNode::new(id, role);
    if let Some(parent) = parent_id {
        n = n.with_parent(parent);
    }
    if let Some(name) = name.filter(|s| !s.is_empty()) {
        n = n.with_name(name);
    }
    if let Some(backend_id) = node.backend_dom_node_id {
        n = n.with_backend_node_id(backend_id.inner());
    }
    if node.ignored {
        n = n.ignored();
    }
    n
}

fn ax_value_str(value: &Option<chromiumoxide::cdp::browser_protocol::accessibility::AxValue>) -> Option<String> {
    value
        .as_ref()
        .and_then(|v| v.value.as_ref())
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
