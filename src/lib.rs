//! `outline-agent`: drives a headless browser on behalf of a language
//! model by presenting each page as a compact, reference-tagged
//! accessibility outline (see `SPEC_FULL.md`).
//!
//! Five components, leaves first: the Outline Builder (`outline`), the
//! Reducer Pipeline (`reducer`), the Differ (`differ`), the Action
//! Resolver (`browser::resolver`), and the Agent Loop (`agent`).

pub mod agent;
pub mod browser;
pub mod config;
pub mod differ;
pub mod error;
pub mod line;
pub mod outline;
pub mod reducer;

pub use agent::{AgentRunOutput, Model};
pub use config::BrowseConfig;
pub use error::AgentError;
pub use outline::RoleTable;

/// Drive one agent run end to end (spec §6 `browseWeb`): launch the
/// browser, navigate to `start_url`, then alternate model and browser
/// turns until the model calls `done` or the step budget is exhausted.
pub async fn browse_web(
    model: &dyn Model,
    cfg: &BrowseConfig,
    start_url: &str,
    task: &str,
) -> Result<AgentRunOutput, AgentError> {
    let roles = RoleTable::default();
    agent::run(model, cfg, &roles, start_url, task, None).await
}
