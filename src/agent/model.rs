//! The Model interface (spec §6 "Model interface", §4.5): a caller-supplied
//! async completion function, expressed as a trait object rather than a
//! bare closure (the same reasoning the teacher applies to its `Tool`
//! trait for tool dispatch — async closures aren't ergonomic in Rust, a
//! trait is the idiomatic seat for this kind of seam).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// One chat message (spec §6: `system | user | assistant | tool`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System { content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User { content: content.into() }
    }
}

/// One requested tool invocation inside an assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Token accounting for one completion call (spec §6 `usage`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// One model completion (spec §6: `{content, toolCalls?, usage?}`).
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Usage,
}

/// A chat-completion backend. `AgentLoop::run` calls `complete` once per
/// step with the running message list, the fixed tool schema (spec §6),
/// and the 1024-token cap (spec §4.5 step 3).
#[async_trait]
pub trait Model: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &serde_json::Value,
        max_tokens: u32,
    ) -> Result<ModelResponse, AgentError>;
}
