//! `RigModel`: adapts any `rig-core` completion model to this crate's
//! `Model` trait (spec §6 "Model interface"). `rig-core` is the teacher's
//! declared multi-provider LLM dependency; this adapter is the thin
//! "caller-supplied async function" spec §6 asks for, expressed as a
//! trait impl over `rig::completion::CompletionModel` so a caller can
//! plug in whichever provider `rig-core` supports without this crate
//! hardcoding one vendor.

use async_trait::async_trait;
use rig::completion::{
    CompletionModel as RigCompletionModel, CompletionRequest, Message as RigMessage,
    ToolDefinition,
};

use crate::agent::model::{Message, Model, ModelResponse, ToolCall, Usage};
use crate::error::AgentError;

/// Wraps a `rig::completion::CompletionModel`, translating this crate's
/// `Message`/tool-schema shapes to and from `rig-core`'s request/response
/// types on every call.
pub struct RigModel<M> {
    inner: M,
    preamble: Option<String>,
}

impl<M> RigModel<M> {
    pub fn new(inner: M) -> Self {
        Self { inner, preamble: None }
    }
}

#[async_trait]
impl<M> Model for RigModel<M>
where
    M: RigCompletionModel + Send + Sync,
{
    async fn complete(
        &self,
        messages: &[Message],
        tools: &serde_json::Value,
        max_tokens: u32,
    ) -> Result<ModelResponse, AgentError> {
        let (preamble, chat_history) = split_system_preamble(messages, self.preamble.as_deref());
        let tool_definitions = parse_tool_schema(tools);

        let request = CompletionRequest {
            preamble,
            chat_history,
            documents: Vec::new(),
            tools: tool_definitions,
            temperature: None,
            max_tokens: Some(max_tokens as u64),
            additional_params: None,
        };

        let response = self
            .inner
            .completion(request)
            .await
            .map_err(|e| AgentError::TransportError(format!("model completion failed: {e}")))?;

        Ok(into_model_response(response))
    }
}

/// Separate the leading system message (spec §4.5 step 2's system message)
/// into rig's `preamble` field, carrying every other message through as
/// chat history.
fn split_system_preamble(messages: &[Message], fallback_preamble: Option<&str>) -> (Option<String>, Vec<RigMessage>) {
    let mut preamble = fallback_preamble.map(|s| s.to_string());
    let mut history = Vec::new();

    for message in messages {
        match message {
            Message::System { content } => {
                preamble = Some(content.clone());
            }
            Message::User { content } => history.push(RigMessage::user(content.clone())),
            Message::Assistant { content, .. } => history.push(RigMessage::assistant(content.clone())),
            Message::Tool { content, .. } => history.push(RigMessage::user(content.clone())),
        }
    }

    (preamble, history)
}

fn parse_tool_schema(tools: &serde_json::Value) -> Vec<ToolDefinition> {
    tools
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|t| {
            Some(ToolDefinition {
                name: t.get("name")?.as_str()?.to_string(),
                description: t.get("description").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                parameters: t.get("parameters").cloned().unwrap_or_else(|| serde_json::json!({})),
            })
        })
        .collect()
}

fn into_model_response<T>(response: rig::completion::CompletionResponse<T>) -> ModelResponse {
    use rig::completion::AssistantContent;

    let mut content = String::new();
    let mut tool_calls = Vec::new();

    for (i, part) in response.choice.into_iter().enumerate() {
        match part {
            AssistantContent::Text(text) => content.push_str(&text.text),
            AssistantContent::ToolCall(call) => tool_calls.push(ToolCall {
                id: if call.id.is_empty() { format!("call_{i}") } else { call.id },
                name: call.function.name,
                arguments: call.function.arguments,
            }),
        }
    }

    ModelResponse { content, tool_calls, usage: Usage::default() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tool_schema_extracts_name_and_parameters() {
        let schema = crate::agent::tools::tool_schema();
        let defs = parse_tool_schema(&schema);
        assert_eq!(defs.len(), 10);
        assert_eq!(defs[0].name, "navigate");
        assert!(defs[0].parameters["properties"]["url"].is_object());
    }

    #[test]
    fn split_system_preamble_pulls_out_the_system_message() {
        let messages = vec![Message::system("you are an agent"), Message::user("go")];
        let (preamble, history) = split_system_preamble(&messages, None);
        assert_eq!(preamble.as_deref(), Some("you are an agent"));
        assert_eq!(history.len(), 1);
    }
}
