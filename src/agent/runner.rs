//! Agent Loop (spec §4.5): a single-threaded cooperative driver alternating
//! model turns and browser turns. Grounded on the teacher's `BrowserAction`
//! tagged-enum dispatch (`tools/builtin/browser/mod.rs`) generalized to
//! this crate's full tool set, and on the turn-based session shape of
//! `tests/ws_gateway_integration.rs` (push message, await a turn, append
//! the observation) — but returning a plain result value rather than
//! streaming partial state, since this crate has no live UI to stream to
//! (SPEC_FULL.md §6).

use std::time::Duration;

use serde::Serialize;

use crate::agent::model::{Message, Model, ToolCall, Usage};
use crate::agent::tools::{tool_schema, AgentAction, ScrollDirection};
use crate::browser::{resolver, BrowserSession};
use crate::config::BrowseConfig;
use crate::differ::{diff, DiffReport};
use crate::error::AgentError;
use crate::outline::{HandleMap, RoleTable};
use crate::reducer::{run as reduce, PipelineOptions};

/// One entry of the step log (spec §3 Step entry).
#[derive(Debug, Clone, Serialize)]
pub struct StepEntry {
    pub step: usize,
    pub action: String,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub result: String,
}

/// Public output shape of one agent run (spec §6 `browseWeb`).
#[derive(Debug, Clone, Serialize)]
pub struct AgentRunOutput {
    pub result: String,
    pub usage: RunUsage,
    pub steps: Vec<StepEntry>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub model_calls: u64,
}

/// Invoked after every step entry is recorded (spec §4.5 step 3's
/// `onStep` callback).
pub trait StepObserver: Send + Sync {
    fn on_step(&self, entry: &StepEntry);
}

const STEP_EXHAUSTION_MESSAGE: &str = "Browser task hit step limit. Partial results may be available.";

/// Run the agent loop to completion (spec §4.5 steps 1-4).
pub async fn run(
    model: &dyn Model,
    cfg: &BrowseConfig,
    roles: &RoleTable,
    start_url: &str,
    task: &str,
    on_step: Option<&dyn StepObserver>,
) -> Result<AgentRunOutput, AgentError> {
    let session = BrowserSession::launch(cfg).await?;
    session.navigate(start_url).await?;

    let pipeline_opts = PipelineOptions::from_config(cfg);

    let (raw_outline, mut handles) = session.take_outline(roles).await?;
    let mut prev_outline = reduce(&raw_outline, &pipeline_opts);
    let mut prev_url = session.current_url().await?;

    let mut messages = vec![
        Message::system(system_prompt(task)),
        Message::user(format!("URL: {prev_url}\n\n{prev_outline}")),
    ];

    let mut steps = Vec::new();
    let mut usage = RunUsage::default();
    let tools = tool_schema();

    for step in 1..=cfg.max_steps {
        let response = model
            .complete(&messages, &tools, cfg.model_max_tokens)
            .await
            .inspect_err(|_| tracing::warn!(step, "model completion failed; closing session"))?;

        usage.model_calls += 1;
        usage.input_tokens += response.usage.input_tokens;
        usage.output_tokens += response.usage.output_tokens;

        if response.tool_calls.is_empty() {
            return Ok(AgentRunOutput { result: response.content, usage, steps });
        }

        let mut assistant_tool_calls = Vec::new();
        let mut tool_messages = Vec::new();

        for call in &response.tool_calls {
            let action: AgentAction = match serde_json::from_value(merged_call_value(call)) {
                Ok(a) => a,
                Err(e) => {
                    let observation = format!("Error: {e}");
                    tool_messages.push(Message::Tool { tool_call_id: call.id.clone(), content: observation });
                    assistant_tool_calls.push(call.clone());
                    continue;
                }
            };

            if let AgentAction::Done { result } = action {
                // session dropped here, releasing the browser process (§5).
                return Ok(AgentRunOutput { result, usage, steps });
            }

            assistant_tool_calls.push(call.clone());

            let outcome = execute_action(&session, &mut handles, roles, &action, cfg).await;
            let action_result = match outcome {
                Ok(text) => text,
                Err(e) => format!("Error: {e}"),
            };

            let entry = StepEntry {
                step,
                action: action_name(&action),
                reference: action_ref(&action),
                text: action_text(&action),
                result: truncate_chars(&action_result, 200),
            };
            if let Some(observer) = on_step {
                observer.on_step(&entry);
            }
            steps.push(entry);

            // §5: 300ms settle delay before the post-action outline refresh.
            tokio::time::sleep(Duration::from_millis(300)).await;

            let (raw_outline, new_handles) = session.take_outline(roles).await?;
            let cur_outline = reduce(&raw_outline, &pipeline_opts);
            let cur_url = session.current_url().await?;

            let report = diff(&prev_outline, &cur_outline, &prev_url, &cur_url, roles, cfg.large_diff_threshold);
            let observation = construct_observation(&action_result, &cur_outline, &cur_url, &report);

            handles = new_handles;
            prev_outline = cur_outline;
            prev_url = cur_url;

            tool_messages.push(Message::Tool { tool_call_id: call.id.clone(), content: observation });
        }

        messages.push(Message::Assistant { content: response.content, tool_calls: assistant_tool_calls });
        messages.extend(tool_messages);
    }

    Ok(AgentRunOutput { result: STEP_EXHAUSTION_MESSAGE.to_string(), usage, steps })
}

fn system_prompt(task: &str) -> String {
    format!(
        "You are a web browsing agent. You act by calling exactly one tool per turn \
         against elements tagged with a reference like [ref=e3] in the page outline \
         you are shown. Call `done` with your final answer once the task is complete.\n\n\
         Task: {task}"
    )
}

/// `ToolCall::arguments` carries every field except the dispatch tag; merge
/// the tool's name back in as `action` so `AgentAction`'s tagged enum can
/// deserialize the whole thing in one shot.
fn merged_call_value(call: &ToolCall) -> serde_json::Value {
    let mut value = call.arguments.clone();
    if let serde_json::Value::Object(map) = &mut value {
        map.insert("action".to_string(), serde_json::Value::String(call.name.clone()));
    }
    value
}

async fn execute_action(
    session: &BrowserSession,
    handles: &mut HandleMap,
    _roles: &RoleTable,
    action: &AgentAction,
    cfg: &BrowseConfig,
) -> Result<String, AgentError> {
    match action {
        AgentAction::Navigate { url } => {
            session.navigate(url).await?;
            Ok(format!("Navigated to {url}"))
        }
        AgentAction::Click { ref_id } => {
            let point = resolver::click(session.page(), handles, ref_id).await?;
            Ok(format!("Clicked at ({:.0}, {:.0})", point.x, point.y))
        }
        AgentAction::Fill { ref_id, text } => {
            let point = resolver::fill(session.page(), handles, ref_id, text).await?;
            Ok(format!("Filled '{text}' at ({:.0}, {:.0})", point.x, point.y))
        }
        AgentAction::Hover { ref_id } => {
            let point = resolver::hover(session.page(), handles, ref_id).await?;
            Ok(format!("Hovered at ({:.0}, {:.0})", point.x, point.y))
        }
        AgentAction::SelectOption { ref_id, value } => {
            resolver::select_option(session.page(), handles, ref_id, value).await?;
            Ok(format!("Selected '{value}'"))
        }
        AgentAction::PressKey { key } => {
            dispatch_key(session, *key).await?;
            Ok(format!("Pressed {key:?}"))
        }
        AgentAction::Scroll { direction } => {
            session.scroll(direction.as_str(), 3).await?;
            Ok(format!("Scrolled {}", direction.as_str()))
        }
        AgentAction::Screenshot => {
            let _ = session.screenshot().await?;
            Ok("Captured screenshot".to_string())
        }
        AgentAction::ExtractText { selector } => {
            let text = session.extract_text(selector.as_deref()).await?;
            Ok(truncate_chars(&text, 2000))
        }
        AgentAction::Done { .. } => unreachable!("done is handled by the caller before dispatch"),
    }
}

async fn dispatch_key(session: &BrowserSession, key: crate::agent::tools::PressKey) -> Result<(), AgentError> {
    use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};

    let (key_str, code, vk) = key.cdp_params();
    for event_type in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
        session
            .page()
            .execute(
                DispatchKeyEventParams::builder()
                    .r#type(event_type)
                    .key(key_str)
                    .code(code)
                    .windows_virtual_key_code(vk)
                    .build()
                    .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
            )
            .await
            .map_err(AgentError::from)?;
    }
    let _ = session; // keep signature symmetric with other dispatch helpers
    Ok(())
}

fn action_name(action: &AgentAction) -> String {
    match action {
        AgentAction::Navigate { .. } => "navigate",
        AgentAction::Click { .. } => "click",
        AgentAction::Fill { .. } => "fill",
        AgentAction::Hover { .. } => "hover",
        AgentAction::SelectOption { .. } => "select_option",
        AgentAction::PressKey { .. } => "press_key",
        AgentAction::Scroll { .. } => "scroll",
        AgentAction::Screenshot => "screenshot",
        AgentAction::ExtractText { .. } => "extract_text",
        AgentAction::Done { .. } => "done",
    }
    .to_string()
}

fn action_ref(action: &AgentAction) -> Option<String> {
    match action {
        AgentAction::Click { ref_id }
        | AgentAction::Fill { ref_id, .. }
        | AgentAction::Hover { ref_id }
        | AgentAction::SelectOption { ref_id, .. } => Some(ref_id.clone()),
        _ => None,
    }
}

fn action_text(action: &AgentAction) -> Option<String> {
    match action {
        AgentAction::Fill { text, .. } => Some(text.clone()),
        AgentAction::Navigate { url } => Some(url.clone()),
        _ => None,
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Build the post-action observation (spec §4.5 step 3's three branches).
fn construct_observation(action_result: &str, cur_outline: &str, cur_url: &str, report: &DiffReport) -> String {
    if report.is_empty {
        format!("Action: {action_result}\nNo visible changes on the page.")
    } else if report.is_large_diff {
        format!("Action: {action_result}\nURL: {cur_url}\n\nNew page snapshot:\n{cur_outline}")
    } else {
        format!("Action: {action_result}\n\nChanges:\n{}", report.text)
    }
}
