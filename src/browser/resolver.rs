//! Action Resolver (spec §4.4): translates reference-tagged actions into
//! CDP operations against the `HandleMap` produced by the last outline.
//!
//! Generalizes the teacher's `BrowserSession::click_element`/`type_text`
//! (same `ScrollIntoViewIfNeeded` -> `GetBoxModel` -> center-of-quad ->
//! `Input.dispatchMouseEvent` sequence), but resolves against the outline's
//! `HandleMap` rather than the teacher's tool-scoped `ElementRefMap`, adds
//! `select_option` (absent from the teacher), and dispatches `Fill` text
//! character-by-character via `Input.dispatchKeyEvent` instead of the
//! teacher's `Input.insertText` (spec §4.4 is explicit about this).

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::dom::{
    BackendNodeId, GetBoxModelParams, ResolveNodeParams, ScrollIntoViewIfNeededParams,
};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::js_protocol::runtime::{CallArgument, CallFunctionOnParams};

use crate::error::AgentError;
use crate::outline::HandleMap;

/// Effective coordinates an action was dispatched at, for the `action`
/// event and the `Action: Clicked at (x, y)` observation text (spec §6, S2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Resolve `reference` against `handles`, failing `UnknownRef` with up to
/// ten currently-known references (spec §4.4 step 1, §7).
fn resolve_handle(handles: &HandleMap, reference: &str) -> Result<BackendNodeId, AgentError> {
    handles
        .get(reference)
        .map(BackendNodeId::new)
        .ok_or_else(|| AgentError::unknown_ref(reference, handles.known_refs()))
}

/// Scroll the element into view, read its box model, and compute the
/// geometric center of its content quad (spec §4.4 steps 2-4). Falls back
/// to a script-based bounding-rect query when the box model is
/// unavailable (spec §4.4 step 6).
async fn locate(page: &Page, backend_node_id: BackendNodeId) -> Result<Point, AgentError> {
    page.execute(ScrollIntoViewIfNeededParams::builder().backend_node_id(backend_node_id).build())
        .await
        .map_err(AgentError::from)?;

    let box_model = page
        .execute(GetBoxModelParams::builder().backend_node_id(backend_node_id).build())
        .await;

    match box_model {
        Ok(result) => {
            let content = result.result.model.content.inner();
            if content.len() >= 8 {
                return Ok(Point {
                    x: (content[0] + content[2] + content[4] + content[6]) / 4.0,
                    y: (content[1] + content[3] + content[5] + content[7]) / 4.0,
                });
            }
            locate_via_bounding_rect(page, backend_node_id).await
        }
        Err(_) => locate_via_bounding_rect(page, backend_node_id).await,
    }
}

/// Script-based fallback: resolve the backend node to a remote object, then
/// read `getBoundingClientRect()` and compute the center (spec §4.4 step 6).
async fn locate_via_bounding_rect(page: &Page, backend_node_id: BackendNodeId) -> Result<Point, AgentError> {
    let resolved = page
        .execute(ResolveNodeParams::builder().backend_node_id(backend_node_id).build())
        .await
        .map_err(AgentError::from)?;

    let object_id = resolved
        .result
        .object
        .object_id
        .clone()
        .ok_or_else(|| AgentError::EvaluationError("resolved node has no remote object id".to_string()))?;

    let function = "function() { const r = this.getBoundingClientRect(); return { x: r.x + r.width / 2, y: r.y + r.height / 2 }; }";
    let call_result = page
        .execute(
            CallFunctionOnParams::builder()
                .function_declaration(function)
                .object_id(object_id)
                .build()
                .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
        )
        .await
        .map_err(AgentError::from)?;

    let value = call_result
        .result
        .result
        .value
        .clone()
        .ok_or_else(|| AgentError::EvaluationError("bounding-rect fallback returned no value".to_string()))?;

    let x = value.get("x").and_then(|v| v.as_f64()).ok_or_else(|| {
        AgentError::EvaluationError("bounding-rect fallback returned no x coordinate".to_string())
    })?;
    let y = value.get("y").and_then(|v| v.as_f64()).ok_or_else(|| {
        AgentError::EvaluationError("bounding-rect fallback returned no y coordinate".to_string())
    })?;

    Ok(Point { x, y })
}

async fn dispatch_click(page: &Page, point: Point) -> Result<(), AgentError> {
    page.execute(
        DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MousePressed)
            .x(point.x)
            .y(point.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
    )
    .await
    .map_err(AgentError::from)?;

    page.execute(
        DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseReleased)
            .x(point.x)
            .y(point.y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
    )
    .await
    .map_err(AgentError::from)?;

    // §5: 500ms settle delay after click.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    Ok(())
}

/// `click` (spec §4.4, §8 S2): resolves `reference`, dispatches
/// mousePressed+mouseReleased at the box-model center, returns the point
/// dispatched at.
pub async fn click(page: &Page, handles: &HandleMap, reference: &str) -> Result<Point, AgentError> {
    let backend_node_id = resolve_handle(handles, reference)?;
    let point = locate(page, backend_node_id).await?;
    dispatch_click(page, point).await?;
    Ok(point)
}

/// `hover` (spec §4.4): same resolution sequence as `click` but dispatches
/// `mouseMoved` instead of a press/release pair.
pub async fn hover(page: &Page, handles: &HandleMap, reference: &str) -> Result<Point, AgentError> {
    let backend_node_id = resolve_handle(handles, reference)?;
    let point = locate(page, backend_node_id).await?;

    page.execute(
        DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(point.x)
            .y(point.y)
            .build()
            .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
    )
    .await
    .map_err(AgentError::from)?;

    Ok(point)
}

/// `fill` (spec §4.4): focuses the element via a click, clears its value by
/// direct assignment plus a synthetic `input` event, then dispatches `text`
/// character-by-character via `Input.dispatchKeyEvent` (a deliberate
/// deviation from the teacher's `Input.insertText`, recorded in DESIGN.md).
pub async fn fill(page: &Page, handles: &HandleMap, reference: &str, text: &str) -> Result<Point, AgentError> {
    let backend_node_id = resolve_handle(handles, reference)?;
    let point = locate(page, backend_node_id).await?;
    dispatch_click(page, point).await?;

    // §5: 100ms settle delay after focus.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let resolved = page
        .execute(ResolveNodeParams::builder().backend_node_id(backend_node_id).build())
        .await
        .map_err(AgentError::from)?;
    let object_id = resolved
        .result
        .object
        .object_id
        .clone()
        .ok_or_else(|| AgentError::EvaluationError("resolved node has no remote object id".to_string()))?;

    let clear_fn = "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }";
    page.execute(
        CallFunctionOnParams::builder()
            .function_declaration(clear_fn)
            .object_id(object_id)
            .build()
            .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
    )
    .await
    .map_err(AgentError::from)?;

    for ch in text.chars() {
        let ch_str = ch.to_string();
        page.execute(
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyDown)
                .text(ch_str.clone())
                .build()
                .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
        )
        .await
        .map_err(AgentError::from)?;

        page.execute(
            DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyUp)
                .text(ch_str)
                .build()
                .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
        )
        .await
        .map_err(AgentError::from)?;
    }

    Ok(point)
}

/// `select_option` (spec §4.4): invokes a function on the element that
/// searches `options` by exact `value` or trimmed `textContent`; on miss
/// fails `OptionNotFound` naming up to ten available labels.
pub async fn select_option(page: &Page, handles: &HandleMap, reference: &str, value: &str) -> Result<Point, AgentError> {
    let backend_node_id = resolve_handle(handles, reference)?;
    let point = locate(page, backend_node_id).await?;

    let resolved = page
        .execute(ResolveNodeParams::builder().backend_node_id(backend_node_id).build())
        .await
        .map_err(AgentError::from)?;
    let object_id = resolved
        .result
        .object
        .object_id
        .clone()
        .ok_or_else(|| AgentError::EvaluationError("resolved node has no remote object id".to_string()))?;

    let function = r#"function(wanted) {
        const options = Array.from(this.options || []);
        const match = options.find(o => o.value === wanted || o.textContent.trim() === wanted);
        if (!match) {
            return { ok: false, labels: options.map(o => o.textContent.trim()) };
        }
        this.value = match.value;
        this.dispatchEvent(new Event('change', { bubbles: true }));
        return { ok: true, labels: [] };
    }"#;

    let call_result = page
        .execute(
            CallFunctionOnParams::builder()
                .function_declaration(function)
                .object_id(object_id)
                .argument(CallArgument::builder().value(serde_json::json!(value)).build())
                .build()
                .map_err(|e| AgentError::EvaluationError(e.to_string()))?,
        )
        .await
        .map_err(AgentError::from)?;

    let result_value = call_result
        .result
        .result
        .value
        .clone()
        .ok_or_else(|| AgentError::EvaluationError("select_option returned no value".to_string()))?;

    let ok = result_value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false);
    if !ok {
        let labels = result_value
            .get("labels")
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect::<Vec<_>>())
            .unwrap_or_default();
        return Err(AgentError::option_not_found(value, labels));
    }

    Ok(point)
}
