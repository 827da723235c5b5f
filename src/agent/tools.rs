//! The fixed tool schema (spec §6, §4.5): a tagged enum deserialized from
//! the model's tool-call arguments, plus the JSON Schema advertised to the
//! model. Generalizes the teacher's `BrowserAction` enum
//! (`tools/builtin/browser/mod.rs`) from a single browser tool's action
//! space to this crate's full §6 tool set.

use serde::Deserialize;

/// One parsed tool call. Field names match spec §4.4/§4.5 parameter shapes;
/// `ref_id` accepts the wire name `ref` via `serde(alias)`, mirroring the
/// teacher's `#[serde(alias = "ref")]` on `BrowserAction::Click`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentAction {
    Navigate {
        url: String,
    },
    Click {
        #[serde(alias = "ref")]
        ref_id: String,
    },
    Fill {
        #[serde(alias = "ref")]
        ref_id: String,
        text: String,
    },
    Hover {
        #[serde(alias = "ref")]
        ref_id: String,
    },
    SelectOption {
        #[serde(alias = "ref")]
        ref_id: String,
        value: String,
    },
    PressKey {
        key: PressKey,
    },
    Scroll {
        direction: ScrollDirection,
    },
    Screenshot,
    ExtractText {
        selector: Option<String>,
    },
    Done {
        result: String,
    },
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum PressKey {
    Enter,
    Tab,
    Escape,
    Backspace,
}

impl PressKey {
    /// The `key`/`code`/`windowsVirtualKeyCode` triple `Input.dispatchKeyEvent`
    /// needs for each enum member (spec §6).
    pub fn cdp_params(self) -> (&'static str, &'static str, i64) {
        match self {
            PressKey::Enter => ("Enter", "Enter", 13),
            PressKey::Tab => ("Tab", "Tab", 9),
            PressKey::Escape => ("Escape", "Escape", 27),
            PressKey::Backspace => ("Backspace", "Backspace", 8),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Down,
    Up,
}

impl ScrollDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDirection::Down => "down",
            ScrollDirection::Up => "up",
        }
    }
}

/// The JSON Schema advertised to the model (spec §6): `navigate`, `click`,
/// `fill`, `hover`, `select_option`, `press_key`, `scroll`, `screenshot`,
/// `extract_text`, `done`.
pub fn tool_schema() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "navigate",
            "description": "Navigate the browser to a URL.",
            "parameters": {
                "type": "object",
                "properties": { "url": { "type": "string" } },
                "required": ["url"]
            }
        },
        {
            "name": "click",
            "description": "Click the element tagged with the given reference.",
            "parameters": {
                "type": "object",
                "properties": { "ref": { "type": "string" } },
                "required": ["ref"]
            }
        },
        {
            "name": "fill",
            "description": "Clear and type text into the element tagged with the given reference.",
            "parameters": {
                "type": "object",
                "properties": {
                    "ref": { "type": "string" },
                    "text": { "type": "string" }
                },
                "required": ["ref", "text"]
            }
        },
        {
            "name": "hover",
            "description": "Move the mouse over the element tagged with the given reference.",
            "parameters": {
                "type": "object",
                "properties": { "ref": { "type": "string" } },
                "required": ["ref"]
            }
        },
        {
            "name": "select_option",
            "description": "Select an option (by value or visible label) on the <select> tagged with the given reference.",
            "parameters": {
                "type": "object",
                "properties": {
                    "ref": { "type": "string" },
                    "value": { "type": "string" }
                },
                "required": ["ref", "value"]
            }
        },
        {
            "name": "press_key",
            "description": "Press a single named key.",
            "parameters": {
                "type": "object",
                "properties": {
                    "key": { "type": "string", "enum": ["Enter", "Tab", "Escape", "Backspace"] }
                },
                "required": ["key"]
            }
        },
        {
            "name": "scroll",
            "description": "Scroll the page up or down.",
            "parameters": {
                "type": "object",
                "properties": {
                    "direction": { "type": "string", "enum": ["down", "up"] }
                },
                "required": ["direction"]
            }
        },
        {
            "name": "screenshot",
            "description": "Capture a PNG screenshot of the current page.",
            "parameters": { "type": "object", "properties": {} }
        },
        {
            "name": "extract_text",
            "description": "Read the visible text of the page, or of one CSS selector.",
            "parameters": {
                "type": "object",
                "properties": { "selector": { "type": "string" } }
            }
        },
        {
            "name": "done",
            "description": "End the task and report the result.",
            "parameters": {
                "type": "object",
                "properties": { "result": { "type": "string" } },
                "required": ["result"]
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_deserializes_with_ref_alias() {
        let value = serde_json::json!({ "action": "click", "ref": "e5" });
        let action: AgentAction = serde_json::from_value(value).unwrap();
        assert_eq!(action, AgentAction::Click { ref_id: "e5".to_string() });
    }

    #[test]
    fn fill_deserializes_text_and_ref() {
        let value = serde_json::json!({ "action": "fill", "ref": "e3", "text": "hello" });
        let action: AgentAction = serde_json::from_value(value).unwrap();
        assert_eq!(action, AgentAction::Fill { ref_id: "e3".to_string(), text: "hello".to_string() });
    }

    #[test]
    fn press_key_deserializes_enum() {
        let value = serde_json::json!({ "action": "press_key", "key": "Enter" });
        let action: AgentAction = serde_json::from_value(value).unwrap();
        assert_eq!(action, AgentAction::PressKey { key: PressKey::Enter });
    }

    #[test]
    fn scroll_deserializes_lowercase_enum() {
        let value = serde_json::json!({ "action": "scroll", "direction": "down" });
        let action: AgentAction = serde_json::from_value(value).unwrap();
        assert_eq!(action, AgentAction::Scroll { direction: ScrollDirection::Down });
    }

    #[test]
    fn done_deserializes_result() {
        let value = serde_json::json!({ "action": "done", "result": "More…" });
        let action: AgentAction = serde_json::from_value(value).unwrap();
        assert_eq!(action, AgentAction::Done { result: "More…".to_string() });
    }

    #[test]
    fn screenshot_has_no_fields() {
        let value = serde_json::json!({ "action": "screenshot" });
        let action: AgentAction = serde_json::from_value(value).unwrap();
        assert_eq!(action, AgentAction::Screenshot);
    }

    #[test]
    fn press_key_cdp_params_match_spec_key_names() {
        assert_eq!(PressKey::Enter.cdp_params().0, "Enter");
        assert_eq!(PressKey::Backspace.cdp_params().2, 8);
    }

    #[test]
    fn tool_schema_names_all_ten_tools() {
        let schema = tool_schema();
        let names: Vec<&str> = schema.as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "navigate", "click", "fill", "hover", "select_option", "press_key", "scroll",
                "screenshot", "extract_text", "done"
            ]
        );
    }
}
