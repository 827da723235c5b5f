//! Agent Loop, Model interface, and tool schema (spec §4.5, §6).

pub mod model;
pub mod rig_model;
pub mod runner;
pub mod tools;

pub use model::{Message, Model, ModelResponse, ToolCall, Usage};
pub use rig_model::RigModel;
pub use runner::{run, AgentRunOutput, RunUsage, StepEntry, StepObserver};
pub use tools::{AgentAction, PressKey, ScrollDirection};
