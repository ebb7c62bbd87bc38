// Disconnected copies of interpreter state

use crate::parser::ast::Comparator;
use crate::services::{ApiResponse, LlmRequest, LlmResponse, McpConnection};
use crate::state::output::OutputLog;
use crate::state::value::Value;
use crate::state::{LoopKind, LoopState, OpenLoop, ProgramState, Task};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Guard of a `while` loop as it appears in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileCondition {
    pub variable: String,
    pub comparator: Comparator,
    pub threshold: f64,
}

/// Flattened view of [`LoopState`].
///
/// A loop that is replaying at capture time is reported as not in a loop;
/// replay only exists inside a single command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopSnapshot {
    pub in_loop: bool,
    pub loop_type: Option<String>,
    pub buffered_lines: Vec<String>,
    pub repeat_count: Option<usize>,
    pub while_condition: Option<WhileCondition>,
}

impl LoopSnapshot {
    fn capture(loop_state: &LoopState) -> Self {
        let open = match loop_state {
            LoopState::Collecting(open) => open,
            LoopState::Closed | LoopState::Replaying(_) => return LoopSnapshot::default(),
        };

        let (repeat_count, while_condition) = match &open.kind {
            LoopKind::Repeat { times } => (Some(*times), None),
            LoopKind::While {
                variable,
                comparator,
                threshold,
            } => (
                None,
                Some(WhileCondition {
                    variable: variable.clone(),
                    comparator: *comparator,
                    threshold: *threshold,
                }),
            ),
        };

        LoopSnapshot {
            in_loop: true,
            loop_type: Some(open.kind.name().to_string()),
            buffered_lines: open.body.clone(),
            repeat_count,
            while_condition,
        }
    }

    /// Rebuild loop state. Anything that does not describe a complete open
    /// loop comes back closed.
    fn restore(self) -> LoopState {
        if !self.in_loop {
            return LoopState::Closed;
        }

        let kind = match (self.repeat_count, self.while_condition) {
            (Some(times), _) if self.loop_type.as_deref() != Some("while") => {
                LoopKind::Repeat { times }
            }
            (_, Some(guard)) => LoopKind::While {
                variable: guard.variable,
                comparator: guard.comparator,
                threshold: guard.threshold,
            },
            _ => return LoopState::Closed,
        };

        LoopState::Collecting(OpenLoop {
            kind,
            body: self.buffered_lines,
        })
    }
}

/// Snapshot of interpreter state.
///
/// Owns its data outright: mutating the interpreter after capture never
/// changes a snapshot, and mutating a snapshot never reaches the interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub variables: IndexMap<String, Value>,
    pub tasks: Vec<Task>,
    pub loop_state: LoopSnapshot,
    pub api_endpoint: Option<String>,
    pub api_response: Option<ApiResponse>,
    /// Sorted by URL so serialized snapshots are stable
    pub mcp_servers: BTreeMap<String, McpConnection>,
    pub pending_llm_request: Option<LlmRequest>,
    pub llm_response: Option<LlmResponse>,
    pub output: OutputLog,
}

impl Snapshot {
    pub fn capture(state: &ProgramState) -> Self {
        Snapshot {
            variables: state.variables.clone(),
            tasks: state.tasks.clone(),
            loop_state: LoopSnapshot::capture(&state.loop_state),
            api_endpoint: state.api_endpoint.clone(),
            api_response: state.api_response.clone(),
            mcp_servers: state
                .mcp_servers
                .iter()
                .map(|(url, connection)| (url.clone(), connection.clone()))
                .collect(),
            pending_llm_request: state.pending_llm_request.clone(),
            llm_response: state.llm_response.clone(),
            output: state.output.clone(),
        }
    }

    pub fn into_state(self) -> ProgramState {
        ProgramState {
            variables: self.variables,
            tasks: self.tasks,
            loop_state: self.loop_state.restore(),
            api_endpoint: self.api_endpoint,
            api_response: self.api_response,
            mcp_servers: self.mcp_servers.into_iter().collect(),
            pending_llm_request: self.pending_llm_request,
            llm_response: self.llm_response,
            output: self.output,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}
