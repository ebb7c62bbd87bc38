//! Program state
//!
//! This module holds everything a running script can change:
//! - [`value`]: tagged [`value::Value`] variants stored in variables
//! - [`output`]: the append-only [`output::OutputLog`]
//! - [`ProgramState`]: variables, tasks, loop state, and mock-service records
//!
//! # Ownership
//!
//! One `ProgramState` belongs to one interpreter. The executor borrows it
//! mutably for the duration of a command, so no locking is involved and two
//! interpreters never observe each other's state.

pub mod output;
pub mod value;

use crate::parser::ast::Comparator;
use crate::services::{ApiResponse, LlmRequest, LlmResponse, McpConnection};
use indexmap::IndexMap;
use output::OutputLog;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use value::Value;

/// Status written by `mark task ... as complete`
pub const COMPLETE_STATUS: &str = "complete";

/// A named task with a free-form status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub status: String,
}

impl Task {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            status: status.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == COMPLETE_STATUS
    }
}

/// What a loop header asked for
#[derive(Debug, Clone, PartialEq)]
pub enum LoopKind {
    Repeat {
        times: usize,
    },
    While {
        variable: String,
        comparator: Comparator,
        threshold: f64,
    },
}

impl LoopKind {
    pub fn name(&self) -> &'static str {
        match self {
            LoopKind::Repeat { .. } => "repeat",
            LoopKind::While { .. } => "while",
        }
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A loop whose header has run and whose body is still being collected
#[derive(Debug, Clone, PartialEq)]
pub struct OpenLoop {
    pub kind: LoopKind,
    /// Raw body lines, replayed verbatim when the loop closes
    pub body: Vec<String>,
}

impl OpenLoop {
    pub fn new(kind: LoopKind) -> Self {
        OpenLoop {
            kind,
            body: Vec::new(),
        }
    }
}

/// At most one loop exists at a time.
///
/// `Collecting` is the only state in which the run driver buffers lines.
/// `Replaying` covers the window where a closed loop's body is executing, so
/// headers and terminators reached from inside the body are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoopState {
    #[default]
    Closed,
    Collecting(OpenLoop),
    Replaying(LoopKind),
}

impl LoopState {
    pub fn is_collecting(&self) -> bool {
        matches!(self, LoopState::Collecting(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, LoopState::Closed)
    }

    /// Kind of the loop currently open or replaying
    pub fn active_kind(&self) -> Option<&LoopKind> {
        match self {
            LoopState::Closed => None,
            LoopState::Collecting(open) => Some(&open.kind),
            LoopState::Replaying(kind) => Some(kind),
        }
    }

    /// Append a raw line to the open body. Returns false if nothing is collecting.
    pub fn buffer(&mut self, line: &str) -> bool {
        match self {
            LoopState::Collecting(open) => {
                open.body.push(line.to_string());
                true
            }
            _ => false,
        }
    }
}

/// Mutable record of one interpreter session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramState {
    /// Insertion-ordered so state projections are deterministic
    pub variables: IndexMap<String, Value>,
    pub tasks: Vec<Task>,
    pub loop_state: LoopState,
    pub api_endpoint: Option<String>,
    pub api_response: Option<ApiResponse>,
    pub mcp_servers: FxHashMap<String, McpConnection>,
    pub pending_llm_request: Option<LlmRequest>,
    pub llm_response: Option<LlmResponse>,
    pub output: OutputLog,
}

impl ProgramState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Bind or rebind a variable
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// First task with an exactly matching name
    pub fn find_task_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.name == name)
    }

    pub fn tasks_with_status<'a>(&'a self, status: &'a str) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |task| task.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_keep_insertion_order() {
        let mut state = ProgramState::new();
        state.set_variable("zeta", 1.0);
        state.set_variable("alpha", "a");
        state.set_variable("zeta", 2.0);

        let names: Vec<&str> = state.variables.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(state.get_variable("zeta"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_find_task_matches_first_duplicate() {
        let mut state = ProgramState::new();
        state.tasks.push(Task::new("Dup", "pending"));
        state.tasks.push(Task::new("Dup", "pending"));

        state.find_task_mut("Dup").unwrap().status = COMPLETE_STATUS.to_string();
        assert!(state.tasks[0].is_complete());
        assert!(!state.tasks[1].is_complete());
    }

    #[test]
    fn test_loop_state_buffers_only_while_collecting() {
        let mut loop_state = LoopState::Closed;
        assert!(!loop_state.buffer("add 1 to x"));

        loop_state = LoopState::Collecting(OpenLoop::new(LoopKind::Repeat { times: 2 }));
        assert!(loop_state.buffer("add 1 to x"));
        match &loop_state {
            LoopState::Collecting(open) => assert_eq!(open.body, vec!["add 1 to x"]),
            other => panic!("Expected collecting loop, got {:?}", other),
        }

        loop_state = LoopState::Replaying(LoopKind::Repeat { times: 2 });
        assert!(!loop_state.buffer("add 1 to x"));
        assert_eq!(loop_state.active_kind().map(LoopKind::name), Some("repeat"));
    }

    #[test]
    fn test_default_state_is_empty() {
        let state = ProgramState::default();
        assert!(state.variables.is_empty());
        assert!(state.tasks.is_empty());
        assert!(state.loop_state.is_closed());
        assert!(state.mcp_servers.is_empty());
        assert!(state.output.is_empty());
    }
}
