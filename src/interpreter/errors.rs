//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents everything that can
//! go wrong while executing a classified line. Classification itself never
//! fails; an unmatched line only becomes [`RuntimeError::UnrecognizedCommand`]
//! when it runs.
//!
//! All runtime errors are fatal to the current run: the remaining lines are
//! skipped and the error is handed back to the caller. Nothing is retried.

use crate::services::ServiceError;
use thiserror::Error;

/// Which connect/send step a mock-service command was missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingConnection {
    /// `send a search` before `connect to the API`
    ApiEndpoint,
    /// `get the response` before any search
    ApiResponse,
    /// `show the response` before any search
    ApiResponseToShow,
    /// `wait for model response` before `send message to model`
    PendingLlmRequest,
    /// `get the response as` before a model reply arrived
    LlmResponse,
    /// `disconnect from MCP server` for a URL that is not connected
    McpServer(String),
}

impl std::fmt::Display for MissingConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingConnection::ApiEndpoint => {
                f.write_str("Connect to an API first before sending searches!")
            }
            MissingConnection::ApiResponse => {
                f.write_str("No API response available. Send a search first!")
            }
            MissingConnection::ApiResponseToShow => {
                f.write_str("No API response to show. Send a search first!")
            }
            MissingConnection::PendingLlmRequest => {
                f.write_str("No pending LLM request. Send a message first!")
            }
            MissingConnection::LlmResponse => f.write_str(
                "No LLM response available. Send a message and wait for response first!",
            ),
            MissingConnection::McpServer(url) => {
                write!(f, "No active connection to MCP server at {}", url)
            }
        }
    }
}

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A variable was read before any command created it
    #[error("Variable {name} doesn't exist yet. Create it first!")]
    UndefinedVariable { name: String },

    /// `divide X by 0`
    #[error("Cannot divide by zero! That would break the universe.")]
    DivisionByZero,

    /// `mark task "..."` named no existing task
    #[error("Task \"{name}\" not found. Check the name and try again.")]
    TaskNotFound { name: String },

    /// A `while` guard still held after the iteration cap
    #[error("While loop ran too many times! Check your condition. (limit: {limit} iterations)")]
    LoopOverrun { limit: usize },

    /// `end` / `done` with nothing collecting
    #[error("Not in a loop! Use 'repeat' or 'while' first.")]
    NoActiveLoop,

    /// A loop header while another loop is open or replaying
    #[error("Already inside a {open} loop. Finish it with 'end' before starting another loop.")]
    LoopAlreadyOpen { open: &'static str },

    /// A mock-service step ran before the step it depends on
    #[error("{0}")]
    NoMockConnection(MissingConnection),

    /// The line fit no template
    #[error("I don't understand \"{line}\". Could you rephrase that?")]
    UnrecognizedCommand { line: String },

    /// A non-mock service implementation reported a failure
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Payload-free tag for matching on error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UndefinedVariable,
    DivisionByZero,
    TaskNotFound,
    LoopOverrun,
    NoActiveLoop,
    LoopAlreadyOpen,
    NoMockConnection,
    UnrecognizedCommand,
    Service,
}

impl RuntimeError {
    pub fn undefined_variable(name: &str) -> Self {
        RuntimeError::UndefinedVariable {
            name: name.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            RuntimeError::DivisionByZero => ErrorKind::DivisionByZero,
            RuntimeError::TaskNotFound { .. } => ErrorKind::TaskNotFound,
            RuntimeError::LoopOverrun { .. } => ErrorKind::LoopOverrun,
            RuntimeError::NoActiveLoop => ErrorKind::NoActiveLoop,
            RuntimeError::LoopAlreadyOpen { .. } => ErrorKind::LoopAlreadyOpen,
            RuntimeError::NoMockConnection(_) => ErrorKind::NoMockConnection,
            RuntimeError::UnrecognizedCommand { .. } => ErrorKind::UnrecognizedCommand,
            RuntimeError::Service(_) => ErrorKind::Service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(
            RuntimeError::undefined_variable("x").to_string(),
            "Variable x doesn't exist yet. Create it first!"
        );
        assert_eq!(
            RuntimeError::TaskNotFound {
                name: "Nope".to_string()
            }
            .to_string(),
            "Task \"Nope\" not found. Check the name and try again."
        );
        assert_eq!(
            RuntimeError::UnrecognizedCommand {
                line: "blah blah nonsense".to_string()
            }
            .to_string(),
            "I don't understand \"blah blah nonsense\". Could you rephrase that?"
        );
        assert_eq!(
            RuntimeError::NoMockConnection(MissingConnection::McpServer("ws://a".to_string()))
                .to_string(),
            "No active connection to MCP server at ws://a"
        );
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(RuntimeError::DivisionByZero.kind(), ErrorKind::DivisionByZero);
        assert_eq!(
            RuntimeError::LoopOverrun { limit: 1000 }.kind(),
            ErrorKind::LoopOverrun
        );
        let service: RuntimeError = ServiceError::new("search", "timeout").into();
        assert_eq!(service.kind(), ErrorKind::Service);
        assert_eq!(service.to_string(), "search service failed: timeout");
    }
}
