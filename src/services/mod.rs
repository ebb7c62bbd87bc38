//! External-service port
//!
//! Scripts can talk to three kinds of outside systems: a search API, MCP
//! servers, and a language model. The executor never performs that I/O
//! itself. It calls through [`ExternalServices`], and the records those calls
//! return are stored in program state.
//!
//! [`MockServices`] is the default implementation. It answers every call with
//! deterministic canned data, which is all the language currently promises.

mod mock;

pub use mock::MockServices;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure reported by a service implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{service} service failed: {message}")]
pub struct ServiceError {
    pub service: &'static str,
    pub message: String,
}

impl ServiceError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        ServiceError {
            service,
            message: message.into(),
        }
    }
}

/// One entry of a search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u32,
    pub title: String,
    pub description: String,
}

/// Payload stored by `send a search for ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// A live MCP server connection, keyed by URL in program state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpConnection {
    pub url: String,
    pub protocol: String,
    pub connected: bool,
    pub connected_at: DateTime<Utc>,
}

/// A model call waiting for `wait for model response`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub user_message: String,
    pub timestamp: DateTime<Utc>,
}

/// A completed model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    pub model: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub request: LlmRequest,
}

/// Capabilities the executor needs from the outside world.
///
/// Calls happen synchronously, one command at a time, in program order.
pub trait ExternalServices: Send {
    /// Run a search against `endpoint`
    fn search(&mut self, endpoint: &str, query: &str, key: &str)
        -> Result<ApiResponse, ServiceError>;

    /// Open a connection to an MCP server
    fn connect_mcp(&mut self, url: &str, protocol: &str) -> Result<McpConnection, ServiceError>;

    /// Close a connection previously returned by [`connect_mcp`](Self::connect_mcp)
    fn disconnect_mcp(&mut self, url: &str) -> Result<(), ServiceError>;

    /// Produce the model's reply text for a request
    fn complete(&mut self, request: &LlmRequest) -> Result<String, ServiceError>;

    /// Timestamp source for connection and request records
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
