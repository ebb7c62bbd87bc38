//! Search API, MCP and model commands
//!
//! These commands are small state machines over the mock-service records in
//! [`ProgramState`](crate::state::ProgramState). Each step that depends on an
//! earlier one (search after connect, wait after send, ...) fails with
//! [`RuntimeError::NoMockConnection`] when that earlier step has not run.
//! All outside calls go through the executor's
//! [`ExternalServices`](crate::services::ExternalServices) port.

use crate::interpreter::engine::Executor;
use crate::interpreter::errors::{MissingConnection, RuntimeError};
use crate::parser::ast::MessageSource;
use crate::services::{LlmRequest, LlmResponse};
use tracing::{debug, warn};

/// First `limit` characters of `text`, with `...` when something was cut
fn preview(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

impl Executor<'_> {
    pub(crate) fn execute_connect_api(&mut self, endpoint: &str) {
        self.state.api_endpoint = Some(endpoint.to_string());
        self.emit(format!("Connected to API at {}", endpoint));
    }

    pub(crate) fn execute_send_search(&mut self, query: &str, key: &str) -> Result<(), RuntimeError> {
        let endpoint = self
            .state
            .api_endpoint
            .clone()
            .ok_or(RuntimeError::NoMockConnection(MissingConnection::ApiEndpoint))?;

        let response = self.services.search(&endpoint, query, key)?;
        debug!(endpoint = %endpoint, results = response.results.len(), "search completed");
        self.state.api_response = Some(response);
        self.emit(format!("Sent search for \"{}\" using key \"{}\"", query, key));
        Ok(())
    }

    pub(crate) fn execute_get_response(&mut self) -> Result<(), RuntimeError> {
        if self.state.api_response.is_none() {
            return Err(RuntimeError::NoMockConnection(MissingConnection::ApiResponse));
        }
        self.emit("Got the API response successfully");
        Ok(())
    }

    /// Emits a header line and then the response as one pretty JSON entry
    pub(crate) fn execute_show_response(&mut self) -> Result<(), RuntimeError> {
        let rendered = match &self.state.api_response {
            Some(response) => serde_json::to_string_pretty(response),
            None => {
                return Err(RuntimeError::NoMockConnection(
                    MissingConnection::ApiResponseToShow,
                ))
            }
        };

        self.emit("API Response:");
        match rendered {
            Ok(json) => self.emit(json),
            Err(err) => warn!(error = %err, "could not render API response"),
        }
        Ok(())
    }

    pub(crate) fn execute_connect_mcp(&mut self, url: &str, protocol: &str) -> Result<(), RuntimeError> {
        let connection = self.services.connect_mcp(url, protocol)?;
        self.state.mcp_servers.insert(url.to_string(), connection);
        self.emit(format!(
            "Connected to MCP server at {} using {} protocol",
            url, protocol
        ));
        Ok(())
    }

    pub(crate) fn execute_disconnect_mcp(&mut self, url: &str) -> Result<(), RuntimeError> {
        if !self.state.mcp_servers.contains_key(url) {
            return Err(RuntimeError::NoMockConnection(
                MissingConnection::McpServer(url.to_string()),
            ));
        }

        self.services.disconnect_mcp(url)?;
        self.state.mcp_servers.remove(url);
        self.emit(format!("Disconnected from MCP server at {}", url));
        Ok(())
    }

    /// Stores a pending request. The user message is resolved before the
    /// system prompt, so a missing user variable is reported first.
    pub(crate) fn execute_send_message(
        &mut self,
        model: &str,
        system_prompt: Option<&str>,
        user_message: &MessageSource,
    ) -> Result<(), RuntimeError> {
        let user_message = match user_message {
            MessageSource::Variable(name) => self.lookup(name)?.to_string(),
            MessageSource::Literal(text) => text.clone(),
        };
        let system_prompt = match system_prompt {
            Some(name) => Some(self.lookup(name)?.to_string()),
            None => None,
        };

        let limit = self.config.preview_chars;
        let system_line = system_prompt
            .as_deref()
            .filter(|prompt| !prompt.is_empty())
            .map(|prompt| format!("System: {}", preview(prompt, limit)));
        let user_line = format!("User: {}", preview(&user_message, limit));

        self.state.pending_llm_request = Some(LlmRequest {
            model: model.to_string(),
            system_prompt,
            user_message,
            timestamp: self.services.now(),
        });

        self.emit(format!("Sending message to {}...", model));
        if let Some(line) = system_line {
            self.emit(line);
        }
        self.emit(user_line);
        Ok(())
    }

    pub(crate) fn execute_wait_for_response(&mut self) -> Result<(), RuntimeError> {
        let request = self
            .state
            .pending_llm_request
            .clone()
            .ok_or(RuntimeError::NoMockConnection(
                MissingConnection::PendingLlmRequest,
            ))?;

        let response = self.services.complete(&request)?;
        debug!(model = %request.model, chars = response.len(), "model replied");

        self.state.llm_response = Some(LlmResponse {
            model: request.model.clone(),
            response,
            timestamp: self.services.now(),
            request,
        });
        self.emit("Received response from LLM");
        Ok(())
    }

    pub(crate) fn execute_get_response_as(&mut self, variable: &str) -> Result<(), RuntimeError> {
        let reply = self
            .state
            .llm_response
            .as_ref()
            .map(|response| response.response.clone())
            .ok_or(RuntimeError::NoMockConnection(MissingConnection::LlmResponse))?;

        self.state.set_variable(variable, reply);
        self.emit(format!("Stored LLM response in variable \"{}\"", variable));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_text() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("exactly10!", 10), "exactly10!");
        assert_eq!(preview("abcdefghijk", 10), "abcdefghij...");
        assert_eq!(preview("ééééé", 2), "éé...");
    }
}
