// Deterministic stand-ins for the search API, MCP servers and model

use super::{ApiResponse, ExternalServices, LlmRequest, McpConnection, SearchResult, ServiceError};
use chrono::{DateTime, Utc};

const BENEFITS_REPLY: &str = "Natural language programming has a few clear benefits:

1. Accessibility: people who never learned a programming language can read and write it
2. Short learning curve: there are no symbols or punctuation rules to memorize
3. Readability: the program explains itself to anyone reviewing it
4. Shared vocabulary: domain experts and developers discuss the same text

Writing 'repeat 10 times' says exactly what a counted for-loop means.";

const ACCESSIBILITY_REPLY: &str = "An accessibility example.

Conventional code:
    if (age >= 18) { print(\"Access granted\") } else { print(\"Access denied\") }

Sentence form:
    if age is above 17, show \"Access granted\" otherwise show \"Access denied\"

A reviewer or analyst can check the sentence form without knowing any syntax.";

const COMPARISON_REPLY: &str = "Natural language programming compared with conventional syntax:

Conventional: dense symbols, rules to memorize, a steep start for beginners.
Natural: ordinary words, reads like instructions, self-documenting.

Conventional: while (x < 100) { x += 10; }
Natural: while x is below 100 / add 10 to x / end";

/// Canned responses for every external call.
///
/// Search echoes the query with two fixed results. MCP connections always
/// succeed. Model replies are picked by keyword in the user message.
#[derive(Debug, Clone, Default)]
pub struct MockServices {
    fixed_time: Option<DateTime<Utc>>,
}

impl MockServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every record with `time` instead of the wall clock
    pub fn with_fixed_time(time: DateTime<Utc>) -> Self {
        MockServices {
            fixed_time: Some(time),
        }
    }

    /// Reply text for a user message, by case-insensitive keyword
    pub fn canned_reply(model: &str, user_message: &str) -> String {
        let lowered = user_message.to_lowercase();
        if lowered.contains("natural language programming") {
            BENEFITS_REPLY.to_string()
        } else if lowered.contains("accessibility") {
            ACCESSIBILITY_REPLY.to_string()
        } else if lowered.contains("compare") {
            COMPARISON_REPLY.to_string()
        } else {
            format!(
                "I understand you're asking about \"{}\". This is a mock response from the {} model via MCP. \
                 A real integration would forward the request to a live model.",
                user_message, model
            )
        }
    }
}

impl ExternalServices for MockServices {
    fn search(
        &mut self,
        _endpoint: &str,
        query: &str,
        _key: &str,
    ) -> Result<ApiResponse, ServiceError> {
        Ok(ApiResponse {
            query: query.to_string(),
            results: vec![
                SearchResult {
                    id: 1,
                    title: format!("Result for \"{}\"", query),
                    description: "This is a sample result".to_string(),
                },
                SearchResult {
                    id: 2,
                    title: format!("Another result about \"{}\"", query),
                    description: "More relevant information".to_string(),
                },
            ],
        })
    }

    fn connect_mcp(&mut self, url: &str, protocol: &str) -> Result<McpConnection, ServiceError> {
        Ok(McpConnection {
            url: url.to_string(),
            protocol: protocol.to_string(),
            connected: true,
            connected_at: self.now(),
        })
    }

    fn disconnect_mcp(&mut self, _url: &str) -> Result<(), ServiceError> {
        Ok(())
    }

    fn complete(&mut self, request: &LlmRequest) -> Result<String, ServiceError> {
        Ok(Self::canned_reply(&request.model, &request.user_message))
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_time.unwrap_or_else(Utc::now)
    }
}
