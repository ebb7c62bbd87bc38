// Typed commands produced by classifying one source line

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison words accepted by conditionals and `while` headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// `above` / `greater than`
    Above,
    /// `below` / `less than`
    Below,
    /// `equal to`
    EqualTo,
}

impl Comparator {
    /// Map the captured comparison phrase, case-insensitively
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        match phrase.to_ascii_lowercase().as_str() {
            "above" | "greater than" => Some(Comparator::Above),
            "below" | "less than" => Some(Comparator::Below),
            "equal to" => Some(Comparator::EqualTo),
            _ => None,
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Comparator::Above => "above",
            Comparator::Below => "below",
            Comparator::EqualTo => "equal to",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Right-hand side of a conditional
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(f64),
    Variable(String),
}

/// Where a model message's user text comes from
#[derive(Debug, Clone, PartialEq)]
pub enum MessageSource {
    /// `user message greeting` - read from a variable
    Variable(String),
    /// `user message "hello"` - inline literal
    Literal(String),
}

/// One command per template in the catalog.
///
/// The executor matches on this exhaustively, so a new variant does not
/// compile until it is handled there.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateNumber {
        name: String,
        value: f64,
    },
    CreateString {
        name: String,
        value: String,
    },
    Add {
        amount: f64,
        target: String,
    },
    Subtract {
        amount: f64,
        target: String,
    },
    Multiply {
        target: String,
        factor: f64,
    },
    Divide {
        target: String,
        divisor: f64,
    },
    CreateTask {
        name: String,
        status: String,
    },
    MarkTaskComplete {
        name: String,
    },
    ShowTasks,
    ShowTasksWhere {
        status: String,
    },
    If {
        subject: String,
        comparator: Comparator,
        operand: Operand,
        then_clause: String,
        otherwise_clause: Option<String>,
    },
    Repeat {
        times: usize,
    },
    While {
        variable: String,
        comparator: Comparator,
        /// Comparison words as written, echoed by the loop header message
        phrase: String,
        threshold: f64,
    },
    EndLoop,
    ConnectApi {
        endpoint: String,
    },
    SendSearch {
        query: String,
        key: String,
    },
    GetResponse,
    ConnectMcp {
        url: String,
        protocol: String,
    },
    DisconnectMcp {
        url: String,
    },
    SendMessage {
        model: String,
        system_prompt: Option<String>,
        user_message: MessageSource,
    },
    WaitForResponse,
    GetResponseAs {
        variable: String,
    },
    MeasureLength {
        source: String,
        target: String,
    },
    ShowVariable {
        name: String,
    },
    ShowString {
        text: String,
    },
    ShowResponse,
    Comment {
        text: String,
    },
    Unknown,
}

impl Command {
    /// Stable kebab-case name, used in logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Command::CreateNumber { .. } => "create-number",
            Command::CreateString { .. } => "create-string",
            Command::Add { .. } => "add",
            Command::Subtract { .. } => "subtract",
            Command::Multiply { .. } => "multiply",
            Command::Divide { .. } => "divide",
            Command::CreateTask { .. } => "create-task",
            Command::MarkTaskComplete { .. } => "mark-task-complete",
            Command::ShowTasks => "show-tasks",
            Command::ShowTasksWhere { .. } => "show-tasks-filtered",
            Command::If {
                operand: Operand::Literal(_),
                ..
            } => "if-then",
            Command::If {
                operand: Operand::Variable(_),
                ..
            } => "if-then-var",
            Command::Repeat { .. } => "repeat",
            Command::While { .. } => "while",
            Command::EndLoop => "end-loop",
            Command::ConnectApi { .. } => "connect-api",
            Command::SendSearch { .. } => "send-search",
            Command::GetResponse => "get-response",
            Command::ConnectMcp { .. } => "connect-mcp",
            Command::DisconnectMcp { .. } => "disconnect-mcp",
            Command::SendMessage {
                user_message: MessageSource::Variable(_),
                ..
            } => "send-message",
            Command::SendMessage {
                user_message: MessageSource::Literal(_),
                ..
            } => "send-message-direct",
            Command::WaitForResponse => "wait-for-response",
            Command::GetResponseAs { .. } => "get-response-as",
            Command::MeasureLength { .. } => "measure-length",
            Command::ShowVariable { .. } => "show-variable",
            Command::ShowString { .. } => "show-string",
            Command::ShowResponse => "show-response",
            Command::Comment { .. } => "comment",
            Command::Unknown => "unknown",
        }
    }

    /// Loop headers open loop state instead of doing work immediately
    pub fn is_loop_header(&self) -> bool {
        matches!(self, Command::Repeat { .. } | Command::While { .. })
    }
}

/// A classified line: the command plus the trimmed source text it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub command: Command,
    pub line: String,
}

impl Node {
    pub fn new(command: Command, line: impl Into<String>) -> Self {
        Node {
            command,
            line: line.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.command.kind()
    }
}
