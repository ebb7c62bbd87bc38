// Append-only output log for a program run

use serde::{Deserialize, Serialize};

/// Lines produced by executed commands, in execution order.
///
/// Cleared at the start of every top-level run. Lines are never edited once
/// pushed, so a failed run still shows everything up to the failing line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputLog {
    lines: Vec<String>,
}

impl OutputLog {
    pub fn new() -> Self {
        OutputLog { lines: Vec::new() }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl From<Vec<String>> for OutputLog {
    fn from(lines: Vec<String>) -> Self {
        OutputLog { lines }
    }
}
