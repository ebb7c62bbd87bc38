//! Sentence projections of program state
//!
//! [`to_speech`] describes the variables, tasks and API endpoint of a state
//! as the creation commands that would rebuild them. [`from_speech`] goes the
//! other way, turning such prose back into one candidate line per sentence.
//!
//! The reverse direction is a heuristic. Keywords and identifiers are
//! lowercased, so a variable named `Total` comes back as `total`; only quoted
//! text survives exactly.

use crate::state::value::{format_number, Value};
use crate::state::ProgramState;
use regex::Regex;
use std::sync::OnceLock;

static SENTENCE_BREAK: OnceLock<Regex> = OnceLock::new();

fn sentence_break() -> &'static Regex {
    SENTENCE_BREAK.get_or_init(|| Regex::new(r"\.\s+").expect("sentence pattern compiles"))
}

/// Describe `state` as creation sentences joined by single spaces
pub fn to_speech(state: &ProgramState) -> String {
    let variables = state.variables.iter().map(|(name, value)| match value {
        Value::Number(n) => format!(
            "Create a number called {} with value {}.",
            name,
            format_number(*n)
        ),
        Value::Text(s) => format!("Create a string called {} with value \"{}\".", name, s),
    });

    let tasks = state.tasks.iter().map(|task| {
        format!(
            "Create a task called \"{}\" with status \"{}\".",
            task.name, task.status
        )
    });

    let endpoint = state
        .api_endpoint
        .iter()
        .map(|url| format!("Connect to the API at \"{}\".", url));

    variables
        .chain(tasks)
        .chain(endpoint)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split prose into candidate program lines, one per sentence
pub fn from_speech(text: &str) -> String {
    sentence_break()
        .split(text)
        .map(|sentence| sentence.trim())
        .map(|sentence| sentence.strip_suffix('.').unwrap_or(sentence).trim())
        .filter(|sentence| !sentence.is_empty())
        .map(lowercase_outside_quotes)
        .collect::<Vec<_>>()
        .join("\n")
}

fn lowercase_outside_quotes(sentence: &str) -> String {
    let mut quoted = false;
    let mut out = String::with_capacity(sentence.len());
    for c in sentence.chars() {
        if c == '"' {
            quoted = !quoted;
            out.push(c);
        } else if quoted {
            out.push(c);
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Task;

    #[test]
    fn test_to_speech_order() {
        let mut state = ProgramState::new();
        state.set_variable("age", 25.0);
        state.set_variable("name", "Alice");
        state.tasks.push(Task::new("Buy milk", "pending"));
        state.api_endpoint = Some("https://api.example.com".into());

        assert_eq!(
            to_speech(&state),
            "Create a number called age with value 25. \
             Create a string called name with value \"Alice\". \
             Create a task called \"Buy milk\" with status \"pending\". \
             Connect to the API at \"https://api.example.com\"."
        );
    }

    #[test]
    fn test_empty_state_is_silent() {
        assert_eq!(to_speech(&ProgramState::new()), "");
        assert_eq!(from_speech("   "), "");
    }

    #[test]
    fn test_from_speech_keeps_quoted_case() {
        let lines = from_speech("Create a String called Greeting with value \"Hello World\". Show Greeting.");
        assert_eq!(
            lines,
            "create a string called greeting with value \"Hello World\"\nshow greeting"
        );
    }

    #[test]
    fn test_decimals_are_not_sentence_breaks() {
        assert_eq!(
            from_speech("Create a number called pi with value 3.14."),
            "create a number called pi with value 3.14"
        );
    }
}
