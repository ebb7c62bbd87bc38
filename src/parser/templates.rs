//! Sentence template catalog
//!
//! Every command the language understands is one line-shaped regular
//! expression. Templates are tried in [`CATALOG`] order and the first match
//! wins, with no backtracking into later templates. A more specific shape
//! must therefore come before any general shape that would also accept it:
//! `show tasks` precedes `show <variable>`, and the literal-number
//! conditional precedes the variable conditional.
//!
//! Keywords match case-insensitively. Captured identifiers and quoted text
//! keep the casing they were written with.

use regex::Regex;
use std::sync::OnceLock;

/// Identifier capture: a letter or underscore, then letters, digits, underscores
macro_rules! ident {
    () => {
        "([A-Za-z_][A-Za-z0-9_]*)"
    };
}

/// Signed integer or decimal capture
macro_rules! number {
    () => {
        "(-?[0-9]+(?:\\.[0-9]+)?)"
    };
}

/// Comparison phrase capture
macro_rules! comparator {
    () => {
        "(above|below|equal to|greater than|less than)"
    };
}

/// Template identifiers in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    CreateNumber,
    CreateString,
    Add,
    Subtract,
    Multiply,
    Divide,
    CreateTask,
    MarkTaskComplete,
    ShowTasks,
    ShowTasksWhere,
    IfThen,
    IfThenVar,
    Repeat,
    While,
    EndLoop,
    ConnectApi,
    SendSearch,
    GetResponse,
    ConnectMcp,
    DisconnectMcp,
    SendMessage,
    SendMessageDirect,
    WaitForResponse,
    GetResponseAs,
    MeasureLength,
    ShowVariable,
    ShowString,
    ShowResponse,
    Comment,
}

/// Catalog order. Earlier entries shadow later ones.
pub const CATALOG: [Template; 29] = [
    Template::CreateNumber,
    Template::CreateString,
    Template::Add,
    Template::Subtract,
    Template::Multiply,
    Template::Divide,
    Template::CreateTask,
    Template::MarkTaskComplete,
    Template::ShowTasks,
    Template::ShowTasksWhere,
    Template::IfThen,
    Template::IfThenVar,
    Template::Repeat,
    Template::While,
    Template::EndLoop,
    Template::ConnectApi,
    Template::SendSearch,
    Template::GetResponse,
    Template::ConnectMcp,
    Template::DisconnectMcp,
    Template::SendMessage,
    Template::SendMessageDirect,
    Template::WaitForResponse,
    Template::GetResponseAs,
    Template::MeasureLength,
    Template::ShowVariable,
    Template::ShowString,
    Template::ShowResponse,
    Template::Comment,
];

impl Template {
    /// Source of the line-shape pattern, anchored at both ends
    pub fn pattern(self) -> &'static str {
        match self {
            Template::CreateNumber => concat!(
                "^create (?:a )?number called ",
                ident!(),
                " with value ",
                number!(),
                "$"
            ),
            Template::CreateString => concat!(
                "^create (?:a )?(?:string|text) called ",
                ident!(),
                " with value \"([^\"]*)\"$"
            ),
            Template::Add => concat!("^add ", number!(), " to ", ident!(), "$"),
            Template::Subtract => concat!("^subtract ", number!(), " from ", ident!(), "$"),
            Template::Multiply => concat!("^multiply ", ident!(), " by ", number!(), "$"),
            Template::Divide => concat!("^divide ", ident!(), " by ", number!(), "$"),
            Template::CreateTask => {
                "^create (?:a )?task called \"([^\"]*)\" with status \"([^\"]*)\"$"
            }
            Template::MarkTaskComplete => {
                "^mark task \"([^\"]*)\" as (?:complete|done|finished)$"
            }
            Template::ShowTasks => "^show (?:all )?tasks$",
            Template::ShowTasksWhere => "^show tasks where status is \"([^\"]*)\"$",
            Template::IfThen => concat!(
                "^if ",
                ident!(),
                " is ",
                comparator!(),
                " ",
                number!(),
                ", (.+?)(?:\\s+otherwise\\s+(.+))?$"
            ),
            Template::IfThenVar => concat!(
                "^if ",
                ident!(),
                " is ",
                comparator!(),
                " ",
                ident!(),
                ", (.+?)(?:\\s+otherwise\\s+(.+))?$"
            ),
            Template::Repeat => "^repeat ([0-9]+) times?$",
            Template::While => concat!(
                "^while ",
                ident!(),
                " is ",
                comparator!(),
                " ",
                number!(),
                "$"
            ),
            Template::EndLoop => "^(?:end|done)$",
            Template::ConnectApi => "^connect to (?:the )?api at \"([^\"]*)\"$",
            Template::SendSearch => {
                "^send (?:a )?search for \"([^\"]*)\" using (?:the )?key \"([^\"]*)\"$"
            }
            Template::GetResponse => "^get (?:the )?response$",
            Template::ConnectMcp => {
                "^connect to mcp server at \"([^\"]*)\" with protocol \"([^\"]*)\"$"
            }
            Template::DisconnectMcp => "^disconnect from mcp server \"([^\"]*)\"$",
            Template::SendMessage => concat!(
                "^send message to model \"([^\"]*)\" with (?:system prompt ",
                ident!(),
                " and )?user message ",
                ident!(),
                "$"
            ),
            Template::SendMessageDirect => concat!(
                "^send message to model \"([^\"]*)\" with (?:system prompt ",
                ident!(),
                " and )?user message \"([^\"]*)\"$"
            ),
            Template::WaitForResponse => "^wait for model response$",
            Template::GetResponseAs => "^get (?:the )?response as \"([^\"]*)\"$",
            Template::MeasureLength => concat!(
                "^measure length of ",
                ident!(),
                " and store in ",
                ident!(),
                "$"
            ),
            Template::ShowVariable => concat!("^show ", ident!(), "$"),
            Template::ShowString => "^show \"([^\"]*)\"$",
            Template::ShowResponse => "^show (?:the )?response$",
            Template::Comment => "^note:\\s*(.*)$",
        }
    }
}

static COMPILED: OnceLock<Vec<(Template, Regex)>> = OnceLock::new();

/// The catalog compiled once per process, in priority order
pub fn compiled() -> &'static [(Template, Regex)] {
    COMPILED.get_or_init(|| {
        CATALOG
            .iter()
            .map(|&template| {
                let source = format!("(?i){}", template.pattern());
                // Patterns are fixed strings covered by the tests below
                let regex = Regex::new(&source).expect("template pattern compiles");
                (template, regex)
            })
            .collect()
    })
}

/// Whether a trimmed line closes a loop (`end` / `done`)
pub fn is_loop_terminator(line: &str) -> bool {
    line.eq_ignore_ascii_case("end") || line.eq_ignore_ascii_case("done")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(line: &str) -> Option<Template> {
        compiled()
            .iter()
            .find(|(_, regex)| regex.is_match(line))
            .map(|(template, _)| *template)
    }

    #[test]
    fn test_every_pattern_compiles() {
        assert_eq!(compiled().len(), CATALOG.len());
    }

    #[test]
    fn test_specific_shapes_shadow_general_ones() {
        assert_eq!(first_match("show tasks"), Some(Template::ShowTasks));
        assert_eq!(first_match("show all tasks"), Some(Template::ShowTasks));
        assert_eq!(first_match("show x"), Some(Template::ShowVariable));
        assert_eq!(first_match("show the response"), Some(Template::ShowResponse));
        // bare `response` is an identifier and hits the variable template first
        assert_eq!(first_match("show response"), Some(Template::ShowVariable));
        assert_eq!(
            first_match("if x is above 10, show x"),
            Some(Template::IfThen)
        );
        assert_eq!(
            first_match("if x is above y, show x"),
            Some(Template::IfThenVar)
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            first_match("CREATE A NUMBER CALLED X WITH VALUE 1"),
            Some(Template::CreateNumber)
        );
        assert_eq!(first_match("End"), Some(Template::EndLoop));
        assert_eq!(
            first_match("Connect to MCP server at \"ws://x\" with protocol \"ws\""),
            Some(Template::ConnectMcp)
        );
    }

    #[test]
    fn test_identifiers_cannot_start_with_digit() {
        assert_eq!(first_match("show 5x"), None);
    }

    #[test]
    fn test_loop_terminator() {
        assert!(is_loop_terminator("end"));
        assert!(is_loop_terminator("DONE"));
        assert!(!is_loop_terminator("end loop"));
    }
}
