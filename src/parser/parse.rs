//! Line classification
//!
//! [`classify`] turns one trimmed source line into a [`Node`] by trying the
//! [`templates`](super::templates) catalog in order. Classification is total:
//! a line that fits no template becomes [`Command::Unknown`], which only
//! fails once it is executed.
//!
//! # Purity
//!
//! `classify` reads nothing but its argument and the process-wide compiled
//! catalog. The executor calls it recursively for conditional clauses and
//! once per line per loop pass, and none of those calls can observe or
//! disturb interpreter state.

use crate::parser::ast::*;
use crate::parser::templates::{self, Template};
use regex::Captures;

/// Classify a single line. Surrounding whitespace is ignored.
pub fn classify(line: &str) -> Node {
    let line = line.trim();

    for (template, regex) in templates::compiled() {
        if let Some(caps) = regex.captures(line) {
            if let Some(command) = build_command(*template, &caps) {
                return Node::new(command, line);
            }
            // Shape matched but a capture did not convert (e.g. a repeat
            // count too large for usize). First match still wins.
            break;
        }
    }

    Node::new(Command::Unknown, line)
}

/// Classify every non-empty line of a program, in order
pub fn classify_program(source: &str) -> Vec<Node> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify)
        .collect()
}

fn build_command(template: Template, caps: &Captures<'_>) -> Option<Command> {
    let command = match template {
        Template::CreateNumber => Command::CreateNumber {
            name: text(caps, 1)?,
            value: number(caps, 2)?,
        },
        Template::CreateString => Command::CreateString {
            name: text(caps, 1)?,
            value: text(caps, 2)?,
        },
        Template::Add => Command::Add {
            amount: number(caps, 1)?,
            target: text(caps, 2)?,
        },
        Template::Subtract => Command::Subtract {
            amount: number(caps, 1)?,
            target: text(caps, 2)?,
        },
        Template::Multiply => Command::Multiply {
            target: text(caps, 1)?,
            factor: number(caps, 2)?,
        },
        Template::Divide => Command::Divide {
            target: text(caps, 1)?,
            divisor: number(caps, 2)?,
        },
        Template::CreateTask => Command::CreateTask {
            name: text(caps, 1)?,
            status: text(caps, 2)?,
        },
        Template::MarkTaskComplete => Command::MarkTaskComplete {
            name: text(caps, 1)?,
        },
        Template::ShowTasks => Command::ShowTasks,
        Template::ShowTasksWhere => Command::ShowTasksWhere {
            status: text(caps, 1)?,
        },
        Template::IfThen => Command::If {
            subject: text(caps, 1)?,
            comparator: Comparator::from_phrase(caps.get(2)?.as_str())?,
            operand: Operand::Literal(number(caps, 3)?),
            then_clause: text(caps, 4)?,
            otherwise_clause: text(caps, 5),
        },
        Template::IfThenVar => Command::If {
            subject: text(caps, 1)?,
            comparator: Comparator::from_phrase(caps.get(2)?.as_str())?,
            operand: Operand::Variable(text(caps, 3)?),
            then_clause: text(caps, 4)?,
            otherwise_clause: text(caps, 5),
        },
        Template::Repeat => Command::Repeat {
            times: caps.get(1)?.as_str().parse().ok()?,
        },
        Template::While => Command::While {
            variable: text(caps, 1)?,
            comparator: Comparator::from_phrase(caps.get(2)?.as_str())?,
            phrase: text(caps, 2)?,
            threshold: number(caps, 3)?,
        },
        Template::EndLoop => Command::EndLoop,
        Template::ConnectApi => Command::ConnectApi {
            endpoint: text(caps, 1)?,
        },
        Template::SendSearch => Command::SendSearch {
            query: text(caps, 1)?,
            key: text(caps, 2)?,
        },
        Template::GetResponse => Command::GetResponse,
        Template::ConnectMcp => Command::ConnectMcp {
            url: text(caps, 1)?,
            protocol: text(caps, 2)?,
        },
        Template::DisconnectMcp => Command::DisconnectMcp {
            url: text(caps, 1)?,
        },
        Template::SendMessage => Command::SendMessage {
            model: text(caps, 1)?,
            system_prompt: text(caps, 2),
            user_message: MessageSource::Variable(text(caps, 3)?),
        },
        Template::SendMessageDirect => Command::SendMessage {
            model: text(caps, 1)?,
            system_prompt: text(caps, 2),
            user_message: MessageSource::Literal(text(caps, 3)?),
        },
        Template::WaitForResponse => Command::WaitForResponse,
        Template::GetResponseAs => Command::GetResponseAs {
            variable: text(caps, 1)?,
        },
        Template::MeasureLength => Command::MeasureLength {
            source: text(caps, 1)?,
            target: text(caps, 2)?,
        },
        Template::ShowVariable => Command::ShowVariable {
            name: text(caps, 1)?,
        },
        Template::ShowString => Command::ShowString {
            text: text(caps, 1)?,
        },
        Template::ShowResponse => Command::ShowResponse,
        Template::Comment => Command::Comment {
            text: text(caps, 1).unwrap_or_default(),
        },
    };
    Some(command)
}

fn text(caps: &Captures<'_>, group: usize) -> Option<String> {
    caps.get(group).map(|m| m.as_str().to_string())
}

fn number(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_create_number() {
        let node = classify("create a number called x with value -3.5");
        assert_eq!(
            node.command,
            Command::CreateNumber {
                name: "x".to_string(),
                value: -3.5
            }
        );
        assert_eq!(node.line, "create a number called x with value -3.5");
    }

    #[test]
    fn test_classify_preserves_identifier_and_string_case() {
        let node = classify("Create Text called MyVar with value \"Hello World\"");
        assert_eq!(
            node.command,
            Command::CreateString {
                name: "MyVar".to_string(),
                value: "Hello World".to_string()
            }
        );
    }

    #[test]
    fn test_classify_conditional_with_otherwise() {
        let node = classify("if age is above 18, show \"Adult\" otherwise show \"Minor\"");
        match node.command {
            Command::If {
                subject,
                comparator,
                operand,
                then_clause,
                otherwise_clause,
            } => {
                assert_eq!(subject, "age");
                assert_eq!(comparator, Comparator::Above);
                assert_eq!(operand, Operand::Literal(18.0));
                assert_eq!(then_clause, "show \"Adult\"");
                assert_eq!(otherwise_clause.as_deref(), Some("show \"Minor\""));
            }
            other => panic!("Expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_conditional_splits_on_first_otherwise() {
        let node = classify("if a is below b, show a otherwise show b otherwise show c");
        match node.command {
            Command::If {
                operand,
                then_clause,
                otherwise_clause,
                ..
            } => {
                assert_eq!(operand, Operand::Variable("b".to_string()));
                assert_eq!(then_clause, "show a");
                assert_eq!(otherwise_clause.as_deref(), Some("show b otherwise show c"));
            }
            other => panic!("Expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_conditional_without_otherwise() {
        let node = classify("if score is greater than 80, show \"High\"");
        match &node.command {
            Command::If {
                comparator,
                otherwise_clause,
                ..
            } => {
                assert_eq!(*comparator, Comparator::Above);
                assert!(otherwise_clause.is_none());
            }
            other => panic!("Expected conditional, got {:?}", other),
        }
        assert_eq!(node.kind(), "if-then");
    }

    #[test]
    fn test_classify_loops() {
        assert_eq!(classify("repeat 1 time").command, Command::Repeat { times: 1 });
        assert_eq!(classify("repeat 3 times").command, Command::Repeat { times: 3 });
        assert_eq!(
            classify("while x is less than 5").command,
            Command::While {
                variable: "x".to_string(),
                comparator: Comparator::Below,
                phrase: "less than".to_string(),
                threshold: 5.0
            }
        );
        assert_eq!(classify("done").command, Command::EndLoop);
    }

    #[test]
    fn test_oversized_repeat_count_is_unknown() {
        let node = classify("repeat 999999999999999999999999999 times");
        assert_eq!(node.command, Command::Unknown);
    }

    #[test]
    fn test_classify_send_message_variants() {
        let by_var = classify("send message to model \"claude\" with system prompt sys and user message question");
        assert_eq!(
            by_var.command,
            Command::SendMessage {
                model: "claude".to_string(),
                system_prompt: Some("sys".to_string()),
                user_message: MessageSource::Variable("question".to_string()),
            }
        );
        assert_eq!(by_var.kind(), "send-message");

        let direct = classify("send message to model \"claude\" with user message \"Hi there\"");
        assert_eq!(
            direct.command,
            Command::SendMessage {
                model: "claude".to_string(),
                system_prompt: None,
                user_message: MessageSource::Literal("Hi there".to_string()),
            }
        );
        assert_eq!(direct.kind(), "send-message-direct");
    }

    #[test]
    fn test_classify_task_completion_synonyms() {
        for verb in ["complete", "done", "finished"] {
            let node = classify(&format!("mark task \"Write\" as {}", verb));
            assert_eq!(
                node.command,
                Command::MarkTaskComplete {
                    name: "Write".to_string()
                }
            );
        }
    }

    #[test]
    fn test_classify_comment_and_unknown() {
        assert_eq!(
            classify("note: remember this").command,
            Command::Comment {
                text: "remember this".to_string()
            }
        );
        let unknown = classify("  blah blah nonsense  ");
        assert_eq!(unknown.command, Command::Unknown);
        assert_eq!(unknown.line, "blah blah nonsense");
    }

    #[test]
    fn test_classify_program_skips_blank_lines() {
        let nodes = classify_program("\n  show \"a\"\n\n   \nend\n");
        let kinds: Vec<&str> = nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, vec!["show-string", "end-loop"]);
    }
}
