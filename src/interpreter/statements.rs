//! Statement execution implementation
//!
//! This module handles the commands that work on plain program state:
//!
//! - Variable creation (numbers and strings)
//! - Arithmetic on existing variables
//! - Task creation, completion and listing
//! - Conditionals
//! - Display and length measurement
//!
//! # Conditionals
//!
//! A conditional's then/otherwise clauses are raw text. The chosen clause is
//! classified and executed like any other line, so a clause may itself be a
//! conditional. A false condition with no otherwise clause does nothing.

use crate::interpreter::engine::Executor;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Comparator, Operand};
use crate::state::value::{format_number, Value};
use crate::state::{Task, COMPLETE_STATUS};
use std::cmp::Ordering;
use tracing::debug;

/// Evaluate `lhs <comparator> rhs`.
///
/// Numbers compare numerically and text compares lexicographically. Mixed
/// operands are never equal; for above/below the text side is read as a
/// number, and NaN makes the comparison false.
pub(crate) fn condition_holds(lhs: &Value, comparator: Comparator, rhs: &Value) -> bool {
    let ordering = match (lhs, rhs) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        _ if comparator == Comparator::EqualTo => return false,
        _ => lhs.to_number().partial_cmp(&rhs.to_number()),
    };

    match comparator {
        Comparator::Above => ordering == Some(Ordering::Greater),
        Comparator::Below => ordering == Some(Ordering::Less),
        Comparator::EqualTo => ordering == Some(Ordering::Equal),
    }
}

impl Executor<'_> {
    pub(crate) fn execute_create_number(&mut self, name: &str, value: f64) {
        self.state.set_variable(name, value);
        self.emit(format!(
            "Created number {} with value {}",
            name,
            format_number(value)
        ));
    }

    pub(crate) fn execute_create_string(&mut self, name: &str, value: &str) {
        self.state.set_variable(name, value);
        self.emit(format!("Created string {} with value \"{}\"", name, value));
    }

    /// Current value of `name` as a number, coercing text
    fn numeric(&self, name: &str) -> Result<f64, RuntimeError> {
        Ok(self.lookup(name)?.to_number())
    }

    pub(crate) fn execute_add(&mut self, amount: f64, target: &str) -> Result<(), RuntimeError> {
        let updated = self.numeric(target)? + amount;
        self.state.set_variable(target, updated);
        self.emit(format!(
            "Added {} to {}. New value: {}",
            format_number(amount),
            target,
            format_number(updated)
        ));
        Ok(())
    }

    pub(crate) fn execute_subtract(
        &mut self,
        amount: f64,
        target: &str,
    ) -> Result<(), RuntimeError> {
        let updated = self.numeric(target)? - amount;
        self.state.set_variable(target, updated);
        self.emit(format!(
            "Subtracted {} from {}. New value: {}",
            format_number(amount),
            target,
            format_number(updated)
        ));
        Ok(())
    }

    pub(crate) fn execute_multiply(
        &mut self,
        target: &str,
        factor: f64,
    ) -> Result<(), RuntimeError> {
        let updated = self.numeric(target)? * factor;
        self.state.set_variable(target, updated);
        self.emit(format!(
            "Multiplied {} by {}. New value: {}",
            target,
            format_number(factor),
            format_number(updated)
        ));
        Ok(())
    }

    /// Zero divisor is rejected before the dividend is looked up
    pub(crate) fn execute_divide(&mut self, target: &str, divisor: f64) -> Result<(), RuntimeError> {
        if divisor == 0.0 {
            return Err(RuntimeError::DivisionByZero);
        }
        let updated = self.numeric(target)? / divisor;
        self.state.set_variable(target, updated);
        self.emit(format!(
            "Divided {} by {}. New value: {}",
            target,
            format_number(divisor),
            format_number(updated)
        ));
        Ok(())
    }

    pub(crate) fn execute_create_task(&mut self, name: &str, status: &str) {
        self.state.tasks.push(Task::new(name, status));
        self.emit(format!(
            "Created task: \"{}\" with status \"{}\"",
            name, status
        ));
    }

    pub(crate) fn execute_mark_task_complete(&mut self, name: &str) -> Result<(), RuntimeError> {
        let task = self
            .state
            .find_task_mut(name)
            .ok_or_else(|| RuntimeError::TaskNotFound {
                name: name.to_string(),
            })?;
        task.status = COMPLETE_STATUS.to_string();
        self.emit(format!("Marked task \"{}\" as complete", name));
        Ok(())
    }

    pub(crate) fn execute_show_tasks(&mut self) {
        if self.state.tasks.is_empty() {
            self.emit("No tasks yet. Create some tasks to get started!");
            return;
        }

        let lines: Vec<String> = self
            .state
            .tasks
            .iter()
            .map(|task| format!("  • {} ({})", task.name, task.status))
            .collect();
        self.emit("All tasks:");
        for line in lines {
            self.emit(line);
        }
    }

    pub(crate) fn execute_show_tasks_where(&mut self, status: &str) {
        let names: Vec<String> = self
            .state
            .tasks_with_status(status)
            .map(|task| format!("  • {}", task.name))
            .collect();

        if names.is_empty() {
            self.emit(format!("No tasks with status \"{}\"", status));
            return;
        }

        self.emit(format!("Tasks with status \"{}\":", status));
        for line in names {
            self.emit(line);
        }
    }

    pub(crate) fn execute_if(
        &mut self,
        subject: &str,
        comparator: Comparator,
        operand: &Operand,
        then_clause: &str,
        otherwise_clause: Option<&str>,
    ) -> Result<(), RuntimeError> {
        let lhs = self.lookup(subject)?.clone();
        let rhs = match operand {
            Operand::Literal(n) => Value::Number(*n),
            Operand::Variable(name) => self.lookup(name)?.clone(),
        };

        let holds = condition_holds(&lhs, comparator, &rhs);
        debug!(subject, %comparator, holds, "condition evaluated");

        match (holds, otherwise_clause) {
            (true, _) => self.execute_line(then_clause),
            (false, Some(clause)) => self.execute_line(clause),
            (false, None) => Ok(()),
        }
    }

    pub(crate) fn execute_show_variable(&mut self, name: &str) -> Result<(), RuntimeError> {
        let rendered = self.lookup(name)?.to_string();
        self.emit(format!("{}: {}", name, rendered));
        Ok(())
    }

    pub(crate) fn execute_measure_length(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<(), RuntimeError> {
        let length = self.lookup(source)?.char_len();
        self.state.set_variable(target, length as f64);
        self.emit(format!(
            "Measured length of {}: {} characters",
            source, length
        ));
        Ok(())
    }
}
