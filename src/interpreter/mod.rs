//! Interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`engine::Interpreter`] facade and the
//!   [`engine::Executor`] that dispatches classified commands
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! Lines run strictly in order, one at a time. While a loop is open the
//! driver buffers lines instead of running them; the terminator replays the
//! buffer. Conditionals re-enter the classifier with their clause text.
//!
//! Command families are implemented in separate `impl Executor` blocks:
//! `statements` (variables, arithmetic, tasks, conditionals, display),
//! `loops` and `integrations` (search API, MCP, model).

pub mod constants;
pub mod engine;
pub mod errors;
mod integrations;
mod loops;
mod statements;
