//! # Introduction
//!
//! NaturaCode interprets scripts written as plain English sentences, one
//! command per line. Each line is matched against a fixed catalog of sentence
//! templates and executed immediately against a single mutable program state.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lines → Classifier → Command → Executor → ProgramState → Output
//! ```
//!
//! 1. [`parser`]: ordered regex templates turn one line into a
//!    [`parser::ast::Command`].
//! 2. [`interpreter`]: the [`Interpreter`] drives a run line by line,
//!    buffering loop bodies, and its executor applies each command.
//! 3. [`state`]: variables, tasks, loop state, mock-service records and the
//!    output log.
//! 4. [`services`]: the port used for search, MCP and model calls, with a
//!    deterministic mock as the default implementation.
//! 5. [`snapshot`]: serializable, disconnected copies of program state.
//! 6. [`speech`]: sentence projections of state and back.
//!
//! ## Example
//!
//! ```
//! use naturacode::{Config, Interpreter};
//!
//! let config = Config { echo_output: false, ..Config::default() };
//! let mut interpreter = Interpreter::with_config(config);
//! let output = interpreter
//!     .run("create a number called x with value 10\nadd 5 to x\nshow x")
//!     .unwrap();
//! assert_eq!(output.last().map(String::as_str), Some("x: 15"));
//! ```

pub mod config;
pub mod interpreter;
pub mod parser;
pub mod services;
pub mod snapshot;
pub mod speech;
pub mod state;

pub use config::{Config, ConfigError};
pub use interpreter::engine::{Executor, Interpreter};
pub use interpreter::errors::{ErrorKind, RuntimeError};
pub use snapshot::Snapshot;
