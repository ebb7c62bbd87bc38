//! Line classifier
//!
//! This module maps raw text lines to typed commands:
//! - [`templates`]: the ordered catalog of sentence templates
//! - [`parse`]: classification (line → [`ast::Node`])
//! - [`ast`]: command definitions
//!
//! # Grammar
//!
//! There is no tokenizer and no block structure. Each line is matched whole
//! against the catalog, first match wins. Conditional clauses are kept as raw
//! text and classified again when they run; loop bodies are buffered as raw
//! lines by the interpreter and classified on every pass.

pub mod ast;
pub mod parse;
pub mod templates;

pub use parse::{classify, classify_program};
