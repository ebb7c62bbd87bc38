// Constants for the interpreter

/// Default cap on `while` passes before the loop is treated as runaway
pub const MAX_WHILE_ITERATIONS: usize = 1000;

/// Default number of characters of a model prompt echoed to the output log
pub const PROMPT_PREVIEW_CHARS: usize = 100;

/// Prefix of the output line recorded for a failed run
pub const ERROR_LINE_PREFIX: &str = "Error: ";

/// Tracing target for echoed output lines
pub const OUTPUT_TARGET: &str = "naturacode::output";
