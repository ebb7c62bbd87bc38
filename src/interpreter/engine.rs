// Execution engine for the interpreter

use crate::config::Config;
use crate::interpreter::constants::{ERROR_LINE_PREFIX, OUTPUT_TARGET};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Command, Node};
use crate::parser::classify;
use crate::parser::templates::is_loop_terminator;
use crate::services::{ExternalServices, MockServices};
use crate::snapshot::Snapshot;
use crate::speech;
use crate::state::value::Value;
use crate::state::{ProgramState, Task};
use tracing::{debug, info, trace, warn};

/// An interpreter session: program state plus the services it talks to.
///
/// Instances share nothing. A host serving several users keeps one per
/// session and must not interleave two runs on the same instance.
pub struct Interpreter {
    /// Variables, tasks, loop state, mock records and output
    state: ProgramState,

    /// External-service port used by API/MCP/model commands
    services: Box<dyn ExternalServices>,

    /// Tunables (loop cap, prompt preview length, output echo)
    config: Config,
}

impl Interpreter {
    /// Create an interpreter with default config and mock services
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_parts(config, Box::new(MockServices::new()))
    }

    pub fn with_services(services: impl ExternalServices + 'static) -> Self {
        Self::with_parts(Config::default(), Box::new(services))
    }

    pub fn with_parts(config: Config, services: Box<dyn ExternalServices>) -> Self {
        Interpreter {
            state: ProgramState::default(),
            services,
            config,
        }
    }

    /// Rebuild an interpreter around a previously captured (or externally
    /// supplied) snapshot, with default config and mock services
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut interpreter = Self::new();
        interpreter.restore(snapshot);
        interpreter
    }

    /// Replace the program state with a snapshot's. Config and services are
    /// kept.
    pub fn restore(&mut self, snapshot: Snapshot) {
        debug!(variables = snapshot.variables.len(), "state restored");
        self.state = snapshot.into_state();
    }

    /// Run a whole program.
    ///
    /// Clears the output log, then feeds each non-empty trimmed line through
    /// the executor in order. The first failure aborts the rest of the
    /// program: one `Error: ...` line is appended and the error is returned.
    pub fn run(&mut self, source: &str) -> Result<Vec<String>, RuntimeError> {
        self.state.output.clear();

        let mut executor = self.executor();
        for line in source.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Err(err) = executor.feed_line(line) {
                warn!(line, error = %err, "run aborted");
                executor.record_failure(&err);
                return Err(err);
            }
        }

        Ok(self.state.output.lines().to_vec())
    }

    /// Feed one more line without clearing output, for line-at-a-time hosts.
    ///
    /// Follows the same buffering rules as [`run`](Self::run): while a loop is
    /// collecting, the line is stored rather than executed.
    pub fn feed_line(&mut self, line: &str) -> Result<(), RuntimeError> {
        let mut executor = self.executor();
        if let Err(err) = executor.feed_line(line) {
            warn!(line, error = %err, "line failed");
            executor.record_failure(&err);
            return Err(err);
        }
        Ok(())
    }

    /// Restore the initial empty state
    pub fn reset(&mut self) {
        debug!("interpreter reset");
        self.state = ProgramState::default();
    }

    /// Disconnected copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.state.get_variable(name)
    }

    /// Current value of a variable, failing like a script reference would
    pub fn evaluate(&self, name: &str) -> Result<Value, RuntimeError> {
        self.state
            .get_variable(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn output(&self) -> &[String] {
        self.state.output.lines()
    }

    /// Describe the current state as creation sentences
    pub fn to_speech(&self) -> String {
        speech::to_speech(&self.state)
    }

    /// Turn speech text back into candidate program lines
    pub fn from_speech(&self, text: &str) -> String {
        speech::from_speech(text)
    }

    fn executor(&mut self) -> Executor<'_> {
        Executor::new(&mut self.state, self.services.as_mut(), &self.config)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes classified commands against borrowed program state.
///
/// The executor owns nothing. Tests can build a [`ProgramState`] by hand,
/// wrap it in an executor, and inspect it afterwards.
pub struct Executor<'a> {
    pub(crate) state: &'a mut ProgramState,
    pub(crate) services: &'a mut dyn ExternalServices,
    pub(crate) config: &'a Config,
}

impl<'a> Executor<'a> {
    pub fn new(
        state: &'a mut ProgramState,
        services: &'a mut dyn ExternalServices,
        config: &'a Config,
    ) -> Self {
        Executor {
            state,
            services,
            config,
        }
    }

    /// Top-level line handling: buffer into an open loop, or execute now
    pub fn feed_line(&mut self, line: &str) -> Result<(), RuntimeError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if self.state.loop_state.is_collecting() && !is_loop_terminator(line) {
            trace!(line, "buffered into loop body");
            self.state.loop_state.buffer(line);
            return Ok(());
        }

        self.execute_line(line)
    }

    /// Classify and execute one line immediately
    pub fn execute_line(&mut self, line: &str) -> Result<(), RuntimeError> {
        let node = classify(line);
        self.execute(&node)
    }

    /// Execute a single classified command
    pub fn execute(&mut self, node: &Node) -> Result<(), RuntimeError> {
        debug!(kind = node.kind(), line = %node.line, "executing");

        match &node.command {
            Command::CreateNumber { name, value } => {
                self.execute_create_number(name, *value);
                Ok(())
            }
            Command::CreateString { name, value } => {
                self.execute_create_string(name, value);
                Ok(())
            }
            Command::Add { amount, target } => self.execute_add(*amount, target),
            Command::Subtract { amount, target } => self.execute_subtract(*amount, target),
            Command::Multiply { target, factor } => self.execute_multiply(target, *factor),
            Command::Divide { target, divisor } => self.execute_divide(target, *divisor),
            Command::CreateTask { name, status } => {
                self.execute_create_task(name, status);
                Ok(())
            }
            Command::MarkTaskComplete { name } => self.execute_mark_task_complete(name),
            Command::ShowTasks => {
                self.execute_show_tasks();
                Ok(())
            }
            Command::ShowTasksWhere { status } => {
                self.execute_show_tasks_where(status);
                Ok(())
            }
            Command::If {
                subject,
                comparator,
                operand,
                then_clause,
                otherwise_clause,
            } => self.execute_if(
                subject,
                *comparator,
                operand,
                then_clause,
                otherwise_clause.as_deref(),
            ),
            Command::Repeat { times } => self.open_repeat(*times),
            Command::While {
                variable,
                comparator,
                phrase,
                threshold,
            } => self.open_while(variable, *comparator, phrase, *threshold),
            Command::EndLoop => self.close_loop(),
            Command::ConnectApi { endpoint } => {
                self.execute_connect_api(endpoint);
                Ok(())
            }
            Command::SendSearch { query, key } => self.execute_send_search(query, key),
            Command::GetResponse => self.execute_get_response(),
            Command::ConnectMcp { url, protocol } => self.execute_connect_mcp(url, protocol),
            Command::DisconnectMcp { url } => self.execute_disconnect_mcp(url),
            Command::SendMessage {
                model,
                system_prompt,
                user_message,
            } => self.execute_send_message(model, system_prompt.as_deref(), user_message),
            Command::WaitForResponse => self.execute_wait_for_response(),
            Command::GetResponseAs { variable } => self.execute_get_response_as(variable),
            Command::MeasureLength { source, target } => {
                self.execute_measure_length(source, target)
            }
            Command::ShowVariable { name } => self.execute_show_variable(name),
            Command::ShowString { text } => {
                self.emit(text.clone());
                Ok(())
            }
            Command::ShowResponse => self.execute_show_response(),
            Command::Comment { .. } => Ok(()),
            Command::Unknown => Err(RuntimeError::UnrecognizedCommand {
                line: node.line.clone(),
            }),
        }
    }

    /// Append a line to the output log, echoing it if configured
    pub(crate) fn emit(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.config.echo_output {
            info!(target: OUTPUT_TARGET, "{}", line);
        }
        self.state.output.push(line);
    }

    /// Record the single `Error: ...` line for a failed run
    pub(crate) fn record_failure(&mut self, err: &RuntimeError) {
        self.emit(format!("{}{}", ERROR_LINE_PREFIX, err));
    }

    /// Read a variable that must already exist
    pub(crate) fn lookup(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.state
            .get_variable(name)
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::errors::ErrorKind;

    fn quiet() -> Config {
        Config {
            echo_output: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_executor_against_hand_built_state() {
        let mut state = ProgramState::new();
        state.set_variable("x", 4.0);
        let mut services = MockServices::new();
        let config = quiet();

        let mut executor = Executor::new(&mut state, &mut services, &config);
        executor.execute_line("multiply x by 3").unwrap();
        executor.execute_line("show x").unwrap();

        assert_eq!(state.get_variable("x"), Some(&Value::Number(12.0)));
        assert_eq!(state.output.last(), Some("x: 12"));
    }

    #[test]
    fn test_feed_line_buffers_while_collecting() {
        let mut state = ProgramState::new();
        let mut services = MockServices::new();
        let config = quiet();

        let mut executor = Executor::new(&mut state, &mut services, &config);
        executor.feed_line("repeat 2 times").unwrap();
        executor.feed_line("this would not classify").unwrap();
        assert!(executor.state.loop_state.is_collecting());

        let err = executor.feed_line("end").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedCommand);
        assert!(state.loop_state.is_closed());
    }

    #[test]
    fn test_run_records_one_error_line() {
        let mut interpreter = Interpreter::with_config(quiet());
        let err = interpreter
            .run("create a number called x with value 1\nblah blah nonsense\nshow x")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnrecognizedCommand);
        let output = interpreter.output();
        assert_eq!(output.len(), 2);
        assert_eq!(output[0], "Created number x with value 1");
        assert_eq!(
            output[1],
            "Error: I don't understand \"blah blah nonsense\". Could you rephrase that?"
        );
    }

    #[test]
    fn test_evaluate_reports_undefined() {
        let interpreter = Interpreter::with_config(quiet());
        let err = interpreter.evaluate("missing").unwrap_err();
        assert_eq!(err, RuntimeError::undefined_variable("missing"));
    }

    #[test]
    fn test_feed_line_keeps_previous_output() {
        let mut interpreter = Interpreter::with_config(quiet());
        interpreter.feed_line("show \"one\"").unwrap();
        interpreter.feed_line("show \"two\"").unwrap();
        assert_eq!(interpreter.output(), ["one", "two"]);
    }

    #[test]
    fn test_restore_keeps_config() {
        let mut source = Interpreter::with_config(quiet());
        source.run("create a number called x with value 0").unwrap();
        let snapshot = source.snapshot();

        let config = Config {
            max_while_iterations: 2,
            ..quiet()
        };
        let mut interpreter = Interpreter::with_config(config.clone());
        interpreter.restore(snapshot);

        assert_eq!(interpreter.config(), &config);
        assert_eq!(interpreter.variable("x"), Some(&Value::Number(0.0)));
        let err = interpreter
            .run("while x is below 5\nadd 1 to x\nend")
            .unwrap_err();
        assert!(err.to_string().contains("limit: 2"));
    }
}
