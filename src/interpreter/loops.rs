//! Loop execution (`repeat`, `while`).
//!
//! A loop header only opens loop state. The run driver then buffers every raw
//! line up to the next `end`/`done`, and the terminator replays that body:
//! `repeat N` runs it exactly N times, `while` re-checks its guard before each
//! pass. Each body line is classified afresh on every pass, so a pass sees the
//! effects of the one before it.
//!
//! Loops do not nest. A header reached while another loop is collecting or
//! replaying fails with [`RuntimeError::LoopAlreadyOpen`], and a terminator
//! with nothing collecting fails with [`RuntimeError::NoActiveLoop`]. Loop
//! state is back to closed once the replay ends, whether it succeeded or not.

use crate::interpreter::engine::Executor;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::statements::condition_holds;
use crate::parser::ast::Comparator;
use crate::state::value::{format_number, Value};
use crate::state::{LoopKind, LoopState, OpenLoop};
use tracing::debug;

impl Executor<'_> {
    pub(crate) fn open_repeat(&mut self, times: usize) -> Result<(), RuntimeError> {
        let message = format!("Starting to repeat {} times...", times);
        self.open_loop(LoopKind::Repeat { times }, message)
    }

    /// The header message echoes the comparison words as the script wrote them
    pub(crate) fn open_while(
        &mut self,
        variable: &str,
        comparator: Comparator,
        phrase: &str,
        threshold: f64,
    ) -> Result<(), RuntimeError> {
        let message = format!(
            "Starting while loop: while {} is {} {}...",
            variable,
            phrase,
            format_number(threshold)
        );
        let kind = LoopKind::While {
            variable: variable.to_string(),
            comparator,
            threshold,
        };
        self.open_loop(kind, message)
    }

    fn open_loop(&mut self, kind: LoopKind, message: String) -> Result<(), RuntimeError> {
        if let Some(active) = self.state.loop_state.active_kind() {
            return Err(RuntimeError::LoopAlreadyOpen {
                open: active.name(),
            });
        }

        debug!(kind = kind.name(), "loop opened");
        self.state.loop_state = LoopState::Collecting(OpenLoop::new(kind));
        self.emit(message);
        Ok(())
    }

    /// Handles `end` / `done`: replays the collected body, then closes the loop
    pub(crate) fn close_loop(&mut self) -> Result<(), RuntimeError> {
        let open = match std::mem::take(&mut self.state.loop_state) {
            LoopState::Collecting(open) => open,
            other => {
                self.state.loop_state = other;
                return Err(RuntimeError::NoActiveLoop);
            }
        };

        debug!(kind = open.kind.name(), lines = open.body.len(), "loop closing");
        self.state.loop_state = LoopState::Replaying(open.kind.clone());

        let result = match &open.kind {
            LoopKind::Repeat { times } => self.replay_repeat(*times, &open.body),
            LoopKind::While {
                variable,
                comparator,
                threshold,
            } => self.replay_while(variable, *comparator, *threshold, &open.body),
        };

        self.state.loop_state = LoopState::Closed;
        result?;

        self.emit("Loop finished!");
        Ok(())
    }

    fn replay_body(&mut self, body: &[String]) -> Result<(), RuntimeError> {
        for line in body {
            self.execute_line(line)?;
        }
        Ok(())
    }

    fn replay_repeat(&mut self, times: usize, body: &[String]) -> Result<(), RuntimeError> {
        for iteration in 1..=times {
            debug!(iteration, "repeat pass");
            self.emit(format!("  Iteration {}:", iteration));
            self.replay_body(body)?;
        }
        Ok(())
    }

    /// The guard is checked before every pass. Running `max_while_iterations`
    /// passes is an overrun, even if the guard would be false afterwards.
    fn replay_while(
        &mut self,
        variable: &str,
        comparator: Comparator,
        threshold: f64,
        body: &[String],
    ) -> Result<(), RuntimeError> {
        let limit = self.config.max_while_iterations;
        let bound = Value::Number(threshold);
        let mut iterations = 0;

        loop {
            if iterations >= limit {
                return Err(RuntimeError::LoopOverrun { limit });
            }
            let current = self.lookup(variable)?.clone();
            if !condition_holds(&current, comparator, &bound) {
                break;
            }

            iterations += 1;
            debug!(iteration = iterations, "while pass");
            self.emit(format!(
                "  Iteration {}: {} = {}",
                iterations, variable, current
            ));
            self.replay_body(body)?;
        }

        Ok(())
    }
}
