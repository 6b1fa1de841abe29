//! The read-dispatch loop.

use std::io::{BufRead, Write};

use crate::core::dispatcher::{Dispatcher, Outcome};
use crate::error::Result;
use crate::render::render_error;

/// Interactive loop over any line source.
///
/// Command errors are reported on `output` and the loop keeps going. It ends
/// on end of input or when a handler asks to exit.
pub struct Repl<R, W> {
    dispatcher: Dispatcher,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub const fn new(dispatcher: Dispatcher, input: R, output: W) -> Self {
        Self {
            dispatcher,
            input,
            output,
        }
    }

    /// Run until end of input or exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", self.dispatcher.settings().prompt)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                tracing::debug!("End of input");
                return Ok(());
            }

            match self.dispatcher.dispatch(line.trim_end_matches(['\r', '\n'])) {
                Ok(Outcome::Exit) => {
                    tracing::debug!("Exit requested");
                    return Ok(());
                }
                Ok(Outcome::Idle | Outcome::Handled) => {}
                Err(err) => {
                    if err.is_recoverable() {
                        tracing::debug!(code = err.error_code(), error = %err, "Command rejected");
                    } else {
                        tracing::error!(code = err.error_code(), error = %err, "Command failed");
                    }
                    let no_color = self.dispatcher.settings().no_color;
                    writeln!(self.output, "{}", render_error(&err, no_color))?;
                }
            }
        }
    }

    /// Give back the dispatcher, e.g. to inspect state after a session.
    pub fn into_dispatcher(self) -> Dispatcher {
        self.dispatcher
    }
}
