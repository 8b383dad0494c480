//! REPL Module
//!
//! The interactive prompt: reads lines, parses them into commands and runs
//! them against a [`Session`].

mod commands;
mod input;
mod session;

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::error::Result;
use crate::fetch::Transport;

pub use commands::{Command, CommandInfo, COMMANDS};
pub use input::clean_input;
pub use session::{catch_chance, Flow, Session};

pub const PROMPT: &str = "Pokedex > ";

// == Run ==
/// Runs the prompt loop until `exit` or end of input.
///
/// Command failures are reported to `output` and the loop carries on. Only
/// I/O errors on `input` or `output` end the loop with an error.
pub async fn run<T, R, W>(session: &mut Session<T>, input: R, output: &mut W) -> Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            return Ok(());
        };

        let words = clean_input(&line);
        if words.is_empty() {
            writeln!(output, "input needs to be at least 1 character long")?;
            continue;
        }

        let command = match Command::parse(&words) {
            Ok(Some(command)) => command,
            Ok(None) => {
                writeln!(output, "Unknown command")?;
                continue;
            }
            Err(err) => {
                writeln!(output, "Error: {}", err)?;
                continue;
            }
        };

        match session.execute(command, output).await {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(err) => {
                warn!(error = %err, "Command failed");
                writeln!(output, "Error: {}", err)?;
            }
        }
    }
}
