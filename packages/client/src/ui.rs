//! UI utilities for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// The prompt shown while waiting for input
pub const PROMPT: &str = "> ";

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}

/// Read lines from the terminal on a dedicated thread.
///
/// The thread outlives reconnections; the returned channel closes on Ctrl+C,
/// Ctrl+D or a terminal error.
pub fn spawn_input_reader() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
