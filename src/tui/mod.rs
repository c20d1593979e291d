//! Terminal interaction: prompts, panels and spinners.

mod prompt;
mod widgets;

use std::io::{stdout, IsTerminal};

pub use prompt::{DialoguerPrompter, Prompter};
pub use widgets::*;

/// Check if stdout is attached to a terminal
pub fn is_tty_available() -> bool {
    stdout().is_terminal()
}
