use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

/// The devstrap banner as ASCII art
pub const BANNER: &str = r#"
╔═══════════════════════════╗
║  d e v s t r a p          ║
║  macOS workstation setup  ║
╚═══════════════════════════╝"#;

const PANEL_WIDTH: usize = 56;

pub fn print_banner() {
    println!("{}", style(BANNER).cyan());
    println!();
}

/// Status indicator for a status report row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusIndicator {
    Present,
    Absent,
}

impl StatusIndicator {
    pub fn from_bool(present: bool) -> Self {
        if present {
            StatusIndicator::Present
        } else {
            StatusIndicator::Absent
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            StatusIndicator::Present => "●",
            StatusIndicator::Absent => "○",
        }
    }

    pub fn styled(&self) -> StyledObject<&'static str> {
        match self {
            StatusIndicator::Present => style(self.symbol()).green().bold(),
            StatusIndicator::Absent => style(self.symbol()).dim(),
        }
    }
}

/// Print a boxed, non-interactive panel with a title and body lines.
pub fn print_panel(title: &str, lines: &[String]) {
    println!();
    println!("  {}", style(format!("╭{}╮", "─".repeat(PANEL_WIDTH + 2))).dim());
    println!(
        "  {}  {} {}",
        style("│").dim(),
        style(format!("{:<width$}", title, width = PANEL_WIDTH)).cyan().bold(),
        style("│").dim()
    );
    if !lines.is_empty() {
        println!(
            "  {}  {:<width$} {}",
            style("│").dim(),
            "",
            style("│").dim(),
            width = PANEL_WIDTH
        );
    }
    for line in lines {
        println!(
            "  {}  {:<width$} {}",
            style("│").dim(),
            line,
            style("│").dim(),
            width = PANEL_WIDTH
        );
    }
    println!("  {}", style(format!("╰{}╯", "─".repeat(PANEL_WIDTH + 2))).dim());
    println!();
}

/// Spinner shown while an external command runs. Cosmetic only.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("◐◓◑◒ ")
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_indicator_from_bool() {
        assert_eq!(StatusIndicator::from_bool(true), StatusIndicator::Present);
        assert_eq!(StatusIndicator::from_bool(false), StatusIndicator::Absent);
        assert_eq!(StatusIndicator::Present.symbol(), "●");
        assert_eq!(StatusIndicator::Absent.symbol(), "○");
    }
}
