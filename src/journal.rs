//! Run journal: every user-visible status line is mirrored into a log file.
//!
//! The file is append-only, one `"<timestamp> - <marker> <message>"` line per
//! entry. Writing it is best-effort: a missing or read-only log location never
//! interrupts a workflow.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use console::style;

/// Glyph prefixed to a journal line. Formatting only, all entries go to the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Plain,
    Success,
    Error,
    Info,
    Warning,
    Skipped,
}

impl Marker {
    pub fn glyph(&self) -> &'static str {
        match self {
            Marker::Plain => "",
            Marker::Success => "✓",
            Marker::Error => "✕",
            Marker::Info => "→",
            Marker::Warning => "!",
            Marker::Skipped => "○",
        }
    }

    fn styled(&self) -> console::StyledObject<&'static str> {
        let glyph = self.glyph();
        match self {
            Marker::Plain => style(glyph),
            Marker::Success => style(glyph).green().bold(),
            Marker::Error => style(glyph).red().bold(),
            Marker::Info => style(glyph).cyan(),
            Marker::Warning => style(glyph).yellow().bold(),
            Marker::Skipped => style(glyph).dim(),
        }
    }
}

pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn plain(&self, message: impl AsRef<str>) {
        self.log(Marker::Plain, message.as_ref());
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.log(Marker::Success, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Marker::Error, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Marker::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(Marker::Warning, message.as_ref());
    }

    pub fn skipped(&self, message: impl AsRef<str>) {
        self.log(Marker::Skipped, message.as_ref());
    }

    pub fn log(&self, marker: Marker, message: &str) {
        if let Err(e) = self.append(marker, message) {
            tracing::debug!("Could not write journal {}: {}", self.path.display(), e);
        }

        match marker {
            Marker::Plain => println!("  {}", message),
            Marker::Skipped => println!("  {} {}", marker.styled(), style(message).dim()),
            _ => println!("  {} {}", marker.styled(), message),
        }
    }

    fn append(&self, marker: Marker, message: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(marker, message, chrono::Local::now()))
    }
}

fn format_line(marker: Marker, message: &str, at: chrono::DateTime<chrono::Local>) -> String {
    let timestamp = at.format("%Y-%m-%d %H:%M:%S");
    // Strip ANSI styling so the file stays plain text.
    let message = console::strip_ansi_codes(message);
    match marker {
        Marker::Plain => format!("{} - {}", timestamp, message),
        _ => format!("{} - {} {}", timestamp, marker.glyph(), message),
    }
}
