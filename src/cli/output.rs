//! Operator-facing terminal output.
//!
//! Status lines are coloured when stdout is a terminal. External tool output
//! never passes through here; it is forwarded unchanged by the stage runner.

use crate::pipeline::{Stage, StageObserver};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "•";
}

/// Coloured status output; detail lines only with `--verbose`.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    stdout_choice: ColorChoice,
    stderr_choice: ColorChoice,
}

impl OutputManager {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            stdout_choice: color_choice(io::stdout().is_terminal()),
            stderr_choice: color_choice(io::stderr().is_terminal()),
        }
    }

    /// Detail shown only with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.line(false, None, symbols::INFO, message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        self.line(false, Some(Color::Green), symbols::SUCCESS, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.line(true, Some(Color::Yellow), symbols::WARNING, message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        self.line(true, Some(Color::Red), symbols::ERROR, message)
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        let mut out = StandardStream::stdout(self.stdout_choice);
        writeln!(out)?;
        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(out, "{title}")?;
        out.reset()
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        let mut out = StandardStream::stdout(self.stdout_choice);
        writeln!(out, "    {message}")
    }

    /// Like [`indent`](Self::indent) but on stderr.
    pub fn indent_err(&self, message: &str) -> io::Result<()> {
        let mut out = StandardStream::stderr(self.stderr_choice);
        writeln!(out, "    {message}")
    }

    fn line(
        &self,
        to_stderr: bool,
        color: Option<Color>,
        symbol: &str,
        message: &str,
    ) -> io::Result<()> {
        let mut out = if to_stderr {
            StandardStream::stderr(self.stderr_choice)
        } else {
            StandardStream::stdout(self.stdout_choice)
        };
        out.set_color(ColorSpec::new().set_fg(color).set_bold(color.is_some()))?;
        write!(out, "{symbol}")?;
        out.reset()?;
        writeln!(out, " {message}")
    }
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

impl StageObserver for OutputManager {
    fn stage_started(&self, stage: Stage) {
        let position = Stage::ALL.iter().position(|s| *s == stage).unwrap_or(0) + 1;
        let _ = self.section(&format!(
            "[{}/{}] {}",
            position,
            Stage::ALL.len(),
            stage.title()
        ));
    }

    fn stage_finished(&self, stage: Stage, elapsed: Duration) {
        let _ = self.success(&format!(
            "{} finished in {}",
            stage.title(),
            format_duration(elapsed)
        ));
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:02}s", secs, millis / 10)
    } else {
        format!("{}ms", millis)
    }
}
