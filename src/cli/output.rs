//! Colored terminal output.
//!
//! Status lines go to stdout, warnings and errors to stderr. Color is only
//! used when the stream is a terminal.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes user-facing status messages.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Create a new output manager.
    ///
    /// `quiet` suppresses everything except errors; `verbose` enables
    /// [`OutputManager::verbose`] lines.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether verbose lines are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Plain status line.
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Stream::Stdout, None, "", message)
    }

    /// Progress line for a step that is starting.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Stream::Stdout, Some(Color::Cyan), "→ ", message)
    }

    /// Success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Stream::Stdout, Some(Color::Green), "✓ ", message)
    }

    /// Warning line.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Stream::Stderr, Some(Color::Yellow), "warning: ", message)
    }

    /// Error line; printed even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_line(Stream::Stderr, Some(Color::Red), "Error: ", message)
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Stream::Stdout, None, "  ", message)
    }

    /// Detail line shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        self.write_line(Stream::Stdout, Some(Color::Blue), "  ", message)
    }

    fn write_line(
        &self,
        stream: Stream,
        color: Option<Color>,
        prefix: &str,
        message: &str,
    ) -> io::Result<()> {
        let mut out = match stream {
            Stream::Stdout => StandardStream::stdout(color_choice(io::stdout().is_terminal())),
            Stream::Stderr => StandardStream::stderr(color_choice(io::stderr().is_terminal())),
        };

        if let Some(color) = color {
            out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
            write!(out, "{}", prefix)?;
            out.reset()?;
        } else {
            write!(out, "{}", prefix)?;
        }
        writeln!(out, "{}", message)?;
        out.flush()
    }
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
