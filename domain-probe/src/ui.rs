//! Terminal rendering for domain-probe.
//!
//! Maps the library's semantic output levels onto console styles and hands
//! the spinner a stdout sink when the terminal can show one. Uses only the
//! `console` crate.

use console::{style, Term};
use domain_probe_lib::{Level, ProgressSink, Reporter};

/// Prompt shown before each line of interactive input.
pub const PROMPT: &str = "Enter the domain or subdomain to check (type 'exit' to quit): ";

/// Printed once when the program stops accepting input.
pub const FAREWELL: &str = "Exiting the program...";

/// [`Reporter`] that writes styled lines to stdout.
pub struct ConsoleReporter {
    term: Term,
    progress: bool,
}

impl ConsoleReporter {
    /// `progress` enables the spinner; it is ignored when stdout is not a terminal.
    pub fn new(progress: bool) -> Self {
        let term = Term::stdout();
        let progress = progress && term.is_term();
        Self { term, progress }
    }

    pub fn prompt(&self) {
        let _ = self.term.write_str(PROMPT);
        let _ = self.term.flush();
    }
}

/// Apply the colour for a level. Plain text is left untouched.
pub fn render(level: Level, message: &str) -> String {
    match level {
        Level::Plain => message.to_string(),
        Level::Info => style(message).yellow().to_string(),
        Level::Success => style(message).green().to_string(),
        Level::Error => style(message).red().to_string(),
    }
}

impl Reporter for ConsoleReporter {
    fn emit(&self, level: Level, message: &str) {
        // The spinner may be mid-line; start from a clean line.
        if self.progress {
            let _ = self.term.clear_line();
        }
        let _ = self.term.write_line(&render(level, message));
    }

    fn progress_sink(&self) -> Option<ProgressSink> {
        if !self.progress {
            return None;
        }
        Some(ProgressSink {
            writer: Box::new(Term::stdout()),
            message: style("Please wait...").dim().to_string(),
            done: style("Done!").green().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_is_unstyled() {
        assert_eq!(render(Level::Plain, "example.com. 300 IN A 1.2.3.4"), "example.com. 300 IN A 1.2.3.4");
    }

    #[test]
    fn test_styled_levels_keep_text() {
        for level in [Level::Info, Level::Success, Level::Error] {
            let rendered = render(level, "hello");
            assert!(rendered.contains("hello"));
        }
    }

    #[test]
    fn test_reporter_without_terminal_has_no_spinner() {
        // Test harness stdout is captured, never a terminal.
        let out = ConsoleReporter::new(true);
        if !Term::stdout().is_term() {
            assert!(out.progress_sink().is_none());
        }
        assert!(ConsoleReporter::new(false).progress_sink().is_none());
    }
}
