//! Terminal emitter.
//!
//! Human-readable diagnostic output with optional ANSI color support.

use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Severity};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean based on terminal detection.
    ///
    /// For `Auto` mode, `is_tty` determines whether colors should be used;
    /// the parameter is ignored for `Always` and `Never`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer: io::stderr(),
            colors: mode.should_use_colors(is_tty),
        }
    }
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    fn color(&self, code: &'static str) -> &'static str {
        if self.colors {
            code
        } else {
            ""
        }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        self.color(match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        })
    }

    /// Render one diagnostic against its source text.
    ///
    /// `file` is the display name used in the `-->` location line.
    pub fn emit(&mut self, diag: &Diagnostic, source: &str, file: &str) -> io::Result<()> {
        let table = LineOffsetTable::build(source);
        let reset = self.color(colors::RESET);
        let bold = self.color(colors::BOLD);

        writeln!(
            self.writer,
            "{}{}[{}]{reset}{bold}: {}{reset}",
            self.severity_color(diag.severity),
            diag.severity,
            diag.code,
            diag.message,
        )?;

        for label in &diag.labels {
            let (line, col) = table.offset_to_line_col(source, label.span.start);
            let arrow = self.color(colors::SECONDARY);
            writeln!(self.writer, "  {arrow}-->{reset} {file}:{line}:{col}")?;

            if let Some(start) = table.line_start_offset(line) {
                let start = start as usize;
                let text = source[start..].lines().next().unwrap_or("");
                let gutter = self.color(colors::SECONDARY);
                writeln!(self.writer, "{gutter}{line:>4} |{reset} {text}")?;

                let underline_start = (col - 1) as usize;
                let span_len = label.span.len().max(1) as usize;
                let caret = if label.is_primary { "^" } else { "-" };
                let caret_color = if label.is_primary {
                    self.severity_color(diag.severity)
                } else {
                    self.color(colors::SECONDARY)
                };
                writeln!(
                    self.writer,
                    "{gutter}     |{reset} {:indent$}{caret_color}{}{reset} {}",
                    "",
                    caret.repeat(span_len.min(text.len().saturating_sub(underline_start).max(1))),
                    label.message,
                    indent = underline_start,
                )?;
            }
        }

        for note in &diag.notes {
            writeln!(self.writer, "  = note: {note}")?;
        }
        writeln!(self.writer)?;

        Ok(())
    }

    /// Render a batch of diagnostics followed by a summary line.
    pub fn emit_all(&mut self, diags: &[Diagnostic], source: &str, file: &str) -> io::Result<()> {
        for diag in diags {
            self.emit(diag, source, file)?;
        }
        let errors = diags.iter().filter(|d| d.is_error()).count();
        if errors > 0 {
            writeln!(
                self.writer,
                "{}error{}: could not parse `{file}` due to {errors} previous error{}",
                self.color(colors::ERROR),
                self.color(colors::RESET),
                if errors == 1 { "" } else { "s" },
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use vireo_ir::Span;

    fn render(diag: &Diagnostic, source: &str) -> String {
        let mut buf = Vec::new();
        {
            let mut emitter =
                TerminalEmitter::with_color_mode(&mut buf, ColorMode::Never, false);
            emitter
                .emit(diag, source, "test.js")
                .unwrap_or_else(|e| panic!("{e}"));
        }
        String::from_utf8(buf).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_emit_plain() {
        let source = "let x = ;\n";
        let diag = Diagnostic::error(ErrorCode::E1002)
            .with_message("expected expression, found ';'")
            .with_label(Span::new(8, 9), "expected expression here");

        let output = render(&diag, source);
        assert!(output.contains("error[E1002]"));
        assert!(output.contains("test.js:1:9"));
        assert!(output.contains("let x = ;"));
        assert!(output.contains('^'));
    }

    #[test]
    fn test_emit_second_line() {
        let source = "ok();\nbad bad\n";
        let diag = Diagnostic::error(ErrorCode::E1001)
            .with_message("unexpected token")
            .with_label(Span::new(10, 13), "here");

        let output = render(&diag, source);
        assert!(output.contains("test.js:2:5"));
        assert!(output.contains("bad bad"));
    }

    #[test]
    fn test_color_mode() {
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
    }
}
