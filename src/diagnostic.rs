//! Rich diagnostic error messages, extended with the stage/sink machinery
//! `spec.md` §6–§7 describe: a stage tag, a suggestion, a sample solution
//! drawn from a static lookup table, and a sink that writes both to stderr
//! and to `debug_log.log`.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;

/// A span in the source code (byte offsets).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A label attached to a span with a message.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into(), is_primary: true }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into(), is_primary: false }
    }
}

/// Which pipeline stage produced a diagnostic, per the error-handling design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
    Semantic,
    Interpreting,
    Compiling,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Lexical => "Lexical",
            Stage::Syntax => "Syntax",
            Stage::Semantic => "Semantic",
            Stage::Interpreting => "Interpreting",
            Stage::Compiling => "Compiling",
        };
        write!(f, "{s}")
    }
}

/// A source location for a diagnostic (file, path, line, column).
#[derive(Debug, Clone, Default)]
pub struct Location {
    pub file: String,
    pub path: String,
    pub line: usize,
    pub column: usize,
}

/// A rich diagnostic with source context, a stage tag, and remediation hints.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
    pub source: String,
    pub location: Location,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Vec<String>,
    pub expected: Option<String>,
    pub sample_solution: Option<String>,
}

impl Diagnostic {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            source: String::new(),
            location: Location::default(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
            expected: None,
            sample_solution: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Attach a sample solution looked up from [`sample_solution_for`] by
    /// message substring, if one exists.
    pub fn with_sample_solution_lookup(mut self) -> Self {
        self.sample_solution = sample_solution_for(&self.message).map(str::to_string);
        self
    }

    fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for (i, ch) in self.source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    fn get_line(&self, line_num: usize) -> &str {
        self.source.lines().nth(line_num.saturating_sub(1)).unwrap_or("")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- DEBUG ---")?;
        writeln!(f, "stage: {}", self.stage)?;
        if !self.location.path.is_empty() {
            writeln!(
                f,
                "at {}:{}:{}",
                self.location.path, self.location.line, self.location.column
            )?;
        }
        writeln!(f, "error: {}", self.message)?;

        if !self.source.is_empty() {
            for label in &self.labels {
                let (line, col) = self.offset_to_line_col(label.span.start);
                let content = self.get_line(line);
                writeln!(f, "{line:>4} | {content}")?;
                let marker = if label.is_primary { '^' } else { '-' };
                let underline_len = (label.span.end - label.span.start).max(1);
                writeln!(
                    f,
                    "     | {}{}",
                    " ".repeat(col.saturating_sub(1)),
                    marker.to_string().repeat(underline_len)
                )?;
                if !label.message.is_empty() {
                    writeln!(f, "     = {}", label.message)?;
                }
            }
        }

        if let Some(expected) = &self.expected {
            writeln!(f, "  = expected: {expected}")?;
        }
        for note in &self.notes {
            writeln!(f, "  = note: {note}")?;
        }
        for help in &self.help {
            writeln!(f, "  = help: {help}")?;
        }
        if let Some(sample) = &self.sample_solution {
            writeln!(f, "  = sample: {sample}")?;
        }
        write!(f, "--- END ---")
    }
}

/// Static substring → sample-solution table, per §6's "sample solution
/// drawn from a static lookup table keyed by message substring."
fn sample_solution_for(message: &str) -> Option<&'static str> {
    const TABLE: &[(&str, &str)] = &[
        ("unterminated string", "close the string with a matching quote before the line ends"),
        ("already exists in current scope", "choose a different name, or drop the earlier `var` declaration"),
        ("undefined variable", "declare the variable with `var name = ...;` before using it"),
        ("division by zero", "guard the divisor with an `if` before dividing"),
        ("modulus by zero", "guard the right-hand operand with an `if` before taking the modulus"),
        ("incompatible types", "convert one operand explicitly so both sides share a type"),
        ("missing ';'", "add a semicolon at the end of the statement"),
    ];
    TABLE.iter().find(|(needle, _)| message.contains(needle)).map(|(_, sample)| *sample)
}

/// Where diagnostics go once produced. The default sink matches §6: stderr
/// plus an append-mode `debug_log.log`.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Writes diagnostics to stderr and appends them to `debug_log.log`.
pub struct DebugLogSink {
    log_path: String,
}

impl DebugLogSink {
    pub fn new() -> Self {
        Self { log_path: "debug_log.log".to_string() }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self { log_path: path.into() }
    }
}

impl Default for DebugLogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for DebugLogSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        eprintln!("{diagnostic}");
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.log_path) {
            let _ = writeln!(file, "{diagnostic}\n");
        }
    }
}

/// A sink that only collects diagnostics in memory, used by tests and by
/// the scanner/parser while a pass is in progress (§7's non-fatal scanning
/// and panic-mode recovery both need to keep going after recording one).
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub diagnostics: Vec<String>,
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_stage_and_message() {
        let diag = Diagnostic::new(Stage::Lexical, "unterminated string")
            .with_source("\"abc")
            .with_label(Span::new(0, 4), "string starts here")
            .with_help("close the string literal")
            .with_sample_solution_lookup();

        let output = diag.to_string();
        assert!(output.contains("--- DEBUG ---"));
        assert!(output.contains("stage: Lexical"));
        assert!(output.contains("unterminated string"));
        assert!(output.contains("--- END ---"));
        assert!(output.contains("sample:"));
    }

    #[test]
    fn collecting_sink_accumulates() {
        let mut sink = CollectingSink::default();
        sink.report(&Diagnostic::new(Stage::Syntax, "unexpected token"));
        sink.report(&Diagnostic::new(Stage::Syntax, "missing ';'"));
        assert_eq!(sink.diagnostics.len(), 2);
    }
}
