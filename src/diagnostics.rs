//! Diagnostics: two severities, a collector, and terminal rendering.

use std::io::Write;
use termcolor::{Color, ColorSpec, WriteColor};

/// Severity of a diagnostic. The generator knows only hard per-class errors
/// and informational notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The class is rejected; no output is produced for it.
    Error,
    /// Informational.
    Note,
}

/// A single reported diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Fully-qualified name of the class the diagnostic is attached to, when
    /// it concerns one class.
    pub class: Option<String>,
    pub message: String,
}

/// Accumulates diagnostics for one generation run.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error attached to a class.
    pub fn error(&mut self, class: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            class: Some(class.into()),
            message: message.into(),
        });
    }

    /// Report an informational note.
    pub fn note(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Note,
            class: None,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Render one diagnostic to a colored stream as `error: ...` / `note: ...`.
pub fn render_diagnostic(diagnostic: &Diagnostic, out: &mut impl WriteColor) -> std::io::Result<()> {
    let (label, color) = match diagnostic.severity {
        Severity::Error => ("error", Color::Red),
        Severity::Note => ("note", Color::Cyan),
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label}")?;
    out.reset()?;
    writeln!(out, ": {}", diagnostic.message)?;
    Ok(())
}
