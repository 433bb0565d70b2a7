//! Rendering errors from every phase for people to read.

use codespan_reporting as cs;
use cs::files::SimpleFile;
use cs::term::termcolor::{self as tc, WriteColor};

use crate::asm::Assembled;
use crate::error::{AsmError, DecodeError, ParseError, SelfCheckError, SemanticError};

pub type Diagnostic = cs::diagnostic::Diagnostic<()>;
pub type Label = cs::diagnostic::Label<()>;

lazy_static::lazy_static! {
    static ref TERM_CONFIG: cs::term::Config = {
        let mut config = cs::term::Config::default();
        // Make output closer to rustc. Fewer colors overall, looks better.
        config.styles.primary_label_error.set_intense(true);
        config.styles.secondary_label.set_intense(true);
        config.styles.line_number.set_intense(true);
        config.styles.source_border.set_intense(true);
        config
    };
}

/// Conversion of a phase error into a [`Diagnostic`].
pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}

fn pc_note(pc: Option<usize>) -> Vec<String> {
    match pc {
        Some(pc) => vec![format!("at byte offset {}", pc)],
        None => vec![],
    }
}

impl ToDiagnostic for DecodeError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error()
            .with_message(format!("decode error: {}", self))
            .with_notes(pc_note(self.pc()))
    }
}

impl ToDiagnostic for ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error()
            .with_message(format!("parse error: {}", self))
            .with_notes(pc_note(self.pc()))
    }
}

impl ToDiagnostic for SelfCheckError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error()
            .with_message(self.to_string())
            .with_notes(pc_note(self.pc()))
    }
}

/// Advisory only, so these are warnings.
impl ToDiagnostic for SemanticError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning()
            .with_message(self.message())
            .with_notes(pc_note(Some(self.pc)))
    }
}

impl ToDiagnostic for AsmError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut notes = vec![];
        if let Some(suggestion) = self.kind.suggestion() {
            notes.push(format!("did you mean '{}'?", suggestion));
        }
        Diagnostic::error()
            .with_message(self.kind.to_string())
            .with_labels(vec![Label::primary((), self.span.range())])
            .with_notes(notes)
    }
}

/// A semantic error in a program that was just assembled, pointed at the line it came from.
pub fn semantic_in_source(err: &SemanticError, assembled: &Assembled) -> Diagnostic {
    label_pc(err.to_diagnostic(), Some(err.pc), assembled)
}

/// Same as [`semantic_in_source`], for a failure to read the assembled program back in.
pub fn self_check_in_source(err: &SelfCheckError, assembled: &Assembled) -> Diagnostic {
    label_pc(err.to_diagnostic(), err.pc(), assembled)
}

fn label_pc(diag: Diagnostic, pc: Option<usize>, assembled: &Assembled) -> Diagnostic {
    match pc.and_then(|pc| assembled.span_at_pc(pc)) {
        Some(span) => diag.with_labels(vec![Label::primary((), span.range())]),
        None => diag,
    }
}

// =============================================================================

enum Sink {
    Stderr(tc::StandardStream),
    Capture(tc::Buffer),
}

/// Writes diagnostics for one source file.
///
/// Bytecode has no text to point into, so its diagnostics should have no labels, and an
/// emitter for it is built with an empty source.
pub struct Emitter {
    file: SimpleFile<String, String>,
    sink: Sink,
    errors: usize,
    warnings: usize,
}

impl Emitter {
    /// Emit to the standard error stream, with color if it is a terminal.
    pub fn stderr(name: impl Into<String>, source: impl Into<String>) -> Self {
        let choice = if atty::is(atty::Stream::Stderr) { tc::ColorChoice::Auto } else { tc::ColorChoice::Never };
        Self::with_sink(name, source, Sink::Stderr(tc::StandardStream::stderr(choice)))
    }

    /// Emit into an uncolored in-memory buffer, which can be read back with [`Emitter::captured`].
    pub fn capture(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::with_sink(name, source, Sink::Capture(tc::Buffer::no_color()))
    }

    fn with_sink(name: impl Into<String>, source: impl Into<String>, sink: Sink) -> Self {
        Emitter { file: SimpleFile::new(name.into(), source.into()), sink, errors: 0, warnings: 0 }
    }

    pub fn emit(&mut self, diag: &Diagnostic) -> Result<(), cs::files::Error> {
        match diag.severity {
            cs::diagnostic::Severity::Bug | cs::diagnostic::Severity::Error => self.errors += 1,
            cs::diagnostic::Severity::Warning => self.warnings += 1,
            _ => {},
        }
        let writer: &mut dyn WriteColor = match &mut self.sink {
            Sink::Stderr(stream) => stream,
            Sink::Capture(buffer) => buffer,
        };
        cs::term::emit(writer, &*TERM_CONFIG, &self.file, diag)
    }

    pub fn emit_all<'e, E: ToDiagnostic + 'e>(&mut self, errors: impl IntoIterator<Item=&'e E>) -> Result<(), cs::files::Error> {
        for err in errors {
            self.emit(&err.to_diagnostic())?;
        }
        Ok(())
    }

    pub fn error_count(&self) -> usize { self.errors }
    pub fn warning_count(&self) -> usize { self.warnings }

    /// Everything emitted so far, if this is a capturing emitter.
    pub fn captured(&self) -> Option<String> {
        match &self.sink {
            Sink::Capture(buffer) => Some(String::from_utf8_lossy(buffer.as_slice()).into_owned()),
            Sink::Stderr(_) => None,
        }
    }
}
