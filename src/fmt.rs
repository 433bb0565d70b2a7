use std::io::{self, Write};

use thiserror::Error;

use crate::ast::{self, Program};
use crate::isa::{CmpOperandKind, Opcode};

/// Trait for displaying card scripts in mnemonic form.
///
/// Unlike [`std::fmt::Display`], this has access to the indentation level, which is what
/// makes it possible to format nested blocks.
pub trait Format {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result;
}

//==============================================================================

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(#[from] io::Error);

//==============================================================================

pub use formatter::{Formatter};
mod formatter {
    use super::*;

    /// Width of one level of indentation.
    pub const INDENT: usize = 4;

    /// Type that is primarily responsible for managing indentation.
    pub struct Formatter<W: io::Write> {
        // This is an Option only so that `into_inner` can remove it.
        writer: Option<W>,
        pending_data: bool,
        line_buffer: Vec<u8>,
        indent: usize,
    }

    /// If a partially-written line has not yet been committed through a call to
    /// [`Formatter::next_line`], it will be written on drop, and errors will be ignored.
    impl<W: io::Write> Drop for Formatter<W> {
        fn drop(&mut self) {
            let _ = self._flush_incomplete_line();
        }
    }

    impl<W: io::Write> Formatter<W> {
        /// Construct a new [`Formatter`] for writing at an initial indent level of 0.
        pub fn new(writer: W) -> Self {
            Self {
                writer: Some(writer),
                pending_data: false,
                line_buffer: vec![],
                indent: 0,
            }
        }

        /// Start every line some number of levels in, e.g. to nest a listing inside a report.
        pub fn with_initial_indent(mut self, levels: usize) -> Self {
            assert!(!self.pending_data, "Attempted to change indent mid-line. This is a bug!");
            self.indent = levels * INDENT;
            self.line_buffer.resize(self.indent, b' ');
            self
        }

        /// Recover the wrapped `io::Write` object.
        ///
        /// **Important:** If the last line has not yet been written by calling
        /// [`Formatter::next_line`], it will attempt to write this data now.
        /// This can fail.
        pub fn into_inner(mut self) -> Result<W> {
            self._flush_incomplete_line()?;
            Ok(self.writer.take().expect("writer is only taken by into_inner"))
        }

        fn _flush_incomplete_line(&mut self) -> Result {
            if self.pending_data {
                if let Some(writer) = self.writer.as_mut() {
                    writer.write_all(&self.line_buffer)?;
                }
                self.pending_data = false;
            }
            Ok(())
        }
    }

    impl<W: io::Write> Formatter<W> {
        /// Convenience method that calls [`Format::fmt`].
        pub fn fmt<T: Format>(&mut self, x: T) -> Result { x.fmt(self) }

        /// Increases the indent level.
        ///
        /// Panics if not at the beginning of a line.
        pub fn indent(&mut self) -> Result { self._add_indent(INDENT as isize) }

        /// Decreases the indent level.
        ///
        /// Panics if not at the beginning of a line, or if an attempt is made to dedent beyond the
        /// left margin.
        pub fn dedent(&mut self) -> Result { self._add_indent(-(INDENT as isize)) }

        /// Output a line and start a new one at the same indent level.
        pub fn next_line(&mut self) -> Result {
            self.pending_data = false;
            self.line_buffer.push(b'\n');
            if let Some(writer) = self.writer.as_mut() {
                writer.write_all(&self.line_buffer)?;
            }
            self.line_buffer.clear();
            self.line_buffer.resize(self.indent, b' ');
            Ok(())
        }

        // ---------------------

        /// Appends a string to the current (not yet written) line.
        pub(super) fn append_to_line(&mut self, bytes: &[u8]) -> Result {
            // Catch accidental use of "\n" in output strings where next_line() should be used.
            assert!(!bytes.contains(&b'\n'), "Tried to append newline to line. This is a bug!");
            self.pending_data = true;
            self.line_buffer.extend_from_slice(bytes);
            Ok(())
        }

        /// Append to the current (not yet written) line using [`std::fmt::Display`].
        pub(super) fn append_display_to_line(&mut self, x: impl std::fmt::Display) -> Result {
            self.pending_data = true;
            write!(&mut self.line_buffer, "{}", x)?;
            Ok(())
        }

        fn _add_indent(&mut self, delta: isize) -> Result {
            let new_indent = self.indent as isize + delta;
            assert!(!self.pending_data, "Attempted to change indent mid-line. This is a bug!");
            assert!(new_indent >= 0, "Attempted to dedent past 0. This is a bug!");

            self.indent = new_indent as usize;
            self.line_buffer.resize(self.indent, b' ');
            Ok(())
        }
    }
}

/// Format something into a `String`.
pub fn stringify<T: Format + ?Sized>(value: &T) -> String {
    let mut f = Formatter::new(vec![]);
    // writing to a Vec cannot fail
    let _ = f.fmt(value);
    let bytes = f.into_inner().unwrap_or_default();
    // everything we write comes from &str and Display
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Render a whole program as lines of mnemonic text, ending with `END`.
pub fn format_program(program: &Program) -> Vec<String> {
    stringify(program).lines().map(String::from).collect()
}

//==============================================================================

// Base impls: To write arbitrary text, use a string type.
impl Format for str {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        out.append_to_line(self.as_ref())
    }
}
impl Format for String {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        out.append_to_line(self.as_ref())
    }
}

// Use `format_args!` to delegate to a `std::fmt` trait.
impl Format for std::fmt::Arguments<'_> {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        out.append_display_to_line(self)
    }
}

// Forwarded impls
impl<T: Format + ?Sized> Format for &T {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        Format::fmt(&**self, out)
    }
}

// Tuples concatenate their arguments.
macro_rules! impl_tuple_format {
    ($($a:ident:$A:ident),*) => {
        impl<$($A: Format),*> Format for ( $($A),* ) {
            fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
                let ( $($a),* ) = self;
                $( Format::fmt($a, out)?; )*
                Ok(())
            }
        }
    }
}

impl_tuple_format!(a:A, b:B);
impl_tuple_format!(a:A, b:B, c:C);
impl_tuple_format!(a:A, b:B, c:C, d:D);
impl_tuple_format!(a:A, b:B, c:C, d:D, e:E);
impl_tuple_format!(a:A, b:B, c:C, d:D, e:E, f:F);
impl_tuple_format!(a:A, b:B, c:C, d:D, e:E, f:F, g:G);

//==============================================================================
// Program

impl Format for Program {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        for stmt in &self.top_level {
            out.fmt(stmt)?;
        }
        out.fmt(Opcode::End)?;
        out.next_line()
    }
}

impl Format for ast::TopLevelStmt {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        match self {
            ast::TopLevelStmt::Stmt(stmt) => out.fmt(stmt),
            ast::TopLevelStmt::When(when) => out.fmt(when),
        }
    }
}

impl Format for ast::StmtWhen {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        out.fmt((Opcode::When, " ", self.event))?;
        out.next_line()?;
        fmt_block(out, &self.body)?;
        out.fmt(Opcode::EndWhen)?;
        out.next_line()
    }
}

fn fmt_block<W: Write>(out: &mut Formatter<W>, block: &[ast::Stmt]) -> Result {
    out.indent()?;
    for stmt in block {
        out.fmt(stmt)?;
    }
    out.dedent()
}

/// Each statement writes its own trailing newline, since conditionals span several lines.
impl Format for ast::Stmt {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        use ast::StmtKind as K;

        match &self.kind {
            &K::Damage { target, amount } => out.fmt((Opcode::Damage, " ", target, " ", amount))?,
            &K::Heal { target, amount } => out.fmt((Opcode::Heal, " ", target, " ", amount))?,
            &K::BuffStat { target, stat, amount } => out.fmt((Opcode::BuffStat, " ", target, " ", stat, " ", amount))?,
            &K::DebuffStat { target, stat, amount } => out.fmt((Opcode::DebuffStat, " ", target, " ", stat, " ", amount))?,
            &K::Draw { amount } => out.fmt((Opcode::Draw, " ", amount))?,
            &K::Discard { amount } => out.fmt((Opcode::Discard, " ", amount))?,
            &K::CreateToken { amount } => out.fmt((Opcode::CreateToken, " ", amount))?,
            &K::Destroy { target } => out.fmt((Opcode::Destroy, " ", target))?,
            K::If(cond) => return out.fmt(cond),
        }
        out.next_line()
    }
}

impl Format for ast::StmtIf {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        out.fmt((Opcode::If, " ", self.cmp, " ", self.lhs, " ", self.rhs))?;
        out.next_line()?;
        fmt_block(out, &self.then_branch)?;
        if let Some(else_branch) = &self.else_branch {
            out.fmt(Opcode::Else)?;
            out.next_line()?;
            fmt_block(out, else_branch)?;
        }
        out.fmt(Opcode::EndIf)?;
        out.next_line()
    }
}

impl Format for ast::CmpOperand {
    fn fmt<W: Write>(&self, out: &mut Formatter<W>) -> Result {
        match *self {
            ast::CmpOperand::Imm { value } => out.fmt((CmpOperandKind::Imm, " ", value)),
            ast::CmpOperand::StatOf { target, stat } => out.fmt((CmpOperandKind::StatOf, " ", target, " ", stat)),
        }
    }
}
