#[macro_use]
mod util_macros;

pub use pos::{Span, Sp};
#[macro_use]
pub mod pos;

pub use error::{AsmError, DecodeError, ParseError, SelfCheckError, SemanticError};
pub mod error;
pub mod diagnostic;

pub use isa::{Amount, CmpOperandKind, Comparator, EventKind, Imm, Opcode, Stat, Target};
pub mod isa;

pub use token::{Token, TokenKind};
pub mod token;

pub use ast::{Program, Visit};
pub mod ast;

pub use fmt::{Format, Formatter};
pub mod fmt;

pub use decode::{decode, Decoded, DecoderConfig};
pub mod decode;

pub mod encode;

pub use parse::{parse, Parsed};
pub mod parse;

pub mod passes;

pub use asm::{assemble, assemble_with, Assembled, AssemblerConfig};
pub mod asm;

pub use api::{check, disassemble, validate, Disassembly, Stage, Validity};
pub mod api;

#[doc(hidden)]
pub mod cli_helper;
#[doc(hidden)]
pub mod cli_def;
