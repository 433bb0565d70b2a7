//! Tokens to program tree.
//!
//! ```text
//! Program      := { TopLevelStmt } END
//! TopLevelStmt := Stmt | WhenBlock
//! WhenBlock    := WHEN { Stmt } ENDWHEN
//! Stmt         := Action | IfBlock
//! IfBlock      := IF { Stmt } [ ELSE { Stmt } ] ENDIF
//! ```
//!
//! The parser recovers from everything.  Errors are collected and it keeps going, so that
//! callers always get as much of the tree as could be built.  Stray block delimiters are
//! dropped without comment; a stray `END` inside a block is reported and dropped.

use crate::ast::{Program, Stmt, StmtIf, StmtKind, StmtWhen, TopLevelStmt};
use crate::error::ParseError;
use crate::isa::Opcode;
use crate::token::{Token, TokenKind};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parsed {
    /// `None` if the token stream ran out before a top-level `END`.
    pub program: Option<Program>,
    pub errors: Vec<ParseError>,
}

impl Parsed {
    pub fn is_ok(&self) -> bool { self.program.is_some() && self.errors.is_empty() }
}

/// Build a program tree out of a token sequence.
pub fn parse(tokens: &[Token]) -> Parsed {
    let mut parser = Parser { tokens, index: 0, errors: vec![] };
    let program = parser.parse_program();
    Parsed { program, errors: parser.errors }
}

struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> { self.tokens.get(self.index) }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        self.index += 1;
        Some(token)
    }

    fn parse_program(&mut self) -> Option<Program> {
        let mut top_level = vec![];

        while let Some(token) = self.peek() {
            match token.opcode() {
                Opcode::End => {
                    self.next();
                    return Some(Program { top_level, end_pc: token.pc });
                },
                // an ENDWHEN that does not close anything
                Opcode::EndWhen => {
                    self.next();
                },
                Opcode::When => {
                    self.next();
                    if let Some(when) = self.parse_when(token) {
                        top_level.push(TopLevelStmt::When(when));
                    }
                },
                _ => {
                    if let Some(stmt) = self.parse_stmt() {
                        top_level.push(TopLevelStmt::Stmt(stmt));
                    }
                },
            }
        }

        self.errors.push(ParseError::MissingTerminator);
        None
    }

    /// Parse statements until the next token is in `stop` (or there are no more tokens).
    /// The stopping token is not consumed.
    fn parse_stmt_seq(&mut self, stop: &[Opcode]) -> Vec<Stmt> {
        let mut seq = vec![];
        while let Some(token) = self.peek() {
            if stop.contains(&token.opcode()) {
                break;
            }
            if let Some(stmt) = self.parse_stmt() {
                seq.push(stmt);
            }
        }
        seq
    }

    /// Consume a token, which is expected to have the given opcode.
    ///
    /// A mismatched token is still consumed.  Returns `None` only at end of input.
    fn expect(&mut self, expected: Opcode) -> Option<&'a Token> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                self.errors.push(ParseError::ExpectedButReachedEnd { expected });
                return None;
            },
        };
        if token.opcode() != expected {
            self.errors.push(ParseError::Expected { expected, found: token.opcode(), pc: token.pc });
        }
        Some(token)
    }

    /// Parse one statement.  Returns `None` for tokens that don't produce a statement.
    fn parse_stmt(&mut self) -> Option<Stmt> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                self.errors.push(ParseError::UnexpectedEndOfInput);
                return None;
            },
        };
        let pc = token.pc;

        let kind = match token.kind {
            TokenKind::Damage { target, amount } => StmtKind::Damage { target, amount },
            TokenKind::Heal { target, amount } => StmtKind::Heal { target, amount },
            TokenKind::BuffStat { target, stat, amount } => StmtKind::BuffStat { target, stat, amount },
            TokenKind::DebuffStat { target, stat, amount } => StmtKind::DebuffStat { target, stat, amount },
            TokenKind::Draw { amount } => StmtKind::Draw { amount },
            TokenKind::Discard { amount } => StmtKind::Discard { amount },
            TokenKind::CreateToken { amount } => StmtKind::CreateToken { amount },
            TokenKind::Destroy { target } => StmtKind::Destroy { target },
            TokenKind::If { .. } => return self.parse_if(token),
            // triggers are only allowed at top level
            TokenKind::When { .. } => return None,
            TokenKind::Else | TokenKind::EndIf | TokenKind::EndWhen => return None,
            TokenKind::End => {
                self.errors.push(ParseError::UnexpectedTerminator { opcode: Opcode::End, pc });
                return None;
            },
        };
        Some(Stmt { pc, kind })
    }

    /// Parse the rest of a conditional whose opening token was already consumed.
    fn parse_if(&mut self, token: &'a Token) -> Option<Stmt> {
        let (cmp, lhs, rhs) = match token.kind {
            TokenKind::If { cmp, lhs, rhs } => (cmp, lhs, rhs),
            _ => {
                self.errors.push(ParseError::MissingComparison { pc: token.pc });
                return None;
            },
        };

        let then_branch = self.parse_stmt_seq(&[Opcode::Else, Opcode::EndIf]);

        let mut else_branch = None;
        if self.peek().map(Token::opcode) == Some(Opcode::Else) {
            self.next();
            else_branch = Some(self.parse_stmt_seq(&[Opcode::EndIf]));
        }

        // keep the block even if it is unterminated
        self.expect(Opcode::EndIf);

        Some(Stmt {
            pc: token.pc,
            kind: StmtKind::If(StmtIf { cmp, lhs, rhs, then_branch, else_branch }),
        })
    }

    /// Parse the rest of a trigger block whose opening token was already consumed.
    fn parse_when(&mut self, token: &'a Token) -> Option<StmtWhen> {
        let event = match token.kind {
            TokenKind::When { event } => event,
            _ => {
                self.errors.push(ParseError::Expected { expected: Opcode::When, found: token.opcode(), pc: token.pc });
                return None;
            },
        };

        let body = self.parse_stmt_seq(&[Opcode::EndWhen]);
        self.expect(Opcode::EndWhen);

        Some(StmtWhen { pc: token.pc, event, body })
    }
}
