//! Splits assembly text into lines of words.
//!
//! Whitespace other than line breaks is insignificant, so indentation is purely cosmetic.
//! A `;` starts a comment that runs to the end of the line.

use logos::Logos;

use crate::pos::{Sp, Span};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")] Ident(&'a str),
    #[regex(r"[0-9]+|0[xX][0-9a-fA-F]+")] LitInt(&'a str),
    #[regex(r"\r?\n")] Newline,

    #[error]
    #[regex(r"[ \t\f]+", logos::skip)] // whitespace
    #[regex(r";[^\r\n]*", logos::skip)] // line comment
    Error,
}

/// One line of source that contains at least one word.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    /// 1-based.
    pub number: usize,
    pub words: Vec<Sp<Token<'a>>>,
}

impl Line<'_> {
    /// Span from the first word to the last.
    pub fn span(&self) -> Span {
        match (self.words.first(), self.words.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::NULL,
        }
    }
}

/// Lex a whole source text.  Blank and comment-only lines are left out.
///
/// Runs of unrecognized characters come out as [`Token::Error`] words; it is up to the
/// caller to complain about them.
pub fn lines(text: &str) -> Vec<Line<'_>> {
    let mut out = vec![];
    let mut current = Line { number: 1, words: vec![] };

    let mut lexer = Token::lexer(text);
    while let Some(token) = lexer.next() {
        let span = Span::from(lexer.span());
        match token {
            Token::Newline => {
                let number = current.number + 1;
                let done = std::mem::replace(&mut current, Line { number, words: vec![] });
                if !done.words.is_empty() {
                    out.push(done);
                }
            },
            // glue adjacent error characters together so that e.g. `$$$` is one complaint
            Token::Error => match current.words.last_mut() {
                Some(prev) if prev.value == Token::Error && prev.span.end == span.start => {
                    prev.span = prev.span.merge(span);
                },
                _ => current.words.push(sp!(span => token)),
            },
            _ => current.words.push(sp!(span => token)),
        }
    }
    if !current.words.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(line: &Line<'a>) -> Vec<Token<'a>> {
        line.words.iter().map(|w| w.value).collect()
    }

    #[test]
    fn words_and_comments() {
        let lines = lines("; header comment\n\nDAMAGE OPPONENT 3 ; hit them\n    END\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 3);
        assert_eq!(values(&lines[0]), vec![Token::Ident("DAMAGE"), Token::Ident("OPPONENT"), Token::LitInt("3")]);
        assert_eq!(lines[1].number, 4);
        assert_eq!(values(&lines[1]), vec![Token::Ident("END")]);
    }

    #[test]
    fn spans() {
        let text = "DRAW 1\r\n  DESTROY ANY";
        let lines = lines(text);
        assert_eq!(lines[1].number, 2);
        assert_eq!(&text[lines[1].words[1].span.range()], "ANY");
        assert_eq!(&text[lines[1].span().range()], "DESTROY ANY");
    }

    #[test]
    fn bad_characters_are_grouped() {
        let lines = lines("DRAW $$$ 1");
        assert_eq!(values(&lines[0]), vec![Token::Ident("DRAW"), Token::Error, Token::LitInt("1")]);
        assert_eq!(lines[0].words[1].span, Span::new(5, 8));
    }

    #[test]
    fn no_trailing_newline() {
        let lines = lines("END");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 1);
    }
}
