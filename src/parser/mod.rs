// Author: Dustin Pilgrim
// License: MIT

use crate::IclError;
use crate::ast::{Document, Position};
use crate::lexer::{Lexer, Token, TokenKind};

mod document;
mod value;

/// Recursive descent parser with one token of lookahead.
///
/// Parse functions start with `cur` on the first token of their construct and
/// leave it on the last one. Errors are collected rather than returned so a
/// single pass reports everything wrong with a document.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
    errors: Vec<IclError>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let cur = next_significant(&mut lexer);
        let peek = next_significant(&mut lexer);
        Self {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    /// Consume the whole token stream. Malformed statements are skipped and
    /// reported through [`Parser::errors`].
    pub fn parse(&mut self) -> Document {
        document::parse_document(self)
    }

    pub fn errors(&self) -> &[IclError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<IclError> {
        self.errors
    }

    pub(crate) fn bump(&mut self) {
        let next = next_significant(&mut self.lexer);
        self.cur = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn cur(&self) -> &Token {
        &self.cur
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.peek
    }

    pub(crate) fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    pub(crate) fn cur_pos(&self) -> Position {
        Position::new(self.cur.line, self.cur.column)
    }

    /// Advance onto the next token if it has the expected kind, otherwise
    /// record an error against it and stay put.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.bump();
            return true;
        }
        let found = self.peek.clone();
        self.unexpected(&kind.to_string(), &found);
        false
    }

    /// Record that `found` is not what the grammar needed here.
    pub(crate) fn unexpected(&mut self, expected: &str, found: &Token) {
        let error = match found.kind {
            TokenKind::Illegal => illegal_token_error(found),
            _ => IclError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.kind.to_string(),
                line: found.line,
                column: found.column,
            },
        };
        self.push_error(error);
    }

    pub(crate) fn push_error(&mut self, error: IclError) {
        tracing::debug!(%error, "parse error");
        self.errors.push(error);
    }

    /// Skip the rest of the current line, stopping before a `}` so an
    /// enclosing block can still close.
    pub(crate) fn synchronize(&mut self) {
        let line = self.cur.line;
        while !self.peek_is(TokenKind::Eof)
            && !self.peek_is(TokenKind::RBrace)
            && self.peek.line == line
        {
            self.bump();
        }
    }
}

/// Comments are scanned as tokens but carry no meaning for the grammar.
fn next_significant(lexer: &mut Lexer) -> Token {
    loop {
        let token = lexer.next_token();
        if !token.is(TokenKind::Comment) {
            return token;
        }
    }
}

pub(crate) fn illegal_token_error(token: &Token) -> IclError {
    if token.literal.starts_with('"') {
        IclError::UnterminatedString {
            line: token.line,
            column: token.column,
        }
    } else {
        IclError::IllegalCharacter {
            character: token.literal.chars().next().unwrap_or('\0'),
            line: token.line,
            column: token.column,
        }
    }
}

/// Parse `input`, failing with every recorded error if there were any.
pub fn parse(input: &str) -> Result<Document, IclError> {
    let mut parser = Parser::new(input);
    let document = parser.parse();
    if parser.errors.is_empty() {
        Ok(document)
    } else {
        Err(IclError::Syntax {
            errors: parser.into_errors(),
        })
    }
}
