// Author: Dustin Pilgrim
// License: MIT

use std::str::Chars;

mod scanner;
mod token;
mod tokenizer;

pub use token::{Token, TokenKind, lookup_ident};

/// Single pass scanner over the full input. Call [`Lexer::next_token`]
/// until it yields an `Eof` token; every call after that yields `Eof` again.
pub struct Lexer<'a> {
    input: Chars<'a>,
    peek: Option<char>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input: input.chars(),
            peek: None,
            line: 0,
            column: 0,
        };
        lexer.peek = lexer.input.next();
        lexer
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn next_token(&mut self) -> Token {
        tokenizer::next_token(self)
    }
}

/// Scan `input` to completion. The returned stream always ends with `Eof`.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests;
