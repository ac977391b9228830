use super::*;
use super::scanner::{bump, is_ident_char, is_ident_start, peek_second, skip_whitespace};

pub(super) fn next_token(lexer: &mut Lexer) -> Token {
    skip_whitespace(lexer);

    let line = lexer.line;
    let column = lexer.column;

    match lexer.peek {
        Some(',') => tokenize_symbol(lexer, TokenKind::Comma),
        Some(':') => tokenize_symbol(lexer, TokenKind::Colon),
        Some('(') => tokenize_symbol(lexer, TokenKind::LParen),
        Some(')') => tokenize_symbol(lexer, TokenKind::RParen),
        Some('{') => tokenize_symbol(lexer, TokenKind::LBrace),
        Some('}') => tokenize_symbol(lexer, TokenKind::RBrace),
        Some('[') => tokenize_symbol(lexer, TokenKind::LBracket),
        Some(']') => tokenize_symbol(lexer, TokenKind::RBracket),
        Some('=') => tokenize_symbol(lexer, TokenKind::Assign),
        Some('-') => tokenize_symbol(lexer, TokenKind::Minus),
        Some('#') => tokenize_comment(lexer),
        Some('"') => tokenize_string(lexer),
        Some(c) if c.is_ascii_digit() => tokenize_number(lexer),
        Some(c) if is_ident_start(c) => tokenize_identifier_or_keyword(lexer),
        Some(ch) => {
            bump(lexer);
            Token::new(TokenKind::Illegal, ch.to_string(), line, column)
        }
        None => Token::new(TokenKind::Eof, "", line, column),
    }
}

fn tokenize_symbol(lexer: &mut Lexer, kind: TokenKind) -> Token {
    let (line, column) = (lexer.line, lexer.column);
    let literal = bump(lexer).map(String::from).unwrap_or_default();
    Token::new(kind, literal, line, column)
}

fn tokenize_comment(lexer: &mut Lexer) -> Token {
    let (line, column) = (lexer.line, lexer.column);
    let mut content = String::new();

    while let Some(ch) = lexer.peek {
        if ch == '\n' || (ch == '\r' && peek_second(lexer) == Some('\n')) {
            break;
        }
        content.push(ch);
        bump(lexer);
    }

    Token::new(TokenKind::Comment, content, line, column)
}

/// Double quoted strings. `\"` is the only escape; any other backslash is
/// kept as written. Running out of input before the closing quote yields an
/// `Illegal` token holding the opening quote and what was read.
fn tokenize_string(lexer: &mut Lexer) -> Token {
    let (line, column) = (lexer.line, lexer.column);
    bump(lexer); // consume opening quote

    let mut content = String::new();
    loop {
        match bump(lexer) {
            Some('"') => return Token::new(TokenKind::String, content, line, column),
            Some('\\') if lexer.peek == Some('"') => {
                bump(lexer);
                content.push('"');
            }
            Some(ch) => content.push(ch),
            None => {
                return Token::new(TokenKind::Illegal, format!("\"{}", content), line, column);
            }
        }
    }
}

/// Unsigned digit run with an optional fractional part. Signs are the
/// parser's concern.
fn tokenize_number(lexer: &mut Lexer) -> Token {
    let (line, column) = (lexer.line, lexer.column);
    let mut num = String::new();

    read_digits(lexer, &mut num);
    if lexer.peek == Some('.') && peek_second(lexer).is_some_and(|c| c.is_ascii_digit()) {
        num.push('.');
        bump(lexer);
        read_digits(lexer, &mut num);
    }

    Token::new(TokenKind::Number, num, line, column)
}

fn read_digits(lexer: &mut Lexer, buf: &mut String) {
    while let Some(ch) = lexer.peek {
        if !ch.is_ascii_digit() {
            break;
        }
        buf.push(ch);
        bump(lexer);
    }
}

fn tokenize_identifier_or_keyword(lexer: &mut Lexer) -> Token {
    let (line, column) = (lexer.line, lexer.column);
    let mut ident = String::new();

    while let Some(ch) = lexer.peek {
        if !is_ident_char(ch) {
            break;
        }
        ident.push(ch);
        bump(lexer);
    }

    Token::new(lookup_ident(&ident), ident, line, column)
}
