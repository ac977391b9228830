use super::*;
use crate::ast::Node;

type PrefixParser = fn(&mut Parser) -> Option<Node>;

/// The prefix dispatch table: which parse function handles an expression
/// starting with a token of `kind`.
fn prefix_parser(kind: TokenKind) -> Option<PrefixParser> {
    let parser: PrefixParser = match kind {
        TokenKind::Ident => parse_identifier,
        TokenKind::Number => parse_number,
        TokenKind::Minus => parse_negative_number,
        TokenKind::String => parse_string,
        TokenKind::True | TokenKind::False => parse_boolean,
        TokenKind::Null => parse_null,
        TokenKind::LBracket => parse_array,
        TokenKind::LBrace => parse_map,
        _ => return None,
    };
    Some(parser)
}

pub(super) fn parse_expression(parser: &mut Parser) -> Option<Node> {
    match prefix_parser(parser.cur().kind) {
        Some(prefix) => prefix(parser),
        None => {
            let token = parser.cur().clone();
            let error = match token.kind {
                TokenKind::Illegal => illegal_token_error(&token),
                kind => IclError::NoPrefixParser {
                    token: kind.to_string(),
                    line: token.line,
                    column: token.column,
                },
            };
            parser.push_error(error);
            None
        }
    }
}

/// Identifiers, with `env(NAME)` recognised as an environment reference.
fn parse_identifier(parser: &mut Parser) -> Option<Node> {
    if parser.cur().literal == "env" && parser.peek_is(TokenKind::LParen) {
        parser.bump(); // onto '('
        if !parser.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = parser.cur().literal.clone();
        if !parser.expect_peek(TokenKind::RParen) {
            return None;
        }
        return Some(Node::Envar {
            name,
            pos: parser.cur_pos(),
        });
    }

    Some(Node::Identifier {
        name: parser.cur().literal.clone(),
        pos: parser.cur_pos(),
    })
}

fn parse_number(parser: &mut Parser) -> Option<Node> {
    Some(Node::Number {
        text: parser.cur().literal.clone(),
        pos: parser.cur_pos(),
    })
}

fn parse_negative_number(parser: &mut Parser) -> Option<Node> {
    let pos = parser.cur_pos();
    if !parser.expect_peek(TokenKind::Number) {
        return None;
    }
    Some(Node::Number {
        text: format!("-{}", parser.cur().literal),
        pos,
    })
}

fn parse_string(parser: &mut Parser) -> Option<Node> {
    Some(Node::String {
        value: parser.cur().literal.clone(),
        pos: parser.cur_pos(),
    })
}

fn parse_boolean(parser: &mut Parser) -> Option<Node> {
    Some(Node::Boolean {
        value: parser.cur_is(TokenKind::True),
        pos: parser.cur_pos(),
    })
}

fn parse_null(parser: &mut Parser) -> Option<Node> {
    Some(Node::Null {
        pos: parser.cur_pos(),
    })
}

fn parse_array(parser: &mut Parser) -> Option<Node> {
    let mut elements = Vec::new();
    let closed = parse_list(parser, TokenKind::RBracket, |parser| {
        elements.push(parse_expression(parser)?);
        Some(())
    });
    closed.then(|| Node::Array {
        elements,
        pos: parser.cur_pos(),
    })
}

fn parse_map(parser: &mut Parser) -> Option<Node> {
    let mut entries = Vec::new();
    let closed = parse_list(parser, TokenKind::RBrace, |parser| {
        let key = parse_map_key(parser)?;
        if !parser.expect_peek(TokenKind::Colon) {
            return None;
        }
        parser.bump(); // onto the value
        let value = parse_expression(parser)?;
        entries.push((key, value));
        Some(())
    });
    closed.then(|| Node::Map {
        entries,
        pos: parser.cur_pos(),
    })
}

fn parse_map_key(parser: &mut Parser) -> Option<Node> {
    let token = parser.cur().clone();
    let pos = parser.cur_pos();
    match token.kind {
        TokenKind::String => Some(Node::String {
            value: token.literal,
            pos,
        }),
        TokenKind::Ident => Some(Node::Identifier {
            name: token.literal,
            pos,
        }),
        // numbers and other literals still parse so the decoder can report
        // a precise key type error against the target field
        TokenKind::Number | TokenKind::True | TokenKind::False | TokenKind::Null => {
            parse_expression(parser)
        }
        _ => {
            parser.unexpected("map key", &token);
            None
        }
    }
}

/// Comma separated entries up to `close`, trailing comma allowed. Starts on
/// the opening delimiter and ends on `close`. Returns false once an entry
/// fails, after which the list is abandoned.
fn parse_list<F>(parser: &mut Parser, close: TokenKind, mut entry: F) -> bool
where
    F: FnMut(&mut Parser) -> Option<()>,
{
    parser.bump(); // past the opening delimiter
    if parser.cur_is(close) {
        return true;
    }

    loop {
        if entry(parser).is_none() {
            return false;
        }

        if parser.peek_is(TokenKind::Comma) {
            parser.bump(); // onto ','
            if parser.peek_is(close) {
                parser.bump();
                return true;
            }
            parser.bump(); // onto the next entry
            continue;
        }

        return parser.expect_peek(close);
    }
}
