use super::*;
use crate::ast::{Assignment, Block, BlockBody, Node, Parameter};

pub(super) fn parse_document(parser: &mut Parser) -> Document {
    let mut nodes = Vec::new();

    while !parser.cur_is(TokenKind::Eof) {
        if let Some(stmt) = parse_statement(parser) {
            nodes.push(stmt);
        }
        parser.bump();
    }

    Document { nodes }
}

/// An identifier followed by `=` is an assignment; followed by parameters
/// and/or `{` it is a block. Anything else is reported and its line skipped.
pub(super) fn parse_statement(parser: &mut Parser) -> Option<Node> {
    if !parser.cur_is(TokenKind::Ident) {
        let found = parser.cur().clone();
        parser.unexpected("IDENT", &found);
        parser.synchronize();
        return None;
    }

    let stmt = match parser.peek().kind {
        TokenKind::Assign => parse_assignment(parser),
        TokenKind::String | TokenKind::Ident | TokenKind::LBrace => parse_block(parser),
        _ => {
            let found = parser.peek().clone();
            parser.unexpected("=", &found);
            None
        }
    };

    if stmt.is_none() {
        parser.synchronize();
    }
    stmt
}

fn parse_assignment(parser: &mut Parser) -> Option<Node> {
    let name = parser.cur().literal.clone();
    let pos = parser.cur_pos();

    parser.bump(); // onto '='
    parser.bump(); // onto the value

    let value = value::parse_expression(parser)?;

    Some(Node::Assignment(Assignment {
        name,
        pos,
        value: Box::new(value),
    }))
}

fn parse_block(parser: &mut Parser) -> Option<Node> {
    let key = parser.cur().literal.clone();
    let pos = parser.cur_pos();
    let mut parameters = Vec::new();

    while parser.peek_is(TokenKind::String) || parser.peek_is(TokenKind::Ident) {
        parser.bump();
        parameters.push(Parameter {
            value: parser.cur().literal.clone(),
            pos: parser.cur_pos(),
        });
    }

    if !parser.expect_peek(TokenKind::LBrace) {
        return None;
    }

    let body = parse_block_body(parser)?;

    Some(Node::Block(Block {
        key,
        pos,
        parameters,
        body,
    }))
}

/// Statements up to the matching `}`. Leaves the cursor on the `}`.
fn parse_block_body(parser: &mut Parser) -> Option<BlockBody> {
    let mut statements = Vec::new();
    parser.bump(); // past '{'

    while !parser.cur_is(TokenKind::RBrace) {
        if parser.cur_is(TokenKind::Eof) {
            let found = parser.cur().clone();
            parser.unexpected("}", &found);
            return None;
        }

        if let Some(stmt) = parse_statement(parser) {
            statements.push(stmt);
        }
        parser.bump();
    }

    Some(BlockBody { statements })
}
