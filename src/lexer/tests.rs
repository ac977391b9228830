#[cfg(test)]
use super::*;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_full_icl_example() {
    let input = r#"
# leading comment
name = "DemoApp"
servers = ["a", "b",]
limits = {cpu: 2, "mem": 512}
app "web" main {
  debug = true
  token = env(TOKEN)
}
"#;

    let mut lexer = Lexer::new(input);

    let expected = vec![
        (TokenKind::Comment, "# leading comment"),
        (TokenKind::Ident, "name"),
        (TokenKind::Assign, "="),
        (TokenKind::String, "DemoApp"),
        (TokenKind::Ident, "servers"),
        (TokenKind::Assign, "="),
        (TokenKind::LBracket, "["),
        (TokenKind::String, "a"),
        (TokenKind::Comma, ","),
        (TokenKind::String, "b"),
        (TokenKind::Comma, ","),
        (TokenKind::RBracket, "]"),
        (TokenKind::Ident, "limits"),
        (TokenKind::Assign, "="),
        (TokenKind::LBrace, "{"),
        (TokenKind::Ident, "cpu"),
        (TokenKind::Colon, ":"),
        (TokenKind::Number, "2"),
        (TokenKind::Comma, ","),
        (TokenKind::String, "mem"),
        (TokenKind::Colon, ":"),
        (TokenKind::Number, "512"),
        (TokenKind::RBrace, "}"),
        (TokenKind::Ident, "app"),
        (TokenKind::String, "web"),
        (TokenKind::Ident, "main"),
        (TokenKind::LBrace, "{"),
        (TokenKind::Ident, "debug"),
        (TokenKind::Assign, "="),
        (TokenKind::True, "true"),
        (TokenKind::Ident, "token"),
        (TokenKind::Assign, "="),
        (TokenKind::Ident, "env"),
        (TokenKind::LParen, "("),
        (TokenKind::Ident, "TOKEN"),
        (TokenKind::RParen, ")"),
        (TokenKind::RBrace, "}"),
        (TokenKind::Eof, ""),
    ];

    for (kind, literal) in expected {
        let tok = lexer.next_token();
        assert_eq!(tok.kind, kind, "token {:?}", tok);
        assert_eq!(tok.literal, literal);
    }
}

#[test]
fn test_positions_are_zero_based() {
    let tokens = tokenize("s = []\n  b = true");

    assert_eq!((tokens[0].line, tokens[0].column), (0, 0));
    assert_eq!((tokens[1].line, tokens[1].column), (0, 2));
    assert_eq!((tokens[2].line, tokens[2].column), (0, 4));
    assert_eq!((tokens[3].line, tokens[3].column), (0, 5));
    assert_eq!((tokens[4].line, tokens[4].column), (1, 2));
    assert_eq!((tokens[6].line, tokens[6].column), (1, 6));
}

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("true false null nullable"),
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
    assert_eq!(lookup_ident("env"), TokenKind::Ident);
}

#[test]
fn test_escaped_quote_is_only_escape() {
    let tokens = tokenize(r#""say \"hi\" \n""#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].literal, r#"say "hi" \n"#);
}

#[test]
fn test_unterminated_string_is_illegal() {
    let tokens = tokenize("s = \"open");
    assert_eq!(tokens[2].kind, TokenKind::Illegal);
    assert_eq!(tokens[2].literal, "\"open");
    assert_eq!(tokens[2].column, 4);
    assert_eq!(tokens[3].kind, TokenKind::Eof);
}

#[test]
fn test_unknown_character_is_illegal() {
    let tokens = tokenize("a = @");
    assert_eq!(tokens[2].kind, TokenKind::Illegal);
    assert_eq!(tokens[2].literal, "@");
}

#[test]
fn test_numbers_and_minus() {
    let tokens = tokenize("-128 3.14 7. 42");
    assert_eq!(tokens[0].kind, TokenKind::Minus);
    assert_eq!(tokens[1].literal, "128");
    assert_eq!(tokens[2].literal, "3.14");
    // a trailing dot is not part of the number
    assert_eq!(tokens[3].literal, "7");
    assert_eq!(tokens[4].kind, TokenKind::Illegal);
    assert_eq!(tokens[5].literal, "42");
}

#[test]
fn test_comment_runs_to_end_of_line() {
    let tokens = tokenize("a = 1 # trailing\r\nb = 2");
    assert_eq!(tokens[3].kind, TokenKind::Comment);
    assert_eq!(tokens[3].literal, "# trailing");
    assert_eq!(tokens[4].literal, "b");
    assert_eq!(tokens[4].line, 1);
}

#[test]
fn test_identifiers_with_digits_and_underscores() {
    let tokens = tokenize("_int_8 i8 8i");
    assert_eq!(tokens[0].literal, "_int_8");
    assert_eq!(tokens[1].literal, "i8");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[3].literal, "i");
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("");
    assert!(lexer.next_token().is(TokenKind::Eof));
    assert!(lexer.next_token().is(TokenKind::Eof));
}
