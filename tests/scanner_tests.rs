use luminar::scanner::Scanner;
use luminar::token::TokenKind;

fn kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, errors) = Scanner::new(source, "t", "t.lum").scan_tokens();
    assert!(errors.is_empty(), "{errors:?}");
    tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn scans_a_var_declaration() {
    let kinds = kinds("var x = 42;");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tracks_line_and_column() {
    let (tokens, _) = Scanner::new("var x\n= 1;", "t", "t.lum").scan_tokens();
    let eq = tokens.iter().find(|t| t.kind == TokenKind::Equal).unwrap();
    assert_eq!(eq.location.line, 2);
    assert_eq!(eq.location.column, 1);
}

#[test]
fn unterminated_string_is_a_recorded_error_not_a_panic() {
    let (_, errors) = Scanner::new("\"abc", "t", "t.lum").scan_tokens();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("unterminated"));
}

#[test]
fn invalid_character_is_recorded_and_scanning_continues() {
    let (tokens, errors) = Scanner::new("var x = 1 $ 2;", "t", "t.lum").scan_tokens();
    assert_eq!(errors.len(), 1);
    // Scanning kept going past the bad character.
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Semicolon));
}

#[test]
fn keywords_are_not_identifiers() {
    let kinds = kinds("while true");
    assert_eq!(kinds, vec![TokenKind::While, TokenKind::True, TokenKind::Eof]);
}
