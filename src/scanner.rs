//! The hand-rolled scanner: one left-to-right pass over the source text
//! producing a flat token stream, with per-token line/column tracking.
//!
//! Scanner errors are non-fatal: an invalid character or an unterminated
//! string is recorded in the error list and scanning continues, so a single
//! source file can report more than one lexical problem per run.

use crate::diagnostic::{Diagnostic, Span, Stage};
use crate::token::{keyword_or_type, Location, Token, TokenKind};

pub struct Scanner {
    source: Vec<char>,
    file: String,
    path: String,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<Diagnostic>,
}

impl Scanner {
    pub fn new(source: &str, file: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            source: source.chars().collect(),
            file: file.into(),
            path: path.into(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Diagnostics collected so far (non-fatal; scanning does not stop for
    /// these, per `spec.md` §7's propagation policy).
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Run the scanner to completion, producing the full token stream
    /// including a trailing `EOF` token.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }
        let location = self.location_at(self.line, self.column);
        self.tokens.push(Token::new(TokenKind::Eof, "", location));
        (self.tokens, self.errors)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        self.column += 1;
        true
    }

    fn location_at(&self, line: usize, column: usize) -> Location {
        Location { file: self.file.clone(), path: self.path.clone(), line, column }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        let column = self.column.saturating_sub(lexeme.chars().count());
        let location = self.location_at(self.line, column);
        self.tokens.push(Token::new(kind, lexeme, location));
    }

    fn add_token_with_lexeme(&mut self, kind: TokenKind, lexeme: String) {
        let column = self.column.saturating_sub(self.current - self.start);
        let location = self.location_at(self.line, column);
        self.tokens.push(Token::new(kind, lexeme, location));
    }

    fn error(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(Stage::Lexical, message)
            .with_location(crate::diagnostic::Location {
                file: self.file.clone(),
                path: self.path.clone(),
                line: self.line,
                column: self.column,
            })
            .with_label(Span::new(self.start, self.current), "here")
            .with_sample_solution_lookup();
        self.errors.push(diagnostic);
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        use TokenKind::*;
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            '[' => self.add_token(LeftBracket),
            ']' => self.add_token(RightBracket),
            ',' => self.add_token(Comma),
            '.' => {
                if self.matches('.') {
                    self.add_token(DotDot);
                } else {
                    self.add_token(Dot);
                }
            }
            '?' => self.add_token(Question),
            ':' => self.add_token(Colon),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),
            '-' => {
                if self.matches('=') {
                    self.add_token(MinusEqual);
                } else if self.matches('>') {
                    self.add_token(Arrow);
                } else {
                    self.add_token(Minus);
                }
            }
            '+' => {
                let kind = if self.matches('=') { PlusEqual } else { Plus };
                self.add_token(kind);
            }
            '!' => {
                let kind = if self.matches('=') { BangEqual } else { Bang };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') { EqualEqual } else { Equal };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') { LessEqual } else { Less };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') { GreaterEqual } else { Greater };
                self.add_token(kind);
            }
            '%' => self.add_token(Modulus),
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '"' | '\'' => self.string(c),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            c => self.error(format!("Invalid character '{c}'")),
        }
    }

    fn string(&mut self, quote: char) {
        let start_line = self.line;
        while self.peek() != quote && !self.is_at_end() {
            if self.peek() == '\n' {
                self.error("unterminated string");
                return;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.line = start_line;
            self.error("unterminated string");
            return;
        }

        self.advance(); // closing quote
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_token_with_lexeme(TokenKind::String, value);
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        self.add_token(TokenKind::Number);
    }

    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }
        let word = self.lexeme();
        let kind = keyword_or_type(&word).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Scanner::new(source, "test.lum", "test.lum").scan_tokens();
        assert!(errors.is_empty(), "unexpected scan errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_var_declaration() {
        use TokenKind::*;
        assert_eq!(
            kinds("var x = 1 + 2 * 3;"),
            vec![Var, Identifier, Equal, Number, Plus, Number, Star, Number, Semicolon, Eof]
        );
    }

    #[test]
    fn scans_two_char_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("a != b == c <= d >= e -> f .. g"),
            vec![
                Identifier, BangEqual, Identifier, EqualEqual, Identifier, LessEqual, Identifier,
                GreaterEqual, Identifier, Arrow, Identifier, DotDot, Identifier, Eof
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        use TokenKind::*;
        assert_eq!(kinds("1 // a comment\n2"), vec![Number, Number, Eof]);
    }

    #[test]
    fn scans_string_literal_strips_quotes() {
        let (tokens, errors) = Scanner::new("\"hi\"", "t", "t").scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "hi");
    }

    #[test]
    fn reports_unterminated_string() {
        let (_, errors) = Scanner::new("\"hi", "t", "t").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unterminated string"));
    }

    #[test]
    fn reports_invalid_character_and_continues() {
        let (tokens, errors) = Scanner::new("1 @ 2", "t", "t").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Invalid character"));
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Number).count(), 2);
    }

    #[test]
    fn tracks_line_numbers() {
        let (tokens, _) = Scanner::new("var a;\nvar b;", "t", "t").scan_tokens();
        let b_tok = tokens.iter().find(|t| t.lexeme == "b").unwrap();
        assert_eq!(b_tok.location.line, 2);
    }

    #[test]
    fn recognizes_type_name_keywords() {
        use TokenKind::*;
        assert_eq!(kinds("int x"), vec![IntType, Identifier, Eof]);
    }
}
