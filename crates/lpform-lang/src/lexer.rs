use std::str::Chars;

use lpform_matrix::Relation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Min,
    Max,
    SubjectTo,
    End,

    // Literals
    Integer,
    Variable,

    // Signs
    Plus,
    Minus,

    // Relations
    Le,
    Ge,
    Eq,

    // Special
    Word,
    Eof,
    Error,
}

impl TokenKind {
    pub fn is_sign(self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    pub fn relation(self) -> Option<Relation> {
        match self {
            TokenKind::Le => Some(Relation::Le),
            TokenKind::Ge => Some(Relation::Ge),
            TokenKind::Eq => Some(Relation::Eq),
            _ => None,
        }
    }

    pub fn is_relation(self) -> bool {
        self.relation().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

/// Keywords in match order; longer spellings of the constraint initializer
/// come first so `s.t.` is not read as `s.t` followed by a stray dot.
const KEYWORDS: [(&str, TokenKind); 7] = [
    ("subjectto", TokenKind::SubjectTo),
    ("s.t.", TokenKind::SubjectTo),
    ("s.t", TokenKind::SubjectTo),
    ("st", TokenKind::SubjectTo),
    ("max", TokenKind::Max),
    ("min", TokenKind::Min),
    ("end", TokenKind::End),
];

/// Scanner for a single problem line. Keywords are case-insensitive and may
/// run straight into the following term (`Max3x1`, `s.t.x1`).
pub struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            source,
            chars,
            pos: 0,
            current,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current;
        self.current = self.chars.next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.current
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn at_variable(&self) -> bool {
        matches!(self.peek(), Some('x' | 'X')) && self.peek_next().is_some_and(|c| c.is_ascii_digit())
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    fn read_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn read_integer(&mut self) -> Token {
        let start = self.pos;
        self.read_digits();
        self.token_from(TokenKind::Integer, start)
    }

    fn read_variable(&mut self) -> Token {
        let start = self.pos;
        self.advance(); // x
        self.read_digits();
        self.token_from(TokenKind::Variable, start)
    }

    fn read_keyword(&mut self) -> Option<Token> {
        let start = self.pos;
        let rest = &self.source[start..];
        let (keyword, kind) = KEYWORDS.iter().find(|(keyword, _)| {
            rest.get(..keyword.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
        })?;
        for _ in 0..keyword.len() {
            self.advance();
        }
        Some(self.token_from(*kind, start))
    }

    /// Whether a direction keyword starts at the current position
    fn at_direction(&self) -> bool {
        let rest = &self.source[self.pos..];
        ["max", "min"].iter().any(|keyword| {
            rest.get(..keyword.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
        })
    }

    /// Letters that are neither a keyword nor a variable, e.g. the `imize`
    /// of `Minimize` or the `obj` of `objmax`. Stops where a variable or a
    /// direction keyword begins.
    fn read_word(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') && !self.at_variable() {
            if self.pos > start && self.at_direction() {
                break;
            }
            self.advance();
        }
        self.token_from(TokenKind::Word, start)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.advance();
        self.token_from(kind, start)
    }

    fn relation(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.advance(); // < or >
        self.advance(); // =
        self.token_from(kind, start)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '+' => self.single(TokenKind::Plus),
            // ASCII hyphen, en dash, em dash
            '-' | '\u{2013}' | '\u{2014}' => self.single(TokenKind::Minus),
            '=' => self.single(TokenKind::Eq),
            '<' if self.peek_next() == Some('=') => self.relation(TokenKind::Le),
            '>' if self.peek_next() == Some('=') => self.relation(TokenKind::Ge),
            c if c.is_ascii_digit() => self.read_integer(),
            _ if self.at_variable() => self.read_variable(),
            c if c.is_alphabetic() => match self.read_keyword() {
                Some(token) => token,
                None => self.read_word(),
            },
            _ => self.single(TokenKind::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_objective_line() {
        assert_eq!(
            kinds("Max3x1+2x2"),
            vec![
                TokenKind::Max,
                TokenKind::Integer,
                TokenKind::Variable,
                TokenKind::Plus,
                TokenKind::Integer,
                TokenKind::Variable,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_constraint_initializers() {
        for source in ["s.t.x1<=9", "S.Tx1<=9", "stx1<=9", "SubjectTox1<=9"] {
            let tokens = Lexer::tokenize(source);
            assert_eq!(tokens[0].kind, TokenKind::SubjectTo, "{source}");
            assert_eq!(tokens[1].kind, TokenKind::Variable, "{source}");
            assert_eq!(tokens[1].text, "x1", "{source}");
        }
    }

    #[test]
    fn test_relations() {
        assert_eq!(
            kinds("<=>==<"),
            vec![
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Eq,
                TokenKind::Error,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dashes_are_minus() {
        let tokens = Lexer::tokenize("3x1\u{2013}2x2\u{2014}x3-x4");
        let minus: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Minus)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(minus, vec!["\u{2013}", "\u{2014}", "-"]);
    }

    #[test]
    fn test_trailing_word_after_keyword() {
        let tokens = Lexer::tokenize("Minimize3x1");
        assert_eq!(tokens[0].kind, TokenKind::Min);
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[1].text, "imize");
        assert_eq!(tokens[2].text, "3");
    }

    #[test]
    fn test_max_does_not_hide_variable() {
        let tokens = Lexer::tokenize("maxx3");
        assert_eq!(tokens[0].kind, TokenKind::Max);
        assert_eq!(tokens[1].kind, TokenKind::Variable);
        assert_eq!(tokens[1].text, "x3");
    }

    #[test]
    fn test_direction_after_letters() {
        assert_eq!(
            kinds("objmax3x1"),
            vec![
                TokenKind::Word,
                TokenKind::Max,
                TokenKind::Integer,
                TokenKind::Variable,
                TokenKind::Eof,
            ]
        );
        let tokens = Lexer::tokenize("zMIN=x2");
        assert_eq!(tokens[0].text, "z");
        assert_eq!(tokens[1].kind, TokenKind::Min);
        assert_eq!(tokens[2].kind, TokenKind::Eq);
    }

    #[test]
    fn test_end_keyword() {
        assert_eq!(kinds("End"), vec![TokenKind::End, TokenKind::Eof]);
        assert_eq!(kinds("END"), vec![TokenKind::End, TokenKind::Eof]);
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::tokenize("x12>=40");
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(3, 5));
        assert_eq!(tokens[2].span, Span::new(5, 7));
    }
}
