use crate::error;
use crate::token::TokenType::*;
use crate::token::{Literal, Token, TokenType, KEYWORDS};

/// The scanner takes in raw source code as a series of characters and
/// groups it into a series of tokens, the meaningful "words" and
/// "punctuation" of the grammar. The parser only needs a random-access
/// buffer of tokens ending in a single EOF; this is the one producer.
pub struct Scanner {
    /// The raw source code
    source: Vec<char>,

    /// The tokens produced so far
    tokens: Vec<Token>,

    /// 'start' points to the first character of the lexeme being scanned,
    /// 'current' at the character currently being considered, and 'line'
    /// tracks which source line 'current' is on.
    start: usize,
    current: usize,
    line: usize,
}

impl Scanner {
    pub fn new(source: String) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            // We are at the beginning of the next lexeme.
            self.start = self.current;
            self.scan_token();
        }
        self.tokens.push(Token::new(EOF, String::new(), None, self.line));
        std::mem::take(&mut self.tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) {
        let ln = self.line;
        let c = self.advance();
        match c {
            '(' => self.add_token(LEFT_PAREN),
            ')' => self.add_token(RIGHT_PAREN),
            '{' => self.add_token(LEFT_BRACE),
            '}' => self.add_token(RIGHT_BRACE),
            ',' => self.add_token(COMMA),
            '.' => self.add_token(DOT),
            '-' => self.add_token(MINUS),
            '+' => self.add_token(PLUS),
            ';' => self.add_token(SEMICOLON),
            '*' => self.add_token(STAR),

            // Two-character operators are recognized in two stages: we know
            // the lexeme starts with, say, '!', and look at the next
            // character to decide between '!=' and a bare '!'.
            '!' => match self.match_next('=') {
                true => self.add_token(BANG_EQUAL),
                false => self.add_token(BANG),
            },
            '=' => match self.match_next('=') {
                true => self.add_token(EQUAL_EQUAL),
                false => self.add_token(EQUAL),
            },
            '<' => match self.match_next('=') {
                true => self.add_token(LESS_EQUAL),
                false => self.add_token(LESS),
            },
            '>' => match self.match_next('=') {
                true => self.add_token(GREATER_EQUAL),
                false => self.add_token(GREATER),
            },

            // Whitespace is skipped; newlines additionally bump the line
            // counter so every token knows where it came from.
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,

            // Longer lexemes: once we see the beginning of one, we shunt
            // over to lexeme-specific code that keeps consuming characters
            // until it sees the end.
            '/' => self.slash(),
            '"' => self.string(),
            d if is_digit(d) => self.number(),
            a if is_alpha(a) => self.identifier(),

            // We report invalid characters and keep scanning. There may be
            // other errors later in the program, and it is kinder to surface
            // as many as possible in one go.
            _ => {
                error::error(ln, &format!("Unexpected character: {c}"));
            }
        }
    }

    /// A '/' can start a line comment, a block comment, or just be the
    /// division operator.
    fn slash(&mut self) {
        if self.match_next('/') {
            // A line comment goes until the end of the line. Comments are
            // lexemes, but they aren't meaningful, so no token is added.
            while self.peek() != '\n' && !self.is_at_end() {
                self.advance();
            }
        } else if self.match_next('*') {
            self.block_comment();
        } else {
            self.add_token(SLASH);
        }
    }

    /// Block comments run until the matching "*/". They may span lines, so
    /// the line counter must keep up.
    fn block_comment(&mut self) {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
        error::error(self.line, "Unterminated block comment.");
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            // Strings may span multiple lines.
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            error::error(self.line, "Unterminated string.");
            return;
        }

        // The closing ".
        self.advance();

        // Trim the surrounding quotes to produce the actual string value
        // the interpreter will use.
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_token_with_literal(STRING, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while is_digit(self.peek()) {
            self.advance();
        }

        // Look for a fractional part. The dot only counts if a digit
        // follows, so "123." stays a number and a dot.
        if self.peek() == '.' && is_digit(self.peek_next()) {
            // Consume the "."
            self.advance();

            while is_digit(self.peek()) {
                self.advance();
            }
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        match text.parse::<f64>() {
            Ok(value) => self.add_token_with_literal(NUMBER, Some(Literal::Number(value))),
            Err(_) => error::error(self.line, &format!("Invalid number: {text}")),
        }
    }

    fn identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let token_type = KEYWORDS.get(text.as_str()).copied().unwrap_or(IDENTIFIER);
        self.add_token(token_type);
    }

    /// Consumes the next character in the source and returns it. Only
    /// called when at least one character remains.
    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_with_literal(token_type, None);
    }

    /// Grabs the text of the current lexeme and creates a new token for it,
    /// along with its literal value if it has one.
    fn add_token_with_literal(&mut self, token_type: TokenType, literal: Option<Literal>) {
        let text = self.source[self.start..self.current].iter().collect();
        self.tokens.push(Token::new(token_type, text, literal, self.line));
    }

    /// A conditional advance(): only consumes the current character if it
    /// is the one we are looking for.
    fn match_next(&mut self, expected: char) -> bool {
        if self.is_at_end() {
            return false;
        }
        if self.source[self.current] != expected {
            return false;
        }

        self.current += 1;
        true
    }

    /// Like advance(), but doesn't consume the character. One character of
    /// lookahead.
    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            return '\0';
        }
        self.source[self.current + 1]
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_numeric(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}
