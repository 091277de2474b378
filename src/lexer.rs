//! Tokenizer for Velocity Template Language source text.
//!
//! The lexer is total: every character of the input is classified into
//! some token, so `tokenize` cannot fail. Degenerate inputs (an
//! unterminated string or `#*`/`#[[` block) consume to end of input as
//! a single token instead of raising.

use crate::token::{Token, TokenKind};

/// VTL word operators and literals.
const KEYWORDS: &[&str] = &[
    "and", "or", "not", "eq", "ne", "lt", "gt", "le", "ge", "in", "true", "false", "null",
];

/// Tokenize a VTL source string into a flat sequence of tokens.
///
/// Whitespace is collapsed: a run of non-newline whitespace becomes a
/// single `" "` token, and a run containing any newline becomes a
/// single `"\n"` token. Every other token carries its exact source
/// text, so concatenating all token texts reproduces the input modulo
/// that collapse.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            let token = match ch {
                '#' => self.read_hash(),
                '$' => self.read_variable(),
                '"' | '\'' => self.read_string(ch),
                '.' if self.peek_at(1) == Some('.') => {
                    self.pos += 2;
                    Token::new(TokenKind::Operator, "..")
                }
                _ if self.at_two_char_operator() => {
                    let text: String = self.chars[self.pos..self.pos + 2].iter().collect();
                    self.pos += 2;
                    Token::new(TokenKind::Operator, text)
                }
                '=' | '+' | '-' | '*' | '/' | '%' | '<' | '>' | '!' => {
                    self.pos += 1;
                    Token::new(TokenKind::Operator, ch.to_string())
                }
                '{' | '}' | '[' | ']' | ':' | ',' | '(' | ')' => {
                    self.pos += 1;
                    Token::new(TokenKind::Punctuation, ch.to_string())
                }
                _ if ch.is_whitespace() => self.read_whitespace(),
                _ if ch.is_ascii_alphabetic() => self.read_word(),
                _ if ch.is_ascii_digit() => self.read_number(),
                _ => {
                    self.pos += 1;
                    Token::new(TokenKind::Unknown, ch.to_string())
                }
            };
            tokens.push(token);
        }

        tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_two_char_operator(&self) -> bool {
        matches!(
            (self.peek(), self.peek_at(1)),
            (Some('='), Some('='))
                | (Some('!'), Some('='))
                | (Some('<'), Some('='))
                | (Some('>'), Some('='))
                | (Some('&'), Some('&'))
                | (Some('|'), Some('|'))
        )
    }

    /// Dispatch for everything introduced by `#`, most-specific first:
    /// `#[[...]]#`, `#*...*#`, `##...`, `#{name}`, `#name`, bare `#`.
    fn read_hash(&mut self) -> Token {
        match (self.peek_at(1), self.peek_at(2)) {
            (Some('['), Some('[')) => self.read_unparsed(),
            (Some('*'), _) => self.read_block_comment(),
            (Some('#'), _) => self.read_line_comment(),
            (Some('{'), _) => self.read_formal_directive(),
            _ => self.read_directive(),
        }
    }

    fn read_unparsed(&mut self) -> Token {
        let mut value = String::from("#[[");
        self.pos += 3;
        while self.pos < self.chars.len() {
            if self.peek() == Some(']')
                && self.peek_at(1) == Some(']')
                && self.peek_at(2) == Some('#')
            {
                value.push_str("]]#");
                self.pos += 3;
                break;
            }
            value.push(self.chars[self.pos]);
            self.pos += 1;
        }
        Token::new(TokenKind::Unparsed, value)
    }

    fn read_block_comment(&mut self) -> Token {
        let mut value = String::from("#*");
        self.pos += 2;
        while self.pos < self.chars.len() {
            if self.peek() == Some('*') && self.peek_at(1) == Some('#') {
                value.push_str("*#");
                self.pos += 2;
                break;
            }
            value.push(self.chars[self.pos]);
            self.pos += 1;
        }
        Token::new(TokenKind::BlockComment, value)
    }

    fn read_line_comment(&mut self) -> Token {
        let mut value = String::from("##");
        self.pos += 2;
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            value.push(ch);
            self.pos += 1;
        }
        Token::new(TokenKind::Comment, value)
    }

    /// `#{name}` is normalized to `#name` so the formatter can dispatch
    /// on one spelling.
    fn read_formal_directive(&mut self) -> Token {
        self.pos += 2;
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch == '}' {
                self.pos += 1;
                break;
            }
            name.push(ch);
            self.pos += 1;
        }
        Token::new(TokenKind::Directive, format!("#{name}"))
    }

    fn read_directive(&mut self) -> Token {
        let mut value = String::from("#");
        self.pos += 1;
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            value.push(ch);
            self.pos += 1;
        }
        if value.len() > 1 {
            Token::new(TokenKind::Directive, value)
        } else {
            // A lone # is plain text.
            Token::new(TokenKind::Text, value)
        }
    }

    fn read_variable(&mut self) -> Token {
        let mut value = String::from("$");
        self.pos += 1;

        if self.peek() == Some('!') {
            value.push('!');
            self.pos += 1;
        }

        // Formal reference: ${...} / $!{...} with balanced braces.
        if self.peek() == Some('{') {
            self.consume_balanced('{', '}', &mut value);
            return Token::new(TokenKind::Variable, value);
        }

        // Simple reference, greedily extended through identifier
        // characters, property access, indexing, and method calls.
        let prefix_len = value.len();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                value.push(ch);
                self.pos += 1;
            } else if ch == '[' {
                self.consume_balanced('[', ']', &mut value);
            } else if ch == '(' && value.len() > prefix_len {
                // A method call needs at least one identifier character
                // first; a bare `$(` is not a reference.
                self.consume_balanced('(', ')', &mut value);
            } else {
                break;
            }
        }
        Token::new(TokenKind::Variable, value)
    }

    /// Consume a delimited region starting at `open`, tracking nesting
    /// depth. An unbalanced region consumes to end of input.
    fn consume_balanced(&mut self, open: char, close: char, value: &mut String) {
        value.push(open);
        self.pos += 1;
        let mut depth = 1u32;
        while self.pos < self.chars.len() && depth > 0 {
            let ch = self.chars[self.pos];
            if ch == open {
                depth += 1;
            } else if ch == close {
                depth -= 1;
            }
            value.push(ch);
            self.pos += 1;
        }
    }

    fn read_string(&mut self, quote: char) -> Token {
        let mut value = String::from(quote);
        self.pos += 1;
        while let Some(ch) = self.peek() {
            if ch == '\\' && self.peek_at(1).is_some() {
                // Backslash always consumes the following character,
                // so \" does not terminate the string.
                value.push(ch);
                value.push(self.chars[self.pos + 1]);
                self.pos += 2;
                continue;
            }
            value.push(ch);
            self.pos += 1;
            if ch == quote {
                break;
            }
        }
        Token::new(TokenKind::StringLit, value)
    }

    fn read_whitespace(&mut self) -> Token {
        let mut has_newline = false;
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            if ch == '\n' {
                has_newline = true;
            }
            self.pos += 1;
        }
        if has_newline {
            Token::new(TokenKind::Newline, "\n")
        } else {
            Token::new(TokenKind::Whitespace, " ")
        }
    }

    fn read_word(&mut self) -> Token {
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            value.push(ch);
            self.pos += 1;
        }
        if KEYWORDS.contains(&value.to_lowercase().as_str()) {
            Token::new(TokenKind::Keyword, value)
        } else {
            Token::new(TokenKind::Identifier, value)
        }
    }

    fn read_number(&mut self) -> Token {
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                value.push(ch);
                self.pos += 1;
            } else if ch == '.' && self.peek_at(1) != Some('.') {
                // A dot followed by another dot is the range operator,
                // not a decimal point.
                value.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number, value)
    }
}
