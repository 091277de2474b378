/// Token kinds produced by the lexer.
///
/// The set is closed: every character of the input is classified into
/// exactly one of these kinds, and the formatter matches on all of them
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Directive reference (`#if`, `#end`, `#set`, ...). Formal
    /// `#{name}` syntax is normalized to `#name` by the lexer.
    Directive,
    /// Variable reference (`$name`, `$!name`, `${...}`, `$!{...}`),
    /// including property access, bracket indexing, and method calls.
    Variable,
    /// Quoted string literal (`"..."` or `'...'`).
    StringLit,
    /// Single-line comment (`## ...`, up to but not including the newline).
    Comment,
    /// Block comment (`#* ... *#`).
    BlockComment,
    /// Unparsed verbatim block (`#[[ ... ]]#`).
    Unparsed,
    /// One of `{ } [ ] : , ( )`.
    Punctuation,
    /// Operator, one or two characters (`..`, `==`, `&&`, `=`, `+`, ...).
    Operator,
    /// VTL word operator or literal (`and`, `or`, `in`, `true`, `null`, ...).
    Keyword,
    /// Identifier-like letter run that is not a keyword.
    Identifier,
    /// Digit run, optionally with non-range decimal points.
    Number,
    /// Run of non-newline whitespace, collapsed to a single space.
    Whitespace,
    /// Whitespace run containing at least one newline, collapsed to `"\n"`.
    Newline,
    /// Plain text the lexer recognises but does not classify further
    /// (e.g. a bare `#` with no directive name).
    Text,
    /// Single character that matched no other rule.
    Unknown,
}

impl TokenKind {
    /// Whether this kind represents collapsed whitespace.
    #[must_use]
    pub const fn is_whitespace(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline)
    }
}

/// A single token: its kind and the exact text it carries.
///
/// Concatenating the `text` of every token in order reproduces the
/// original input, except that whitespace runs are collapsed (one
/// space, or one newline if the run contained any newline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// True for `Punctuation` tokens whose text equals `ch`.
    #[must_use]
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punctuation && self.text.len() == 1 && self.text.starts_with(ch)
    }
}
