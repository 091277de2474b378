//! Indentation-aware re-serializer for a VTL token stream.
//!
//! A single left-to-right pass emits output eagerly. Indentation is
//! derived from the live depth of the indent stack (two spaces per
//! level). Each token is classified against the current mode flags to
//! choose between block layout (one construct per indented line) and
//! inline layout (`#set` arguments, macro and directive headers,
//! JSON-style variable values).

use crate::condition::{extract_condition, normalize_foreach_condition, normalize_logical_operators};
use crate::token::{Token, TokenKind};

/// Columns added per nesting level.
const INDENT_SIZE: usize = 2;

/// Structural error reported by the formatter.
///
/// The formatter validates nothing about VTL semantics; the only
/// reportable conditions are indent-stack imbalance: a closing
/// construct with no matching opener, or an opener never closed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// `#end`, `#else`, `#elseif`, or `}` encountered at root depth.
    #[error("unmatched '{text}' with no open block")]
    UnmatchedClose { text: String },
    /// One or more blocks were still open at end of input.
    #[error("{count} unclosed block(s) at end of input")]
    UnclosedBlock { count: usize },
}

/// Format a token stream into canonically indented VTL text.
///
/// # Errors
///
/// Returns [`FormatError`] when block nesting is unbalanced. Every
/// other token sequence the lexer can produce formats successfully.
pub fn format_tokens(tokens: &[Token]) -> Result<String, FormatError> {
    let mut formatter = Formatter::new();
    formatter.run(tokens)?;
    Ok(post_process(&formatter.out))
}

/// Nested indentation widths in columns. Never empty: the bottom
/// element is the root level (0).
#[derive(Debug)]
struct IndentStack {
    levels: Vec<usize>,
}

impl IndentStack {
    fn new() -> Self {
        Self { levels: vec![0] }
    }

    fn top(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    fn push_level(&mut self) {
        self.levels.push(self.top() + INDENT_SIZE);
    }

    /// Pops one level; `false` when already at the root.
    fn pop_level(&mut self) -> bool {
        if self.levels.len() > 1 {
            self.levels.pop();
            true
        } else {
            false
        }
    }

    fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    fn current(&self) -> String {
        " ".repeat(self.top())
    }
}

/// Transient layout state, created fresh per `format_tokens` call and
/// mutated token by token.
#[derive(Debug)]
struct FormatterState {
    indent: IndentStack,
    needs_newline: bool,
    /// Inside a `#set(...)` argument: no directive-driven line breaks.
    inline_mode: bool,
    processing_set: bool,
    set_paren_depth: u32,
    /// Copying a `#macro(...)` header token-for-token.
    in_macro_header: bool,
    macro_paren_depth: u32,
    /// Copying a simple-directive (`#parse`, `#include`, `#evaluate`)
    /// header token-for-token.
    in_directive_header: bool,
    header_paren_depth: u32,
    /// Copying a variable reference in JSON value position verbatim.
    in_json_value_variable: bool,
    json_var_brace_depth: u32,
    last_token_was_comment: bool,
    last_token_was_variable: bool,
    last_token_was_space: bool,
}

impl FormatterState {
    fn new() -> Self {
        Self {
            indent: IndentStack::new(),
            needs_newline: false,
            inline_mode: false,
            processing_set: false,
            set_paren_depth: 0,
            in_macro_header: false,
            macro_paren_depth: 0,
            in_directive_header: false,
            header_paren_depth: 0,
            in_json_value_variable: false,
            json_var_brace_depth: 0,
            last_token_was_comment: false,
            last_token_was_variable: false,
            last_token_was_space: false,
        }
    }
}

struct Formatter {
    out: String,
    state: FormatterState,
}

impl Formatter {
    fn new() -> Self {
        Self {
            out: String::new(),
            state: FormatterState::new(),
        }
    }

    fn run(&mut self, tokens: &[Token]) -> Result<(), FormatError> {
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];

            if self.state.in_macro_header {
                self.copy_macro_header_token(token);
                i += 1;
                continue;
            }
            if self.state.in_directive_header {
                self.copy_directive_header_token(token);
                i += 1;
                continue;
            }
            if self.state.in_json_value_variable {
                if self.copy_json_variable_token(token) {
                    i += 1;
                    continue;
                }
                // The reference is structurally complete; fall through
                // and process this token normally.
            }

            if self.state.needs_newline && !self.state.inline_mode {
                self.out.push('\n');
                self.out.push_str(&self.state.indent.current());
                self.state.needs_newline = false;
            }

            match token.kind {
                TokenKind::Directive => i = self.directive(tokens, i)?,
                TokenKind::Punctuation => self.punctuation(tokens, i, token)?,
                TokenKind::Operator => self.operator(token),
                TokenKind::Comment | TokenKind::BlockComment => self.comment(token),
                TokenKind::Whitespace => {
                    self.state.last_token_was_space = true;
                    i += 1;
                    continue;
                }
                TokenKind::Newline => {
                    if !self.state.inline_mode {
                        self.state.needs_newline = true;
                    }
                    self.state.last_token_was_space = true;
                    i += 1;
                    continue;
                }
                TokenKind::Variable => self.variable(tokens, i, token),
                TokenKind::Keyword
                | TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::StringLit
                | TokenKind::Text
                | TokenKind::Unparsed
                | TokenKind::Unknown => self.content(token),
            }

            self.state.last_token_was_comment =
                matches!(token.kind, TokenKind::Comment | TokenKind::BlockComment);
            self.state.last_token_was_variable = token.kind == TokenKind::Variable;
            self.state.last_token_was_space = false;
            i += 1;
        }

        let open = self.state.indent.depth();
        if open > 0 {
            return Err(FormatError::UnclosedBlock { count: open });
        }
        Ok(())
    }

    /// Dispatch on the directive name: exact match after stripping the
    /// leading `#` and case-folding, so `#settings` never hits the
    /// `#set` arm. Returns the index of the last consumed token.
    fn directive(&mut self, tokens: &[Token], i: usize) -> Result<usize, FormatError> {
        let token = &tokens[i];
        let name = token.text.trim_start_matches('#').to_lowercase();

        match name.as_str() {
            "end" => {
                self.pop_or_fail("#end")?;
                self.fresh_line();
                self.out.push_str("#end");
                self.state.needs_newline = true;
                Ok(i)
            }
            "elseif" => {
                self.pop_or_fail("#elseif")?;
                let (condition, end) = extract_condition(tokens, i + 1);
                let condition = normalize_logical_operators(&condition);
                self.fresh_line();
                self.emit_header("#elseif", &condition);
                self.state.indent.push_level();
                self.state.needs_newline = true;
                Ok(end)
            }
            "else" => {
                self.pop_or_fail("#else")?;
                self.fresh_line();
                self.out.push_str("#else");
                self.state.indent.push_level();
                self.state.needs_newline = true;
                Ok(i)
            }
            "if" | "foreach" | "define" => {
                let (condition, end) = extract_condition(tokens, i + 1);
                let condition = match name.as_str() {
                    "foreach" => normalize_foreach_condition(&condition),
                    "if" => normalize_logical_operators(&condition),
                    _ => condition,
                };
                self.fresh_line();
                self.emit_header(&format!("#{name}"), &condition);
                self.state.indent.push_level();
                self.state.needs_newline = true;
                Ok(end)
            }
            "set" => {
                // Each #set starts its own line; its whole argument
                // then renders inline until the parentheses balance.
                if !self.out.is_empty() && !self.out.ends_with('\n') {
                    self.out.push('\n');
                    self.out.push_str(&self.state.indent.current());
                }
                self.out.push_str(&token.text);
                self.state.processing_set = true;
                self.state.inline_mode = true;
                self.state.set_paren_depth = 0;
                Ok(i)
            }
            "macro" => {
                self.fresh_line();
                self.out.push_str(&token.text);
                if Self::next_is_open_paren(tokens, i) {
                    self.state.in_macro_header = true;
                    self.state.macro_paren_depth = 0;
                }
                Ok(i)
            }
            "parse" | "include" | "evaluate" => {
                self.fresh_line();
                self.out.push_str(&token.text);
                if Self::next_is_open_paren(tokens, i) {
                    self.state.in_directive_header = true;
                    self.state.header_paren_depth = 0;
                } else {
                    self.state.needs_newline = true;
                }
                Ok(i)
            }
            // #stop, #break, and anything unrecognised: its own line,
            // no header handling.
            _ => {
                self.fresh_line();
                self.out.push_str(&token.text);
                self.state.needs_newline = true;
                Ok(i)
            }
        }
    }

    fn punctuation(
        &mut self,
        tokens: &[Token],
        i: usize,
        token: &Token,
    ) -> Result<(), FormatError> {
        if self.state.inline_mode {
            self.inline_punctuation(token);
            return Ok(());
        }

        if token.is_punct('{') {
            // A brace completing a split `$ {...}` reference is part of
            // the variable, not a block opener.
            if self.state.last_token_was_variable && self.out.ends_with(['$', '!']) {
                self.out.push('{');
                self.state.in_json_value_variable = true;
                self.state.json_var_brace_depth = 1;
                return Ok(());
            }
            self.fresh_line();
            self.out.push('{');
            self.state.indent.push_level();
            self.state.needs_newline = true;
        } else if token.is_punct('}') {
            if !self.state.indent.pop_level() {
                return Err(FormatError::UnmatchedClose {
                    text: "}".to_string(),
                });
            }
            self.fresh_line();
            self.out.push('}');
            self.state.needs_newline = true;
        } else if token.is_punct(',') {
            // List separators force one item per line in block layout.
            self.out.push(',');
            self.state.needs_newline = true;
        } else if token.is_punct(':') {
            self.out.push_str(": ");
            if Self::next_is_variable(tokens, i) {
                self.state.in_json_value_variable = true;
                self.state.json_var_brace_depth = 0;
            }
        } else {
            self.out.push_str(&token.text);
        }
        Ok(())
    }

    fn inline_punctuation(&mut self, token: &Token) {
        if token.is_punct('(') {
            self.state.set_paren_depth += 1;
            self.out.push('(');
        } else if token.is_punct(')') {
            self.state.set_paren_depth = self.state.set_paren_depth.saturating_sub(1);
            self.out.push(')');
            if self.state.set_paren_depth == 0 {
                self.state.processing_set = false;
                self.state.inline_mode = false;
            }
        } else if token.is_punct(':') {
            self.out.push_str(": ");
        } else {
            self.out.push_str(&token.text);
        }
    }

    fn operator(&mut self, token: &Token) {
        if !self.out.is_empty() && !self.out.ends_with([' ', '\n', '(']) {
            self.out.push(' ');
        }
        self.out.push_str(&token.text);
        self.out.push(' ');
    }

    fn comment(&mut self, token: &Token) {
        // Consecutive comments each get their own indented line.
        if self.state.last_token_was_comment && !self.out.ends_with('\n') {
            self.out.push('\n');
            self.out.push_str(&self.state.indent.current());
        }
        if !self.out.is_empty() && !self.out.ends_with(['\n', ' ']) {
            self.out.push(' ');
        }
        self.out.push_str(&token.text);
    }

    fn variable(&mut self, tokens: &[Token], i: usize, token: &Token) {
        self.spacing_before();
        self.out.push_str(&token.text);
        // A bare `$`/`$!` directly followed by `{` is the start of a
        // split complex reference; copy the braced part verbatim.
        if matches!(token.text.as_str(), "$" | "$!")
            && tokens.get(i + 1).is_some_and(|t| t.is_punct('{'))
        {
            self.state.in_json_value_variable = true;
            self.state.json_var_brace_depth = 0;
        }
    }

    fn content(&mut self, token: &Token) {
        self.spacing_before();
        self.out.push_str(&token.text);
    }

    /// Insert a single separating space when the source carried
    /// whitespace here and the output does not already end in a
    /// layout character.
    fn spacing_before(&mut self) {
        if self.state.last_token_was_space
            && !self.out.is_empty()
            && !self.out.ends_with([' ', '\n', '(', '[', '{', ':'])
        {
            self.out.push(' ');
        }
    }

    fn copy_macro_header_token(&mut self, token: &Token) {
        if token.kind.is_whitespace() {
            self.push_header_space();
            return;
        }
        self.out.push_str(&token.text);
        if token.is_punct('(') {
            self.state.macro_paren_depth += 1;
        } else if token.is_punct(')') {
            self.state.macro_paren_depth = self.state.macro_paren_depth.saturating_sub(1);
            if self.state.macro_paren_depth == 0 {
                self.state.in_macro_header = false;
                // A macro opens a block closed by #end.
                self.state.indent.push_level();
                self.state.needs_newline = true;
            }
        }
    }

    fn copy_directive_header_token(&mut self, token: &Token) {
        if token.kind.is_whitespace() {
            self.push_header_space();
            return;
        }
        self.out.push_str(&token.text);
        if token.is_punct('(') {
            self.state.header_paren_depth += 1;
        } else if token.is_punct(')') {
            self.state.header_paren_depth = self.state.header_paren_depth.saturating_sub(1);
            if self.state.header_paren_depth == 0 {
                self.state.in_directive_header = false;
                self.state.needs_newline = true;
            }
        }
    }

    /// Copy one token of a JSON-value variable reference. Returns
    /// `false` once the reference is complete and the token should be
    /// processed normally instead.
    fn copy_json_variable_token(&mut self, token: &Token) -> bool {
        let depth = self.state.json_var_brace_depth;
        if token.kind.is_whitespace() {
            if depth > 0 {
                self.push_header_space();
            }
            return true;
        }
        if token.is_punct('{') {
            self.state.json_var_brace_depth += 1;
            self.out.push('{');
            return true;
        }
        if token.is_punct('}') {
            self.state.json_var_brace_depth = depth.saturating_sub(1);
            self.out.push('}');
            if self.state.json_var_brace_depth == 0 {
                self.state.in_json_value_variable = false;
            }
            return true;
        }
        if token.kind == TokenKind::Variable {
            self.out.push_str(&token.text);
            if depth == 0 && !matches!(token.text.as_str(), "$" | "$!") {
                self.state.in_json_value_variable = false;
            }
            return true;
        }
        if depth > 0 {
            self.out.push_str(&token.text);
            return true;
        }
        self.state.in_json_value_variable = false;
        false
    }

    fn push_header_space(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with([' ', '(']) {
            self.out.push(' ');
        }
    }

    /// Start a fresh line at the current indent, unless the output
    /// already sits at the start of one.
    fn fresh_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str(&self.state.indent.current());
    }

    /// Emit a directive name and its extracted condition. Conditions
    /// that start with `(` attach flush to the name.
    fn emit_header(&mut self, name: &str, condition: &str) {
        self.out.push_str(name);
        if condition.is_empty() {
            return;
        }
        if !condition.starts_with('(') {
            self.out.push(' ');
        }
        self.out.push_str(condition);
    }

    fn pop_or_fail(&mut self, text: &str) -> Result<(), FormatError> {
        if self.state.indent.pop_level() {
            Ok(())
        } else {
            Err(FormatError::UnmatchedClose {
                text: text.to_string(),
            })
        }
    }

    fn next_is_open_paren(tokens: &[Token], i: usize) -> bool {
        tokens[i + 1..]
            .iter()
            .find(|t| !t.kind.is_whitespace())
            .is_some_and(|t| t.is_punct('('))
    }

    fn next_is_variable(tokens: &[Token], i: usize) -> bool {
        tokens[i + 1..]
            .iter()
            .find(|t| !t.kind.is_whitespace())
            .is_some_and(|t| t.kind == TokenKind::Variable)
    }
}

/// Drop blank lines, strip trailing spaces on every line, and trim the
/// final result.
fn post_process(out: &str) -> String {
    let lines: Vec<&str> = out
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n").trim().to_string()
}
