//! Extraction and normalization of directive conditions.
//!
//! `#if`, `#elseif`, `#foreach`, and `#define` are followed by a
//! balanced-parenthesis expression. The formatter pulls that expression
//! out as a single string, then renormalizes operator spacing inside it.

use std::sync::LazyLock;

use regex::Regex;

use crate::token::Token;

static LOGICAL_OP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(&&|\|\|)\s*").expect("valid regex"));
static COMPARISON_OP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(==|!=|<=|>=|<|>)\s*").expect("valid regex"));
static WORD_OP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(and|or|not|eq|ne|lt|gt|le|ge)\s+").expect("valid regex")
});
static FOREACH_IN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\$[a-zA-Z0-9._\[\]()!]+|\$\{[^}]+\}|\$!\{[^}]+\})\s*in\s*(\$[a-zA-Z0-9._\[\]()!]+|\$\{[^}]+\}|\$!\{[^}]+\}|\[[^\]]+\])",
    )
    .expect("valid regex")
});

/// Extract the balanced-parenthesis expression following a directive.
///
/// Scanning starts at `start`, skips leading whitespace, and collapses
/// interior whitespace tokens to a single space. The scan ends exactly
/// when parenthesis depth returns to zero; if the parentheses never
/// balance, it consumes to the end of the token stream. Returns the
/// expression text and the *inclusive* index of the last consumed
/// token, so the caller's cursor can resume right after it.
#[must_use]
pub fn extract_condition(tokens: &[Token], start: usize) -> (String, usize) {
    let mut condition = String::new();
    let mut index = start;
    let mut open_parens = 0i32;

    while index < tokens.len() && tokens[index].kind.is_whitespace() {
        index += 1;
    }

    while let Some(token) = tokens.get(index) {
        if token.kind.is_whitespace() {
            if !condition.is_empty() && !condition.ends_with(' ') {
                condition.push(' ');
            }
            index += 1;
            continue;
        }

        if token.is_punct('(') {
            open_parens += 1;
        } else if token.is_punct(')') {
            open_parens -= 1;
        }

        condition.push_str(&token.text);
        index += 1;

        if open_parens == 0 {
            break;
        }
    }

    (condition.trim().to_string(), index.saturating_sub(1))
}

/// Put single spaces around logical, comparison, and word operators.
#[must_use]
pub fn normalize_logical_operators(condition: &str) -> String {
    let result = LOGICAL_OP_RE.replace_all(condition, " ${1} ");
    let result = COMPARISON_OP_RE.replace_all(&result, " ${1} ");
    WORD_OP_RE.replace_all(&result, " ${1} ").into_owned()
}

/// Normalize a `#foreach` condition: single-space `in` separation
/// between its operands, then operator spacing on the inner text.
#[must_use]
pub fn normalize_foreach_condition(condition: &str) -> String {
    if condition.starts_with('(') && condition.ends_with(')') {
        let inner = condition[1..condition.len() - 1].trim();
        let inner = FOREACH_IN_RE.replace_all(inner, "${1} in ${2}");
        let inner = normalize_logical_operators(&inner);
        format!("({inner})")
    } else {
        condition.to_string()
    }
}
