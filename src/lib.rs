//! VTL lexer and formatter.
//!
//! Reformats Apache Velocity Template Language source into a
//! canonically indented, whitespace-normalized rendering: block
//! directives (`#if`, `#foreach`, `#macro`, ...) and JSON-style braces
//! each get their own indented line, `#set` assignments render inline,
//! and operator spacing is normalized. Semantic content is preserved;
//! only layout is rewritten.
//!
//! # Quick start
//!
//! ```
//! use vtlfmt::format;
//!
//! let input = "#if($user.loggedIn)Hello $user.name#end";
//! let output = format(input);
//! assert_eq!(output, "#if($user.loggedIn)\n  Hello $user.name\n#end");
//! ```
//!
//! `format` is total: it never panics and never fails. Inputs with
//! unbalanced block nesting produce a diagnostic `Error: ...` string;
//! use [`try_format`] to get the structural [`FormatError`] instead.
//!
//! ```
//! use vtlfmt::format;
//!
//! assert_eq!(format("#end"), "Error: unmatched '#end' with no open block");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod condition;
pub mod formatter;
pub mod lexer;
pub mod token;

pub use condition::{extract_condition, normalize_foreach_condition, normalize_logical_operators};
pub use formatter::{FormatError, format_tokens};
pub use lexer::tokenize;
pub use token::{Token, TokenKind};

/// Tokenize and format a VTL source string, reporting nesting errors.
pub fn try_format(source: &str) -> Result<String, FormatError> {
    format_tokens(&tokenize(source))
}

/// Tokenize and format a VTL source string.
///
/// Never fails: a structural error (unmatched `#end` or `}`, or a
/// block left unclosed) is rendered as a literal `Error: <message>`
/// string instead.
#[must_use]
pub fn format(source: &str) -> String {
    try_format(source).unwrap_or_else(|e| format!("Error: {e}"))
}
