#![allow(dead_code)]

use vtlfmt::format;

/// Format `input` and compare against the expected rendering.
pub fn assert_format(input: &str, expected: &str) {
    let output = format(input);
    assert_eq!(
        output, expected,
        "format mismatch:\n--- input ---\n{input}\n--- expected ---\n{expected}\n--- got ---\n{output}"
    );
}

/// Format `input` twice and require a fixed point. The input must be
/// syntactically balanced, so the first pass must not error either.
pub fn assert_idempotent(input: &str) {
    let once = format(input);
    assert!(
        !once.starts_with("Error:"),
        "first pass errored for:\n{input}\n--- got ---\n{once}"
    );
    let twice = format(&once);
    assert_eq!(
        once, twice,
        "not idempotent:\n--- input ---\n{input}\n--- first ---\n{once}\n--- second ---\n{twice}"
    );
}

/// Collapse whitespace runs the way the lexer does: runs containing a
/// newline become `"\n"`, other runs become `" "`.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_whitespace() {
            let mut has_newline = ch == '\n';
            while let Some(&next) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                if next == '\n' {
                    has_newline = true;
                }
                chars.next();
            }
            out.push(if has_newline { '\n' } else { ' ' });
        } else {
            out.push(ch);
        }
    }
    out
}
