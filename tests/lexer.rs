//! Lexer coverage: classification of full templates and the
//! losslessness guarantee.

mod common;

use common::collapse_whitespace;
use vtlfmt::{TokenKind, tokenize};

/// Concatenating all token texts must reproduce the input modulo
/// whitespace collapsing.
fn assert_lossless(input: &str) {
    let joined: String = tokenize(input).iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        collapse_whitespace(&joined),
        collapse_whitespace(input),
        "lexer dropped or duplicated characters for:\n{input}"
    );
}

#[test]
fn lossless_on_realistic_templates() {
    assert_lossless("#if($user.loggedIn)\n  Hello $user.name\n#end\n");
    assert_lossless("#set($payload = {\"id\": $id, \"tags\": [1,2,3]})");
    assert_lossless("#foreach($item in $cart.items)\n  $item.price\n#end");
    assert_lossless("#macro(row $a $b)<td>$a</td><td>$b</td>#end");
    assert_lossless("## comment\n#* block\ncomment *#\n#[[ verbatim $x ]]#");
    assert_lossless("plain text with $vars and ${formal.refs} and $!silent");
}

#[test]
fn lossless_on_degenerate_inputs() {
    assert_lossless("");
    assert_lossless("#");
    assert_lossless("$");
    assert_lossless("$!");
    assert_lossless("\"unterminated");
    assert_lossless("#* never closed");
    assert_lossless("#[[ never closed");
    assert_lossless("${unclosed");
}

#[test]
fn full_template_classification() {
    let tokens = tokenize("#set($a = \"x\")\n#if($a == $b)$a#end");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Directive,   // #set
            TokenKind::Punctuation, // (
            TokenKind::Variable,    // $a
            TokenKind::Whitespace,
            TokenKind::Operator, // =
            TokenKind::Whitespace,
            TokenKind::StringLit,   // "x"
            TokenKind::Punctuation, // )
            TokenKind::Newline,
            TokenKind::Directive,   // #if
            TokenKind::Punctuation, // (
            TokenKind::Variable,    // $a
            TokenKind::Whitespace,
            TokenKind::Operator, // ==
            TokenKind::Whitespace,
            TokenKind::Variable,    // $b
            TokenKind::Punctuation, // )
            TokenKind::Variable,    // $a
            TokenKind::Directive,   // #end
        ]
    );
}

#[test]
fn every_character_is_covered() {
    // No input character may be skipped, even ones outside the VTL
    // grammar.
    let input = "a;b^c~d`e@f";
    let tokens = tokenize(input);
    let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(joined, input);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Unknown));
}

#[test]
fn silent_and_formal_variables() {
    let tokens = tokenize("$!{a.b} ${c} $!d $e");
    let vars: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Variable)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(vars, vec!["$!{a.b}", "${c}", "$!d", "$e"]);
}

#[test]
fn method_call_arguments_stay_inside_the_variable() {
    let tokens = tokenize("$input.path('$.items[0]')");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Variable);
    assert_eq!(tokens[0].text, "$input.path('$.items[0]')");
}

#[test]
fn directive_requires_letters() {
    let tokens = tokenize("#1");
    assert_eq!(tokens[0].kind, TokenKind::Text);
    assert_eq!(tokens[0].text, "#");
    assert_eq!(tokens[1].kind, TokenKind::Number);
}

#[test]
fn single_quoted_strings() {
    let tokens = tokenize("'it''s'");
    assert_eq!(tokens[0].kind, TokenKind::StringLit);
    assert_eq!(tokens[0].text, "'it'");
    assert_eq!(tokens[1].text, "'s'");
}
