//! End-to-end formatting of realistic templates.

mod common;

use common::assert_format;
use vtlfmt::format;

#[test]
fn api_gateway_response_mapping() {
    assert_format(
        "#set($inputRoot = $input.path('$'))\n{\n\"id\": $inputRoot.id,\n\"name\": \"$inputRoot.name\"\n}",
        "#set($inputRoot = $input.path('$'))\n\
         {\n  \
           \"id\": $inputRoot.id,\n  \
           \"name\": \"$inputRoot.name\"\n\
         }",
    );
}

#[test]
fn nested_json_object_gets_its_own_line() {
    assert_format(
        "#set($body = $input.json('$'))\n{\"statusCode\": 200, \"body\": $body, \"headers\": {\"Content-Type\": \"application/json\"}}",
        "#set($body = $input.json('$'))\n\
         {\n  \
           \"statusCode\": 200,\n  \
           \"body\": $body,\n  \
           \"headers\":\n  \
           {\n    \
             \"Content-Type\": \"application/json\"\n  \
           }\n\
         }",
    );
}

#[test]
fn if_elseif_else_chain_with_operator_normalization() {
    assert_format(
        "#if($a==1)one#elseif($a == 2)two#else other#end",
        "#if($a == 1)\n  one\n#elseif($a == 2)\n  two\n#else\n  other\n#end",
    );
}

#[test]
fn foreach_in_keyword_gets_spaced() {
    assert_format(
        "#foreach($i in[1..3])$i#end",
        "#foreach($i in [1..3])\n  $i\n#end",
    );
}

#[test]
fn foreach_with_hasnext_separator() {
    assert_format(
        "#foreach($item in $items)\n{\"id\": $item.id}#if($foreach.hasNext),#end\n#end",
        "#foreach($item in $items)\n  \
           {\n    \
             \"id\": $item.id\n  \
           }\n  \
           #if($foreach.hasNext)\n    \
             ,\n  \
           #end\n\
         #end",
    );
}

#[test]
fn macro_definition_with_body() {
    assert_format(
        "#macro(greet $name)Hello $name#end",
        "#macro(greet $name)\n  Hello $name\n#end",
    );
}

#[test]
fn greeting_template_with_comment_and_set() {
    assert_format(
        "## greeting template\n#set($name = $user.name)\n#if($user.isActive&&$name)\n  Hello $name\n#else\n  Hello guest\n#end",
        "## greeting template\n\
         #set($name = $user.name)\n\
         #if($user.isActive && $name)\n  \
           Hello $name\n\
         #else\n  \
           Hello guest\n\
         #end",
    );
}

#[test]
fn consecutive_comments_indent_inside_block() {
    assert_format(
        "#if($debug)\n## first\n## second\n$log\n#end",
        "#if($debug)\n  ## first\n  ## second\n  $log\n#end",
    );
}

#[test]
fn trailing_comment_stays_on_its_line() {
    assert_format("$x ## trailing\n$y", "$x ## trailing\n$y");
}

#[test]
fn set_assignment_then_labeled_value() {
    assert_format(
        "#set($total = $cart.total())\nTotal: $total",
        "#set($total = $cart.total())\nTotal: $total",
    );
}

#[test]
fn stop_inside_block() {
    assert_format("#if($x)#stop#end", "#if($x)\n  #stop\n#end");
}

#[test]
fn parse_directive_keeps_its_argument() {
    assert_format(
        "#parse(\"common/header.vm\")\n$content",
        "#parse(\"common/header.vm\")\n$content",
    );
}

#[test]
fn unparsed_block_survives_inside_directives() {
    assert_format(
        "#if($raw)#[[ literal #end $x ]]##end",
        "#if($raw)\n  #[[ literal #end $x ]]#\n#end",
    );
}

#[test]
fn error_rendering_through_format() {
    assert_eq!(
        format("#if($a)"),
        "Error: 1 unclosed block(s) at end of input"
    );
    assert_eq!(
        format("#else"),
        "Error: unmatched '#else' with no open block"
    );
    assert_eq!(format("}"), "Error: unmatched '}' with no open block");
}

#[test]
fn deeply_nested_blocks() {
    assert_format(
        "#if($a)#if($b)#if($c)$x#end#end#end",
        "#if($a)\n  #if($b)\n    #if($c)\n      $x\n    #end\n  #end\n#end",
    );
}

#[test]
fn whitespace_noise_is_normalized() {
    assert_format("#if($a)   \n\n\n   $a   \n\n  #end", "#if($a)\n  $a\n#end");
}
