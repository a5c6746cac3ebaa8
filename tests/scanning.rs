mod util;

use indoc::indoc;
use util::{run_ok, run_program, NO_OUTPUT, RUNTIME_ERROR, STATIC_ERROR};

#[test]
fn unexpected_character() {
    let input = "var a = 1; @";
    let expected_error = indoc! {"
        [line 1] Error: Unexpected character: @
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn unterminated_string() {
    let input = "var s = \"abc";
    // The scanner reports, and the parser then runs out of tokens where
    // the string should have been.
    let expected_error = indoc! {"
        [line 1] Error: Unterminated string.
        [line 1] Error at end: Expect expression.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn line_comments_are_skipped() {
    let input = indoc! {r#"
        // a leading comment
        print 2; // a trailing comment
    "#};
    run_ok(input, "2\n");
}

#[test]
fn block_comments_are_skipped() {
    let input = indoc! {r#"
        /* a block comment
           spanning lines */
        print 1;
        print /* inline */ 2;
    "#};
    run_ok(input, "1\n2\n");
}

#[test]
fn unterminated_block_comment() {
    let input = "print 1; /* never closed";
    let expected_error = indoc! {"
        [line 1] Error: Unterminated block comment.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn multiline_strings_count_lines() {
    // The string body spans two lines, so the error below it lands on
    // line 3.
    let input = indoc! {r#"
        var s = "a
        b";
        print "x" + y;
    "#};
    let expected_error = indoc! {"
        Undefined variable 'y'.
        [line 3]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn number_literals() {
    let input = indoc! {r#"
        print 123;
        print 123.456;
        print 0.5;
    "#};
    run_ok(input, "123\n123.456\n0.5\n");
}

#[test]
fn identifiers_may_shadow_keyword_prefixes() {
    let input = indoc! {r#"
        var classy = 1;
        var fortune = 2;
        print classy + fortune;
    "#};
    run_ok(input, "3\n");
}
