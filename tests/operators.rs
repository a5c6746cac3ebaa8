mod util;

use indoc::indoc;
use util::{run_ok, run_program, NO_OUTPUT, RUNTIME_ERROR};

#[test]
fn arithmetic_precedence() {
    let input = indoc! {r#"
        print 1 + 2 * 3 - 4 / 2;
        print (1 + 2) * 3;
    "#};
    run_ok(input, "5\n9\n");
}

#[test]
fn string_concatenation() {
    let input = r#"print "foo" + "bar";"#;
    run_ok(input, "foobar\n");
}

#[test]
fn mixed_operands_for_plus() {
    let input = r#"print 1 + "a";"#;
    let expected_error = indoc! {"
        Operands must be two numbers or two strings.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn comparison_requires_numbers() {
    let input = r#"print 1 < "2";"#;
    let expected_error = indoc! {"
        Operands must be numbers.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn unary_minus_requires_a_number() {
    let input = r#"print -"a";"#;
    let expected_error = indoc! {"
        Operand must be a number.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn unary_operators() {
    let input = indoc! {r#"
        print -3;
        print !true;
        print !nil;
        print !0;
    "#};
    // Zero is truthy, so !0 is false.
    run_ok(input, "-3\nfalse\ntrue\nfalse\n");
}

#[test]
fn comparisons() {
    let input = indoc! {r#"
        print 1 < 2;
        print 2 <= 2;
        print 3 > 4;
        print 4 >= 4;
    "#};
    run_ok(input, "true\ntrue\nfalse\ntrue\n");
}

#[test]
fn equality() {
    let input = indoc! {r#"
        print nil == nil;
        print nil == false;
        print 1 == 1;
        print 1 == "1";
        print "a" == "a";
        print true == true;
        print 1 != 2;
    "#};
    run_ok(input, "true\nfalse\ntrue\nfalse\ntrue\ntrue\ntrue\n");
}

#[test]
fn nan_is_not_equal_to_itself() {
    let input = "print (0 / 0) == (0 / 0);";
    run_ok(input, "false\n");
}

#[test]
fn division_by_zero_follows_ieee() {
    let input = indoc! {r#"
        print 1 / 0;
        print -1 / 0;
        print 0 / 0;
    "#};
    run_ok(input, "inf\n-inf\nNaN\n");
}

#[test]
fn integer_valued_numbers_print_without_suffix() {
    let input = indoc! {r#"
        print 2;
        print 2.5;
        print 100;
        print 10 / 4;
        print 4 / 2;
    "#};
    run_ok(input, "2\n2.5\n100\n2.5\n2\n");
}

#[test]
fn binary_operands_evaluate_left_to_right() {
    let input = indoc! {r#"
        fun first() { print "first"; return 1; }
        fun second() { print "second"; return 2; }
        print first() + second();
    "#};
    run_ok(input, "first\nsecond\n3\n");
}
