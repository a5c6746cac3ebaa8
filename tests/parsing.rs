mod util;

use indoc::indoc;
use util::{run_program, NO_OUTPUT, STATIC_ERROR};

#[test]
fn missing_semicolon() {
    let input = "print 1";
    let expected_error = indoc! {"
        [line 1] Error at end: Expect ';' after value.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn invalid_assignment_target() {
    let input = indoc! {r#"
        var a = 1;
        var b = 2;
        a + b = 3;
    "#};
    // Reported at the '=', but the left side still parses, so this is the
    // only diagnostic.
    let expected_error = indoc! {"
        [line 3] Error at '=': Invalid assignment target.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn missing_left_hand_operand() {
    let input = "* 5;";
    let expected_error = indoc! {"
        [line 1] Error at '*': Missing left-hand operand.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn missing_left_hand_operand_does_not_stop_parsing() {
    // The bad statement is dropped; the statements after it still parse,
    // but nothing runs.
    let input = indoc! {r#"
        <= 3;
        print "after";
    "#};
    let expected_error = indoc! {"
        [line 1] Error at '<=': Missing left-hand operand.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn synchronization_surfaces_later_errors() {
    let input = indoc! {r#"
        var = 1;
        print 2;
        var b = ;
    "#};
    let expected_error = indoc! {"
        [line 1] Error at '=': Expect variable name.
        [line 3] Error at ';': Expect expression.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn unclosed_grouping() {
    let input = "print (1 + 2;";
    let expected_error = indoc! {"
        [line 1] Error at ';': Expect ')' after expression.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn missing_property_name() {
    let input = "var x = 1; print x.;";
    let expected_error = indoc! {"
        [line 1] Error at ';': Expect property name after '.'.
    "};
    run_program(input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn too_many_arguments() {
    let args = (0..256).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let input = format!("fun f() {{}}\nf({args});");
    let expected_error = indoc! {"
        [line 2] Error at '255': Can't have more than 255 arguments.
    "};
    run_program(&input, NO_OUTPUT, expected_error, STATIC_ERROR);
}

#[test]
fn too_many_parameters() {
    let params = (0..256).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    let input = format!("fun f({params}) {{}}");
    let expected_error = indoc! {"
        [line 1] Error at 'p255': Can't have more than 255 parameters.
    "};
    run_program(&input, NO_OUTPUT, expected_error, STATIC_ERROR);
}
