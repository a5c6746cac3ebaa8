mod util;

use indoc::indoc;
use util::{run_ok, run_program, NO_OUTPUT, RUNTIME_ERROR};

#[test]
fn call_and_return() {
    let input = indoc! {r#"
        fun add(a, b) { return a + b; }
        print add(1, 2);
    "#};
    run_ok(input, "3\n");
}

#[test]
fn recursion() {
    let input = indoc! {r#"
        fun fib(n) {
          if (n < 2) return n;
          return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
    "#};
    run_ok(input, "55\n");
}

#[test]
fn falling_off_the_end_returns_nil() {
    let input = indoc! {r#"
        fun noop() {}
        print noop();
    "#};
    run_ok(input, "nil\n");
}

#[test]
fn return_unwinds_nested_statements() {
    let input = indoc! {r#"
        fun find() {
          var i = 0;
          while (true) {
            if (i == 3) return i;
            i = i + 1;
          }
        }
        print find();
    "#};
    run_ok(input, "3\n");
}

#[test]
fn closures_keep_their_environment() {
    let input = indoc! {r#"
        fun makeCounter() {
          var count = 0;
          fun increment() {
            count = count + 1;
            return count;
          }
          return increment;
        }
        var counter = makeCounter();
        print counter();
        print counter();
    "#};
    run_ok(input, "1\n2\n");
}

#[test]
fn closures_capture_at_declaration() {
    // The function sees the binding that existed when it was declared;
    // the later shadowing declaration in the block never becomes visible
    // to it.
    let input = indoc! {r#"
        var a = "global";
        {
          fun show() { print a; }
          show();
          var a = "block";
          show();
        }
    "#};
    run_ok(input, "global\nglobal\n");
}

#[test]
fn arguments_evaluate_left_to_right() {
    let input = indoc! {r#"
        fun side(x) { print x; return x; }
        fun sum(a, b, c) { return a + b + c; }
        print sum(side(1), side(2), side(3));
    "#};
    run_ok(input, "1\n2\n3\n6\n");
}

#[test]
fn arity_is_enforced() {
    let input = indoc! {r#"
        fun f(a) {}
        f(1, 2);
    "#};
    let expected_error = indoc! {"
        Expected 1 arguments but got 2.
        [line 2]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn only_functions_and_classes_are_callable() {
    let input = r#""hello"();"#;
    let expected_error = indoc! {"
        Can only call functions and classes.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn functions_print_with_their_name() {
    let input = indoc! {r#"
        fun f() {}
        print f;
        print clock;
    "#};
    run_ok(input, "<fn f>\n<fn clock>\n");
}

#[test]
fn clock_returns_seconds() {
    let input = indoc! {r#"
        print clock() > 0;
        print clock() - clock() <= 0;
    "#};
    run_ok(input, "true\ntrue\n");
}
