mod util;

use indoc::indoc;
use util::{run_ok, run_program, NO_OUTPUT, RUNTIME_ERROR};

#[test]
fn classes_and_instances_print() {
    let input = indoc! {r#"
        class Foo {}
        print Foo;
        print Foo();
    "#};
    run_ok(input, "Foo\nFoo instance\n");
}

#[test]
fn fields_come_into_existence_on_assignment() {
    let input = indoc! {r#"
        class Foo {}
        var f = Foo();
        f.bar = 42;
        print f.bar;
    "#};
    run_ok(input, "42\n");
}

#[test]
fn methods_see_fields_through_this() {
    let input = indoc! {r#"
        class Cake {
          taste() {
            var adj = "delicious";
            print adj + " " + this.flavor + " cake";
          }
        }
        var c = Cake();
        c.flavor = "German chocolate";
        c.taste();
    "#};
    run_ok(input, "delicious German chocolate cake\n");
}

#[test]
fn initializer_sets_up_the_instance() {
    let input = indoc! {r#"
        class Point {
          init(x, y) {
            this.x = x;
            this.y = y;
          }
          sum() { return this.x + this.y; }
        }
        print Point(3, 4).sum();
    "#};
    run_ok(input, "7\n");
}

#[test]
fn initializer_arity_applies_to_the_class_call() {
    let input = indoc! {r#"
        class Point {
          init(x) { this.x = x; }
        }
        Point();
    "#};
    let expected_error = indoc! {"
        Expected 1 arguments but got 0.
        [line 4]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn calling_init_directly_returns_the_instance() {
    let input = indoc! {r#"
        class Foo {
          init() { this.n = 1; }
        }
        var foo = Foo();
        print foo.init();
    "#};
    run_ok(input, "Foo instance\n");
}

#[test]
fn bound_methods_remember_their_instance() {
    let input = indoc! {r#"
        class Person {
          sayName() { print this.name; }
        }
        var jane = Person();
        jane.name = "Jane";
        var method = jane.sayName;
        method();
    "#};
    run_ok(input, "Jane\n");
}

#[test]
fn methods_mutate_the_live_instance() {
    let input = indoc! {r#"
        class Counter {
          init() { this.count = 0; }
          add() { this.count = this.count + 1; }
          total() { return this.count; }
        }
        var c = Counter();
        c.add();
        c.add();
        print c.total();
    "#};
    run_ok(input, "2\n");
}

#[test]
fn fields_shadow_methods() {
    let input = indoc! {r#"
        class Box {
          value() { return "method"; }
        }
        var box = Box();
        print box.value();
        box.value = "field";
        print box.value;
    "#};
    run_ok(input, "method\nfield\n");
}

#[test]
fn undefined_property() {
    let input = indoc! {r#"
        class Foo {}
        print Foo().bar;
    "#};
    let expected_error = indoc! {"
        Undefined property 'bar'.
        [line 2]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn only_instances_have_properties() {
    let input = r#"print "str".length;"#;
    let expected_error = indoc! {"
        Only instances have properties.
        [line 1]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn only_instances_have_fields() {
    let input = indoc! {r#"
        var x = 1;
        x.field = 2;
    "#};
    let expected_error = indoc! {"
        Only instances have fields.
        [line 2]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn superclass_must_be_a_class() {
    let input = indoc! {r#"
        var NotAClass = "so not";
        class Sub < NotAClass {}
    "#};
    let expected_error = indoc! {"
        Superclass must be a class.
        [line 2]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}

#[test]
fn methods_are_inherited() {
    let input = indoc! {r#"
        class Doughnut {
          cook() { print "Fry until golden brown."; }
        }
        class BostonCream < Doughnut {}
        BostonCream().cook();
    "#};
    run_ok(input, "Fry until golden brown.\n");
}

#[test]
fn super_calls_the_superclass_method() {
    let input = indoc! {r#"
        class Doughnut {
          cook() { print "Fry until golden brown."; }
        }
        class BostonCream < Doughnut {
          cook() {
            super.cook();
            print "Pipe full of custard and coat with chocolate.";
          }
        }
        BostonCream().cook();
    "#};
    run_ok(
        input,
        "Fry until golden brown.\nPipe full of custard and coat with chocolate.\n",
    );
}

#[test]
fn super_resolves_against_the_declaring_class() {
    // C inherits test() from B; inside it, super still means A, not C's
    // superclass B.
    let input = indoc! {r#"
        class A {
          method() { print "A"; }
        }
        class B < A {
          method() { print "B"; }
          test() { super.method(); }
        }
        class C < B {}
        C().test();
    "#};
    run_ok(input, "A\n");
}

#[test]
fn super_method_must_exist() {
    let input = indoc! {r#"
        class A {}
        class B < A {
          m() { super.missing(); }
        }
        B().m();
    "#};
    let expected_error = indoc! {"
        Undefined property 'missing'.
        [line 3]
    "};
    run_program(input, NO_OUTPUT, expected_error, RUNTIME_ERROR);
}
