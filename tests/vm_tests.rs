use luminar::driver;
use luminar::error::Error;
use luminar::vm::Limits;

fn print_output(source: &str) -> Vec<String> {
    let outcome = driver::run(source, "t", "t.lum", Limits::default()).unwrap();
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    outcome.output
}

#[test]
fn arithmetic_precedence_matches_the_reference_example() {
    assert_eq!(print_output("var x = 1 + 2 * 3; print(x);"), vec!["7"]);
}

#[test]
fn function_calls_return_values() {
    assert_eq!(print_output("fn add(a, b) { return a + b; } print(add(3, 4));"), vec!["7"]);
}

#[test]
fn a_void_function_called_as_a_bare_statement_leaves_no_stack_residue() {
    // fn touch has no RETURN_VALUE, just a plain RETURN, so it's the case
    // where a bare call-as-statement must discard whatever INVOKE_FUNCTION
    // nets without knowing ahead of time whether that's explicit or implicit.
    assert_eq!(
        print_output("fn touch(n) { var seen = n; } touch(1); var x = 2; print(x);"),
        vec!["2"]
    );
}

#[test]
fn an_arithmetic_expression_used_as_a_bare_statement_leaves_no_stack_residue() {
    assert_eq!(print_output("1 + 2; var x = 9; print(x);"), vec!["9"]);
}

#[test]
fn if_else_takes_the_right_branch() {
    assert_eq!(
        print_output("if (1 < 2) { print(\"yes\"); } else { print(\"no\"); }"),
        vec!["yes"]
    );
}

#[test]
fn string_interpolation_substitutes_in_order() {
    assert_eq!(
        print_output("var a = 1; var b = 2; print(\"{a} and {b}\");"),
        vec!["1 and 2"]
    );
}

#[test]
fn lists_and_dicts_print_with_type_aware_formatting() {
    assert_eq!(print_output("print(true);"), vec!["true"]);
    assert_eq!(print_output("print(nil);"), vec!["null"]);
}

#[test]
fn division_by_zero_is_an_arithmetic_error() {
    let outcome = driver::run("print(1 / 0);", "t", "t.lum", Limits::default());
    assert_eq!(outcome.unwrap_err(), Error::DivisionByZero);
}

#[test]
fn adding_a_number_and_a_string_is_a_type_error_not_silent_concatenation() {
    // Scenario 6: no defined string-additive path for mixed Int + String.
    let outcome = driver::run("var x = 1; x = x + \"a\";", "t", "t.lum", Limits::default());
    assert!(matches!(outcome, Err(Error::IncompatibleTypes { .. })));
}

#[test]
fn same_width_loop_counter_scenario_matches_the_reference_example() {
    assert_eq!(
        print_output("var i = 0; var s = 0; while (i < 5) { s = s + i; i = i + 1; } print(s);"),
        vec!["10"]
    );
}

#[test]
fn instruction_limit_stops_an_infinite_loop() {
    let outcome = driver::run(
        "while (true) { print(1); }",
        "t",
        "t.lum",
        Limits { max_instructions: Some(50), max_call_depth: None },
    );
    assert!(matches!(outcome, Err(Error::InstructionLimitExceeded(50))));
}

#[test]
fn recursion_limit_stops_unbounded_recursion() {
    let outcome = driver::run(
        "fn rec(n) { return rec(n); } print(rec(1));",
        "t",
        "t.lum",
        Limits { max_instructions: None, max_call_depth: Some(16) },
    );
    assert!(matches!(outcome, Err(Error::RecursionLimitExceeded(16))));
}
