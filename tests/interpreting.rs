mod common;

use common::{output_of, run, runtime_error};
use pretty_assertions::assert_eq;
use treelox::{LoxError, RuntimeError};

#[test]
fn test_arithmetic() {
    assert_eq!(output_of("print 1 + 2 * 3;"), "7\n");
    assert_eq!(output_of("print (1 + 2) * 3;"), "9\n");
    assert_eq!(output_of("print 10 / 4; print 7 - 10; print -(3);"), "2.5\n-3\n-3\n");
}

#[test]
fn test_number_formatting() {
    assert_eq!(output_of("print 3.0; print 3.5; print 0.1 + 0.2;"), "3\n3.5\n0.30000000000000004\n");
}

#[test]
fn test_division_by_zero_follows_floating_point() {
    assert_eq!(output_of("print 1 / 0; print -1 / 0; print 0 / 0;"), "+Inf\n-Inf\nNaN\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(output_of("var a = \"x\"; print a + \"y\";"), "xy\n");
    assert_eq!(output_of("print \"\" + \"\";"), "\n");
}

#[test]
fn test_mixed_addition_is_a_type_error() {
    let run = run("1 + \"a\";");
    assert_eq!(run.output, "");
    assert!(matches!(
        run.result,
        Err(LoxError::Runtime(RuntimeError::Type { line: 1, .. }))
    ));
    assert_eq!(
        run.diagnostics,
        vec![runtime_error(1, "Operands must be two numbers or two strings.")]
    );
}

#[test]
fn test_numeric_operators_reject_other_types() {
    for source in [
        "print 1 - \"a\";",
        "print \"a\" * 2;",
        "print nil / 1;",
        "print 1 < \"2\";",
        "print true >= false;",
    ] {
        let run = run(source);
        assert_eq!(
            run.diagnostics,
            vec![runtime_error(1, "Operands must be numbers.")],
            "{source}"
        );
    }
}

#[test]
fn test_negating_non_number() {
    let run = run("print -\"a\";");
    assert_eq!(run.diagnostics, vec![runtime_error(1, "Operand must be a number.")]);
}

#[test]
fn test_equality_has_no_coercion() {
    assert_eq!(
        output_of(
            "print nil == nil; print nil == false; print 1 == 1; print \"a\" == \"a\";
             print 1 == \"1\"; print true != false; print 0 == false;"
        ),
        "true\nfalse\ntrue\ntrue\nfalse\ntrue\nfalse\n"
    );
}

#[test]
fn test_comparisons() {
    assert_eq!(
        output_of("print 1 < 2; print 2 <= 2; print 3 > 4; print 4 >= 5;"),
        "true\ntrue\nfalse\nfalse\n"
    );
}

#[test]
fn test_truthiness() {
    assert_eq!(
        output_of(
            "if (0) print \"zero\";
             if (\"\") print \"empty\";
             if (nil) print \"nil\"; else print \"falsy\";
             print !nil; print !0;"
        ),
        "zero\nempty\nfalsy\ntrue\nfalse\n"
    );
}

#[test]
fn test_logical_operators_return_operands() {
    assert_eq!(
        output_of("print nil or \"default\"; print 1 and 2; print false and 1; print 1 or 2;"),
        "default\n2\nfalse\n1\n"
    );
}

#[test]
fn test_logical_expression_statement_prints_nothing() {
    let run = run("true and false or true;");
    assert!(run.result.is_ok());
    assert_eq!(run.output, "");
    assert!(run.diagnostics.is_empty());
}

#[test]
fn test_or_short_circuits() {
    assert_eq!(
        output_of("var touched = 0; true or (touched = 1); print touched;"),
        "0\n"
    );
    assert_eq!(
        output_of("var touched = 0; false or (touched = 1); print touched;"),
        "1\n"
    );
}

#[test]
fn test_and_short_circuits() {
    assert_eq!(
        output_of("var touched = 0; nil and (touched = 1); print touched;"),
        "0\n"
    );
    assert_eq!(
        output_of("var touched = 0; 1 and (touched = 1); print touched;"),
        "1\n"
    );
}

#[test]
fn test_short_circuit_skips_errors() {
    assert_eq!(output_of("print true or undefined;"), "true\n");
    assert_eq!(output_of("print false and 1 + nil;"), "false\n");
}

#[test]
fn test_variables() {
    assert_eq!(output_of("var a; print a;"), "nil\n");
    assert_eq!(output_of("var a = 1; var a = 2; print a;"), "2\n");
    assert_eq!(output_of("var a = 1; print a = 5; print a;"), "5\n5\n");
    assert_eq!(output_of("var a; var b; a = b = 3; print a + b;"), "6\n");
}

#[test]
fn test_block_variable_is_invisible_afterwards() {
    let run = run("{ var x = 1; } print x;");
    assert_eq!(run.output, "");
    assert!(matches!(
        run.result,
        Err(LoxError::Runtime(RuntimeError::UndefinedVariable { ref name, .. })) if name == "x"
    ));
    assert_eq!(run.diagnostics, vec![runtime_error(1, "Undefined variable 'x'.")]);
}

#[test]
fn test_shadowing() {
    assert_eq!(
        output_of("var x = 1; { var x = 2; print x; } print x;"),
        "2\n1\n"
    );
}

#[test]
fn test_assignment_reaches_enclosing_scope() {
    assert_eq!(output_of("var x = 1; { x = 2; } print x;"), "2\n");
    assert_eq!(output_of("var x = 1; { { { x = x + 1; } } } print x;"), "2\n");
}

#[test]
fn test_assigning_undefined_variable_fails() {
    let run = run("y = 1;");
    assert_eq!(run.diagnostics, vec![runtime_error(1, "Undefined variable 'y'.")]);
}

#[test]
fn test_first_runtime_error_stops_the_run() {
    let run = run("print 1;\nprint -\"a\";\nprint 2;");
    assert_eq!(run.output, "1\n");
    assert_eq!(run.diagnostics, vec![runtime_error(2, "Operand must be a number.")]);
}

#[test]
fn test_runtime_error_line() {
    let run = run("var a = 1;\n\nprint a +\n nil;");
    assert_eq!(
        run.diagnostics,
        vec![runtime_error(3, "Operands must be two numbers or two strings.")]
    );
}

#[test]
fn test_if_else() {
    assert_eq!(
        output_of("if (1 < 2) print \"then\"; else print \"else\"; if (false) print \"skipped\";"),
        "then\n"
    );
    assert_eq!(output_of("if (nil) print 1; else print 2;"), "2\n");
}

#[test]
fn test_while_loop() {
    assert_eq!(
        output_of("var i = 0; while (i < 3) { print i; i = i + 1; }"),
        "0\n1\n2\n"
    );
}

#[test]
fn test_for_loop() {
    assert_eq!(
        output_of("for (var i = 0; i < 3; i = i + 1) print i;"),
        "0\n1\n2\n"
    );
}

#[test]
fn test_for_loop_variable_is_scoped() {
    let run = run("for (var i = 0; i < 1; i = i + 1) {} print i;");
    assert_eq!(run.diagnostics, vec![runtime_error(1, "Undefined variable 'i'.")]);
}

#[test]
fn test_break_stops_loop() {
    assert_eq!(
        output_of("var i = 0; while (true) { i = i + 1; if (i > 3) break; } print i;"),
        "4\n"
    );
    assert_eq!(
        output_of("for (var i = 0; i < 3; i = i + 1) { if (i == 1) break; print i; }"),
        "0\n"
    );
}

#[test]
fn test_break_only_leaves_innermost_loop() {
    assert_eq!(
        output_of(
            "var out = \"\";
             for (var i = 0; i < 2; i = i + 1) {
                 while (true) { out = out + \"w\"; break; }
                 out = out + \"f\";
             }
             print out;"
        ),
        "wfwf\n"
    );
}

#[test]
fn test_continue_skips_rest_of_iteration() {
    assert_eq!(
        output_of(
            "var i = 0;
             while (i < 4) {
                 i = i + 1;
                 if (i == 2) continue;
                 print i;
             }"
        ),
        "1\n3\n4\n"
    );
}

#[test]
fn test_continue_unwinds_nested_blocks() {
    assert_eq!(
        output_of(
            "var i = 0;
             var seen = \"\";
             while (i < 5) {
                 i = i + 1;
                 {
                     if (i == 2) { continue; }
                     seen = seen + \"a\";
                 }
                 seen = seen + \"b\";
             }
             print seen;"
        ),
        "abababab\n"
    );
}

#[test]
fn test_continue_in_for_skips_increment() {
    assert_eq!(
        output_of(
            "var n = 0;
             for (var i = 0; i < 3; i = i + 1) {
                 n = n + 1;
                 if (n < 3) continue;
                 print i;
             }"
        ),
        "0\n1\n2\n"
    );
}

#[test]
fn test_scope_restored_after_break() {
    assert_eq!(
        output_of("var x = \"outer\"; while (true) { var x = \"inner\"; break; } print x;"),
        "outer\n"
    );
}
