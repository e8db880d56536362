mod common;

use pretty_assertions::assert_eq;
use treelox::{Lox, LoxError, ScanError};

fn printed(lox: Lox<Vec<u8>>) -> String {
    String::from_utf8(lox.into_output()).unwrap()
}

#[test]
fn test_globals_persist_between_runs() {
    let mut lox = Lox::with_output(Vec::new());
    lox.run("var a = 1;").unwrap();
    lox.run("a = a + 1;").unwrap();
    lox.run("print a;").unwrap();
    assert_eq!(printed(lox), "2\n");
}

#[test]
fn test_diagnostics_reset_for_each_run() {
    let mut lox = Lox::with_output(Vec::new());

    assert!(matches!(lox.run("print ;"), Err(LoxError::Compile { errors: 1 })));
    assert!(lox.diagnostics().had_error());

    lox.run("print 2;").unwrap();
    assert!(lox.diagnostics().is_empty());
    assert!(!lox.diagnostics().had_error());

    assert!(matches!(lox.run("print x;"), Err(LoxError::Runtime(_))));
    assert!(lox.diagnostics().had_runtime_error());

    lox.run("print 3;").unwrap();
    assert!(!lox.diagnostics().had_runtime_error());
    assert_eq!(printed(lox), "2\n3\n");
}

#[test]
fn test_parse_error_prevents_execution() {
    let run = common::run("print 1;\nprint ;\nprint 2;");
    assert_eq!(run.output, "");
    assert!(matches!(run.result, Err(LoxError::Compile { errors: 1 })));
    assert_eq!(run.diagnostics, vec!["[line 2] Error at ';': Expected expression."]);
}

#[test]
fn test_scan_error_prevents_execution() {
    let run = common::run("print 1;\n@");
    assert_eq!(run.output, "");
    assert!(matches!(run.result, Err(LoxError::Compile { .. })));
    assert_eq!(run.diagnostics, vec!["[line 2] Error: Unexpected Character Encountered"]);
}

#[test]
fn test_scan_and_parse_errors_are_both_reported() {
    let run = common::run("\"open\nprint ;");
    assert_eq!(run.diagnostics, vec!["[line 2] Error: Unterminated string."]);

    let run = common::run("@ print ;");
    assert_eq!(
        run.diagnostics,
        vec![
            "[line 1] Error: Unexpected Character Encountered",
            "[line 1] Error at ';': Expected expression.",
        ]
    );
}

#[test]
fn test_empty_source() {
    let mut lox = Lox::with_output(Vec::new());
    assert!(matches!(
        lox.run(""),
        Err(LoxError::Scan(ScanError::EmptySource))
    ));
}

#[test]
fn test_block_scope_dropped_after_runtime_error() {
    let mut lox = Lox::with_output(Vec::new());
    assert!(lox.run("{ var y = 1; { var z = 2; y + nil; } }").is_err());
    assert_eq!(lox.interpreter().environment().depth(), 1);

    let result = lox.run("print y;");
    assert!(matches!(result, Err(LoxError::Runtime(_))));
    assert_eq!(
        lox.diagnostics().iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec![common::runtime_error(1, "Undefined variable 'y'.")]
    );
}

#[test]
fn test_parse_without_running() {
    let mut lox = Lox::with_output(Vec::new());
    let statements = lox.parse("var a = 1; print a;").unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(printed(lox), "");
}

#[test]
fn test_exit_codes() {
    let compile = common::run("print");
    assert_eq!(compile.result.unwrap_err().exit_code(), 65);

    let runtime = common::run("print -nil;");
    assert_eq!(runtime.result.unwrap_err().exit_code(), 70);
}
