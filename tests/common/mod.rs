use treelox::{Lox, LoxError};

/// Everything observable from one program run.
pub struct Run {
    pub output: String,
    pub result: Result<(), LoxError>,
    pub diagnostics: Vec<String>,
}

#[allow(dead_code)]
pub fn run(source: &str) -> Run {
    let mut lox = Lox::with_output(Vec::new());
    let result = lox.run(source);
    let diagnostics = lox.diagnostics().iter().map(ToString::to_string).collect();
    let output = String::from_utf8(lox.into_output()).expect("output is UTF-8");

    Run {
        output,
        result,
        diagnostics,
    }
}

/// Run a program that must succeed and return what it printed.
#[allow(dead_code)]
pub fn output_of(source: &str) -> String {
    let run = run(source);
    assert!(
        run.result.is_ok(),
        "program failed: {:?}\n{}",
        run.result,
        run.diagnostics.join("\n")
    );
    run.output
}

/// The stderr text of a runtime error: the error line, then the message and
/// its line again.
#[allow(dead_code)]
pub fn runtime_error(line: usize, message: &str) -> String {
    format!("[line {line}] Error: {message}\n{message}\n[line {line}]")
}
