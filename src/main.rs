use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

use clap::Parser;
use tracing::{debug, warn};

use treelox::{Lox, LoxError, ScanError};

/// Run a script, or start an interactive prompt when no script is given.
#[derive(Parser, Debug)]
#[command(name = "treelox")]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Print the token stream instead of running.
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the parsed statements instead of running.
    #[arg(long)]
    ast: bool,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Run,
    Tokens,
    Ast,
}

impl From<&Args> for Mode {
    fn from(args: &Args) -> Self {
        if args.tokens {
            Mode::Tokens
        } else if args.ast {
            Mode::Ast
        } else {
            Mode::Run
        }
    }
}

const EX_IOERR: u8 = 74;

static TRACING_INIT: Once = Once::new();

/// Enable with `RUST_LOG=treelox=debug` or `RUST_LOG=treelox=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    let mode = Mode::from(&args);

    match &args.script {
        Some(path) => run_file(path, mode),
        None => {
            run_prompt(mode);
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &Path, mode: Mode) -> ExitCode {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("Could not read '{}': {error}", path.display());
            return ExitCode::from(EX_IOERR);
        }
    };

    let mut lox = Lox::new();
    match run(&mut lox, &text, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(LoxError::Scan(ScanError::EmptySource)) => {
            warn!(path = %path.display(), "script is empty");
            ExitCode::SUCCESS
        }
        Err(error) => ExitCode::from(error.exit_code()),
    }
}

fn run_prompt(mode: Mode) {
    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(error)) => {
                eprintln!("Could not read input: {error}");
                break;
            }
            None => break,
        };

        if line.trim() == "exit()" {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        // diagnostics are already on stderr; the prompt keeps going
        if let Err(error) = run(&mut lox, &line, mode) {
            debug!(%error, "line failed");
        }
    }
}

fn run<W: Write>(lox: &mut Lox<W>, source: &str, mode: Mode) -> Result<(), LoxError> {
    let result = match mode {
        Mode::Run => lox.run(source),
        Mode::Tokens => lox
            .scan(source)
            .map(|tokens| {
                for token in tokens {
                    println!("{token}");
                }
            })
            .map_err(LoxError::from),
        Mode::Ast => lox.parse(source).map(|statements| {
            for statement in statements {
                println!("{statement}");
            }
        }),
    };

    if let Err(error) = lox.diagnostics().emit(io::stderr().lock()) {
        warn!(%error, "could not write diagnostics");
    }

    // a token dump still fails when scanning reported errors
    match result {
        Ok(()) if lox.diagnostics().had_error() => Err(LoxError::Compile {
            errors: lox.diagnostics().len(),
        }),
        result => result,
    }
}
