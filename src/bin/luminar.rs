//! Thin file-driver CLI: run a single Luminar source file and exit.
//!
//! Deliberately not an interactive REPL; argument parsing here is limited to
//! "the first argument is a file path," per this crate's scope.

use std::fs;
use std::process::ExitCode;

use luminar::diagnostic::DebugLogSink;
use luminar::driver;
use luminar::vm::Limits;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: luminar <file.lum>");
        return ExitCode::FAILURE;
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read '{path}': {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink = DebugLogSink::new();
    match driver::run_and_report(&source, &path, &path, Limits::default(), &mut sink) {
        Ok(output) => {
            for line in output {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
