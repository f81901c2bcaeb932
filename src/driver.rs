//! Wires the scanner, parser, and VM together for one source unit.
//!
//! Grounded on `littrs::sandbox::Sandbox::run`'s "compile, then execute"
//! shape, generalized to Luminar's three-stage pipeline and the diagnostic
//! propagation policy from `spec.md` §7: scanner and parser diagnostics are
//! collected rather than stopping the pass immediately, but execution never
//! starts if any were recorded.

use tracing::info;

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::error::Result;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::vm::{Limits, Vm};

/// Outcome of running one source unit: what was printed, plus every
/// diagnostic recorded along the way (empty on a clean run).
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub output: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans, parses, and (if no diagnostics were recorded) runs `source`.
///
/// This is the library-level entry point; it does not read files or parse
/// CLI arguments itself — [`crate::bin`] (and any REPL) layers that on top.
pub fn run(source: &str, file: &str, path: &str, limits: Limits) -> Result<RunOutcome> {
    let scanner = Scanner::new(source, file, path);
    let (tokens, scan_diagnostics) = scanner.scan_tokens();

    let parser = Parser::new(tokens);
    let (program, parse_diagnostics) = parser.parse();

    let mut diagnostics = scan_diagnostics;
    diagnostics.extend(parse_diagnostics);

    if !diagnostics.is_empty() {
        info!(count = diagnostics.len(), "halting before execution: diagnostics were recorded");
        return Ok(RunOutcome { output: Vec::new(), diagnostics });
    }

    let mut vm = Vm::with_limits(limits);
    vm.run(&program)?;
    Ok(RunOutcome { output: vm.print_output().to_vec(), diagnostics })
}

/// Run `source` and report every diagnostic through `sink`, per §6/§7's
/// dual stderr + `debug_log.log` policy.
pub fn run_and_report(
    source: &str,
    file: &str,
    path: &str,
    limits: Limits,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<String>> {
    let outcome = run(source, file, path, limits)?;
    for diagnostic in &outcome.diagnostics {
        sink.report(diagnostic);
    }
    Ok(outcome.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::CollectingSink;

    #[test]
    fn clean_program_runs_and_prints() {
        let outcome = run("print(1 + 2);", "t", "t.lum", Limits::default()).unwrap();
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.output, vec!["3".to_string()]);
    }

    #[test]
    fn parse_errors_prevent_execution() {
        let outcome = run("var = ;", "t", "t.lum", Limits::default()).unwrap();
        assert!(!outcome.diagnostics.is_empty());
        assert!(outcome.output.is_empty());
    }

    #[test]
    fn run_and_report_forwards_diagnostics_to_the_sink() {
        let mut sink = CollectingSink::default();
        let output =
            run_and_report("var = ;", "t", "t.lum", Limits::default(), &mut sink).unwrap();
        assert!(output.is_empty());
        assert!(!sink.diagnostics.is_empty());
    }
}
