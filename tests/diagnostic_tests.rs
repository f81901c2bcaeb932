use luminar::diagnostic::{CollectingSink, Diagnostic, DiagnosticSink, Span, Stage};

#[test]
fn display_wraps_the_message_in_debug_markers() {
    let diag = Diagnostic::new(Stage::Syntax, "missing ';'")
        .with_source("var x = 1")
        .with_label(Span::new(4, 5), "here")
        .with_sample_solution_lookup();
    let text = diag.to_string();
    assert!(text.starts_with("--- DEBUG ---"));
    assert!(text.trim_end().ends_with("--- END ---"));
    assert!(text.contains("stage: Syntax"));
    assert!(text.contains("sample:"));
}

#[test]
fn sample_solution_lookup_is_keyed_by_message_substring() {
    let diag = Diagnostic::new(Stage::Semantic, "undefined variable: x").with_sample_solution_lookup();
    assert!(diag.sample_solution.unwrap().contains("declare"));
}

#[test]
fn diagnostics_with_no_known_sample_have_none() {
    let diag = Diagnostic::new(Stage::Interpreting, "stack underflow").with_sample_solution_lookup();
    assert!(diag.sample_solution.is_none());
}

#[test]
fn collecting_sink_preserves_report_order() {
    let mut sink = CollectingSink::default();
    sink.report(&Diagnostic::new(Stage::Lexical, "first"));
    sink.report(&Diagnostic::new(Stage::Lexical, "second"));
    assert_eq!(sink.diagnostics.len(), 2);
    assert!(sink.diagnostics[0].contains("first"));
    assert!(sink.diagnostics[1].contains("second"));
}
