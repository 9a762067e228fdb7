use pretty_assertions::assert_eq;

use super::*;

#[test]
fn builder_collects_labels_and_notes() {
    let span = Span::new(10, 20);
    let diag = Diagnostic::error(ErrorCode::E2101, "copy constructor is suppressed", span)
        .with_label("required here")
        .with_secondary_label(Span::new(0, 5), "suppressed here")
        .with_note("remove the suppression to allow copying");

    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.labels[0].span, span);
    assert!(!diag.labels[1].is_primary);
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn warning_keeps_code_and_message() {
    let diag = Diagnostic::warning(ErrorCode::E2103, "member lacks operation", Span::DUMMY);
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.code, ErrorCode::E2103);
    assert!(!diag.is_error());
}

#[test]
fn display_renders_code_and_message() {
    let diag = Diagnostic::error(ErrorCode::E2101, "copy constructor is suppressed", Span::new(1, 2))
        .with_label("required here");
    assert_eq!(
        diag.to_string(),
        "error[E2101]: copy constructor is suppressed\n  --> 1..2: required here"
    );
}
