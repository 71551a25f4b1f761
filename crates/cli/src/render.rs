//! Diagnostic output for the terminal and for JSON consumers.
//!
//! Pretty output goes to stderr so stdout stays reserved for artifacts.

use ariadne::{Color, Fmt};
use label_engine_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// How results and diagnostics are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured diagnostics on stderr, artifacts on stdout.
    Pretty,
    /// A single JSON document on stdout.
    Json,
}

impl Format {
    pub(crate) fn resolve(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            _ => Format::Pretty,
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn severity_label(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warn => "warning",
        Severity::Info => "info",
        _ => "diagnostic",
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Write each diagnostic to stderr with its context and explanation.
///
/// ```text
/// warning[LBL2002]: barcode content for "lot" cannot be encoded
///   = field: lot
///   = note: reason=non-ASCII character
///   = help: ...
/// ```
pub(crate) fn render_diagnostics_pretty<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
    for diag in diagnostics {
        let kind = severity_label(&diag.severity).fg(severity_color(&diag.severity));
        eprintln!("{kind}[{}]: {}", diag.id, diag.message);
        if let Some(field) = &diag.field {
            eprintln!("  = field: {field}");
        }
        if let Some(ctx) = &diag.context
            && !ctx.is_empty()
        {
            let note = ctx
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            eprintln!("  = note: {note}");
        }
        if let Some(explanation) = diag.explain() {
            eprintln!("  = help: {explanation}");
        }
    }
}

/// Print a coloured count line, e.g. `1 error, 2 warnings`. Silent when empty.
pub(crate) fn print_summary<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
    let (mut errors, mut warnings, mut infos) = (0usize, 0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            Severity::Info => infos += 1,
            _ => warnings += 1,
        }
    }

    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(format!("{errors} error{}", plural(errors)).fg(Color::Red).to_string());
    }
    if warnings > 0 {
        parts.push(
            format!("{warnings} warning{}", plural(warnings))
                .fg(Color::Yellow)
                .to_string(),
        );
    }
    if infos > 0 {
        parts.push(format!("{infos} info").fg(Color::Blue).to_string());
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}

/// Pretty-print diagnostics followed by the summary line.
pub(crate) fn report<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic> + Clone) {
    render_diagnostics_pretty(diagnostics.clone());
    print_summary(diagnostics);
}
