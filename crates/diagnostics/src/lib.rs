//! Diagnostics for the label layout engine.
//!
//! Provides [`Diagnostic`] and [`Severity`], the records used to report
//! clamped geometry, unencodable content and target limitations without
//! aborting a render. Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Build a diagnostic context map from `key => value` pairs.
///
/// ```
/// let ctx = label_engine_diagnostics::ctx!("field" => "pt_code", "width" => "199");
/// assert_eq!(ctx.get("field").map(String::as_str), Some("pt_code"));
/// ```
#[macro_export]
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        ::std::collections::BTreeMap::<String, String>::from([$(($k.into(), $v.into())),+])
    };
}

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the artifact cannot be trusted.
    Error,
    /// Warning: the input was corrected or an element was replaced.
    Warn,
    /// Informational note about a target limitation.
    Info,
}

/// A diagnostic produced while planning or serializing a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"LBL2002"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Code of the content field this diagnostic concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            field: None,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Error, message)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Warn, message)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(id: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Info, message)
    }

    /// Attach the code of the content field this diagnostic concerns.
    pub fn for_field(mut self, code: impl Into<String>) -> Self {
        self.field = Some(code.into());
        self
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }

    /// `true` when this diagnostic has `Error` severity.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    codes::explain(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    #[test]
    fn diagnostic_constructors() {
        let d = Diagnostic::warn(codes::BARCODE_UNENCODABLE, "bad char");
        assert_eq!(d.id, "LBL2002");
        assert_eq!(d.severity, Severity::Warn);
        assert!(!d.is_error());
        assert!(d.field.is_none());

        let e = Diagnostic::error("CUSTOM", "boom");
        assert!(e.is_error());

        let i = Diagnostic::info(codes::ROTATION_UNSUPPORTED, "flat");
        assert_eq!(i.severity, Severity::Info);
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::warn(codes::ZERO_COPIES, "copies coerced to 1");
        assert_eq!(format!("{d}"), "warn[LBL1004]: copies coerced to 1");
    }

    #[test]
    fn for_field_attaches_code() {
        let d = Diagnostic::warn(codes::QR_UNENCODABLE, "too long").for_field("qr_payload");
        assert_eq!(d.field.as_deref(), Some("qr_payload"));
    }

    #[test]
    fn all_codes_have_explanations() {
        let all = [
            codes::MARGINS_EXCEED_PAPER,
            codes::TEXT_COLUMN_CLAMPED,
            codes::CONTENT_OVERFLOW,
            codes::ZERO_COPIES,
            codes::NEGATIVE_DIMENSION,
            codes::INVALID_LABEL_SIZE,
            codes::QR_UNENCODABLE,
            codes::BARCODE_UNENCODABLE,
            codes::ROTATION_UNSUPPORTED,
            codes::BARCODE_UNSUPPORTED,
        ];
        for code in &all {
            assert!(
                explain(code).is_some(),
                "diagnostic code {code} has no explain() entry"
            );
        }
        assert!(explain("LBL9999").is_none());
    }

    #[test]
    fn serde_omits_empty_optionals() {
        let d = Diagnostic::warn(codes::CONTENT_OVERFLOW, "tall");
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("field"), "None field should be omitted: {json}");
        assert!(!json.contains("context"), "None context should be omitted: {json}");
    }

    #[test]
    fn context_serializes_in_key_order() {
        let d = Diagnostic::warn(codes::TEXT_COLUMN_CLAMPED, "narrow").with_context(ctx!(
            "z_last" => "1",
            "a_first" => "2",
        ));
        let json = serde_json::to_string(&d).unwrap();
        let a = json.find("a_first").unwrap();
        let z = json.find("z_last").unwrap();
        assert!(a < z, "BTreeMap should serialize in key order: {json}");

        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
