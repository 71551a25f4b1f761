//! Shared test helpers for `label_engine_core` integration tests.

#![allow(unreachable_pub)]

use label_engine_core::{
    ContentField, Diagnostic, FieldRole, LabelSpec, LayoutPlan, Margins, Target, plan_label,
};
use label_engine_profile::Profile;

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// 100x80 mm paper with 6 mm margins on every side.
pub fn standard_spec() -> LabelSpec {
    LabelSpec {
        paper_width_mm: 100.0,
        paper_height_mm: 80.0,
        margins_mm: Margins::uniform(6.0),
        qr_size_mm: 25.0,
        ..LabelSpec::default()
    }
}

/// A text field.
pub fn text(code: &str, value: &str) -> ContentField {
    ContentField::new(code, value, FieldRole::Text)
}

/// A QR code field.
pub fn qr(code: &str, value: &str) -> ContentField {
    ContentField::new(code, value, FieldRole::QRCode)
}

/// A 1-D barcode field.
#[allow(dead_code)]
pub fn barcode(code: &str, value: &str) -> ContentField {
    ContentField::new(code, value, FieldRole::Barcode1D)
}

// ─── Plan helpers ────────────────────────────────────────────────────────────

/// Plan `fields` on `spec` for `target` with the default profile.
pub fn plan(spec: &LabelSpec, fields: &[ContentField], target: Target) -> LayoutPlan {
    plan_label(spec, fields, target, &Profile::default())
}

/// Collect diagnostic codes in order.
#[allow(dead_code)]
pub fn diag_codes(diags: &[Diagnostic]) -> Vec<String> {
    diags.iter().map(|d| d.id.to_string()).collect()
}

/// Assert every placed element lies inside the plan's printable area.
#[allow(dead_code)]
pub fn assert_inside_margins(plan: &LayoutPlan) {
    let area = plan.content_box;
    if let Some(text) = &plan.text {
        let b = text.bounds();
        assert!(area.contains(&b), "text {b:?} outside {area:?}");
        assert!(b.width >= 1 && b.height >= 1, "text {b:?} below 1 unit");
    }
    for image in &plan.images {
        let b = image.bounds();
        assert!(area.contains(&b), "image {b:?} outside {area:?}");
        assert!(b.width >= 1 && b.height >= 1, "image {b:?} below 1 unit");
    }
}
