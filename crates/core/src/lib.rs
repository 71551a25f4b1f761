//! Label layout and print-command generation.
//!
//! A label is described by a [`LabelSpec`] and an ordered list of
//! [`ContentField`]s. [`classify`] splits the fields into text lines and image
//! families, [`plan_layout`] positions everything in one target's device
//! units, and a [`Serializer`] turns the resulting [`LayoutPlan`] into a ZPL
//! command stream, an XML print job, or an HTML preview.
//!
//! ```
//! use label_engine_core::{ContentField, FieldRole, LabelSpec, Target, render_label};
//! use label_engine_profile::Profile;
//!
//! let fields = [
//!     ContentField::new("pt_code", "ABC123", FieldRole::Text).named("PT"),
//!     ContentField::new("qr", "ABC123", FieldRole::QRCode),
//! ];
//! let out = render_label(&LabelSpec::default(), &fields, Target::Raster, &Profile::default())
//!     .unwrap();
//! assert!(out.rendered.as_str().starts_with("^XA"));
//! ```

#![warn(missing_docs)]

/// Catalog records and request preparation.
pub mod catalog;
/// Field classification and display-name resolution.
pub mod classify;
/// Hex escaping for raster field data.
pub mod escape;
/// The layout engine.
pub mod layout;
/// Label description types.
pub mod model;
/// Output serializers.
pub mod serialize;
/// Symbology encodability checks.
pub mod symbology;
/// Unit conversion.
pub mod units;

// ── Convenience re-exports ──────────────────────────────────────────────

pub use catalog::{CatalogError, LabelRequest, PreparedLabel};
pub use classify::{Classified, DisplayNames, classify};
pub use layout::{ImageElement, ImageKind, LayoutPlan, Rect, TextBlock, plan_layout};
pub use model::{ContentField, FieldRole, LabelSpec, Margins, Orientation};
pub use serialize::{
    PreviewRenderer, RasterSerializer, Rendered, SerializeError, Serializer, VectorSerializer,
    serializer_for,
};
pub use units::{Scale, Target};

pub use label_engine_diagnostics::{Diagnostic, Severity, codes};

use label_engine_profile::Profile;

/// A plan together with the artifact serialized from it.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// The layout the artifact was produced from.
    pub plan: LayoutPlan,
    /// The artifact.
    pub rendered: Rendered,
}

impl RenderOutput {
    /// Plan and serializer diagnostics, in that order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.plan
            .diagnostics
            .iter()
            .chain(self.rendered.diagnostics.iter())
    }
}

/// Classify and lay out `fields` for `target`.
///
/// Display names come from the fields' own catalog names only; use
/// [`plan_prepared`] to include the system name map.
pub fn plan_label(
    spec: &LabelSpec,
    fields: &[ContentField],
    target: Target,
    profile: &Profile,
) -> LayoutPlan {
    let names = DisplayNames::default().overlay_fields(fields);
    plan_layout(spec, &classify(fields, &names), target.scale(profile))
}

/// Lay out a prepared catalog request for `target`.
///
/// Preparation diagnostics are carried onto the plan ahead of layout ones.
pub fn plan_prepared(prepared: &PreparedLabel, target: Target, profile: &Profile) -> LayoutPlan {
    let content = classify(&prepared.fields, &prepared.names);
    let mut plan = plan_layout(&prepared.spec, &content, target.scale(profile));
    let mut diagnostics = prepared.diagnostics.clone();
    diagnostics.append(&mut plan.diagnostics);
    plan.diagnostics = diagnostics;
    plan
}

/// Lay out and serialize `fields` for `target` in one step.
pub fn render_label(
    spec: &LabelSpec,
    fields: &[ContentField],
    target: Target,
    profile: &Profile,
) -> Result<RenderOutput, SerializeError> {
    render_plan(plan_label(spec, fields, target, profile), target, profile)
}

/// Serialize an existing plan with the serializer for `target`.
pub fn render_plan(
    plan: LayoutPlan,
    target: Target,
    profile: &Profile,
) -> Result<RenderOutput, SerializeError> {
    let rendered = serializer_for(target, profile).serialize(&plan)?;
    Ok(RenderOutput { plan, rendered })
}
