//! Serializers that turn a [`LayoutPlan`] into a target artifact.
//!
//! Serializers perform no geometry: every coordinate comes from the plan.
//! Each one expects the plan to have been computed in its own target's
//! device scale.

mod preview;
mod raster;
mod vector;

pub use preview::PreviewRenderer;
pub use raster::{RasterSerializer, qr_magnification};
pub use vector::VectorSerializer;

pub use crate::symbology::QR_VERSION1_MODULES;

use label_engine_diagnostics::Diagnostic;
use label_engine_profile::Profile;
use thiserror::Error;

use crate::layout::LayoutPlan;
use crate::units::{Scale, Target};

/// Errors that prevent a serializer from producing any output.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The plan was computed for a different device scale.
    #[error("{target} serializer needs a plan in {expected}, got {found:?}")]
    ScaleMismatch {
        /// The serializer's target.
        target: Target,
        /// The scale family the target expects.
        expected: &'static str,
        /// The plan's scale.
        found: Scale,
    },
    /// Formatting into the output buffer failed.
    #[error("failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
}

/// A serialized artifact plus the target-specific notes raised while writing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Output bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub media_type: &'static str,
    /// Target limitations hit while serializing. Plan diagnostics are not repeated.
    pub diagnostics: Vec<Diagnostic>,
}

impl Rendered {
    /// The output as UTF-8 text. Every built-in serializer produces UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Converts a [`LayoutPlan`] into one output format.
pub trait Serializer {
    /// The target this serializer writes.
    fn target(&self) -> Target;

    /// Serialize `plan`. The same plan always yields identical bytes.
    fn serialize(&self, plan: &LayoutPlan) -> Result<Rendered, SerializeError>;
}

/// Build the serializer for `target`, configured from `profile`.
pub fn serializer_for(target: Target, profile: &Profile) -> Box<dyn Serializer> {
    match target {
        Target::Raster => Box::new(RasterSerializer::from_profile(profile)),
        Target::Vector => Box::new(VectorSerializer::from_profile(profile)),
        Target::Preview => Box::new(PreviewRenderer),
    }
}

pub(crate) fn scale_mismatch(target: Target, expected: &'static str, found: Scale) -> SerializeError {
    SerializeError::ScaleMismatch {
        target,
        expected,
        found,
    }
}
