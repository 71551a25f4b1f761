//! Render profile definitions and validation for the label layout engine.
//!
//! A [`Profile`] carries the per-target settings the engine needs beyond the
//! label description itself: the raster printer resolution, the 1-D barcode
//! module width, the preview scale, and the static job metadata written into
//! vector print jobs. [`Profile::default`] reproduces the built-in settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating a render profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// JSON deserialization failed.
    #[error("invalid profile JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Default raster printer resolution.
pub const DEFAULT_RASTER_DPI: u32 = 203;
/// Default preview scale in pixels per millimeter.
pub const DEFAULT_PREVIEW_PX_PER_MM: u32 = 4;
/// Default narrow-bar module width for 1-D barcodes, in dots.
pub const DEFAULT_MODULE_WIDTH: u32 = 2;

/// Settings for every output target.
///
/// # Example
/// ```
/// let profile = label_engine_profile::Profile::default();
/// assert_eq!(profile.raster.dpi, 203);
/// assert_eq!(profile.preview.px_per_mm, 4);
/// assert_eq!(profile.vector.printer_model, "G500");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    /// Unique profile identifier (e.g., `"godex-g500"`).
    pub id: String,
    /// Profile schema version for forward compatibility (e.g., `"1.0.0"`).
    pub schema_version: String,
    /// Dot-addressed thermal target settings.
    pub raster: RasterSetup,
    /// XML vector print-job settings.
    pub vector: VectorSetup,
    /// On-screen preview settings.
    pub preview: PreviewSetup,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            id: "default".into(),
            schema_version: "1.0.0".into(),
            raster: RasterSetup::default(),
            vector: VectorSetup::default(),
            preview: PreviewSetup::default(),
        }
    }
}

/// Raster (dot-addressed) target settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RasterSetup {
    /// Print resolution in dots per inch.
    pub dpi: u32,
    /// Narrow-bar width shared by every 1-D barcode on the label, in dots.
    pub module_width: u32,
}

impl Default for RasterSetup {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_RASTER_DPI,
            module_width: DEFAULT_MODULE_WIDTH,
        }
    }
}

/// Preview target settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PreviewSetup {
    /// Screen pixels per millimeter of paper.
    pub px_per_mm: u32,
}

impl Default for PreviewSetup {
    fn default() -> Self {
        Self {
            px_per_mm: DEFAULT_PREVIEW_PX_PER_MM,
        }
    }
}

/// Static job metadata for the vector print-job document.
///
/// None of these values affect layout; they are written verbatim into the
/// document header and `Setup` element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorSetup {
    /// `FormatVersion` element.
    pub format_version: u32,
    /// `QLabelSDKVersion` element.
    pub sdk_version: String,
    /// `GoLabelZoomFactor` element.
    pub zoom_factor: f64,
    /// Gap between labels in millimeters.
    pub gap_length_mm: u32,
    /// Print speed setting.
    pub speed: Range,
    /// Print darkness setting.
    pub darkness: Range,
    /// Printer resolution declared in the job.
    pub dpi: u32,
    /// `PrinterModel` element.
    pub printer_model: String,
    /// `PrinterLanguage` element.
    pub printer_language: String,
    /// Typeface used for the text shape.
    pub font_family: String,
}

impl Default for VectorSetup {
    fn default() -> Self {
        Self {
            format_version: 1,
            sdk_version: "1.5.8411.32259".into(),
            zoom_factor: 0.5,
            gap_length_mm: 3,
            speed: Range::fixed(4),
            darkness: Range::fixed(8),
            dpi: DEFAULT_RASTER_DPI,
            printer_model: "G500".into(),
            printer_language: "EZPL".into(),
            font_family: "Arial".into(),
        }
    }
}

/// A setting value with the bounds the target printer accepts.
///
/// Invariant: `min <= value <= max`. [`load_profile_from_str`] validates it
/// for deserialized profiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Range {
    /// Value written into the job.
    pub value: u32,
    /// Lower bound (inclusive).
    pub min: u32,
    /// Upper bound (inclusive).
    pub max: u32,
}

impl Range {
    /// `value` with the printer's default bounds of 0–30.
    pub fn fixed(value: u32) -> Self {
        Self {
            value,
            min: 0,
            max: 30,
        }
    }

    /// Try to create a new `Range`, returning `Err` if the invariant fails.
    pub fn try_new(value: u32, min: u32, max: u32) -> Result<Self, String> {
        if min > max {
            return Err(format!("min ({min}) must not exceed max ({max})"));
        }
        if value < min || value > max {
            return Err(format!("value ({value}) outside {min}..={max}"));
        }
        Ok(Self { value, min, max })
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ProfileError {
    ProfileError::InvalidField {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Load and validate a [`Profile`] from a JSON string.
///
/// Missing sections fall back to [`Profile::default`] values. After
/// deserialization:
/// - `id` and `schema_version` must be non-empty
/// - `raster.dpi` and `vector.dpi` must be in range 100–600
/// - `raster.module_width` must be in range 1–10
/// - `preview.px_per_mm` must be in range 1–20
/// - `vector.speed` and `vector.darkness` must satisfy `min <= value <= max`
/// - `vector.zoom_factor` must be positive
pub fn load_profile_from_str(s: &str) -> Result<Profile, ProfileError> {
    let profile: Profile = serde_json::from_str(s)?;
    validate(&profile)?;
    Ok(profile)
}

/// Validate an already-constructed profile.
pub fn validate(profile: &Profile) -> Result<(), ProfileError> {
    if profile.id.trim().is_empty() {
        return Err(invalid("id", "must not be empty"));
    }
    if profile.schema_version.trim().is_empty() {
        return Err(invalid("schema_version", "must not be empty"));
    }

    for (field, dpi) in [
        ("raster.dpi", profile.raster.dpi),
        ("vector.dpi", profile.vector.dpi),
    ] {
        if !(100..=600).contains(&dpi) {
            return Err(invalid(field, format!("{dpi} is outside 100..=600")));
        }
    }

    if !(1..=10).contains(&profile.raster.module_width) {
        return Err(invalid(
            "raster.module_width",
            format!("{} is outside 1..=10", profile.raster.module_width),
        ));
    }

    if !(1..=20).contains(&profile.preview.px_per_mm) {
        return Err(invalid(
            "preview.px_per_mm",
            format!("{} is outside 1..=20", profile.preview.px_per_mm),
        ));
    }

    for (field, r) in [
        ("vector.speed", &profile.vector.speed),
        ("vector.darkness", &profile.vector.darkness),
    ] {
        Range::try_new(r.value, r.min, r.max).map_err(|reason| invalid(field, reason))?;
    }

    if !(profile.vector.zoom_factor > 0.0) {
        return Err(invalid("vector.zoom_factor", "must be > 0"));
    }

    Ok(())
}
