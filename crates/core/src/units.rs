//! Unit conversion between millimeters, points and per-target device units.
//!
//! Every length the layout engine works with passes through this module.
//! Device units are integers; conversions truncate toward zero unless a
//! function says otherwise.

use label_engine_profile::Profile;
use serde::{Deserialize, Serialize};

use crate::symbology::QR_VERSION1_MODULES;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;
/// Typographic points per inch.
pub const PT_PER_INCH: f64 = 72.0;
/// Gap between the text column and the image column, and between stacked images.
pub const IMAGE_SPACING_MM: f64 = 2.0;
/// Gap between text lines (5 dots at 203 dpi).
pub const LINE_SPACING_MM: f64 = 0.625;
/// Smallest image side on the millimeter-native vector target.
pub const MIN_IMAGE_SIDE_MM: f64 = 4.0;

// ── Targets and scales ──────────────────────────────────────────────────

/// An output target the engine can lay out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Dot-addressed thermal command stream.
    Raster,
    /// Millimeter-native XML print job.
    Vector,
    /// On-screen HTML preview.
    Preview,
}

impl Target {
    /// Resolve the device scale this target uses under `profile`.
    pub fn scale(self, profile: &Profile) -> Scale {
        match self {
            Target::Raster => Scale::Dots {
                dpi: profile.raster.dpi,
            },
            Target::Vector => Scale::Millimeters,
            Target::Preview => Scale::PixelsPerMm {
                px_per_mm: profile.preview.px_per_mm,
            },
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Raster => f.write_str("raster"),
            Target::Vector => f.write_str("vector"),
            Target::Preview => f.write_str("preview"),
        }
    }
}

/// The coordinate system of one target's device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum Scale {
    /// Printer dots at the given resolution.
    Dots {
        /// Dots per inch.
        dpi: u32,
    },
    /// Whole millimeters.
    Millimeters,
    /// Screen pixels.
    PixelsPerMm {
        /// Pixels per millimeter of paper.
        px_per_mm: u32,
    },
}

impl Scale {
    /// Device units per millimeter, as a real factor.
    pub fn units_per_mm(self) -> f64 {
        match self {
            Scale::Dots { dpi } => f64::from(dpi) / MM_PER_INCH,
            Scale::Millimeters => 1.0,
            Scale::PixelsPerMm { px_per_mm } => f64::from(px_per_mm),
        }
    }

    /// Short unit name for logs and diagnostics.
    pub fn unit_name(self) -> &'static str {
        match self {
            Scale::Dots { .. } => "dots",
            Scale::Millimeters => "mm",
            Scale::PixelsPerMm { .. } => "px",
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────────

/// Convert millimeters to device units, truncating toward zero.
///
/// ```
/// use label_engine_core::units::{Scale, mm_to_device};
/// assert_eq!(mm_to_device(25.0, Scale::Dots { dpi: 203 }), 199);
/// assert_eq!(mm_to_device(25.0, Scale::Millimeters), 25);
/// assert_eq!(mm_to_device(25.0, Scale::PixelsPerMm { px_per_mm: 4 }), 100);
/// ```
pub fn mm_to_device(mm: f64, scale: Scale) -> i64 {
    match scale {
        Scale::Dots { dpi } => (mm * f64::from(dpi) / MM_PER_INCH) as i64,
        Scale::Millimeters => mm as i64,
        Scale::PixelsPerMm { px_per_mm } => (mm * f64::from(px_per_mm)) as i64,
    }
}

/// Convert a point size to dots at `dpi`, truncating toward zero.
pub fn pt_to_dots(pt: f64, dpi: u32) -> i64 {
    (pt * f64::from(dpi) / PT_PER_INCH) as i64
}

/// Height of one text line in device units for a font of `pt` points.
///
/// Never less than 1.
pub fn font_height(pt: f64, scale: Scale) -> i64 {
    let units = match scale {
        Scale::Dots { dpi } => pt_to_dots(pt, dpi),
        _ => mm_to_device(pt * MM_PER_INCH / PT_PER_INCH, scale),
    };
    units.max(1)
}

/// Gap between text lines in device units (rounded, at least 1).
pub fn line_spacing(scale: Scale) -> i64 {
    ((LINE_SPACING_MM * scale.units_per_mm()).round() as i64).max(1)
}

/// Gap between layout columns and stacked images in device units.
pub fn image_spacing(scale: Scale) -> i64 {
    mm_to_device(IMAGE_SPACING_MM, scale)
}

/// Smallest side an image may be squeezed to before it is left off the label.
///
/// Dot- and pixel-addressed targets cannot draw a QR symbol smaller than one
/// unit per module; the vector target scales symbols to their box.
pub fn min_image_side(scale: Scale) -> i64 {
    match scale {
        Scale::Millimeters => mm_to_device(MIN_IMAGE_SIDE_MM, scale),
        Scale::Dots { .. } | Scale::PixelsPerMm { .. } => QR_VERSION1_MODULES,
    }
}
