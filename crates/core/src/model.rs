//! Label descriptions accepted by the layout engine.

use serde::{Deserialize, Serialize};

/// Margins around the printable area, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
    /// Right margin.
    pub right: f64,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            bottom: mm,
            left: mm,
            right: mm,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN_MM)
    }
}

/// Text direction on the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Normal left-to-right reading order.
    #[default]
    Horizontal,
    /// Rotated 90°: text reads bottom-to-top and grows toward the left.
    #[serde(alias = "vertical")]
    Rotated,
}

/// Default margin on every side, in millimeters.
pub const DEFAULT_MARGIN_MM: f64 = 6.0;
/// Default font size in points.
pub const DEFAULT_FONT_SIZE_PT: f64 = 12.0;
/// Default side of a QR / 2-D symbol, in millimeters.
pub const DEFAULT_QR_SIZE_MM: f64 = 25.0;
/// Default 1-D barcode size (width, height), in millimeters.
pub const DEFAULT_BARCODE_SIZE_MM: (f64, f64) = (60.0, 15.0);

/// Physical description of one label.
///
/// Invariant (enforced by clamping in the layout engine, not on construction):
/// margins are non-negative and leave a positive printable area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSpec {
    /// Paper width in millimeters.
    pub paper_width_mm: f64,
    /// Paper height in millimeters.
    pub paper_height_mm: f64,
    /// Margins in millimeters.
    pub margins_mm: Margins,
    /// Text font size in points.
    pub font_size_pt: f64,
    /// Text direction.
    pub orientation: Orientation,
    /// Number of copies to print.
    pub copies: u32,
    /// Side of every QR / 2-D symbol, in millimeters.
    pub qr_size_mm: f64,
    /// Width and height of every 1-D barcode, in millimeters.
    pub barcode_size_mm: (f64, f64),
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            paper_width_mm: 100.0,
            paper_height_mm: 80.0,
            margins_mm: Margins::default(),
            font_size_pt: DEFAULT_FONT_SIZE_PT,
            orientation: Orientation::Horizontal,
            copies: 1,
            qr_size_mm: DEFAULT_QR_SIZE_MM,
            barcode_size_mm: DEFAULT_BARCODE_SIZE_MM,
        }
    }
}

/// What a content field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRole {
    /// A `label: value` text line.
    Text,
    /// A QR code symbol.
    QRCode,
    /// A generic 2-D barcode, drawn as QR.
    Barcode2D,
    /// A Code 128 linear barcode.
    Barcode1D,
}

impl FieldRole {
    /// Map a catalog type tag to a role. Unknown tags are text.
    pub fn from_type_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "QRCODE" => FieldRole::QRCode,
            "BARCODE_2D" => FieldRole::Barcode2D,
            "BARCODE_1D" => FieldRole::Barcode1D,
            _ => FieldRole::Text,
        }
    }

    /// `true` for roles in the QR visual family.
    pub fn is_qr_family(self) -> bool {
        matches!(self, FieldRole::QRCode | FieldRole::Barcode2D)
    }
}

/// One named piece of label content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentField {
    /// Unique field key.
    pub code: String,
    /// Catalog-supplied display name; empty when the catalog has none.
    #[serde(default)]
    pub display_name: String,
    /// Runtime value. Blank values are excluded from layout.
    #[serde(default)]
    pub value: String,
    /// How the field renders.
    pub role: FieldRole,
}

impl ContentField {
    /// Create a field with no catalog display name.
    pub fn new(code: impl Into<String>, value: impl Into<String>, role: FieldRole) -> Self {
        Self {
            code: code.into(),
            display_name: String::new(),
            value: value.into(),
            role,
        }
    }

    /// Attach a catalog display name (builder pattern).
    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// `true` when the value is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}
