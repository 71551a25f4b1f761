//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every constant has an [`explain`](crate::explain)
//! entry.

// ── Geometry (LBL10xx) ──────────────────────────────────────────────────

/// Margins leave no printable width or height.
pub const MARGINS_EXCEED_PAPER: &str = "LBL1001";
/// The image column plus spacing is wider than the printable width.
pub const TEXT_COLUMN_CLAMPED: &str = "LBL1002";
/// A content group does not fit inside the printable area.
pub const CONTENT_OVERFLOW: &str = "LBL1003";
/// A copy count of zero was requested.
pub const ZERO_COPIES: &str = "LBL1004";
/// A negative margin or image size was supplied.
pub const NEGATIVE_DIMENSION: &str = "LBL1005";

// ── Catalog (LBL11xx) ───────────────────────────────────────────────────

/// The requirement's label size string could not be parsed.
pub const INVALID_LABEL_SIZE: &str = "LBL1101";

// ── Content encoding (LBL20xx) ──────────────────────────────────────────

/// QR / 2-D content cannot be encoded.
pub const QR_UNENCODABLE: &str = "LBL2001";
/// 1-D barcode content contains characters outside Code 128.
pub const BARCODE_UNENCODABLE: &str = "LBL2002";

// ── Target limitations (LBL30xx) ────────────────────────────────────────

/// The output target cannot rotate text.
pub const ROTATION_UNSUPPORTED: &str = "LBL3001";
/// The output target has no 1-D barcode shape.
pub const BARCODE_UNSUPPORTED: &str = "LBL3002";

pub(crate) fn explain(id: &str) -> Option<&'static str> {
    match id {
        MARGINS_EXCEED_PAPER => Some(
            "The left+right or top+bottom margins are at least as large as the paper. \
             The printable area is clamped to 1 device unit so a layout is still produced.",
        ),
        TEXT_COLUMN_CLAMPED => Some(
            "The widest image plus the fixed image spacing does not leave room for the text \
             column. The text column width is clamped to 1 device unit.",
        ),
        CONTENT_OVERFLOW => Some(
            "The text block or the image stack does not fit inside the printable area. A group \
             taller than the printable height starts at the top margin. An image reaching \
             past the bottom margin is squeezed into the remaining room, and a QR symbol \
             stays square. An image with less room than the smallest printable symbol is \
             left off the label and reported against its field.",
        ),
        ZERO_COPIES => Some("A copy count of 0 was requested; 1 copy is printed instead."),
        NEGATIVE_DIMENSION => Some(
            "A margin or image dimension was negative. Negative values are treated as 0.",
        ),
        INVALID_LABEL_SIZE => Some(
            "The requirement label size is not of the form '<W>x<H>mm'. The default 100x80 mm \
             paper size is used.",
        ),
        QR_UNENCODABLE => Some(
            "The QR / 2-D code content cannot be encoded (for example it exceeds the symbol \
             capacity). The element is replaced by an error placeholder of the same size.",
        ),
        BARCODE_UNENCODABLE => Some(
            "The 1-D barcode content contains characters that Code 128 cannot encode (only \
             7-bit ASCII is supported). The element is replaced by an error placeholder.",
        ),
        ROTATION_UNSUPPORTED => Some(
            "The output target cannot express rotated text. The text block is emitted \
             unrotated inside the footprint the rotated block would occupy.",
        ),
        BARCODE_UNSUPPORTED => Some(
            "The output target has no 1-D barcode shape. The element keeps its reserved space \
             but is not emitted.",
        ),
        _ => None,
    }
}
