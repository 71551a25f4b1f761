//! Encodability checks for image content, and QR rendering for the preview.

use qrcode::QrCode;
use qrcode::render::svg;
use thiserror::Error;

use crate::model::FieldRole;

/// Module count of a version-1 QR symbol.
pub const QR_VERSION1_MODULES: i64 = 29;

/// Why a piece of content cannot be encoded by its symbology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The QR encoder rejected the data (usually too long).
    #[error("QR encoder rejected the data: {0}")]
    Qr(String),
    /// Code 128 only covers 7-bit ASCII.
    #[error("character {ch:?} at position {position} is outside Code 128")]
    OutsideCode128 {
        /// The offending character.
        ch: char,
        /// Character index within the content.
        position: usize,
    },
    /// Text fields have no symbology.
    #[error("field role {0:?} is not an image role")]
    NotAnImage(FieldRole),
}

/// Human-readable symbology name for a role.
pub fn symbology_name(role: FieldRole) -> &'static str {
    match role {
        FieldRole::QRCode => "QR code",
        FieldRole::Barcode2D => "2D barcode",
        FieldRole::Barcode1D => "barcode",
        FieldRole::Text => "text",
    }
}

/// Check that `content` can be encoded for `role`.
pub fn check_encodable(role: FieldRole, content: &str) -> Result<(), EncodeError> {
    match role {
        FieldRole::QRCode | FieldRole::Barcode2D => encode_qr(content).map(|_| ()),
        FieldRole::Barcode1D => check_code128(content),
        FieldRole::Text => Err(EncodeError::NotAnImage(role)),
    }
}

fn encode_qr(content: &str) -> Result<QrCode, EncodeError> {
    QrCode::new(content.as_bytes()).map_err(|e| EncodeError::Qr(e.to_string()))
}

fn check_code128(content: &str) -> Result<(), EncodeError> {
    match content.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        Some((position, ch)) => Err(EncodeError::OutsideCode128 { ch, position }),
        None => Ok(()),
    }
}

/// Render `content` as an inline SVG QR symbol no larger than `size_px`.
///
/// The XML declaration is stripped so the result can be embedded in HTML.
pub fn qr_svg(content: &str, size_px: u32) -> Result<String, EncodeError> {
    let code = encode_qr(content)?;
    let size = size_px.max(1);
    let image = code
        .render::<svg::Color<'_>>()
        .quiet_zone(false)
        .max_dimensions(size, size)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Ok(match image.find("<svg") {
        Some(start) => image[start..].to_string(),
        None => image,
    })
}
