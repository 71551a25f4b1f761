//! Content classification: split fields into text lines and image families.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{ContentField, FieldRole};

/// Field code to display name lookup.
///
/// Built from a default system map overlaid with catalog names; catalog names
/// win on collision. Codes with no entry display as themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayNames {
    names: BTreeMap<String, String>,
}

impl DisplayNames {
    /// Start from a system name map.
    pub fn with_system(system: BTreeMap<String, String>) -> Self {
        Self { names: system }
    }

    /// Overlay catalog-supplied names. Empty names are ignored.
    pub fn overlay<I, K, V>(mut self, catalog: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (code, name) in catalog {
            let name = name.into();
            if !name.trim().is_empty() {
                self.names.insert(code.into(), name);
            }
        }
        self
    }

    /// Overlay the display names carried on `fields`.
    pub fn overlay_fields(self, fields: &[ContentField]) -> Self {
        self.overlay(
            fields
                .iter()
                .map(|f| (f.code.as_str(), f.display_name.as_str())),
        )
    }

    /// Display name for `code`, falling back to the code itself.
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.names.get(code).map_or(code, String::as_str)
    }
}

/// One rendered text line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextLine {
    /// Source field code.
    pub code: String,
    /// Resolved display name.
    pub label: String,
    /// Field value.
    pub value: String,
}

impl TextLine {
    /// The line as printed: `label: value`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

/// One field destined for an image slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageField {
    /// Source field code.
    pub code: String,
    /// Content to encode.
    pub content: String,
    /// The field's role.
    pub role: FieldRole,
}

/// Fields partitioned by how they render, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Text lines.
    pub text_lines: Vec<TextLine>,
    /// QR code and 2-D barcode fields.
    pub qr_family: Vec<ImageField>,
    /// 1-D barcode fields.
    pub barcode1d_family: Vec<ImageField>,
}

impl Classified {
    /// Total number of image slots.
    pub fn image_count(&self) -> usize {
        self.qr_family.len() + self.barcode1d_family.len()
    }

    /// `true` when nothing would be rendered.
    pub fn is_empty(&self) -> bool {
        self.text_lines.is_empty() && self.image_count() == 0
    }
}

/// Partition `fields` into text lines and image families.
///
/// Blank values are dropped silently. Declared order is preserved within
/// each output sequence.
pub fn classify(fields: &[ContentField], names: &DisplayNames) -> Classified {
    let mut out = Classified::default();
    for field in fields.iter().filter(|f| !f.is_blank()) {
        match field.role {
            FieldRole::Text => out.text_lines.push(TextLine {
                code: field.code.clone(),
                label: names.resolve(&field.code).to_string(),
                value: field.value.clone(),
            }),
            role => {
                let image = ImageField {
                    code: field.code.clone(),
                    content: field.value.clone(),
                    role,
                };
                if role.is_qr_family() {
                    out.qr_family.push(image);
                } else {
                    out.barcode1d_family.push(image);
                }
            }
        }
    }
    tracing::debug!(
        text = out.text_lines.len(),
        qr = out.qr_family.len(),
        barcode1d = out.barcode1d_family.len(),
        dropped = fields.iter().filter(|f| f.is_blank()).count(),
        "classified content fields"
    );
    out
}
