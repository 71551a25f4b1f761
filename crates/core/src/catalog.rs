//! Adapters from catalog records to engine input.
//!
//! A [`LabelRequest`] is what an upstream catalog hands over for one print:
//! the customer's label requirement, the ordered content-field definitions,
//! the runtime values resolved for each field, and any layout overrides.

use std::collections::BTreeMap;

use label_engine_diagnostics::{Diagnostic, codes, ctx};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::classify::DisplayNames;
use crate::model::{
    ContentField, DEFAULT_BARCODE_SIZE_MM, DEFAULT_FONT_SIZE_PT, DEFAULT_QR_SIZE_MM, FieldRole,
    LabelSpec, Margins, Orientation,
};

/// Paper size used when the requirement's size cannot be parsed.
pub const DEFAULT_LABEL_SIZE_MM: (f64, f64) = (100.0, 80.0);

/// Errors raised while reading catalog input.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request document is not valid JSON for a [`LabelRequest`].
    #[error("invalid label request: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// A label size string is not of the form `<W>x<H>mm`.
    #[error("invalid label size {0:?} (expected '<W>x<H>mm')")]
    InvalidLabelSize(String),
    /// Two field records share a code.
    #[error("duplicate field code {0:?}")]
    DuplicateField(String),
}

// ── Records ─────────────────────────────────────────────────────────────

/// A customer's label requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    /// Paper size as `"<W>x<H>mm"`.
    pub label_size: String,
    /// Printer resolution the requirement was designed for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_dpi: Option<u32>,
    /// Free-form notes for the operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
}

/// One content-field definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Field key.
    pub field_code: String,
    /// Display name shown on the label.
    #[serde(default)]
    pub field_name: String,
    /// Type tag such as `TEXT`, `QRCODE`, `BARCODE_2D` or `BARCODE_1D`.
    #[serde(default)]
    pub field_type: String,
    /// Whether the catalog marks the field mandatory.
    #[serde(default)]
    pub is_required: bool,
    /// Example value for documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_value: Option<String>,
}

/// Per-request layout overrides. Unset values use the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Paper width, overriding the requirement's label size.
    pub paper_width_mm: Option<f64>,
    /// Paper height, overriding the requirement's label size.
    pub paper_height_mm: Option<f64>,
    /// Margins (6 mm on every side by default).
    pub margins_mm: Option<Margins>,
    /// Font size in points (12 by default).
    pub font_size_pt: Option<f64>,
    /// Text direction.
    pub orientation: Orientation,
    /// Copies to print (1 by default).
    pub copies: Option<u32>,
    /// QR side; derived from the printable height by default.
    pub qr_size_mm: Option<f64>,
    /// 1-D barcode size (60x15 mm by default).
    pub barcode_size_mm: Option<(f64, f64)>,
}

/// Everything needed to lay out one label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRequest {
    /// The customer's label requirement.
    pub requirement: Requirement,
    /// Content fields in display order.
    pub fields: Vec<FieldRecord>,
    /// Runtime value per field code.
    pub values: BTreeMap<String, Value>,
    /// Printed-data snapshots of item labels. When present, the label is a
    /// package label and its values are aggregated from these instead.
    pub package_history: Vec<Value>,
    /// Layout overrides.
    pub options: LayoutOptions,
}

/// Engine input built from a [`LabelRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLabel {
    /// Physical label description.
    pub spec: LabelSpec,
    /// Content in display order.
    pub fields: Vec<ContentField>,
    /// System names overlaid with catalog names.
    pub names: DisplayNames,
    /// Corrections applied while preparing.
    pub diagnostics: Vec<Diagnostic>,
}

// ── Operations ──────────────────────────────────────────────────────────

/// Parse a `"<W>x<H>mm"` label size.
///
/// Case-insensitive, tolerant of spaces, and the `mm` suffix is optional.
///
/// ```
/// use label_engine_core::catalog::parse_label_size;
/// assert_eq!(parse_label_size("100x80mm").unwrap(), (100.0, 80.0));
/// assert_eq!(parse_label_size(" 50.5 X 30 MM ").unwrap(), (50.5, 30.0));
/// assert!(parse_label_size("A6").is_err());
/// ```
pub fn parse_label_size(s: &str) -> Result<(f64, f64), CatalogError> {
    let invalid = || CatalogError::InvalidLabelSize(s.to_string());
    let lower = s.trim().to_ascii_lowercase();
    let body = lower.strip_suffix("mm").unwrap_or(&lower);
    let (w, h) = body.split_once('x').ok_or_else(invalid)?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
    };
    match (parse(w), parse(h)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(invalid()),
    }
}

/// Default display names for system-provided fields.
pub fn system_field_map() -> BTreeMap<String, String> {
    [
        ("customer", "Customer"),
        ("dn_number", "DN"),
        ("legal_entity", "Entity"),
        ("product_pn", "Product Code"),
        ("pt_code", "PT Code"),
        ("batch_no", "Batch No"),
        ("package_size", "Package Size"),
        ("brand", "Brand"),
        ("shelf_life", "Shelf Life"),
        ("total_standard_qty", "Total Standard Qty"),
        ("total_selling_qty", "Total Selling Qty"),
        ("product_mapped_code", "Vendor Product Code"),
        ("product_mapped_name", "Vendor Product Name"),
        ("customer_name", "Customer"),
        ("selling_quantity", "Selling Qty"),
        ("standard_quantity", "Standard Qty"),
        ("print_quantity", "Print Qty"),
        ("label_size", "Label Size"),
        ("printed_by", "Printed By"),
        ("printed_date", "Printed Date"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

/// Default QR side for `qr_count` symbols stacked in `printable_height_mm`.
///
/// Never below 25 mm.
pub fn default_qr_size_mm(printable_height_mm: f64, qr_count: usize) -> f64 {
    if qr_count == 0 {
        return DEFAULT_QR_SIZE_MM;
    }
    let n = qr_count as f64;
    let fitted = (printable_height_mm / n).floor() - 5.0 * (n - 1.0);
    fitted.max(DEFAULT_QR_SIZE_MM)
}

/// Render a runtime value as label text. `null` is blank.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Merge item-label snapshots into package-label values.
///
/// Each snapshot is a JSON object, or a string holding one. Fields whose
/// display name contains "qr code" are skipped. Each field's distinct values
/// are sorted and joined with `", "`.
pub fn aggregate_package_values(
    history: &[Value],
    names: &DisplayNames,
) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in history {
        let parsed;
        let object = match record {
            Value::Object(map) => map,
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => {
                    parsed = map;
                    &parsed
                }
                _ => {
                    tracing::debug!("skipping unparseable printed-data snapshot");
                    continue;
                }
            },
            _ => continue,
        };
        for (code, value) in object {
            if names.resolve(code).to_lowercase().contains("qr code") {
                continue;
            }
            let text = value_text(value);
            let values = merged.entry(code.clone()).or_default();
            if !values.contains(&text) {
                values.push(text);
            }
        }
    }
    merged
        .into_iter()
        .map(|(code, mut values)| {
            values.sort();
            (code, values.join(", "))
        })
        .collect()
}

/// The non-blank field values of a printed label, in display order.
pub fn printed_data(fields: &[ContentField]) -> Vec<(String, String)> {
    fields
        .iter()
        .filter(|f| !f.is_blank())
        .map(|f| (f.code.clone(), f.value.clone()))
        .collect()
}

impl LabelRequest {
    /// Parse a request from JSON.
    pub fn from_json(s: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Build the engine input for this request.
    pub fn to_spec_and_fields(&self) -> Result<PreparedLabel, CatalogError> {
        let mut diagnostics = Vec::new();
        let mut seen = std::collections::BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.field_code.as_str()) {
                return Err(CatalogError::DuplicateField(field.field_code.clone()));
            }
        }

        let names = DisplayNames::with_system(system_field_map()).overlay(
            self.fields
                .iter()
                .map(|f| (f.field_code.as_str(), f.field_name.as_str())),
        );

        let values: BTreeMap<String, String> = if self.package_history.is_empty() {
            self.values
                .iter()
                .map(|(code, value)| (code.clone(), value_text(value)))
                .collect()
        } else {
            aggregate_package_values(&self.package_history, &names)
        };

        let fields: Vec<ContentField> = self
            .fields
            .iter()
            .map(|record| ContentField {
                code: record.field_code.clone(),
                display_name: record.field_name.clone(),
                value: values.get(&record.field_code).cloned().unwrap_or_default(),
                role: FieldRole::from_type_tag(&record.field_type),
            })
            .collect();

        let (size_w, size_h) = match parse_label_size(&self.requirement.label_size) {
            Ok(size) => size,
            Err(err) => {
                tracing::warn!(%err, "using default label size");
                diagnostics.push(
                    Diagnostic::warn(
                        codes::INVALID_LABEL_SIZE,
                        format!("{err}; using 100x80 mm"),
                    )
                    .with_context(ctx!("label_size" => self.requirement.label_size.as_str())),
                );
                DEFAULT_LABEL_SIZE_MM
            }
        };

        let opts = &self.options;
        let paper_width_mm = opts.paper_width_mm.unwrap_or(size_w);
        let paper_height_mm = opts.paper_height_mm.unwrap_or(size_h);
        let margins_mm = opts.margins_mm.unwrap_or_default();
        let qr_count = fields
            .iter()
            .filter(|f| f.role.is_qr_family() && !f.is_blank())
            .count();
        let qr_size_mm = opts.qr_size_mm.unwrap_or_else(|| {
            default_qr_size_mm(
                paper_height_mm - margins_mm.top - margins_mm.bottom,
                qr_count,
            )
        });

        let spec = LabelSpec {
            paper_width_mm,
            paper_height_mm,
            margins_mm,
            font_size_pt: opts.font_size_pt.unwrap_or(DEFAULT_FONT_SIZE_PT),
            orientation: opts.orientation,
            copies: opts.copies.unwrap_or(1),
            qr_size_mm,
            barcode_size_mm: opts.barcode_size_mm.unwrap_or(DEFAULT_BARCODE_SIZE_MM),
        };

        Ok(PreparedLabel {
            spec,
            fields,
            names,
            diagnostics,
        })
    }
}
