//! The layout engine: places one text block and a stack of images on a label.
//!
//! The plan is computed once per request in the device units of one target
//! and carries no protocol knowledge. Degenerate input never fails; it is
//! clamped and reported through [`LayoutPlan::diagnostics`].
//!
//! Steps, in order:
//! 1. Split the printable width into a text column and an image column.
//! 2. Size the text block for the requested orientation.
//! 3. Stack the images (QR family first, then 1-D barcodes), squeezing or
//!    omitting those that reach past the bottom margin.
//! 4. Center both content groups vertically around a shared band.
//! 5. Center each image horizontally inside the image column.

use label_engine_diagnostics::{Diagnostic, codes, ctx};
use serde::{Deserialize, Serialize};

use crate::classify::{Classified, ImageField, TextLine};
use crate::model::{FieldRole, LabelSpec, Margins, Orientation};
use crate::symbology::{check_encodable, symbology_name};
use crate::units::{
    Scale, font_height, image_spacing, line_spacing, min_image_side, mm_to_device,
};

// ── Plan types ──────────────────────────────────────────────────────────

/// An axis-aligned box in device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Horizontal extent.
    pub width: i64,
    /// Vertical extent.
    pub height: i64,
}

impl Rect {
    /// Right edge (exclusive).
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// `true` when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// The positioned text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Anchor X: the left edge when horizontal, the right edge when rotated.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Wrap width along the reading direction.
    pub width: i64,
    /// Vertical extent on the page.
    pub height: i64,
    /// Horizontal extent on the page.
    pub thickness: i64,
    /// Text direction.
    pub orientation: Orientation,
    /// Line capacity declared to the printer: line count plus two.
    pub max_lines: usize,
    /// Rendered `label: value` lines in display order.
    pub lines: Vec<String>,
}

impl TextBlock {
    /// The block's footprint on the page.
    pub fn bounds(&self) -> Rect {
        match self.orientation {
            Orientation::Horizontal => Rect {
                x: self.x,
                y: self.y,
                width: self.thickness,
                height: self.height,
            },
            Orientation::Rotated => Rect {
                x: self.x - self.thickness,
                y: self.y,
                width: self.thickness,
                height: self.height,
            },
        }
    }
}

/// Visual family of an image element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Square QR symbol (QR codes and generic 2-D barcodes).
    Qr,
    /// Code 128 linear barcode.
    Barcode1D,
}

impl ImageKind {
    /// Name used in placeholder captions.
    pub fn name(self) -> &'static str {
        match self {
            ImageKind::Qr => "QR code",
            ImageKind::Barcode1D => "barcode",
        }
    }
}

/// One positioned image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageElement {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Horizontal extent.
    pub width: i64,
    /// Vertical extent.
    pub height: i64,
    /// Visual family.
    pub kind: ImageKind,
    /// Source field code.
    pub field: String,
    /// Content to encode.
    pub content: String,
    /// Encoder failure reason. When set, the element renders as a placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageElement {
    /// The element's footprint on the page.
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// `true` when the element must render as an error placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }

    /// First line of the placeholder caption; the content follows on its own line.
    pub fn failure_caption(&self) -> String {
        format!("Error: Could not generate {} for:", self.kind.name())
    }
}

/// Fully positioned, protocol-agnostic layout of one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    /// Device scale every coordinate is expressed in.
    pub scale: Scale,
    /// Paper width.
    pub paper_width: i64,
    /// Paper height.
    pub paper_height: i64,
    /// Paper width as requested, in millimeters.
    pub paper_width_mm: f64,
    /// Paper height as requested, in millimeters.
    pub paper_height_mm: f64,
    /// Printable area inside the margins.
    pub content_box: Rect,
    /// Font size as requested, in points.
    pub font_size_pt: f64,
    /// Height of one text line.
    pub font_height: i64,
    /// Gap between text lines.
    pub line_spacing: i64,
    /// Gap between columns and between stacked images.
    pub spacing: i64,
    /// Width of the image column (0 when there are no images).
    pub image_block_width: i64,
    /// Number of copies to print.
    pub copies: u32,
    /// The text block, absent when there are no text lines.
    pub text: Option<TextBlock>,
    /// Images in stacking order.
    pub images: Vec<ImageElement>,
    /// Corrections and per-element failures found while planning.
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutPlan {
    /// `true` when the plan places nothing.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.images.is_empty()
    }
}

// ── Input sanitizing ────────────────────────────────────────────────────

fn non_negative(value: f64, what: &str, diags: &mut Vec<Diagnostic>) -> f64 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    tracing::warn!(what, value, "negative or non-finite dimension treated as 0");
    diags.push(
        Diagnostic::warn(
            codes::NEGATIVE_DIMENSION,
            format!("{what} of {value} mm is not a valid length; using 0"),
        )
        .with_context(ctx!("dimension" => what, "value" => value.to_string())),
    );
    0.0
}

fn sanitize(spec: &LabelSpec, diags: &mut Vec<Diagnostic>) -> LabelSpec {
    let m = spec.margins_mm;
    let copies = if spec.copies == 0 {
        diags.push(Diagnostic::warn(
            codes::ZERO_COPIES,
            "copy count of 0 requested; printing 1 copy",
        ));
        1
    } else {
        spec.copies
    };
    LabelSpec {
        paper_width_mm: non_negative(spec.paper_width_mm, "paper width", diags),
        paper_height_mm: non_negative(spec.paper_height_mm, "paper height", diags),
        margins_mm: Margins {
            top: non_negative(m.top, "top margin", diags),
            bottom: non_negative(m.bottom, "bottom margin", diags),
            left: non_negative(m.left, "left margin", diags),
            right: non_negative(m.right, "right margin", diags),
        },
        font_size_pt: spec.font_size_pt,
        orientation: spec.orientation,
        copies,
        qr_size_mm: non_negative(spec.qr_size_mm, "QR size", diags),
        barcode_size_mm: (
            non_negative(spec.barcode_size_mm.0, "barcode width", diags),
            non_negative(spec.barcode_size_mm.1, "barcode height", diags),
        ),
    }
}

fn overflow(group: &str, extent: i64, limit: i64, unit: &str) -> Diagnostic {
    tracing::warn!(group, extent, limit, "content group clamped to printable area");
    Diagnostic::warn(
        codes::CONTENT_OVERFLOW,
        format!("{group} ({extent} {unit}) exceeds the printable area ({limit} {unit})"),
    )
    .with_context(ctx!(
        "group" => group,
        "extent" => extent.to_string(),
        "limit" => limit.to_string(),
    ))
}

fn omitted(image: &ImageElement, room: i64, unit: &str) -> Diagnostic {
    tracing::warn!(field = %image.field, room, "image left off the label");
    Diagnostic::warn(
        codes::CONTENT_OVERFLOW,
        format!(
            "no room left for {} '{}' ({room} {unit} below the stack); omitted",
            image.kind.name(),
            image.field
        ),
    )
    .for_field(image.field.clone())
    .with_context(ctx!(
        "group" => "image stack",
        "room" => room.to_string(),
        "height" => image.height.to_string(),
    ))
}

// ── Engine ──────────────────────────────────────────────────────────────

/// Compute the layout of `content` on the label described by `spec`.
///
/// All coordinates in the result are in `scale` device units.
pub fn plan_layout(spec: &LabelSpec, content: &Classified, scale: Scale) -> LayoutPlan {
    let mut diags = Vec::new();
    let spec = sanitize(spec, &mut diags);
    let unit = scale.unit_name();
    let to = |mm: f64| mm_to_device(mm, scale);

    let paper_width = to(spec.paper_width_mm);
    let paper_height = to(spec.paper_height_mm);
    let margins = spec.margins_mm;
    let (margin_top, margin_left) = (to(margins.top), to(margins.left));

    let mut available_width = paper_width - margin_left - to(margins.right);
    let mut printable_height = paper_height - margin_top - to(margins.bottom);
    if available_width < 1 || printable_height < 1 {
        tracing::warn!(available_width, printable_height, "margins exceed paper");
        diags.push(
            Diagnostic::warn(
                codes::MARGINS_EXCEED_PAPER,
                format!(
                    "margins leave a {available_width}x{printable_height} {unit} printable area; clamped to at least 1"
                ),
            )
            .with_context(ctx!(
                "available_width" => available_width.to_string(),
                "printable_height" => printable_height.to_string(),
            )),
        );
        available_width = available_width.max(1);
        printable_height = printable_height.max(1);
    }
    let content_box = Rect {
        x: margin_left,
        y: margin_top,
        width: available_width,
        height: printable_height,
    };

    let font = font_height(spec.font_size_pt, scale);
    let line_gap = line_spacing(scale);
    let spacing = image_spacing(scale);

    // Step 1: column split.
    let mut qr_side = to(spec.qr_size_mm).max(1);
    let mut barcode_width = to(spec.barcode_size_mm.0).max(1);
    let barcode_height = to(spec.barcode_size_mm.1).max(1);

    let mut image_block_width = 0;
    if !content.qr_family.is_empty() {
        image_block_width = image_block_width.max(qr_side);
    }
    if !content.barcode1d_family.is_empty() {
        image_block_width = image_block_width.max(barcode_width);
    }
    if image_block_width > available_width {
        diags.push(overflow(
            "image column",
            image_block_width,
            available_width,
            unit,
        ));
        image_block_width = available_width;
    }
    qr_side = qr_side.min(image_block_width.max(1));
    barcode_width = barcode_width.min(image_block_width.max(1));

    let has_text = !content.text_lines.is_empty();
    let column_width = if image_block_width > 0 {
        let width = available_width - image_block_width - spacing;
        if width < 1 && has_text {
            tracing::warn!(width, "text column clamped");
            diags.push(
                Diagnostic::warn(
                    codes::TEXT_COLUMN_CLAMPED,
                    format!(
                        "image column ({image_block_width} {unit}) plus spacing leaves no room for text; text column clamped to 1 {unit}"
                    ),
                )
                .with_context(ctx!(
                    "available_width" => available_width.to_string(),
                    "image_block_width" => image_block_width.to_string(),
                    "spacing" => spacing.to_string(),
                )),
            );
        }
        width.max(1)
    } else {
        available_width
    };

    // Step 2: text block geometry.
    let mut text = has_text.then(|| {
        text_block(
            &content.text_lines,
            spec.orientation,
            font,
            line_gap,
            column_width,
            margin_left,
        )
    });
    if let Some(block) = text.as_mut() {
        if block.orientation == Orientation::Rotated && block.thickness > column_width {
            diags.push(overflow(
                "rotated text thickness",
                block.thickness,
                column_width,
                unit,
            ));
            block.thickness = column_width;
            block.x = margin_left + column_width;
        }
        if block.orientation == Orientation::Rotated && block.width > printable_height {
            tracing::debug!(
                width = block.width,
                printable_height,
                "rotated wrap length limited to printable height"
            );
            block.width = printable_height;
            block.height = printable_height;
        }
    }

    // Step 3: image stack.
    let mut images = Vec::with_capacity(content.image_count());
    for field in &content.qr_family {
        images.push(image_element(field, ImageKind::Qr, qr_side, qr_side, &mut diags));
    }
    for field in &content.barcode1d_family {
        images.push(image_element(
            field,
            ImageKind::Barcode1D,
            barcode_width,
            barcode_height,
            &mut diags,
        ));
    }
    let image_group_height = match images.len() {
        0 => 0,
        n => images.iter().map(|i| i.height).sum::<i64>() + spacing * (n as i64 - 1),
    };

    // Step 4: group centering.
    let text_group_height = text.as_ref().map_or(0, |t| t.height);
    let max_group_height = text_group_height.max(image_group_height);
    let group_start = if max_group_height > 0 && max_group_height < printable_height {
        margin_top as f64 + (printable_height - max_group_height) as f64 / 2.0
    } else {
        margin_top as f64
    };
    // An overflowing group pins the band to the printable area; the other
    // group is still centered inside it.
    let band = max_group_height.min(printable_height);
    let centered =
        |height: i64| (group_start + (band - height.min(band)) as f64 / 2.0) as i64;

    let bottom = content_box.bottom();
    if let Some(block) = text.as_mut() {
        block.y = centered(block.height);
        if block.height > printable_height {
            diags.push(overflow("text block", block.height, printable_height, unit));
            block.height = printable_height;
        }
    }

    // Step 5: horizontal placement, then stack downward.
    let image_block_x = content_box.right() - image_block_width;
    let mut y = centered(image_group_height);
    if image_group_height > printable_height {
        diags.push(overflow(
            "image stack",
            image_group_height,
            printable_height,
            unit,
        ));
    }
    // Images that no longer fit are squeezed into the remaining room; a QR
    // symbol stays square. Below the minimum side they are left off.
    let min_side = min_image_side(scale);
    let mut placed = Vec::with_capacity(images.len());
    for mut image in images {
        let room = bottom - y;
        if image.height > room {
            let symbol = image.kind == ImageKind::Qr && !image.is_placeholder();
            let least = if symbol {
                min_side
            } else {
                min_side.min(image.height)
            };
            if room < least {
                diags.push(omitted(&image, room, unit));
                continue;
            }
            image.height = room;
            if symbol {
                image.width = image.width.min(room);
            }
        }
        image.x = image_block_x + (image_block_width - image.width) / 2;
        image.y = y;
        y += image.height + spacing;
        placed.push(image);
    }
    let images = placed;

    tracing::debug!(
        %unit,
        paper_width,
        paper_height,
        column_width,
        image_block_width,
        text_lines = content.text_lines.len(),
        images = images.len(),
        "layout planned"
    );

    LayoutPlan {
        scale,
        paper_width,
        paper_height,
        paper_width_mm: spec.paper_width_mm,
        paper_height_mm: spec.paper_height_mm,
        content_box,
        font_size_pt: spec.font_size_pt,
        font_height: font,
        line_spacing: line_gap,
        spacing,
        image_block_width,
        copies: spec.copies,
        text,
        images,
        diagnostics: diags,
    }
}

fn text_block(
    lines: &[TextLine],
    orientation: Orientation,
    font: i64,
    line_gap: i64,
    column_width: i64,
    margin_left: i64,
) -> TextBlock {
    let count = lines.len() as i64;
    let max_lines = lines.len() + 2;
    let rendered = lines.iter().map(TextLine::render).collect();
    match orientation {
        Orientation::Horizontal => TextBlock {
            x: margin_left,
            y: 0,
            width: column_width,
            height: count * font + (count - 1) * line_gap,
            thickness: column_width,
            orientation,
            max_lines,
            lines: rendered,
        },
        Orientation::Rotated => {
            let thickness = (font + line_gap) * max_lines as i64 - line_gap;
            TextBlock {
                x: margin_left + thickness,
                y: 0,
                width: column_width,
                height: column_width,
                thickness,
                orientation,
                max_lines,
                lines: rendered,
            }
        }
    }
}

fn image_element(
    field: &ImageField,
    kind: ImageKind,
    width: i64,
    height: i64,
    diags: &mut Vec<Diagnostic>,
) -> ImageElement {
    let error = check_encodable(field.role, &field.content).err().map(|err| {
        let code = if field.role == FieldRole::Barcode1D {
            codes::BARCODE_UNENCODABLE
        } else {
            codes::QR_UNENCODABLE
        };
        tracing::warn!(field = %field.code, %err, "content cannot be encoded; using placeholder");
        diags.push(
            Diagnostic::warn(
                code,
                format!(
                    "{} content of field '{}' cannot be encoded: {err}",
                    symbology_name(field.role),
                    field.code
                ),
            )
            .for_field(field.code.clone())
            .with_context(ctx!("symbology" => symbology_name(field.role))),
        );
        err.to_string()
    });
    ImageElement {
        x: 0,
        y: 0,
        width,
        height,
        kind,
        field: field.code.clone(),
        content: field.content.clone(),
        error,
    }
}
