//! HTML preview of a plan, positioned in screen pixels.

use std::fmt::Write as _;

use html_escape::encode_quoted_attribute;

use super::{Rendered, SerializeError, Serializer, scale_mismatch};
use crate::layout::{ImageElement, ImageKind, LayoutPlan, Rect};
use crate::model::Orientation;
use crate::symbology::qr_svg;
use crate::units::{Scale, Target};

/// Renders a plan as a self-contained HTML fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewRenderer;

fn position(rect: Rect) -> String {
    format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;",
        rect.x, rect.y, rect.width, rect.height
    )
}

fn write_placeholder(out: &mut String, image: &ImageElement) -> std::fmt::Result {
    writeln!(
        out,
        r#"  <div class="label-error" style="{}box-sizing:border-box;border:2px dashed red;color:red;font-size:10px;padding:4px;overflow:hidden;">{}<br>{}</div>"#,
        position(image.bounds()),
        encode_quoted_attribute(&image.failure_caption()),
        encode_quoted_attribute(&image.content),
    )
}

fn write_barcode(out: &mut String, image: &ImageElement) -> std::fmt::Result {
    writeln!(
        out,
        r#"  <div class="label-barcode" style="{}display:flex;flex-direction:column;"><div style="flex:1;background:repeating-linear-gradient(90deg,#000 0 2px,#fff 2px 3px,#000 3px 4px,#fff 4px 6px);"></div><div style="font-size:10px;text-align:center;">{}</div></div>"#,
        position(image.bounds()),
        encode_quoted_attribute(&image.content),
    )
}

impl Serializer for PreviewRenderer {
    fn target(&self) -> Target {
        Target::Preview
    }

    fn serialize(&self, plan: &LayoutPlan) -> Result<Rendered, SerializeError> {
        if !matches!(plan.scale, Scale::PixelsPerMm { .. }) {
            return Err(scale_mismatch(Target::Preview, "pixels", plan.scale));
        }
        let mut out = String::new();
        writeln!(
            out,
            r#"<div class="label-preview" style="position:relative;width:{}px;height:{}px;border:1px solid #333;background:#fff;overflow:hidden;font-family:Arial,sans-serif;color:#000;">"#,
            plan.paper_width, plan.paper_height
        )?;

        if let Some(text) = &plan.text {
            let rotation = match text.orientation {
                Orientation::Horizontal => "",
                Orientation::Rotated => "writing-mode:vertical-rl;transform:rotate(180deg);",
            };
            let lines = text
                .lines
                .iter()
                .map(|l| encode_quoted_attribute(l).into_owned())
                .collect::<Vec<_>>()
                .join("<br>");
            writeln!(
                out,
                r#"  <div class="label-text" style="{}{rotation}font-size:{}pt;line-height:{}px;overflow-wrap:anywhere;">{lines}</div>"#,
                position(text.bounds()),
                plan.font_size_pt,
                plan.font_height + plan.line_spacing,
            )?;
        }

        for image in &plan.images {
            if image.is_placeholder() {
                write_placeholder(&mut out, image)?;
                continue;
            }
            match image.kind {
                ImageKind::Qr => {
                    let size = u32::try_from(image.width.min(image.height)).unwrap_or(1);
                    match qr_svg(&image.content, size) {
                        Ok(svg) => writeln!(
                            out,
                            r#"  <div class="label-qr" style="{}">{svg}</div>"#,
                            position(image.bounds())
                        )?,
                        Err(err) => {
                            tracing::warn!(field = %image.field, %err, "QR preview failed");
                            write_placeholder(&mut out, image)?;
                        }
                    }
                }
                ImageKind::Barcode1D => write_barcode(&mut out, image)?,
            }
        }

        out.push_str("</div>\n");
        Ok(Rendered {
            bytes: out.into_bytes(),
            media_type: "text/html",
            diagnostics: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{DisplayNames, classify};
    use crate::layout::plan_layout;
    use crate::model::{ContentField, FieldRole, LabelSpec};

    const PX: Scale = Scale::PixelsPerMm { px_per_mm: 4 };

    fn render(spec: &LabelSpec, fields: &[ContentField]) -> String {
        let plan = plan_layout(spec, &classify(fields, &DisplayNames::default()), PX);
        PreviewRenderer.serialize(&plan).unwrap().as_str().to_string()
    }

    #[test]
    fn outer_box_matches_paper_in_pixels() {
        let html = render(&LabelSpec::default(), &[]);
        assert!(html.starts_with(r#"<div class="label-preview" style="position:relative;width:400px;height:320px;"#));
        assert!(html.trim_end().ends_with("</div>"));
    }

    #[test]
    fn qr_is_inline_svg_at_plan_position() {
        let html = render(
            &LabelSpec::default(),
            &[ContentField::new("q", "ABC123", FieldRole::QRCode)],
        );
        assert!(
            html.contains(r#"class="label-qr" style="position:absolute;left:276px;top:110px;width:100px;height:100px;"><svg"#),
            "{html}"
        );
    }

    #[test]
    fn rotated_text_uses_vertical_writing_mode() {
        let spec = LabelSpec {
            orientation: Orientation::Rotated,
            ..LabelSpec::default()
        };
        let html = render(&spec, &[ContentField::new("a", "1", FieldRole::Text)]);
        assert!(html.contains("writing-mode:vertical-rl;transform:rotate(180deg);"));
    }

    #[test]
    fn content_is_escaped() {
        let html = render(
            &LabelSpec::default(),
            &[ContentField::new("a", "<script>", FieldRole::Text)],
        );
        assert!(html.contains("a: &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn failed_barcode_is_red_dashed_box() {
        let html = render(
            &LabelSpec::default(),
            &[ContentField::new("bc", "Mã 5", FieldRole::Barcode1D)],
        );
        assert!(html.contains("border:2px dashed red"));
        assert!(html.contains("Error: Could not generate barcode for:<br>Mã 5"));
    }
}
