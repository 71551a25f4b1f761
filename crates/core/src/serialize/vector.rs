//! XML vector print job for millimeter-native label printers.
//!
//! The format has a text shape and a QR shape but no rotation and no 1-D
//! barcode shape. Both gaps are reported as info diagnostics.

use std::fmt::Write as _;

use html_escape::encode_quoted_attribute;
use label_engine_diagnostics::{Diagnostic, codes, ctx};
use label_engine_profile::{Profile, VectorSetup};

use super::{Rendered, SerializeError, Serializer, scale_mismatch};
use crate::layout::{ImageKind, LayoutPlan, Rect};
use crate::model::Orientation;
use crate::units::{Scale, Target};

/// Writes a plan as an XML print job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorSerializer {
    setup: VectorSetup,
}

impl VectorSerializer {
    /// Serializer with explicit job metadata.
    pub fn new(setup: VectorSetup) -> Self {
        Self { setup }
    }

    /// Serializer configured from the profile's vector section.
    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(profile.vector.clone())
    }

    fn write_text_shape(
        &self,
        out: &mut String,
        rect: Rect,
        font_pt: f64,
        text: &str,
    ) -> std::fmt::Result {
        let font = &self.setup.font_family;
        let text = encode_quoted_attribute(text);
        writeln!(
            out,
            r#"      <GraphicShape xsi:type="Text" X="{}" Y="{}" BoundRectWidth="{}" BoundRectHeight="{}" FontCmd="{},{font_pt}" FontType="TrueType_Font" Encoding="A" FontId="A" FontHeight="{font_pt}" FontWidth="{font_pt}">"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            encode_quoted_attribute(font),
        )?;
        writeln!(out, "        <DispData>{text}</DispData>")?;
        writeln!(out, "        <Data>{text}</Data>")?;
        writeln!(out, "      </GraphicShape>")
    }

    fn write_qr_shape(&self, out: &mut String, rect: Rect, content: &str) -> std::fmt::Result {
        let content = encode_quoted_attribute(content);
        writeln!(
            out,
            r#"      <GraphicShape xsi:type="QRCode" X="{}" Y="{}" BoundRectWidth="{}" BoundRectHeight="{}">"#,
            rect.x, rect.y, rect.width, rect.height,
        )?;
        writeln!(out, "        <DispData>{content}</DispData>")?;
        writeln!(out, "        <Data>{content}</Data>")?;
        writeln!(out, "      </GraphicShape>")
    }
}

impl Serializer for VectorSerializer {
    fn target(&self) -> Target {
        Target::Vector
    }

    fn serialize(&self, plan: &LayoutPlan) -> Result<Rendered, SerializeError> {
        if plan.scale != Scale::Millimeters {
            return Err(scale_mismatch(Target::Vector, "millimeters", plan.scale));
        }
        let setup = &self.setup;
        let mut diagnostics = Vec::new();
        let mut out = String::new();

        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        out.push_str(concat!(
            r#"<PrintJob xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
            r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema">"#,
            "\n"
        ));
        writeln!(out, "  <FormatVersion>{}</FormatVersion>", setup.format_version)?;
        writeln!(
            out,
            "  <QLabelSDKVersion>{}</QLabelSDKVersion>",
            encode_quoted_attribute(&setup.sdk_version)
        )?;
        writeln!(
            out,
            "  <GoLabelZoomFactor>{}</GoLabelZoomFactor>",
            setup.zoom_factor
        )?;
        out.push_str("  <Label>\n    <qlabel>\n");

        for image in &plan.images {
            if image.is_placeholder() {
                let caption = format!("{}\r\n{}", image.failure_caption(), image.content);
                self.write_text_shape(&mut out, image.bounds(), plan.font_size_pt, &caption)?;
                continue;
            }
            match image.kind {
                ImageKind::Qr => self.write_qr_shape(&mut out, image.bounds(), &image.content)?,
                ImageKind::Barcode1D => {
                    tracing::debug!(field = %image.field, "1-D barcode omitted from vector job");
                    diagnostics.push(
                        Diagnostic::info(
                            codes::BARCODE_UNSUPPORTED,
                            format!(
                                "vector jobs have no 1-D barcode shape; field '{}' omitted",
                                image.field
                            ),
                        )
                        .for_field(image.field.clone()),
                    );
                }
            }
        }

        if let Some(text) = &plan.text {
            if text.orientation == Orientation::Rotated {
                diagnostics.push(
                    Diagnostic::info(
                        codes::ROTATION_UNSUPPORTED,
                        "vector jobs cannot rotate text; text block emitted unrotated",
                    )
                    .with_context(ctx!("orientation" => "rotated")),
                );
            }
            let rect = match text.orientation {
                Orientation::Horizontal => Rect {
                    x: text.x,
                    y: text.y,
                    width: text.width,
                    height: text.height,
                },
                Orientation::Rotated => text.bounds(),
            };
            self.write_text_shape(&mut out, rect, plan.font_size_pt, &text.lines.join("\r\n"))?;
        }

        out.push_str("    </qlabel>\n");
        out.push_str("    <DateFormat>y2-me-dd</DateFormat>\n");
        out.push_str("    <TimeFormat>h:m:s</TimeFormat>\n");
        out.push_str("  </Label>\n");
        writeln!(
            out,
            r#"  <Setup LabelLength="{}" LabelWidth="{}" GapLength="{}" Speed="{}" Darkness="{}" Copy="{}" PageDirection="Portrait" PrintMode="1">"#,
            plan.paper_height_mm,
            plan.paper_width_mm,
            setup.gap_length_mm,
            setup.speed.value,
            setup.darkness.value,
            plan.copies,
        )?;
        out.push_str("    <Layout Shape=\"0\" PageDirection=\"Portrait\"/>\n");
        out.push_str("    <UnitType>Mm</UnitType>\n");
        writeln!(out, "    <Dpi>{}</Dpi>", setup.dpi)?;
        out.push_str("  </Setup>\n");
        writeln!(
            out,
            "  <PrinterModel>{}</PrinterModel>",
            encode_quoted_attribute(&setup.printer_model)
        )?;
        writeln!(
            out,
            "  <PrinterLanguage>{}</PrinterLanguage>",
            encode_quoted_attribute(&setup.printer_language)
        )?;
        out.push_str("</PrintJob>\n");

        Ok(Rendered {
            bytes: out.into_bytes(),
            media_type: "application/xml",
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{DisplayNames, classify};
    use crate::layout::plan_layout;
    use crate::model::{ContentField, FieldRole, LabelSpec};

    fn render(spec: &LabelSpec, fields: &[ContentField]) -> Rendered {
        let plan = plan_layout(
            spec,
            &classify(fields, &DisplayNames::default()),
            Scale::Millimeters,
        );
        VectorSerializer::default().serialize(&plan).unwrap()
    }

    #[test]
    fn qr_shape_uses_millimeters() {
        let out = render(
            &LabelSpec::default(),
            &[
                ContentField::new("PT", "ABC123", FieldRole::Text),
                ContentField::new("qr", "ABC123", FieldRole::QRCode),
            ],
        );
        let xml = out.as_str();
        assert!(
            xml.contains(r#"xsi:type="QRCode" X="69" Y="27" BoundRectWidth="25" BoundRectHeight="25""#),
            "{xml}"
        );
        assert!(xml.contains(r#"FontCmd="Arial,12""#));
        assert!(xml.contains("<DispData>PT: ABC123</DispData>"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn text_lines_use_crlf_and_are_escaped() {
        let out = render(
            &LabelSpec::default(),
            &[
                ContentField::new("a", "<b> & \"c\"", FieldRole::Text),
                ContentField::new("d", "2", FieldRole::Text),
            ],
        );
        assert!(
            out.as_str()
                .contains("<Data>a: &lt;b&gt; &amp; &quot;c&quot;\r\nd: 2</Data>"),
            "{}",
            out.as_str()
        );
    }

    #[test]
    fn setup_keeps_fractional_paper_size() {
        let spec = LabelSpec {
            paper_width_mm: 101.6,
            paper_height_mm: 50.8,
            ..LabelSpec::default()
        };
        let out = render(&spec, &[]);
        assert!(
            out.as_str()
                .contains(r#"<Setup LabelLength="50.8" LabelWidth="101.6" "#),
            "{}",
            out.as_str()
        );
    }

    #[test]
    fn empty_plan_is_a_valid_job() {
        let out = render(&LabelSpec::default(), &[]);
        let xml = out.as_str();
        assert!(xml.contains("    <qlabel>\n    </qlabel>\n"));
        assert!(xml.contains(r#"LabelLength="80" LabelWidth="100""#));
        assert!(xml.trim_end().ends_with("</PrintJob>"));
    }

    #[test]
    fn barcodes_and_rotation_are_reported() {
        let spec = LabelSpec {
            orientation: Orientation::Rotated,
            ..LabelSpec::default()
        };
        let out = render(
            &spec,
            &[
                ContentField::new("a", "1", FieldRole::Text),
                ContentField::new("bc", "123", FieldRole::Barcode1D),
            ],
        );
        let ids: Vec<_> = out.diagnostics.iter().map(|d| d.id.as_ref()).collect();
        assert_eq!(ids, [codes::BARCODE_UNSUPPORTED, codes::ROTATION_UNSUPPORTED]);
        assert!(!out.as_str().contains("123"));
    }
}
