//! ZPL II command stream for dot-addressed thermal printers.

use label_engine_profile::{DEFAULT_MODULE_WIDTH, Profile};

use super::{Rendered, SerializeError, Serializer, scale_mismatch};
use crate::escape::encode_field_data;
use crate::layout::{ImageElement, ImageKind, LayoutPlan, TextBlock};
use crate::model::Orientation;
use crate::symbology::QR_VERSION1_MODULES;
use crate::units::{Scale, Target};

/// Line-continuation marker between field-block lines.
const LINE_BREAK: &str = "\\&\n";

/// QR magnification for a symbol `width` dots wide, in `1..=10`.
///
/// ```
/// use label_engine_core::serialize::qr_magnification;
/// assert_eq!(qr_magnification(199), 7);
/// assert_eq!(qr_magnification(1), 1);
/// assert_eq!(qr_magnification(10_000), 10);
/// ```
pub fn qr_magnification(width: i64) -> u32 {
    let modules = (width as f64 / QR_VERSION1_MODULES as f64).round() as i64;
    modules.clamp(1, 10) as u32
}

/// Magnification for a QR element, reduced until the symbol ends above the
/// next stacked element and inside the printable area.
fn fitted_magnification(image: &ImageElement, plan: &LayoutPlan) -> u32 {
    let floor = (image.y + image.height + plan.spacing).min(plan.content_box.bottom());
    let mut magnification = qr_magnification(image.width.min(image.height));
    while magnification > 1 && image.y + i64::from(magnification) * QR_VERSION1_MODULES > floor {
        magnification -= 1;
    }
    magnification
}

/// Writes a plan as a ZPL II label format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSerializer {
    module_width: u32,
}

impl Default for RasterSerializer {
    fn default() -> Self {
        Self {
            module_width: DEFAULT_MODULE_WIDTH,
        }
    }
}

impl RasterSerializer {
    /// Serializer with an explicit 1-D barcode module width in dots.
    pub fn new(module_width: u32) -> Self {
        Self {
            module_width: module_width.max(1),
        }
    }

    /// Serializer configured from the profile's raster section.
    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(profile.raster.module_width)
    }

    fn push_text(commands: &mut Vec<String>, text: &TextBlock, plan: &LayoutPlan) {
        let rotation = match text.orientation {
            Orientation::Horizontal => 'N',
            Orientation::Rotated => 'R',
        };
        let data = text
            .lines
            .iter()
            .map(|line| encode_field_data(line))
            .collect::<Vec<_>>()
            .join(LINE_BREAK);
        commands.push(format!("^FO{},{}", text.x, text.y));
        commands.push(format!(
            "^A0{rotation},{font},{font}",
            font = plan.font_height
        ));
        commands.push(format!(
            "^FB{},{},{},L,0",
            text.width, text.max_lines, plan.line_spacing
        ));
        commands.push(format!("^FH_^FD{data}"));
        commands.push("^FS".to_string());
    }

    fn push_placeholder(commands: &mut Vec<String>, image: &ImageElement, plan: &LayoutPlan) {
        let border = image.width.min(image.height).clamp(1, 3);
        let pad = border * 2;
        let font = (image.height / 4).clamp(1, plan.font_height);
        commands.push(format!("^FO{},{}", image.x, image.y));
        commands.push(format!(
            "^GB{},{},{border}^FS",
            image.width, image.height
        ));
        commands.push(format!("^FO{},{}", image.x + pad, image.y + pad));
        commands.push(format!("^A0N,{font},{font}"));
        commands.push(format!("^FB{},3,0,L,0", (image.width - 2 * pad).max(1)));
        commands.push(format!(
            "^FH_^FD{}{LINE_BREAK}{}^FS",
            encode_field_data(&image.failure_caption()),
            encode_field_data(&image.content)
        ));
    }
}

impl Serializer for RasterSerializer {
    fn target(&self) -> Target {
        Target::Raster
    }

    fn serialize(&self, plan: &LayoutPlan) -> Result<Rendered, SerializeError> {
        if !matches!(plan.scale, Scale::Dots { .. }) {
            return Err(scale_mismatch(Target::Raster, "dots", plan.scale));
        }

        let mut commands = vec![
            "^XA".to_string(),
            "^CI28".to_string(),
            format!("^PW{}", plan.paper_width),
            format!("^LL{}", plan.paper_height),
        ];

        if let Some(text) = &plan.text {
            Self::push_text(&mut commands, text, plan);
        }

        let mut module_width_set = false;
        for image in &plan.images {
            if image.is_placeholder() {
                Self::push_placeholder(&mut commands, image, plan);
                continue;
            }
            let data = encode_field_data(&image.content);
            match image.kind {
                ImageKind::Qr => {
                    commands.push(format!("^FO{},{}", image.x, image.y));
                    commands.push(format!("^BQN,2,{}", fitted_magnification(image, plan)));
                    commands.push(format!("^FH_^FDQM,A{data}^FS"));
                }
                ImageKind::Barcode1D => {
                    if !module_width_set {
                        commands.push(format!("^BY{}", self.module_width));
                        module_width_set = true;
                    }
                    commands.push(format!("^FO{},{}", image.x, image.y));
                    commands.push(format!("^BCN,{},N,N,N", image.height));
                    commands.push(format!("^FH_^FD{data}^FS"));
                }
            }
        }

        commands.push(format!("^PQ{}", plan.copies));
        commands.push("^XZ".to_string());

        tracing::debug!(commands = commands.len(), "raster format written");
        Ok(Rendered {
            bytes: commands.join("\n").into_bytes(),
            media_type: "application/vnd.zebra-zpl",
            diagnostics: Vec::new(),
        })
    }
}
