//! End-to-end scenarios: fields in, artifacts out, for every target.

mod common;

use common::*;
use label_engine_core::serialize::{QR_VERSION1_MODULES, qr_magnification};
use label_engine_core::units::{Scale, mm_to_device};
use label_engine_core::{
    LabelSpec, Orientation, RasterSerializer, Serializer, Target, VectorSerializer, codes,
    render_label,
};
use label_engine_profile::Profile;

// ─── Raster + vector: one text field, one 25 mm QR ───────────────────────────

#[test]
fn text_and_qr_raster() {
    let fields = [text("PT", "ABC123").named("PT"), qr("qr", "ABC123")];
    let out = render_label(
        &standard_spec(),
        &fields,
        Target::Raster,
        &Profile::default(),
    )
    .unwrap();
    let zpl = out.rendered.as_str();

    assert_eq!(zpl.matches("^FB").count(), 1, "{zpl}");
    assert_eq!(zpl.matches("^BQ").count(), 1, "{zpl}");
    let mag = qr_magnification(mm_to_device(25.0, Scale::Dots { dpi: 203 })).max(1);
    assert!(zpl.contains(&format!("^BQN,2,{mag}")), "{zpl}");
    assert!(zpl.contains("^FDPT: ABC123"), "{zpl}");
    assert!(zpl.starts_with("^XA\n^CI28\n^PW799\n^LL639\n"));
    assert!(zpl.ends_with("^PQ1\n^XZ"));
}

#[test]
fn text_and_qr_vector() {
    let fields = [text("PT", "ABC123").named("PT"), qr("qr", "ABC123")];
    let out = render_label(
        &standard_spec(),
        &fields,
        Target::Vector,
        &Profile::default(),
    )
    .unwrap();
    let xml = out.rendered.as_str();

    assert_eq!(xml.matches(r#"xsi:type="Text""#).count(), 1, "{xml}");
    assert_eq!(xml.matches(r#"xsi:type="QRCode""#).count(), 1, "{xml}");
    assert!(xml.contains(r#"xsi:type="QRCode" X="69""#), "{xml}");
}

// ─── No images ───────────────────────────────────────────────────────────────

#[test]
fn text_only_spans_inner_width() {
    let fields = [text("a", "1"), text("b", "2")];
    for target in [Target::Raster, Target::Vector, Target::Preview] {
        let plan = plan(&standard_spec(), &fields, target);
        assert_eq!(plan.image_block_width, 0);
        assert_eq!(
            plan.text.as_ref().unwrap().width,
            plan.content_box.width,
            "{target}"
        );
        assert_inside_margins(&plan);
    }

    let out = render_label(
        &standard_spec(),
        &fields,
        Target::Vector,
        &Profile::default(),
    )
    .unwrap();
    let xml = out.rendered.as_str();
    assert!(!xml.contains("QRCode"));
    assert!(xml.contains("<qlabel>\n      <GraphicShape xsi:type=\"Text\""));
}

// ─── Partial failure ─────────────────────────────────────────────────────────

#[test]
fn unencodable_barcode_gets_placeholder_and_qr_still_renders() {
    let fields = [
        text("lot", "7"),
        qr("qr", "ABC123"),
        barcode("bc", "Lô-7 ✓"),
    ];
    let out = render_label(
        &standard_spec(),
        &fields,
        Target::Raster,
        &Profile::default(),
    )
    .unwrap();
    let zpl = out.rendered.as_str();
    let placeholder = &out.plan.images[1];

    assert!(placeholder.is_placeholder());
    assert!(zpl.contains(&format!(
        "^FO{},{}\n^GB{},{},3^FS",
        placeholder.x, placeholder.y, placeholder.width, placeholder.height
    )));
    assert!(!zpl.contains("^BC"));
    assert_eq!(zpl.matches("^BQN,2,7").count(), 1);
    assert_eq!(
        diag_codes(&out.plan.diagnostics),
        [codes::BARCODE_UNENCODABLE]
    );
}

// ─── Properties ──────────────────────────────────────────────────────────────

#[test]
fn column_split_adds_up() {
    for qr_mm in [10.0, 25.0, 40.0, 60.0] {
        let spec = LabelSpec {
            qr_size_mm: qr_mm,
            ..standard_spec()
        };
        for target in [Target::Raster, Target::Vector, Target::Preview] {
            let plan = plan(&spec, &[text("a", "1"), qr("q", "Q")], target);
            let t = plan.text.as_ref().unwrap();
            assert_eq!(
                t.width + plan.spacing + plan.images[0].width,
                plan.content_box.width,
                "qr {qr_mm} mm, {target}"
            );
        }
    }
}

#[test]
fn groups_share_vertical_center() {
    for lines in 1..12 {
        let mut fields: Vec<_> = (0..lines).map(|i| text(&format!("f{i}"), "v")).collect();
        fields.push(qr("q", "Q"));
        let plan = plan(&standard_spec(), &fields, Target::Raster);
        let t = plan.text.as_ref().unwrap();
        let i = &plan.images[0];
        if t.height == i.height || t.height > plan.content_box.height {
            continue;
        }
        let diff = (2 * t.y + t.height) - (2 * i.y + i.height);
        assert!(diff.abs() <= 2, "{lines} lines: centers differ by {diff}/2");
    }
}

#[test]
fn magnification_bounded_for_any_width() {
    for mm in [1.0, 2.0, 5.0, 25.0, 50.0, 100.0, 500.0] {
        let m = qr_magnification(mm_to_device(mm, Scale::Dots { dpi: 203 }));
        assert!((1..=10).contains(&m), "{mm} mm gave {m}");
    }
}

#[test]
fn serializing_twice_is_identical() {
    let fields = [text("a", "x^y"), qr("q", "Q"), barcode("b", "123")];
    let raster = plan(&standard_spec(), &fields, Target::Raster);
    let r = RasterSerializer::default();
    assert_eq!(
        r.serialize(&raster).unwrap().bytes,
        r.serialize(&raster).unwrap().bytes
    );

    let vector = plan(&standard_spec(), &fields, Target::Vector);
    let v = VectorSerializer::default();
    assert_eq!(
        v.serialize(&vector).unwrap().bytes,
        v.serialize(&vector).unwrap().bytes
    );
}

#[test]
fn blank_fields_never_appear() {
    let fields = [
        text("a", "1"),
        text("blank", "   "),
        qr("q_blank", ""),
        qr("q", "Q"),
    ];
    let plan = plan(&standard_spec(), &fields, Target::Raster);
    let t = plan.text.as_ref().unwrap();
    assert_eq!(t.lines, ["a: 1"]);
    assert_eq!(plan.images.len(), 1);
    assert_eq!(plan.images[0].field, "q");
}

#[test]
fn degenerate_inputs_stay_inside_margins() {
    let specs = [
        LabelSpec {
            qr_size_mm: 300.0,
            ..standard_spec()
        },
        LabelSpec {
            paper_width_mm: 20.0,
            paper_height_mm: 15.0,
            ..standard_spec()
        },
        LabelSpec {
            orientation: Orientation::Rotated,
            font_size_pt: 48.0,
            ..standard_spec()
        },
    ];
    let fields: Vec<_> = (0..6)
        .map(|i| text(&format!("f{i}"), "value"))
        .chain([qr("q1", "A"), qr("q2", "B"), barcode("b", "C")])
        .collect();
    for spec in &specs {
        for target in [Target::Raster, Target::Vector, Target::Preview] {
            let plan = plan(spec, &fields, target);
            assert_inside_margins(&plan);
        }
    }
}

#[test]
fn raster_symbols_stay_inside_margins_when_stack_overflows() {
    let four_qrs: Vec<_> = (0..4).map(|i| qr(&format!("q{i}"), "A")).collect();
    let cases = [
        (standard_spec(), four_qrs.clone()),
        (
            LabelSpec {
                qr_size_mm: 300.0,
                ..standard_spec()
            },
            vec![text("a", "1"), qr("q", "A")],
        ),
        (
            LabelSpec {
                qr_size_mm: 40.0,
                ..standard_spec()
            },
            four_qrs,
        ),
    ];
    for (spec, fields) in &cases {
        let out = render_label(spec, fields, Target::Raster, &Profile::default()).unwrap();
        assert_inside_margins(&out.plan);
        let zpl = out.rendered.as_str();
        let lines: Vec<&str> = zpl.lines().collect();
        let bottom = out.plan.content_box.bottom();
        let mut symbols = 0;
        for pair in lines.windows(2) {
            let Some(magnification) = pair[1].strip_prefix("^BQN,2,") else {
                continue;
            };
            let magnification: i64 = magnification.parse().unwrap();
            let (_, y) = pair[0]
                .strip_prefix("^FO")
                .and_then(|at| at.split_once(','))
                .unwrap();
            let y: i64 = y.parse().unwrap();
            assert!(y < bottom, "{zpl}");
            assert!(y + magnification * QR_VERSION1_MODULES <= bottom, "{zpl}");
            symbols += 1;
        }
        assert_eq!(symbols, out.plan.images.len());
        assert!(
            out.diagnostics()
                .any(|d| d.id == codes::CONTENT_OVERFLOW)
        );
    }
}

#[test]
fn all_blank_label_is_a_valid_empty_job() {
    let fields = [text("a", ""), qr("q", " ")];
    for target in [Target::Raster, Target::Vector, Target::Preview] {
        let out = render_label(&standard_spec(), &fields, target, &Profile::default()).unwrap();
        assert!(out.plan.is_empty());
        assert!(!out.rendered.bytes.is_empty());
    }
}
