//! The mark compositor: applies watermark and signature fields to a loaded
//! document, page by page, and serializes the result.
//!
//! One request is one synchronous pass. Validation runs over the whole field
//! list before the document is touched; draw-level failures on decorative
//! elements (underlines) are swallowed, everything else is fatal.

use crate::draw::{PageStamp, ResourcePool, page_size};
use crate::error::StampError;
use crate::field::{ImageWatermark, MarkField, SignatureField, TextWatermark, validate};
use crate::font::StandardFont;
use crate::image_data::decode_image;
use crate::layout::{Rotation, TileGrid, resolve_anchor, ui_to_pdf_y};
use crate::trace::TraceLog;
use crate::types::Color;
use lopdf::{Document as LoDocument, ObjectId};

const SIGNATURE_TEXT_INSET: f32 = 10.0;
const SIGNATURE_BOX_FILL: Color = Color {
    r: 0.95,
    g: 0.95,
    b: 0.95,
};
const SIGNATURE_BOX_BORDER: Color = Color {
    r: 0.7,
    g: 0.7,
    b: 0.7,
};

pub(crate) fn composite_with(
    pdf: &[u8],
    fields: &[MarkField],
    trace: Option<&TraceLog>,
) -> Result<Vec<u8>, StampError> {
    validate(fields)?;
    let mut doc =
        LoDocument::load_mem(pdf).map_err(|err| StampError::Decode(err.to_string()))?;
    if doc.is_encrypted() {
        return Err(StampError::Encrypted);
    }
    let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    if pages.is_empty() {
        return Err(StampError::EmptyDocument);
    }
    if let Some(log) = trace {
        log.event(
            "composite",
            &[
                ("fields", fields.len().to_string()),
                ("pages", pages.len().to_string()),
            ],
        );
    }

    let mut pool = ResourcePool::default();
    for field in fields {
        match field {
            MarkField::Text(mark) => stamp_text(&mut doc, &mut pool, &pages, mark, trace)?,
            MarkField::Image(mark) => stamp_image(&mut doc, &mut pool, &pages, mark, trace)?,
            MarkField::Signature(sig) => stamp_signature(&mut doc, &mut pool, &pages, sig, trace)?,
        }
    }

    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();
    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|err| StampError::Serialize(err.to_string()))?;
    if let Some(log) = trace {
        log.emit_summary("composite");
        log.flush();
    }
    Ok(out)
}

/// A measured text block: split lines, the widest line's width, and the
/// block height backing anchor math and tiling steps.
struct TextBlock<'a> {
    lines: Vec<&'a str>,
    font: StandardFont,
    size: f32,
    line_h: f32,
    width: f32,
    height: f32,
}

impl<'a> TextBlock<'a> {
    fn measure(text: &'a str, font: StandardFont, size: f32) -> TextBlock<'a> {
        let lines: Vec<&str> = text.lines().collect();
        let line_h = size * 1.2;
        let width = lines
            .iter()
            .map(|line| font.width_of(line, size))
            .fold(0.0_f32, f32::max);
        let height = if lines.len() <= 1 {
            font.height_at(size)
        } else {
            lines.len() as f32 * line_h
        };
        TextBlock {
            lines,
            font,
            size,
            line_h,
            width,
            height,
        }
    }

    /// Draws the block with its bottom-left corner at `(x, y)`. A single
    /// line sits directly on that baseline; multiple lines are laid out
    /// top-down, vertically centered as a group within the block height.
    #[allow(clippy::too_many_arguments)]
    fn draw(
        &self,
        stamp: &mut PageStamp<'_>,
        x: f32,
        y: f32,
        color: Color,
        opacity: f32,
        rotation: Rotation,
        underline: bool,
        trace: Option<&TraceLog>,
    ) {
        if self.lines.len() == 1 {
            stamp.draw_text(
                self.lines[0],
                x,
                y,
                self.size,
                self.font,
                color,
                opacity,
                rotation,
            );
        } else {
            let total = self.lines.len() as f32 * self.line_h;
            let start = y + (self.height + total) / 2.0 - self.line_h;
            for (index, line) in self.lines.iter().enumerate() {
                stamp.draw_text(
                    line,
                    x,
                    start - index as f32 * self.line_h,
                    self.size,
                    self.font,
                    color,
                    opacity,
                    rotation,
                );
            }
        }
        if underline {
            // The underline rotates rigidly with the text; a degenerate one
            // is dropped rather than failing the whole request.
            let line_y = y - 2.0;
            let outcome = stamp.draw_line(
                x,
                line_y,
                x + self.width * rotation.cos,
                line_y + self.width * rotation.sin,
                (self.size / 20.0).max(1.0),
                (opacity + 0.1).min(1.0),
                color,
            );
            if outcome.is_err() {
                if let Some(log) = trace {
                    log.increment("underline.skipped", 1);
                }
            }
        }
    }
}

fn stamp_text(
    doc: &mut LoDocument,
    pool: &mut ResourcePool,
    pages: &[ObjectId],
    mark: &TextWatermark,
    trace: Option<&TraceLog>,
) -> Result<(), StampError> {
    let font = StandardFont::select(mark.font, mark.bold);
    let block = TextBlock::measure(&mark.text, font, mark.font_size);
    let rotation = Rotation::from_degrees(mark.style.rotation_degrees);
    for &page_id in pages {
        let (page_w, page_h) = page_size(doc, page_id)?;
        let mut stamp = PageStamp::new(doc, pool, page_id);
        if mark.style.mosaic {
            let grid = TileGrid::new(page_w, page_h, block.width * 3.0, block.height * 3.0);
            for (tile_x, tile_y) in grid {
                block.draw(
                    &mut stamp,
                    tile_x,
                    tile_y,
                    mark.color,
                    mark.style.opacity,
                    rotation,
                    mark.underline,
                    trace,
                );
                if let Some(log) = trace {
                    log.increment("tiles.drawn", 1);
                }
            }
        } else {
            let (anchor_x, anchor_y) =
                resolve_anchor(mark.anchor, page_w, page_h, block.width, block.height);
            let x = mark.x.unwrap_or(anchor_x);
            let y = mark.y.unwrap_or(anchor_y);
            block.draw(
                &mut stamp,
                x,
                y,
                mark.color,
                mark.style.opacity,
                rotation,
                mark.underline,
                trace,
            );
        }
        stamp.finish()?;
        if let Some(log) = trace {
            log.increment("pages.stamped", 1);
        }
    }
    Ok(())
}

fn stamp_image(
    doc: &mut LoDocument,
    pool: &mut ResourcePool,
    pages: &[ObjectId],
    mark: &ImageWatermark,
    trace: Option<&TraceLog>,
) -> Result<(), StampError> {
    let decoded = decode_image(&mark.data)?;
    let (width, height) = match (mark.width, mark.height) {
        (Some(w), Some(h)) => (w, h),
        _ => (
            decoded.width as f32 * mark.scale,
            decoded.height as f32 * mark.scale,
        ),
    };
    let image_index = pool.add_image(doc, &decoded);
    let rotation = Rotation::from_degrees(mark.style.rotation_degrees);
    for &page_id in pages {
        let (page_w, page_h) = page_size(doc, page_id)?;
        let mut stamp = PageStamp::new(doc, pool, page_id);
        if mark.style.mosaic {
            let grid = TileGrid::new(page_w, page_h, width * 2.5, height * 2.5);
            for (tile_x, tile_y) in grid {
                stamp.draw_image(
                    image_index,
                    tile_x,
                    tile_y,
                    width,
                    height,
                    mark.style.opacity,
                    rotation,
                )?;
                if let Some(log) = trace {
                    log.increment("tiles.drawn", 1);
                }
            }
        } else {
            let (x, y) = resolve_anchor(mark.anchor, page_w, page_h, width, height);
            stamp.draw_image(
                image_index,
                x,
                y,
                width,
                height,
                mark.style.opacity,
                rotation,
            )?;
        }
        stamp.finish()?;
        if let Some(log) = trace {
            log.increment("pages.stamped", 1);
        }
    }
    Ok(())
}

fn stamp_signature(
    doc: &mut LoDocument,
    pool: &mut ResourcePool,
    pages: &[ObjectId],
    sig: &SignatureField,
    trace: Option<&TraceLog>,
) -> Result<(), StampError> {
    let page_id = pages[sig.page.min(pages.len() - 1)];
    let (_, page_h) = page_size(doc, page_id)?;
    let x = sig.x;
    let y = ui_to_pdf_y(page_h, sig.y, sig.height);
    let font = StandardFont::select(sig.font, sig.bold);

    let mut stamp = PageStamp::new(doc, pool, page_id);
    stamp.draw_rect(
        x,
        y,
        sig.width,
        sig.height,
        SIGNATURE_BOX_FILL,
        SIGNATURE_BOX_BORDER,
        1.0,
    );

    let line_h = sig.font_size * 1.2;
    let lines: Vec<&str> = sig.text.lines().collect();
    let total = lines.len() as f32 * line_h;
    let start = y + (sig.height + total) / 2.0 - line_h;
    for (index, line) in lines.iter().enumerate() {
        stamp.draw_text(
            line,
            x + SIGNATURE_TEXT_INSET,
            start - index as f32 * line_h,
            sig.font_size,
            font,
            sig.color,
            1.0,
            Rotation::NONE,
        );
    }

    let stamped_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    stamp.draw_text(
        &format!("Signed on: {stamped_at}"),
        x + SIGNATURE_TEXT_INSET,
        y + 5.0,
        (sig.font_size - 2.0).max(8.0),
        font,
        Color::gray(0.5),
        1.0,
        Rotation::NONE,
    );
    stamp.finish()?;
    if let Some(log) = trace {
        log.increment("signatures.stamped", 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Anchor, RenderStyle};
    use lopdf::content::{Content, Operation};
    use lopdf::{Object as LoObject, Stream as LoStream, dictionary};
    use std::io::Cursor;

    fn blank_pdf(sizes: &[(f32, f32)]) -> Vec<u8> {
        let mut doc = LoDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<LoObject> = Vec::new();
        for &(w, h) in sizes {
            let content_id = doc.add_object(LoStream::new(dictionary! {}, Vec::new()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    LoObject::Real(w),
                    LoObject::Real(h),
                ],
            });
            kids.push(page_id.into());
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            LoObject::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save blank pdf");
        out
    }

    fn page_ops(bytes: &[u8], index: usize) -> Vec<Operation> {
        let doc = LoDocument::load_mem(bytes).expect("load output");
        let page_id = *doc.get_pages().values().nth(index).expect("page index");
        let content = doc.get_page_content(page_id).expect("page content");
        Content::decode(&content).expect("decode content").operations
    }

    fn ops_named<'a>(ops: &'a [Operation], name: &str) -> Vec<&'a Operation> {
        ops.iter().filter(|op| op.operator == name).collect()
    }

    fn f32_at(op: &Operation, index: usize) -> f32 {
        match &op.operands[index] {
            LoObject::Integer(value) => *value as f32,
            LoObject::Real(value) => *value,
            other => panic!("operand {index} is not numeric: {other:?}"),
        }
    }

    fn text_of(op: &Operation) -> String {
        match &op.operands[0] {
            LoObject::String(bytes, _) => String::from_utf8_lossy(bytes).to_string(),
            other => panic!("operand is not a string: {other:?}"),
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([9, 9, 9, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .expect("encode png");
        out
    }

    fn plain_watermark(text: &str) -> TextWatermark {
        TextWatermark {
            text: text.to_string(),
            style: RenderStyle {
                opacity: 1.0,
                rotation_degrees: 0.0,
                mosaic: false,
            },
            ..TextWatermark::default()
        }
    }

    #[test]
    fn centered_text_round_trips_the_resolver_position() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mark = plain_watermark("DRAFT");
        let out = composite_with(&pdf, &[MarkField::Text(mark.clone())], None).expect("stamp");

        let font = StandardFont::select(mark.font, mark.bold);
        let width = font.width_of("DRAFT", mark.font_size);
        let height = font.height_at(mark.font_size);
        let (expect_x, expect_y) = resolve_anchor(Anchor::Center, 612.0, 792.0, width, height);

        let ops = page_ops(&out, 0);
        let tm = ops_named(&ops, "Tm");
        assert_eq!(tm.len(), 1);
        assert!((f32_at(tm[0], 4) - expect_x).abs() < 0.01);
        assert!((f32_at(tm[0], 5) - expect_y).abs() < 0.01);
        let tj = ops_named(&ops, "Tj");
        assert_eq!(tj.len(), 1);
        assert_eq!(text_of(tj[0]), "DRAFT");
    }

    #[test]
    fn explicit_coordinates_override_the_anchor_per_axis() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mut mark = plain_watermark("DRAFT");
        mark.x = Some(100.0);
        let out = composite_with(&pdf, &[MarkField::Text(mark.clone())], None).expect("stamp");

        let font = StandardFont::select(mark.font, mark.bold);
        let width = font.width_of("DRAFT", mark.font_size);
        let height = font.height_at(mark.font_size);
        let (_, anchor_y) = resolve_anchor(Anchor::Center, 612.0, 792.0, width, height);

        let ops = page_ops(&out, 0);
        let tm = ops_named(&ops, "Tm");
        assert!((f32_at(tm[0], 4) - 100.0).abs() < 0.01);
        assert!((f32_at(tm[0], 5) - anchor_y).abs() < 0.01);
    }

    #[test]
    fn watermark_stamps_every_page() {
        let pdf = blank_pdf(&[(612.0, 792.0), (612.0, 792.0), (595.0, 842.0)]);
        let out =
            composite_with(&pdf, &[MarkField::Text(plain_watermark("WM"))], None).expect("stamp");
        for page in 0..3 {
            let ops = page_ops(&out, page);
            assert_eq!(ops_named(&ops, "Tj").len(), 1, "page {page}");
        }
    }

    #[test]
    fn stamping_is_additive_not_idempotent() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let once =
            composite_with(&pdf, &[MarkField::Text(plain_watermark("A"))], None).expect("first");
        let twice =
            composite_with(&once, &[MarkField::Text(plain_watermark("B"))], None).expect("second");
        let ops = page_ops(&twice, 0);
        let texts: Vec<String> = ops_named(&ops, "Tj").iter().map(|op| text_of(op)).collect();
        assert_eq!(texts, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn mosaic_tile_count_matches_the_grid() {
        let pdf = blank_pdf(&[(600.0, 800.0)]);
        let mut mark = plain_watermark("DRAFT");
        mark.font_size = 20.0;
        mark.style.mosaic = true;
        let out = composite_with(&pdf, &[MarkField::Text(mark.clone())], None).expect("stamp");

        let font = StandardFont::select(mark.font, mark.bold);
        let width = font.width_of("DRAFT", 20.0);
        let height = font.height_at(20.0);
        let expected = TileGrid::new(600.0, 800.0, width * 3.0, height * 3.0).count();
        assert!(expected > 1, "grid should actually tile");

        let ops = page_ops(&out, 0);
        assert_eq!(ops_named(&ops, "Tj").len(), expected);
        let first = ops_named(&ops, "Tm")[0];
        assert!((f32_at(first, 4) - 40.0).abs() < 0.01);
        assert!((f32_at(first, 5) - 40.0).abs() < 0.01);
    }

    #[test]
    fn underline_tracks_zero_rotation() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mut mark = plain_watermark("UNDER");
        mark.underline = true;
        mark.x = Some(100.0);
        mark.y = Some(200.0);
        mark.style.opacity = 0.5;
        let out = composite_with(&pdf, &[MarkField::Text(mark.clone())], None).expect("stamp");

        let font = StandardFont::select(mark.font, mark.bold);
        let width = font.width_of("UNDER", mark.font_size);
        let ops = page_ops(&out, 0);
        let m = ops_named(&ops, "m");
        let l = ops_named(&ops, "l");
        assert_eq!((m.len(), l.len()), (1, 1));
        assert!((f32_at(m[0], 0) - 100.0).abs() < 0.01);
        assert!((f32_at(m[0], 1) - 198.0).abs() < 0.01);
        assert!((f32_at(l[0], 0) - (100.0 + width)).abs() < 0.01);
        assert!((f32_at(l[0], 1) - 198.0).abs() < 0.01);
        // Thickness max(1, 50/20) and opacity bumped to 0.6.
        let w = ops_named(&ops, "w");
        assert!((f32_at(w[0], 0) - 2.5).abs() < 0.001);
        assert!(ops_named(&ops, "gs").iter().any(|op| matches!(
            &op.operands[0],
            LoObject::Name(name) if name == b"SWG600"
        )));
    }

    #[test]
    fn underline_rotates_rigidly_with_the_text() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mut mark = plain_watermark("UNDER");
        mark.underline = true;
        mark.x = Some(100.0);
        mark.y = Some(200.0);
        mark.style.rotation_degrees = 90.0;
        let out = composite_with(&pdf, &[MarkField::Text(mark.clone())], None).expect("stamp");

        let font = StandardFont::select(mark.font, mark.bold);
        let width = font.width_of("UNDER", mark.font_size);
        let ops = page_ops(&out, 0);
        let l = ops_named(&ops, "l")[0];
        assert!((f32_at(l, 0) - 100.0).abs() < 0.01);
        assert!((f32_at(l, 1) - (198.0 + width)).abs() < 0.01);
    }

    #[test]
    fn signature_converts_ui_coordinates_to_pdf_space() {
        let pdf = blank_pdf(&[(595.0, 842.0)]);
        let sig = SignatureField {
            text: "Signer".to_string(),
            ..SignatureField::default()
        };
        let out = composite_with(&pdf, &[MarkField::Signature(sig)], None).expect("stamp");
        let ops = page_ops(&out, 0);
        let re = ops_named(&ops, "re");
        assert_eq!(re.len(), 1);
        assert!((f32_at(re[0], 0) - 50.0).abs() < 0.01);
        assert!((f32_at(re[0], 1) - 712.0).abs() < 0.01);
        assert!((f32_at(re[0], 2) - 250.0).abs() < 0.01);
        assert!((f32_at(re[0], 3) - 80.0).abs() < 0.01);
        assert_eq!(ops_named(&ops, "B").len(), 1);
    }

    #[test]
    fn signature_lays_out_lines_and_timestamp() {
        let pdf = blank_pdf(&[(595.0, 842.0)]);
        let sig = SignatureField {
            text: "Signed by Ada\nReason: approval".to_string(),
            ..SignatureField::default()
        };
        let out = composite_with(&pdf, &[MarkField::Signature(sig)], None).expect("stamp");
        let ops = page_ops(&out, 0);
        let tj = ops_named(&ops, "Tj");
        assert_eq!(tj.len(), 3);
        assert_eq!(text_of(tj[0]), "Signed by Ada");
        assert_eq!(text_of(tj[1]), "Reason: approval");
        assert!(text_of(tj[2]).starts_with("Signed on: "));

        // Box bottom sits at 842 - 50 - 80 = 712; two 12pt lines centered in
        // an 80pt box start at 712 + (80 + 24)/2 - 12 = 752.
        let tm = ops_named(&ops, "Tm");
        assert!((f32_at(tm[0], 4) - 60.0).abs() < 0.01);
        assert!((f32_at(tm[0], 5) - 752.0).abs() < 0.01);
        assert!((f32_at(tm[1], 5) - 740.0).abs() < 0.01);
        assert!((f32_at(tm[2], 5) - 717.0).abs() < 0.01);

        // Timestamp shrinks to max(8, size - 2).
        let tf = ops_named(&ops, "Tf");
        assert!((f32_at(tf[2], 1) - 8.0).abs() < 0.001);
    }

    #[test]
    fn signature_page_index_is_clamped() {
        let pdf = blank_pdf(&[(612.0, 792.0), (612.0, 792.0)]);
        let sig = SignatureField {
            text: "Signer".to_string(),
            page: 9,
            ..SignatureField::default()
        };
        let out = composite_with(&pdf, &[MarkField::Signature(sig)], None).expect("stamp");
        assert!(ops_named(&page_ops(&out, 0), "re").is_empty());
        assert_eq!(ops_named(&page_ops(&out, 1), "re").len(), 1);
    }

    #[test]
    fn image_watermark_scales_from_natural_size() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mark = ImageWatermark {
            data: png_bytes(),
            ..ImageWatermark::default()
        };
        let out = composite_with(&pdf, &[MarkField::Image(mark)], None).expect("stamp");
        let ops = page_ops(&out, 0);
        assert_eq!(ops_named(&ops, "Do").len(), 1);
        // 4x2 PNG at the default 0.5 scale: translate cm then scale cm.
        let cm = ops_named(&ops, "cm");
        let (x, y) = resolve_anchor(Anchor::Center, 612.0, 792.0, 2.0, 1.0);
        assert!((f32_at(cm[0], 4) - x).abs() < 0.01);
        assert!((f32_at(cm[0], 5) - y).abs() < 0.01);
        let scale = cm.last().unwrap();
        assert!((f32_at(scale, 0) - 2.0).abs() < 0.001);
        assert!((f32_at(scale, 3) - 1.0).abs() < 0.001);
    }

    #[test]
    fn explicit_image_size_beats_the_scale_factor() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mark = ImageWatermark {
            data: png_bytes(),
            width: Some(100.0),
            height: Some(40.0),
            ..ImageWatermark::default()
        };
        let out = composite_with(&pdf, &[MarkField::Image(mark)], None).expect("stamp");
        let ops = page_ops(&out, 0);
        let scale = *ops_named(&ops, "cm").last().unwrap();
        assert!((f32_at(scale, 0) - 100.0).abs() < 0.001);
        assert!((f32_at(scale, 3) - 40.0).abs() < 0.001);
    }

    #[test]
    fn image_mosaic_uses_two_and_a_half_steps() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mark = ImageWatermark {
            data: png_bytes(),
            width: Some(100.0),
            height: Some(40.0),
            style: RenderStyle {
                mosaic: true,
                ..RenderStyle::default()
            },
            ..ImageWatermark::default()
        };
        let out = composite_with(&pdf, &[MarkField::Image(mark)], None).expect("stamp");
        let expected = TileGrid::new(612.0, 792.0, 250.0, 100.0).count();
        let ops = page_ops(&out, 0);
        assert_eq!(ops_named(&ops, "Do").len(), expected);
    }

    #[test]
    fn unsupported_image_data_is_fatal() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mark = ImageWatermark {
            data: b"not an image".to_vec(),
            ..ImageWatermark::default()
        };
        let err = composite_with(&pdf, &[MarkField::Image(mark)], None).unwrap_err();
        assert!(matches!(err, StampError::UnsupportedImage));
    }

    #[test]
    fn validation_runs_before_the_document_is_loaded() {
        let mark = TextWatermark {
            text: String::new(),
            ..TextWatermark::default()
        };
        let err = composite_with(b"not a pdf", &[MarkField::Text(mark)], None).unwrap_err();
        assert!(matches!(err, StampError::Validation { field: 0, .. }));
    }

    #[test]
    fn unreadable_documents_fail_to_load() {
        let err =
            composite_with(b"not a pdf", &[MarkField::Text(plain_watermark("A"))], None)
                .unwrap_err();
        assert!(matches!(err, StampError::Decode(_)));
    }

    #[test]
    fn empty_documents_are_rejected() {
        let pdf = blank_pdf(&[]);
        let err = composite_with(&pdf, &[MarkField::Text(plain_watermark("A"))], None).unwrap_err();
        assert!(matches!(err, StampError::EmptyDocument));
    }

    #[test]
    fn opacity_lands_in_page_ext_g_state() {
        let pdf = blank_pdf(&[(612.0, 792.0)]);
        let mark = TextWatermark::default();
        let out = composite_with(&pdf, &[MarkField::Text(mark)], None).expect("stamp");
        let doc = LoDocument::load_mem(&out).expect("load output");
        let page_id = *doc.get_pages().values().next().expect("page");
        let page = doc
            .get_object(page_id)
            .and_then(LoObject::as_dict)
            .expect("page dict");
        let resources = match page.get(b"Resources").expect("resources") {
            LoObject::Dictionary(d) => d.clone(),
            LoObject::Reference(id) => doc
                .get_object(*id)
                .and_then(LoObject::as_dict)
                .expect("resources dict")
                .clone(),
            other => panic!("unexpected resources: {other:?}"),
        };
        let gs = match resources.get(b"ExtGState").expect("ext g state") {
            LoObject::Dictionary(d) => d.clone(),
            LoObject::Reference(id) => doc
                .get_object(*id)
                .and_then(LoObject::as_dict)
                .expect("gs dict")
                .clone(),
            other => panic!("unexpected gs: {other:?}"),
        };
        assert!(gs.get(b"SWG250").is_ok());
        let font = match resources.get(b"Font").expect("font dict") {
            LoObject::Dictionary(d) => d.clone(),
            LoObject::Reference(id) => doc
                .get_object(*id)
                .and_then(LoObject::as_dict)
                .expect("font dict")
                .clone(),
            other => panic!("unexpected font: {other:?}"),
        };
        assert!(font.get(b"SWF1").is_ok(), "bold helvetica registered");
    }
}
