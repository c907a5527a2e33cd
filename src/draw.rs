//! The page-drawing layer over `lopdf`: content-stream operations, shared
//! resources (fonts, graphics states, image XObjects), and page geometry.
//!
//! Every stamp is appended as its own content stream via
//! `add_page_contents`, leaving the page's existing streams untouched.

use crate::error::StampError;
use crate::font::StandardFont;
use crate::image_data::{DecodedImage, add_image_object};
use crate::layout::Rotation;
use crate::types::Color;
use lopdf::content::{Content, Operation};
use lopdf::{Document as LoDocument, Object as LoObject, ObjectId, dictionary};
use std::collections::BTreeMap;

/// A draw call that cannot produce visible output (non-finite endpoint or
/// zero-length line). Callers decide whether that is fatal; for decorative
/// underlines it is not.
#[derive(Debug)]
pub(crate) struct DegenerateLine;

/// Document-level registry of objects shared across stamps: one font
/// dictionary per base font, one ExtGState per distinct opacity, one XObject
/// per embedded image.
#[derive(Default)]
pub(crate) struct ResourcePool {
    font_ids: BTreeMap<usize, ObjectId>,
    gs_ids: BTreeMap<u16, ObjectId>,
    image_ids: Vec<ObjectId>,
}

impl ResourcePool {
    fn font_id(&mut self, doc: &mut LoDocument, font: StandardFont) -> ObjectId {
        *self.font_ids.entry(font.index()).or_insert_with(|| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
            })
        })
    }

    fn gs_id(&mut self, doc: &mut LoDocument, key: u16) -> ObjectId {
        *self.gs_ids.entry(key).or_insert_with(|| {
            let alpha = key as f32 / 1000.0;
            doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => LoObject::Real(alpha),
                "CA" => LoObject::Real(alpha),
            })
        })
    }

    pub fn add_image(&mut self, doc: &mut LoDocument, image: &DecodedImage) -> usize {
        let id = add_image_object(doc, image);
        self.image_ids.push(id);
        self.image_ids.len() - 1
    }

    fn image_id(&self, index: usize) -> Option<ObjectId> {
        self.image_ids.get(index).copied()
    }
}

fn opacity_key(opacity: f32) -> u16 {
    (opacity.clamp(0.0, 1.0) * 1000.0).round() as u16
}

fn font_res_name(index: usize) -> String {
    format!("SWF{index}")
}

fn gs_res_name(key: u16) -> String {
    format!("SWG{key}")
}

fn image_res_name(index: usize) -> String {
    format!("SWX{index}")
}

/// Accumulates one stamp's operations for one page, then writes them out as
/// an appended content stream with the referenced resources merged into the
/// page's `Resources` dictionary.
pub(crate) struct PageStamp<'a> {
    doc: &'a mut LoDocument,
    pool: &'a mut ResourcePool,
    page_id: ObjectId,
    ops: Vec<Operation>,
    fonts: BTreeMap<String, ObjectId>,
    gstates: BTreeMap<String, ObjectId>,
    xobjects: BTreeMap<String, ObjectId>,
}

impl<'a> PageStamp<'a> {
    pub fn new(doc: &'a mut LoDocument, pool: &'a mut ResourcePool, page_id: ObjectId) -> Self {
        Self {
            doc,
            pool,
            page_id,
            ops: Vec::new(),
            fonts: BTreeMap::new(),
            gstates: BTreeMap::new(),
            xobjects: BTreeMap::new(),
        }
    }

    fn use_gs(&mut self, opacity: f32) -> String {
        let key = opacity_key(opacity);
        let id = self.pool.gs_id(self.doc, key);
        let name = gs_res_name(key);
        self.gstates.insert(name.clone(), id);
        name
    }

    fn use_font(&mut self, font: StandardFont) -> String {
        let id = self.pool.font_id(self.doc, font);
        let name = font_res_name(font.index());
        self.fonts.insert(name.clone(), id);
        name
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        font: StandardFont,
        color: Color,
        opacity: f32,
        rotation: Rotation,
    ) {
        let gs = self.use_gs(opacity);
        let font_name = self.use_font(font);
        self.ops.push(Operation::new("q", vec![]));
        self.ops
            .push(Operation::new("gs", vec![LoObject::Name(gs.into_bytes())]));
        self.ops.push(Operation::new(
            "rg",
            vec![
                LoObject::Real(color.r),
                LoObject::Real(color.g),
                LoObject::Real(color.b),
            ],
        ));
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![LoObject::Name(font_name.into_bytes()), LoObject::Real(size)],
        ));
        // Text matrix rotates rigidly around the baseline origin.
        self.ops.push(Operation::new(
            "Tm",
            vec![
                LoObject::Real(rotation.cos),
                LoObject::Real(rotation.sin),
                LoObject::Real(-rotation.sin),
                LoObject::Real(rotation.cos),
                LoObject::Real(x),
                LoObject::Real(y),
            ],
        ));
        self.ops
            .push(Operation::new("Tj", vec![LoObject::string_literal(text)]));
        self.ops.push(Operation::new("ET", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_image(
        &mut self,
        image_index: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        opacity: f32,
        rotation: Rotation,
    ) -> Result<(), StampError> {
        let id = self
            .pool
            .image_id(image_index)
            .ok_or_else(|| StampError::Serialize("unregistered image resource".to_string()))?;
        let name = image_res_name(image_index);
        self.xobjects.insert(name.clone(), id);
        let gs = self.use_gs(opacity);
        self.ops.push(Operation::new("q", vec![]));
        self.ops
            .push(Operation::new("gs", vec![LoObject::Name(gs.into_bytes())]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                LoObject::Real(1.0),
                LoObject::Real(0.0),
                LoObject::Real(0.0),
                LoObject::Real(1.0),
                LoObject::Real(x),
                LoObject::Real(y),
            ],
        ));
        self.ops.push(Operation::new(
            "cm",
            vec![
                LoObject::Real(rotation.cos),
                LoObject::Real(rotation.sin),
                LoObject::Real(-rotation.sin),
                LoObject::Real(rotation.cos),
                LoObject::Real(0.0),
                LoObject::Real(0.0),
            ],
        ));
        // The unit image square scales to the target size.
        self.ops.push(Operation::new(
            "cm",
            vec![
                LoObject::Real(width),
                LoObject::Real(0.0),
                LoObject::Real(0.0),
                LoObject::Real(height),
                LoObject::Real(0.0),
                LoObject::Real(0.0),
            ],
        ));
        self.ops
            .push(Operation::new("Do", vec![LoObject::Name(name.into_bytes())]));
        self.ops.push(Operation::new("Q", vec![]));
        Ok(())
    }

    pub fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
        border: Color,
        border_width: f32,
    ) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "rg",
            vec![
                LoObject::Real(fill.r),
                LoObject::Real(fill.g),
                LoObject::Real(fill.b),
            ],
        ));
        self.ops.push(Operation::new(
            "RG",
            vec![
                LoObject::Real(border.r),
                LoObject::Real(border.g),
                LoObject::Real(border.b),
            ],
        ));
        self.ops
            .push(Operation::new("w", vec![LoObject::Real(border_width)]));
        self.ops.push(Operation::new(
            "re",
            vec![
                LoObject::Real(x),
                LoObject::Real(y),
                LoObject::Real(width),
                LoObject::Real(height),
            ],
        ));
        self.ops.push(Operation::new("B", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        opacity: f32,
        color: Color,
    ) -> Result<(), DegenerateLine> {
        let finite = [x1, y1, x2, y2, thickness].iter().all(|v| v.is_finite());
        if !finite || thickness <= 0.0 || (x1 == x2 && y1 == y2) {
            return Err(DegenerateLine);
        }
        let gs = self.use_gs(opacity);
        self.ops.push(Operation::new("q", vec![]));
        self.ops
            .push(Operation::new("gs", vec![LoObject::Name(gs.into_bytes())]));
        self.ops.push(Operation::new(
            "RG",
            vec![
                LoObject::Real(color.r),
                LoObject::Real(color.g),
                LoObject::Real(color.b),
            ],
        ));
        self.ops
            .push(Operation::new("w", vec![LoObject::Real(thickness)]));
        self.ops.push(Operation::new(
            "m",
            vec![LoObject::Real(x1), LoObject::Real(y1)],
        ));
        self.ops.push(Operation::new(
            "l",
            vec![LoObject::Real(x2), LoObject::Real(y2)],
        ));
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
        Ok(())
    }

    /// Encodes the accumulated operations and attaches them, plus every
    /// resource they referenced, to the page. A stamp with no operations is
    /// a no-op.
    pub fn finish(self) -> Result<(), StampError> {
        if self.ops.is_empty() {
            return Ok(());
        }
        merge_page_resources(
            self.doc,
            self.page_id,
            &self.fonts,
            &self.gstates,
            &self.xobjects,
        )?;
        let content = Content {
            operations: self.ops,
        };
        let bytes = content
            .encode()
            .map_err(|err| StampError::Serialize(err.to_string()))?;
        self.doc
            .add_page_contents(self.page_id, bytes)
            .map_err(|err| StampError::Serialize(err.to_string()))?;
        Ok(())
    }
}

fn merge_page_resources(
    doc: &mut LoDocument,
    page_id: ObjectId,
    fonts: &BTreeMap<String, ObjectId>,
    gstates: &BTreeMap<String, ObjectId>,
    xobjects: &BTreeMap<String, ObjectId>,
) -> Result<(), StampError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(LoObject::as_dict)
        .map_err(|err| StampError::Serialize(err.to_string()))?
        .clone();
    let mut resources = resolved_dict(doc, page_dict.get(b"Resources").ok());
    for (key, names) in [
        ("Font", fonts),
        ("ExtGState", gstates),
        ("XObject", xobjects),
    ] {
        if names.is_empty() {
            continue;
        }
        let mut sub = resolved_dict(doc, resources.get(key.as_bytes()).ok());
        for (name, id) in names {
            sub.set(name.as_bytes().to_vec(), LoObject::Reference(*id));
        }
        resources.set(key, LoObject::Dictionary(sub));
    }
    let page_mut = doc
        .get_object_mut(page_id)
        .and_then(LoObject::as_dict_mut)
        .map_err(|err| StampError::Serialize(err.to_string()))?;
    page_mut.set("Resources", LoObject::Dictionary(resources));
    Ok(())
}

// Follows one level of indirection so shared (referenced) dictionaries are
// copied inline before we extend them.
fn resolved_dict(doc: &LoDocument, obj: Option<&LoObject>) -> lopdf::Dictionary {
    match obj {
        Some(LoObject::Dictionary(d)) => d.clone(),
        Some(LoObject::Reference(id)) => doc
            .get_object(*id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_default(),
        _ => lopdf::Dictionary::new(),
    }
}

/// Reads a page's size from its `MediaBox`, walking `Parent` links when the
/// page inherits it. Falls back to US Letter, the viewer default.
pub(crate) fn page_size(doc: &LoDocument, mut id: ObjectId) -> Result<(f32, f32), StampError> {
    loop {
        let dict = doc
            .get_object(id)
            .and_then(LoObject::as_dict)
            .map_err(|err| StampError::Decode(err.to_string()))?;
        if let Ok(arr) = dict.get(b"MediaBox").and_then(LoObject::as_array) {
            if let Some(size) = media_box_size(arr) {
                return Ok(size);
            }
        }
        id = match dict.get(b"Parent").and_then(LoObject::as_reference) {
            Ok(parent_id) => parent_id,
            Err(_) => break,
        };
    }
    Ok((612.0, 792.0))
}

fn media_box_size(arr: &[LoObject]) -> Option<(f32, f32)> {
    if arr.len() < 4 {
        return None;
    }
    let v: Vec<f32> = arr.iter().filter_map(object_to_f32).collect();
    if v.len() < 4 {
        return None;
    }
    let width = v[2] - v[0];
    let height = v[3] - v[1];
    if width > 0.0 && height > 0.0 {
        Some((width, height))
    } else {
        None
    }
}

fn object_to_f32(obj: &LoObject) -> Option<f32> {
    match obj {
        LoObject::Integer(value) => Some(*value as f32),
        LoObject::Real(value) => Some(*value),
        _ => None,
    }
}
