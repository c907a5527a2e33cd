//! stampwork: a PDF stamping engine.
//!
//! Loads an existing document from bytes, applies watermark fields (text or
//! image, anchored or mosaic-tiled) and visual signature fields, and
//! serializes the mutated document back to bytes. Placement runs in PDF
//! coordinate space (origin bottom-left); signature fields arrive in
//! top-left UI space and are converted on the way in.

mod compose;
mod draw;
mod error;
mod field;
mod font;
mod fontmetrics;
mod image_data;
mod layout;
mod trace;
mod types;

pub use error::StampError;
pub use field::{ImageWatermark, MarkField, SignatureField, TextWatermark};
pub use font::StandardFont;
pub use image_data::decode_data_url;
pub use layout::{ANCHOR_MARGIN, Rotation, TILE_ORIGIN, TileGrid, resolve_anchor, ui_to_pdf_y};
pub use trace::TraceLog;
pub use types::{Anchor, Color, FontFamily, RenderStyle};

use std::io;
use std::path::Path;
use std::sync::Arc;

/// Entry point for stamping requests. A `Stamper` is cheap to construct,
/// holds no document state, and may be shared across requests; every call is
/// one synchronous transform over its own buffer.
#[derive(Default, Clone)]
pub struct Stamper {
    trace: Option<Arc<TraceLog>>,
}

impl Stamper {
    pub fn new() -> Stamper {
        Stamper::default()
    }

    /// Mirrors composite runs to a JSON-lines trace file.
    pub fn trace_log(mut self, path: impl AsRef<Path>) -> io::Result<Stamper> {
        self.trace = Some(Arc::new(TraceLog::new(path)?));
        Ok(self)
    }

    /// Applies an ordered list of fields to the document and returns the
    /// re-serialized bytes. Validation covers the whole list before any page
    /// is touched.
    pub fn composite(&self, pdf: &[u8], fields: &[MarkField]) -> Result<Vec<u8>, StampError> {
        compose::composite_with(pdf, fields, self.trace.as_deref())
    }

    pub fn apply_text_watermark(
        &self,
        pdf: &[u8],
        mark: &TextWatermark,
    ) -> Result<Vec<u8>, StampError> {
        self.composite(pdf, &[MarkField::Text(mark.clone())])
    }

    pub fn apply_image_watermark(
        &self,
        pdf: &[u8],
        mark: &ImageWatermark,
    ) -> Result<Vec<u8>, StampError> {
        self.composite(pdf, &[MarkField::Image(mark.clone())])
    }

    pub fn apply_signature_fields(
        &self,
        pdf: &[u8],
        fields: &[SignatureField],
    ) -> Result<Vec<u8>, StampError> {
        let fields: Vec<MarkField> = fields
            .iter()
            .cloned()
            .map(MarkField::Signature)
            .collect();
        self.composite(pdf, &fields)
    }
}

/// One-shot helper for callers that do not need a configured [`Stamper`].
pub fn apply_text_watermark(pdf: &[u8], mark: &TextWatermark) -> Result<Vec<u8>, StampError> {
    Stamper::new().apply_text_watermark(pdf, mark)
}

/// One-shot helper, see [`Stamper::apply_image_watermark`].
pub fn apply_image_watermark(pdf: &[u8], mark: &ImageWatermark) -> Result<Vec<u8>, StampError> {
    Stamper::new().apply_image_watermark(pdf, mark)
}

/// One-shot helper, see [`Stamper::apply_signature_fields`].
pub fn apply_signature_fields(
    pdf: &[u8],
    fields: &[SignatureField],
) -> Result<Vec<u8>, StampError> {
    Stamper::new().apply_signature_fields(pdf, fields)
}
