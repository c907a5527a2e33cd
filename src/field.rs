use crate::error::StampError;
use crate::types::{Anchor, Color, FontFamily, RenderStyle};

/// A text watermark, stamped on every page. Explicit `x`/`y` are PDF-space
/// (bottom-left origin) and override the anchor per axis.
#[derive(Debug, Clone)]
pub struct TextWatermark {
    pub text: String,
    pub font: FontFamily,
    pub bold: bool,
    pub underline: bool,
    pub font_size: f32,
    pub color: Color,
    pub anchor: Anchor,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub style: RenderStyle,
}

impl Default for TextWatermark {
    fn default() -> Self {
        Self {
            text: "CONFIDENTIAL".to_string(),
            font: FontFamily::Helvetica,
            bold: true,
            underline: false,
            font_size: 50.0,
            color: Color::rgb(0.8, 0.1, 0.1),
            anchor: Anchor::Center,
            x: None,
            y: None,
            style: RenderStyle::default(),
        }
    }
}

/// An image watermark, stamped on every page. The target size is the
/// explicit `width`/`height` pair when both are given, otherwise the natural
/// size scaled by `scale`.
#[derive(Debug, Clone)]
pub struct ImageWatermark {
    pub data: Vec<u8>,
    pub scale: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub anchor: Anchor,
    pub style: RenderStyle,
}

impl Default for ImageWatermark {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            scale: 0.5,
            width: None,
            height: None,
            anchor: Anchor::Center,
            style: RenderStyle::default(),
        }
    }
}

/// A visual signature box on exactly one page. Coordinates are top-left UI
/// space; the compositor converts to PDF space.
#[derive(Debug, Clone)]
pub struct SignatureField {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub font: FontFamily,
    pub bold: bool,
    pub color: Color,
    /// Zero-based page index, clamped to the document's page range.
    pub page: usize,
}

impl Default for SignatureField {
    fn default() -> Self {
        Self {
            text: String::new(),
            x: 50.0,
            y: 50.0,
            width: 250.0,
            height: 80.0,
            font_size: 10.0,
            font: FontFamily::Helvetica,
            bold: false,
            color: Color::BLACK,
            page: 0,
        }
    }
}

impl SignatureField {
    /// The default field a backend offers when the signer has not placed one
    /// themselves.
    pub fn for_signer(name: &str, date: &str) -> SignatureField {
        SignatureField {
            text: format!("Digitally signed by {name}\nDate: {date}\nReason: Document approval"),
            ..SignatureField::default()
        }
    }
}

/// One entry in a composite request, processed in order.
#[derive(Debug, Clone)]
pub enum MarkField {
    Text(TextWatermark),
    Image(ImageWatermark),
    Signature(SignatureField),
}

/// Checks every field before any page is touched, so a bad request never
/// produces partial output. The error names the offending field.
pub(crate) fn validate(fields: &[MarkField]) -> Result<(), StampError> {
    for (index, field) in fields.iter().enumerate() {
        let fail = |reason: &str| {
            Err(StampError::Validation {
                field: index,
                reason: reason.to_string(),
            })
        };
        match field {
            MarkField::Text(mark) => {
                if mark.text.trim().is_empty() {
                    return fail("watermark text is required");
                }
                if !(mark.font_size.is_finite() && mark.font_size > 0.0) {
                    return fail("font size must be positive");
                }
                if !mark.style.rotation_degrees.is_finite() {
                    return fail("rotation must be finite");
                }
                for (value, axis) in [(mark.x, "x"), (mark.y, "y")] {
                    if value.is_some_and(|v| !v.is_finite()) {
                        return Err(StampError::Validation {
                            field: index,
                            reason: format!("{axis} position must be finite"),
                        });
                    }
                }
            }
            MarkField::Image(mark) => {
                if mark.data.is_empty() {
                    return fail("image data is required");
                }
                if !(mark.scale.is_finite() && mark.scale > 0.0) {
                    return fail("image scale must be positive");
                }
                if !mark.style.rotation_degrees.is_finite() {
                    return fail("rotation must be finite");
                }
                for (value, side) in [(mark.width, "width"), (mark.height, "height")] {
                    if value.is_some_and(|v| !(v.is_finite() && v > 0.0)) {
                        return Err(StampError::Validation {
                            field: index,
                            reason: format!("{side} must be positive"),
                        });
                    }
                }
            }
            MarkField::Signature(sig) => {
                if sig.text.trim().is_empty() {
                    return fail("signature text is required");
                }
                if !(sig.x.is_finite() && sig.x >= 0.0) {
                    return fail("a valid x position is required");
                }
                if !(sig.y.is_finite() && sig.y >= 0.0) {
                    return fail("a valid y position is required");
                }
                if !(sig.width.is_finite() && sig.width > 0.0) {
                    return fail("width must be positive");
                }
                if !(sig.height.is_finite() && sig.height > 0.0) {
                    return fail("height must be positive");
                }
                if !(sig.font_size.is_finite() && (6.0..=72.0).contains(&sig.font_size)) {
                    return fail("font size must be between 6 and 72");
                }
            }
        }
    }
    Ok(())
}
