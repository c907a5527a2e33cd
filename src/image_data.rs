use crate::error::StampError;
use base64::Engine;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::GenericImageView;
use lopdf::{Document as LoDocument, Object as LoObject, ObjectId, Stream as LoStream, dictionary};
use std::io::Write;

/// Image bytes decoded and re-packaged for embedding as a PDF Image XObject.
#[derive(Debug)]
pub(crate) struct DecodedImage {
    pub width: u32,
    pub height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
    // 8-bit alpha plane, flate-compressed, present only when the PNG
    // actually uses transparency.
    alpha: Option<Vec<u8>>,
}

/// Decodes watermark image bytes: PNG first, JPEG as the fallback. Anything
/// else is a hard failure before the document is touched.
pub(crate) fn decode_image(bytes: &[u8]) -> Result<DecodedImage, StampError> {
    if let Ok(decoded) = image::load_from_memory_with_format(bytes, image::ImageFormat::Png) {
        return Ok(flatten_png(&decoded));
    }
    match image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg) {
        Ok(decoded) => Ok(jpeg_passthrough(bytes, &decoded)),
        Err(_) => Err(StampError::UnsupportedImage),
    }
}

fn flatten_png(decoded: &image::DynamicImage) -> DecodedImage {
    let (width, height) = decoded.dimensions();
    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    let mut has_alpha = false;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        if a != 255 {
            has_alpha = true;
        }
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }
    DecodedImage {
        width,
        height,
        color_space: "DeviceRGB",
        filter: "FlateDecode",
        data: flate_compress(&rgb),
        alpha: has_alpha.then(|| flate_compress(&alpha)),
    }
}

fn jpeg_passthrough(bytes: &[u8], decoded: &image::DynamicImage) -> DecodedImage {
    let (width, height) = decoded.dimensions();
    // JPEG streams embed as-is under DCTDecode; no re-encoding.
    let color_space = match decoded.color() {
        image::ColorType::L8 | image::ColorType::La8 => "DeviceGray",
        _ => "DeviceRGB",
    };
    DecodedImage {
        width,
        height,
        color_space,
        filter: "DCTDecode",
        data: bytes.to_vec(),
        alpha: None,
    }
}

/// Adds the image (and its soft mask, if any) to the document and returns the
/// XObject's id.
pub(crate) fn add_image_object(doc: &mut LoDocument, image: &DecodedImage) -> ObjectId {
    let smask_id = image.alpha.as_ref().map(|alpha| {
        doc.add_object(LoStream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            alpha.clone(),
        ))
    });
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => image.color_space,
        "BitsPerComponent" => 8,
        "Filter" => image.filter,
    };
    if let Some(id) = smask_id {
        dict.set("SMask", LoObject::Reference(id));
    }
    doc.add_object(LoStream::new(dict, image.data.clone()))
}

/// Strips a `data:image/...;base64,` envelope (or accepts bare base64) and
/// decodes the payload. Returns `None` when the payload is not base64.
pub fn decode_data_url(raw: &str) -> Option<Vec<u8>> {
    let payload = match raw.split_once(',') {
        Some((_, rest)) => rest,
        None => raw,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()
}

fn flate_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    let _ = encoder.write_all(data);
    encoder.finish().unwrap_or_default()
}
