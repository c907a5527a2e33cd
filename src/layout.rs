use crate::types::Anchor;
use std::f32::consts::PI;

/// Margin kept between an anchored block and the page edge, in points.
pub const ANCHOR_MARGIN: f32 = 20.0;

/// Bottom-left origin of the mosaic tiling grid, in points.
pub const TILE_ORIGIN: f32 = 40.0;

/// Resolves a named anchor to the bottom-left-origin position of a block of
/// `block_w` x `block_h` on a `page_w` x `page_h` page.
///
/// No clamping is performed: a block larger than the page yields negative
/// coordinates, which is accepted caller error.
pub fn resolve_anchor(
    anchor: Anchor,
    page_w: f32,
    page_h: f32,
    block_w: f32,
    block_h: f32,
) -> (f32, f32) {
    let m = ANCHOR_MARGIN;
    let left = m;
    let center_x = (page_w - block_w) / 2.0;
    let right = page_w - block_w - m;
    let top = page_h - block_h - m;
    let middle_y = (page_h - block_h) / 2.0;
    let bottom = m;
    match anchor {
        Anchor::TopLeft => (left, top),
        Anchor::TopCenter => (center_x, top),
        Anchor::TopRight => (right, top),
        Anchor::MiddleLeft => (left, middle_y),
        Anchor::Center => (center_x, middle_y),
        Anchor::MiddleRight => (right, middle_y),
        Anchor::BottomLeft => (left, bottom),
        Anchor::BottomCenter => (center_x, bottom),
        Anchor::BottomRight => (right, bottom),
    }
}

/// Converts a top-left-origin UI y coordinate to bottom-left PDF space.
///
/// Signature fields are authored in UI space; watermark explicit coordinates
/// are already PDF-space and must not go through this.
pub fn ui_to_pdf_y(page_h: f32, field_y: f32, field_h: f32) -> f32 {
    page_h - field_y - field_h
}

/// A rotation fixed once per field. Degrees exist only at the public API
/// boundary; everything internal works with the cached radians/cos/sin.
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    pub degrees: f32,
    pub radians: f32,
    pub cos: f32,
    pub sin: f32,
}

impl Rotation {
    pub fn from_degrees(degrees: f32) -> Rotation {
        let radians = degrees * PI / 180.0;
        Rotation {
            degrees,
            radians,
            cos: libm::cosf(radians),
            sin: libm::sinf(radians),
        }
    }

    pub const NONE: Rotation = Rotation {
        degrees: 0.0,
        radians: 0.0,
        cos: 1.0,
        sin: 0.0,
    };
}

/// Iterator over mosaic tile origins: starts at (40, 40), steps by
/// `step_x`/`step_y`, and yields every origin strictly inside the page.
/// Rows run bottom-to-top, cells left-to-right within a row. Tiles whose
/// origin is in bounds but whose body hangs off the page are kept.
#[derive(Debug, Clone)]
pub struct TileGrid {
    page_w: f32,
    page_h: f32,
    step_x: f32,
    step_y: f32,
    x: f32,
    y: f32,
    done: bool,
}

impl TileGrid {
    pub fn new(page_w: f32, page_h: f32, step_x: f32, step_y: f32) -> TileGrid {
        // Non-positive or non-finite steps would never terminate.
        let done = !(step_x > 0.0 && step_y > 0.0 && step_x.is_finite() && step_y.is_finite());
        TileGrid {
            page_w,
            page_h,
            step_x,
            step_y,
            x: TILE_ORIGIN,
            y: TILE_ORIGIN,
            done,
        }
    }
}

impl Iterator for TileGrid {
    type Item = (f32, f32);

    fn next(&mut self) -> Option<(f32, f32)> {
        if self.done || TILE_ORIGIN >= self.page_w {
            return None;
        }
        if self.y >= self.page_h {
            return None;
        }
        let origin = (self.x, self.y);
        self.x += self.step_x;
        if self.x >= self.page_w {
            self.x = TILE_ORIGIN;
            self.y += self.step_y;
        }
        Some(origin)
    }
}
