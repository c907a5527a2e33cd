#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Parses `#RGB` or `#RRGGBB` (leading `#` optional). Anything malformed
    /// resolves to black rather than failing the request.
    pub fn from_hex(raw: &str) -> Color {
        let hex = raw.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Color::BLACK;
        }
        let expanded = match hex.len() {
            3 => {
                let mut out = String::with_capacity(6);
                for ch in hex.chars() {
                    out.push(ch);
                    out.push(ch);
                }
                out
            }
            6 => hex.to_string(),
            _ => return Color::BLACK,
        };
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .map(|v| v as f32 / 255.0)
                .ok()
        };
        match (channel(0..2), channel(2..4), channel(4..6)) {
            (Some(r), Some(g), Some(b)) => Color { r, g, b },
            _ => Color::BLACK,
        }
    }
}

/// The nine named placements for a content block on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    #[default]
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Unknown names fall back to `Center`.
    pub fn from_name(name: &str) -> Anchor {
        match name {
            "top-left" => Anchor::TopLeft,
            "top-center" => Anchor::TopCenter,
            "top-right" => Anchor::TopRight,
            "middle-left" => Anchor::MiddleLeft,
            "middle-right" => Anchor::MiddleRight,
            "bottom-left" => Anchor::BottomLeft,
            "bottom-center" => Anchor::BottomCenter,
            "bottom-right" => Anchor::BottomRight,
            _ => Anchor::Center,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

impl FontFamily {
    /// Accepts the family names the web client sends; unknown families map
    /// to Helvetica.
    pub fn from_name(name: &str) -> FontFamily {
        match name {
            "Times" | "Times-Roman" => FontFamily::Times,
            "Courier" => FontFamily::Courier,
            _ => FontFamily::Helvetica,
        }
    }
}

/// Opacity/rotation/mosaic settings applied uniformly to every placement
/// instance of one field, on every page it targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub opacity: f32,
    pub rotation_degrees: f32,
    pub mosaic: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            opacity: 0.25,
            rotation_degrees: 0.0,
            mosaic: false,
        }
    }
}
