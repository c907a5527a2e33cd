use crate::fontmetrics::{
    COURIER, COURIER_BOLD, HELVETICA, HELVETICA_BOLD, Metrics, TIMES_BOLD, TIMES_ROMAN,
};
use crate::types::FontFamily;

/// The standard-14 subset the engine embeds. These are Type1 base fonts every
/// PDF viewer ships, so embedding is a bare font dictionary with no program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    /// Combines the requested family with the bold flag.
    pub fn select(family: FontFamily, bold: bool) -> StandardFont {
        match (family, bold) {
            (FontFamily::Helvetica, false) => StandardFont::Helvetica,
            (FontFamily::Helvetica, true) => StandardFont::HelveticaBold,
            (FontFamily::Times, false) => StandardFont::TimesRoman,
            (FontFamily::Times, true) => StandardFont::TimesBold,
            (FontFamily::Courier, false) => StandardFont::Courier,
            (FontFamily::Courier, true) => StandardFont::CourierBold,
        }
    }

    pub fn base_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            StandardFont::Helvetica => 0,
            StandardFont::HelveticaBold => 1,
            StandardFont::TimesRoman => 2,
            StandardFont::TimesBold => 3,
            StandardFont::Courier => 4,
            StandardFont::CourierBold => 5,
        }
    }

    fn metrics(self) -> &'static Metrics {
        match self {
            StandardFont::Helvetica => &HELVETICA,
            StandardFont::HelveticaBold => &HELVETICA_BOLD,
            StandardFont::TimesRoman => &TIMES_ROMAN,
            StandardFont::TimesBold => &TIMES_BOLD,
            StandardFont::Courier => &COURIER,
            StandardFont::CourierBold => &COURIER_BOLD,
        }
    }

    /// Width of `text` rendered at `size` points.
    pub fn width_of(self, text: &str, size: f32) -> f32 {
        let metrics = self.metrics();
        let units: u32 = text.chars().map(|ch| metrics.char_width(ch) as u32).sum();
        units as f32 / 1000.0 * size
    }

    /// Height of one line at `size` points, from the font bounding box.
    pub fn height_at(self, size: f32) -> f32 {
        self.metrics().bbox_height as f32 / 1000.0 * size
    }
}
