//! Character metrics for the six standard Type1 fonts the engine embeds.
//!
//! Widths are the AFM values in 1/1000 em for the printable ASCII range
//! (codes 32..=126); the bounding-box height backs `height_at`. Callers that
//! stamp non-ASCII text get an em/2 approximation per character, which is
//! good enough for anchor placement of decorative marks.

pub(crate) struct Metrics {
    pub widths: [u16; 95],
    pub bbox_height: u16,
}

impl Metrics {
    pub fn char_width(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            self.widths[(code - 32) as usize]
        } else {
            500
        }
    }
}

pub(crate) static HELVETICA: Metrics = Metrics {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
        278, 278, 584, 584, 584, 556, 1015, // :..@
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, //
        778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // A..Z
        278, 278, 278, 469, 556, 333, // [..`
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, //
        556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // a..z
        334, 260, 334, 584, // {..~
    ],
    bbox_height: 1156,
};

pub(crate) static HELVETICA_BOLD: Metrics = Metrics {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, //
        333, 333, 584, 584, 584, 611, 975, //
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, //
        778, 722, 667, 611, 722, 667, 944, 667, 667, 611, //
        333, 278, 333, 584, 556, 333, //
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, //
        611, 389, 556, 333, 611, 556, 778, 556, 556, 500, //
        389, 280, 389, 584, //
    ],
    bbox_height: 1190,
};

pub(crate) static TIMES_ROMAN: Metrics = Metrics {
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, //
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, //
        278, 278, 564, 564, 564, 444, 921, //
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, 556, //
        722, 667, 556, 611, 722, 722, 944, 722, 722, 611, //
        333, 278, 333, 469, 500, 333, //
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, 500, //
        500, 333, 389, 278, 500, 500, 722, 500, 500, 444, //
        480, 200, 480, 541, //
    ],
    bbox_height: 1116,
};

pub(crate) static TIMES_BOLD: Metrics = Metrics {
    widths: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278, //
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, //
        333, 333, 570, 570, 570, 500, 930, //
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, 611, //
        778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, //
        333, 278, 333, 581, 500, 333, //
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, 556, //
        556, 444, 389, 333, 556, 500, 722, 500, 500, 444, //
        394, 220, 394, 520, //
    ],
    bbox_height: 1153,
};

pub(crate) static COURIER: Metrics = Metrics {
    widths: [600; 95],
    bbox_height: 1055,
};

pub(crate) static COURIER_BOLD: Metrics = Metrics {
    widths: [600; 95],
    bbox_height: 1051,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cover_the_ascii_range() {
        for metrics in [
            &HELVETICA,
            &HELVETICA_BOLD,
            &TIMES_ROMAN,
            &TIMES_BOLD,
            &COURIER,
            &COURIER_BOLD,
        ] {
            assert!(metrics.widths.iter().all(|w| *w > 0));
            assert!(metrics.bbox_height > 1000);
        }
    }

    #[test]
    fn known_widths_match_afm() {
        assert_eq!(HELVETICA.char_width(' '), 278);
        assert_eq!(HELVETICA.char_width('W'), 944);
        assert_eq!(HELVETICA.char_width('i'), 222);
        assert_eq!(TIMES_ROMAN.char_width('@'), 921);
        assert_eq!(TIMES_BOLD.char_width('%'), 1000);
        assert_eq!(COURIER.char_width('m'), 600);
    }

    #[test]
    fn non_ascii_falls_back_to_half_em() {
        assert_eq!(HELVETICA.char_width('\u{00e9}'), 500);
        assert_eq!(COURIER.char_width('\u{4e2d}'), 500);
    }
}
