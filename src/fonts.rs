//! Base-14 Helvetica family: registration, WinAnsi encoding and metrics.
//!
//! The document uses only the four standard Helvetica variants, registered
//! as Type1 fonts with WinAnsiEncoding. No font files are embedded; widths
//! come from the AFM tables so measured layout (wrapping, right alignment,
//! centering) matches what viewers render.

use pdf_writer::{Name, Pdf, Ref};

use crate::richtext::StyleFlags;

/// The four font resources every page carries, named F1..F4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Regular,
        FontVariant::Bold,
        FontVariant::Oblique,
        FontVariant::BoldOblique,
    ];

    pub fn from_style(style: StyleFlags) -> Self {
        match (style.bold, style.italic) {
            (false, false) => FontVariant::Regular,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Oblique,
            (true, true) => FontVariant::BoldOblique,
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            FontVariant::Regular => "Helvetica",
            FontVariant::Bold => "Helvetica-Bold",
            FontVariant::Oblique => "Helvetica-Oblique",
            FontVariant::BoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Page resource name, fixed so content streams can be built before
    /// object refs are allocated.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontVariant::Regular => "F1",
            FontVariant::Bold => "F2",
            FontVariant::Oblique => "F3",
            FontVariant::BoldOblique => "F4",
        }
    }
}

/// Register the four Helvetica variants and return their refs in
/// [`FontVariant::ALL`] order.
pub fn register_fonts(pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> [Ref; 4] {
    let mut refs = [Ref::new(1); 4];
    for (i, variant) in FontVariant::ALL.into_iter().enumerate() {
        let font_ref = alloc();
        pdf.type1_font(font_ref)
            .base_font(Name(variant.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        refs[i] = font_ref;
    }
    refs
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str
/// encoding. Unmappable chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match c as u32 {
            0x0000..=0x007F => Some(c as u8),
            0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
            0x20AC => Some(0x80),
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85),
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95),
            0x2013 => Some(0x96),
            0x2014 => Some(0x97),
            0x02DC => Some(0x98),
            0x2122 => Some(0x99),
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        })
        .collect()
}

/// Helvetica AFM widths for ASCII 32..=126, 1000 units per em.
#[rustfmt::skip]
const REGULAR_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold AFM widths for ASCII 32..=126.
#[rustfmt::skip]
const BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Fold a Latin-1 accented letter onto its base letter for width lookup.
fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ç' => 'c',
        'ñ' => 'n',
        'À'..='Å' => 'A',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'Ç' => 'C',
        'Ñ' => 'N',
        '\u{A0}' => ' ',
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        _ => c,
    }
}

/// Width of one char at 1000 units/em. The oblique variants share metrics
/// with their upright counterparts, as in the AFM files.
fn char_width_1000(c: char, variant: FontVariant) -> f32 {
    let table = match variant {
        FontVariant::Regular | FontVariant::Oblique => &REGULAR_WIDTHS,
        FontVariant::Bold | FontVariant::BoldOblique => &BOLD_WIDTHS,
    };
    let c = fold_accent(c);
    let code = c as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize] as f32
    } else {
        // unmeasured symbol, assume average letter width
        556.0
    }
}

/// Measured width of `text` in points at `size`.
pub fn text_width(text: &str, variant: FontVariant, size: f32) -> f32 {
    text.chars()
        .map(|c| char_width_1000(c, variant) * size / 1000.0)
        .sum()
}

pub fn space_width(variant: FontVariant, size: f32) -> f32 {
    char_width_1000(' ', variant) * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_text_is_wider_than_regular() {
        let r = text_width("Inspection", FontVariant::Regular, 10.0);
        let b = text_width("Inspection", FontVariant::Bold, 10.0);
        assert!(b > r);
    }

    #[test]
    fn oblique_shares_regular_metrics() {
        let r = text_width("column 4", FontVariant::Regular, 12.0);
        let o = text_width("column 4", FontVariant::Oblique, 12.0);
        assert_eq!(r, o);
    }

    #[test]
    fn accented_chars_measure_like_base_letters() {
        let plain = text_width("e", FontVariant::Regular, 10.0);
        let accented = text_width("è", FontVariant::Regular, 10.0);
        assert_eq!(plain, accented);
    }

    #[test]
    fn winansi_maps_latin1_directly() {
        assert_eq!(to_winansi_bytes("già"), vec![b'g', b'i', 0xE0]);
        assert_eq!(to_winansi_bytes("\u{2013}"), vec![0x96]);
    }

    #[test]
    fn style_maps_to_variant() {
        assert_eq!(FontVariant::from_style(StyleFlags::NONE), FontVariant::Regular);
        assert_eq!(FontVariant::from_style(StyleFlags::BOLD), FontVariant::Bold);
        assert_eq!(FontVariant::from_style(StyleFlags::ITALIC), FontVariant::Oblique);
        let both = StyleFlags { bold: true, italic: true, underline: false };
        assert_eq!(FontVariant::from_style(both), FontVariant::BoldOblique);
    }
}
