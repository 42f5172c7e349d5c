//! Built-in Helvetica metrics
//!
//! Widths come from the standard Helvetica AFM, in 1/1000 em, for the
//! printable ASCII range. Anything outside that range is measured with
//! the width of a digit, which keeps centring close for Latin-1 text.

/// Advance widths for code points 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

/// Advance width of one character in 1/1000 em
pub fn helvetica_char_width(ch: char) -> u16 {
    let code = ch as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Width of `text` set in Helvetica at `font_size` points
pub fn helvetica_text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| helvetica_char_width(c) as u32).sum();
    units as f32 * font_size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(helvetica_char_width(' '), 278);
        assert_eq!(helvetica_char_width('0'), 556);
        assert_eq!(helvetica_char_width('W'), 944);
        assert_eq!(helvetica_char_width('i'), 222);
        assert_eq!(helvetica_char_width('~'), 584);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let at_ten = helvetica_text_width("- 12 -", 10.0);
        let at_twenty = helvetica_text_width("- 12 -", 20.0);
        // '-' 333, ' ' 278, '1' 556, '2' 556
        assert!((at_ten - 23.34).abs() < 0.001);
        assert!((at_twenty - 2.0 * at_ten).abs() < 0.001);
    }

    #[test]
    fn test_non_ascii_uses_default() {
        assert!((helvetica_text_width("é", 1000.0) - 556.0).abs() < 0.001);
        assert_eq!(helvetica_text_width("", 12.0), 0.0);
    }
}
