//! Static font-metric tables for the two receipt faces (regular labels, bold values).
//!
//! Character widths are in em units (relative to font size), Helvetica-compatible, which
//! is what Arial-family faces measure to. The tables cover ASCII 0x20..=0x7E (95 printable
//! characters, index = `(char as usize) - 32`). Everything else, Greek in particular, falls
//! back to one of two per-face averages split on letter case: Greek capitals are close to
//! Latin capitals, Greek lowercase close to Latin lowercase.

use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// Fonts
// ────────────────────────────────────────────────────────────────────────────

/// The two faces a receipt is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFace {
    Regular,
    Bold,
}

/// A face at a size. This is the "font context" every width measurement is taken in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub face: FontFace,
    pub size_pt: f32,
}

impl FontSpec {
    pub const fn regular(size_pt: f32) -> Self {
        Self {
            face: FontFace::Regular,
            size_pt,
        }
    }

    pub const fn bold(size_pt: f32) -> Self {
        Self {
            face: FontFace::Bold,
            size_pt,
        }
    }
}

/// Width measurement capability. The wrap engine and composer only ever see this trait,
/// so tests can swap in a fixed-advance measure.
pub trait TextMeasure {
    /// Rendered width of `text` in points.
    fn measure(&self, text: &str, font: FontSpec) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, FontSpec) -> f32,
{
    fn measure(&self, text: &str, font: FontSpec) -> f32 {
        self(text, font)
    }
}

/// Measures through the static tables below.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMetrics;

impl TextMeasure for StaticMetrics {
    fn measure(&self, text: &str, font: FontSpec) -> f32 {
        get_metrics(font.face).measure_str(text) * font.size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry of a single A4 receipt page, in points, top-down (y grows downwards).
///
/// Row `r` of the body sits at `body_top_pt + r * row_height_pt`. Everything below the
/// body (signature, notes) is offset from the first row after the last field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,

    // Header
    pub logo_x_pt: f32,
    pub logo_y_pt: f32,
    pub logo_width_pt: f32,
    pub contact_right_margin_pt: f32,
    pub contact_top_pt: f32,
    pub contact_line_gap_pt: f32,
    pub contact_font: FontSpec,
    pub title_y_pt: f32,
    pub title_font: FontSpec,

    // Body rows
    pub body_top_pt: f32,
    pub row_height_pt: f32,
    pub label_x_pt: f32,
    pub value_x_pt: f32,
    pub label_font: FontSpec,
    pub value_font: FontSpec,
    /// Wrap width for wrap-eligible values (payer, written amount).
    pub value_wrap_width_pt: f32,

    // Signature
    pub signature_gap_pt: f32,
    pub signature_caption_rise_pt: f32,
    pub signature_right_margin_pt: f32,
    pub signature_font: FontSpec,

    // Notes
    pub notes_gap_pt: f32,
    pub notes_first_line_gap_pt: f32,
    pub notes_line_height_pt: f32,
    pub notes_indent_pt: f32,
    pub notes_label_font: FontSpec,
    pub notes_font: FontSpec,
    pub notes_wrap_width_pt: f32,
}

impl PageConfig {
    /// Baseline of body row `row`.
    pub fn row_y(&self, row: u32) -> f32 {
        self.body_top_pt + row as f32 * self.row_height_pt
    }

    /// Spacing between the sub-lines of one wrapped value.
    pub fn wrapped_line_gap(&self) -> f32 {
        self.value_font.size_pt + 2.0
    }
}

/// A4 (210 mm × 297 mm) with the receipt's fixed geometry.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_pt: 210.0 * MM,
        height_pt: 297.0 * MM,

        logo_x_pt: 20.0 * MM,
        logo_y_pt: 15.0 * MM,
        logo_width_pt: 40.0 * MM,
        contact_right_margin_pt: 20.0 * MM,
        contact_top_pt: 20.0 * MM,
        contact_line_gap_pt: 5.0 * MM,
        contact_font: FontSpec::regular(10.0),
        title_y_pt: 65.0 * MM,
        title_font: FontSpec::bold(16.0),

        body_top_pt: 90.0 * MM,
        row_height_pt: 10.0 * MM,
        label_x_pt: 30.0 * MM,
        value_x_pt: 80.0 * MM,
        label_font: FontSpec::regular(12.0),
        value_font: FontSpec::bold(12.0),
        value_wrap_width_pt: 120.0 * MM,

        signature_gap_pt: 60.0,
        signature_caption_rise_pt: 20.0,
        signature_right_margin_pt: 30.0 * MM,
        signature_font: FontSpec::regular(12.0),

        notes_gap_pt: 15.0,
        notes_first_line_gap_pt: 15.0,
        notes_line_height_pt: 13.0,
        notes_indent_pt: 10.0 * MM,
        notes_label_font: FontSpec::bold(11.0),
        notes_font: FontSpec::regular(11.0),
        notes_wrap_width_pt: 150.0 * MM,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback for non-ASCII uppercase letters.
    pub upper_fallback_width: f32,
    /// Fallback for every other non-ASCII character.
    pub average_char_width: f32,
    pub euro_width: f32,
}

impl FontMetricTable {
    /// Rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '€' {
            self.euro_width
        } else if c.is_uppercase() {
            self.upper_fallback_width
        } else {
            self.average_char_width
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static REGULAR_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1     2     3     4     5     6     7     8     9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;     <     =     >     ?     @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \     ]     ^     _     `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {     |     }     ~
        0.334, 0.260, 0.334, 0.584,
    ],
    upper_fallback_width: 0.680,
    average_char_width: 0.540,
    euro_width: 0.556,
};

/// Bold runs roughly 5–10% wider than regular on lowercase, identical on most capitals.
static BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1     2     3     4     5     6     7     8     9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;     <     =     >     ?     @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \     ]     ^     _     `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {     |     }     ~
        0.389, 0.280, 0.389, 0.584,
    ],
    upper_fallback_width: 0.720,
    average_char_width: 0.590,
    euro_width: 0.556,
};

/// Returns the static metric table for a face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Regular => &REGULAR_TABLE,
        FontFace::Bold => &BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontFace::Regular).measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFace::Regular);
        // "Rust" = R(0.722) + u(0.556) + s(0.500) + t(0.278) = 2.056
        let width = metrics.measure_str("Rust");
        assert!((width - 2.056).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_greek_falls_back_by_case() {
        let metrics = get_metrics(FontFace::Regular);
        assert!((metrics.measure_str("Ω") - metrics.upper_fallback_width).abs() < 1e-4);
        assert!((metrics.measure_str("ω") - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_euro_sign_has_digit_width() {
        let metrics = get_metrics(FontFace::Bold);
        assert!((metrics.measure_str("€") - metrics.measure_str("0")).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_not_narrower_than_regular() {
        let text = "Received from somebody important";
        let regular = StaticMetrics.measure(text, FontSpec::regular(12.0));
        let bold = StaticMetrics.measure(text, FontSpec::bold(12.0));
        assert!(bold >= regular, "bold {bold} < regular {regular}");
    }

    #[test]
    fn test_get_metrics_selects_table_by_face() {
        assert!(std::ptr::eq(get_metrics(FontFace::Regular), &REGULAR_TABLE));
        assert!(std::ptr::eq(get_metrics(FontFace::Bold), &BOLD_TABLE));
        assert!(
            get_metrics(FontFace::Bold).upper_fallback_width
                > get_metrics(FontFace::Regular).upper_fallback_width
        );
    }

    #[test]
    fn test_static_measure_scales_with_size() {
        let at_10 = StaticMetrics.measure("ΕΥΡΟ", FontSpec::regular(10.0));
        let at_20 = StaticMetrics.measure("ΕΥΡΟ", FontSpec::regular(20.0));
        assert!((at_20 - 2.0 * at_10).abs() < 1e-3);
    }

    #[test]
    fn test_closure_is_a_text_measure() {
        let fixed = |s: &str, _: FontSpec| s.chars().count() as f32;
        assert_eq!(fixed.measure("abc", FontSpec::regular(12.0)), 3.0);
    }

    #[test]
    fn test_default_page_config_sanity() {
        let config = default_page_config();
        assert!((config.width_pt - 595.28).abs() < 0.1);
        assert!((config.height_pt - 841.89).abs() < 0.1);
        assert!((config.row_height_pt - 28.346).abs() < 0.01);
        assert!(config.value_x_pt > config.label_x_pt);
        assert!(config.value_x_pt + config.value_wrap_width_pt < config.width_pt);
        assert_eq!(config.row_y(0), config.body_top_pt);
    }
}
