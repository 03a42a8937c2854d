//! Greedy word-boundary wrapping.
//!
//! Same greedy rule as a typesetter's first-fit pass: keep appending the next
//! whitespace-separated token while the measured candidate line still fits, otherwise close
//! the line and start a new one with that token. A token wider than `max_width` on its own
//! still gets a line to itself, unsplit.

use crate::layout::font_metrics::{FontSpec, TextMeasure};

/// Wraps `text` to `max_width` points, measuring candidates in `font`.
///
/// Returns the lines in order. Empty or whitespace-only input yields no lines.
pub fn wrap_text<M>(text: &str, max_width: f32, measure: &M, font: FontSpec) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let (mut lines, last) = text.split_whitespace().fold(
        (Vec::new(), None::<String>),
        |(mut lines, current), word| match current {
            None => (lines, Some(word.to_string())),
            Some(line) => {
                let candidate = format!("{line} {word}");
                if measure.measure(&candidate, font) <= max_width {
                    (lines, Some(candidate))
                } else {
                    lines.push(line);
                    (lines, Some(word.to_string()))
                }
            }
        },
    );
    lines.extend(last);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{FontSpec, StaticMetrics};

    /// One point per character, regardless of font.
    fn per_char(s: &str, _: FontSpec) -> f32 {
        s.chars().count() as f32
    }

    const FONT: FontSpec = FontSpec::regular(12.0);

    fn normalized(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_input_produces_no_lines() {
        assert!(wrap_text("", 10.0, &per_char, FONT).is_empty());
        assert!(wrap_text("   \n\t ", 10.0, &per_char, FONT).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("one two", 20.0, &per_char, FONT), vec!["one two"]);
    }

    #[test]
    fn test_breaks_at_word_boundary() {
        // "aaa bbb" = 7 fits, "aaa bbb ccc" = 11 does not
        let lines = wrap_text("aaa bbb ccc ddd", 10.0, &per_char, FONT);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        // "aaaa bbbbb" is exactly 10 wide
        let lines = wrap_text("aaaa bbbbb c", 10.0, &per_char, FONT);
        assert_eq!(lines, vec!["aaaa bbbbb", "c"]);
    }

    #[test]
    fn test_oversized_token_gets_its_own_line() {
        let lines = wrap_text("a verylongtokenindeed b", 5.0, &per_char, FONT);
        assert_eq!(lines, vec!["a", "verylongtokenindeed", "b"]);
    }

    #[test]
    fn test_oversized_first_token_does_not_emit_empty_line() {
        let lines = wrap_text("enormous x", 3.0, &per_char, FONT);
        assert_eq!(lines, vec!["enormous", "x"]);
        assert!(lines.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_rejoin_reconstructs_normalized_text() {
        let samples = [
            "ΕΥΡΟ ΔΥΟ ΧΙΛΙΑΔΕΣ ΤΡΙΑΚΟΣΙΑ ΣΑΡΑΝΤΑ ΚΑΙ ΠΕΝΤΕ ΚΑΙ ΔΕΚΑ ΣΕΝΤ ΜΟΝΟ",
            "  leading   and\ttrailing\nwhitespace   ",
            "a b c d e f g h i j k l m n o p",
            "single",
        ];
        for text in samples {
            for max_width in [13.0, 20.0, 40.0, 400.0] {
                let lines = wrap_text(text, max_width, &per_char, FONT);
                assert_eq!(lines.join(" "), normalized(text), "width {max_width}");
            }
        }
    }

    #[test]
    fn test_no_line_exceeds_width_unless_single_token() {
        let text = "Payment for consulting services rendered during the third quarter \
                    including an extraordinarilylongtokenthatcannotfit and more";
        for max_width in [5.0, 12.0, 30.0, 80.0] {
            for line in wrap_text(text, max_width, &per_char, FONT) {
                let fits = per_char(&line, FONT) <= max_width;
                let single_token = line.split_whitespace().count() == 1;
                assert!(fits || single_token, "line {line:?} at width {max_width}");
            }
        }
    }

    #[test]
    fn test_wrapping_with_static_metrics() {
        let text = "ΕΥΡΟ ΕΚΑΤΟΝ ΕΝΕΝΗΝΤΑ ΕΝΝΕΑ ΧΙΛΙΑΔΕΣ ΕΝΝΙΑΚΟΣΙΑ ΕΝΕΝΗΝΤΑ ΚΑΙ ΕΝΝΕΑ \
                    ΚΑΙ ΕΝΕΝΗΝΤΑ ΚΑΙ ΕΝΝΕΑ ΣΕΝΤ ΜΟΝΟ";
        let font = FontSpec::bold(12.0);
        let max_width = 200.0;
        let lines = wrap_text(text, max_width, &StaticMetrics, font);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(StaticMetrics.measure(line, font) <= max_width);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "the same input always wraps the same way";
        assert_eq!(
            wrap_text(text, 12.0, &per_char, FONT),
            wrap_text(text, 12.0, &per_char, FONT)
        );
    }
}
