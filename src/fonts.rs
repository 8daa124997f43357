//! Text measurement for the builtin Helvetica faces.
//!
//! Labels are drawn with the PDF builtin fonts, which carry no metrics we
//! can read, so widths use an average character width heuristic. It is
//! only used to wrap and truncate text inside fixed regions.

/// Average advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;
/// Bold is ~10 % wider.
const AVG_CHAR_WIDTH_BOLD: f32 = 0.55;

/// Ellipsis appended to truncated text.
pub const ELLIPSIS: char = '\u{2026}';

/// Estimated width of `text` in points.
pub fn measure_text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let avg = if bold { AVG_CHAR_WIDTH_BOLD } else { AVG_CHAR_WIDTH };
    text.chars().count() as f32 * font_size * avg
}

/// Line advance for a font size and line-height factor.
pub fn line_height(font_size: f32, line_height_factor: f32) -> f32 {
    font_size * line_height_factor
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
pub fn wrap_text(text: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    // Split on existing newlines first
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            let w = measure_text_width(&candidate, font_size, bold);
            if w > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Cut `text` so it fits `max_width`, marking the cut with an ellipsis.
pub fn truncate_to_width(text: &str, font_size: f32, bold: bool, max_width: f32) -> String {
    if measure_text_width(text, font_size, bold) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        out.push(ELLIPSIS);
        let fits = measure_text_width(&out, font_size, bold) <= max_width;
        out.pop();
        if !fits {
            out.pop();
            break;
        }
    }
    let mut out = out.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_text_width() {
        let w = measure_text_width("Hello", 16.0, false);
        // 5 chars × 16 × 0.5 = 40
        assert!((w - 40.0).abs() < 0.1);
        // Accented characters count once.
        assert_eq!(measure_text_width("São", 10.0, false), measure_text_width("Sao", 10.0, false));
    }

    #[test]
    fn word_wrap_basic() {
        let lines = wrap_text("Hello world foo bar", 16.0, false, 60.0);
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
        assert_eq!(lines.join(" "), "Hello world foo bar");
    }

    #[test]
    fn truncation_fits_and_marks() {
        let text = "Avenida Brigadeiro Faria Lima";
        let cut = truncate_to_width(text, 10.0, false, 60.0);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(measure_text_width(&cut, 10.0, false) <= 60.0);
        assert_eq!(truncate_to_width("Rua A", 10.0, false, 60.0), "Rua A");
    }
}
