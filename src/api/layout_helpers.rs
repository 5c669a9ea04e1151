/// Approximates rendered label width without a text shaping backend.
pub(super) fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

/// Fixed-decimal value label, e.g. `311.34`.
pub(super) fn format_value_label(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}
