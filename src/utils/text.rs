use console::measure_text_width;

const MAGNITUDES: [(u64, &str); 4] = [
    (1_000_000_000_000, "T"),
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

/// Render a token count as a short magnitude string: `999`, `2.50M`, `1.00T`.
///
/// Values are rounded half-up to two decimals on the exact quotient, so the
/// result never depends on float representation.
pub fn format_context_length(context_length: u64) -> String {
    let Some(&(unit, suffix)) = MAGNITUDES.iter().find(|(unit, _)| context_length >= *unit) else {
        return context_length.to_string();
    };

    let unit = unit as u128;
    let hundredths = (context_length as u128 * 100 + unit / 2) / unit;
    format!("{}.{:02}{}", hundredths / 100, hundredths % 100, suffix)
}

/// Render a per-token price as a price per million tokens, without float noise.
pub fn format_price_per_million(price_per_token: f64) -> String {
    if !price_per_token.is_finite() {
        return "unknown".to_string();
    }

    let per_million = price_per_token * 1_000_000.0;
    // 15 significant digits, same precision as the catalog publishes
    let rounded: f64 = format!("{:.14e}", per_million)
        .parse()
        .unwrap_or(per_million);
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}

/// Wrap a line of plain text so that no piece is wider than `max_width` columns.
/// Breaks at the last space that fits, or mid-word when there is none.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || measure_text_width(text) <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut last_space: Option<usize> = None;

    for ch in text.chars() {
        let mut buf = [0u8; 4];
        let ch_width = measure_text_width(ch.encode_utf8(&mut buf));

        if current_width + ch_width > max_width {
            if ch == ' ' {
                lines.push(std::mem::take(&mut current).trim_end().to_string());
                current_width = 0;
                last_space = None;
                continue;
            }
            match last_space.take() {
                Some(idx) => {
                    let rest = current.split_off(idx + 1);
                    lines.push(current.trim_end().to_string());
                    current = rest;
                }
                None => lines.push(std::mem::take(&mut current)),
            }
            current_width = measure_text_width(&current);
        }

        if ch == ' ' {
            last_space = Some(current.len());
        }
        current.push(ch);
        current_width += ch_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
