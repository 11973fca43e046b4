//! Numeric formatting for attribute values.
//!
//! Two forms appear in the output. Layout numbers (view-box, translations)
//! are rounded and printed in their shortest form, so `4.0` becomes `4`.
//! Transform and opacity values are padded to a fixed number of decimals,
//! so equal documents stay byte-identical even when a value happens to
//! land on an integer.

/// Round `v` to `digits` decimal places.
pub(crate) fn round_to(v: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (v * scale).round() / scale
}

/// Shortest decimal form of `v`, with `-0` normalized to `0`.
pub(crate) fn fmt_num(v: f64) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v}")
}

/// `v` rounded and padded to exactly `digits` decimals.
pub(crate) fn fmt_fixed(v: f64, digits: usize) -> String {
    let v = round_to(v, digits);
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:.digits$}")
}

/// Escape `s` for use inside a double-quoted attribute.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shortest_form_drops_trailing_zeros() {
        assert_eq!(fmt_num(round_to(4.0, 2)), "4");
        assert_eq!(fmt_num(round_to(4.5, 2)), "4.5");
        assert_eq!(fmt_num(round_to(4.456, 2)), "4.46");
        assert_eq!(fmt_num(round_to(-0.001, 2)), "0");
    }

    #[test]
    fn fixed_form_pads_decimals() {
        assert_eq!(fmt_fixed(5.0, 2), "5.00");
        assert_eq!(fmt_fixed(0.5, 2), "0.50");
        assert_eq!(fmt_fixed(1.23456789, 6), "1.234568");
        assert_eq!(fmt_fixed(-0.0001, 2), "0.00");
    }

    #[test]
    fn attribute_text_is_escaped() {
        assert_eq!(escape_attr(r#"a&b<c>"d""#), "a&amp;b&lt;c&gt;&quot;d&quot;");
        assert_eq!(escape_attr("plain.png"), "plain.png");
    }
}
