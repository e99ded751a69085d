//! Display-safe normalization of raw metric values.
//!
//! Upstream data may arrive as clean numbers or as formatted text such as
//! `"$12,345"`. Widget geometry must stay finite and non-negative no matter
//! what shape the payload takes, so every function here is total: malformed
//! input degrades to zero (or the widget's visibility floor) instead of
//! erroring.

use crate::metrics::MetricValue;

/// Smallest rendered width for a strength bar, in percent. Keeps the bar
/// and its label visible even when the underlying value is zero.
pub const MIN_BAR_WIDTH_PCT: f64 = 2.0;

/// Smallest rendered height for a history bar, in percent.
pub const MIN_HISTORY_BAR_PCT: f64 = 12.0;

/// Upper bound for every rendered percentage.
pub const MAX_PCT: f64 = 100.0;

/// Converts a raw metric scalar into a finite magnitude `>= 0`.
///
/// Numbers pass through with negatives and non-finite values clamped to
/// zero. Text is stripped of thousands separators and every character that
/// is not a digit, decimal point, or minus sign, then parsed as `f64`;
/// anything that still fails to parse degrades to zero.
pub fn normalize_magnitude(value: &MetricValue) -> f64 {
    match value {
        MetricValue::Number(n) if n.is_finite() => n.max(0.0),
        MetricValue::Number(_) => 0.0,
        MetricValue::Text(raw) => {
            let cleaned: String = raw
                .chars()
                .filter(|c| *c != ',')
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            match cleaned.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => parsed.max(0.0),
                _ => 0.0,
            }
        }
    }
}

/// Largest magnitude in a group of bars that share one scale, floored at 1
/// so an all-zero group still divides safely.
pub fn strength_scale_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(1.0_f64, f64::max)
}

/// Width of a strength bar relative to its group scale, in `[2, 100]`.
pub fn bar_width_pct(value: f64, scale_max: f64) -> f64 {
    let scale = scale_max.max(1.0);
    bounded_pct(value / scale * 100.0, MIN_BAR_WIDTH_PCT)
}

/// Width of the implied-probability bar, in `[0, 100]`.
///
/// No visibility sliver here: zero probability is a legitimate state that
/// must render as an empty bar, distinct from a small one.
pub fn probability_width_pct(probability: f64) -> f64 {
    bounded_pct(probability * 100.0, 0.0)
}

/// Height of one historical-price bar, in `[12, 100]`.
pub fn history_bar_height_pct(point: f64) -> f64 {
    bounded_pct(point * 100.0, MIN_HISTORY_BAR_PCT)
}

/// Formats a percentage for a CSS dimension: up to two decimals, trailing
/// zeros trimmed (`42`, `18.18`, `2.5`).
pub fn format_pct(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn bounded_pct(raw: f64, floor: f64) -> f64 {
    if !raw.is_finite() {
        return floor;
    }
    raw.clamp(floor, MAX_PCT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn num(value: f64) -> MetricValue {
        MetricValue::Number(value)
    }

    fn text(value: &str) -> MetricValue {
        MetricValue::Text(value.to_string())
    }

    #[test]
    fn finite_numbers_pass_through_with_negatives_clamped() {
        let cases = [
            (12345.0, 12345.0),
            (0.03, 0.03),
            (0.0, 0.0),
            (-5.0, 0.0),
            (-0.0, 0.0),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_magnitude(&num(input)), expected);
        }
    }

    #[test]
    fn non_finite_numbers_degrade_to_zero() {
        for input in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(normalize_magnitude(&num(input)), 0.0);
        }
    }

    #[test]
    fn formatted_text_parses_with_separators_and_symbols_stripped() {
        let cases = [
            ("12,345.50", 12345.5),
            ("$12,345", 12345.0),
            ("67,890 shares", 67890.0),
            ("0.03", 0.03),
            (" 42 ", 42.0),
            ("USD 1,000,000", 1_000_000.0),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_magnitude(&text(input)), expected, "input {input:?}");
        }
    }

    #[test]
    fn negative_or_unparseable_text_degrades_to_zero() {
        let cases = ["-5", "-12,345.50", "abc", "", "N/A", ".", "--5", "1.2-3"];

        for input in cases {
            assert_eq!(normalize_magnitude(&text(input)), 0.0, "input {input:?}");
        }
    }

    #[test]
    fn bar_width_stays_within_visible_bounds() {
        assert_eq!(bar_width_pct(0.0, 100.0), 2.0);
        assert_eq!(bar_width_pct(1.0, 100.0), 2.0);
        assert_eq!(bar_width_pct(50.0, 100.0), 50.0);
        assert_eq!(bar_width_pct(100.0, 100.0), 100.0);
        assert_eq!(bar_width_pct(250.0, 100.0), 100.0);
    }

    #[test]
    fn bar_scale_is_floored_to_avoid_division_by_zero() {
        assert_eq!(strength_scale_max(&[0.0, 0.0]), 1.0);
        assert_eq!(strength_scale_max(&[0.5, 0.25]), 1.0);
        assert_eq!(strength_scale_max(&[12345.0, 67890.0]), 67890.0);
        assert_eq!(bar_width_pct(0.0, 0.0), 2.0);
        assert_eq!(bar_width_pct(2.0, 0.5), 100.0);
    }

    #[test]
    fn probability_width_has_no_sliver_floor() {
        assert_eq!(probability_width_pct(0.0), 0.0);
        assert_eq!(probability_width_pct(0.42), 42.0);
        assert_eq!(probability_width_pct(1.0), 100.0);
        assert_eq!(probability_width_pct(1.5), 100.0);
        assert_eq!(probability_width_pct(-0.25), 0.0);
        assert_eq!(probability_width_pct(f64::NAN), 0.0);
    }

    #[test]
    fn history_bars_keep_a_readable_floor() {
        assert_eq!(history_bar_height_pct(0.4), 40.0);
        assert_eq!(history_bar_height_pct(0.0), 12.0);
        assert_eq!(history_bar_height_pct(0.05), 12.0);
        assert_eq!(history_bar_height_pct(1.0), 100.0);
        assert_eq!(history_bar_height_pct(1.2), 100.0);
        assert_eq!(history_bar_height_pct(f64::NAN), 12.0);
    }

    #[test]
    fn percentages_format_without_trailing_zeros() {
        let cases = [
            (42.0, "42"),
            (18.183826778612462, "18.18"),
            (100.0, "100"),
            (2.0, "2"),
            (0.0, "0"),
            (12.5, "12.5"),
        ];

        for (input, expected) in cases {
            assert_eq!(format_pct(input), expected);
        }
    }

    #[test]
    fn width_sweep_yields_css_safe_percentages() {
        let re = Regex::new(r"^\d{1,3}(\.\d{1,2})?$").unwrap();

        for step in 0..=400 {
            let value = f64::from(step) * 0.37;
            for scale in [1.0, 7.5, 100.0, 67890.0] {
                let width = bar_width_pct(value, scale);
                assert!((MIN_BAR_WIDTH_PCT..=100.0).contains(&width));
                assert!(re.is_match(&format_pct(width)));
            }

            let height = history_bar_height_pct(f64::from(step) / 400.0);
            assert!((MIN_HISTORY_BAR_PCT..=100.0).contains(&height));
            assert!(re.is_match(&format_pct(height)));
        }
    }
}
