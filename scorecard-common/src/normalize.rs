//! Field normalizers for raw spreadsheet cell values
//!
//! Uploaded spreadsheets spell months, weeks, and percentages every way
//! imaginable. Each normalizer here is a pure, total function: it either
//! produces the canonical form or passes the input through unchanged so the
//! validation gate can reject it with the exact offending value in the
//! message. None of them panic on malformed input.

/// Full English month names, in calendar order
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Normalize a month cell to the full English month name.
///
/// Accepts an integer 1-12, or a case-insensitive prefix (3+ letters) of a
/// month name ("sep", "Sept", "september"). Unrecognized input is returned
/// trimmed but otherwise unchanged.
pub fn normalize_month(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(n) = trimmed.parse::<u32>() {
        if (1..=12).contains(&n) {
            return MONTH_NAMES[(n - 1) as usize].to_string();
        }
        return trimmed.to_string();
    }

    if trimmed.len() >= 3 {
        let lower = trimmed.to_lowercase();
        for name in MONTH_NAMES {
            if name.to_lowercase().starts_with(&lower) {
                return name.to_string();
            }
        }
    }

    trimmed.to_string()
}

/// Normalize a week cell to the canonical `"Week {n}"` label.
///
/// Accepted spellings: `12`, `week12`, `week 12`, `Week-12`, `WEEK_12`.
/// The week number must be 1-53; anything else (including `week 0` and
/// `week 54`) is returned trimmed but unchanged so validation can name it.
pub fn normalize_week(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();

    let rest = lower.strip_prefix("week").unwrap_or(&lower);
    let rest = rest.trim_start_matches([' ', '-', '_']);

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return trimmed.to_string();
    }

    match digits.parse::<u32>() {
        Ok(n) if (1..=53).contains(&n) => format!("Week {}", n),
        _ => trimmed.to_string(),
    }
}

/// Normalize a percentage-like cell to a number on the 0-100 scale.
///
/// Strips `%`, whitespace, and thousands separators before parsing. A value
/// in `(0, 1]` is taken to be a spreadsheet "percentage format" cell (stored
/// as a 0-1 float) and is rescaled: `1.0` means 100, `0.85` means 85. Values
/// above 1 are used as-is. Non-numeric input normalizes to 0.
///
/// The `(0, 1]` rescale is a heuristic carried over from the upstream data:
/// a genuine 0.5% score is indistinguishable from 50%-as-0.5 and will be
/// rescaled. There is no out-of-band signal to tell the two apart.
pub fn normalize_percentage(raw: &str) -> f64 {
    let value = parse_numeric(raw);
    if value > 0.0 && value <= 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// Normalize a count-like cell to a number.
///
/// Same stripping rules as [`normalize_percentage`] but with no fractional
/// rescaling. Non-numeric input normalizes to 0.
pub fn normalize_count(raw: &str) -> f64 {
    parse_numeric(raw)
}

/// Trim an identifier cell (name or external ID), preserving case.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_string()
}

/// Case-fold an identifier for comparison purposes only.
pub fn fold_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Strip `%`, whitespace, and thousands separators, then parse as f64.
fn parse_numeric(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%' && *c != ',')
        .collect();

    cleaned.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_accepts_integers() {
        assert_eq!(normalize_month("1"), "January");
        assert_eq!(normalize_month("12"), "December");
        assert_eq!(normalize_month(" 9 "), "September");
    }

    #[test]
    fn month_accepts_prefixes_and_full_names() {
        assert_eq!(normalize_month("jan"), "January");
        assert_eq!(normalize_month("Sept"), "September");
        assert_eq!(normalize_month("SEPTEMBER"), "September");
        assert_eq!(normalize_month("march"), "March");
    }

    #[test]
    fn month_is_idempotent_on_canonical_input() {
        for name in MONTH_NAMES {
            assert_eq!(normalize_month(name), name);
        }
    }

    #[test]
    fn month_passes_through_unrecognized_input() {
        assert_eq!(normalize_month("13"), "13");
        assert_eq!(normalize_month("0"), "0");
        assert_eq!(normalize_month("ju"), "ju");
        assert_eq!(normalize_month("holiday"), "holiday");
        assert_eq!(normalize_month(""), "");
    }

    #[test]
    fn week_accepts_all_observed_formats() {
        for n in 1..=53u32 {
            let expected = format!("Week {}", n);
            assert_eq!(normalize_week(&n.to_string()), expected);
            assert_eq!(normalize_week(&format!("week{}", n)), expected);
            assert_eq!(normalize_week(&format!("week {}", n)), expected);
            assert_eq!(normalize_week(&format!("Week-{}", n)), expected);
            assert_eq!(normalize_week(&format!("WEEK_{}", n)), expected);
        }
    }

    #[test]
    fn week_is_idempotent_on_canonical_input() {
        assert_eq!(normalize_week("Week 7"), "Week 7");
        assert_eq!(normalize_week("Week 53"), "Week 53");
    }

    #[test]
    fn week_leaves_out_of_range_input_unparsed() {
        assert_eq!(normalize_week("week 0"), "week 0");
        assert_eq!(normalize_week("week 54"), "week 54");
        assert_eq!(normalize_week("0"), "0");
        assert_eq!(normalize_week("54"), "54");
    }

    #[test]
    fn week_leaves_unparsable_input_unchanged() {
        assert_eq!(normalize_week("weekly"), "weekly");
        assert_eq!(normalize_week("n/a"), "n/a");
        assert_eq!(normalize_week(""), "");
    }

    #[test]
    fn percentage_rescales_fractional_cells() {
        assert_eq!(normalize_percentage("1.0"), 100.0);
        assert_eq!(normalize_percentage("0.85"), 85.0);
        assert_eq!(normalize_percentage("0.005"), 0.5);
    }

    #[test]
    fn percentage_keeps_plain_numbers() {
        assert_eq!(normalize_percentage("100"), 100.0);
        assert_eq!(normalize_percentage("45%"), 45.0);
        assert_eq!(normalize_percentage("102.5"), 102.5);
        assert_eq!(normalize_percentage("0"), 0.0);
    }

    #[test]
    fn percentage_strips_separators() {
        assert_eq!(normalize_percentage(" 1,250 % "), 1250.0);
    }

    #[test]
    fn percentage_maps_garbage_to_zero() {
        assert_eq!(normalize_percentage("n/a"), 0.0);
        assert_eq!(normalize_percentage(""), 0.0);
    }

    #[test]
    fn count_does_not_rescale() {
        assert_eq!(normalize_count("0.5"), 0.5);
        assert_eq!(normalize_count("1,024"), 1024.0);
        assert_eq!(normalize_count("12%"), 12.0);
        assert_eq!(normalize_count("abc"), 0.0);
    }

    #[test]
    fn identifier_trims_and_preserves_case() {
        assert_eq!(normalize_identifier("  Jane Doe "), "Jane Doe");
        assert_eq!(fold_identifier("  Jane Doe "), "jane doe");
    }
}
