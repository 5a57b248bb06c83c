//! Takeoff name normalization
//!
//! The estimating tool lets estimators type member names freely, so the same
//! section shows up as `W12x50`, `W 12 x 50` or `W12x50 (typ)`. Every name is
//! run through [`normalize_name`] before it becomes part of an identity key,
//! in both ingestion passes.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Parenthesized remarks, greedy from the first `(` to the last `)`.
static PAREN_SECTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*\)").unwrap());

/// Complex fraction such as `1-1/2`.
static COMPLEX_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)-([0-9]+)/([0-9]+)").unwrap());

/// Leading alphabetic run directly followed by a digit.
static ALPHA_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\W\d_]+)(\d)").unwrap());

/// Plan-to-plan column reference, e.g. `F->L01`.
static PLAN_ARROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+->\w+").unwrap());

/// Canonicalize a raw takeoff name into its display/grouping form.
///
/// ```
/// use stk::core::normalize::normalize_name;
///
/// assert_eq!(normalize_name("W12 x 50"), "W 12x50");
/// assert_eq!(normalize_name("HSS 6x6x1-1/2 Beam Brace F->L01"), "HSS 6x6x1.5");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let mut name = raw.replace(" x ", "x");
    name.retain(|c| c != '"');
    name = PAREN_SECTION.replace_all(&name, "").into_owned();

    if name.starts_with("HSS") || name.starts_with('L') {
        name = COMPLEX_FRACTION
            .replace_all(&name, |caps: &Captures| fraction_to_decimal(caps))
            .into_owned();
    }

    name = ALPHA_DIGIT.replace(&name, "$1 $2").into_owned();

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > 2 && is_trailing_qualifier(words[2]) {
        name = words[..2].join(" ");
    }

    name.trim_end().to_string()
}

/// Third words that only describe where or how a member is used.
fn is_trailing_qualifier(word: &str) -> bool {
    PLAN_ARROW.is_match(word) || word.contains("Beam") || word.contains("Brace")
}

/// `N-A/B` to `N + A/B`, keeping the match when there is no whole part or the
/// denominator is zero.
fn fraction_to_decimal(caps: &Captures) -> String {
    match fraction_parts(caps) {
        Some((whole, num, den)) if whole > 0.0 && den != 0.0 => format_decimal(whole + num / den),
        _ => caps[0].to_string(),
    }
}

fn fraction_parts(caps: &Captures) -> Option<(f64, f64, f64)> {
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Decimal text with at least one fractional digit (`1.5`, `2.0`).
fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_separator_spaces_removed() {
        assert_eq!(normalize_name("L 6 x 6 x 1/2"), "L 6x6x1/2");
        assert_eq!(normalize_name("W12 x 50"), "W 12x50");
    }

    #[test]
    fn test_quotes_and_parens_removed() {
        assert_eq!(normalize_name("PL 1/2\" (typ)"), "PL 1/2");
        assert_eq!(normalize_name("W12x50 (A) (B)"), "W 12x50");
    }

    #[test]
    fn test_complex_fraction_for_hss_and_angles() {
        assert_eq!(normalize_name("HSS6x6x1-1/2"), "HSS 6x6x1.5");
        assert_eq!(normalize_name("L4x4x1-1/4"), "L 4x4x1.25");
        assert_eq!(normalize_name("L3-1/2x3-1/2x1/4"), "L 3.5x3.5x1/4");
    }

    #[test]
    fn test_complex_fraction_left_alone_for_other_shapes() {
        assert_eq!(normalize_name("PL1-1/2"), "PL 1-1/2");
        assert_eq!(normalize_name("HSS 6x6x1/4"), "HSS 6x6x1/4");
    }

    #[test]
    fn test_zero_whole_part_not_converted() {
        assert_eq!(normalize_name("HSS 6x6x0-1/2"), "HSS 6x6x0-1/2");
    }

    #[test]
    fn test_whole_number_fraction_keeps_decimal_point() {
        assert_eq!(normalize_name("HSS 8x8x2-0/4"), "HSS 8x8x2.0");
    }

    #[test]
    fn test_space_between_letters_and_digits() {
        assert_eq!(normalize_name("W12x50"), "W 12x50");
        assert_eq!(normalize_name("HSS6x6x1/4"), "HSS 6x6x1/4");
        assert_eq!(normalize_name("C 8x11.5"), "C 8x11.5");
    }

    #[test]
    fn test_trailing_qualifiers_dropped() {
        assert_eq!(normalize_name("W12x50 Beam Level 2"), "W 12x50");
        assert_eq!(normalize_name("W 10x33 F->L01"), "W 10x33");
        assert_eq!(normalize_name("HSS 6x6x1/4 Brace"), "HSS 6x6x1/4");
        assert_eq!(normalize_name("HSS 6x6x1/4 KneeBrace extra"), "HSS 6x6x1/4");
    }

    #[test]
    fn test_other_third_words_kept() {
        assert_eq!(normalize_name("W12x50 Stub"), "W 12x50 Stub");
        assert_eq!(normalize_name("W 12x50 Girt Level"), "W 12x50 Girt Level");
    }

    #[test]
    fn test_hss_beam_brace_scenario() {
        assert_eq!(
            normalize_name("HSS 6x6x1-1/2 Beam Brace F->L01"),
            "HSS 6x6x1.5"
        );
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        assert_eq!(normalize_name("W12x50   "), "W 12x50");
        assert_eq!(normalize_name("W12x50 (note)"), "W 12x50");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "W12x50",
            "W12 x 50 (typ)",
            "HSS 6x6x1-1/2 Beam Brace F->L01",
            "L3-1/2x3-1/2x1/4",
            "PL 1/2\" x 6\"",
            "W 14x22 Stub",
            "Deck 1.5\" 20ga",
            "",
            "   ",
            "C8x11.5 KP",
        ];
        for raw in samples {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_parenthetical_beside_x_needs_second_pass() {
        // The x spacing rule runs before parentheses are dropped
        let once = normalize_name("W6 x(a) 6");
        assert_eq!(once, "W 6 x 6");
        assert_eq!(normalize_name(&once), "W 6x6");
    }
}
