//! Locale-sensitive formatting of numbers, percentages and dates.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::i18n::Language;

/// Thousands separator used by fr-FR (narrow no-break space).
const FR_GROUP_SEPARATOR: char = '\u{202F}';

/// Format an integer count with the grouping rules of the language.
pub fn format_number(lang: Language, value: u64) -> String {
    let separator = match lang {
        Language::Fr => FR_GROUP_SEPARATOR,
        Language::En => ',',
    };
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Format a weekly evolution percentage with an explicit sign and one decimal.
///
/// Zero counts as growth: `0.0` renders as `+0.0%`.
pub fn format_evolution(evolution: f64) -> String {
    // -0.0 compares as growth but would print its own minus sign.
    let evolution = if evolution == 0.0 { 0.0 } else { evolution };
    let sign = if is_growth(evolution) { "+" } else { "" };
    format!("{}{:.1}%", sign, evolution)
}

/// Display classification of an evolution value (`>= 0`).
pub fn is_growth(evolution: f64) -> bool {
    evolution >= 0.0
}

/// Share of `value` in `total` as a one-decimal string, `0.0` when the total is zero.
pub fn format_share(value: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", value as f64 / total as f64 * 100.0)
}

/// Parse the date formats the statistics service emits.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Day/month label for chart axes: `05/03` in French, `03/05` in English.
/// Unparseable input is returned unchanged.
pub fn short_date(lang: Language, raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => match lang {
            Language::Fr => date.format("%d/%m").to_string(),
            Language::En => date.format("%m/%d").to_string(),
        },
        None => raw.to_string(),
    }
}

/// Full date: `05/03/2024` in French, `3/5/2024` in English.
/// Unparseable input is returned unchanged.
pub fn full_date(lang: Language, raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => match lang {
            Language::Fr => date.format("%d/%m/%Y").to_string(),
            Language::En => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        },
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_english_grouping() {
        assert_eq!(format_number(Language::En, 0), "0");
        assert_eq!(format_number(Language::En, 999), "999");
        assert_eq!(format_number(Language::En, 1000), "1,000");
        assert_eq!(format_number(Language::En, 1234567), "1,234,567");
    }

    #[test]
    fn test_format_number_french_grouping() {
        assert_eq!(format_number(Language::Fr, 1234), "1\u{202F}234");
        assert_eq!(format_number(Language::Fr, 100000), "100\u{202F}000");
    }

    #[test]
    fn test_zero_evolution_is_positive() {
        assert_eq!(format_evolution(0.0), "+0.0%");
        assert!(is_growth(0.0));
    }

    #[test]
    fn test_negative_zero_evolution_from_json() {
        let evolution: f64 = serde_json::from_str("-0.0").unwrap();
        assert!(is_growth(evolution));
        assert_eq!(format_evolution(evolution), "+0.0%");
        // Rounds to zero but stays a decline.
        assert_eq!(format_evolution(-0.04), "-0.0%");
        assert!(!is_growth(-0.04));
    }

    #[test]
    fn test_evolution_sign_and_rounding() {
        assert_eq!(format_evolution(12.345), "+12.3%");
        assert_eq!(format_evolution(-4.26), "-4.3%");
        assert_eq!(format_evolution(-7.0), "-7.0%");
        assert!(!is_growth(-0.1));
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(1, 4), "25.0");
        assert_eq!(format_share(1, 3), "33.3");
        assert_eq!(format_share(5, 0), "0.0");
    }

    #[test]
    fn test_short_date_per_language() {
        assert_eq!(short_date(Language::Fr, "2024-03-05"), "05/03");
        assert_eq!(short_date(Language::En, "2024-03-05"), "03/05");
    }

    #[test]
    fn test_full_date_per_language() {
        assert_eq!(full_date(Language::Fr, "2024-03-05"), "05/03/2024");
        assert_eq!(full_date(Language::En, "2024-03-05"), "3/5/2024");
    }

    #[test]
    fn test_dates_accept_timestamps() {
        assert_eq!(full_date(Language::Fr, "2024-11-20T14:03:11Z"), "20/11/2024");
        assert_eq!(full_date(Language::En, "2024-11-20T14:03:11.512"), "11/20/2024");
    }

    #[test]
    fn test_unparseable_dates_pass_through() {
        assert_eq!(short_date(Language::Fr, "semaine 12"), "semaine 12");
        assert_eq!(full_date(Language::En, ""), "");
    }
}
