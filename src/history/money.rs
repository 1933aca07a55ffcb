//! Expenses are stored as integer cents and carried as decimals in JSON.

use lazy_static::lazy_static;
use regex::Regex;

/// Upper bound for a single expense ($100M); keeps per-user sums far from `i64::MAX`.
pub const MAX_EXPENSE_CENTS: i64 = 10_000_000_000;

/// `None` for negative, non-finite or over-cap amounts.
pub fn to_cents(amount: f64) -> Option<i64> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents > MAX_EXPENSE_CENTS as f64 {
        return None;
    }
    Some(cents as i64)
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Parses a display price such as `"$16.50"`, `"16"` or `"$1,204.99"`.
pub fn parse_price_cents(price: &str) -> Option<i64> {
    lazy_static! {
        static ref PRICE_RE: Regex =
            Regex::new(r"^\$?\s*(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?$").unwrap();
    }
    let caps = PRICE_RE.captures(price.trim())?;
    let whole: i64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
    let frac = match caps.get(2).map(|m| m.as_str()) {
        Some(f) if f.len() == 1 => f.parse::<i64>().ok()? * 10,
        Some(f) => f.parse::<i64>().ok()?,
        None => 0,
    };
    whole
        .checked_mul(100)?
        .checked_add(frac)
        .filter(|cents| *cents <= MAX_EXPENSE_CENTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_conversion() {
        assert_eq!(to_cents(16.5), Some(1650));
        assert_eq!(to_cents(0.0), Some(0));
        assert_eq!(to_cents(19.999), Some(2000));
        assert_eq!(to_cents(-1.0), None);
        assert_eq!(to_cents(f64::NAN), None);
        assert_eq!(from_cents(1650), 16.5);
    }

    #[test]
    fn huge_amounts_are_rejected_not_saturated() {
        assert_eq!(to_cents(1e20), None);
        assert_eq!(to_cents(f64::MAX), None);
        assert_eq!(to_cents(100_000_000.0), Some(MAX_EXPENSE_CENTS));
        assert_eq!(to_cents(100_000_000.01), None);
        assert_eq!(parse_price_cents("$99999999999999999999"), None);
        assert_eq!(parse_price_cents("$100,000,000.01"), None);
    }

    #[test]
    fn parses_display_prices() {
        assert_eq!(parse_price_cents("$16.50"), Some(1650));
        assert_eq!(parse_price_cents(" $9.5 "), Some(950));
        assert_eq!(parse_price_cents("12"), Some(1200));
        assert_eq!(parse_price_cents("$1,204.99"), Some(120499));
    }

    #[test]
    fn rejects_garbage_prices() {
        assert_eq!(parse_price_cents(""), None);
        assert_eq!(parse_price_cents("$$"), None);
        assert_eq!(parse_price_cents("about $15"), None);
        assert_eq!(parse_price_cents("-$3.00"), None);
        assert_eq!(parse_price_cents("$3.999"), None);
    }
}
