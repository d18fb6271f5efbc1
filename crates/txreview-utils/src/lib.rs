//! Formatting helpers for rendering the review list

use rust_decimal::{Decimal, RoundingStrategy};

/// Group the digits of a non-negative integer string with thousands separators
pub fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, c) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Symbol for a currency code; unknown codes are shown as a prefix
pub fn currency_symbol(currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{} ", other),
    }
}

/// Format an amount as money, e.g. `-$1,234.50`
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded);
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{}{}{}.{}",
        sign,
        currency_symbol(currency),
        group_thousands(whole),
        cents
    )
}

/// Checkbox-style mark for an approval state
pub fn approval_mark(approved: bool) -> &'static str {
    if approved {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Pad or truncate to a fixed display width
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else if width == 0 {
        String::new()
    } else {
        let mut truncated: String = text.chars().take(width - 1).collect();
        truncated.push('…');
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_format_money() {
        let amount = Decimal::from_str("1234.5").unwrap();
        assert_eq!(format_money(amount, "USD"), "$1,234.50");
        assert_eq!(format_money(-amount, "usd"), "-$1,234.50");
        assert_eq!(format_money(Decimal::from_str("0.005").unwrap(), "EUR"), "€0.01");
        assert_eq!(format_money(Decimal::from_str("-0.001").unwrap(), "GBP"), "£0.00");
        assert_eq!(format_money(Decimal::from(12), "CHF"), "CHF 12.00");
    }

    #[test]
    fn test_approval_mark() {
        assert_eq!(approval_mark(true), "[x]");
        assert_eq!(approval_mark(false), "[ ]");
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("Uber", 6), "Uber  ");
        assert_eq!(fit("Starbucks", 5), "Star…");
        assert_eq!(fit("abc", 0), "");
    }
}
