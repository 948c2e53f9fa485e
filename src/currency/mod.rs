//! Display formatting for monetary amounts.

use serde::{Deserialize, Serialize};

/// Separators and currency used when rendering amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountFormat {
    pub currency: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// Symbol after the number (`1.250,00 €`) instead of before (`$1,250.00`).
    pub symbol_after: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self::for_locale("en-US", "USD")
    }
}

impl AmountFormat {
    /// Picks separators for a locale tag; unknown tags use `.` and `,`.
    pub fn for_locale(locale: &str, currency: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator, symbol_after) = match language.as_str() {
            "de" | "nl" | "it" | "es" | "pt" | "da" => (',', '.', true),
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" => (',', ' ', true),
            _ => ('.', ',', false),
        };
        Self {
            currency: currency.trim().to_uppercase(),
            decimal_separator,
            grouping_separator,
            symbol_after,
        }
    }

    pub fn format(&self, amount: f64) -> String {
        let precision = minor_units_for(&self.currency);
        let body = format_number(amount.abs(), precision, self.decimal_separator, self.grouping_separator);
        let sign = if amount < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
            "-"
        } else {
            ""
        };
        let symbol = symbol_for(&self.currency);
        if self.symbol_after {
            format!("{sign}{body} {symbol}")
        } else {
            format!("{sign}{symbol}{body}")
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> usize {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

fn format_number(value: f64, precision: usize, decimal: char, grouping: char) -> String {
    let body = format!("{:.*}", precision, value);
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, grouping);
    if let Some(fraction) = fraction {
        rendered.push(decimal);
        rendered.push_str(fraction);
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
