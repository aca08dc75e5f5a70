//! Number, currency and date formatting for chart labels.
//!
//! Chart options refer to label formats by name (see [`LabelFormat`]) rather
//! than carrying callbacks, so the options tree stays plain data.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default currency prefix.
pub const DEFAULT_CURRENCY: &str = "MWK";

/// Errors from formatting helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unrecognised date '{0}' (expected RFC 3339, 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD')")]
    InvalidDate(String),

    #[error("unknown label format '{0}'")]
    UnknownLabelFormat(String),
}

/// Insert `,` between every group of three integer digits.
///
/// The fractional part is left as the float's shortest display form.
pub fn number_with_commas(value: f64) -> String {
    let text = value.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    match unsigned.split_once('.') {
        Some((int, frac)) => format!("{}{}.{}", sign, group_thousands(int), frac),
        None => format!("{}{}", sign, group_thousands(unsigned)),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Currency display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Prefix written before the amount
    pub symbol: String,

    /// Fraction digits (always padded)
    pub decimals: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_CURRENCY.to_string(),
            decimals: 2,
        }
    }
}

impl CurrencyFormat {
    /// `1234.5` -> `MWK 1,234.50`. Non-finite amounts render as zero.
    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let fixed = format!("{:.*}", self.decimals, amount.abs());
        let (int, frac) = match fixed.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (fixed.as_str(), None),
        };
        // -0.001 rounds to 0.00 and should not print a sign
        let negative = amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
        let sign = if negative { "-" } else { "" };
        match frac {
            Some(frac) => format!("{} {}{}.{}", self.symbol, sign, group_thousands(int), frac),
            None => format!("{} {}{}", self.symbol, sign, group_thousands(int)),
        }
    }

    /// Currency tick label: prefix plus comma-grouped value, no padding.
    pub fn tick(&self, value: f64) -> String {
        format!("{} {}", self.symbol, number_with_commas(value))
    }
}

/// Format with the default `MWK` prefix and two decimals.
pub fn format_currency(amount: f64) -> String {
    CurrencyFormat::default().format(amount)
}

fn parse_date_time(input: &str) -> Result<NaiveDateTime, FormatError> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| FormatError::InvalidDate(input.to_string()))
}

/// `2024-01-05` -> `Jan 5, 2024`.
pub fn format_date(input: &str) -> Result<String, FormatError> {
    Ok(parse_date_time(input)?.format("%b %-d, %Y").to_string())
}

/// `2024-01-05 14:30:00` -> `Jan 5, 2024, 02:30 PM`.
///
/// Offsets in RFC 3339 input are kept as written, not converted.
pub fn format_date_time(input: &str) -> Result<String, FormatError> {
    Ok(parse_date_time(input)?.format("%b %-d, %Y, %I:%M %p").to_string())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `total`, two decimals. Zero total gives 0.
pub fn calculate_percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    round2(part / total * 100.0)
}

/// Margin of `price` over `cost` in percent, two decimals. Zero price gives 0.
pub fn profit_margin(cost: f64, price: f64) -> f64 {
    if price == 0.0 {
        return 0.0;
    }
    round2((price - cost) / price * 100.0)
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Named label format used for axis ticks and tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    /// `12,345`
    Number,
    /// `MWK 12,345`
    Currency,
    /// `Sales: MWK 12,345` using the series label
    SeriesCurrency,
    /// `Sales: MWK 12,345.00` with the currency's fraction digits
    SeriesCurrencyFixed,
    /// `Label: 12,345 (40%)`
    Share,
    /// `Label: 45 customers (18.0%)`
    Customers,
}

/// Data around a value being labelled.
#[derive(Debug, Clone, Default)]
pub struct LabelContext<'a> {
    /// Category label (pie slice) or series label (line/bar tooltip)
    pub label: &'a str,

    /// Sum of the dataset, for share formats
    pub total: f64,
}

impl LabelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFormat::Number => "number",
            LabelFormat::Currency => "currency",
            LabelFormat::SeriesCurrency => "series_currency",
            LabelFormat::SeriesCurrencyFixed => "series_currency_fixed",
            LabelFormat::Share => "share",
            LabelFormat::Customers => "customers",
        }
    }

    /// Render `value` with this format.
    pub fn apply(&self, value: f64, ctx: &LabelContext<'_>, currency: &CurrencyFormat) -> String {
        match self {
            LabelFormat::Number => number_with_commas(value),
            LabelFormat::Currency => currency.tick(value),
            LabelFormat::SeriesCurrency => format!("{}: {}", ctx.label, currency.tick(value)),
            LabelFormat::SeriesCurrencyFixed => format!("{}: {}", ctx.label, currency.format(value)),
            LabelFormat::Share => {
                let pct = if ctx.total == 0.0 { 0.0 } else { (value / ctx.total * 100.0).round() };
                format!("{}: {} ({}%)", ctx.label, number_with_commas(value), pct)
            }
            LabelFormat::Customers => {
                let pct = if ctx.total == 0.0 { 0.0 } else { value / ctx.total * 100.0 };
                format!("{}: {} customers ({:.1}%)", ctx.label, value, pct)
            }
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(LabelFormat::Number),
            "currency" => Ok(LabelFormat::Currency),
            "series_currency" => Ok(LabelFormat::SeriesCurrency),
            "series_currency_fixed" => Ok(LabelFormat::SeriesCurrencyFixed),
            "share" => Ok(LabelFormat::Share),
            "customers" => Ok(LabelFormat::Customers),
            other => Err(FormatError::UnknownLabelFormat(other.to_string())),
        }
    }
}
