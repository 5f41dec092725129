//! Display formatting in the report's fixed locale (en-GB, pounds sterling).

pub const CURRENCY_SYMBOL: &str = "£";

/// `£156,000`, `-£100`. Whole pounds, halves rounded away from zero.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!(
        "{}{}{}",
        sign,
        CURRENCY_SYMBOL,
        group_integer(rounded.abs())
    )
}

/// Like `format_currency` but always signed: `+£11,800`, `-£1,200`.
pub fn format_signed_currency(value: f64) -> String {
    let formatted = format_currency(value);
    if formatted.starts_with('-') || value.is_nan() {
        formatted
    } else {
        format!("+{}", formatted)
    }
}

/// Grouped number with up to three fraction digits: `6,240`, `1,234.568`, `4.2`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    let grouped = group_digits(int_part);

    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// Ungrouped shortest form: `246`, `4.2`, `-12.5`.
pub fn format_plain(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

fn group_integer(whole: f64) -> String {
    if whole.is_infinite() {
        return "∞".to_string();
    }
    group_digits(&format!("{:.0}", whole))
}

fn group_digits(digits: &str) -> String {
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
