//! Number formatting for table cells and stat panels.
//!
//! Output follows en-US conventions: `,` groups thousands and `.` separates
//! decimals. Missing values render as `N/A`.

pub const NOT_AVAILABLE: &str = "N/A";

/// Fixed number of decimals, no grouping.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Fixed number of decimals with thousands grouping.
pub fn grouped(value: f64, decimals: usize) -> String {
    group_digits(&fixed(value, decimals))
}

/// Grouped with up to three decimals, trailing zeros trimmed.
pub fn compact(value: f64) -> String {
    let text = fixed(value, 3);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    group_digits(&text)
}

/// `$` followed by the grouped value with three decimals, or `N/A`.
pub fn usd_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", grouped(v, 3)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Grouped value with three decimals (no currency sign), or `N/A`.
pub fn amount_or_na(value: Option<f64>) -> String {
    value
        .map(|v| grouped(v, 3))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `$1.234T` style market capitalisation.
pub fn trillions(value: f64) -> String {
    format!("${}T", fixed(value / 1e12, 3))
}

/// `$56.789B` style volume.
pub fn billions(value: f64) -> String {
    format!("${}B", fixed(value / 1e9, 3))
}

pub fn percent(value: f64, decimals: usize) -> String {
    format!("{}%", fixed(value, decimals))
}

pub fn percent_or_na(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| percent(v, decimals))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn group_digits(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
