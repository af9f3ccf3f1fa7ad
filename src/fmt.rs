/// Amount with thousands separators behind a currency symbol: $1,234.56.
/// Negative values put the sign before the symbol: -$1,250.45
pub fn money_with(val: f64, symbol: &str) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let with_commas = group_thousands(int_part);

    // -0.004 rounds to 0.00 and should not print a sign
    if negative && cents != "0.00" {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

/// Signed amount for transaction rows: "+$3,200.00" / "-$75.99".
pub fn signed_money(val: f64, symbol: &str) -> String {
    if val > 0.0 {
        format!("+{}", money_with(val, symbol))
    } else {
        money_with(val, symbol)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

/// Mask all but the last four characters: "1111222233334444" -> "•••• 4444".
pub fn mask_account_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("\u{2022}\u{2022}\u{2022}\u{2022} {tail}")
}

/// Chart value label: whole numbers without decimals, otherwise two places.
pub fn compact_number(val: f64) -> String {
    if val.fract() == 0.0 {
        format!("{val:.0}")
    } else {
        format!("{val:.2}")
    }
}

/// Title-case a lowercase identifier: "checking" -> "Checking".
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
