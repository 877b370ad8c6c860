const RUPEE: &str = "\u{20b9}";

/// Formats an amount as rupees with Indian digit grouping, e.g.
/// `₹15,00,000.00`.
pub fn format_inr(value: f64) -> String {
    if value.is_nan() {
        return format!("{RUPEE}NaN");
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{RUPEE}\u{221e}");
    }

    let paise = (value.abs() * 100.0).round() as u128;
    let sign = if value < 0.0 && paise > 0 { "-" } else { "" };
    let rupees = group_indian(paise / 100);
    format!("{sign}{RUPEE}{rupees}.{:02}", paise % 100)
}

fn group_indian(whole: u128) -> String {
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
