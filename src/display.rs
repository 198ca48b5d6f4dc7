/// Insert a comma every three digits, counting from the right.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

/// Group an integer with thousands separators: `1234567` → `1,234,567`
pub fn format_grouped_int(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Two decimals with grouped thousands: `102580.5` → `102,580.50`
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let grouped = group_digits(whole);

    if value < 0.0 && rounded != "0.00" {
        format!("-{grouped}.{frac}")
    } else {
        format!("{grouped}.{frac}")
    }
}

pub fn format_money(value: f64, currency_symbol: &str) -> String {
    format!("{}{}", currency_symbol, format_amount(value))
}

pub fn format_weight(kg: f64) -> String {
    format!("{} kg", format_amount(kg))
}

/// Replace the bottom border of a rounded `tabled` table with summary rows.
///
/// Columns left of `value_column` merge into one label cell, the value column
/// is kept, and columns to its right are closed off.
pub fn add_summary_footer(table: &str, value_column: usize, rows: &[(&str, String)]) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 || value_column == 0 || rows.is_empty() {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let Some(inner) = lines[0]
        .strip_prefix('╭')
        .and_then(|s| s.strip_suffix('╮'))
    else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() <= value_column {
        return table.to_string();
    }

    let dashes = |w: &usize| "─".repeat(*w);
    let left_width = widths[..value_column].iter().sum::<usize>() + value_column - 1;
    let value_width = widths[value_column];
    let trailing = &widths[value_column + 1..];

    // Strip the original bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    let merged: Vec<String> = widths[..value_column].iter().map(dashes).collect();
    out.push('├');
    out.push_str(&merged.join("┴"));
    out.push('┼');
    out.push_str(&dashes(&value_width));
    if trailing.is_empty() {
        out.push_str("┤\n");
    } else {
        let closed: Vec<String> = trailing.iter().map(dashes).collect();
        out.push('┼');
        out.push_str(&closed.join("┴"));
        out.push_str("╯\n");
    }

    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>left$} │ {:>width$} │\n",
            label,
            value,
            left = left_width.saturating_sub(2),
            width = value_width.saturating_sub(2)
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                dashes(&left_width),
                dashes(&value_width)
            ));
        }
    }

    out.push_str(&format!(
        "╰{}┴{}╯",
        dashes(&left_width),
        dashes(&value_width)
    ));

    out
}
