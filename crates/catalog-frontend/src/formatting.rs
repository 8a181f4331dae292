use std::fmt::Write;

use catalog_bridge::envelope::Pagination;

/// Longest description rendered before it is cut with an ellipsis.
const DESCRIPTION_LIMIT: usize = 48;

/// Formats a price with two decimal places and thousands separators.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}

/// Describes stock levels the way the product table does.
pub fn format_stock(stock: i64) -> String {
    match stock {
        i64::MIN..=0 => "out of stock".to_string(),
        1 => "1 unit".to_string(),
        n => format!("{n} units"),
    }
}

/// Summarises a page of results, e.g. `showing 11-20 of 42 (page 2/5)`.
pub fn format_pagination(pagination: &Pagination, shown: usize) -> String {
    let mut out = String::with_capacity(40);
    if shown == 0 {
        write!(&mut out, "showing 0 of {}", pagination.total).unwrap();
    } else {
        // page and limit come from the service; saturate instead of overflowing
        let first = pagination
            .page
            .saturating_sub(1)
            .saturating_mul(pagination.limit)
            .saturating_add(1);
        let last = first.saturating_add(shown as u64 - 1);
        write!(&mut out, "showing {first}-{last} of {}", pagination.total).unwrap();
    }
    write!(
        &mut out,
        " (page {}/{})",
        pagination.page,
        pagination.total_pages.max(1)
    )
    .unwrap();
    out
}

/// Shortens long descriptions to a single table-friendly line.
pub fn truncate_description(description: &str) -> String {
    let single_line = description.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= DESCRIPTION_LIMIT {
        return single_line;
    }

    let mut out: String = single_line.chars().take(DESCRIPTION_LIMIT - 1).collect();
    out.push('…');
    out
}
