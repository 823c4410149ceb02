//! Text rendering of an allocation
//!
//! Three columns (quantity, product, weights). A blank row opens the table and
//! another separates the items from the closing `Remaining:` row, whether or
//! not anything was selected.

use crate::models::Allocation;

const COLUMN_GAP: &str = "  ";

fn render_row(row: &[String; 3], quantity_width: usize, product_width: usize) -> String {
    format!(
        "{:>qw$}{gap}{:<pw$}{gap}{}",
        row[0],
        row[1],
        row[2],
        qw = quantity_width,
        pw = product_width,
        gap = COLUMN_GAP,
    )
    .trim_end()
    .to_string()
}

/// Render an allocation as the counter display table
pub fn render_table(allocation: &Allocation) -> String {
    let mut rows: Vec<Option<[String; 3]>> = vec![None];
    rows.extend(
        allocation
            .lines
            .iter()
            .map(|line| Some([line.quantity.to_string(), line.product.clone(), line.summary()])),
    );
    rows.push(None);
    rows.push(Some([
        String::new(),
        "Remaining:".to_string(),
        allocation.remaining_summary(),
    ]));

    let quantity_width = rows.iter().flatten().map(|r| r[0].chars().count()).max().unwrap_or(0);
    let product_width = rows.iter().flatten().map(|r| r[1].chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|row| match row {
            Some(row) => render_row(row, quantity_width, product_width),
            None => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
