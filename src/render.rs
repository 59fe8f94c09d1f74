//! Text rendering of the dashboard: status panels and the inventory table.

use std::fmt::Write;

use crate::dashboard::{DashboardView, LoadState};
use crate::domain::Product;

/// How to tell the user to retry after a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadHint {
    /// One-shot commands: run the command again.
    Rerun,
    /// Interactive shell: the `reload` command.
    Shell,
}

impl ReloadHint {
    fn text(self) -> &'static str {
        match self {
            ReloadHint::Rerun => "Try again: re-run the command.",
            ReloadHint::Shell => "Try again: type `reload`.",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub reload_hint: ReloadHint,
    pub low_stock_only: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            reload_hint: ReloadHint::Rerun,
            low_stock_only: false,
        }
    }
}

const HEADERS: [&str; 6] = ["ID", "SKU", "Product Name", "Price", "Stock", "Status"];
const RIGHT_ALIGNED: [bool; 6] = [false, false, false, true, true, false];

pub fn render(view: &DashboardView, options: RenderOptions) -> String {
    let mut out = String::new();

    match view.state() {
        LoadState::Loading => {
            out.push_str("Fetching inventory...\n");
            return out;
        }
        LoadState::Failed(error) => {
            let _ = writeln!(out, "{error}");
            let _ = writeln!(out, "{}", options.reload_hint.text());
            return out;
        }
        LoadState::Ready => {}
    }

    if view.products.is_empty() {
        out.push_str("No products found in the inventory.\n");
        push_status(&mut out, view);
        return out;
    }

    out.push_str("Inventory Dashboard\n");
    out.push_str("Real-time stock monitoring\n\n");

    let rows: Vec<&Product> = if options.low_stock_only {
        view.low_stock().collect()
    } else {
        view.products.iter().collect()
    };

    if rows.is_empty() {
        out.push_str("No low-stock products.\n");
    } else {
        push_table(&mut out, &rows);
    }

    let low = view.low_stock().count();
    let _ = writeln!(
        out,
        "\n{} {}, {} low stock",
        view.products.len(),
        if view.products.len() == 1 {
            "product"
        } else {
            "products"
        },
        low
    );
    push_status(&mut out, view);
    out
}

fn push_status(out: &mut String, view: &DashboardView) {
    if let Some(status) = &view.status {
        let _ = writeln!(out, "Status: {status}");
    }
}

fn push_table(out: &mut String, rows: &[&Product]) {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|product| {
            [
                product.id.clone(),
                product.sku.clone(),
                product.name.clone(),
                format_price(product.price),
                product.stock.to_string(),
                product.status().label().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    // Leading marker column: `!` flags a low-stock row.
    push_row(out, ' ', &HEADERS.map(str::to_string), &widths);
    let rule: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let _ = writeln!(out, "  {}", "-".repeat(rule));
    for (product, row) in rows.iter().zip(&cells) {
        let marker = if product.is_low_stock() { '!' } else { ' ' };
        push_row(out, marker, row, &widths);
    }
}

fn push_row(out: &mut String, marker: char, cells: &[String; 6], widths: &[usize; 6]) {
    let mut line = String::new();
    line.push(marker);
    line.push(' ');
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let pad = widths[i].saturating_sub(cell.chars().count());
        if RIGHT_ALIGNED[i] {
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// `$` with thousands separators and exactly two decimals, e.g. `$1,234.50`.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
