//! # CSV Export
//!
//! Renders table rows as CSV text: one header row, one row per record,
//! rows joined with `\n`.
//!
//! ## Quoting
//! ```text
//! plain field          Desk Lamp            →  Desk Lamp
//! contains , " CR LF   Lamp, "Large"        →  "Lamp, ""Large"""
//! ```

use chrono::NaiveDate;

use crate::types::{Order, Product, User};

/// A record that can be written as one CSV row.
pub trait CsvRecord {
    /// Column titles, in output order.
    fn headers() -> &'static [&'static str];

    /// Raw (unescaped) field values, same length and order as [`CsvRecord::headers`].
    fn record(&self) -> Vec<String>;
}

/// Quotes a field when it contains a separator, a quote or a line break.
pub fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header plus one escaped row per record.
pub fn to_csv<'a, R, I>(records: I) -> String
where
    R: CsvRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut lines = vec![join_row(R::headers())];
    lines.extend(records.into_iter().map(|r| join_row(&r.record())));
    lines.join("\n")
}

/// File name for a dated export, e.g. `products-2024-01-15.csv`.
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}

// =============================================================================
// Records
// =============================================================================

impl CsvRecord for User {
    fn headers() -> &'static [&'static str] {
        &[
            "Name",
            "Email",
            "Phone",
            "Role",
            "Status",
            "Orders",
            "Total Spent",
            "Created At",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.role.to_string(),
            self.status.to_string(),
            self.orders.to_string(),
            format!("${}", self.total_spent.to_decimal_string()),
            self.created_at.format("%Y-%m-%d").to_string(),
        ]
    }
}

impl CsvRecord for Product {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "SKU", "Category", "Price", "Stock", "Description"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.sku.clone().unwrap_or_default(),
            self.category.clone(),
            self.price.to_decimal_string(),
            self.stock.to_string(),
            self.description.clone(),
        ]
    }
}

impl CsvRecord for Order {
    fn headers() -> &'static [&'static str] {
        &["ID", "Customer", "Email", "Amount", "Status", "Items", "Date"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer.clone(),
            self.email.clone(),
            self.amount.to_decimal_string(),
            self.status.to_string(),
            self.items.to_string(),
            self.date.format("%Y-%m-%d").to_string(),
        ]
    }
}
