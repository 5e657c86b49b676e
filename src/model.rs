//! Typed records for the five canonical tables.
//!
//! Every canonical field is an `Option`: a field whose column was absent from
//! the raw extract is `None` on every row and missing from the table's
//! `present` list, so downstream stages can tell "column never arrived" from
//! "cell was empty".

use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Vendor {
    pub vendor_id: Option<i64>,
    pub vendor_ext_id: Option<String>,
    pub vendor_name: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub rating: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub po_id: Option<String>,
    pub po_date: Option<NaiveDate>,
    pub vendor_id: Option<i64>,
    /// Raw source spelling; cleared once the vendor reference is resolved.
    pub vendor_name: Option<String>,
    pub department: Option<String>,
    pub total_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub po_id: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub qty_ordered: Option<i64>,
    pub qty_received: Option<i64>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub invoice_id: Option<String>,
    pub po_id: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_amount: Option<Decimal>,
    pub paid_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub po_id: Option<String>,
    pub expected_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub delay_days: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CanonicalTable<R> {
    pub rows: Vec<R>,
    /// Canonical columns actually backed by data, in canonical column order.
    pub present: Vec<&'static str>,
}

impl<R> CanonicalTable<R> {
    /// An empty table that nevertheless carries the full canonical column
    /// set, used when an optional raw source is absent.
    pub fn empty(columns: &'static [&'static str]) -> Self {
        CanonicalTable {
            rows: Vec::new(),
            present: columns.to_vec(),
        }
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.present.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All five canonical tables for one run, finalized and ready to persist.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub vendors: CanonicalTable<Vendor>,
    pub purchase_orders: CanonicalTable<PurchaseOrder>,
    pub line_items: CanonicalTable<LineItem>,
    pub invoices: CanonicalTable<Invoice>,
    pub deliveries: CanonicalTable<Delivery>,
}

pub fn text_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn date_cell(value: &Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn int_cell(value: &Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn decimal_cell(value: &Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_carries_full_column_set() {
        let table: CanonicalTable<Delivery> = CanonicalTable::empty(crate::schema::DELIVERIES.columns);
        assert!(table.is_empty());
        assert!(table.has_column("delay_days"));
        assert_eq!(table.present.len(), 5);
    }

    #[test]
    fn cell_formatting_renders_none_as_empty() {
        assert_eq!(date_cell(&None), "");
        assert_eq!(int_cell(&Some(-4)), "-4");
        assert_eq!(
            date_cell(&NaiveDate::from_ymd_opt(2024, 1, 5)),
            "2024-01-05"
        );
    }
}
