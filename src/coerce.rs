//! Field coercion: raw cell strings into typed values.
//!
//! Rules per field class:
//!
//! - **Date**: multi-format calendar parse; empty → null, failure → null.
//! - **Decimal**: plain or scientific notation; empty → null, failure → null.
//!   No rounding or currency-aware scaling.
//! - **Quantity**: integer, or decimal truncated toward zero; empty → 0,
//!   failure → 0.
//! - **Integer**: parsed like a quantity but nullable; empty → null,
//!   failure → null.
//! - **Text**: verbatim; empty → null.
//!
//! Failures are recorded on the shared [`QualityReport`] instead of being
//! surfaced as errors. Coercion is pure: the same input string always yields
//! the same value.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{
    model::{CanonicalTable, Delivery, Invoice, LineItem, PurchaseOrder, Vendor},
    reconcile::ReconciledTable,
    report::QualityReport,
    schema::{self, TableSpec},
};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(parsed.date());
        }
    }
    Err(format!("not a recognized date: '{value}'"))
}

pub fn parse_decimal(value: &str) -> Result<Decimal, String> {
    let trimmed = value.trim();
    match trimmed.parse::<Decimal>() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Decimal::from_scientific(trimmed)
            .map_err(|_| format!("not a decimal number: '{value}'")),
    }
}

pub fn parse_quantity(value: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Ok(parsed);
    }
    parse_decimal(trimmed)
        .ok()
        .and_then(|d| d.trunc().to_i64())
        .ok_or_else(|| format!("not an integer quantity: '{value}'"))
}

/// Per-table coercion cursor. Failed cells fall back to the field rule's
/// default and land on the report with a 1-based row number.
struct Coercer<'a> {
    name: &'static str,
    table: &'a ReconciledTable,
    report: &'a mut QualityReport,
}

impl<'a> Coercer<'a> {
    fn new(name: &'static str, table: &'a ReconciledTable, report: &'a mut QualityReport) -> Self {
        Coercer {
            name,
            table,
            report,
        }
    }

    fn text(&mut self, row: usize, field: &'static str) -> Option<String> {
        self.table.cell(row, field).map(str::to_string)
    }

    fn date(&mut self, row: usize, field: &'static str) -> Option<NaiveDate> {
        let raw = self.table.cell(row, field)?;
        match parse_date(raw) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                self.report.record(self.name, field, row + 1, raw, reason);
                None
            }
        }
    }

    fn decimal(&mut self, row: usize, field: &'static str) -> Option<Decimal> {
        let raw = self.table.cell(row, field)?;
        match parse_decimal(raw) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                self.report.record(self.name, field, row + 1, raw, reason);
                None
            }
        }
    }

    fn integer(&mut self, row: usize, field: &'static str) -> Option<i64> {
        let raw = self.table.cell(row, field)?;
        match parse_quantity(raw) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                self.report.record(self.name, field, row + 1, raw, reason);
                None
            }
        }
    }

    fn quantity(&mut self, row: usize, field: &'static str) -> Option<i64> {
        if !self.table.has_column(field) {
            return None;
        }
        let Some(raw) = self.table.cell(row, field) else {
            return Some(0);
        };
        match parse_quantity(raw) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                self.report.record(self.name, field, row + 1, raw, reason);
                Some(0)
            }
        }
    }
}

/// The canonical columns backed by the reconciled source, in canonical
/// column order.
fn present_columns(spec: &TableSpec, table: &ReconciledTable) -> Vec<&'static str> {
    spec.columns
        .iter()
        .copied()
        .filter(|column| table.has_column(column))
        .collect()
}

pub fn vendors(table: &ReconciledTable, report: &mut QualityReport) -> CanonicalTable<Vendor> {
    let present = present_columns(&schema::VENDORS, table);
    let mut cursor = Coercer::new("vendors", table, report);
    let rows = (0..table.row_count())
        .map(|row| Vendor {
            vendor_id: None,
            vendor_ext_id: cursor.text(row, "vendor_ext_id"),
            vendor_name: cursor.text(row, "vendor_name"),
            country: cursor.text(row, "country"),
            category: cursor.text(row, "category"),
            rating: cursor.decimal(row, "rating"),
        })
        .collect();
    CanonicalTable { rows, present }
}

pub fn purchase_orders(
    table: &ReconciledTable,
    report: &mut QualityReport,
) -> CanonicalTable<PurchaseOrder> {
    let present = present_columns(&schema::PURCHASE_ORDERS, table);
    let mut cursor = Coercer::new("purchase_orders", table, report);
    let rows = (0..table.row_count())
        .map(|row| PurchaseOrder {
            po_id: cursor.text(row, "po_id"),
            po_date: cursor.date(row, "po_date"),
            vendor_id: cursor.integer(row, "vendor_id"),
            vendor_name: cursor.text(row, "vendor_name"),
            department: cursor.text(row, "department"),
            total_amount: cursor.decimal(row, "total_amount"),
            currency: cursor.text(row, "currency"),
            status: cursor.text(row, "status"),
        })
        .collect();
    CanonicalTable { rows, present }
}

pub fn line_items(table: &ReconciledTable, report: &mut QualityReport) -> CanonicalTable<LineItem> {
    let present = present_columns(&schema::PO_LINE_ITEMS, table);
    let mut cursor = Coercer::new("po_line_items", table, report);
    let rows = (0..table.row_count())
        .map(|row| LineItem {
            po_id: cursor.text(row, "po_id"),
            sku: cursor.text(row, "sku"),
            description: cursor.text(row, "description"),
            qty_ordered: cursor.quantity(row, "qty_ordered"),
            qty_received: cursor.quantity(row, "qty_received"),
            unit_price: cursor.decimal(row, "unit_price"),
        })
        .collect();
    CanonicalTable { rows, present }
}

pub fn invoices(table: &ReconciledTable, report: &mut QualityReport) -> CanonicalTable<Invoice> {
    let present = present_columns(&schema::INVOICES, table);
    let mut cursor = Coercer::new("invoices", table, report);
    let rows = (0..table.row_count())
        .map(|row| Invoice {
            invoice_id: cursor.text(row, "invoice_id"),
            po_id: cursor.text(row, "po_id"),
            invoice_date: cursor.date(row, "invoice_date"),
            invoice_amount: cursor.decimal(row, "invoice_amount"),
            paid_date: cursor.date(row, "paid_date"),
            payment_terms: cursor.text(row, "payment_terms"),
        })
        .collect();
    CanonicalTable { rows, present }
}

pub fn deliveries(table: &ReconciledTable, report: &mut QualityReport) -> CanonicalTable<Delivery> {
    let present = present_columns(&schema::DELIVERIES, table);
    let mut cursor = Coercer::new("deliveries", table, report);
    let rows = (0..table.row_count())
        .map(|row| Delivery {
            po_id: cursor.text(row, "po_id"),
            expected_date: cursor.date(row, "expected_date"),
            actual_date: cursor.date(row, "actual_date"),
            status: cursor.text(row, "status"),
            // A supplied delay is pass-through data, not an order quantity;
            // empty cells stay null instead of zeroing.
            delay_days: cursor.integer(row, "delay_days"),
        })
        .collect();
    CanonicalTable { rows, present }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{reconcile, source::RawTable};

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn parse_date_supports_multiple_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_date("2024-01-05").unwrap(), expected);
        assert_eq!(parse_date("05/01/2024").unwrap(), expected);
        assert_eq!(parse_date("Jan 5, 2024").unwrap(), expected);
        assert_eq!(parse_date("5 January 2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-05 09:30:00").unwrap(), expected);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("2024-13-40").is_err());
    }

    #[test]
    fn parse_decimal_accepts_plain_and_scientific() {
        assert_eq!(parse_decimal("1234.56").unwrap().to_string(), "1234.56");
        assert_eq!(parse_decimal(" 4.5 ").unwrap().to_string(), "4.5");
        assert_eq!(parse_decimal("1e3").unwrap().to_string(), "1000");
        assert!(parse_decimal("twelve").is_err());
    }

    #[test]
    fn parse_quantity_truncates_decimals() {
        assert_eq!(parse_quantity("7").unwrap(), 7);
        assert_eq!(parse_quantity("7.0").unwrap(), 7);
        assert_eq!(parse_quantity("7.9").unwrap(), 7);
        assert_eq!(parse_quantity("-2").unwrap(), -2);
        assert!(parse_quantity("many").is_err());
    }

    #[test]
    fn garbage_date_nulls_and_is_reported() {
        let mut report = QualityReport::default();
        let table = reconcile::reconcile(
            &schema::INVOICES,
            raw(
                &["invoice_id", "invoice_date"],
                &[&["I-1", "not-a-date"], &["I-2", "2024-01-05"]],
            ),
        );
        let invoices = invoices(&table, &mut report);
        assert_eq!(invoices.rows[0].invoice_date, None);
        assert_eq!(
            invoices.rows[1].invoice_date,
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues[0].row, 1);
        assert_eq!(report.issues[0].field, "invoice_date");
    }

    #[test]
    fn empty_quantity_defaults_to_zero_but_empty_price_stays_null() {
        let mut report = QualityReport::default();
        let table = reconcile::reconcile(
            &schema::PO_LINE_ITEMS,
            raw(
                &["po_id", "qty_ordered", "unit_price"],
                &[&["PO-1", "", ""]],
            ),
        );
        let items = line_items(&table, &mut report);
        assert_eq!(items.rows[0].qty_ordered, Some(0));
        assert_eq!(items.rows[0].unit_price, None);
        // Empty cells are not failures.
        assert!(report.is_clean());
    }

    #[test]
    fn unparsable_quantity_zeroes_and_is_reported() {
        let mut report = QualityReport::default();
        let table = reconcile::reconcile(
            &schema::PO_LINE_ITEMS,
            raw(&["po_id", "qty_received"], &[&["PO-1", "lots"]]),
        );
        let items = line_items(&table, &mut report);
        assert_eq!(items.rows[0].qty_received, Some(0));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn absent_quantity_column_stays_none() {
        let mut report = QualityReport::default();
        let table = reconcile::reconcile(
            &schema::PO_LINE_ITEMS,
            raw(&["po_id"], &[&["PO-1"]]),
        );
        let items = line_items(&table, &mut report);
        assert_eq!(items.rows[0].qty_ordered, None);
        assert!(!items.has_column("qty_ordered"));
    }

    #[test]
    fn supplied_empty_delay_stays_null() {
        let mut report = QualityReport::default();
        let table = reconcile::reconcile(
            &schema::DELIVERIES,
            raw(
                &["po_id", "expected_date", "actual_date", "delay_days"],
                &[
                    &["PO-1", "2024-01-01", "2024-01-03", ""],
                    &["PO-2", "2024-01-01", "2024-01-03", "2"],
                    &["PO-3", "2024-01-01", "2024-01-03", "soonish"],
                ],
            ),
        );
        let deliveries = deliveries(&table, &mut report);
        // An empty supplied delay is unknown, not an on-time delivery.
        assert_eq!(deliveries.rows[0].delay_days, None);
        assert_eq!(deliveries.rows[1].delay_days, Some(2));
        assert_eq!(deliveries.rows[2].delay_days, None);
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues[0].field, "delay_days");
    }

    #[test]
    fn present_columns_follow_canonical_order() {
        let mut report = QualityReport::default();
        let table = reconcile::reconcile(
            &schema::PURCHASE_ORDERS,
            raw(&["status", "po_id", "vendor"], &[&["open", "PO-1", "Acme"]]),
        );
        let orders = purchase_orders(&table, &mut report);
        assert_eq!(orders.present, ["po_id", "status"]);
        assert_eq!(orders.rows[0].vendor_name.as_deref(), Some("Acme"));
    }
}
