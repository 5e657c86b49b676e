//! Canonical snapshots: one flat CSV per table, overwritten on every run.
//!
//! Column order is fixed to the canonical schema regardless of which fields
//! the raw source supplied; absent values render as empty cells. Each table
//! writes independently, so a later failure leaves earlier snapshots in
//! place.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;

use crate::{
    io_utils,
    model::{Dataset, date_cell, decimal_cell, int_cell, text_cell},
    schema,
};

pub fn write_all(clean_dir: &Path, data: &Dataset) -> Result<()> {
    fs::create_dir_all(clean_dir)
        .with_context(|| format!("Creating snapshot directory {clean_dir:?}"))?;

    write_table(clean_dir, schema::VENDORS.name, schema::VENDORS.columns, &data.vendors.rows, |v| {
        vec![
            int_cell(&v.vendor_id),
            text_cell(&v.vendor_ext_id),
            text_cell(&v.vendor_name),
            text_cell(&v.country),
            text_cell(&v.category),
            decimal_cell(&v.rating),
        ]
    })?;
    write_table(
        clean_dir,
        schema::PURCHASE_ORDERS.name,
        schema::PURCHASE_ORDERS.columns,
        &data.purchase_orders.rows,
        |o| {
            vec![
                text_cell(&o.po_id),
                date_cell(&o.po_date),
                int_cell(&o.vendor_id),
                text_cell(&o.department),
                decimal_cell(&o.total_amount),
                text_cell(&o.currency),
                text_cell(&o.status),
            ]
        },
    )?;
    write_table(
        clean_dir,
        schema::PO_LINE_ITEMS.name,
        schema::PO_LINE_ITEMS.columns,
        &data.line_items.rows,
        |i| {
            vec![
                text_cell(&i.po_id),
                text_cell(&i.sku),
                text_cell(&i.description),
                int_cell(&i.qty_ordered),
                int_cell(&i.qty_received),
                decimal_cell(&i.unit_price),
            ]
        },
    )?;
    write_table(clean_dir, schema::INVOICES.name, schema::INVOICES.columns, &data.invoices.rows, |i| {
        vec![
            text_cell(&i.invoice_id),
            text_cell(&i.po_id),
            date_cell(&i.invoice_date),
            decimal_cell(&i.invoice_amount),
            date_cell(&i.paid_date),
            text_cell(&i.payment_terms),
        ]
    })?;
    write_table(
        clean_dir,
        schema::DELIVERIES.name,
        schema::DELIVERIES.columns,
        &data.deliveries.rows,
        |d| {
            vec![
                text_cell(&d.po_id),
                date_cell(&d.expected_date),
                date_cell(&d.actual_date),
                text_cell(&d.status),
                int_cell(&d.delay_days),
            ]
        },
    )?;
    Ok(())
}

fn write_table<R>(
    dir: &Path,
    name: &str,
    columns: &[&str],
    rows: &[R],
    to_cells: impl Fn(&R) -> Vec<String>,
) -> Result<()> {
    let path = dir.join(format!("{name}.csv"));
    let mut writer = io_utils::open_csv_writer(&path)?;
    writer
        .write_record(columns)
        .with_context(|| format!("Writing snapshot headers for {name}"))?;
    for row in rows {
        writer
            .write_record(to_cells(row))
            .with_context(|| format!("Writing snapshot row for {name}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("Flushing snapshot {path:?}"))?;
    info!("Snapshot {} row(s) -> {path:?}", rows.len());
    Ok(())
}
