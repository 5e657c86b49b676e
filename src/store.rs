//! Relational load: appends the five canonical tables inside one transaction.
//!
//! The store module owns its tokio runtime so the rest of the pipeline stays
//! synchronous. All inserts run in a single transaction scope; a failure on
//! any table rolls back every table's rows. Snapshots written earlier in the
//! run are not reverted, so a failed load leaves fresh snapshots next to an
//! unchanged store.

use anyhow::{Context, Result};
use log::info;
use sqlx::{Postgres, Transaction, postgres::PgPoolOptions};
use tokio::runtime::{Builder, Runtime};

use crate::{
    config::StoreConfig,
    model::{CanonicalTable, Dataset, Delivery, Invoice, LineItem, PurchaseOrder, Vendor},
};

/// The load runs on a single connection and inserts strictly in order, so a
/// current-thread runtime suffices.
fn build_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Starting store runtime")
}

pub fn load_all(store: &StoreConfig, data: &Dataset) -> Result<()> {
    let runtime = build_runtime()?;
    runtime.block_on(load_inner(store, data))
}

async fn load_inner(store: &StoreConfig, data: &Dataset) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&store.url())
        .await
        .with_context(|| {
            format!(
                "Connecting to postgres database '{}' on '{}'",
                store.database, store.host
            )
        })?;

    let mut tx = pool.begin().await.context("Opening load transaction")?;
    insert_vendors(&mut tx, &data.vendors).await?;
    insert_purchase_orders(&mut tx, &data.purchase_orders).await?;
    insert_line_items(&mut tx, &data.line_items).await?;
    insert_invoices(&mut tx, &data.invoices).await?;
    insert_deliveries(&mut tx, &data.deliveries).await?;
    tx.commit().await.context("Committing load transaction")?;

    info!(
        "Loaded {} vendor(s), {} purchase order(s), {} line item(s), {} invoice(s), {} delivery(ies)",
        data.vendors.len(),
        data.purchase_orders.len(),
        data.line_items.len(),
        data.invoices.len(),
        data.deliveries.len()
    );
    Ok(())
}

async fn insert_vendors(
    tx: &mut Transaction<'_, Postgres>,
    table: &CanonicalTable<Vendor>,
) -> Result<()> {
    for row in &table.rows {
        sqlx::query(
            "INSERT INTO vendors (vendor_id, vendor_ext_id, vendor_name, country, category, rating) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(row.vendor_id)
        .bind(row.vendor_ext_id.as_deref())
        .bind(row.vendor_name.as_deref())
        .bind(row.country.as_deref())
        .bind(row.category.as_deref())
        .bind(row.rating)
        .execute(&mut **tx)
        .await
        .context("Inserting into vendors")?;
    }
    Ok(())
}

async fn insert_purchase_orders(
    tx: &mut Transaction<'_, Postgres>,
    table: &CanonicalTable<PurchaseOrder>,
) -> Result<()> {
    for row in &table.rows {
        sqlx::query(
            "INSERT INTO purchase_orders (po_id, po_date, vendor_id, department, total_amount, currency, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(row.po_id.as_deref())
        .bind(row.po_date)
        .bind(row.vendor_id)
        .bind(row.department.as_deref())
        .bind(row.total_amount)
        .bind(row.currency.as_deref())
        .bind(row.status.as_deref())
        .execute(&mut **tx)
        .await
        .context("Inserting into purchase_orders")?;
    }
    Ok(())
}

async fn insert_line_items(
    tx: &mut Transaction<'_, Postgres>,
    table: &CanonicalTable<LineItem>,
) -> Result<()> {
    for row in &table.rows {
        sqlx::query(
            "INSERT INTO po_line_items (po_id, sku, description, qty_ordered, qty_received, unit_price) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(row.po_id.as_deref())
        .bind(row.sku.as_deref())
        .bind(row.description.as_deref())
        .bind(row.qty_ordered)
        .bind(row.qty_received)
        .bind(row.unit_price)
        .execute(&mut **tx)
        .await
        .context("Inserting into po_line_items")?;
    }
    Ok(())
}

async fn insert_invoices(
    tx: &mut Transaction<'_, Postgres>,
    table: &CanonicalTable<Invoice>,
) -> Result<()> {
    for row in &table.rows {
        sqlx::query(
            "INSERT INTO invoices (invoice_id, po_id, invoice_date, invoice_amount, paid_date, payment_terms) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(row.invoice_id.as_deref())
        .bind(row.po_id.as_deref())
        .bind(row.invoice_date)
        .bind(row.invoice_amount)
        .bind(row.paid_date)
        .bind(row.payment_terms.as_deref())
        .execute(&mut **tx)
        .await
        .context("Inserting into invoices")?;
    }
    Ok(())
}

async fn insert_deliveries(
    tx: &mut Transaction<'_, Postgres>,
    table: &CanonicalTable<Delivery>,
) -> Result<()> {
    for row in &table.rows {
        sqlx::query(
            "INSERT INTO deliveries (po_id, expected_date, actual_date, status, delay_days) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(row.po_id.as_deref())
        .bind(row.expected_date)
        .bind(row.actual_date)
        .bind(row.status.as_deref())
        .bind(row.delay_days)
        .execute(&mut **tx)
        .await
        .context("Inserting into deliveries")?;
    }
    Ok(())
}
