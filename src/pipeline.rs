//! Pipeline orchestration.
//!
//! `execute` runs the full cycle for one batch: resolve and read every raw
//! source, reconcile headers, coerce cells, assign vendor keys, derive delay
//! days, write snapshots, and load the store. All reads complete before the
//! first write, so a missing required source aborts the run without touching
//! the snapshot directory or the database.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    cli::{InspectArgs, RunArgs},
    coerce,
    config::EtlConfig,
    derive, io_utils, keys,
    model::{CanonicalTable, Dataset},
    reconcile,
    report::QualityReport,
    schema, snapshot, source, store, table,
};

pub fn execute(args: &RunArgs) -> Result<()> {
    let config = EtlConfig::from_run_args(args)?;
    let (dataset, report) = build_dataset(&config)?;

    if !report.is_clean() {
        for (name, count) in report.counts_by_table() {
            warn!("{count} cell(s) failed coercion in '{name}'");
        }
    }
    if let Some(path) = &args.quality_report {
        report.save(path)?;
        info!("Quality report -> {path:?}");
    }

    snapshot::write_all(&config.clean_dir, &dataset)?;
    if args.skip_load {
        info!("Skipping relational load");
    } else {
        store::load_all(&config.store, &dataset)?;
    }
    info!("ETL complete.");
    Ok(())
}

/// Reads and normalizes all five tables. Pure with respect to the snapshot
/// directory and the store; only the raw directory is touched.
pub fn build_dataset(config: &EtlConfig) -> Result<(Dataset, QualityReport)> {
    let raw_vendors = source::load_required(&config.raw_dir, &schema::VENDORS, config.encoding)?;
    let raw_orders =
        source::load_required(&config.raw_dir, &schema::PURCHASE_ORDERS, config.encoding)?;
    let raw_items =
        source::load_required(&config.raw_dir, &schema::PO_LINE_ITEMS, config.encoding)?;
    let raw_invoices = source::load_required(&config.raw_dir, &schema::INVOICES, config.encoding)?;
    let raw_deliveries =
        source::load_optional(&config.raw_dir, &schema::DELIVERIES, config.encoding)?;

    let mut report = QualityReport::default();
    let mut vendors = coerce::vendors(&reconcile::reconcile(&schema::VENDORS, raw_vendors), &mut report);
    let mut purchase_orders = coerce::purchase_orders(
        &reconcile::reconcile(&schema::PURCHASE_ORDERS, raw_orders),
        &mut report,
    );
    let line_items = coerce::line_items(
        &reconcile::reconcile(&schema::PO_LINE_ITEMS, raw_items),
        &mut report,
    );
    let invoices = coerce::invoices(
        &reconcile::reconcile(&schema::INVOICES, raw_invoices),
        &mut report,
    );
    let mut deliveries = match raw_deliveries {
        Some(raw) => {
            coerce::deliveries(&reconcile::reconcile(&schema::DELIVERIES, raw), &mut report)
        }
        None => CanonicalTable::empty(schema::DELIVERIES.columns),
    };

    let vendor_keys = keys::assign_vendor_ids(&mut vendors);
    keys::resolve_vendor_refs(&mut purchase_orders, &vendor_keys);
    derive::fill_delay_days(&mut deliveries);

    info!(
        "Normalized {} vendor(s), {} purchase order(s), {} line item(s), {} invoice(s), {} delivery(ies)",
        vendors.len(),
        purchase_orders.len(),
        line_items.len(),
        invoices.len(),
        deliveries.len()
    );
    Ok((
        Dataset {
            vendors,
            purchase_orders,
            line_items,
            invoices,
            deliveries,
        },
        report,
    ))
}

/// Shows, per table, which raw file resolved and which raw header each
/// canonical field would take. Never writes anything.
pub fn inspect(args: &InspectArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let headers = ["field".to_string(), "raw header".to_string()];
    for spec in schema::ALL_TABLES {
        match source::resolve(&args.raw_dir, spec.name)? {
            Some(path) => {
                let mut reader = io_utils::open_csv_reader(&path)?;
                let raw_headers = io_utils::reader_headers(&mut reader, encoding)
                    .with_context(|| format!("Reading headers of {path:?}"))?;
                let mapping = reconcile::map_columns(spec, &raw_headers);
                println!("{}: {}", spec.name, path.display());
                let rows: Vec<Vec<String>> = spec
                    .fields
                    .iter()
                    .map(|field| {
                        let matched = mapping
                            .get(field.name)
                            .map(|idx| raw_headers[*idx].clone())
                            .unwrap_or_else(|| "(unmatched)".to_string());
                        vec![field.name.to_string(), matched]
                    })
                    .collect();
                table::print_table(&headers, &rows);
            }
            None if spec.required => {
                println!("{}: no raw source found (required)", spec.name);
            }
            None => {
                println!("{}: no raw source found (optional)", spec.name);
            }
        }
        println!();
    }
    Ok(())
}
