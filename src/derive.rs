//! Derived delivery fields.

use log::debug;

use crate::{
    model::{CanonicalTable, Delivery},
    schema,
};

/// Fills `delay_days` as the signed whole-day difference between the actual
/// and expected delivery dates. A source-supplied delay column passes through
/// untouched; when either date column is missing no column is added. Rows
/// missing one of the two dates yield a null delay.
pub fn fill_delay_days(deliveries: &mut CanonicalTable<Delivery>) {
    if deliveries.has_column("delay_days") {
        debug!("Deliveries source supplied delay_days; leaving values as-is");
        return;
    }
    if !(deliveries.has_column("expected_date") && deliveries.has_column("actual_date")) {
        debug!("Deliveries source lacks the date columns needed to derive delay_days");
        return;
    }
    for row in &mut deliveries.rows {
        row.delay_days = match (row.expected_date, row.actual_date) {
            (Some(expected), Some(actual)) => {
                Some(actual.signed_duration_since(expected).num_days())
            }
            _ => None,
        };
    }
    deliveries.present = schema::DELIVERIES
        .columns
        .iter()
        .copied()
        .filter(|column| *column == "delay_days" || deliveries.present.contains(column))
        .collect();
}
