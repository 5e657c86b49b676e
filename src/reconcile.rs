//! Column reconciliation: maps raw extract headers onto canonical fields.
//!
//! For each canonical field the alias list is scanned in order; the first
//! alias equal to a not-yet-consumed raw header, compared case-insensitively
//! as a full string, wins. Canonical fields with no surviving alias are
//! omitted from the result, and raw columns that match nothing are dropped.

use std::collections::HashMap;

use log::debug;

use crate::{schema::TableSpec, source::RawTable};

/// A raw table viewed through the canonical schema: each matched canonical
/// field points at the raw column it was reconciled from.
#[derive(Debug)]
pub struct ReconciledTable {
    columns: HashMap<&'static str, usize>,
    rows: Vec<Vec<String>>,
}

impl ReconciledTable {
    pub fn has_column(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    /// Returns the cell for `field` on the 0-based data row, or `None` when
    /// the field is unmatched, the row is short, or the cell is empty.
    pub fn cell(&self, row: usize, field: &str) -> Option<&str> {
        let idx = *self.columns.get(field)?;
        let value = self.rows.get(row)?.get(idx)?;
        if value.is_empty() { None } else { Some(value) }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Matches canonical fields to raw header indexes. Each raw header feeds at
/// most one canonical field.
pub fn map_columns(spec: &TableSpec, headers: &[String]) -> HashMap<&'static str, usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_ascii_lowercase()).collect();
    let mut consumed = vec![false; headers.len()];
    let mut columns = HashMap::new();
    for field in spec.fields {
        let matched = field.aliases.iter().find_map(|alias| {
            lowered
                .iter()
                .enumerate()
                .find(|(idx, header)| !consumed[*idx] && header.as_str() == *alias)
                .map(|(idx, _)| idx)
        });
        match matched {
            Some(idx) => {
                consumed[idx] = true;
                columns.insert(field.name, idx);
            }
            None => debug!(
                "Table '{}': no raw header matched canonical field '{}'",
                spec.name, field.name
            ),
        }
    }
    columns
}

pub fn reconcile(spec: &TableSpec, raw: RawTable) -> ReconciledTable {
    let columns = map_columns(spec, &raw.headers);
    debug!(
        "Table '{}': reconciled {}/{} canonical field(s) from {} raw column(s)",
        spec.name,
        columns.len(),
        spec.fields.len(),
        raw.headers.len()
    );
    ReconciledTable {
        columns,
        rows: raw.rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

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
    fn alias_matching_is_case_insensitive() {
        let table = reconcile(
            &schema::VENDORS,
            raw(&["SUPPLIER_NAME", "Country"], &[&["Acme", "US"]]),
        );
        assert_eq!(table.cell(0, "vendor_name"), Some("Acme"));
        assert_eq!(table.cell(0, "country"), Some("US"));
    }

    #[test]
    fn earliest_listed_alias_wins() {
        // Both "total_amount" and "amount" are aliases; the earlier one wins
        // and the later-alias column is dropped.
        let table = reconcile(
            &schema::PURCHASE_ORDERS,
            raw(&["amount", "total_amount"], &[&["1.00", "2.00"]]),
        );
        assert_eq!(table.cell(0, "total_amount"), Some("2.00"));
    }

    #[test]
    fn consumed_headers_feed_at_most_one_field() {
        // "vendor_id" aliases vendors.vendor_ext_id first; a single raw
        // vendor_id column must not also satisfy a later field.
        let table = reconcile(&schema::VENDORS, raw(&["vendor_id"], &[&["V-9"]]));
        assert_eq!(table.cell(0, "vendor_ext_id"), Some("V-9"));
        assert!(!table.has_column("vendor_name"));
    }

    #[test]
    fn unmatched_canonical_fields_are_omitted() {
        let table = reconcile(&schema::VENDORS, raw(&["name"], &[&["Acme"]]));
        assert!(table.has_column("vendor_name"));
        assert!(!table.has_column("rating"));
        assert!(!table.has_column("country"));
    }

    #[test]
    fn unmatched_raw_columns_are_dropped() {
        let table = reconcile(
            &schema::VENDORS,
            raw(&["name", "internal_notes"], &[&["Acme", "ignore me"]]),
        );
        assert!(!table.has_column("internal_notes"));
    }

    #[test]
    fn empty_cells_read_as_none() {
        let table = reconcile(&schema::VENDORS, raw(&["name"], &[&[""]]));
        assert_eq!(table.cell(0, "vendor_name"), None);
    }

    #[test]
    fn short_rows_read_as_none() {
        let mut raw_table = raw(&["name", "country"], &[&["Acme"]]);
        raw_table.rows[0].truncate(1);
        let table = reconcile(&schema::VENDORS, raw_table);
        assert_eq!(table.cell(0, "country"), None);
    }
}
