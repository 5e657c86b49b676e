//! Surrogate vendor keys and the name-based purchase-order join.

use std::collections::HashMap;

use log::info;

use crate::{
    model::{CanonicalTable, PurchaseOrder, Vendor},
    schema,
};

/// Normalized vendor display name → assigned surrogate id. Built once per run
/// from the vendor table; duplicate normalized names keep the first id seen.
pub type VendorKeyMap = HashMap<String, i64>;

/// Trims and title-cases a vendor display name: each alphabetic character
/// that follows a non-alphabetic one is uppercased, every other alphabetic
/// character lowercased. Punctuation and digits pass through unchanged.
pub fn normalize_vendor_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut boundary = true;
    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }
    out
}

/// Writes normalized display names back onto the vendor table and assigns
/// surrogate ids 1..N in existing row order. Duplicate names are not deduped;
/// every row keeps its own id.
pub fn assign_vendor_ids(vendors: &mut CanonicalTable<Vendor>) -> VendorKeyMap {
    let mut keys = VendorKeyMap::new();
    for (idx, vendor) in vendors.rows.iter_mut().enumerate() {
        let id = (idx + 1) as i64;
        vendor.vendor_id = Some(id);
        if let Some(name) = vendor.vendor_name.take() {
            let normalized = normalize_vendor_name(&name);
            keys.entry(normalized.clone()).or_insert(id);
            vendor.vendor_name = Some(normalized);
        }
    }
    vendors.present = finalized_columns(&schema::VENDORS, &vendors.present, "vendor_id");
    info!(
        "Assigned surrogate ids to {} vendor(s) ({} distinct normalized name(s))",
        vendors.len(),
        keys.len()
    );
    keys
}

/// Left join of purchase orders against the vendor key map, keyed on the
/// order's vendor name exactly as it appears in the source. Key-map entries
/// are normalized display names, so an order whose spelling differs from the
/// normalized form stays unmatched with a null vendor_id; no row is ever
/// dropped. The vendor_name field is removed afterwards.
pub fn resolve_vendor_refs(orders: &mut CanonicalTable<PurchaseOrder>, keys: &VendorKeyMap) {
    let mut matched = 0usize;
    for order in &mut orders.rows {
        order.vendor_id = order
            .vendor_name
            .as_deref()
            .and_then(|name| keys.get(name).copied());
        if order.vendor_id.is_some() {
            matched += 1;
        }
        order.vendor_name = None;
    }
    orders.present = finalized_columns(&schema::PURCHASE_ORDERS, &orders.present, "vendor_id");
    info!(
        "Resolved vendor ids for {matched}/{} purchase order(s)",
        orders.len()
    );
}

/// Rebuilds a present-column list in canonical order with `added` included.
fn finalized_columns(
    spec: &schema::TableSpec,
    present: &[&'static str],
    added: &'static str,
) -> Vec<&'static str> {
    spec.columns
        .iter()
        .copied()
        .filter(|column| *column == added || present.contains(column))
        .collect()
}
