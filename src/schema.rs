//! Canonical schema for the five procurement tables.
//!
//! Each [`TableSpec`] declares the canonical fields eligible for header
//! reconciliation (with their ordered raw-header alias lists) and the fixed
//! column order used by snapshots and the relational targets. Alias lists are
//! ordered by preference and stored lowercase; matching is exact string
//! equality after case folding, never approximate.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Date,
    Decimal,
    /// Nullable integer, used for resolved key references.
    Integer,
    /// Integer count; empty or unparsable cells default to zero, not null.
    Quantity,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub datatype: FieldType,
    pub aliases: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Logical name, also the snapshot file stem and relational table name.
    pub name: &'static str,
    /// Fields eligible for reconciliation, in alias-map order.
    pub fields: &'static [FieldSpec],
    /// Snapshot and store column order. May omit reconciled-only fields
    /// (purchase_orders.vendor_name) and include assigned ones (vendor_id).
    pub columns: &'static [&'static str],
    /// A missing raw source aborts the run when set; otherwise an empty
    /// canonical table is substituted.
    pub required: bool,
}

impl TableSpec {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub const VENDORS: TableSpec = TableSpec {
    name: "vendors",
    required: true,
    fields: &[
        FieldSpec {
            name: "vendor_ext_id",
            datatype: FieldType::Text,
            aliases: &["vendor_id", "id", "supplier_id"],
        },
        FieldSpec {
            name: "vendor_name",
            datatype: FieldType::Text,
            aliases: &["vendor_name", "name", "supplier_name"],
        },
        FieldSpec {
            name: "country",
            datatype: FieldType::Text,
            aliases: &["country", "country_name"],
        },
        FieldSpec {
            name: "category",
            datatype: FieldType::Text,
            aliases: &["category", "segment", "commodity"],
        },
        FieldSpec {
            name: "rating",
            datatype: FieldType::Decimal,
            aliases: &["rating", "score", "supplier_rating"],
        },
    ],
    columns: &[
        "vendor_id",
        "vendor_ext_id",
        "vendor_name",
        "country",
        "category",
        "rating",
    ],
};

pub const PURCHASE_ORDERS: TableSpec = TableSpec {
    name: "purchase_orders",
    required: true,
    fields: &[
        FieldSpec {
            name: "po_id",
            datatype: FieldType::Text,
            aliases: &["po_id", "po number", "purchase_order_id", "order_id"],
        },
        FieldSpec {
            name: "po_date",
            datatype: FieldType::Date,
            aliases: &["po_date", "order_date", "date"],
        },
        FieldSpec {
            name: "vendor_id",
            datatype: FieldType::Integer,
            aliases: &["vendor_id", "supplier_id"],
        },
        FieldSpec {
            name: "vendor_name",
            datatype: FieldType::Text,
            aliases: &["vendor_name", "supplier_name", "vendor"],
        },
        FieldSpec {
            name: "department",
            datatype: FieldType::Text,
            aliases: &["department", "cost_center", "dept"],
        },
        FieldSpec {
            name: "total_amount",
            datatype: FieldType::Decimal,
            aliases: &["total_amount", "amount", "po_value", "total"],
        },
        FieldSpec {
            name: "currency",
            datatype: FieldType::Text,
            aliases: &["currency", "ccy"],
        },
        FieldSpec {
            name: "status",
            datatype: FieldType::Text,
            aliases: &["status", "po_status"],
        },
    ],
    columns: &[
        "po_id",
        "po_date",
        "vendor_id",
        "department",
        "total_amount",
        "currency",
        "status",
    ],
};

pub const PO_LINE_ITEMS: TableSpec = TableSpec {
    name: "po_line_items",
    required: true,
    fields: &[
        FieldSpec {
            name: "po_id",
            datatype: FieldType::Text,
            aliases: &["po_id", "purchase_order_id", "order_id"],
        },
        FieldSpec {
            name: "sku",
            datatype: FieldType::Text,
            aliases: &["sku", "item_id", "product_id", "material_code"],
        },
        FieldSpec {
            name: "description",
            datatype: FieldType::Text,
            aliases: &["description", "item_description", "product_name"],
        },
        FieldSpec {
            name: "qty_ordered",
            datatype: FieldType::Quantity,
            aliases: &["qty_ordered", "quantity", "qty"],
        },
        FieldSpec {
            name: "qty_received",
            datatype: FieldType::Quantity,
            aliases: &["qty_received", "received_qty", "qty_rcvd"],
        },
        FieldSpec {
            name: "unit_price",
            datatype: FieldType::Decimal,
            aliases: &["unit_price", "price", "unit_cost"],
        },
    ],
    columns: &[
        "po_id",
        "sku",
        "description",
        "qty_ordered",
        "qty_received",
        "unit_price",
    ],
};

pub const INVOICES: TableSpec = TableSpec {
    name: "invoices",
    required: true,
    fields: &[
        FieldSpec {
            name: "invoice_id",
            datatype: FieldType::Text,
            aliases: &["invoice_id", "inv_id", "invoice number"],
        },
        FieldSpec {
            name: "po_id",
            datatype: FieldType::Text,
            aliases: &["po_id", "purchase_order_id", "order_id"],
        },
        FieldSpec {
            name: "invoice_date",
            datatype: FieldType::Date,
            aliases: &["invoice_date", "date"],
        },
        FieldSpec {
            name: "invoice_amount",
            datatype: FieldType::Decimal,
            aliases: &["invoice_amount", "amount", "value"],
        },
        FieldSpec {
            name: "paid_date",
            datatype: FieldType::Date,
            aliases: &["paid_date", "payment_date"],
        },
        FieldSpec {
            name: "payment_terms",
            datatype: FieldType::Text,
            aliases: &["payment_terms", "terms_days"],
        },
    ],
    columns: &[
        "invoice_id",
        "po_id",
        "invoice_date",
        "invoice_amount",
        "paid_date",
        "payment_terms",
    ],
};

pub const DELIVERIES: TableSpec = TableSpec {
    name: "deliveries",
    required: false,
    fields: &[
        FieldSpec {
            name: "po_id",
            datatype: FieldType::Text,
            aliases: &["po_id", "purchase_order_id", "order_id"],
        },
        FieldSpec {
            name: "expected_date",
            datatype: FieldType::Date,
            aliases: &["expected_date", "promise_date", "eta"],
        },
        FieldSpec {
            name: "actual_date",
            datatype: FieldType::Date,
            aliases: &["actual_date", "delivery_date", "delivered_at"],
        },
        FieldSpec {
            name: "status",
            datatype: FieldType::Text,
            aliases: &["status", "delivery_status"],
        },
        FieldSpec {
            name: "delay_days",
            datatype: FieldType::Integer,
            aliases: &["delay_days", "delay", "days_delayed"],
        },
    ],
    columns: &[
        "po_id",
        "expected_date",
        "actual_date",
        "status",
        "delay_days",
    ],
};

pub const ALL_TABLES: [&TableSpec; 5] = [
    &VENDORS,
    &PURCHASE_ORDERS,
    &PO_LINE_ITEMS,
    &INVOICES,
    &DELIVERIES,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_lowercase() {
        for table in ALL_TABLES {
            for field in table.fields {
                for alias in field.aliases {
                    assert_eq!(
                        *alias,
                        alias.to_ascii_lowercase(),
                        "alias '{alias}' on {}.{} must be lowercase",
                        table.name,
                        field.name
                    );
                }
            }
        }
    }

    #[test]
    fn columns_are_unique_per_table() {
        for table in ALL_TABLES {
            let mut seen = std::collections::HashSet::new();
            for column in table.columns {
                assert!(seen.insert(column), "duplicate column {column} in {}", table.name);
            }
        }
    }

    #[test]
    fn only_required_tables_may_abort_on_missing_source() {
        let optional: Vec<_> = ALL_TABLES
            .iter()
            .filter(|t| !t.required)
            .map(|t| t.name)
            .collect();
        assert_eq!(optional, ["deliveries"]);
    }

    #[test]
    fn zero_defaulting_quantities_are_only_order_counts() {
        let quantity_fields: Vec<_> = ALL_TABLES
            .iter()
            .flat_map(|t| t.fields.iter())
            .filter(|f| f.datatype == FieldType::Quantity)
            .map(|f| f.name)
            .collect();
        assert_eq!(quantity_fields, ["qty_ordered", "qty_received"]);
    }

    #[test]
    fn field_lookup_finds_declared_fields() {
        assert!(VENDORS.field("rating").is_some());
        assert!(VENDORS.field("delay_days").is_none());
        assert_eq!(
            PO_LINE_ITEMS.field("qty_ordered").unwrap().datatype,
            FieldType::Quantity
        );
    }
}
