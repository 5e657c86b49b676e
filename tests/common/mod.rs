#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        write_file(&path, contents);
        path
    }

    /// Creates a subdirectory under the workspace and returns its path.
    pub fn mkdir(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::create_dir_all(&path).expect("create temp subdir");
        path
    }
}

/// Populates `raw/` with the four required extracts. Headers use raw-side
/// spellings that only the alias lists can reconcile, and the data carries a
/// few deliberate warts: a coercion failure, an empty quantity, and one
/// purchase order whose vendor spelling will not survive the key join.
pub fn seed_required_sources(ws: &TestWorkspace) -> PathBuf {
    let raw = ws.mkdir("raw");
    write_file(
        &raw.join("vendors.csv"),
        "SUPPLIER_NAME,Country,vendor_id,rating\n\
         acme CORP,US,V-100,4.5\n\
         globex ltd,DE,V-200,3.9\n",
    );
    write_file(
        &raw.join("purchase_orders.csv"),
        "PO Number,order_date,Supplier_Name,dept,amount,ccy,po_status,notes\n\
         PO-1,2024-03-01,Acme Corp,Ops,1200.50,USD,open,rush\n\
         PO-2,02/03/2024,globex ltd,IT,300,EUR,closed,\n",
    );
    write_file(
        &raw.join("po_line_items.csv"),
        "order_id,SKU,item_description,qty,received_qty,price\n\
         PO-1,SKU-1,Widgets,10,8,12.50\n\
         PO-1,SKU-2,Gadgets,,abc,1.99\n",
    );
    write_file(
        &raw.join("invoices.csv"),
        "inv_id,po_id,date,amount,payment_date,payment_terms\n\
         INV-1,PO-1,2024-03-10,125.00,2024-03-20,NET30\n",
    );
    raw
}

/// Adds a deliveries extract without a delay column, so delay days must be
/// derived from the two date columns.
pub fn seed_deliveries(raw: &Path) {
    write_file(
        raw.join("deliveries.csv").as_path(),
        "po_id,promise_date,delivery_date,delivery_status\n\
         PO-1,2024-03-05,2024-03-09,late\n\
         PO-1,2024-03-06,,pending\n",
    );
}

pub fn write_file(path: &Path, contents: &str) {
    let mut file = File::create(path).expect("create raw file");
    file.write_all(contents.as_bytes())
        .expect("write raw file contents");
}
