//! Cell-level coercion outcomes.
//!
//! A parse failure never aborts the run: the failing cell falls back to its
//! field rule's default (null, or zero for quantities) and the failure is
//! recorded here so the operator can still see it. The report can be logged
//! as a per-table summary or written out as JSON.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ParseIssue {
    pub table: &'static str,
    pub field: &'static str,
    /// 1-based data row number within the raw source.
    pub row: usize,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct QualityReport {
    pub issues: Vec<ParseIssue>,
}

impl QualityReport {
    pub fn record(
        &mut self,
        table: &'static str,
        field: &'static str,
        row: usize,
        value: &str,
        reason: String,
    ) {
        self.issues.push(ParseIssue {
            table,
            field,
            row,
            value: value.to_string(),
            reason,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue counts per table, ordered by table name.
    pub fn counts_by_table(&self) -> Vec<(&'static str, usize)> {
        self.issues
            .iter()
            .counts_by(|issue| issue.table)
            .into_iter()
            .sorted()
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating quality report {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing quality report JSON")
    }
}
