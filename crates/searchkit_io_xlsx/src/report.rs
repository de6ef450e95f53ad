//! Export report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one workbook export.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportExport {
    /// Number of exported columns.
    pub n_fields: u64,
    /// Number of documents written as data rows.
    pub n_docs: u64,
    /// Number of sheet rows holding content (header plus data rows).
    pub n_rows: u64,
    /// Bytes written to the output sink.
    pub n_bytes: u64,
    /// Non-fatal warnings collected during the export.
    pub warnings: Vec<String>,
}

impl ReportExport {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("n_fields".to_string(), self.n_fields);
        dict_counts.insert("n_docs".to_string(), self.n_docs);
        dict_counts.insert("n_rows".to_string(), self.n_rows);
        dict_counts.insert("n_bytes".to_string(), self.n_bytes);
        dict_counts.insert("n_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} fields={} docs={} rows={} bytes={} warnings={}",
            dict_counts["n_fields"],
            dict_counts["n_docs"],
            dict_counts["n_rows"],
            dict_counts["n_bytes"],
            dict_counts["n_warnings"]
        )
    }
}

impl fmt::Display for ReportExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[XLSX]"))
    }
}

/// Mutable accumulator for export statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportExportBuilder {
    /// See [`ReportExport::n_fields`].
    pub n_fields: u64,
    /// See [`ReportExport::n_docs`].
    pub n_docs: u64,
    /// See [`ReportExport::n_bytes`].
    pub n_bytes: u64,
    /// See [`ReportExport::warnings`].
    pub warnings: Vec<String>,
}

impl ReportExportBuilder {
    /// Increment written document count by one.
    pub fn add_doc(&mut self) {
        self.n_docs += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    ///
    /// The header row always counts, even with zero columns.
    pub fn build(self) -> ReportExport {
        ReportExport {
            n_fields: self.n_fields,
            n_docs: self.n_docs,
            n_rows: self.n_docs + 1,
            n_bytes: self.n_bytes,
            warnings: self.warnings,
        }
    }
}
