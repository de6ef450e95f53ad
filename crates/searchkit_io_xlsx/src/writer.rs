//! XLSX response writer that turns one search response into a workbook.

use std::io::Write;

use tracing::{info, warn};

use crate::conf::{C_CONTENT_TYPE_XLSX, derive_default_export_options};
use crate::fields::{IndexSchema, ReturnFields};
use crate::report::{ReportExport, ReportExportBuilder};
use crate::resolver::FieldResolver;
use crate::sink::XlsxSheetSink;
use crate::spec::{EnumFieldDiscovery, Result, SpecDocumentRecord, SpecExportOptions, SpecFieldSet};
use crate::stream::{DocumentStream, ListDocumentStream, TabularStream};

/// Where the response documents come from.
pub enum EnumDocumentSource {
    /// Fully materialized result page; its documents drive field discovery.
    Materialized(Vec<SpecDocumentRecord>),
    /// Lazy single-pass stream; discovery falls back to the schema.
    Streaming(Box<dyn DocumentStream>),
}

/// One export request.
pub struct SpecExportRequest<'a> {
    /// Requested return fields.
    pub return_fields: &'a dyn ReturnFields,
    /// Schema of the searched index.
    pub schema: &'a dyn IndexSchema,
    /// Result documents.
    pub source: EnumDocumentSource,
}

impl<'a> SpecExportRequest<'a> {
    /// Request over a materialized document list.
    pub fn materialized(
        return_fields: &'a dyn ReturnFields,
        schema: &'a dyn IndexSchema,
        l_docs: Vec<SpecDocumentRecord>,
    ) -> Self {
        Self {
            return_fields,
            schema,
            source: EnumDocumentSource::Materialized(l_docs),
        }
    }

    /// Request over a lazy document stream.
    pub fn streaming(
        return_fields: &'a dyn ReturnFields,
        schema: &'a dyn IndexSchema,
        stream: Box<dyn DocumentStream>,
    ) -> Self {
        Self {
            return_fields,
            schema,
            source: EnumDocumentSource::Streaming(stream),
        }
    }
}

/// Stateless writer; one instance serves any number of independent exports.
#[derive(Debug, Clone)]
pub struct XlsxResponseWriter {
    options: SpecExportOptions,
}

impl Default for XlsxResponseWriter {
    fn default() -> Self {
        Self::new(derive_default_export_options())
    }
}

impl XlsxResponseWriter {
    pub fn new(options: SpecExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SpecExportOptions {
        &self.options
    }

    /// MIME type of the produced bytes.
    pub fn content_type(&self) -> &'static str {
        C_CONTENT_TYPE_XLSX
    }

    /// Export `request` as a one-sheet workbook into `out`.
    ///
    /// Nothing valid is written to `out` on error; encoder resources are
    /// released on every path.
    pub fn write(
        &self,
        out: &mut dyn Write,
        request: SpecExportRequest<'_>,
    ) -> Result<ReportExport> {
        info!(sheet_name = %self.options.sheet_name, "Beginning export");
        let mut report = ReportExportBuilder::default();

        let (field_set, mut stream) = self.resolve_source(request, &mut report);
        if field_set.is_empty() {
            report.add_warning(
                "No exportable field resolved; data rows carry no cells.".to_string(),
            );
        }

        let result = XlsxSheetSink::new(&self.options).and_then(|mut sink| {
            TabularStream::new(&field_set).run(stream.as_mut(), &mut sink, out, &mut report)
        });
        if let Err(err) = result {
            warn!(error = %err, n_docs_written = report.n_docs, "XLSX export failed");
            return Err(err);
        }

        let report = report.build();
        info!(%report, "Export finished");
        Ok(report)
    }

    fn resolve_source(
        &self,
        request: SpecExportRequest<'_>,
        report: &mut ReportExportBuilder,
    ) -> (SpecFieldSet, Box<dyn DocumentStream>) {
        let resolver = FieldResolver::new(
            request.return_fields,
            request.schema,
            &self.options.overrides,
            self.options.policy_style.width_col_default,
        );

        match request.source {
            EnumDocumentSource::Materialized(l_docs) => {
                let n_sample = self
                    .options
                    .n_docs_sample_max
                    .map_or(l_docs.len(), |n| n.min(l_docs.len()));
                if n_sample < l_docs.len() && !resolver.is_explicit() {
                    report.add_warning(format!(
                        "Field discovery sampled {n_sample} of {} documents.",
                        l_docs.len()
                    ));
                }
                let field_set = resolver.resolve(EnumFieldDiscovery::Sample(&l_docs[..n_sample]));
                (field_set, Box::new(ListDocumentStream::new(l_docs)))
            }
            EnumDocumentSource::Streaming(stream) => {
                (resolver.resolve(EnumFieldDiscovery::Schema), stream)
            }
        }
    }
}
