//! Document sources and the single-pass tabular emitter.

use std::io::Write;

use tracing::{info, warn};

use crate::render::render_cell;
use crate::report::ReportExportBuilder;
use crate::sink::SheetSink;
use crate::spec::{
    DocumentStreamError, EnumCellValue, ExportError, Result, SpecDocumentRecord, SpecFieldSet,
};

////////////////////////////////////////////////////////////////////////////////
// #region DocumentSources

/// Single-pass source of result documents.
pub trait DocumentStream {
    /// Next document in stream order, `None` once exhausted.
    fn next_document(
        &mut self,
    ) -> std::result::Result<Option<SpecDocumentRecord>, DocumentStreamError>;
}

/// Stream over an already materialized document list.
#[derive(Debug)]
pub struct ListDocumentStream {
    iter: std::vec::IntoIter<SpecDocumentRecord>,
}

impl ListDocumentStream {
    pub fn new(l_docs: Vec<SpecDocumentRecord>) -> Self {
        Self {
            iter: l_docs.into_iter(),
        }
    }
}

impl DocumentStream for ListDocumentStream {
    fn next_document(
        &mut self,
    ) -> std::result::Result<Option<SpecDocumentRecord>, DocumentStreamError> {
        Ok(self.iter.next())
    }
}

/// Stream over a fallible document iterator (e.g. a paged cursor).
pub struct IterDocumentStream<I> {
    iter: I,
}

impl<I> IterDocumentStream<I>
where
    I: Iterator<Item = std::result::Result<SpecDocumentRecord, DocumentStreamError>>,
{
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I> DocumentStream for IterDocumentStream<I>
where
    I: Iterator<Item = std::result::Result<SpecDocumentRecord, DocumentStreamError>>,
{
    fn next_document(
        &mut self,
    ) -> std::result::Result<Option<SpecDocumentRecord>, DocumentStreamError> {
        self.iter.next().transpose()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TabularStream

/// Emits one header row then one data row per document, in a single pass.
pub struct TabularStream<'a> {
    field_set: &'a SpecFieldSet,
}

impl<'a> TabularStream<'a> {
    pub fn new(field_set: &'a SpecFieldSet) -> Self {
        Self { field_set }
    }

    /// Drain `stream` into `sink`, then flush the workbook into `out`.
    ///
    /// A source failure disposes the sink without writing anything and
    /// surfaces as [`ExportError::Stream`].
    pub fn run(
        &self,
        stream: &mut dyn DocumentStream,
        sink: &mut dyn SheetSink,
        out: &mut dyn Write,
        report: &mut ReportExportBuilder,
    ) -> Result<()> {
        report.n_fields = self.field_set.len() as u64;
        if let Err(err) = self.write_rows(stream, sink, report) {
            sink.dispose();
            return Err(err);
        }

        info!(n_docs = report.n_docs, "Export complete; flushing");
        report.n_bytes = sink.flush(out)?;
        Ok(())
    }

    fn write_rows(
        &self,
        stream: &mut dyn DocumentStream,
        sink: &mut dyn SheetSink,
        report: &mut ReportExportBuilder,
    ) -> Result<()> {
        self.write_header(sink)?;
        // first data row is opened up front, then one more after each document
        sink.add_row()?;

        loop {
            let doc = match stream.next_document() {
                Ok(Some(doc)) => doc,
                Ok(None) => break,
                Err(err) => {
                    warn!(
                        n_docs_written = report.n_docs,
                        error = %err,
                        "Document stream failed; discarding export"
                    );
                    return Err(ExportError::Stream {
                        n_docs_written: report.n_docs,
                        message: err.to_string(),
                    });
                }
            };
            self.write_document(&doc, sink)?;
            sink.add_row()?;
            report.add_doc();
        }
        Ok(())
    }

    fn write_header(&self, sink: &mut dyn SheetSink) -> Result<()> {
        sink.add_row()?;
        for field in self.field_set.iter() {
            sink.write_cell(EnumCellValue::Text(field.display_name.clone()))?;
            sink.set_header_style_on_last_cell()?;
            sink.set_column_width(field.width_col)?;
        }
        sink.mark_row_as_header()
    }

    fn write_document(&self, doc: &SpecDocumentRecord, sink: &mut dyn SheetSink) -> Result<()> {
        for field in self.field_set.iter() {
            sink.write_cell(render_cell(field, doc.get(&field.name)))?;
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
