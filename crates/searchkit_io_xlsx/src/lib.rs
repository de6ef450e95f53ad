//! `searchkit_io_xlsx` v1:
//! Streaming XLSX export of search-result documents.
//!
//! Architecture:
//! - `conf`     : constants and default presets
//! - `spec`     : models, options and errors
//! - `util`     : pure helper functions
//! - `fields`   : return-field selection and schema lookup
//! - `resolver` : export field-set resolution
//! - `render`   : per-field cell rendering
//! - `sink`     : row/cell sink over the XLSX encoder
//! - `stream`   : document sources and the tabular emitter
//! - `report`   : export report
//! - `writer`   : response writer entry point
pub mod conf;
pub mod fields;
pub mod render;
pub mod report;
pub mod resolver;
pub mod sink;
pub mod spec;
pub mod stream;
pub mod util;
pub mod writer;

pub use conf::{C_CONTENT_TYPE_XLSX, C_FLATTEN_SEPARATOR, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
pub use fields::{IndexSchema, ReturnFields, SpecIndexSchema, SpecReturnFields};
pub use render::{render_cell, render_flattened};
pub use report::{ReportExport, ReportExportBuilder};
pub use resolver::FieldResolver;
pub use sink::{SheetSink, XlsxSheetSink};
pub use spec::{
    DocumentStreamError, EnumCellValue, EnumFieldDiscovery, EnumFieldValue, EnumPrimitiveKind,
    EnumSheetMemoryMode, ExportError, Result, SpecCellFormat, SpecDisplayName,
    SpecDisplayOverrides, SpecDocumentRecord, SpecExportField, SpecExportOptions, SpecFieldInfo,
    SpecFieldSet, SpecSheetMemoryPolicy, SpecStylePolicy,
};
pub use stream::{DocumentStream, IterDocumentStream, ListDocumentStream, TabularStream};
pub use writer::{EnumDocumentSource, SpecExportRequest, XlsxResponseWriter};
