//! Shared export specification models, options and errors.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use thiserror::Error;

use crate::conf::{
    C_SHEET_NAME_DEFAULT, N_HEIGHT_ROW_HEADER, N_ROWS_WINDOW_DEFAULT, N_WIDTH_COL_DEFAULT,
    derive_default_header_format,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification, translated to an encoder format at sink creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color (solid pattern).
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ValueModel

/// Primitive kind a schema assigns to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumPrimitiveKind {
    /// String-like field.
    #[default]
    Text,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Boolean.
    Bool,
    /// Point in time.
    Date,
}

/// Raw field value as supplied by the document source.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumFieldValue {
    /// Missing value.
    Null,
    /// Text value.
    Text(String),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Numeric text supplied verbatim by the source.
    Decimal(String),
    /// Boolean.
    Bool(bool),
    /// Point in time.
    Date(DateTime<Utc>),
    /// Ordered collection of values.
    List(Vec<EnumFieldValue>),
    /// Value of no known kind, carried as its string form.
    Opaque(String),
}

impl EnumFieldValue {
    /// Number of values carried: 0 for null/empty list, list length, else 1.
    pub fn count_values(&self) -> usize {
        match self {
            EnumFieldValue::Null => 0,
            EnumFieldValue::List(values) => values.len(),
            _ => 1,
        }
    }
}

impl From<&str> for EnumFieldValue {
    fn from(s: &str) -> Self {
        EnumFieldValue::Text(s.to_string())
    }
}

impl From<String> for EnumFieldValue {
    fn from(s: String) -> Self {
        EnumFieldValue::Text(s)
    }
}

impl From<i32> for EnumFieldValue {
    fn from(n: i32) -> Self {
        EnumFieldValue::Int(n)
    }
}

impl From<i64> for EnumFieldValue {
    fn from(n: i64) -> Self {
        EnumFieldValue::Long(n)
    }
}

impl From<f64> for EnumFieldValue {
    fn from(n: f64) -> Self {
        EnumFieldValue::Double(n)
    }
}

impl From<bool> for EnumFieldValue {
    fn from(b: bool) -> Self {
        EnumFieldValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for EnumFieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        EnumFieldValue::Date(dt)
    }
}

impl<T: Into<EnumFieldValue>> From<Vec<T>> for EnumFieldValue {
    fn from(values: Vec<T>) -> Self {
        EnumFieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for EnumFieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => EnumFieldValue::Null,
            serde_json::Value::Bool(b) => EnumFieldValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(val) = n.as_i64() {
                    EnumFieldValue::Long(val)
                } else if n.is_u64() {
                    EnumFieldValue::Decimal(n.to_string())
                } else {
                    match n.as_f64() {
                        Some(val) => EnumFieldValue::Double(val),
                        None => EnumFieldValue::Decimal(n.to_string()),
                    }
                }
            }
            serde_json::Value::String(s) => EnumFieldValue::Text(s),
            serde_json::Value::Array(values) => {
                EnumFieldValue::List(values.into_iter().map(EnumFieldValue::from).collect())
            }
            value @ serde_json::Value::Object(_) => EnumFieldValue::Opaque(value.to_string()),
        }
    }
}

/// One result document: insertion-ordered field name -> value mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecDocumentRecord {
    dict_values: IndexMap<String, EnumFieldValue>,
}

impl SpecDocumentRecord {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<EnumFieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field value, keeping the first insertion position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<EnumFieldValue>) {
        self.dict_values.insert(name.into(), value.into());
    }

    /// Value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&EnumFieldValue> {
        self.dict_values.get(name)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.dict_values.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.dict_values.len()
    }

    /// Whether the document carries no field.
    pub fn is_empty(&self) -> bool {
        self.dict_values.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for SpecDocumentRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut doc = SpecDocumentRecord::new();
        for (name, value) in map {
            doc.insert(name, EnumFieldValue::from(value));
        }
        doc
    }
}

/// Rendered spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumCellValue {
    /// Blank cell.
    Empty,
    /// Text cell.
    Text(String),
    /// Numeric cell, carrying the source's textual representation.
    Number(String),
    /// Boolean cell.
    Boolean(bool),
    /// Calendar date rendered as `YYYY-MM-DD`.
    Date(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FieldModel

/// Schema facts for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecFieldInfo {
    /// Original value is retained by the index.
    pub stored: bool,
    /// Field may hold several values per document.
    pub multi_valued: bool,
    /// Primitive kind of the field's values.
    pub kind: EnumPrimitiveKind,
}

impl SpecFieldInfo {
    /// Stored, single-valued field of `kind`.
    pub fn new(kind: EnumPrimitiveKind) -> Self {
        Self {
            stored: true,
            multi_valued: false,
            kind,
        }
    }

    /// Mark the field multi-valued.
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Mark the field not stored.
    pub fn unstored(mut self) -> Self {
        self.stored = false;
        self
    }
}

/// One export column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportField {
    /// Field name (column identity).
    pub name: String,
    /// Schema facts; `None` for untyped fields.
    pub info: Option<SpecFieldInfo>,
    /// Header label.
    pub display_name: String,
    /// Column width in characters.
    pub width_col: usize,
}

impl SpecExportField {
    /// Create an untyped field labelled with its own name.
    pub fn untyped(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            info: None,
            width_col: N_WIDTH_COL_DEFAULT,
        }
    }

    /// Whether the schema marks this field multi-valued.
    pub fn is_multi_valued(&self) -> bool {
        self.info.is_some_and(|info| info.multi_valued)
    }
}

/// Ordered, duplicate-free set of export columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecFieldSet {
    dict_fields: IndexMap<String, SpecExportField>,
}

impl SpecFieldSet {
    /// Append a field; an already present name keeps its first position.
    pub(crate) fn insert(&mut self, field: SpecExportField) -> bool {
        if self.dict_fields.contains_key(&field.name) {
            return false;
        }
        self.dict_fields.insert(field.name.clone(), field);
        true
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.dict_fields.len()
    }

    /// Whether there are no columns.
    pub fn is_empty(&self) -> bool {
        self.dict_fields.is_empty()
    }

    /// Columns in export order.
    pub fn iter(&self) -> impl Iterator<Item = &SpecExportField> {
        self.dict_fields.values()
    }

    /// Column names in export order.
    pub fn names(&self) -> Vec<&str> {
        self.dict_fields.keys().map(String::as_str).collect()
    }

    /// Column for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&SpecExportField> {
        self.dict_fields.get(name)
    }
}

impl FromIterator<SpecExportField> for SpecFieldSet {
    fn from_iter<I: IntoIterator<Item = SpecExportField>>(iter: I) -> Self {
        let mut field_set = SpecFieldSet::default();
        for field in iter {
            field_set.insert(field);
        }
        field_set
    }
}

/// Header label and width override for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDisplayName {
    /// Header label.
    pub display_name: String,
    /// Column width in characters.
    pub width_col: usize,
}

/// Field name -> display override table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecDisplayOverrides {
    dict_overrides: IndexMap<String, SpecDisplayName>,
}

impl SpecDisplayOverrides {
    /// Builder-style insert.
    pub fn with_override(
        mut self,
        name: impl Into<String>,
        display_name: impl Into<String>,
        width_col: usize,
    ) -> Self {
        self.dict_overrides.insert(
            name.into(),
            SpecDisplayName {
                display_name: display_name.into(),
                width_col,
            },
        );
        self
    }

    /// Override for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&SpecDisplayName> {
        self.dict_overrides.get(name)
    }
}

/// How the field set is discovered when no explicit field list applies.
#[derive(Debug, Clone, Copy)]
pub enum EnumFieldDiscovery<'a> {
    /// Union of field names present in sampled documents.
    ///
    /// Only these documents inform the header; fields first seen later in
    /// the result set are not exported.
    Sample(&'a [SpecDocumentRecord]),
    /// Every field name known to the schema.
    Schema,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportOptions

/// Encoder memory mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumSheetMemoryMode {
    /// Whole worksheet kept in memory until flush.
    Standard,
    /// Row data kept in memory, strings written inline.
    LowMemory,
    /// Committed rows spilled to a temp file (default).
    #[default]
    ConstantMemory,
}

/// Encoder buffering/spill policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetMemoryPolicy {
    /// Encoder memory mode.
    pub rule_memory: EnumSheetMemoryMode,
    /// Rows kept pending (restylable) before commit to the encoder.
    pub size_rows_window: usize,
    /// Temp directory for spilled rows; system default when `None`.
    pub path_dir_temp: Option<PathBuf>,
}

impl Default for SpecSheetMemoryPolicy {
    fn default() -> Self {
        Self {
            rule_memory: EnumSheetMemoryMode::ConstantMemory,
            size_rows_window: N_ROWS_WINDOW_DEFAULT,
            path_dir_temp: None,
        }
    }
}

/// Presentation policy for header and body cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecStylePolicy {
    /// Header cell format.
    pub fmt_header: SpecCellFormat,
    /// Optional body cell format; body cells are unformatted when `None`.
    pub fmt_body: Option<SpecCellFormat>,
    /// Header row height in points.
    pub height_row_header: f64,
    /// Column width when no override exists.
    pub width_col_default: usize,
}

impl Default for SpecStylePolicy {
    fn default() -> Self {
        Self {
            fmt_header: derive_default_header_format(),
            fmt_body: None,
            height_row_header: N_HEIGHT_ROW_HEADER,
            width_col_default: N_WIDTH_COL_DEFAULT,
        }
    }
}

/// Export-wide options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExportOptions {
    /// Sheet name, sanitized before use.
    pub sheet_name: String,
    /// Encoder buffering policy.
    pub policy_memory: SpecSheetMemoryPolicy,
    /// Style policy.
    pub policy_style: SpecStylePolicy,
    /// Header label/width overrides.
    pub overrides: SpecDisplayOverrides,
    /// Max documents of a materialized list sampled for field discovery.
    pub n_docs_sample_max: Option<usize>,
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            policy_memory: SpecSheetMemoryPolicy::default(),
            policy_style: SpecStylePolicy::default(),
            overrides: SpecDisplayOverrides::default(),
            n_docs_sample_max: None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Result alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error type of a document source.
pub type DocumentStreamError = Box<dyn std::error::Error + Send + Sync>;

/// Export-level failures. Field-level problems never surface here.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The spreadsheet encoder rejected an operation or failed to serialize.
    #[error("xlsx write error: {0}")]
    Encoding(String),

    /// Writing the byte sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document source failed mid-iteration.
    #[error("Document stream failed after {n_docs_written} documents: {message}")]
    Stream {
        /// Documents already pushed to the sink (discarded).
        n_docs_written: u64,
        /// Source error text.
        message: String,
    },

    /// Invalid glob in a field list or dynamic field.
    #[error("Invalid field pattern: {0}")]
    InvalidPattern(String),

    /// Option validation failed.
    #[error("Invalid export options: {0}")]
    InvalidOptions(String),

    /// The sink was already flushed or disposed.
    #[error("Cannot write after flush().")]
    SinkClosed,

    /// Row/column index beyond encoder limits.
    #[error("{axis} index overflow: {value}")]
    IndexOverflow {
        /// `"row"` or `"column"`.
        axis: &'static str,
        /// Offending index.
        value: usize,
    },
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Encoding(err.to_string())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
