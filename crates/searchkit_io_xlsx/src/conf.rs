//! XLSX export constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecExportOptions};

/// MIME type of an Office Open XML spreadsheet.
pub const C_CONTENT_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel cell text maximum length in characters.
pub const N_LEN_EXCEL_STRING_MAX: usize = 32_767;
/// Excel maximum row height in points.
pub const N_HEIGHT_ROW_MAX: f64 = 409.0;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Sheet name used when the caller does not supply one.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";

/// Separator placed between flattened multi-valued elements.
pub const C_FLATTEN_SEPARATOR: &str = "; ";
/// Name of the computed relevance field.
pub const C_FIELD_SCORE: &str = "score";

/// Column width (in characters) when no display override exists.
pub const N_WIDTH_COL_DEFAULT: usize = 14;
/// Header row height in points.
pub const N_HEIGHT_ROW_HEADER: f64 = 21.0;
/// Header font size in points.
pub const N_FONT_SIZE_HEADER: i64 = 14;
/// Rows kept pending in the sheet window before commit to the encoder.
pub const N_ROWS_WINDOW_DEFAULT: usize = 100;
/// Significant digits an `f64` holds without loss.
pub const N_DIGITS_F64_EXACT: usize = 15;

/// Build the default header format: bold white text on a solid black fill.
pub fn derive_default_header_format() -> SpecCellFormat {
    SpecCellFormat {
        font_size: Some(N_FONT_SIZE_HEADER),
        bold: Some(true),
        bg_color: Some("#000000".to_string()),
        font_color: Some("#FFFFFF".to_string()),
        ..Default::default()
    }
}

/// Build default export options.
pub fn derive_default_export_options() -> SpecExportOptions {
    SpecExportOptions::default()
}
