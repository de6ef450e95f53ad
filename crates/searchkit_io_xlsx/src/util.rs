//! Stateless helper utilities used by the export kernel.

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatPattern};

use crate::conf::{
    C_FLATTEN_SEPARATOR, N_DIGITS_F64_EXACT, N_HEIGHT_ROW_MAX, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_LEN_EXCEL_STRING_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{
    EnumFieldValue, ExportError, Result, SpecCellFormat, SpecSheetMemoryPolicy, SpecStylePolicy,
};

////////////////////////////////////////////////////////////////////////////////
// #region ValueText

/// Natural string form of a raw value.
///
/// Nested collections are joined with the flatten separator; null elements
/// are skipped and a bare null yields an empty string.
pub fn derive_field_value_text(value: &EnumFieldValue) -> String {
    match value {
        EnumFieldValue::Null => String::new(),
        EnumFieldValue::Text(s) | EnumFieldValue::Decimal(s) | EnumFieldValue::Opaque(s) => {
            s.clone()
        }
        EnumFieldValue::Int(n) => n.to_string(),
        EnumFieldValue::Long(n) => n.to_string(),
        EnumFieldValue::Float(n) => n.to_string(),
        EnumFieldValue::Double(n) => n.to_string(),
        EnumFieldValue::Bool(b) => b.to_string(),
        EnumFieldValue::Date(dt) => derive_date_text(dt),
        EnumFieldValue::List(values) => join_flattened(values),
    }
}

/// Join non-null values with `"; "`, no trailing separator.
pub fn join_flattened(values: &[EnumFieldValue]) -> String {
    values
        .iter()
        .filter(|value| !matches!(value, EnumFieldValue::Null))
        .map(derive_field_value_text)
        .collect::<Vec<_>>()
        .join(C_FLATTEN_SEPARATOR)
}

/// Calendar date (`YYYY-MM-DD`) of an instant, in UTC.
pub fn derive_date_text(dt: &DateTime<Utc>) -> String {
    dt.date_naive().format("%Y-%m-%d").to_string()
}

/// Parse numeric text when an `f64` holds it without precision loss.
pub fn parse_exact_number(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    if count_significant_digits(text) > N_DIGITS_F64_EXACT {
        return None;
    }
    Some(value)
}

fn count_significant_digits(text: &str) -> usize {
    let c_mantissa = text
        .trim()
        .trim_start_matches(['+', '-'])
        .split(['e', 'E'])
        .next()
        .unwrap_or_default();
    let c_digits: String = c_mantissa.chars().filter(char::is_ascii_digit).collect();
    // zeros on either end only place the decimal point
    c_digits.trim_start_matches('0').trim_end_matches('0').len()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Truncate text to the Excel cell limit, on a char boundary.
pub fn truncate_cell_text(text: &str) -> &str {
    match text.char_indices().nth(N_LEN_EXCEL_STRING_MAX) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cast a row cursor to the encoder's row type.
pub fn cast_row_num(value: usize) -> Result<u32> {
    if value >= N_NROWS_EXCEL_MAX {
        return Err(ExportError::IndexOverflow { axis: "row", value });
    }
    u32::try_from(value).map_err(|_| ExportError::IndexOverflow { axis: "row", value })
}

/// Cast a column cursor to the encoder's column type.
pub fn cast_col_num(value: usize) -> Result<u16> {
    if value >= N_NCOLS_EXCEL_MAX {
        return Err(ExportError::IndexOverflow {
            axis: "column",
            value,
        });
    }
    u16::try_from(value).map_err(|_| ExportError::IndexOverflow {
        axis: "column",
        value,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PolicyValidation

/// Validate encoder buffering policy.
pub fn validate_policy_memory(policy_memory: &SpecSheetMemoryPolicy) -> Result<()> {
    if policy_memory.size_rows_window == 0 {
        return Err(ExportError::InvalidOptions(
            "policy_memory.size_rows_window must be >= 1.".to_string(),
        ));
    }
    if let Some(path_dir_temp) = &policy_memory.path_dir_temp
        && !path_dir_temp.is_dir()
    {
        return Err(ExportError::InvalidOptions(format!(
            "policy_memory.path_dir_temp is not a directory: {}",
            path_dir_temp.display()
        )));
    }
    Ok(())
}

/// Validate style policy.
pub fn validate_policy_style(policy_style: &SpecStylePolicy) -> Result<()> {
    if policy_style.width_col_default == 0 {
        return Err(ExportError::InvalidOptions(
            "policy_style.width_col_default must be >= 1.".to_string(),
        ));
    }
    let height_row_header = policy_style.height_row_header;
    if !(height_row_header > 0.0 && height_row_header <= N_HEIGHT_ROW_MAX) {
        return Err(ExportError::InvalidOptions(
            "policy_style.height_row_header must be in (0, 409].".to_string(),
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatTranslation

/// Translate a format spec into an encoder format.
pub fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "justify" => Some(FormatAlign::Justify),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
