//! Row/cell sink over the XLSX encoder.
//!
//! [`XlsxSheetSink`] keeps the most recent rows pending so the current row
//! can still be restyled; older rows are committed to the single worksheet
//! in row order. In constant-memory mode the encoder spills committed rows
//! to a temp file, so memory stays bounded by the window whatever the
//! document count.
//!
//! The worksheet is opened on the first committed row that follows a row
//! with content. Until then header rows are held back; an export that never
//! gets there is encoded as a standard sheet, since streaming modes repeat
//! a trailing custom-height row.

use std::collections::VecDeque;
use std::io::{self, Seek, Write};
use std::path::PathBuf;

use indexmap::IndexMap;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info};

use crate::spec::{EnumCellValue, EnumSheetMemoryMode, ExportError, Result, SpecExportOptions};
use crate::util::{
    cast_col_num, cast_row_num, derive_rust_xlsx_format, parse_exact_number, sanitize_sheet_name,
    truncate_cell_text, validate_policy_memory, validate_policy_style,
};

////////////////////////////////////////////////////////////////////////////////
// #region Contract

/// Append-only spreadsheet sink used by the tabular stream.
pub trait SheetSink {
    /// Open the next row; the column cursor resets to zero.
    fn add_row(&mut self) -> Result<()>;
    /// Append a cell at the next column of the current row.
    fn write_cell(&mut self, value: EnumCellValue) -> Result<()>;
    /// Apply the header style to the last written cell.
    fn set_header_style_on_last_cell(&mut self) -> Result<()>;
    /// Set the width (in characters) of the last written cell's column.
    fn set_column_width(&mut self, width_col: usize) -> Result<()>;
    /// Mark the current row as a header row (header height).
    fn mark_row_as_header(&mut self) -> Result<()>;
    /// Encode the workbook into `out` and release all resources.
    ///
    /// Terminal: resources are released whether or not the write succeeds.
    /// Returns the number of bytes written.
    fn flush(&mut self, out: &mut dyn Write) -> Result<u64>;
    /// Release all resources without writing. Idempotent.
    fn dispose(&mut self);
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PendingRows

#[derive(Debug, Clone)]
struct SpecPendingCell {
    value: EnumCellValue,
    if_header: bool,
}

#[derive(Debug, Clone)]
struct SpecPendingRow {
    idx_row: usize,
    l_cells: Vec<SpecPendingCell>,
    if_header: bool,
}

impl SpecPendingRow {
    fn new(idx_row: usize) -> Self {
        Self {
            idx_row,
            l_cells: Vec::new(),
            if_header: false,
        }
    }

    /// Whether committing the row emits anything into the sheet.
    fn has_content(&self, if_fmt_body: bool) -> bool {
        self.if_header
            || self.l_cells.iter().any(|cell| {
                cell.if_header || if_fmt_body || !matches!(cell.value, EnumCellValue::Empty)
            })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region XlsxSheetSink

/// Single-sheet sink backed by a `rust_xlsxwriter` workbook.
///
/// Dropping the sink releases the workbook (and its temp files) even when
/// [`SheetSink::flush`] was never called.
pub struct XlsxSheetSink {
    workbook: Option<Workbook>,
    sheet_name: String,
    rule_memory: EnumSheetMemoryMode,
    path_dir_temp: Option<PathBuf>,
    fmt_header: Format,
    fmt_body: Option<Format>,
    height_row_header: f64,
    size_rows_window: usize,
    dict_widths_col: IndexMap<u16, f64>,
    if_sheet_open: bool,
    l_rows_held: Vec<SpecPendingRow>,
    l_rows_pending: VecDeque<SpecPendingRow>,
    n_rows_opened: usize,
    n_rows_committed: usize,
}

impl XlsxSheetSink {
    /// Create a sink whose workbook will hold exactly one worksheet.
    pub fn new(options: &SpecExportOptions) -> Result<Self> {
        validate_policy_memory(&options.policy_memory)?;
        validate_policy_style(&options.policy_style)?;

        let mut workbook = Workbook::new();
        if let Some(path_dir_temp) = &options.policy_memory.path_dir_temp {
            workbook.set_tempdir(path_dir_temp)?;
        }
        let sheet_name = sanitize_sheet_name(&options.sheet_name, "_");

        debug!(
            sheet_name = %sheet_name,
            rule_memory = ?options.policy_memory.rule_memory,
            size_rows_window = options.policy_memory.size_rows_window,
            "Opened xlsx sheet sink"
        );

        Ok(Self {
            workbook: Some(workbook),
            sheet_name,
            rule_memory: options.policy_memory.rule_memory,
            path_dir_temp: options.policy_memory.path_dir_temp.clone(),
            fmt_header: derive_rust_xlsx_format(&options.policy_style.fmt_header),
            fmt_body: options
                .policy_style
                .fmt_body
                .as_ref()
                .map(derive_rust_xlsx_format),
            height_row_header: options.policy_style.height_row_header,
            size_rows_window: options.policy_memory.size_rows_window,
            dict_widths_col: IndexMap::new(),
            if_sheet_open: false,
            l_rows_held: Vec::new(),
            l_rows_pending: VecDeque::new(),
            n_rows_opened: 0,
            n_rows_committed: 0,
        })
    }

    /// Whether the sink was flushed or disposed.
    pub fn is_closed(&self) -> bool {
        self.workbook.is_none()
    }

    /// Rows opened so far, including the current one.
    pub fn n_rows_opened(&self) -> usize {
        self.n_rows_opened
    }

    fn worksheet(&mut self) -> Result<&mut Worksheet> {
        let workbook = self.workbook.as_mut().ok_or(ExportError::SinkClosed)?;
        Ok(workbook.worksheet_from_index(0)?)
    }

    fn current_row(&mut self) -> Result<&mut SpecPendingRow> {
        if self.is_closed() {
            return Err(ExportError::SinkClosed);
        }
        if self.l_rows_pending.is_empty() {
            self.add_row()?;
        }
        self.l_rows_pending
            .back_mut()
            .ok_or(ExportError::SinkClosed)
    }

    fn open_worksheet(&mut self, rule_memory: EnumSheetMemoryMode) -> Result<()> {
        let workbook = self.workbook.as_mut().ok_or(ExportError::SinkClosed)?;
        let worksheet = match rule_memory {
            EnumSheetMemoryMode::Standard => workbook.add_worksheet(),
            EnumSheetMemoryMode::LowMemory => workbook.add_worksheet_with_low_memory(),
            EnumSheetMemoryMode::ConstantMemory => workbook.add_worksheet_with_constant_memory(),
        };
        worksheet.set_name(&self.sheet_name)?;
        for (n_col, width_col) in &self.dict_widths_col {
            worksheet.set_column_width(*n_col, *width_col)?;
        }
        self.if_sheet_open = true;
        debug!(rule_memory = ?rule_memory, "Opened worksheet");

        for row in std::mem::take(&mut self.l_rows_held) {
            self.write_pending_row(&row)?;
        }
        Ok(())
    }

    fn write_pending_row(&mut self, row: &SpecPendingRow) -> Result<()> {
        let workbook = self.workbook.as_mut().ok_or(ExportError::SinkClosed)?;
        let worksheet = workbook.worksheet_from_index(0)?;
        write_row(
            worksheet,
            row,
            &self.fmt_header,
            self.fmt_body.as_ref(),
            self.height_row_header,
        )
    }

    fn commit_front_row(&mut self) -> Result<()> {
        let Some(row) = self.l_rows_pending.pop_front() else {
            return Ok(());
        };
        if self.if_sheet_open {
            self.write_pending_row(&row)?;
        } else if row.if_header {
            self.l_rows_held.push(row);
        } else if row.has_content(self.fmt_body.is_some()) {
            self.open_worksheet(self.rule_memory)?;
            self.write_pending_row(&row)?;
        }

        self.n_rows_committed += 1;
        if self.n_rows_committed % self.size_rows_window == 0 {
            debug!(
                n_rows_committed = self.n_rows_committed,
                "Committed row window to worksheet"
            );
        }
        Ok(())
    }

    fn encode_into(&mut self, out: &mut dyn Write) -> Result<u64> {
        if self.is_closed() {
            return Err(ExportError::SinkClosed);
        }
        while !self.l_rows_pending.is_empty() {
            self.commit_front_row()?;
        }
        // only held header rows are left, so a standard sheet stays small
        if !self.if_sheet_open {
            self.open_worksheet(EnumSheetMemoryMode::Standard)?;
        }

        let mut file_encoded = match &self.path_dir_temp {
            Some(path_dir_temp) => tempfile::tempfile_in(path_dir_temp)?,
            None => tempfile::tempfile()?,
        };
        let workbook = self.workbook.as_mut().ok_or(ExportError::SinkClosed)?;
        workbook.save_to_writer(&mut file_encoded)?;
        file_encoded.rewind()?;
        let n_bytes = io::copy(&mut file_encoded, out)?;
        out.flush()?;
        Ok(n_bytes)
    }
}

impl SheetSink for XlsxSheetSink {
    fn add_row(&mut self) -> Result<()> {
        if self.is_closed() {
            return Err(ExportError::SinkClosed);
        }
        self.l_rows_pending
            .push_back(SpecPendingRow::new(self.n_rows_opened));
        self.n_rows_opened += 1;

        while self.l_rows_pending.len() > self.size_rows_window {
            self.commit_front_row()?;
        }
        Ok(())
    }

    fn write_cell(&mut self, value: EnumCellValue) -> Result<()> {
        let row = self.current_row()?;
        cast_row_num(row.idx_row)?;
        cast_col_num(row.l_cells.len())?;
        row.l_cells.push(SpecPendingCell {
            value,
            if_header: false,
        });
        Ok(())
    }

    fn set_header_style_on_last_cell(&mut self) -> Result<()> {
        if let Some(cell) = self.current_row()?.l_cells.last_mut() {
            cell.if_header = true;
        }
        Ok(())
    }

    fn set_column_width(&mut self, width_col: usize) -> Result<()> {
        let n_cells = self.current_row()?.l_cells.len();
        let Some(idx_col) = n_cells.checked_sub(1) else {
            return Ok(());
        };
        let n_col = cast_col_num(idx_col)?;
        self.dict_widths_col.insert(n_col, width_col as f64);
        if self.if_sheet_open {
            self.worksheet()?.set_column_width(n_col, width_col as f64)?;
        }
        Ok(())
    }

    fn mark_row_as_header(&mut self) -> Result<()> {
        let row = self.current_row()?;
        cast_row_num(row.idx_row)?;
        row.if_header = true;
        Ok(())
    }

    fn flush(&mut self, out: &mut dyn Write) -> Result<u64> {
        let n_rows = self.n_rows_opened;
        let result = self.encode_into(out);
        self.dispose();
        if let Ok(n_bytes) = &result {
            info!(n_rows, n_bytes = *n_bytes, "Flushed xlsx workbook");
        }
        result
    }

    fn dispose(&mut self) {
        if self.workbook.take().is_some() {
            debug!(
                n_rows_pending = self.l_rows_pending.len(),
                n_rows_committed = self.n_rows_committed,
                "Disposed xlsx sheet sink"
            );
        }
        self.l_rows_held.clear();
        self.l_rows_pending.clear();
    }
}

fn write_row(
    worksheet: &mut Worksheet,
    row: &SpecPendingRow,
    fmt_header: &Format,
    fmt_body: Option<&Format>,
    height_row_header: f64,
) -> Result<()> {
    // rows past the sheet limit are only legal while they stay empty
    if row.l_cells.is_empty() && !row.if_header {
        return Ok(());
    }
    let n_row = cast_row_num(row.idx_row)?;
    if row.if_header {
        worksheet.set_row_height(n_row, height_row_header)?;
    }
    for (idx_col, cell) in row.l_cells.iter().enumerate() {
        let format = if cell.if_header {
            Some(fmt_header)
        } else {
            fmt_body
        };
        write_cell_with_format(worksheet, n_row, cast_col_num(idx_col)?, &cell.value, format)?;
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: &EnumCellValue,
    format: Option<&Format>,
) -> Result<()> {
    match value {
        EnumCellValue::Empty => {
            if let Some(format) = format {
                worksheet.write_blank(n_row, n_col, format)?;
            }
        }
        EnumCellValue::Text(text) | EnumCellValue::Date(text) => {
            write_text_with_format(worksheet, n_row, n_col, text, format)?;
        }
        // numeric text an f64 cannot hold exactly stays text
        EnumCellValue::Number(text) => match (parse_exact_number(text), format) {
            (Some(val), Some(format)) => {
                worksheet.write_number_with_format(n_row, n_col, val, format)?;
            }
            (Some(val), None) => {
                worksheet.write_number(n_row, n_col, val)?;
            }
            (None, _) => write_text_with_format(worksheet, n_row, n_col, text, format)?,
        },
        EnumCellValue::Boolean(val) => match format {
            Some(format) => {
                worksheet.write_boolean_with_format(n_row, n_col, *val, format)?;
            }
            None => {
                worksheet.write_boolean(n_row, n_col, *val)?;
            }
        },
    }
    Ok(())
}

fn write_text_with_format(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    text: &str,
    format: Option<&Format>,
) -> Result<()> {
    let text = truncate_cell_text(text);
    match format {
        Some(format) => {
            worksheet.write_string_with_format(n_row, n_col, text, format)?;
        }
        None => {
            worksheet.write_string(n_row, n_col, text)?;
        }
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
pub(crate) mod tests {
    use std::io::{self, Cursor, Read};

    use super::*;
    use crate::conf::N_NROWS_EXCEL_MAX;
    use crate::spec::{SpecSheetMemoryPolicy, SpecStylePolicy};

    /// Text of one part of an encoded workbook, empty when the part is absent.
    pub(crate) fn read_zip_part(v_bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(v_bytes)).expect("valid zip");
        let mut c_text = String::new();
        if let Ok(mut file) = archive.by_name(name) {
            file.read_to_string(&mut c_text).expect("utf-8 part");
        }
        c_text
    }

    pub(crate) fn count_rows(c_sheet_xml: &str) -> usize {
        c_sheet_xml.matches("<row ").count()
    }

    pub(crate) struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn write_sample(sink: &mut XlsxSheetSink) {
        sink.add_row().unwrap();
        for name in ["id", "price", "in_stock"] {
            sink.write_cell(EnumCellValue::Text(name.to_string())).unwrap();
            sink.set_header_style_on_last_cell().unwrap();
            sink.set_column_width(20).unwrap();
        }
        sink.mark_row_as_header().unwrap();
        sink.add_row().unwrap();

        sink.write_cell(EnumCellValue::Text("doc-1".to_string())).unwrap();
        sink.write_cell(EnumCellValue::Number("42".to_string())).unwrap();
        sink.write_cell(EnumCellValue::Boolean(true)).unwrap();
        sink.add_row().unwrap();

        sink.write_cell(EnumCellValue::Text("doc-2".to_string())).unwrap();
        sink.write_cell(EnumCellValue::Number("12345678901234567890".to_string()))
            .unwrap();
        sink.write_cell(EnumCellValue::Empty).unwrap();
        sink.add_row().unwrap();
    }

    #[test]
    fn flush_produces_single_sheet_workbook() {
        for rule_memory in [
            EnumSheetMemoryMode::Standard,
            EnumSheetMemoryMode::LowMemory,
            EnumSheetMemoryMode::ConstantMemory,
        ] {
            let options = SpecExportOptions {
                sheet_name: "Results".to_string(),
                policy_memory: SpecSheetMemoryPolicy {
                    rule_memory,
                    size_rows_window: 1,
                    path_dir_temp: None,
                },
                ..Default::default()
            };
            let mut sink = XlsxSheetSink::new(&options).expect("sink");
            write_sample(&mut sink);

            let mut v_out: Vec<u8> = Vec::new();
            let n_bytes = sink.flush(&mut v_out).expect("flush");
            assert_eq!(n_bytes, v_out.len() as u64);
            assert!(sink.is_closed());

            let c_sheet = read_zip_part(&v_out, "xl/worksheets/sheet1.xml");
            let c_strings = read_zip_part(&v_out, "xl/sharedStrings.xml");
            let c_workbook = read_zip_part(&v_out, "xl/workbook.xml");
            let c_text = format!("{c_sheet}{c_strings}");

            assert!(read_zip_part(&v_out, "xl/worksheets/sheet2.xml").is_empty());
            assert!(c_workbook.contains("name=\"Results\""));
            assert_eq!(count_rows(&c_sheet), 3);
            assert!(c_sheet.contains("ht=\"21\""));
            assert!(c_sheet.contains("<v>42</v>"));
            assert!(c_sheet.contains("t=\"b\""));
            assert!(c_text.contains("price"));
            assert!(c_text.contains("12345678901234567890"));
        }
    }

    fn write_header_row(sink: &mut XlsxSheetSink, l_names: &[&str]) {
        sink.add_row().unwrap();
        for name in l_names {
            sink.write_cell(EnumCellValue::Text(name.to_string())).unwrap();
            sink.set_header_style_on_last_cell().unwrap();
            sink.set_column_width(18).unwrap();
        }
        sink.mark_row_as_header().unwrap();
        sink.add_row().unwrap();
    }

    fn make_options(
        rule_memory: EnumSheetMemoryMode,
        size_rows_window: usize,
    ) -> SpecExportOptions {
        SpecExportOptions {
            policy_memory: SpecSheetMemoryPolicy {
                rule_memory,
                size_rows_window,
                path_dir_temp: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn header_only_export_has_one_row() {
        for rule_memory in [
            EnumSheetMemoryMode::Standard,
            EnumSheetMemoryMode::LowMemory,
            EnumSheetMemoryMode::ConstantMemory,
        ] {
            for size_rows_window in [1, 100] {
                let options = make_options(rule_memory, size_rows_window);
                let mut sink = XlsxSheetSink::new(&options).expect("sink");
                write_header_row(&mut sink, &["id"]);

                let mut v_out: Vec<u8> = Vec::new();
                sink.flush(&mut v_out).expect("flush");

                let c_sheet = read_zip_part(&v_out, "xl/worksheets/sheet1.xml");
                assert_eq!(count_rows(&c_sheet), 1, "{rule_memory:?}");
                assert_eq!(c_sheet.matches("<row r=\"1\"").count(), 1);
                assert!(c_sheet.contains("ht=\"21\""));
                assert!(read_zip_part(&v_out, "xl/workbook.xml").contains("name=\"Sheet1\""));
            }
        }
    }

    #[test]
    fn all_empty_data_rows_keep_a_single_header_row() {
        for rule_memory in [
            EnumSheetMemoryMode::LowMemory,
            EnumSheetMemoryMode::ConstantMemory,
        ] {
            let mut sink = XlsxSheetSink::new(&make_options(rule_memory, 1)).expect("sink");
            write_header_row(&mut sink, &["id"]);
            for _ in 0..2 {
                sink.write_cell(EnumCellValue::Empty).unwrap();
                sink.add_row().unwrap();
            }
            assert_eq!(sink.n_rows_opened(), 4);

            let mut v_out: Vec<u8> = Vec::new();
            sink.flush(&mut v_out).expect("flush");

            let c_sheet = read_zip_part(&v_out, "xl/worksheets/sheet1.xml");
            assert_eq!(count_rows(&c_sheet), 1, "{rule_memory:?}");
            assert_eq!(c_sheet.matches("<row r=\"1\"").count(), 1);
        }
    }

    #[test]
    fn held_header_row_precedes_first_data_row() {
        let mut sink =
            XlsxSheetSink::new(&make_options(EnumSheetMemoryMode::ConstantMemory, 1))
                .expect("sink");
        write_header_row(&mut sink, &["id", "title"]);
        sink.write_cell(EnumCellValue::Empty).unwrap();
        sink.write_cell(EnumCellValue::Empty).unwrap();
        sink.add_row().unwrap();
        sink.write_cell(EnumCellValue::Number("7".to_string())).unwrap();
        sink.add_row().unwrap();

        let mut v_out: Vec<u8> = Vec::new();
        sink.flush(&mut v_out).expect("flush");

        let c_sheet = read_zip_part(&v_out, "xl/worksheets/sheet1.xml");
        assert_eq!(count_rows(&c_sheet), 2);
        assert_eq!(c_sheet.matches("<row r=\"1\"").count(), 1);
        assert!(c_sheet.contains("<row r=\"3\""));
        assert!(c_sheet.contains("<v>7</v>"));
        assert!(c_sheet.contains("width=\"18"));
    }

    #[test]
    fn last_sheet_row_is_writable_and_next_stays_empty() {
        let mut sink = XlsxSheetSink::new(&SpecExportOptions::default()).expect("sink");
        sink.n_rows_opened = N_NROWS_EXCEL_MAX - 1;

        sink.add_row().unwrap();
        sink.write_cell(EnumCellValue::Number("7".to_string())).unwrap();
        sink.add_row().unwrap();
        assert!(matches!(
            sink.write_cell(EnumCellValue::Empty),
            Err(ExportError::IndexOverflow { axis: "row", value }) if value == N_NROWS_EXCEL_MAX
        ));
        assert!(matches!(
            sink.mark_row_as_header(),
            Err(ExportError::IndexOverflow { axis: "row", .. })
        ));

        let mut v_out: Vec<u8> = Vec::new();
        sink.flush(&mut v_out).expect("flush");
        let c_sheet = read_zip_part(&v_out, "xl/worksheets/sheet1.xml");
        assert_eq!(count_rows(&c_sheet), 1);
        assert!(c_sheet.contains("<row r=\"1048576\""));
    }

    #[test]
    fn failed_flush_releases_resources_and_reports_once() {
        let mut sink = XlsxSheetSink::new(&SpecExportOptions::default()).expect("sink");
        write_sample(&mut sink);

        let err = sink.flush(&mut FailingWriter).expect_err("flush must fail");
        assert!(matches!(err, ExportError::Io(_)));
        assert!(sink.is_closed());

        assert!(matches!(
            sink.write_cell(EnumCellValue::Empty),
            Err(ExportError::SinkClosed)
        ));
        assert!(matches!(
            sink.flush(&mut Vec::<u8>::new()),
            Err(ExportError::SinkClosed)
        ));
    }

    #[test]
    fn dispose_is_idempotent_and_closes_sink() {
        let mut sink = XlsxSheetSink::new(&SpecExportOptions::default()).expect("sink");
        write_sample(&mut sink);
        sink.dispose();
        sink.dispose();

        assert!(sink.is_closed());
        assert!(matches!(sink.add_row(), Err(ExportError::SinkClosed)));
    }

    #[test]
    fn spill_directory_is_honoured() {
        let dir_temp = tempfile::tempdir().expect("tempdir");
        let options = SpecExportOptions {
            policy_memory: SpecSheetMemoryPolicy {
                path_dir_temp: Some(dir_temp.path().to_path_buf()),
                size_rows_window: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut sink = XlsxSheetSink::new(&options).expect("sink");
        for idx in 0..10 {
            sink.write_cell(EnumCellValue::Number(idx.to_string())).unwrap();
            sink.add_row().unwrap();
        }
        assert_eq!(sink.n_rows_opened(), 11);

        let mut v_out: Vec<u8> = Vec::new();
        let n_bytes = sink.flush(&mut v_out).expect("flush");
        assert_eq!(n_bytes, v_out.len() as u64);
        let c_sheet = read_zip_part(&v_out, "xl/worksheets/sheet1.xml");
        assert_eq!(count_rows(&c_sheet), 10);
        assert_eq!(std::fs::read_dir(dir_temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_flush_leaves_spill_directory_empty() {
        let dir_temp = tempfile::tempdir().expect("tempdir");
        let options = SpecExportOptions {
            policy_memory: SpecSheetMemoryPolicy {
                path_dir_temp: Some(dir_temp.path().to_path_buf()),
                size_rows_window: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut sink = XlsxSheetSink::new(&options).expect("sink");
        write_sample(&mut sink);

        assert!(sink.flush(&mut FailingWriter).is_err());
        assert_eq!(std::fs::read_dir(dir_temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn invalid_options_rejected() {
        let options = SpecExportOptions {
            policy_memory: SpecSheetMemoryPolicy {
                size_rows_window: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            XlsxSheetSink::new(&options),
            Err(ExportError::InvalidOptions(_))
        ));

        let options = SpecExportOptions {
            policy_style: SpecStylePolicy {
                height_row_header: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            XlsxSheetSink::new(&options),
            Err(ExportError::InvalidOptions(_))
        ));
    }
}
