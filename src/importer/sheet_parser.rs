// ==========================================
// Spreadsheet parsing (Excel / CSV)
// ==========================================
// Stage 0 of the ingestion pipeline: turn a file into a header list
// plus one string map per data row. Excel date cells are rendered as
// ISO "YYYY-MM-DD" so the date normalizer sees one shape regardless of
// how the sheet stored the value. Fully blank rows are skipped here.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Raw parse result: headers in sheet order, rows as header -> value.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

// ==========================================
// CSV
// ==========================================
pub struct CsvSheetParser;

impl CsvSheetParser {
    pub fn parse(&self, path: &Path) -> ImportResult<ParsedSheet> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row_map);
        }

        Ok(ParsedSheet { headers, rows })
    }
}

// ==========================================
// Excel
// ==========================================
pub struct ExcelSheetParser;

impl ExcelSheetParser {
    pub fn parse(&self, path: &Path) -> ImportResult<ParsedSheet> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("sheet has no header row".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let mut row_map = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), render_cell(cell));
                }
            }
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row_map);
        }

        Ok(ParsedSheet { headers, rows })
    }
}

/// Render one Excel cell as the string the pipeline consumes. Native
/// date/datetime cells become ISO dates; everything else stringifies.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d").to_string(),
            None => cell.to_string().trim().to_string(),
        },
        _ => cell.to_string().trim().to_string(),
    }
}

// ==========================================
// Extension dispatch
// ==========================================
pub struct SheetParser;

impl SheetParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedSheet> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvSheetParser.parse(path),
            "xlsx" | "xls" => ExcelSheetParser.parse(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut temp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp, "{}", line).unwrap();
        }
        temp
    }

    #[test]
    fn test_csv_headers_and_rows() {
        let file = csv_file(&[
            "نام کالا,مقدار",
            "میلگرد 16,1000",
            "ورق سیاه,500",
        ]);

        let sheet = SheetParser.parse(file.path()).unwrap();
        assert_eq!(sheet.headers, vec!["نام کالا", "مقدار"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("مقدار"), Some(&"1000".to_string()));
    }

    #[test]
    fn test_csv_skips_blank_rows() {
        let file = csv_file(&["نام کالا,مقدار", "میلگرد 16,1000", ",", "ورق سیاه,500"]);
        let sheet = SheetParser.parse(file.path()).unwrap();
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn test_csv_trims_whitespace() {
        let file = csv_file(&[" نام کالا , مقدار ", " میلگرد 16 , 1000 "]);
        let sheet = SheetParser.parse(file.path()).unwrap();
        assert_eq!(sheet.headers, vec!["نام کالا", "مقدار"]);
        assert_eq!(sheet.rows[0].get("نام کالا"), Some(&"میلگرد 16".to_string()));
    }

    #[test]
    fn test_missing_file() {
        let result = SheetParser.parse(Path::new("does_not_exist.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SheetParser.parse(Path::new("data.txt"));
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
