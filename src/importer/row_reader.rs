// ==========================================
// Row field extraction
// ==========================================
// Typed accessors over one raw row, addressed by canonical key through
// the resolved column mapping. Missing cells and unparseable numbers
// degrade to the documented defaults ("" and 0); they never error.
// ==========================================

use std::collections::HashMap;

pub struct RowReader<'a> {
    row: &'a HashMap<String, String>,
    columns: &'a HashMap<&'static str, String>,
}

impl<'a> RowReader<'a> {
    pub fn new(
        row: &'a HashMap<String, String>,
        columns: &'a HashMap<&'static str, String>,
    ) -> Self {
        Self { row, columns }
    }

    fn raw(&self, key: &str) -> Option<&str> {
        let header = self.columns.get(key)?;
        self.row.get(header).map(|v| v.as_str())
    }

    /// Trimmed string value; blank when the cell is absent.
    pub fn get_string(&self, key: &str) -> String {
        self.raw(key).unwrap_or("").trim().to_string()
    }

    /// Integer value; 0 when absent or unparseable. Spreadsheet numeric
    /// cells often stringify as "1000.0", so a whole-valued float is
    /// accepted too.
    pub fn get_i64(&self, key: &str) -> i64 {
        let raw = self.get_string(key);
        if raw.is_empty() {
            return 0;
        }
        if let Ok(n) = raw.parse::<i64>() {
            return n;
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return f as i64;
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (HashMap<String, String>, HashMap<&'static str, String>) {
        let mut row = HashMap::new();
        row.insert("مقدار".to_string(), "1000".to_string());
        row.insert("قیمت واحد".to_string(), "15000.0".to_string());
        row.insert("نام کالا".to_string(), "  میلگرد 16  ".to_string());
        row.insert("یادداشت‌ها".to_string(), "".to_string());

        let mut columns = HashMap::new();
        columns.insert("quantity", "مقدار".to_string());
        columns.insert("unit_price", "قیمت واحد".to_string());
        columns.insert("material_name", "نام کالا".to_string());
        columns.insert("notes", "یادداشت‌ها".to_string());
        columns.insert("invoice_number", "شماره بارنامه".to_string());
        (row, columns)
    }

    #[test]
    fn test_string_trims_and_defaults_blank() {
        let (row, columns) = setup();
        let reader = RowReader::new(&row, &columns);
        assert_eq!(reader.get_string("material_name"), "میلگرد 16");
        assert_eq!(reader.get_string("notes"), "");
        // column resolved but cell absent from the row
        assert_eq!(reader.get_string("invoice_number"), "");
    }

    #[test]
    fn test_integer_parsing_with_float_fallback() {
        let (row, columns) = setup();
        let reader = RowReader::new(&row, &columns);
        assert_eq!(reader.get_i64("quantity"), 1000);
        assert_eq!(reader.get_i64("unit_price"), 15000);
    }

    #[test]
    fn test_unparseable_number_defaults_to_zero() {
        let mut row = HashMap::new();
        row.insert("مقدار".to_string(), "abc".to_string());
        let mut columns = HashMap::new();
        columns.insert("quantity", "مقدار".to_string());

        let reader = RowReader::new(&row, &columns);
        assert_eq!(reader.get_i64("quantity"), 0);
    }
}
