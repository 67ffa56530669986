// ==========================================
// Ingest template generation
// ==========================================
// Pre-filled CSV templates, one per ingest shape. Headers must stay
// byte-identical to the primary spellings the column resolver accepts;
// the sample rows show operators the expected value shapes.
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::stock_importer_trait::SheetKind;
use csv::WriterBuilder;
use std::path::Path;

const UNIFIED_HEADERS: [&str; 9] = [
    "انبار",
    "نوع عملیات",
    "نام کالا",
    "هویت کالا/نام مشتری",
    "مقدار",
    "قیمت واحد",
    "شماره بارنامه",
    "تاریخ (YYYY-MM-DD)",
    "یادداشت‌ها",
];

const UNIFIED_SAMPLES: [[&str; 9]; 4] = [
    ["انبار اصلی", "ورودی", "میلگرد 16", "شرکت آهن آلات تهران", "1000", "15000", "BR001", "2024-01-15", "ورودی اولیه"],
    ["انبار اصلی", "خروجی", "میلگرد 16", "شرکت ساختمانی آسمان", "200", "18000", "BR002", "2024-01-16", "خروجی اولیه"],
    ["انبار اصلی", "ورودی", "ورق فولادی", "کارخانه فولاد اصفهان", "500", "25000", "BR003", "2024-01-17", "ورودی دوم"],
    ["انبار اصلی", "خروجی", "ورق فولادی", "پروژه برج تهران", "100", "28000", "BR004", "2024-01-18", "خروجی دوم"],
];

const STOCK_IN_HEADERS: [&str; 8] = [
    "انبار",
    "نام کالا",
    "هویت کالا",
    "مقدار",
    "قیمت واحد",
    "شماره بارنامه",
    "تاریخ ورود (YYYY-MM-DD)",
    "یادداشت‌ها",
];

const STOCK_IN_SAMPLES: [[&str; 8]; 2] = [
    ["انبار اصلی", "میلگرد 16", "شرکت آهن آلات تهران", "1000", "15000", "BR001", "2024-01-15", "ورودی اولیه"],
    ["انبار اصلی", "ورق فولادی", "کارخانه فولاد اصفهان", "500", "25000", "BR002", "2024-01-16", "ورودی دوم"],
];

const STOCK_OUT_HEADERS: [&str; 8] = [
    "انبار",
    "نام کالا",
    "نام مشتری",
    "مقدار",
    "قیمت واحد",
    "شماره بارنامه",
    "تاریخ خروج (YYYY-MM-DD)",
    "یادداشت‌ها",
];

const STOCK_OUT_SAMPLES: [[&str; 8]; 2] = [
    ["انبار اصلی", "میلگرد 16", "شرکت ساختمانی آسمان", "200", "18000", "BR003", "2024-01-17", "خروجی اولیه"],
    ["انبار اصلی", "ورق فولادی", "پروژه برج تهران", "100", "28000", "BR004", "2024-01-18", "خروجی دوم"],
];

const TRANSFER_HEADERS: [&str; 7] = [
    "نام کالا",
    "نوع انتقال",
    "مقدار",
    "مکان مبدا",
    "مکان مقصد",
    "تاریخ انتقال (YYYY-MM-DD)",
    "یادداشت‌ها",
];

const TRANSFER_SAMPLES: [[&str; 7]; 2] = [
    ["میلگرد 16", "انتقال به انبار", "200", "انبار اصلی", "انبار فرعی", "2024-01-20", "انتقال اولیه"],
    ["ورق فولادی", "انتقال از انبار", "100", "انبار فرعی", "انبار اصلی", "2024-01-21", "انتقال دوم"],
];

fn write_rows<const N: usize>(
    path: &Path,
    headers: &[&str; N],
    samples: &[[&str; N]],
) -> ImportResult<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(headers.iter())?;
    for sample in samples {
        writer.write_record(sample.iter())?;
    }
    writer.flush().map_err(crate::importer::error::ImportError::from)?;
    Ok(())
}

/// Write the template for one ingest shape.
pub fn write_template<P: AsRef<Path>>(kind: SheetKind, path: P) -> ImportResult<()> {
    let path = path.as_ref();
    match kind {
        SheetKind::Unified => write_rows(path, &UNIFIED_HEADERS, &UNIFIED_SAMPLES),
        SheetKind::StockIn => write_rows(path, &STOCK_IN_HEADERS, &STOCK_IN_SAMPLES),
        SheetKind::StockOut => write_rows(path, &STOCK_OUT_HEADERS, &STOCK_OUT_SAMPLES),
        SheetKind::Transfer => write_rows(path, &TRANSFER_HEADERS, &TRANSFER_SAMPLES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::column_resolver::{
        resolve_columns, STOCK_IN_SHEET, STOCK_OUT_SHEET, TRANSFER_SHEET, UNIFIED_SHEET,
    };
    use crate::importer::sheet_parser::SheetParser;

    // every template must round-trip through its own column resolver
    #[test]
    fn test_template_headers_resolve() {
        let cases = [
            (SheetKind::Unified, UNIFIED_SHEET),
            (SheetKind::StockIn, STOCK_IN_SHEET),
            (SheetKind::StockOut, STOCK_OUT_SHEET),
            (SheetKind::Transfer, TRANSFER_SHEET),
        ];

        for (kind, schema) in cases {
            let temp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
            write_template(kind, temp.path()).unwrap();

            let sheet = SheetParser.parse(temp.path()).unwrap();
            assert!(
                resolve_columns(&sheet.headers, schema).is_ok(),
                "template headers for {:?} did not resolve",
                kind
            );
            assert!(!sheet.rows.is_empty());
        }
    }
}
