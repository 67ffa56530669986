// ==========================================
// Header resolution
// ==========================================
// Maps the header row actually present in a sheet onto canonical field
// keys. Each canonical field accepts its primary Persian spelling, the
// Arabic-codepoint variant (ي/ك instead of ی/ک, common in files saved
// by older Office builds) and an ASCII fallback. Resolution is
// all-or-nothing: one missing field fails the whole file before any
// row is touched.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

/// One logical column: stable key, operator-facing Persian label, and
/// every header spelling accepted for it.
pub struct CanonicalField {
    pub key: &'static str,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
}

// ===== Unified in/out sheet =====
pub const UNIFIED_SHEET: &[CanonicalField] = &[
    CanonicalField {
        key: "warehouse",
        label: "انبار",
        aliases: &["انبار", "warehouse"],
    },
    CanonicalField {
        key: "operation_type",
        label: "نوع عملیات",
        aliases: &["نوع عملیات", "نوع عمليات", "operation_type"],
    },
    CanonicalField {
        key: "material_name",
        label: "نام کالا",
        aliases: &["نام کالا", "نام كالا", "material_name"],
    },
    CanonicalField {
        key: "counterparty",
        label: "هویت کالا/نام مشتری",
        aliases: &[
            "هویت کالا/نام مشتری",
            "هویت كالا/نام مشتری",
            "هویت کالا",
            "هویت كالا",
            "supplier_customer",
        ],
    },
    CanonicalField {
        key: "quantity",
        label: "مقدار",
        aliases: &["مقدار", "quantity"],
    },
    CanonicalField {
        key: "unit_price",
        label: "قیمت واحد",
        aliases: &["قیمت واحد", "قيمت واحد", "unit_price"],
    },
    CanonicalField {
        key: "invoice_number",
        label: "شماره بارنامه",
        aliases: &["شماره بارنامه", "invoice_number"],
    },
    CanonicalField {
        key: "date",
        label: "تاریخ (YYYY-MM-DD)",
        aliases: &["تاریخ (YYYY-MM-DD)", "تاريخ (YYYY-MM-DD)", "date"],
    },
    CanonicalField {
        key: "notes",
        label: "یادداشت‌ها",
        aliases: &["یادداشت‌ها", "يادداشت‌ها", "notes"],
    },
];

// ===== Dedicated stock-in sheet =====
pub const STOCK_IN_SHEET: &[CanonicalField] = &[
    CanonicalField {
        key: "warehouse",
        label: "انبار",
        aliases: &["انبار", "warehouse"],
    },
    CanonicalField {
        key: "material_name",
        label: "نام کالا",
        aliases: &["نام کالا", "نام كالا", "material_name"],
    },
    CanonicalField {
        key: "counterparty",
        label: "هویت کالا",
        aliases: &["هویت کالا", "هویت كالا", "supplier_name"],
    },
    CanonicalField {
        key: "quantity",
        label: "مقدار",
        aliases: &["مقدار", "quantity"],
    },
    CanonicalField {
        key: "unit_price",
        label: "قیمت واحد",
        aliases: &["قیمت واحد", "قيمت واحد", "unit_price"],
    },
    CanonicalField {
        key: "invoice_number",
        label: "شماره بارنامه",
        aliases: &["شماره بارنامه", "invoice_number"],
    },
    CanonicalField {
        key: "date",
        label: "تاریخ ورود (YYYY-MM-DD)",
        aliases: &["تاریخ ورود (YYYY-MM-DD)", "تاريخ ورود (YYYY-MM-DD)", "date"],
    },
    CanonicalField {
        key: "notes",
        label: "یادداشت‌ها",
        aliases: &["یادداشت‌ها", "يادداشت‌ها", "notes"],
    },
];

// ===== Dedicated stock-out sheet =====
pub const STOCK_OUT_SHEET: &[CanonicalField] = &[
    CanonicalField {
        key: "warehouse",
        label: "انبار",
        aliases: &["انبار", "warehouse"],
    },
    CanonicalField {
        key: "material_name",
        label: "نام کالا",
        aliases: &["نام کالا", "نام كالا", "material_name"],
    },
    CanonicalField {
        key: "counterparty",
        label: "نام مشتری",
        aliases: &["نام مشتری", "نام مشتري", "customer_name"],
    },
    CanonicalField {
        key: "quantity",
        label: "مقدار",
        aliases: &["مقدار", "quantity"],
    },
    CanonicalField {
        key: "unit_price",
        label: "قیمت واحد",
        aliases: &["قیمت واحد", "قيمت واحد", "unit_price"],
    },
    CanonicalField {
        key: "invoice_number",
        label: "شماره بارنامه",
        aliases: &["شماره بارنامه", "invoice_number"],
    },
    CanonicalField {
        key: "date",
        label: "تاریخ خروج (YYYY-MM-DD)",
        aliases: &["تاریخ خروج (YYYY-MM-DD)", "تاريخ خروج (YYYY-MM-DD)", "date"],
    },
    CanonicalField {
        key: "notes",
        label: "یادداشت‌ها",
        aliases: &["یادداشت‌ها", "يادداشت‌ها", "notes"],
    },
];

// ===== Transfer sheet =====
pub const TRANSFER_SHEET: &[CanonicalField] = &[
    CanonicalField {
        key: "material_name",
        label: "نام کالا",
        aliases: &["نام کالا", "نام كالا", "material_name"],
    },
    CanonicalField {
        key: "transfer_type",
        label: "نوع انتقال",
        aliases: &["نوع انتقال", "transfer_type"],
    },
    CanonicalField {
        key: "quantity",
        label: "مقدار",
        aliases: &["مقدار", "quantity"],
    },
    CanonicalField {
        key: "source_location",
        label: "مکان مبدا",
        aliases: &["مکان مبدا", "مكان مبدا", "source_location"],
    },
    CanonicalField {
        key: "destination_location",
        label: "مکان مقصد",
        aliases: &["مکان مقصد", "مكان مقصد", "destination_location"],
    },
    CanonicalField {
        key: "date",
        label: "تاریخ انتقال (YYYY-MM-DD)",
        aliases: &[
            "تاریخ انتقال (YYYY-MM-DD)",
            "تاريخ انتقال (YYYY-MM-DD)",
            "date",
        ],
    },
    CanonicalField {
        key: "notes",
        label: "یادداشت‌ها",
        aliases: &["یادداشت‌ها", "يادداشت‌ها", "notes"],
    },
];

/// Resolve the headers present in a sheet against a schema. Returns
/// canonical key -> actual header name. Fails with the full list of
/// missing Persian labels plus the headers actually present.
pub fn resolve_columns(
    headers: &[String],
    schema: &[CanonicalField],
) -> ImportResult<HashMap<&'static str, String>> {
    let mut found = HashMap::new();
    let mut missing = Vec::new();

    for field in schema {
        match field
            .aliases
            .iter()
            .find(|alias| headers.iter().any(|h| h == *alias))
        {
            Some(alias) => {
                found.insert(field.key, (*alias).to_string());
            }
            None => missing.push(field.label),
        }
    }

    if !missing.is_empty() {
        return Err(ImportError::MissingColumns {
            missing: missing.join(", "),
            present: headers.join(", "),
        });
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolves_primary_spellings() {
        let hs = headers(&[
            "انبار",
            "نوع عملیات",
            "نام کالا",
            "هویت کالا/نام مشتری",
            "مقدار",
            "قیمت واحد",
            "شماره بارنامه",
            "تاریخ (YYYY-MM-DD)",
            "یادداشت‌ها",
        ]);
        let mapping = resolve_columns(&hs, UNIFIED_SHEET).unwrap();
        assert_eq!(mapping.len(), 9);
        assert_eq!(mapping.get("material_name"), Some(&"نام کالا".to_string()));
    }

    #[test]
    fn test_resolves_arabic_codepoint_variant() {
        let hs = headers(&[
            "انبار",
            "نوع عمليات",
            "نام كالا",
            "هویت كالا",
            "مقدار",
            "قيمت واحد",
            "شماره بارنامه",
            "تاريخ (YYYY-MM-DD)",
            "يادداشت‌ها",
        ]);
        let mapping = resolve_columns(&hs, UNIFIED_SHEET).unwrap();
        assert_eq!(mapping.get("material_name"), Some(&"نام كالا".to_string()));
        assert_eq!(mapping.get("counterparty"), Some(&"هویت كالا".to_string()));
    }

    #[test]
    fn test_resolves_ascii_fallback() {
        let hs = headers(&[
            "warehouse",
            "operation_type",
            "material_name",
            "supplier_customer",
            "quantity",
            "unit_price",
            "invoice_number",
            "date",
            "notes",
        ]);
        assert!(resolve_columns(&hs, UNIFIED_SHEET).is_ok());
    }

    #[test]
    fn test_order_independent() {
        let forward = headers(&[
            "نام کالا",
            "نوع انتقال",
            "مقدار",
            "مکان مبدا",
            "مکان مقصد",
            "تاریخ انتقال (YYYY-MM-DD)",
            "یادداشت‌ها",
        ]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = resolve_columns(&forward, TRANSFER_SHEET).unwrap();
        let b = resolve_columns(&reversed, TRANSFER_SHEET).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_column_lists_labels_and_present_headers() {
        let hs = headers(&["نام کالا", "مقدار"]);
        let err = resolve_columns(&hs, TRANSFER_SHEET).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ستون‌های زیر در فایل یافت نشد"));
        assert!(msg.contains("نوع انتقال"));
        assert!(msg.contains("ستون‌های موجود"));
        assert!(msg.contains("نام کالا"));
    }
}
