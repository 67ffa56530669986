// ==========================================
// Ingestion pipeline integration tests
// ==========================================
// End-to-end through the public API: real files on disk, real SQLite
// database file, full import -> reconcile -> report flow.
// ==========================================

use anbar::importer::stock_importer_trait::SheetKind;
use anbar::{logging, StockApi};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const UNIFIED_HEADER: &str =
    "انبار,نوع عملیات,نام کالا,هویت کالا/نام مشتری,مقدار,قیمت واحد,شماره بارنامه,تاریخ (YYYY-MM-DD),یادداشت‌ها";

const TRANSFER_HEADER: &str =
    "نام کالا,نوع انتقال,مقدار,مکان مبدا,مکان مقصد,تاریخ انتقال (YYYY-MM-DD),یادداشت‌ها";

struct TestEnv {
    _dir: TempDir,
    root: PathBuf,
    api: StockApi,
}

fn setup() -> TestEnv {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    let db_path = root.join("anbar.db");
    let api = StockApi::new(db_path.to_str().unwrap()).unwrap();
    TestEnv {
        _dir: dir,
        root,
        api,
    }
}

fn write_csv(env: &TestEnv, name: &str, lines: &[&str]) -> PathBuf {
    let path = env.root.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

#[tokio::test]
async fn test_two_row_unified_scenario() {
    let env = setup();
    let sheet = write_csv(
        &env,
        "unified.csv",
        &[
            UNIFIED_HEADER,
            "انبار اصلی,ورودی,Material A,Supplier X,1000,15000,BR001,2024-01-15,",
            "انبار اصلی,خروجی,Material A,Customer Y,200,18000,BR002,2024-01-16,",
        ],
    );

    let report = env
        .api
        .import_sheet(SheetKind::Unified, &sheet, "tester")
        .await;

    assert_eq!(report.success.len(), 2, "errors: {:?}", report.errors);
    assert!(report.errors.is_empty());
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "Material A").unwrap(),
        Some(800)
    );
}

#[tokio::test]
async fn test_overdraw_keeps_balance_and_reports_amounts() {
    let env = setup();
    let sheet = write_csv(
        &env,
        "overdraw.csv",
        &[
            UNIFIED_HEADER,
            "انبار اصلی,ورودی,میلگرد 16,تامین‌کننده,300,0,,,",
            "انبار اصلی,خروجی,میلگرد 16,مشتری,900,0,,,",
        ],
    );

    let report = env
        .api
        .import_sheet(SheetKind::Unified, &sheet, "tester")
        .await;

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("موجودی: 300"));
    assert!(report.errors[0].contains("درخواستی: 900"));
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "میلگرد 16").unwrap(),
        Some(300)
    );
}

#[tokio::test]
async fn test_stock_out_against_missing_balance_is_row_error() {
    let env = setup();
    let sheet = write_csv(
        &env,
        "missing.csv",
        &[
            UNIFIED_HEADER,
            "انبار اصلی,خروجی,کالای ناموجود,مشتری,10,0,,,",
        ],
    );

    let report = env
        .api
        .import_sheet(SheetKind::Unified, &sheet, "tester")
        .await;

    assert!(report.success.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("یافت نشد"));
}

#[tokio::test]
async fn test_entity_resolution_idempotent_across_calls() {
    let env = setup();
    let row = "انبار اصلی,ورودی,میلگرد 16,شرکت آهن آلات تهران,100,0,,,";
    let first = write_csv(&env, "first.csv", &[UNIFIED_HEADER, row]);
    let second = write_csv(&env, "second.csv", &[UNIFIED_HEADER, row]);

    env.api
        .import_sheet(SheetKind::Unified, &first, "tester")
        .await;
    env.api
        .import_sheet(SheetKind::Unified, &second, "tester")
        .await;

    let counts = env.api.dashboard_counts().unwrap();
    assert_eq!(counts.warehouses, 1);
    assert_eq!(counts.materials, 1);
    assert_eq!(counts.suppliers, 1);
    assert_eq!(counts.stock_in_events, 2);
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "میلگرد 16").unwrap(),
        Some(200)
    );
}

#[tokio::test]
async fn test_column_order_independence() {
    let env = setup();
    // same columns, reversed order
    let sheet = write_csv(
        &env,
        "reversed.csv",
        &[
            "یادداشت‌ها,تاریخ (YYYY-MM-DD),شماره بارنامه,قیمت واحد,مقدار,هویت کالا/نام مشتری,نام کالا,نوع عملیات,انبار",
            ",1404-01-26,BR001,15000,1000,تامین‌کننده,میلگرد 16,ورودی,انبار اصلی",
        ],
    );

    let report = env
        .api
        .import_sheet(SheetKind::Unified, &sheet, "tester")
        .await;

    assert_eq!(report.success.len(), 1, "errors: {:?}", report.errors);
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "میلگرد 16").unwrap(),
        Some(1000)
    );
}

#[tokio::test]
async fn test_unparseable_date_does_not_fail_row() {
    let env = setup();
    let sheet = write_csv(
        &env,
        "baddate.csv",
        &[
            UNIFIED_HEADER,
            "انبار اصلی,ورودی,میلگرد 16,تامین‌کننده,50,0,,1404-02-30,",
            "انبار اصلی,ورودی,میلگرد 16,تامین‌کننده,50,0,,invalid,",
        ],
    );

    let report = env
        .api
        .import_sheet(SheetKind::Unified, &sheet, "tester")
        .await;

    // a bad date means "no date", never a skipped row
    assert_eq!(report.success.len(), 2, "errors: {:?}", report.errors);
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "میلگرد 16").unwrap(),
        Some(100)
    );
}

#[tokio::test]
async fn test_transfer_round_trip() {
    let env = setup();
    let seed = write_csv(
        &env,
        "seed.csv",
        &[
            UNIFIED_HEADER,
            "انبار اصلی,ورودی,میلگرد 16,تامین‌کننده,500,0,,,",
        ],
    );
    env.api
        .import_sheet(SheetKind::Unified, &seed, "tester")
        .await;

    let transfer = write_csv(
        &env,
        "transfer.csv",
        &[
            TRANSFER_HEADER,
            "میلگرد 16,انتقال به انبار,200,انبار اصلی,انبار فرعی,1404-01-26,",
        ],
    );
    let report = env
        .api
        .import_sheet(SheetKind::Transfer, &transfer, "tester")
        .await;

    assert_eq!(report.success.len(), 1, "errors: {:?}", report.errors);
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "میلگرد 16").unwrap(),
        Some(300)
    );
    assert_eq!(
        env.api.get_quantity("انبار فرعی", "میلگرد 16").unwrap(),
        Some(200)
    );
}

#[tokio::test]
async fn test_template_then_import_round_trip() {
    let env = setup();
    let template = env.root.join("template.csv");
    env.api
        .write_template(SheetKind::Unified, &template)
        .unwrap();

    let report = env
        .api
        .import_sheet(SheetKind::Unified, &template, "tester")
        .await;

    // the sample rows are a valid import: two ins and two outs
    assert_eq!(report.success.len(), 4, "errors: {:?}", report.errors);
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "میلگرد 16").unwrap(),
        Some(800)
    );
    assert_eq!(
        env.api.get_quantity("انبار اصلی", "ورق فولادی").unwrap(),
        Some(400)
    );
}

#[tokio::test]
async fn test_inventory_export_after_import() {
    let env = setup();
    let sheet = write_csv(
        &env,
        "unified.csv",
        &[
            UNIFIED_HEADER,
            "انبار اصلی,ورودی,میلگرد 16,تامین‌کننده,800,0,,,",
        ],
    );
    env.api
        .import_sheet(SheetKind::Unified, &sheet, "tester")
        .await;

    let out = env.root.join("inventory.csv");
    let rows = env.api.export_inventory(&out).unwrap();
    assert_eq!(rows, 1);

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("میلگرد 16"));
    assert!(content.contains("کیلوگرم"));
    assert!(content.contains("800"));
}

#[tokio::test]
async fn test_unreadable_file_reports_file_error() {
    let env = setup();
    let report = env
        .api
        .import_sheet(
            SheetKind::Unified,
            env.root.join("does_not_exist.csv"),
            "tester",
        )
        .await;

    assert!(report.success.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("خطا در خواندن فایل"));
}
