// ==========================================
// Warehouse inventory tracker - CLI shell
// ==========================================
// Thin shell over StockApi: imports, exports and queries. Identity is
// passed through to the pipeline and recorded on events; this shell
// does no authentication of its own.
// ==========================================

use anbar::config::AppConfig;
use anbar::importer::stock_importer_trait::SheetKind;
use anbar::{config, init_config, logging, ImportReport, StockApi};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn print_usage() {
    eprintln!("{} v{}", anbar::APP_NAME, anbar::VERSION);
    eprintln!();
    eprintln!("usage: anbar [--config FILE] [--db FILE] [--user NAME] COMMAND");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  import-unified FILE     import a unified in/out sheet");
    eprintln!("  import-in FILE          import a stock-in sheet");
    eprintln!("  import-out FILE         import a stock-out sheet");
    eprintln!("  import-transfers FILE   import a transfer sheet");
    eprintln!("  template KIND FILE      write an ingest template (unified|in|out|transfer)");
    eprintln!("  export-inventory FILE   write the inventory report");
    eprintln!("  balances                list all balances");
    eprintln!("  counts                  entity and event counts");
}

fn print_report(report: &ImportReport) {
    for line in &report.success {
        println!("{}", line);
    }
    for line in &report.errors {
        eprintln!("{}", line);
    }
    println!(
        "{} موفق، {} خطا",
        report.success.len(),
        report.errors.len()
    );
}

fn template_kind(name: &str) -> Option<SheetKind> {
    match name {
        "unified" => Some(SheetKind::Unified),
        "in" => Some(SheetKind::StockIn),
        "out" => Some(SheetKind::StockOut),
        "transfer" => Some(SheetKind::Transfer),
        _ => None,
    }
}

struct CliArgs {
    config_path: Option<PathBuf>,
    db_path: Option<String>,
    user: Option<String>,
    command: Vec<String>,
}

fn parse_args(args: Vec<String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs {
        config_path: None,
        db_path: None,
        user: None,
        command: Vec::new(),
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config needs a file path")?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--db" => {
                parsed.db_path = Some(iter.next().ok_or("--db needs a file path")?);
            }
            "--user" => {
                parsed.user = Some(iter.next().ok_or("--user needs a name")?);
            }
            _ => parsed.command.push(arg),
        }
    }
    Ok(parsed)
}

async fn run(args: CliArgs) -> Result<(), String> {
    let app_config = AppConfig::load_or_default(args.config_path.as_deref());
    init_config(app_config);

    let db_path = args
        .db_path
        .unwrap_or_else(|| config().database_path.clone());
    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let user = args.user.unwrap_or_else(|| config().import_user.clone());

    let api = StockApi::new(&db_path).map_err(|e| e.to_string())?;

    let command: Vec<&str> = args.command.iter().map(|s| s.as_str()).collect();
    match command.as_slice() {
        ["import-unified", file] => {
            print_report(&api.import_sheet(SheetKind::Unified, file, &user).await);
        }
        ["import-in", file] => {
            print_report(&api.import_sheet(SheetKind::StockIn, file, &user).await);
        }
        ["import-out", file] => {
            print_report(&api.import_sheet(SheetKind::StockOut, file, &user).await);
        }
        ["import-transfers", file] => {
            print_report(&api.import_sheet(SheetKind::Transfer, file, &user).await);
        }
        ["template", kind, file] => {
            let kind = template_kind(kind).ok_or("unknown template kind")?;
            api.write_template(kind, file).map_err(|e| e.to_string())?;
            println!("template written: {}", file);
        }
        ["export-inventory", file] => {
            let rows = api.export_inventory(file).map_err(|e| e.to_string())?;
            println!("{} rows written to {}", rows, file);
        }
        ["balances"] => {
            for view in api.list_balances().map_err(|e| e.to_string())? {
                println!(
                    "{}\t{}\t{}\t{} {}",
                    view.warehouse_name,
                    view.material_name,
                    view.supplier_name.as_deref().unwrap_or("-"),
                    view.current_quantity,
                    view.unit
                );
            }
        }
        ["counts"] => {
            let counts = api.dashboard_counts().map_err(|e| e.to_string())?;
            println!(
                "warehouses={} materials={} suppliers={} customers={}",
                counts.warehouses, counts.materials, counts.suppliers, counts.customers
            );
            println!(
                "stock_in={} stock_out={} transfers={}",
                counts.stock_in_events, counts.stock_out_events, counts.transfer_events
            );
        }
        _ => {
            print_usage();
            return Err("unknown command".to_string());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(parsed).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
