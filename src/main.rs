use catalog_persistence::config::DbConfig;
use catalog_sync::cli::{parse_args, Command, USAGE};
use catalog_sync::config::{init_logging, AppConfig};
use catalog_sync::errors::AppError;
use catalog_sync::service;
use log::error;

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Sync { parallel } => {
            let mut cfg = AppConfig::from_env()?;
            if let Some(n) = parallel {
                cfg.sync.parallelism = n;
            }
            // La conexión al warehouse vive hasta el final de este bloque.
            let reconciler = service::build_service(&cfg, cfg.sync.pass_mode())?;
            let summary = service::run_sync(&reconciler)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Show(key) => {
            catalog_persistence::init_dotenv();
            let store = service::open_store(&DbConfig::from_env()?)?;
            let record = service::show_table(&store, &key)?.ok_or(AppError::NotFound(key))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::List => {
            catalog_persistence::init_dotenv();
            let store = service::open_store(&DbConfig::from_env()?)?;
            for key in service::list_tables(&store)? {
                println!("{key}");
            }
        }
        Command::Migrate => {
            catalog_persistence::init_dotenv();
            // build_pool ejecuta las migraciones pendientes.
            service::open_store(&DbConfig::from_env()?)?;
            println!("migraciones aplicadas");
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(e.exit_code());
        }
    };
    if let Err(e) = run(command) {
        error!("catalog-sync: {e}");
        if let Some(partial) = match &e {
            AppError::Sync(s) => s.partial_summary(),
            _ => None,
        } {
            eprintln!("resumen parcial: {}", serde_json::to_string(partial).unwrap_or_default());
        }
        eprintln!("[catalog-sync] {e}");
        std::process::exit(e.exit_code());
    }
}
