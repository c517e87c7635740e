use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use catalog::api::HttpProductStore;
use catalog::cli::{self, Args};
use catalog::core::App;
use catalog::core::config::{self, CatalogConfig};
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The log level lives in the config file, so it is read before the logger exists.
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (CatalogConfig::default(), Some(e)),
    };
    let resolved = config::resolve(&file_config, args.api_url.as_deref());

    // Initialize file logger - writes to catalog.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("catalog.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {e}");
        eprintln!("warning: {e}; using defaults");
    }
    log::info!("Catalog starting up against {}", resolved.base_url);

    let store = match HttpProductStore::new(&resolved.store_config()) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Could not build HTTP client: {e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::from_config(Arc::new(store), &resolved);
    let mut stdout = std::io::stdout().lock();
    let result = cli::run(&mut app, args.command, &mut stdout).await;
    app.shutdown();

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}
