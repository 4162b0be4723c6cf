//! Mailveil: reversible masking server and command line.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mailveil_server::{build_router, cli, AppState};

fn resolve_data_dir() -> PathBuf {
    std::env::var("MAILVEIL_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = resolve_data_dir();

    if args.len() > 1 {
        match args[1].as_str() {
            "mask" => {
                if args.len() < 3 {
                    eprintln!("Usage: mailveil mask <file> [id]");
                    std::process::exit(1);
                }
                let state = AppState::open(mailveil_core::MailveilConfig::from_env(&data_dir)?)?;
                cli::mask_file(&state, &PathBuf::from(&args[2]), args.get(3).map(String::as_str))?;
                return Ok(());
            }
            "unmask" => {
                if args.len() < 4 {
                    eprintln!("Usage: mailveil unmask <file> <id>");
                    std::process::exit(1);
                }
                let state = AppState::open(mailveil_core::MailveilConfig::from_env(&data_dir)?)?;
                cli::unmask_file(&state, &PathBuf::from(&args[2]), &args[3])?;
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                cli::print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'mailveil help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    info!("Data directory: {}", data_dir.display());

    let config = mailveil_core::MailveilConfig::from_env(&data_dir)?;
    let port = config.port;
    let state = Arc::new(
        AppState::open(config).map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?,
    );

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Mailveil server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
