//! hasone-autocomplete server
//!
//! Serves the edit form and the search action of every configured field.

use anyhow::{bail, Result};
use hasone_autocomplete::{
    config,
    source::SourceLoader,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config_path: Option<PathBuf> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("{} requires a file path", arg),
            },
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-V" | "--version" => {
                println!("hasone-autocomplete {}", hasone_autocomplete::VERSION);
                return Ok(());
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    let settings = config::init(config::load(config_path.as_deref())?)?.clone();

    // Initialize logging
    let level = if settings.general.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Starting hasone-autocomplete v{}", hasone_autocomplete::VERSION);

    // Load source collections
    let sources = SourceLoader::load(&settings);
    info!("Loaded {} source collections", sources.len());

    let state = AppState::new(settings.clone(), &sources)?;
    info!("Registered {} fields", state.fields.len());

    let app = create_router(state);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
hasone-autocomplete v{}
Autocompleting picker for has-one relations

USAGE:
    hasone-autocomplete [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    HASONE_SETTINGS_PATH   Path to settings.yml
    HASONE_DEBUG           Enable debug logging (true/false)
    HASONE_PORT            Server port
    HASONE_BIND_ADDRESS    Bind address
    HASONE_BASE_URL        Prefix for generated search links
"#,
        hasone_autocomplete::VERSION
    );
}
