//! dynamo-shell binary entry point.

use std::process::ExitCode;

use dynamo_shell::cli;
use dynamo_shell::config::Config;
use dynamo_shell::{logging, Credentials, DynamoStore, EditorConsole, Shell};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dynamo-shell: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> dynamo_shell::Result<()> {
    let args = cli::parse_args()?;

    if args.help {
        cli::print_help();
        return Ok(());
    }

    if args.version {
        cli::print_version();
        return Ok(());
    }

    let config = Config::load(&args)?;
    logging::init(config.log_filter());

    info!("dynamo-shell v{}", env!("CARGO_PKG_VERSION"));

    let credentials_path = config.credentials_path()?;
    let credentials = Credentials::from_file(&credentials_path)?;
    info!(path = %credentials_path.display(), "credentials loaded");

    let settings = config.service_settings()?;
    let store = DynamoStore::connect(&credentials, &settings).await;

    let console = EditorConsole::new(config.history_path())?;
    let mut shell = Shell::new(store, console)?;
    shell.run().await
}
