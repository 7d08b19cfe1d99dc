use clap::Parser;
use reel::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "reel", about = "Browse the OMDb film catalog from the terminal")]
struct Args {
    /// Title to search for on start
    query: Option<String>,

    /// OMDb API key (overrides OMDB_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// OMDb base URL (overrides OMDB_BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to reel.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("reel.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Reel starting up");

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("reel: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cli = CliOverrides {
        api_key: args.api_key,
        base_url: args.base_url,
    };
    let resolved = config::resolve(&file_config, &cli);

    match reel::tui::run(resolved, args.query) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Exiting with error: {}", e);
            eprintln!("reel: {e}");
            ExitCode::FAILURE
        }
    }
}
