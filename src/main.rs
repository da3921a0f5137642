mod api;
mod app;
mod application;
mod domain;
mod logging;
mod parser;
mod ui;
mod utils;

use std::process::ExitCode;

use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let Some(cli) = app::parse_args(std::env::args_os()) else {
        println!("{}", app::USAGE);
        return ExitCode::FAILURE;
    };

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match app::run(cli).await {
        Ok(summary) => {
            info!(
                pages_visited = summary.pages_visited,
                pages_failed = summary.pages_failed,
                downloaded = summary.downloaded,
                skipped = summary.skipped,
                failed = summary.failed,
                "crawl finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
