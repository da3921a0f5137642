use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::api::{ClientConfig, HttpClient};
use crate::application::DownloadCoordinator;
use crate::domain::{AppError, CrawlSummary};
use crate::ui::ConsoleReporter;

pub const USAGE: &str = "Usage: media-scrape <webpage_url> <download_folder>";

#[derive(Debug, Parser)]
#[command(name = "media-scrape")]
#[command(about = "Download media files linked from the .mp4 pages of a web page")]
pub struct Cli {
    /// Page whose `.mp4` links are followed
    #[arg(allow_hyphen_values = true)]
    pub webpage_url: String,

    /// Folder the media files are saved into (created if missing)
    #[arg(allow_hyphen_values = true)]
    pub download_folder: PathBuf,
}

/// Parse the command line. Returns `None` for `--help` or a wrong argument
/// count; the caller prints [`USAGE`] and exits with 1. Positionals may
/// start with `-`.
pub fn parse_args<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.iter().skip(1).any(|arg| arg == "--help") {
        return None;
    }
    Cli::try_parse_from(args).ok()
}

pub async fn run(cli: Cli) -> Result<CrawlSummary, AppError> {
    let http_client = HttpClient::new(ClientConfig::default())?;
    let coordinator = DownloadCoordinator::new(http_client);
    let mut reporter = ConsoleReporter::new();

    coordinator
        .download_media(&cli.webpage_url, &cli.download_folder, |event| {
            reporter.handle(event)
        })
        .await
}
