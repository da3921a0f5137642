pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{CrawlSummary, DownloadEvent, MediaLink, PageKind};
