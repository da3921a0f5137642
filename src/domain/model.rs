use std::path::PathBuf;

use url::Url;

/// A media file found on a linked page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLink {
    pub url: Url,
    pub file_name: String,
}

/// Which fetch stage a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Index,
    Linked,
}

#[derive(Debug)]
pub enum DownloadEvent {
    PageFailed {
        kind: PageKind,
        url: String,
        error: super::AppError,
    },
    Skipped {
        file_name: String,
    },
    Started {
        file_name: String,
        total: Option<u64>,
    },
    Progress {
        file_name: String,
        downloaded: u64,
    },
    Completed {
        file_name: String,
        path: PathBuf,
        bytes: u64,
    },
    Failed {
        file_name: String,
        error: super::AppError,
    },
}

/// Counters for one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_visited: usize,
    pub pages_failed: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}
