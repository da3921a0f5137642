use std::path::Path;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    api::HttpClient,
    domain::{AppError, CrawlSummary, DownloadEvent, MediaLink, PageKind},
    parser::{media_file_links, media_page_links},
    utils::file_name_from_url,
};

#[derive(Clone)]
pub struct DownloadCoordinator {
    http_client: HttpClient,
}

impl DownloadCoordinator {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Crawl `url` one hop deep and download every media file into `folder`.
    ///
    /// Fetch and download failures are reported through `on_event` and the
    /// affected item is skipped. The only error returned is failing to create
    /// `folder`.
    pub async fn download_media<F>(
        &self,
        url: &str,
        folder: &Path,
        mut on_event: F,
    ) -> Result<CrawlSummary, AppError>
    where
        F: FnMut(DownloadEvent),
    {
        tokio::fs::create_dir_all(folder).await?;

        let mut summary = CrawlSummary::default();

        let index_url = match Url::parse(url) {
            Ok(index_url) => index_url,
            Err(source) => {
                warn!(%url, "target is not a valid URL: {source}");
                on_event(DownloadEvent::PageFailed {
                    kind: PageKind::Index,
                    url: url.to_string(),
                    error: AppError::InvalidUrl {
                        url: url.to_string(),
                        source,
                    },
                });
                return Ok(summary);
            }
        };

        let html = match self.http_client.fetch_page(&index_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(%index_url, "failed to fetch index page: {e}");
                on_event(DownloadEvent::PageFailed {
                    kind: PageKind::Index,
                    url: index_url.to_string(),
                    error: e.into(),
                });
                return Ok(summary);
            }
        };

        let pages = media_page_links(&index_url, &html);
        debug!(%index_url, count = pages.len(), "found linked pages");

        for page_url in pages {
            let page_html = match self.http_client.fetch_page(&page_url).await {
                Ok(page_html) => page_html,
                Err(e) => {
                    warn!(%page_url, "failed to fetch linked page: {e}");
                    summary.pages_failed += 1;
                    on_event(DownloadEvent::PageFailed {
                        kind: PageKind::Linked,
                        url: page_url.to_string(),
                        error: e.into(),
                    });
                    continue;
                }
            };
            summary.pages_visited += 1;

            for media_url in media_file_links(&page_url, &page_html) {
                let Some(file_name) = file_name_from_url(&media_url) else {
                    summary.failed += 1;
                    on_event(DownloadEvent::Failed {
                        file_name: media_url.to_string(),
                        error: AppError::InvalidFileName(media_url.to_string()),
                    });
                    continue;
                };
                let link = MediaLink {
                    url: media_url,
                    file_name,
                };

                let path = folder.join(&link.file_name);
                let exists = tokio::fs::metadata(&path)
                    .await
                    .map(|meta| meta.is_file())
                    .unwrap_or(false);
                if exists {
                    debug!(file_name = %link.file_name, "already downloaded");
                    summary.skipped += 1;
                    on_event(DownloadEvent::Skipped {
                        file_name: link.file_name,
                    });
                    continue;
                }

                match self.fetch_media(&link, &path, &mut on_event).await {
                    Ok(bytes) => {
                        info!(url = %link.url, path = %path.display(), bytes, "downloaded");
                        summary.downloaded += 1;
                        on_event(DownloadEvent::Completed {
                            file_name: link.file_name,
                            path,
                            bytes,
                        });
                    }
                    Err(e) => {
                        warn!(url = %link.url, "download failed: {e}");
                        summary.failed += 1;
                        on_event(DownloadEvent::Failed {
                            file_name: link.file_name,
                            error: e,
                        });
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Stream one media file to `path`. A partially written file is removed on failure.
    async fn fetch_media(
        &self,
        link: &MediaLink,
        path: &Path,
        on_event: &mut dyn FnMut(DownloadEvent),
    ) -> Result<u64, AppError> {
        let (total, stream) = self.http_client.download_file_stream(&link.url).await?;
        let mut file = tokio::fs::File::create(path).await?;

        on_event(DownloadEvent::Started {
            file_name: link.file_name.clone(),
            total,
        });

        match write_body(&mut file, stream, &link.file_name, on_event).await {
            Ok(downloaded) => Ok(downloaded),
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(path).await {
                    warn!(path = %path.display(), "failed to remove partial file: {rm}");
                }
                Err(e)
            }
        }
    }
}

async fn write_body(
    file: &mut tokio::fs::File,
    stream: impl Stream<Item = crate::api::Result<Bytes>>,
    file_name: &str,
    on_event: &mut dyn FnMut(DownloadEvent),
) -> Result<u64, AppError> {
    let mut stream = Box::pin(stream);
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        on_event(DownloadEvent::Progress {
            file_name: file_name.to_string(),
            downloaded,
        });
    }
    file.sync_all().await?;

    Ok(downloaded)
}
