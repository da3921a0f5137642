use futures::Stream;
use futures::TryStreamExt;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::models::ClientConfig;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{0}")]
    StatusError(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent).build()?;
        Ok(Self { client })
    }

    /// Fetch a page and return its body as text.
    /// Non-2xx responses are errors.
    pub async fn fetch_page(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()
            .map_err(|e| FetchError::StatusError(e.to_string()))?;

        Ok(response.text().await?)
    }

    /// Start a streaming download.
    /// Returns (content length, body stream)
    pub async fn download_file_stream(
        &self,
        url: &Url,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        debug!(%url, "starting download");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()
            .map_err(|e| FetchError::StatusError(e.to_string()))?;

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(FetchError::RequestError);

        Ok((total_size, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn client() -> HttpClient {
        HttpClient::new(ClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/index.html")
            .with_status(200)
            .with_body("<html><body>hello</body></html>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/index.html", server.url())).unwrap();
        let body = client().fetch_page(&url).await.unwrap();

        assert!(body.contains("hello"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", "media-scrape-test/1.0")
            .with_status(200)
            .create_async()
            .await;

        let client = HttpClient::new(ClientConfig {
            user_agent: "media-scrape-test/1.0".to_string(),
        })
        .unwrap();
        let url = Url::parse(&server.url()).unwrap();
        client.fetch_page(&url).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.html")
            .with_status(404)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing.html", server.url())).unwrap();
        let err = client().fetch_page(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::StatusError(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_page_reports_connection_error() {
        // Port 9 (discard) is not served by anything in the test environment.
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = client().fetch_page(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::RequestError(_)));
    }

    #[tokio::test]
    async fn test_download_file_stream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/clip.mp4")
            .with_status(200)
            .with_body(vec![7u8; 20_000])
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/clip.mp4", server.url())).unwrap();
        let (total, stream) = client().download_file_stream(&url).await.unwrap();
        let chunks: Vec<_> = stream.collect().await;
        let received: usize = chunks.into_iter().map(|c| c.unwrap().len()).sum();

        assert_eq!(total, Some(20_000));
        assert_eq!(received, 20_000);
    }
}
