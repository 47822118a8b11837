use crate::domain::ports::FeedSource;
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Store feed served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: Client,
    url: String,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Making feed request to: {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Feed response status: {}", status);
        if !status.is_success() {
            return Err(LocatorError::FeedStatusError {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?;
        tracing::debug!("Feed body: {} bytes", body.len());
        Ok(body.to_vec())
    }
}

/// Store feed read from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading feed file: {}", self.path.display());
        let data = tokio::fs::read(&self.path).await?;
        Ok(data)
    }
}

/// `http://` and `https://` locations are fetched over the network, anything
/// else is treated as a file path.
pub fn feed_source_for(location: &str, timeout: Duration) -> Result<Box<dyn FeedSource>> {
    if is_remote(location) {
        Ok(Box::new(HttpFeed::new(location, timeout)?))
    } else {
        Ok(Box::new(FileFeed::new(location)))
    }
}

pub fn is_remote(location: &str) -> bool {
    let lowered = location.trim_start().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_http_feed_returns_body() {
        let server = MockServer::start();
        let feed_mock = server.mock(|when, then| {
            when.method(GET).path("/stores.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"type":"FeatureCollection","features":[]}"#);
        });

        let feed = HttpFeed::new(server.url("/stores.json"), Duration::from_secs(5)).unwrap();
        let body = feed.fetch().await.unwrap();

        feed_mock.assert();
        assert!(String::from_utf8(body).unwrap().contains("FeatureCollection"));
    }

    #[tokio::test]
    async fn test_http_feed_reports_status() {
        let server = MockServer::start();
        let feed_mock = server.mock(|when, then| {
            when.method(GET).path("/missing.json");
            then.status(404);
        });

        let feed = HttpFeed::new(server.url("/missing.json"), Duration::from_secs(5)).unwrap();
        let err = feed.fetch().await.unwrap_err();

        feed_mock.assert();
        match err {
            LocatorError::FeedStatusError { status, url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/missing.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_file_feed_reads_bytes() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{\"features\": []}").unwrap();

        let feed = FileFeed::new(temp_file.path());
        let body = tokio_test::block_on(feed.fetch()).unwrap();
        assert_eq!(body, b"{\"features\": []}");
    }

    #[test]
    fn test_feed_source_selection() {
        assert!(is_remote("https://example.com/stores.json"));
        assert!(is_remote("HTTP://example.com/stores.json"));
        assert!(!is_remote("public/stores.json"));

        let source = feed_source_for("public/stores.json", Duration::from_secs(1)).unwrap();
        assert_eq!(source.describe(), "public/stores.json");
    }
}
