//! Where the raw sheet text comes from.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::SheetConfig;
use crate::error::{Error, Result};

/// A provider of the raw CSV export.
///
/// The production implementation is [`HttpSheetSource`]; tests substitute an
/// in-memory source.
#[async_trait]
pub trait SheetSource: Send + Sync + std::fmt::Debug {
    /// Fetch the full CSV document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be retrieved.
    async fn fetch(&self) -> Result<String>;

    /// Human-readable description of the source (for logging).
    fn describe(&self) -> String;
}

/// Fetches the published sheet over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSheetSource {
    /// Create a source for `url` with a per-request deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tablefinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a source from the sheet section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SheetConfig) -> Result<Self> {
        Self::new(config.csv_url.clone(), config.fetch_timeout())
    }

    /// The URL this source reads from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch(&self) -> Result<String> {
        let fetch_err = |source| Error::Fetch {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(fetch_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(fetch_err)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a local port.
    async fn one_shot_server(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/sheet.csv")
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let url = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 20\r\nConnection: close\r\n\r\nName,Table\nBob Lee,7",
        )
        .await;
        let source = HttpSheetSource::new(url, Duration::from_secs(5)).unwrap();

        let body = source.fetch().await.unwrap();
        assert_eq!(body, "Name,Table\nBob Lee,7");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let url = one_shot_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let source = HttpSheetSource::new(url, Duration::from_secs(5)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, Error::UpstreamStatus { status: 404, .. }));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_fetch_truncated_body() {
        // Promises 100 bytes, sends 10, then closes
        let url = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 100\r\nConnection: close\r\n\r\nName,Table",
        )
        .await;
        let source = HttpSheetSource::new(url, Duration::from_secs(5)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
        assert!(err.is_upstream());
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        // Accept the connection but never answer
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let source =
            HttpSheetSource::new(format!("http://{addr}/"), Duration::from_millis(200)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.is_upstream());
    }

    #[test]
    fn test_from_config() {
        let config = SheetConfig::default();
        let source = HttpSheetSource::from_config(&config).unwrap();

        assert_eq!(source.url(), config.csv_url);
        assert_eq!(source.describe(), config.csv_url);
    }
}
