//! reqwest-backed [`DataFetcher`].

use std::future::Future;
use std::pin::Pin;

use bicycle_transit::{BikeShareError, DataFetcher};
use tracing::debug;

use crate::config::{HTTP_TIMEOUT, USER_AGENT};
use crate::error::Result;

/// Shared HTTP client with standard configuration
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl DataFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = bicycle_transit::Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            debug!("GET {url}");

            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|e| BikeShareError::Fetch(e.to_string()))?;

            let body = response
                .bytes()
                .await
                .map_err(|e| BikeShareError::Fetch(e.to_string()))?;

            debug!("GET {url}: {} bytes", body.len());
            Ok(body.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpFetcher::new().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_unparseable_url() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(BikeShareError::Fetch(_))));
    }
}
