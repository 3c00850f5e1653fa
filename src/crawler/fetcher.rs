//! Page fetching over HTTP

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Errors raised while fetching a page; scoped to one URL so a failure never
/// takes down the whole crawl
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} fetching {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A successfully fetched page body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// Fetch collaborator the coordinator talks to
///
/// Trait-shaped so tests and embedders can substitute a canned fetcher. The
/// `render` flag asks for script-executed rendering; the HTTP fetcher has no
/// rendering backend and serves the raw body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, render: bool) -> Result<FetchedPage, FetchError>;
}

/// Plain HTTP fetcher backed by a shared reqwest client
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, render: bool) -> Result<FetchedPage, FetchError> {
        if render {
            tracing::debug!("render requested for {} but no rendering backend is configured", url);
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            url: url.clone(),
            status,
            body,
        })
    }
}
