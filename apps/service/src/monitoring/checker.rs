use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes of a single reachability attempt.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unexpected status code {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for CheckError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

/// Checker trait for a single reachability attempt against one target
#[async_trait]
pub trait Checker: Send + Sync {
    /// Perform the check and return latency in milliseconds
    async fn check(&self, target: &str) -> Result<u64, CheckError>;
}

/// HTTP checker
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &str) -> Result<u64, CheckError> {
        let start = Instant::now();

        let response = self.client.get(target).send().await?;

        let latency = start.elapsed().as_millis() as u64;

        // Only an exact 200 counts as reachable
        if response.status() == StatusCode::OK {
            Ok(latency)
        } else {
            Err(CheckError::Status(response.status().as_u16()))
        }
    }
}
