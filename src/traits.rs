use crate::model::{BreakingChangeAnalysis, DependencyUpdate, SecurityAnalysis};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Detector unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid detector response: {0}")]
    InvalidResponse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown error: {0}")]
    Unknown(String),
}

#[derive(Error, Debug)]
pub enum AssessError {
    #[error("Concurrency error: {0}")]
    Concurrency(String),
    #[error("Detector task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait BreakingChangeDetector: Send + Sync {
    /// Returns the identifier of this detector (e.g., "changelog", "api-diff").
    fn detector_id(&self) -> &str;

    /// Inspects changelogs or diffs for the update and reports severity-tagged indicators.
    async fn detect(&self, update: &DependencyUpdate)
        -> Result<BreakingChangeAnalysis, DetectorError>;
}

#[async_trait]
pub trait SecurityDetector: Send + Sync {
    /// Returns the identifier of this detector (e.g., "osv", "github-advisory").
    fn detector_id(&self) -> &str;

    /// Looks up vulnerabilities fixed or introduced by the update.
    async fn detect(&self, update: &DependencyUpdate) -> Result<SecurityAnalysis, DetectorError>;
}
