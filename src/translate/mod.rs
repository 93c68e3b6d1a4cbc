use async_trait::async_trait;
use thiserror::Error;

mod mymemory;

pub use mymemory::MyMemoryTranslate;

/// Every way a translation request can fail. Callers treat all of them the same;
/// the variants only make the logs useful.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Failed to make request")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse response")]
    ParseFailed(#[from] serde_json::Error),
    #[error("Api rejected the request with status {status}: {details}")]
    Rejected { status: String, details: String },
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, TranslateError>;
}
