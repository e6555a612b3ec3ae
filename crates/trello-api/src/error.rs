use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    #[error("invalid API base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),
}
