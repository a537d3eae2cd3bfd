use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("API key contains characters that cannot be sent in a header")]
    InvalidApiKey,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
