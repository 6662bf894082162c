use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("body serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid room alias: {0:?}")]
    InvalidAlias(String),
}
