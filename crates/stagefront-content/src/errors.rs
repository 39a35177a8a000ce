use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("content store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content store payload malformed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("not found")]
    NotFound,
    #[error("invalid asset reference: {0}")]
    InvalidAssetRef(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("fixture read failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
