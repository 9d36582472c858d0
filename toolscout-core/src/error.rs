use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Invalid fingerprint encoding: {0}")]
    InvalidFingerprint(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
