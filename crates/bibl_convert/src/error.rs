use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed bibliography: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
