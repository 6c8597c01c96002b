//! Error types for the stemma-export codecs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xml write error: {0}")]
  Xml(#[from] std::io::Error),

  #[error("xml output is not valid UTF-8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),

  #[error("registry error: {0}")]
  Core(#[from] stemma_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
