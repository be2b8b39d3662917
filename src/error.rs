//! Error types for catswp

use crate::source::SourceError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatSwipeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, CatSwipeError>;
