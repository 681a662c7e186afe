use std::path::PathBuf;

use thiserror::Error;

use crate::output::{OutputError, RenderError};
use crate::rules::DecodeError;

#[derive(Error, Debug)]
pub enum FwgenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to open rule file {}: {source}", .path.display())]
    InputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse rule file {}: {source}", .path.display())]
    Decode { path: PathBuf, source: DecodeError },

    #[error("{0}")]
    Output(#[from] OutputError),

    #[error("Failed to render {target} output: {source}")]
    Render {
        target: crate::rules::TargetFormat,
        source: RenderError,
    },
}

pub type Result<T> = std::result::Result<T, FwgenError>;
