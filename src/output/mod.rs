//! Output generation module for fwgen.
//!
//! This module renders rule sets into the supported target formats
//! (Terraform, shell script, LXD profile) and writes the results to disk.

pub mod formatter;
pub mod hcl;
pub mod profile;
pub mod script;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use formatter::{RenderContext, RenderError, RuleFormatter, create_formatter};

/// Mode applied to generated scripts.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Errors that can occur while writing output files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to set execute bit on {}: {source}", .path.display())]
    Permissions {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Destination for rendered documents.
pub trait ArtifactWriter {
    /// Creates `path` and writes `contents` to it.
    fn write(&self, path: &Path, contents: &str) -> Result<(), OutputError>;

    /// Marks `path` as executable.
    fn set_executable(&self, path: &Path) -> Result<(), OutputError>;
}

/// Writes rendered documents to their output paths.
///
/// Each file is created (truncating any previous content), written once and
/// closed before the call returns. Nothing is rolled back on failure.
#[derive(Debug, Default)]
pub struct OutputWriter;

impl OutputWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactWriter for OutputWriter {
    fn write(&self, path: &Path, contents: &str) -> Result<(), OutputError> {
        let mut file = File::create(path).map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        file.write_all(contents.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| OutputError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!("Wrote {} bytes to {}", contents.len(), path.display());

        Ok(())
    }

    /// Sets mode `0755`. On platforms without Unix permissions this is a no-op.
    fn set_executable(&self, path: &Path) -> Result<(), OutputError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE)).map_err(
                |source| OutputError::Permissions {
                    path: path.to_path_buf(),
                    source,
                },
            )?;
        }

        #[cfg(not(unix))]
        {
            log::debug!(
                "Skipping execute bit on {}: not supported on this platform",
                path.display()
            );
        }

        Ok(())
    }
}
