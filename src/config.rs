use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::FwgenError;
use crate::output::RenderContext;

#[derive(Debug)]
pub struct Config {
    pub no_color: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub rules_file: PathBuf,
    pub terraform_output: PathBuf,
    pub script_output: PathBuf,
    /// `None` when the profile is disabled
    pub profile_output: Option<PathBuf>,
    pub container_name: String,
    pub security_group: String,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, FwgenError> {
        Self::validate_name("Container name", &cli.container)?;
        Self::validate_name("Security group name", &cli.security_group)?;

        let profile_output = if cli.no_profile {
            None
        } else {
            Some(Self::resolve_path(&cli.profile)?)
        };

        Ok(Self {
            no_color: cli.no_color,
            verbose: cli.verbose,
            quiet: cli.quiet,
            rules_file: Self::resolve_path(&cli.config)?,
            terraform_output: Self::resolve_path(&cli.terraform)?,
            script_output: Self::resolve_path(&cli.script)?,
            profile_output,
            container_name: cli.container,
            security_group: cli.security_group,
        })
    }

    /// Naming parameters shared by every formatter.
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            container_name: self.container_name.clone(),
            security_group: self.security_group.clone(),
        }
    }

    /// Resolves a path to an absolute path.
    /// - Absolute paths are returned as-is
    /// - Relative paths are resolved relative to current directory
    pub fn resolve_path(path: &Path) -> Result<PathBuf, FwgenError> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().map_err(|e| {
                FwgenError::Config(format!("Cannot determine current directory: {}", e))
            })?;
            Ok(current_dir.join(path))
        }
    }

    fn validate_name(label: &str, value: &str) -> Result<(), FwgenError> {
        if value.is_empty() {
            return Err(FwgenError::Config(format!("{} must not be empty", label)));
        }

        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(FwgenError::Config(format!(
                "{} must not contain whitespace: {:?}",
                label, value
            )));
        }

        Ok(())
    }
}
