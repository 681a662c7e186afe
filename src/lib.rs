pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod output;
pub mod rules;

pub use error::{FwgenError, Result};
