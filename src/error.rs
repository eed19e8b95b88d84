// src/error.rs
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("output directory {} already exists (use --force to replace it)", path.display())]
    OutputExists { path: PathBuf },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CliResult<T> = Result<T, CliError>;

/// Ensures `dir` is a fresh, empty directory. An existing directory is an
/// error unless `force` is set, in which case it is removed first.
pub fn claim_output_dir(dir: &Path, force: bool) -> CliResult<()> {
    let io = |source| CliError::Io { path: dir.to_path_buf(), source };
    if dir.exists() {
        if !force {
            return Err(CliError::OutputExists { path: dir.to_path_buf() });
        }
        tracing::warn!("Removing existing output directory {}", dir.display());
        if dir.is_dir() {
            fs::remove_dir_all(dir).map_err(io)?;
        } else {
            fs::remove_file(dir).map_err(io)?;
        }
    }
    fs::create_dir_all(dir).map_err(io)
}
