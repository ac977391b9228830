use std::fs;
use std::path::{Path, PathBuf};

use crate::IclError;

/// Expand a leading `~/` to the home directory.
pub(super) fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

pub(super) fn read_file(path: &Path) -> Result<String, IclError> {
    let resolved = resolve_path(path);
    fs::read_to_string(&resolved).map_err(|e| file_error(&resolved, format!("failed to read file: {}", e)))
}

pub(super) fn write_file(path: &Path, content: &str) -> Result<(), IclError> {
    let resolved = resolve_path(path);
    fs::write(&resolved, content).map_err(|e| file_error(&resolved, format!("failed to write file: {}", e)))
}

fn file_error(path: &Path, message: String) -> IclError {
    IclError::File {
        path: path.to_string_lossy().to_string(),
        message,
    }
}
