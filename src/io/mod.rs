//! Output helpers.
//!
//! - belt/slice CSV exports (`export`)
//! - JSON run summary (`summary`)

pub mod export;
pub mod summary;

pub use export::*;
pub use summary::*;

use std::fs::File;
use std::path::Path;

use crate::error::AppError;

/// Create `path` for writing, creating missing parent directories first.
fn create_output(path: &Path, what: &str) -> Result<File, AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(4, format!("Failed to create directory '{}' for {what}: {e}", parent.display()))
        })?;
    }
    File::create(path).map_err(|e| AppError::new(4, format!("Failed to create {what} '{}': {e}", path.display())))
}
