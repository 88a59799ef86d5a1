// utils/output.rs

//! # Output Utility Module
//!
//! Persists the fetched plan document. The bytes are written exactly as the
//! service returned them: no parsing, no reformatting.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{AppError, AppResult};
use crate::run::PlanDocument;

/// Writes `document` to `path`, creating the file or truncating an existing one.
///
/// # Errors
/// Returns [`AppError::Write`] on any filesystem failure. A failed write may
/// leave a truncated file behind; re-running the tool overwrites it.
pub fn write_plan(path: &Path, document: &PlanDocument) -> AppResult<()> {
    debug!("Writing {} bytes to {}", document.len(), path.display());
    fs::write(path, document.as_bytes()).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}
