//! Small filesystem helpers mapping failures onto [`ScaffoldError::Io`]

use crate::error::{Result, ScaffoldError};
use std::fs;
use std::path::Path;

/// Write `content` to `path`, creating missing parent directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| ScaffoldError::io(path, e))
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))
}

/// Read `path`, treating a missing file as empty
pub fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ScaffoldError::io(path, e)),
    }
}
