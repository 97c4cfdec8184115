//! I/O utilities for whole-file reads and writes.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use super::error::ContainerError;

/// Classifies I/O errors into specific ContainerError variants.
pub fn classify_io_error(error: std::io::Error, context: &str) -> ContainerError {
    match error.kind() {
        ErrorKind::NotFound => ContainerError::NotFound(context.to_string()),
        ErrorKind::StorageFull | ErrorKind::OutOfMemory => {
            ContainerError::DiskFull(format!("{}: {}", context, error))
        }
        _ => ContainerError::Io(format!("{}: {}", context, error)),
    }
}

/// Writes `bytes` to a temporary sibling of `path`, syncs it, then renames
/// it into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ContainerError> {
    let context = path.display().to_string();
    let mut temp_name = path
        .file_name()
        .ok_or_else(|| ContainerError::Io(format!("{}: not a file path", context)))?
        .to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = File::create(&temp_path).map_err(|e| classify_io_error(e, &context))?;
    file.write_all(bytes)
        .map_err(|e| classify_io_error(e, &context))?;
    file.sync_all().map_err(|e| classify_io_error(e, &context))?;

    fs::rename(&temp_path, path).map_err(|e| classify_io_error(e, &context))?;
    Ok(())
}
