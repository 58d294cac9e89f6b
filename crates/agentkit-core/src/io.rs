use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// Replace content from the start of `start_marker` through the end of
/// `end_marker` with `replacement`.
///
/// Returns `false` (file unchanged) when the file or either marker is missing.
pub fn replace_between_markers(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(path)?;
    let Some(start_pos) = content.find(start_marker) else {
        return Ok(false);
    };
    let search_from = start_pos + start_marker.len();
    let Some(end_offset) = content[search_from..].find(end_marker) else {
        return Ok(false);
    };
    let end_pos = search_from + end_offset + end_marker.len();

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..start_pos]);
    updated.push_str(replacement);
    updated.push_str(&content[end_pos..]);

    atomic_write(path, updated.as_bytes())?;
    Ok(true)
}

/// Append text to a file, creating it if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}
