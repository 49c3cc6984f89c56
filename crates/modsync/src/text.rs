//! Line-oriented text document helpers

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::error::{FileOperation, Result, SyncError};

/// Convert `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Make the text end with exactly one `\n`
pub fn with_single_trailing_newline(text: &str) -> String {
    let mut out = text.trim_end_matches('\n').to_string();
    out.push('\n');
    out
}

/// Read a UTF-8 text file that a step requires to exist
pub async fn read_required(path: &Path, purpose: &str) -> Result<String> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(SyncError::MissingFile {
            path: path.to_path_buf(),
            purpose: purpose.to_string(),
        }),
        Err(e) => Err(SyncError::io(path, FileOperation::Read, e)),
    }
}

pub async fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text)
        .await
        .map_err(|e| SyncError::io(path, FileOperation::Write, e))
}
