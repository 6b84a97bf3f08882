use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::key::CompleteKey;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads a whole file as UTF-8, dropping a leading byte order mark.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read text");

    Ok(match text.strip_prefix(BYTE_ORDER_MARK) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

pub fn write_text(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the key file: 26 `<cipher> -> <plain>` lines.
pub fn write_key(path: impl AsRef<Path>, key: &CompleteKey) -> Result<()> {
    write_text(path, &key.to_string())
}
