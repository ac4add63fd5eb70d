// Rootline - platform/fs.rs
//
// Filesystem helpers for reading GEDCOM sources and writing exports.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

/// Read the full content of a file as a string.
///
/// GEDCOM exports from older tools are frequently ANSEL or Latin-1; invalid
/// UTF-8 is replaced rather than rejected.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    if std::str::from_utf8(&bytes).is_err() {
        tracing::debug!(path = %path.display(), "Source is not valid UTF-8; decoding lossily");
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Size of the file at `path` in bytes.
pub fn file_size(path: &Path) -> io::Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

/// Create (or truncate) `path` for buffered writing.
pub fn create_output(path: &Path) -> io::Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}
