// Rootline - app/import_job.rs
//
// One import run end to end: validate and read the source file, run the
// core pipeline, and write the export.
//
// File errors are fatal for the run. Transient read errors are retried
// with a short capped backoff before giving up.

use crate::core::export::{export_batch, ExportFormat};
use crate::core::import::{import_gedcom, ImportOptions};
use crate::core::model::ImportBatch;
use crate::platform::fs;
use crate::util::error::{ExportError, ImportError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry limits for transient I/O errors.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// Reads a GEDCOM source after checking it exists and is within `max_size`.
pub fn load_source(path: &Path, max_size: u64) -> Result<String, ImportError> {
    if !path.exists() {
        return Err(ImportError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let size = fs::file_size(path).map_err(|e| ImportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if size > max_size {
        return Err(ImportError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size,
        });
    }

    let text = read_with_retry(path).map_err(|e| ImportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(file = %path.display(), bytes = size, "GEDCOM source loaded");
    Ok(text)
}

/// Imports the GEDCOM file at `path`.
pub fn run_import(
    path: &Path,
    options: &ImportOptions,
    max_size: u64,
) -> Result<ImportBatch, ImportError> {
    let text = load_source(path, max_size)?;
    let batch = import_gedcom(&text, options);
    tracing::info!(
        file = %path.display(),
        profiles = batch.profiles.len(),
        "Import finished"
    );
    Ok(batch)
}

/// Writes `batch` to `output`, or to stdout when no path is given.
pub fn write_export(
    batch: &ImportBatch,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<usize, ExportError> {
    match output {
        Some(path) => {
            let mut writer = fs::create_output(path).map_err(|e| ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            let count = export_batch(batch, format, &mut writer, path)?;
            writer.flush().map_err(|e| ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(count)
        }
        None => {
            let stdout_path = PathBuf::from("<stdout>");
            let mut lock = io::stdout().lock();
            let count = export_batch(batch, format, &mut lock, &stdout_path)?;
            // JSON output has no trailing newline of its own.
            if format == ExportFormat::Json {
                writeln!(lock).map_err(|e| ExportError::Io {
                    path: stdout_path,
                    source: e,
                })?;
            }
            Ok(count)
        }
    }
}

fn read_with_retry(path: &Path) -> io::Result<String> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match fs::read_file_lossy(path) {
            Ok(content) => return Ok(content),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "0 @I1@ INDI\n1 NAME Solo /Person/\n";

    fn write_source(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_import(&dir.path().join("none.ged"), &ImportOptions::new("u"), 1024)
            .unwrap_err();
        assert!(matches!(err, ImportError::NotFound { .. }));
    }

    #[test]
    fn test_file_too_large() {
        let file = write_source(SMALL);
        let err = run_import(file.path(), &ImportOptions::new("u"), 4).unwrap_err();
        match err {
            ImportError::FileTooLarge { size, max_size, .. } => {
                assert_eq!(size, SMALL.len() as u64);
                assert_eq!(max_size, 4);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_run_import() {
        let file = write_source(SMALL);
        let batch = run_import(file.path(), &ImportOptions::new("u"), 1024).unwrap();
        assert_eq!(batch.profiles.len(), 1);
        assert_eq!(batch.profiles[0].name, "Solo Person");
    }

    #[test]
    fn test_write_export_to_file() {
        let file = write_source(SMALL);
        let batch = run_import(file.path(), &ImportOptions::new("u"), 1024).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("people.csv");
        let count = write_export(&batch, ExportFormat::Csv, Some(out.as_path())).unwrap();
        assert_eq!(count, 1);
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("Solo Person"));
    }

    #[test]
    fn test_write_export_bad_directory() {
        let file = write_source(SMALL);
        let batch = run_import(file.path(), &ImportOptions::new("u"), 1024).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("out.json");
        let err = write_export(&batch, ExportFormat::Json, Some(out.as_path())).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
