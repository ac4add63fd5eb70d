// Rootline - core/export.rs
//
// CSV and JSON export of an import batch.
// Core layer: writes to any Write trait object.

use crate::core::model::{ImportBatch, PersonRecord};
use crate::util::error::ExportError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Output format for an exported batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format '{other}' (expected json or csv)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

fn join_ids(ids: &BTreeSet<String>) -> String {
    ids.iter().map(String::as_str).collect::<Vec<_>>().join(";")
}

/// Export profiles to CSV, one row per person.
///
/// Writes: id, name, gender, birth_year, death_year, parents, spouses,
/// children, events. Relation columns hold `;`-joined ids; `events` is
/// the timeline length.
pub fn export_csv<W: Write>(
    profiles: &[PersonRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "id",
            "name",
            "gender",
            "birth_year",
            "death_year",
            "parents",
            "spouses",
            "children",
            "events",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for person in profiles {
        csv_writer
            .write_record([
                person.id.as_str(),
                person.name.as_str(),
                person.gender.code(),
                person.birth_year.as_str(),
                person.death_year.as_deref().unwrap_or(""),
                &join_ids(&person.parent_ids),
                &join_ids(&person.spouse_ids),
                &join_ids(&person.child_ids),
                &person.timeline.len().to_string(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export the whole batch (profiles, tree, stats) as pretty JSON.
pub fn export_json<W: Write>(
    batch: &ImportBatch,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, batch).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(batch.profiles.len())
}

/// Export `batch` in `format`. Returns the number of profiles written.
pub fn export_batch<W: Write>(
    batch: &ImportBatch,
    format: ExportFormat,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let count = match format {
        ExportFormat::Json => export_json(batch, writer, export_path)?,
        ExportFormat::Csv => export_csv(&batch.profiles, writer, export_path)?,
    };
    tracing::debug!(format = %format, count, path = %export_path.display(), "Batch exported");
    Ok(count)
}
