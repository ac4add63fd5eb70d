// Rootline - tests/e2e_import.rs
//
// End-to-end tests for the import pipeline.
//
// These read real GEDCOM files from tests/fixtures through the same path
// the CLI uses (size check, lossy read, import, export) with no mocks.

use rootline::app::import_job::{run_import, write_export};
use rootline::core::export::ExportFormat;
use rootline::core::import::ImportOptions;
use rootline::core::model::{EventKind, Gender, ImportBatch, PersonRecord};
use rootline::core::narrative::{date_line, sorted_timeline};
use rootline::util::constants;
use std::collections::HashSet;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn import(name: &str, options: &ImportOptions) -> ImportBatch {
    run_import(&fixture(name), options, constants::DEFAULT_MAX_FILE_SIZE)
        .unwrap_or_else(|e| panic!("import of {name} failed: {e}"))
}

fn by_name<'a>(batch: &'a ImportBatch, name: &str) -> &'a PersonRecord {
    batch
        .profiles
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("{name} missing from import"))
}

fn names(batch: &ImportBatch) -> HashSet<&str> {
    batch.profiles.iter().map(|p| p.name.as_str()).collect()
}

// =============================================================================
// Generation window
// =============================================================================

/// The default window keeps four generations either side of the home person.
#[test]
fn e2e_default_window_keeps_four_generations() {
    let batch = import("carter_family.ged", &ImportOptions::new("owner-1"));

    assert_eq!(batch.profiles.len(), 9);
    let imported = names(&batch);
    assert!(imported.contains("John Carter"), "great-great-grandfather kept");
    assert!(!imported.contains("Seamus Carter"), "fifth generation dropped");
    assert!(!imported.contains("Unrelated Person"), "unreachable dropped");

    assert_eq!(batch.stats.individuals_parsed, 11);
    assert_eq!(batch.stats.families_parsed, 6);
    assert_eq!(batch.stats.individuals_reachable, 10);
    assert_eq!(batch.stats.profiles_imported, 9);
    assert_eq!(batch.stats.ignored_records, 3); // HEAD, SOUR, TRLR
    assert_eq!(batch.stats.malformed_lines, 0);
}

#[test]
fn e2e_narrow_window() {
    let options = ImportOptions {
        max_generations: 1,
        ..ImportOptions::new("owner-1")
    };
    let batch = import("carter_family.ged", &options);

    let expected: HashSet<&str> = [
        "Michael Carter",
        "Linda Hayes",
        "Emma Carter",
        "Robert Carter",
        "Mary Walsh",
    ]
    .into_iter()
    .collect();
    assert_eq!(names(&batch), expected);

    // Thomas is outside the window, so Robert has no parent links.
    assert!(by_name(&batch, "Robert Carter").parent_ids.is_empty());
}

#[test]
fn e2e_explicit_home_shifts_window() {
    let options = ImportOptions {
        max_generations: 1,
        home_xref: Some("@I8@".to_string()),
        ..ImportOptions::new("owner-1")
    };
    let batch = import("carter_family.ged", &options);

    // Agnes is reached through her son Robert (two below Patrick) and sits
    // one generation below Patrick herself.
    let expected: HashSet<&str> = [
        "Patrick Carter",
        "Thomas Carter",
        "John Carter",
        "Agnes Byrne",
    ]
    .into_iter()
    .collect();
    assert_eq!(names(&batch), expected);
    assert_eq!(
        batch.tree.home_person_id.as_ref(),
        Some(&by_name(&batch, "Patrick Carter").id)
    );
}

// =============================================================================
// Records and relationships
// =============================================================================

#[test]
fn e2e_person_fields() {
    let batch = import("carter_family.ged", &ImportOptions::new("owner-1"));

    let michael = by_name(&batch, "Michael Carter");
    assert_eq!(michael.user_id, "owner-1");
    assert_eq!(michael.gender, Gender::Male);
    assert_eq!(michael.birth_year, "1950");
    assert_eq!(michael.death_year, None);
    assert_eq!(michael.summary, "Archival record for Michael Carter.");
    assert!(michael.is_memorial);

    let robert = by_name(&batch, "Robert Carter");
    assert_eq!(robert.birth_year, "1920");
    assert_eq!(robert.death_year.as_deref(), Some("1990"));

    assert_eq!(by_name(&batch, "Linda Hayes").birth_year, "1952");
    assert_eq!(by_name(&batch, "Agnes Byrne").birth_year, "Unknown");
}

#[test]
fn e2e_relationships_symmetric() {
    let batch = import("carter_family.ged", &ImportOptions::new("owner-1"));
    let ids: HashSet<&str> = batch.profiles.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), batch.profiles.len(), "person ids must be unique");

    for person in &batch.profiles {
        for other in &batch.profiles {
            assert_eq!(
                person.parent_ids.contains(&other.id),
                other.child_ids.contains(&person.id),
                "{} / {}",
                person.name,
                other.name
            );
            assert_eq!(
                person.spouse_ids.contains(&other.id),
                other.spouse_ids.contains(&person.id),
                "{} / {}",
                person.name,
                other.name
            );
        }
        let linked = person
            .parent_ids
            .iter()
            .chain(&person.spouse_ids)
            .chain(&person.child_ids);
        for id in linked {
            assert!(ids.contains(id.as_str()), "dangling link {id} on {}", person.name);
        }
    }

    let michael = by_name(&batch, "Michael Carter");
    let linda = by_name(&batch, "Linda Hayes");
    let emma = by_name(&batch, "Emma Carter");
    assert!(michael.spouse_ids.contains(&linda.id));
    assert_eq!(emma.parent_ids.len(), 2);
    assert_eq!(michael.parent_ids.len(), 2);
}

#[test]
fn e2e_marriages_reconciled() {
    let batch = import("carter_family.ged", &ImportOptions::new("owner-1"));

    // The individual-level MARR matches the family's date and is merged.
    let michael = by_name(&batch, "Michael Carter");
    assert_eq!(michael.marriage_count(), 1);
    let marr = michael.timeline.iter().find(|e| e.is_marriage()).unwrap();
    assert_eq!(marr.date, "6 JUN 1975");
    assert_eq!(marr.place, "Chicago, Illinois");
    assert_eq!(marr.spouse_name.as_deref(), Some("Linda Hayes"));

    let linda = by_name(&batch, "Linda Hayes");
    let marr = linda.timeline.iter().find(|e| e.is_marriage()).unwrap();
    assert_eq!(marr.spouse_name.as_deref(), Some("Michael Carter"));

    // No wife in the family record.
    let patrick = by_name(&batch, "Patrick Carter");
    let marr = patrick.timeline.iter().find(|e| e.is_marriage()).unwrap();
    assert_eq!(marr.spouse_name.as_deref(), Some("Unknown"));

    // F6's husband is outside the window and gets nothing.
    assert_eq!(batch.stats.marriages_merged, 1);
    assert_eq!(batch.stats.marriages_added, 7);
}

#[test]
fn e2e_timeline_display() {
    let batch = import("carter_family.ged", &ImportOptions::new("owner-1"));
    let michael = by_name(&batch, "Michael Carter");

    let kinds: Vec<_> = sorted_timeline(&michael.timeline)
        .iter()
        .map(|e| e.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![EventKind::Birth, EventKind::Marriage, EventKind::Residence]
    );

    let birth = michael
        .timeline
        .iter()
        .find(|e| e.kind() == EventKind::Birth)
        .unwrap();
    assert_eq!(date_line(birth), "March 12, 1950 \u{2022} Boston, Massachusetts");
}

// =============================================================================
// Input quirks and export
// =============================================================================

#[test]
fn e2e_bom_and_crlf() {
    let batch = import("windows_bom.ged", &ImportOptions::new("owner-2"));
    assert_eq!(batch.profiles.len(), 3);

    let ana = by_name(&batch, "Ana Silva");
    assert_eq!(ana.birth_year, "1901");
    let birth = &ana.timeline[0];
    assert_eq!(birth.place, "Porto");
    assert_eq!(batch.tree.home_person_id.as_ref(), Some(&ana.id));

    let rita = by_name(&batch, "Rita Costa");
    assert_eq!(rita.gender, Gender::Unknown);
    assert_eq!(rita.parent_ids.len(), 2);
}

#[test]
fn e2e_export_csv_and_json_files() {
    let batch = import("carter_family.ged", &ImportOptions::new("owner-1"));
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("people.csv");
    let count = write_export(&batch, ExportFormat::Csv, Some(csv_path.as_path())).unwrap();
    assert_eq!(count, 9);
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 10, "header plus one row per profile");

    let json_path = dir.path().join("people.json");
    write_export(&batch, ExportFormat::Json, Some(json_path.as_path())).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["profiles"].as_array().map(Vec::len), Some(9));
    assert_eq!(value["tree"]["memberIds"].as_array().map(Vec::len), Some(9));
}
