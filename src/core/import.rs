// Rootline - core/import.rs
//
// The import pipeline: parse -> generation traversal -> materialise ->
// reconcile marriages -> assemble the staged tree.
//
// Pure, synchronous, infallible. Text in, a self-contained batch out; the
// caller owns the result and merges it into its own collections.

use crate::core::generation::{calculate_generations, GenerationMap};
use crate::core::ids::{IdGenerator, PlaceholderPortraits, PortraitProvider, StampedIds};
use crate::core::materialize::{materialize, MaterializeParams};
use crate::core::model::{ImportBatch, ImportStats, ImportTree};
use crate::core::parser::{parse_gedcom, ParsedGedcom};
use crate::core::reconcile::reconcile_marriages;
use crate::util::constants;
use chrono::{DateTime, Utc};

/// Caller-supplied settings for one import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Owning user id stamped on every record and on the tree.
    pub owner_id: String,
    /// Maximum absolute generation distance from the home individual.
    pub max_generations: u32,
    /// Explicit traversal root (cross-reference, with or without `@`).
    /// Defaults to the first INDI record in the file.
    pub home_xref: Option<String>,
    /// Base URL for placeholder portraits.
    pub portrait_base_url: String,
}

impl ImportOptions {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            owner_id: String::new(),
            max_generations: constants::DEFAULT_MAX_GENERATIONS,
            home_xref: None,
            portrait_base_url: constants::DEFAULT_PORTRAIT_BASE_URL.to_string(),
        }
    }
}

/// Imports a GEDCOM text using the current time, random-suffixed ids and
/// placeholder portraits from `options.portrait_base_url`.
pub fn import_gedcom(text: &str, options: &ImportOptions) -> ImportBatch {
    let now = Utc::now();
    let mut ids = StampedIds::new(now.timestamp_millis());
    let portraits = PlaceholderPortraits::new(options.portrait_base_url.clone());
    import_gedcom_with(text, options, now, &mut ids, &portraits)
}

/// Imports a GEDCOM text with explicit collaborators.
///
/// `now` fixes the import instant: it seeds every person id and the tree's
/// creation time, so two calls with the same inputs produce the same ids.
pub fn import_gedcom_with(
    text: &str,
    options: &ImportOptions,
    now: DateTime<Utc>,
    ids: &mut dyn IdGenerator,
    portraits: &dyn PortraitProvider,
) -> ImportBatch {
    let stamp = now.timestamp_millis();
    let parsed = parse_gedcom(text, ids);

    let home = resolve_home(&parsed, options.home_xref.as_deref());
    let generations = match home.as_deref() {
        Some(home) => calculate_generations(&parsed, home),
        None => GenerationMap::default(),
    };

    let params = MaterializeParams {
        owner_id: &options.owner_id,
        max_generations: options.max_generations,
        import_stamp: stamp,
    };
    let mut graph = materialize(&parsed, &generations, &params, portraits);
    let reconciled = reconcile_marriages(&parsed, &mut graph, ids);

    let home_person_id = home
        .as_deref()
        .and_then(|xref| graph.person_id(xref))
        .cloned();

    let stats = ImportStats {
        lines_processed: parsed.lines_processed,
        malformed_lines: parsed.malformed_lines,
        ignored_records: parsed.ignored_records,
        individuals_parsed: parsed.individuals().len(),
        families_parsed: parsed.families().len(),
        individuals_reachable: generations.len(),
        profiles_imported: graph.len(),
        marriages_added: reconciled.added,
        marriages_merged: reconciled.merged,
    };

    let profiles = graph.into_persons();
    let tree = ImportTree {
        id: format!("tree-{stamp}"),
        user_id: options.owner_id.clone(),
        name: constants::IMPORT_TREE_NAME.to_string(),
        created_at: now,
        home_person_id,
        member_ids: profiles.iter().map(|p| p.id.clone()).collect(),
    };

    if tree.home_person_id.is_none() && home.is_some() {
        tracing::warn!(
            max_generations = options.max_generations,
            "Home individual fell outside the generation window"
        );
    }

    tracing::info!(
        individuals = stats.individuals_parsed,
        families = stats.families_parsed,
        reachable = stats.individuals_reachable,
        imported = stats.profiles_imported,
        "GEDCOM import complete"
    );

    ImportBatch {
        profiles,
        tree,
        stats,
    }
}

/// Picks the traversal root: the requested key if the file has it,
/// otherwise the first individual.
fn resolve_home(parsed: &ParsedGedcom, requested: Option<&str>) -> Option<String> {
    if let Some(requested) = requested {
        let key = crate::core::parser::strip_xref(requested);
        if parsed.individual(&key).is_some() {
            return Some(key);
        }
        tracing::warn!(
            requested = %key,
            "Requested home individual not found; using first individual in file"
        );
    }
    parsed.first_individual.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::SequentialIds;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn run(text: &str, options: &ImportOptions) -> ImportBatch {
        import_gedcom_with(
            text,
            options,
            fixed_now(),
            &mut SequentialIds::default(),
            &PlaceholderPortraits::default(),
        )
    }

    /// One family: husband + wife + one child, no dates.
    const NUCLEAR: &str = "\
0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
1 FAMS @F1@
0 @I2@ INDI
1 NAME Jane /Roe/
1 SEX F
1 FAMS @F1@
0 @I3@ INDI
1 NAME Jim /Doe/
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 MARR
0 TRLR
";

    #[test]
    fn test_nuclear_family_import() {
        let options = ImportOptions {
            max_generations: 1,
            ..ImportOptions::new("user-7")
        };
        let batch = run(NUCLEAR, &options);
        assert_eq!(batch.profiles.len(), 3);

        let by_name = |name: &str| {
            batch
                .profiles
                .iter()
                .find(|p| p.name == name)
                .unwrap_or_else(|| panic!("{name} should be imported"))
        };
        let john = by_name("John Doe");
        let jane = by_name("Jane Roe");
        let jim = by_name("Jim Doe");

        assert_eq!(jim.parent_ids.len(), 2);
        for (parent, other) in [(john, jane), (jane, john)] {
            assert_eq!(parent.spouse_ids.len(), 1);
            assert!(parent.spouse_ids.contains(&other.id));
            assert_eq!(parent.child_ids.len(), 1);
            assert!(parent.child_ids.contains(&jim.id));
            let marriages: Vec<_> = parent.timeline.iter().filter(|e| e.is_marriage()).collect();
            assert_eq!(marriages.len(), 1);
            assert_eq!(marriages[0].spouse_name.as_deref(), Some(other.name.as_str()));
        }
        assert_eq!(jim.marriage_count(), 0);
    }

    #[test]
    fn test_tree_record() {
        let batch = run(NUCLEAR, &ImportOptions::new("user-7"));
        let stamp = fixed_now().timestamp_millis();
        assert_eq!(batch.tree.id, format!("tree-{stamp}"));
        assert_eq!(batch.tree.user_id, "user-7");
        assert_eq!(batch.tree.name, "Staged Import Tree");
        assert_eq!(batch.tree.created_at, fixed_now());
        assert_eq!(
            batch.tree.home_person_id.as_deref(),
            Some(format!("imp-{stamp}-I1").as_str())
        );
        let ids: Vec<_> = batch.profiles.iter().map(|p| p.id.clone()).collect();
        assert_eq!(batch.tree.member_ids, ids);
    }

    #[test]
    fn test_zero_generations_keeps_generation_zero() {
        let options = ImportOptions {
            max_generations: 0,
            ..ImportOptions::new("u")
        };
        let batch = run(NUCLEAR, &options);
        // Jane shares generation 0 with John through their child.
        let names: Vec<_> = batch.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["John Doe", "Jane Roe"]);
        assert_eq!(batch.tree.member_ids.len(), 2);
        assert!(batch.profiles.iter().all(|p| p.child_ids.is_empty()));
    }

    #[test]
    fn test_zero_generations_without_co_parent_keeps_only_home() {
        let options = ImportOptions {
            max_generations: 0,
            ..ImportOptions::new("u")
        };
        let text = "0 @A@ INDI\n1 FAMS @F@\n0 @B@ INDI\n1 FAMC @F@\n0 @F@ FAM\n1 HUSB @A@\n1 CHIL @B@\n";
        let batch = run(text, &options);
        assert_eq!(batch.profiles.len(), 1);
        assert_eq!(batch.tree.member_ids.len(), 1);
    }

    #[test]
    fn test_explicit_home() {
        let options = ImportOptions {
            max_generations: 0,
            home_xref: Some("@I3@".to_string()),
            ..ImportOptions::new("u")
        };
        let batch = run(NUCLEAR, &options);
        assert_eq!(batch.profiles.len(), 1);
        assert_eq!(batch.profiles[0].name, "Jim Doe");
    }

    #[test]
    fn test_unknown_explicit_home_falls_back_to_first() {
        let options = ImportOptions {
            max_generations: 0,
            home_xref: Some("I404".to_string()),
            ..ImportOptions::new("u")
        };
        let batch = run(NUCLEAR, &options);
        assert_eq!(batch.profiles[0].name, "John Doe");
    }

    #[test]
    fn test_empty_input_yields_empty_batch() {
        let batch = run("", &ImportOptions::new("u"));
        assert!(batch.profiles.is_empty());
        assert!(batch.tree.home_person_id.is_none());
        assert!(batch.tree.member_ids.is_empty());
    }

    #[test]
    fn test_no_individuals_yields_empty_batch() {
        let batch = run("0 HEAD\n0 @F1@ FAM\n1 HUSB @I1@\n0 TRLR\n", &ImportOptions::new("u"));
        assert!(batch.profiles.is_empty());
        assert!(batch.tree.home_person_id.is_none());
        assert_eq!(batch.stats.families_parsed, 1);
    }

    #[test]
    fn test_stats_are_populated() {
        let batch = run(NUCLEAR, &ImportOptions::new("u"));
        assert_eq!(batch.stats.individuals_parsed, 3);
        assert_eq!(batch.stats.families_parsed, 1);
        assert_eq!(batch.stats.individuals_reachable, 3);
        assert_eq!(batch.stats.profiles_imported, 3);
        assert_eq!(batch.stats.ignored_records, 2); // HEAD, TRLR
        assert_eq!(batch.stats.marriages_added, 2);
    }

    #[test]
    fn test_person_ids_unique() {
        let batch = run(NUCLEAR, &ImportOptions::new("u"));
        let mut ids: Vec<_> = batch.profiles.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), batch.profiles.len());
    }

    #[test]
    fn test_default_import_uses_current_time() {
        let before = Utc::now();
        let batch = import_gedcom(NUCLEAR, &ImportOptions::new("u"));
        assert!(batch.tree.created_at >= before);
        assert!(batch.profiles[0].timeline.iter().all(|e| e.id.starts_with("ev")));
    }
}
