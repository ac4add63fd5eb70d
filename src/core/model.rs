// Rootline - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the persisted shapes handed back to the caller after an
// import: person records, their timelines, and the staged import tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable identifier of a materialised person record.
pub type PersonId = String;

// =============================================================================
// Gender
// =============================================================================

/// Recorded gender of an individual, mapped from the GEDCOM `SEX` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    /// Maps a raw `SEX` value: `M`/`F` (case-insensitive), anything else is Unknown.
    pub fn from_sex_value(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "M" => Gender::Male,
            "F" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    /// Single-letter code as written in GEDCOM.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "U",
        }
    }

    /// Lower-case key, used for placeholder portraits.
    pub fn key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

// =============================================================================
// Event kind
// =============================================================================

/// Semantic type of a life event. Serialised as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Birth,
    Death,
    Burial,
    Residence,
    #[serde(rename = "Departure/Emigration")]
    Emigration,
    #[serde(rename = "Arrival/Immigration")]
    Immigration,
    Census,
    Marriage,
    Graduation,
    #[serde(rename = "Bar Mitzvah")]
    BarMitzvah,
    #[serde(rename = "Bat Mitzvah")]
    BatMitzvah,
    Confirmation,
    Event,
}

impl EventKind {
    /// Returns all variants in label-table order.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Birth,
            EventKind::Death,
            EventKind::Burial,
            EventKind::Residence,
            EventKind::Emigration,
            EventKind::Immigration,
            EventKind::Census,
            EventKind::Marriage,
            EventKind::Graduation,
            EventKind::BarMitzvah,
            EventKind::BatMitzvah,
            EventKind::Confirmation,
            EventKind::Event,
        ]
    }

    /// Looks up the event kind for a level-1 GEDCOM tag.
    ///
    /// Returns `None` for tags outside the fixed label table.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.tag() == tag)
    }

    /// The GEDCOM tag this kind is read from.
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::Birth => "BIRT",
            EventKind::Death => "DEAT",
            EventKind::Burial => "BURI",
            EventKind::Residence => "RESI",
            EventKind::Emigration => "EMIG",
            EventKind::Immigration => "IMMI",
            EventKind::Census => "CENS",
            EventKind::Marriage => "MARR",
            EventKind::Graduation => "GRAD",
            EventKind::BarMitzvah => "BARM",
            EventKind::BatMitzvah => "BATM",
            EventKind::Confirmation => "CONF",
            EventKind::Event => "EVEN",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Birth => "Birth",
            EventKind::Death => "Death",
            EventKind::Burial => "Burial",
            EventKind::Residence => "Residence",
            EventKind::Emigration => "Departure/Emigration",
            EventKind::Immigration => "Arrival/Immigration",
            EventKind::Census => "Census",
            EventKind::Marriage => "Marriage",
            EventKind::Graduation => "Graduation",
            EventKind::BarMitzvah => "Bar Mitzvah",
            EventKind::BatMitzvah => "Bat Mitzvah",
            EventKind::Confirmation => "Confirmation",
            EventKind::Event => "Event",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Media
// =============================================================================

/// Broad category of an attached media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Document,
}

/// A media reference attached to a life event after import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    /// Original file name as supplied by the user.
    pub name: String,
    pub kind: MediaKind,
    /// Where the media can be fetched from (URL or data URI).
    pub url: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Life event
// =============================================================================

/// One entry in a person's timeline.
///
/// The kind is fixed at creation; date and place are filled in while the
/// owning record is being parsed, and once more by marriage reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEvent {
    /// Globally unique, never reused.
    pub id: String,
    #[serde(rename = "type")]
    kind: EventKind,
    /// Raw GEDCOM date string. Empty when no DATE line was seen.
    pub date: String,
    /// Raw place string. Empty when no PLAC line was seen.
    pub place: String,
    pub media: Vec<MediaItem>,
    /// Display name of the other spouse. Marriage events only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_name: Option<String>,
}

impl LifeEvent {
    /// Creates an undated, unplaced event with no media.
    pub fn new(id: impl Into<String>, kind: EventKind) -> Self {
        Self {
            id: id.into(),
            kind,
            date: String::new(),
            place: String::new(),
            media: Vec::new(),
            spouse_name: None,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_marriage(&self) -> bool {
        self.kind == EventKind::Marriage
    }
}

// =============================================================================
// Person record
// =============================================================================

/// Final, persisted shape of an imported individual.
///
/// Relationship lists are sets: the same id can never appear twice, and
/// serialisation order is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: PersonId,
    /// Owning user.
    pub user_id: String,
    pub name: String,
    pub gender: Gender,
    /// Four-digit year from the first dated BIRT event, or "Unknown".
    pub birth_year: String,
    pub death_year: Option<String>,
    /// Portrait reference; a gender-keyed placeholder at import time.
    pub image_url: String,
    pub summary: String,
    /// Marks archival (imported) records as opposed to living users.
    pub is_memorial: bool,
    pub timeline: Vec<LifeEvent>,
    pub memories: Vec<MediaItem>,
    pub sources: Vec<String>,
    pub parent_ids: BTreeSet<PersonId>,
    pub spouse_ids: BTreeSet<PersonId>,
    pub child_ids: BTreeSet<PersonId>,
}

impl PersonRecord {
    /// Returns the timeline event with the given id.
    pub fn event_mut(&mut self, event_id: &str) -> Option<&mut LifeEvent> {
        self.timeline.iter_mut().find(|e| e.id == event_id)
    }

    /// Number of marriage events in the timeline.
    pub fn marriage_count(&self) -> usize {
        self.timeline.iter().filter(|e| e.is_marriage()).count()
    }
}

// =============================================================================
// Import tree
// =============================================================================

/// The staged tree record created by one import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTree {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Traversal root. `None` if the home individual fell outside the
    /// generation window or the file had no individuals.
    pub home_person_id: Option<PersonId>,
    pub member_ids: Vec<PersonId>,
}

// =============================================================================
// Import batch (pipeline output)
// =============================================================================

/// Counters describing how much of the input was used.
///
/// Informational only: nothing here is an error condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    /// Physical lines read, blank lines included.
    pub lines_processed: usize,
    /// Non-blank lines with fewer than two tokens.
    pub malformed_lines: usize,
    /// Level-0 records of a kind other than INDI or FAM.
    pub ignored_records: usize,
    /// INDI records found in the file.
    pub individuals_parsed: usize,
    /// FAM records found in the file.
    pub families_parsed: usize,
    /// Individuals reachable from the home individual.
    pub individuals_reachable: usize,
    /// Person records emitted after generation filtering.
    pub profiles_imported: usize,
    /// Marriage events appended (not merged) by reconciliation.
    pub marriages_added: usize,
    /// Marriage events merged into an existing timeline entry.
    pub marriages_merged: usize,
}

/// Self-contained result of one import. The caller owns it outright.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    pub profiles: Vec<PersonRecord>,
    pub tree: ImportTree,
    pub stats: ImportStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_tag_lookup_covers_label_table() {
        for kind in EventKind::all() {
            assert_eq!(EventKind::from_tag(kind.tag()), Some(*kind));
        }
        assert_eq!(EventKind::from_tag("NOTE"), None);
        assert_eq!(EventKind::from_tag("birt"), None, "tags are case-sensitive");
    }

    #[test]
    fn test_event_kind_serialises_as_label() {
        let json = serde_json::to_string(&EventKind::Emigration).unwrap();
        assert_eq!(json, "\"Departure/Emigration\"");
        let json = serde_json::to_string(&EventKind::BarMitzvah).unwrap();
        assert_eq!(json, "\"Bar Mitzvah\"");
    }

    #[test]
    fn test_gender_from_sex_value() {
        assert_eq!(Gender::from_sex_value("M"), Gender::Male);
        assert_eq!(Gender::from_sex_value(" f "), Gender::Female);
        assert_eq!(Gender::from_sex_value("X"), Gender::Unknown);
        assert_eq!(Gender::from_sex_value(""), Gender::Unknown);
    }

    #[test]
    fn test_life_event_json_shape() {
        let mut ev = LifeEvent::new("ev-1", EventKind::Marriage);
        ev.spouse_name = Some("Jane Doe".to_string());
        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(value["type"], "Marriage");
        assert_eq!(value["spouseName"], "Jane Doe");

        let birth = serde_json::to_value(LifeEvent::new("ev-2", EventKind::Birth)).unwrap();
        assert!(birth.get("spouseName").is_none());
    }
}
