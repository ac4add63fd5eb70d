// Rootline - core/ids.rs
//
// Collaborators the import pipeline consumes: unique-id generation and
// placeholder portraits. Both are traits so callers (and tests) can swap
// in deterministic implementations.

use crate::core::model::Gender;
use uuid::Uuid;

/// Source of identifiers for events and media created during an import.
///
/// Ids must be unique for the lifetime of the process; they are not
/// required to be unguessable.
pub trait IdGenerator {
    /// Returns a fresh id starting with `prefix` (e.g. `ev`, `ev-fam`, `m`).
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Default generator: import timestamp plus a random suffix.
#[derive(Debug, Clone)]
pub struct StampedIds {
    stamp: i64,
}

impl StampedIds {
    /// `stamp` is the import instant in Unix epoch milliseconds.
    pub fn new(stamp: i64) -> Self {
        Self { stamp }
    }
}

impl IdGenerator for StampedIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{prefix}-{}-{}", self.stamp, &suffix[..12])
    }
}

/// Deterministic generator producing `{prefix}-1`, `{prefix}-2`, ...
///
/// A single counter is shared across prefixes, so ids stay unique even
/// when prefixes differ.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

/// Supplies a portrait reference for records without a real image.
pub trait PortraitProvider {
    fn placeholder(&self, gender: Gender) -> String;
}

/// Placeholder portraits served from a fixed base URL, one per gender.
#[derive(Debug, Clone)]
pub struct PlaceholderPortraits {
    base_url: String,
}

impl PlaceholderPortraits {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for PlaceholderPortraits {
    fn default() -> Self {
        Self::new(crate::util::constants::DEFAULT_PORTRAIT_BASE_URL)
    }
}

impl PortraitProvider for PlaceholderPortraits {
    fn placeholder(&self, gender: Gender) -> String {
        format!("{}/{}.svg", self.base_url, gender.key())
    }
}
