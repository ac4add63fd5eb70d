// Rootline - core/reconcile.rs
//
// Folds family-level marriage facts into each spouse's own timeline.
//
// A family's marriage touches two timelines independently. For each spouse
// an existing Marriage event is reused when its date equals the family's
// date (two empty dates count as equal), otherwise a new event is appended.
// Running the pass twice over the same data changes nothing the second time.

use crate::core::ids::IdGenerator;
use crate::core::materialize::PersonGraph;
use crate::core::model::{EventKind, LifeEvent, PersonRecord};
use crate::core::parser::{FamilyRecord, ParsedGedcom};
use crate::util::constants;

/// What reconciliation did to one timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarriageOutcome {
    /// An existing Marriage event was updated in place.
    Merged,
    /// A new Marriage event was appended.
    Added,
}

/// Totals across a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub merged: usize,
    pub added: usize,
}

impl ReconcileSummary {
    fn record(&mut self, outcome: MarriageOutcome) {
        match outcome {
            MarriageOutcome::Merged => self.merged += 1,
            MarriageOutcome::Added => self.added += 1,
        }
    }
}

/// Returns true if `event` describes the marriage being reconciled: a
/// Marriage whose date equals `date` (raw strings, surrounding whitespace
/// ignored). Two absent dates are equal, so an undated marriage is never
/// duplicated by a second pass.
fn is_same_marriage(event: &LifeEvent, date: &str) -> bool {
    event.is_marriage() && event.date.trim() == date.trim()
}

/// Merges one marriage into one person's timeline.
pub fn reconcile_marriage(
    person: &mut PersonRecord,
    spouse_name: Option<&str>,
    date: &str,
    place: &str,
    ids: &mut dyn IdGenerator,
) -> MarriageOutcome {
    let spouse_name = spouse_name.unwrap_or(constants::UNKNOWN_NAME);

    if let Some(existing) = person
        .timeline
        .iter_mut()
        .find(|e| is_same_marriage(e, date))
    {
        existing.spouse_name = Some(spouse_name.to_string());
        if !place.is_empty() {
            existing.place = place.to_string();
        }
        return MarriageOutcome::Merged;
    }

    let mut event = LifeEvent::new(ids.next_id("ev-fam"), EventKind::Marriage);
    event.date = date.to_string();
    event.place = place.to_string();
    event.spouse_name = Some(spouse_name.to_string());
    person.timeline.push(event);
    MarriageOutcome::Added
}

/// Reconciles one family against both of its spouses, where they survived.
pub fn reconcile_family(
    fam: &FamilyRecord,
    graph: &mut PersonGraph,
    ids: &mut dyn IdGenerator,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();
    let husband = fam.husband.as_deref();
    let wife = fam.wife.as_deref();

    for (this, other) in [(husband, wife), (wife, husband)] {
        let Some(this) = this else { continue };
        let other_name = other
            .and_then(|xref| graph.person(xref))
            .map(|p| p.name.clone());
        if let Some(person) = graph.person_mut(this) {
            let outcome = reconcile_marriage(
                person,
                other_name.as_deref(),
                &fam.marriage_date,
                &fam.marriage_place,
                ids,
            );
            summary.record(outcome);
        }
    }

    summary
}

/// Runs marriage reconciliation for every family in the file.
///
/// Families are not generation-filtered; any family with at least one
/// surviving spouse contributes.
pub fn reconcile_marriages(
    parsed: &ParsedGedcom,
    graph: &mut PersonGraph,
    ids: &mut dyn IdGenerator,
) -> ReconcileSummary {
    let mut total = ReconcileSummary::default();
    for fam in parsed.families() {
        let summary = reconcile_family(fam, graph, ids);
        total.merged += summary.merged;
        total.added += summary.added;
    }

    tracing::debug!(
        merged = total.merged,
        added = total.added,
        "Marriage reconciliation complete"
    );
    total
}
