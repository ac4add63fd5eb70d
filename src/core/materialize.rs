// Rootline - core/materialize.rs
//
// Turns filtered intermediate records into final person records and links
// them into a symmetric relationship graph.
//
// Two passes: first assign every surviving individual its stable id, then
// emit records and resolve family links through that lookup. A reference
// is never resolved before its target has an id.

use crate::core::generation::GenerationMap;
use crate::core::ids::PortraitProvider;
use crate::core::model::{PersonId, PersonRecord};
use crate::core::parser::{IndividualRecord, ParsedGedcom};
use std::collections::{BTreeSet, HashMap};

/// Inputs that shape materialisation, beyond the parsed tables.
#[derive(Debug, Clone)]
pub struct MaterializeParams<'a> {
    /// Owning user id stamped on every record.
    pub owner_id: &'a str,
    /// Maximum absolute generation distance from the home individual.
    pub max_generations: u32,
    /// Import instant (epoch ms); part of every person id.
    pub import_stamp: i64,
}

/// Person records keyed by their source cross-reference.
#[derive(Debug, Clone, Default)]
pub struct PersonGraph {
    persons: Vec<PersonRecord>,
    slots: HashMap<String, usize>,
}

impl PersonGraph {
    /// All records, in source-file order.
    pub fn persons(&self) -> &[PersonRecord] {
        &self.persons
    }

    pub fn into_persons(self) -> Vec<PersonRecord> {
        self.persons
    }

    /// The record materialised from `xref`, if it survived filtering.
    pub fn person(&self, xref: &str) -> Option<&PersonRecord> {
        self.slots.get(xref).map(|&idx| &self.persons[idx])
    }

    pub fn person_mut(&mut self, xref: &str) -> Option<&mut PersonRecord> {
        let idx = *self.slots.get(xref)?;
        self.persons.get_mut(idx)
    }

    pub fn person_id(&self, xref: &str) -> Option<&PersonId> {
        self.person(xref).map(|p| &p.id)
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    fn link_spouses(&mut self, a: &str, b: &str) {
        let (Some(a_id), Some(b_id)) = (self.person_id(a).cloned(), self.person_id(b).cloned())
        else {
            return;
        };
        if a_id == b_id {
            return;
        }
        if let Some(p) = self.person_mut(a) {
            p.spouse_ids.insert(b_id);
        }
        if let Some(p) = self.person_mut(b) {
            p.spouse_ids.insert(a_id);
        }
    }

    fn link_parent_child(&mut self, parent: &str, child: &str) {
        let (Some(parent_id), Some(child_id)) =
            (self.person_id(parent).cloned(), self.person_id(child).cloned())
        else {
            return;
        };
        if parent_id == child_id {
            return;
        }
        if let Some(p) = self.person_mut(parent) {
            p.child_ids.insert(child_id);
        }
        if let Some(c) = self.person_mut(child) {
            c.parent_ids.insert(parent_id);
        }
    }
}

/// Stable person id for a cross-reference within one import.
pub fn person_id_for(import_stamp: i64, xref: &str) -> PersonId {
    format!("imp-{import_stamp}-{xref}")
}

/// Builds person records for every individual within the generation
/// window and links parents, children and spouses symmetrically.
///
/// A relation is established whenever both of its endpoints survived; a
/// family with one filtered-out parent still links the other parent to
/// the children.
pub fn materialize(
    parsed: &ParsedGedcom,
    generations: &GenerationMap,
    params: &MaterializeParams<'_>,
    portraits: &dyn PortraitProvider,
) -> PersonGraph {
    // Pass 1: id lookup for every survivor.
    let survivors: Vec<&IndividualRecord> = parsed
        .individuals()
        .iter()
        .filter(|indi| generations.within(&indi.xref, params.max_generations))
        .collect();

    let slots: HashMap<String, usize> = survivors
        .iter()
        .enumerate()
        .map(|(idx, indi)| (indi.xref.clone(), idx))
        .collect();

    // Pass 2: emit records.
    let persons = survivors
        .iter()
        .map(|indi| PersonRecord {
            id: person_id_for(params.import_stamp, &indi.xref),
            user_id: params.owner_id.to_string(),
            name: indi.name.clone(),
            gender: indi.gender,
            birth_year: indi.birth_year.clone(),
            death_year: indi.death_year.clone(),
            image_url: portraits.placeholder(indi.gender),
            summary: format!("Archival record for {}.", indi.name),
            is_memorial: true,
            timeline: indi.timeline.clone(),
            memories: Vec::new(),
            sources: Vec::new(),
            parent_ids: BTreeSet::new(),
            spouse_ids: BTreeSet::new(),
            child_ids: BTreeSet::new(),
        })
        .collect();

    let mut graph = PersonGraph { persons, slots };

    // Pass 3: relationships from family records.
    for fam in parsed.families() {
        if let (Some(husband), Some(wife)) = (fam.husband.as_deref(), fam.wife.as_deref()) {
            graph.link_spouses(husband, wife);
        }
        for child in &fam.children {
            for parent in fam.spouses() {
                graph.link_parent_child(parent, child);
            }
        }
    }

    tracing::debug!(
        survivors = graph.len(),
        max_generations = params.max_generations,
        "Person graph materialised"
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation::calculate_generations;
    use crate::core::ids::{PlaceholderPortraits, SequentialIds};
    use crate::core::model::Gender;
    use crate::core::parser::parse_gedcom;

    const STAMP: i64 = 1_700_000_000_000;

    fn build(text: &str, home: &str, max_generations: u32) -> PersonGraph {
        let parsed = parse_gedcom(text, &mut SequentialIds::default());
        let generations = calculate_generations(&parsed, home);
        let params = MaterializeParams {
            owner_id: "user-1",
            max_generations,
            import_stamp: STAMP,
        };
        materialize(
            &parsed,
            &generations,
            &params,
            &PlaceholderPortraits::default(),
        )
    }

    const FAMILY: &str = "\
0 @I1@ INDI
1 NAME Tom /Jones/
1 SEX M
1 FAMC @F0@
1 FAMS @F1@
0 @I2@ INDI
1 NAME Ann /Lee/
1 SEX F
1 FAMS @F1@
0 @I3@ INDI
1 NAME Kid /Jones/
1 FAMC @F1@
0 @I0@ INDI
1 NAME Old /Jones/
1 FAMS @F0@
0 @F0@ FAM
1 HUSB @I0@
1 CHIL @I1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
";

    #[test]
    fn test_person_fields() {
        let graph = build(FAMILY, "I1", 4);
        let tom = graph.person("I1").unwrap();
        assert_eq!(tom.id, format!("imp-{STAMP}-I1"));
        assert_eq!(tom.user_id, "user-1");
        assert_eq!(tom.name, "Tom Jones");
        assert_eq!(tom.gender, Gender::Male);
        assert_eq!(tom.summary, "Archival record for Tom Jones.");
        assert!(tom.is_memorial);
        assert!(tom.image_url.ends_with("/male.svg"));
        assert!(tom.memories.is_empty() && tom.sources.is_empty());
    }

    #[test]
    fn test_relationships_are_symmetric() {
        let graph = build(FAMILY, "I1", 4);
        for a in graph.persons() {
            for b in graph.persons() {
                assert_eq!(
                    a.parent_ids.contains(&b.id),
                    b.child_ids.contains(&a.id),
                    "parent/child symmetry {} {}",
                    a.name,
                    b.name
                );
                assert_eq!(
                    a.spouse_ids.contains(&b.id),
                    b.spouse_ids.contains(&a.id),
                    "spouse symmetry {} {}",
                    a.name,
                    b.name
                );
            }
        }
        let kid = graph.person("I3").unwrap();
        assert_eq!(kid.parent_ids.len(), 2);
        let tom = graph.person("I1").unwrap();
        assert_eq!(tom.parent_ids.len(), 1);
        assert_eq!(tom.spouse_ids.len(), 1);
    }

    #[test]
    fn test_generation_window_filters_records() {
        let graph = build(FAMILY, "I3", 1);
        // I0 is a grandparent of I3 and falls outside the window.
        assert!(graph.person("I0").is_none());
        assert_eq!(graph.len(), 3);
        let tom = graph.person("I1").unwrap();
        assert!(tom.parent_ids.is_empty(), "filtered parent must not be linked");
    }

    #[test]
    fn test_single_surviving_parent_still_linked() {
        // The wife has no INDI record, so only the husband survives.
        let text = "\
0 @A@ INDI
1 FAMS @F@
0 @B@ INDI
1 FAMC @F@
0 @F@ FAM
1 HUSB @A@
1 WIFE @GONE@
1 CHIL @B@
";
        let graph = build(text, "B", 4);
        assert_eq!(graph.len(), 2);
        let a = graph.person("A").unwrap();
        let b = graph.person("B").unwrap();
        assert!(a.child_ids.contains(&b.id));
        assert_eq!(b.parent_ids.len(), 1);
        assert!(b.parent_ids.contains(&a.id));
        assert!(a.spouse_ids.is_empty());
    }

    #[test]
    fn test_zero_window_keeps_home_and_co_parent() {
        // Ann is reached through the shared child at -1 + 1 = 0.
        let graph = build(FAMILY, "I1", 0);
        assert_eq!(graph.len(), 2);
        let tom = graph.person("I1").unwrap();
        let ann = graph.person("I2").unwrap();
        assert!(graph.person("I3").is_none());
        assert!(graph.person("I0").is_none());
        assert!(tom.spouse_ids.contains(&ann.id));
        assert!(ann.spouse_ids.contains(&tom.id));
        assert!(tom.parent_ids.is_empty());
        assert!(tom.child_ids.is_empty());
    }

    #[test]
    fn test_duplicate_child_lines_do_not_duplicate_links() {
        let text = "\
0 @A@ INDI
1 FAMS @F@
0 @B@ INDI
1 FAMC @F@
0 @F@ FAM
1 HUSB @A@
1 CHIL @B@
1 CHIL @B@
0 @F2@ FAM
1 HUSB @A@
1 CHIL @B@
";
        let graph = build(text, "A", 4);
        assert_eq!(graph.person("A").unwrap().child_ids.len(), 1);
        assert_eq!(graph.person("B").unwrap().parent_ids.len(), 1);
    }
}
