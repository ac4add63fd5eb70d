// Rootline - core/parser.rs
//
// Line-oriented GEDCOM parsing into intermediate record tables.
// Core layer: accepts the full text, never touches the filesystem.
//
// The parser is a state machine driven purely by the level field. The
// current context (which record, which event) is an explicit value threaded
// through a fold over lines; `apply_line` is the whole transition table.
//
// Deliberately permissive: malformed lines, unknown record kinds and
// unknown tags are skipped, never reported as errors.

use crate::core::date;
use crate::core::ids::IdGenerator;
use crate::core::model::{EventKind, Gender, LifeEvent};
use crate::util::constants;
use std::collections::HashMap;

// =============================================================================
// Intermediate records
// =============================================================================

/// An INDI record as read from the file, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct IndividualRecord {
    /// Cross-reference key with `@` delimiters stripped.
    pub xref: String,
    pub name: String,
    pub gender: Gender,
    pub timeline: Vec<LifeEvent>,
    /// FAMC: the family this individual is a child of.
    pub child_of: Option<String>,
    /// FAMS: families this individual is a spouse in, in file order.
    pub spouse_in: Vec<String>,
    pub birth_year: String,
    pub death_year: Option<String>,
}

impl IndividualRecord {
    fn new(xref: String) -> Self {
        Self {
            xref,
            name: constants::UNKNOWN_NAME.to_string(),
            gender: Gender::Unknown,
            timeline: Vec::new(),
            child_of: None,
            spouse_in: Vec::new(),
            birth_year: constants::UNKNOWN_YEAR.to_string(),
            death_year: None,
        }
    }
}

/// A FAM record as read from the file.
///
/// Marriage date and place live on the family itself; they are folded into
/// each spouse's timeline later by reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyRecord {
    pub xref: String,
    pub husband: Option<String>,
    pub wife: Option<String>,
    pub children: Vec<String>,
    /// Raw marriage date. Empty when not recorded.
    pub marriage_date: String,
    /// Raw marriage place. Empty when not recorded.
    pub marriage_place: String,
}

impl FamilyRecord {
    fn new(xref: String) -> Self {
        Self {
            xref,
            ..Self::default()
        }
    }

    /// Husband and wife keys, whichever are present.
    pub fn spouses(&self) -> impl Iterator<Item = &str> {
        self.husband.iter().chain(self.wife.iter()).map(String::as_str)
    }
}

/// Output of the parse pass: both record tables plus the home key.
///
/// Tables preserve file order; a repeated key replaces the earlier record
/// in place.
#[derive(Debug, Clone, Default)]
pub struct ParsedGedcom {
    individuals: Vec<IndividualRecord>,
    individual_index: HashMap<String, usize>,
    families: Vec<FamilyRecord>,
    family_index: HashMap<String, usize>,
    /// Key of the first INDI record in the file.
    pub first_individual: Option<String>,
    pub lines_processed: usize,
    pub malformed_lines: usize,
    pub ignored_records: usize,
}

impl ParsedGedcom {
    pub fn individuals(&self) -> &[IndividualRecord] {
        &self.individuals
    }

    pub fn families(&self) -> &[FamilyRecord] {
        &self.families
    }

    pub fn individual(&self, xref: &str) -> Option<&IndividualRecord> {
        self.individual_index
            .get(xref)
            .map(|&idx| &self.individuals[idx])
    }

    pub fn family(&self, xref: &str) -> Option<&FamilyRecord> {
        self.family_index.get(xref).map(|&idx| &self.families[idx])
    }

    fn individual_mut(&mut self, xref: &str) -> Option<&mut IndividualRecord> {
        let idx = *self.individual_index.get(xref)?;
        self.individuals.get_mut(idx)
    }

    fn family_mut(&mut self, xref: &str) -> Option<&mut FamilyRecord> {
        let idx = *self.family_index.get(xref)?;
        self.families.get_mut(idx)
    }

    fn open_individual(&mut self, xref: String) {
        if self.first_individual.is_none() {
            self.first_individual = Some(xref.clone());
        }
        let record = IndividualRecord::new(xref.clone());
        match self.individual_index.get(&xref) {
            Some(&idx) => self.individuals[idx] = record,
            None => {
                self.individual_index.insert(xref, self.individuals.len());
                self.individuals.push(record);
            }
        }
    }

    fn open_family(&mut self, xref: String) {
        let record = FamilyRecord::new(xref.clone());
        match self.family_index.get(&xref) {
            Some(&idx) => self.families[idx] = record,
            None => {
                self.family_index.insert(xref, self.families.len());
                self.families.push(record);
            }
        }
    }
}

// =============================================================================
// Tokenizer
// =============================================================================

/// One tokenised GEDCOM line: `LEVEL TAG-OR-XREF REST...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomLine<'a> {
    pub level: &'a str,
    pub tag: &'a str,
    /// Remaining tokens re-joined with single spaces.
    pub rest: String,
}

/// Splits a line on whitespace. Returns `None` for lines with fewer than
/// two tokens (blank or malformed).
pub fn tokenize_line(line: &str) -> Option<GedcomLine<'_>> {
    let mut tokens = line.split_whitespace();
    let level = tokens.next()?;
    let tag = tokens.next()?;
    let rest = tokens.collect::<Vec<_>>().join(" ");
    Some(GedcomLine { level, tag, rest })
}

/// Strips `@` delimiters from a cross-reference token.
pub fn strip_xref(raw: &str) -> String {
    raw.replace('@', "").trim().to_string()
}

// =============================================================================
// State machine
// =============================================================================

/// Which record (and which event inside it) subsequent lines belong to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParseContext {
    /// Outside any handled record; lines are ignored.
    #[default]
    NoContext,
    /// Inside an INDI record. `event` indexes the record's timeline.
    InIndividual { xref: String, event: Option<usize> },
    /// Inside a FAM record. `in_marriage` is set after a level-1 MARR.
    InFamily { xref: String, in_marriage: bool },
}

/// Applies one tokenised line to the tables and returns the next context.
pub fn apply_line(
    context: ParseContext,
    line: &GedcomLine<'_>,
    out: &mut ParsedGedcom,
    ids: &mut dyn IdGenerator,
) -> ParseContext {
    if line.level == "0" {
        return match line.rest.as_str() {
            "INDI" => {
                let xref = strip_xref(line.tag);
                out.open_individual(xref.clone());
                ParseContext::InIndividual { xref, event: None }
            }
            "FAM" => {
                let xref = strip_xref(line.tag);
                out.open_family(xref.clone());
                ParseContext::InFamily {
                    xref,
                    in_marriage: false,
                }
            }
            _ => {
                out.ignored_records += 1;
                ParseContext::NoContext
            }
        };
    }

    match context {
        ParseContext::NoContext => ParseContext::NoContext,
        ParseContext::InIndividual { xref, event } => {
            let event = match out.individual_mut(&xref) {
                Some(indi) => apply_individual_line(indi, event, line, ids),
                None => None,
            };
            ParseContext::InIndividual { xref, event }
        }
        ParseContext::InFamily { xref, in_marriage } => {
            let in_marriage = match out.family_mut(&xref) {
                Some(fam) => apply_family_line(fam, in_marriage, line),
                None => false,
            };
            ParseContext::InFamily { xref, in_marriage }
        }
    }
}

/// Level 1/2 handling inside an INDI record. Returns the new current event.
fn apply_individual_line(
    indi: &mut IndividualRecord,
    event: Option<usize>,
    line: &GedcomLine<'_>,
    ids: &mut dyn IdGenerator,
) -> Option<usize> {
    match line.level {
        "1" => match line.tag {
            "NAME" => {
                let name = line.rest.replace('/', "");
                let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
                if !name.is_empty() {
                    indi.name = name;
                }
                None
            }
            "SEX" => {
                indi.gender = Gender::from_sex_value(&line.rest);
                None
            }
            "FAMC" => {
                indi.child_of = Some(strip_xref(&line.rest));
                None
            }
            "FAMS" => {
                let fam = strip_xref(&line.rest);
                if !indi.spouse_in.contains(&fam) {
                    indi.spouse_in.push(fam);
                }
                None
            }
            tag => EventKind::from_tag(tag).map(|kind| {
                indi.timeline.push(LifeEvent::new(ids.next_id("ev"), kind));
                indi.timeline.len() - 1
            }),
        },
        "2" => {
            let current = match event {
                Some(idx) => indi.timeline.get_mut(idx),
                None => None,
            };
            if let Some(ev) = current {
                match line.tag {
                    "DATE" => {
                        ev.date = line.rest.clone();
                        if let Some(year) = date::extract_year(&line.rest) {
                            match ev.kind() {
                                EventKind::Birth => indi.birth_year = year,
                                EventKind::Death => indi.death_year = Some(year),
                                _ => {}
                            }
                        }
                    }
                    "PLAC" => ev.place = line.rest.clone(),
                    _ => {}
                }
            }
            event
        }
        // Deeper levels belong to whatever level-2 line precedes them.
        _ => event,
    }
}

/// Level 1/2 handling inside a FAM record. Returns the new marriage flag.
fn apply_family_line(fam: &mut FamilyRecord, in_marriage: bool, line: &GedcomLine<'_>) -> bool {
    match line.level {
        "1" => {
            match line.tag {
                "HUSB" => fam.husband = Some(strip_xref(&line.rest)),
                "WIFE" => fam.wife = Some(strip_xref(&line.rest)),
                "CHIL" => {
                    let child = strip_xref(&line.rest);
                    if !fam.children.contains(&child) {
                        fam.children.push(child);
                    }
                }
                "MARR" => return true,
                _ => {}
            }
            false
        }
        "2" if in_marriage => {
            match line.tag {
                "DATE" => fam.marriage_date = line.rest.clone(),
                "PLAC" => fam.marriage_place = line.rest.clone(),
                _ => {}
            }
            true
        }
        _ => in_marriage,
    }
}

/// Parses a whole GEDCOM text into intermediate record tables.
///
/// Accepts `\n` and `\r\n` line endings and ignores a leading UTF-8 BOM.
pub fn parse_gedcom(text: &str, ids: &mut dyn IdGenerator) -> ParsedGedcom {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut out = ParsedGedcom::default();

    let _final_context = text.lines().fold(ParseContext::NoContext, |context, raw| {
        out.lines_processed += 1;
        if raw.trim().is_empty() {
            return context;
        }
        match tokenize_line(raw) {
            Some(line) => apply_line(context, &line, &mut out, ids),
            None => {
                out.malformed_lines += 1;
                context
            }
        }
    });

    tracing::debug!(
        lines = out.lines_processed,
        individuals = out.individuals.len(),
        families = out.families.len(),
        malformed = out.malformed_lines,
        ignored_records = out.ignored_records,
        "GEDCOM parse complete"
    );

    out
}
