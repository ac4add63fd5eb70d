// Rootline - core/generation.rs
//
// Signed generation offsets relative to the home individual.
//
// Depth-first walk over the intermediate tables: ancestors through the
// single FAMC link (generation + 1), descendants through each FAMS link's
// children (generation - 1). Each individual is visited at most once, so
// cyclic data (pedigree loops from data-entry errors) still terminates.
// An explicit stack replaces recursion so deep pedigrees cannot overflow.

use crate::core::parser::ParsedGedcom;
use std::collections::{HashMap, HashSet};

/// Generation of every individual reachable from the traversal root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationMap {
    generations: HashMap<String, i32>,
}

impl GenerationMap {
    /// Generation of `xref`, or `None` if it was not reached.
    pub fn get(&self, xref: &str) -> Option<i32> {
        self.generations.get(xref).copied()
    }

    /// True if `xref` was reached and lies within `max_generations` of the root.
    pub fn within(&self, xref: &str, max_generations: u32) -> bool {
        self.get(xref)
            .is_some_and(|gen| gen.unsigned_abs() <= max_generations)
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }
}

/// Walks outward from `home` and assigns each reachable individual its
/// generation (home = 0, parents = 1, children = -1).
///
/// Visit order matches a recursive pre-order walk: father's line, then
/// mother's line, then children in file order. When data errors make an
/// individual reachable by two paths, the first path found wins.
pub fn calculate_generations(parsed: &ParsedGedcom, home: &str) -> GenerationMap {
    let mut generations = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, i32)> = vec![(home, 0)];

    while let Some((xref, gen)) = stack.pop() {
        let Some(indi) = parsed.individual(xref) else {
            continue;
        };
        if !visited.insert(xref) {
            continue;
        }
        generations.insert(xref.to_string(), gen);

        // Pushed in reverse so the stack pops them in walk order.
        let mut next: Vec<(&str, i32)> = Vec::new();
        if let Some(fam) = indi.child_of.as_deref().and_then(|f| parsed.family(f)) {
            next.extend(fam.spouses().map(|parent| (parent, gen + 1)));
        }
        for fam in indi.spouse_in.iter().filter_map(|f| parsed.family(f)) {
            next.extend(fam.children.iter().map(|c| (c.as_str(), gen - 1)));
        }
        stack.extend(next.into_iter().rev());
    }

    tracing::debug!(
        home = %home,
        reachable = generations.len(),
        "Generation traversal complete"
    );

    GenerationMap { generations }
}
