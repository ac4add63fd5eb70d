// Rootline - core/mod.rs
//
// Core business logic layer: GEDCOM parsing, generation filtering,
// materialisation, marriage reconciliation and export.
// Must NOT depend on: platform, app, or any filesystem access.

pub mod date;
pub mod export;
pub mod generation;
pub mod ids;
pub mod import;
pub mod materialize;
pub mod media;
pub mod model;
pub mod narrative;
pub mod parser;
pub mod reconcile;
