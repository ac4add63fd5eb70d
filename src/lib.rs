// Rootline - lib.rs
//
// Library entry point. The binary in `main.rs` is a thin CLI over these
// modules; embedding hosts call `core::import::import_gedcom` directly.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
