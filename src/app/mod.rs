// Rootline - app/mod.rs
//
// Application layer: import orchestration around the pure core pipeline.
// Dependencies: core, platform.

pub mod import_job;
