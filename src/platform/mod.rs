// Rootline - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, toml.

pub mod config;
pub mod fs;
