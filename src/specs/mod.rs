// src/specs/mod.rs
//
// Page layouts we know how to read. Each spec owns its markers, record type
// and extraction entry points.
pub mod reviews;
