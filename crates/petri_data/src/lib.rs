//! Core data structures for the petri simulation.
//!
//! This crate holds the plain, serde-friendly types shared by the rest of
//! the workspace. All behavior lives in `petri_core`; the structs here carry
//! only the smallest conversions (hex token parsing and rendering).

pub mod data;

pub use data::brain::{Brain, ConnectionDescriptor, SinkKind, SourceKind, Wiring};
pub use data::genome::{DecodeError, Gene, Genome, GENE_HEX_WIDTH};
pub use data::world::Position;
