//! Control surface for the petri simulation.
//!
//! The simulation core in `petri_core` is synchronous and single-writer;
//! this crate wraps it in a dedicated worker thread so a presentation layer
//! can issue control requests and consume read-only snapshots without ever
//! touching live state.

pub mod control;
