//! Data structures for the petri simulation.

pub mod brain;
pub mod genome;
pub mod world;
