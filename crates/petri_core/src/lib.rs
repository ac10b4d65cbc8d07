//! # Petri Core
//!
//! The core simulation engine for petri - a grid-based evolutionary cell
//! simulation.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Genome codec and network wiring (fixed-point weight decode, modulo
//!   index folding)
//! - Recurrent brain evaluation with one-tick-delayed internal feedback
//! - Occupancy-aware movement resolution on a bordered grid
//! - Generational selection and gene-wise uniform crossover
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! The simulation is synchronous and single-writer: one worker advances the
//! world at a time, and agents move in fixed index order. Presentation
//! layers consume immutable [`snapshot::WorldSnapshot`] values; they never
//! touch live state.
//!
//! ## Example
//!
//! ```
//! use petri_core::brain::{BrainLogic, NetworkShape};
//! use petri_core::genome::GenomeLogic;
//! use petri_data::{Brain, Genome};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let genome = Genome::new_random_with_rng(8, &mut rng);
//! let mut brain = Brain::wire(&genome, &NetworkShape::with_internal(4));
//!
//! // One discrete time step over the 9 fixed sensors.
//! brain.tick(&[0.5; 9]);
//! assert_eq!(brain.action_outputs.len(), 5);
//! ```

/// Recurrent network wiring and per-tick evaluation
pub mod brain;
/// Agent anatomy: genome, brain, position, age
pub mod cell;
/// Configuration management for simulation parameters
pub mod config;
/// Error types for the simulation core
pub mod error;
/// Gene decoding and genome-level operations
pub mod genome;
/// Metrics collection and structured logging
pub mod metrics;
/// Generation loop, selection and reproduction
pub mod population;
/// Named spatial survival predicates
pub mod selection;
/// Immutable world snapshots for presentation layers
pub mod snapshot;
/// Occupancy grid and movement resolution
pub mod world;

pub use brain::{BrainLogic, NetworkShape, ACTION_COUNT, SENSOR_COUNT};
pub use error::SimError;
pub use genome::GenomeLogic;
pub use metrics::{init_logging, Metrics};
pub use selection::SelectionPredicate;
