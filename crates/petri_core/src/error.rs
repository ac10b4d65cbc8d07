//! Error types for the petri simulation core.

use thiserror::Error;

/// Main error type for simulation construction and reset.
#[derive(Error, Debug)]
pub enum SimError {
    /// Malformed gene token. The owning genome is rejected wholesale so the
    /// population never receives an agent with a partially wired brain.
    #[error("genome decode failed: {0}")]
    Decode(#[from] petri_data::DecodeError),

    /// No vacant interior cell found within the attempt budget. Grid
    /// capacity is validated to exceed the population, so this signals a
    /// misconfiguration rather than a transient condition.
    #[error("no vacant interior cell after {attempts} placement attempts")]
    PlacementExhausted { attempts: usize },
}

/// Result type alias for simulation core operations.
pub type Result<T> = std::result::Result<T, SimError>;
