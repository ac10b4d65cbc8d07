//! Immutable world snapshots for presentation layers.

use petri_data::Position;
use serde::{Deserialize, Serialize};

/// Read-only view published after a step or at a generation boundary.
///
/// Snapshots copy their data out of the simulation; a consumer holding one
/// never aliases live state.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorldSnapshot {
    pub generation: u32,
    /// Steps completed within the current generation.
    pub step: u64,
    /// Agent positions in population index order.
    pub positions: Vec<Position>,
    /// Fraction of the population selected at the last generation end; 0.0
    /// until a generation has completed.
    pub survival_rate: f64,
    pub width: u16,
    pub height: u16,
}
