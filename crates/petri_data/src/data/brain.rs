use serde::{Deserialize, Serialize};

/// Where a connection reads its signal from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    /// A sensory input slot.
    Sensory,
    /// An internal neuron's previous-tick output.
    Internal,
}

/// Which neuron class a connection drives.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SinkKind {
    /// An action neuron.
    Action,
    /// An internal neuron.
    Internal,
}

/// One decoded gene: a weighted edge between two neurons.
///
/// Indices are already folded into the valid range for their neuron class,
/// so consumers never bounds-check them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDescriptor {
    pub source: SourceKind,
    pub source_index: usize,
    pub sink: SinkKind,
    pub sink_index: usize,
    pub weight: f32,
}

/// Routing tables for one agent's network: an ordered fan-in list per
/// internal neuron and per action neuron, insertion order = genome order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Wiring {
    pub internal: Vec<Vec<ConnectionDescriptor>>,
    pub action: Vec<Vec<ConnectionDescriptor>>,
}

/// The live network of one agent: routing tables plus the numeric state
/// they drive. `internal_outputs` holds the previous tick's values until a
/// tick commits its replacement (one-tick-delayed recurrence).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Brain {
    pub wiring: Wiring,
    pub internal_outputs: Vec<f32>,
    pub action_outputs: Vec<f32>,
}
