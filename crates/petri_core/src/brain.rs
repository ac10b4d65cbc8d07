//! Recurrent network wiring and per-tick evaluation.
//!
//! Genome-derived networks are arbitrary graphs: fan-in, fan-out, self
//! loops and mutual feedback between internal neurons are all legal. The
//! evaluation cycle that feedback would create is broken by a constant
//! one-tick delay on internal-to-internal edges instead of topological
//! analysis: internal neurons read the previous tick's internal outputs,
//! action neurons read the values computed in the current tick.

use crate::genome::decode;
use petri_data::{Brain, Genome, SinkKind, SourceKind, Wiring};
use serde::{Deserialize, Serialize};

pub const SENSOR_LABELS: [&str; 9] = [
    "Rand", "Age", "Px", "Py", "BD", "BDl", "BDr", "BDd", "BDu",
];

pub const ACTION_LABELS: [&str; 5] = ["Mrand", "Mr", "Ml", "Mu", "Md"];

pub const SENSOR_COUNT: usize = SENSOR_LABELS.len();
pub const ACTION_COUNT: usize = ACTION_LABELS.len();

/// Floor applied to action outputs so the action vector stays strictly
/// positive and usable as weights for a weighted random draw.
pub const ACTION_FLOOR: f32 = 0.0001;

/// Ceiling just below 1.0. `tanh` saturates to exactly 1.0 in f32 once the
/// fan-in sum passes ~9, and the action contract is a half-open interval.
pub const ACTION_CEIL: f32 = 1.0 - f32::EPSILON;

/// Neuron counts a genome wires against.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkShape {
    pub sensory: usize,
    pub internal: usize,
    pub action: usize,
}

impl NetworkShape {
    /// Standard shape: the fixed sensor and action sets plus a configured
    /// internal neuron count.
    #[must_use]
    pub const fn with_internal(internal: usize) -> Self {
        Self {
            sensory: SENSOR_COUNT,
            internal,
            action: ACTION_COUNT,
        }
    }
}

/// Network behavior, implemented for [`petri_data::Brain`].
pub trait BrainLogic: Sized {
    fn wire(genome: &Genome, shape: &NetworkShape) -> Self;
    fn rewire(&mut self, genome: &Genome, shape: &NetworkShape);
    fn tick(&mut self, sensory_inputs: &[f32]);
}

impl BrainLogic for Brain {
    /// Builds the routing tables for a genome. Every gene appends to its
    /// sink neuron's fan-in list in genome order; wiring never rejects a
    /// genome.
    fn wire(genome: &Genome, shape: &NetworkShape) -> Self {
        let mut wiring = Wiring {
            internal: vec![Vec::new(); shape.internal],
            action: vec![Vec::new(); shape.action],
        };
        for &gene in genome.genes() {
            let conn = decode(gene, shape);
            match conn.sink {
                SinkKind::Internal => wiring.internal[conn.sink_index].push(conn),
                SinkKind::Action => wiring.action[conn.sink_index].push(conn),
            }
        }
        Self {
            wiring,
            internal_outputs: vec![0.0; shape.internal],
            action_outputs: vec![0.0; shape.action],
        }
    }

    fn rewire(&mut self, genome: &Genome, shape: &NetworkShape) {
        *self = Self::wire(genome, shape);
    }

    /// One discrete time step over the sensory vector.
    fn tick(&mut self, sensory_inputs: &[f32]) {
        debug_assert_eq!(sensory_inputs.len(), SENSOR_COUNT);

        // The whole internal vector is buffered before committing;
        // overwriting mid-loop would let later neurons observe this tick's
        // predecessor values instead of last tick's.
        let internal: Vec<f32> = self
            .wiring
            .internal
            .iter()
            .map(|fan_in| {
                let sum: f32 = fan_in
                    .iter()
                    .map(|conn| match conn.source {
                        SourceKind::Sensory => sensory_inputs[conn.source_index] * conn.weight,
                        SourceKind::Internal => {
                            self.internal_outputs[conn.source_index] * conn.weight
                        }
                    })
                    .sum();
                sum.tanh()
            })
            .collect();

        let action: Vec<f32> = self
            .wiring
            .action
            .iter()
            .map(|fan_in| {
                let sum: f32 = fan_in
                    .iter()
                    .map(|conn| match conn.source {
                        SourceKind::Sensory => sensory_inputs[conn.source_index] * conn.weight,
                        SourceKind::Internal => internal[conn.source_index] * conn.weight,
                    })
                    .sum();
                sum.tanh().clamp(ACTION_FLOOR, ACTION_CEIL)
            })
            .collect();

        self.internal_outputs = internal;
        self.action_outputs = action;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeLogic;
    use petri_data::Gene;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SHAPE: NetworkShape = NetworkShape::with_internal(4);

    /// Weight field 0x2000 decodes to exactly 1.0.
    fn gene(source_byte: u8, sink_byte: u8) -> Gene {
        Gene::from_bits(
            (u32::from(source_byte) << 24) | (u32::from(sink_byte) << 16) | 0x2000,
        )
    }

    #[test]
    fn test_wire_routes_by_sink() {
        // sensory 0 -> internal 2, sensory 1 -> action 3
        let genome = petri_data::Genome(vec![gene(0x00, 0x82), gene(0x01, 0x03)]);
        let brain = Brain::wire(&genome, &SHAPE);
        assert_eq!(brain.wiring.internal[2].len(), 1);
        assert_eq!(brain.wiring.action[3].len(), 1);
        assert!(brain.wiring.internal[0].is_empty());
    }

    #[test]
    fn test_output_bounds_for_random_genomes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        for _ in 0..50 {
            let genome = petri_data::Genome::new_random_with_rng(8, &mut rng);
            let mut brain = Brain::wire(&genome, &SHAPE);
            for _ in 0..20 {
                brain.tick(&[1.0; SENSOR_COUNT]);
                for &a in &brain.action_outputs {
                    assert!((ACTION_FLOOR..1.0).contains(&a), "action out of bounds: {a}");
                }
                for &i in &brain.internal_outputs {
                    assert!(i > -1.0 && i < 1.0, "internal out of bounds: {i}");
                }
            }
        }
    }

    #[test]
    fn test_self_recurrence_lags_one_tick() {
        // internal 0 -> internal 0, weight 1.0
        let genome = petri_data::Genome(vec![gene(0x80, 0x80)]);
        let mut brain = Brain::wire(&genome, &SHAPE);
        brain.internal_outputs[0] = 0.5;

        brain.tick(&[0.0; SENSOR_COUNT]);
        // Depends on the pre-tick value only, never the in-progress one.
        assert_eq!(brain.internal_outputs[0], 0.5f32.tanh());

        brain.tick(&[0.0; SENSOR_COUNT]);
        assert_eq!(brain.internal_outputs[0], 0.5f32.tanh().tanh());
    }

    #[test]
    fn test_internal_pass_buffers_before_commit() {
        // internal 1 reads internal 0; sensory 0 drives internal 0. On the
        // first tick internal 1 must still see internal 0's previous value.
        let genome = petri_data::Genome(vec![gene(0x00, 0x80), gene(0x80, 0x81)]);
        let mut brain = Brain::wire(&genome, &SHAPE);

        brain.tick(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(brain.internal_outputs[0], 1.0f32.tanh());
        assert_eq!(brain.internal_outputs[1], 0.0);

        brain.tick(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(brain.internal_outputs[1], 1.0f32.tanh().tanh());
    }

    #[test]
    fn test_action_reads_current_tick_internals() {
        // sensory 0 -> internal 0 -> action 0, all weight 1.0
        let genome = petri_data::Genome(vec![gene(0x00, 0x80), gene(0x80, 0x00)]);
        let mut brain = Brain::wire(&genome, &SHAPE);

        brain.tick(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(brain.action_outputs[0], 1.0f32.tanh().tanh());
    }

    #[test]
    fn test_saturating_fan_in_clamped_below_one() {
        // Three max-weight sensory edges into action 0: the fan-in sum is
        // ~12, deep in tanh saturation.
        let g = Gene::from_bits(0x0000_7fff);
        let genome = petri_data::Genome(vec![g, g, g]);
        let mut brain = Brain::wire(&genome, &SHAPE);

        brain.tick(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(brain.action_outputs[0] < 1.0);
        assert!(brain.action_outputs[0] > 0.999);
    }

    #[test]
    fn test_unwired_action_rests_at_floor() {
        let genome = petri_data::Genome(vec![]);
        let mut brain = Brain::wire(&genome, &SHAPE);
        brain.tick(&[0.3; SENSOR_COUNT]);
        assert!(brain.action_outputs.iter().all(|&a| a == ACTION_FLOOR));
    }
}
