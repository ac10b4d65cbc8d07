//! Agent anatomy: genome, live brain, grid position and age.
//!
//! Cells are created once at population initialization and recycled in
//! place across generations: a reset swaps the genome, rewires the brain,
//! zeroes the age and assigns a fresh collision-free position.

use crate::brain::{BrainLogic, NetworkShape, SENSOR_COUNT};
use crate::error::SimError;
use crate::world::World;
use petri_data::{Brain, Genome, Position};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Movement vectors for the fixed actions, indexed as `ACTION_LABELS[1..]`:
/// right, left, up, down. Index 0 ("Mrand") has no fixed vector and is
/// resolved to a uniform random direction instead.
const ACTION_DELTAS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// One agent of the population.
pub struct Cell {
    pub genome: Genome,
    pub brain: Brain,
    pub position: Position,
    pub age: u64,
}

impl Cell {
    /// Creates an agent with a freshly wired brain at a random vacant
    /// interior cell.
    pub fn spawn_with_rng<R: Rng>(
        genome: Genome,
        shape: &NetworkShape,
        world: &mut World,
        placement_attempts: usize,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        let brain = Brain::wire(&genome, shape);
        let position = world.place_random_with_rng(placement_attempts, rng)?;
        Ok(Self {
            genome,
            brain,
            position,
            age: 0,
        })
    }

    /// Resets the agent for a new generation: new genome, rewired brain,
    /// age zero, fresh random position. The caller has already released the
    /// agent's previous cell.
    pub fn reset_with_rng<R: Rng>(
        &mut self,
        genome: Genome,
        shape: &NetworkShape,
        world: &mut World,
        placement_attempts: usize,
        rng: &mut R,
    ) -> Result<(), SimError> {
        self.brain.rewire(&genome, shape);
        self.genome = genome;
        self.age = 0;
        self.position = world.place_random_with_rng(placement_attempts, rng)?;
        Ok(())
    }

    /// Builds the sensory vector in the fixed contract order: uniform
    /// random, normalized age, normalized position, minimum boundary
    /// distance, then the distances to the left, right, bottom and top
    /// edges.
    pub fn sense<R: Rng>(
        &self,
        world: &World,
        steps_per_generation: u64,
        rng: &mut R,
    ) -> [f32; SENSOR_COUNT] {
        let nx = f32::from(self.position.x) / f32::from(world.width() - 2);
        let ny = f32::from(self.position.y) / f32::from(world.height() - 2);
        // left, right, bottom, top
        let edges = [nx, 1.0 - nx, ny, 1.0 - ny];
        let min_bd = edges.iter().copied().fold(f32::INFINITY, f32::min);
        let age = if steps_per_generation == 0 {
            0.0
        } else {
            self.age as f32 / steps_per_generation as f32
        };
        [
            rng.gen::<f32>(),
            age,
            nx,
            ny,
            min_bd,
            edges[0],
            edges[1],
            edges[2],
            edges[3],
        ]
    }

    /// Draws a movement delta from the action weights. The "Mrand" outcome
    /// resolves to a uniform direction in {-1,0,1}^2 rather than a fixed
    /// vector.
    pub fn choose_delta_with_rng<R: Rng>(&self, rng: &mut R) -> (i8, i8) {
        let dist = WeightedIndex::new(&self.brain.action_outputs)
            .expect("action outputs are floored strictly positive");
        match dist.sample(rng) {
            0 => (rng.gen_range(-1..=1), rng.gen_range(-1..=1)),
            chosen => ACTION_DELTAS[chosen - 1],
        }
    }

    /// One simulation step: sense, tick the brain, draw a direction and
    /// resolve the move against the occupancy grid. Age advances afterwards.
    pub fn step_with_rng<R: Rng>(
        &mut self,
        world: &mut World,
        steps_per_generation: u64,
        rng: &mut R,
    ) {
        let inputs = self.sense(world, steps_per_generation, rng);
        self.brain.tick(&inputs);
        let delta = self.choose_delta_with_rng(rng);
        self.position = world.resolve_move(self.position, delta);
        self.age += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeLogic;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SHAPE: NetworkShape = NetworkShape::with_internal(4);

    fn spawn(world: &mut World, rng: &mut ChaCha8Rng) -> Cell {
        let genome = Genome::new_random_with_rng(8, rng);
        Cell::spawn_with_rng(genome, &SHAPE, world, 10_000, rng).expect("vacant cell available")
    }

    #[test]
    fn test_sense_layout() {
        let mut world = World::new(102, 102);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut cell = spawn(&mut world, &mut rng);
        world.vacate(cell.position);
        cell.position = Position::new(25, 75);
        world.place(cell.position);
        cell.age = 50;

        let inputs = cell.sense(&world, 200, &mut rng);
        assert!((0.0..1.0).contains(&inputs[0]));
        assert_eq!(inputs[1], 0.25); // age 50 of 200
        assert_eq!(inputs[2], 0.25); // x / interior span
        assert_eq!(inputs[3], 0.75);
        assert_eq!(inputs[4], 0.25); // min boundary distance
        assert_eq!(inputs[5], 0.25); // left
        assert_eq!(inputs[6], 0.75); // right
        assert_eq!(inputs[7], 0.75); // bottom
        assert_eq!(inputs[8], 0.25); // top
    }

    #[test]
    fn test_step_advances_age_and_keeps_occupancy() {
        let mut world = World::new(20, 20);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut cell = spawn(&mut world, &mut rng);

        for expected_age in 1..=50 {
            cell.step_with_rng(&mut world, 200, &mut rng);
            assert_eq!(cell.age, expected_age);
            assert!(world.is_occupied(cell.position));
        }
    }

    #[test]
    fn test_reset_rewires_and_zeroes_age() {
        let mut world = World::new(20, 20);
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mut cell = spawn(&mut world, &mut rng);
        cell.age = 40;
        cell.brain.internal_outputs[0] = 0.9;

        let replacement = Genome::new_random_with_rng(8, &mut rng);
        world.vacate(cell.position);
        cell.reset_with_rng(replacement.clone(), &SHAPE, &mut world, 10_000, &mut rng)
            .expect("placement succeeds");

        assert_eq!(cell.age, 0);
        assert_eq!(cell.genome, replacement);
        assert!(cell.brain.internal_outputs.iter().all(|&v| v == 0.0));
        assert!(world.is_occupied(cell.position));
    }

    #[test]
    fn test_choose_delta_stays_in_unit_box() {
        let mut world = World::new(20, 20);
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let mut cell = spawn(&mut world, &mut rng);
        cell.brain.tick(&[0.5; SENSOR_COUNT]);

        for _ in 0..200 {
            let (dx, dy) = cell.choose_delta_with_rng(&mut rng);
            assert!((-1..=1).contains(&dx));
            assert!((-1..=1).contains(&dy));
        }
    }
}
