//! Generation loop, selection and reproduction.
//!
//! The population owns the agents and the grid and advances them together:
//! agents move in fixed index order within a step (single-writer rule over
//! the occupancy grid), a generation is a fixed number of steps, and the
//! transition to the next generation recombines survivor genomes gene-wise
//! and recycles every agent in place.

use crate::brain::NetworkShape;
use crate::cell::Cell;
use crate::config::AppConfig;
use crate::error::SimError;
use crate::genome::GenomeLogic;
use crate::selection::SelectionPredicate;
use crate::snapshot::WorldSnapshot;
use crate::world::World;
use petri_data::{Genome, Position};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The agent population and its evolution controller.
pub struct Population {
    cells: Vec<Cell>,
    world: World,
    predicate: SelectionPredicate,
    generation: u32,
    survival_rate: f64,
    shape: NetworkShape,
    steps_per_generation: u64,
    genome_length: usize,
    placement_attempts: usize,
    rng: ChaCha8Rng,
}

impl Population {
    /// Builds the initial population: random genomes, wired brains,
    /// collision-free random placement.
    pub fn new(config: &AppConfig) -> Result<Self, SimError> {
        let mut rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let shape = NetworkShape::with_internal(config.brain.internal_neurons);
        let mut world = World::new(config.world.width, config.world.height);

        let mut cells = Vec::with_capacity(config.world.population);
        for _ in 0..config.world.population {
            let genome = Genome::new_random_with_rng(config.genome.length, &mut rng);
            cells.push(Cell::spawn_with_rng(
                genome,
                &shape,
                &mut world,
                config.world.placement_attempts,
                &mut rng,
            )?);
        }

        Ok(Self {
            cells,
            world,
            predicate: config.evolution.predicate,
            generation: 0,
            survival_rate: 0.0,
            shape,
            steps_per_generation: config.evolution.steps_per_generation,
            genome_length: config.genome.length,
            placement_attempts: config.world.placement_attempts,
            rng,
        })
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn survival_rate(&self) -> f64 {
        self.survival_rate
    }

    #[must_use]
    pub fn steps_per_generation(&self) -> u64 {
        self.steps_per_generation
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn set_predicate(&mut self, predicate: SelectionPredicate) {
        self.predicate = predicate;
    }

    /// Copies the current state into an immutable snapshot.
    #[must_use]
    pub fn snapshot(&self, step: u64) -> WorldSnapshot {
        WorldSnapshot {
            generation: self.generation,
            step,
            positions: self.cells.iter().map(|c| c.position).collect(),
            survival_rate: self.survival_rate,
            width: self.world.width(),
            height: self.world.height(),
        }
    }

    /// Moves one agent to an explicit cell, vacating its old one. Returns
    /// false (leaving the agent where it was) if the target is occupied or
    /// outside the interior. Intended for staging scripted scenarios.
    pub fn relocate(&mut self, index: usize, position: Position) -> bool {
        let old = self.cells[index].position;
        self.world.vacate(old);
        if self.world.place(position) {
            self.cells[index].position = position;
            true
        } else {
            let restored = self.world.place(old);
            debug_assert!(restored);
            false
        }
    }

    /// Runs one generation, invoking `on_step` with a fresh snapshot after
    /// every completed step. Returns the survival rate against the current
    /// predicate.
    pub fn run_generation_with<F>(&mut self, mut on_step: F) -> f64
    where
        F: FnMut(&WorldSnapshot),
    {
        for step in 0..self.steps_per_generation {
            for cell in &mut self.cells {
                cell.step_with_rng(&mut self.world, self.steps_per_generation, &mut self.rng);
            }
            on_step(&self.snapshot(step + 1));
        }
        self.evaluate_survival()
    }

    /// Silent generation: identical ticks, no per-step callback.
    pub fn run_generation(&mut self) -> f64 {
        self.run_generation_with(|_| {})
    }

    fn evaluate_survival(&mut self) -> f64 {
        let survivors = self
            .cells
            .iter()
            .filter(|c| {
                self.predicate
                    .survives(c.position, self.world.width(), self.world.height())
            })
            .count();
        self.survival_rate = survivors as f64 / self.cells.len() as f64;
        self.survival_rate
    }

    fn survivor_genomes(&self) -> Vec<Genome> {
        self.cells
            .iter()
            .filter(|c| {
                self.predicate
                    .survives(c.position, self.world.width(), self.world.height())
            })
            .map(|c| c.genome.clone())
            .collect()
    }

    /// Produces the next generation from the current survivors and resets
    /// every agent: rewired brain, age zero, fresh random position.
    ///
    /// With zero survivors the whole population becomes the breeding pool
    /// instead of dividing by zero; the event is logged as notable, not
    /// fatal.
    pub fn reproduce(&mut self) -> Result<(), SimError> {
        let mut pool = self.survivor_genomes();
        if pool.is_empty() {
            tracing::warn!(
                generation = self.generation,
                "no survivors; breeding from the full population"
            );
            pool = self.cells.iter().map(|c| c.genome.clone()).collect();
        }

        // Oversample so consecutive pairing can cover the population, then
        // shuffle to randomize the pairs.
        let rate = pool.len() as f64 / self.cells.len() as f64;
        let factor = (1.0 / rate).ceil() as usize;
        let mut oversampled = Vec::with_capacity(pool.len() * factor);
        for _ in 0..factor {
            oversampled.extend(pool.iter().cloned());
        }
        oversampled.shuffle(&mut self.rng);

        // Two children per consecutive pair, cycling through the pool until
        // the population is covered, truncated to an exact fit.
        let mut children = Vec::with_capacity(self.cells.len());
        let mut pair = 0;
        while children.len() < self.cells.len() {
            let a = &oversampled[pair % oversampled.len()];
            let b = &oversampled[(pair + 1) % oversampled.len()];
            children.push(a.crossover_with_rng(b, &mut self.rng));
            if children.len() < self.cells.len() {
                children.push(a.crossover_with_rng(b, &mut self.rng));
            }
            pair += 2;
        }

        self.world.clear();
        for (cell, genome) in self.cells.iter_mut().zip(children) {
            cell.reset_with_rng(
                genome,
                &self.shape,
                &mut self.world,
                self.placement_attempts,
                &mut self.rng,
            )?;
        }
        self.generation += 1;
        Ok(())
    }

    /// Configured genome length, shared by every agent.
    #[must_use]
    pub fn genome_length(&self) -> usize {
        self.genome_length
    }
}
