//! Simulation worker and command/update channels.
//!
//! The worker owns the [`Population`] and runs on its own thread; commands
//! queue through an unbounded channel and each one runs to completion
//! before the next is taken, so a generation in progress cannot be
//! cancelled. Updates carry immutable snapshots only.

use anyhow::{anyhow, Context, Result};
use petri_core::config::AppConfig;
use petri_core::metrics::Metrics;
use petri_core::population::Population;
use petri_core::selection::SelectionPredicate;
use petri_core::snapshot::WorldSnapshot;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

/// Control requests issued by the presentation side.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    /// Run one generation; `live` streams a snapshot after every step,
    /// otherwise only the completion snapshot is published.
    RunGeneration { live: bool },
    /// Reproduce survivors into the next generation and re-place agents.
    AdvanceGeneration,
    /// Swap the survival predicate used at the next generation end.
    SetPredicate(SelectionPredicate),
}

/// Updates published by the simulation worker.
#[derive(Debug, Clone)]
pub enum Update {
    /// One step of a live generation completed.
    Step(WorldSnapshot),
    /// A generation's steps finished; survival rate is final.
    GenerationComplete(WorldSnapshot),
    /// Reproduction finished; agents hold new genomes and positions.
    GenerationAdvanced(WorldSnapshot),
}

/// Handle to the dedicated simulation worker.
///
/// Dropping the handle closes the command channel; the worker drains what
/// is queued and exits.
pub struct SimulationHandle {
    commands: Option<mpsc::UnboundedSender<Command>>,
    updates: mpsc::UnboundedReceiver<Update>,
    worker: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    /// Validates the configuration, builds the initial population and
    /// spawns the worker thread.
    pub fn spawn(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let population = Population::new(config)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let worker = thread::Builder::new()
            .name("petri-sim".into())
            .spawn(move || {
                let metrics = Metrics::new();
                worker_loop(population, command_rx, update_tx, &metrics);
            })
            .context("failed to spawn simulation worker")?;

        Ok(Self {
            commands: Some(command_tx),
            updates: update_rx,
            worker: Some(worker),
        })
    }

    /// Queues a control request for the worker.
    pub fn send(&self, command: Command) -> Result<()> {
        self.commands
            .as_ref()
            .context("simulation worker stopped")?
            .send(command)
            .map_err(|_| anyhow!("simulation worker stopped"))
    }

    /// Next published update; `None` once the worker has exited and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<Update> {
        self.updates.recv().await
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        // Close the command channel first so the worker's blocking recv
        // returns and the join cannot deadlock.
        self.commands.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    mut population: Population,
    mut commands: mpsc::UnboundedReceiver<Command>,
    updates: mpsc::UnboundedSender<Update>,
    metrics: &Metrics,
) {
    while let Some(command) = commands.blocking_recv() {
        match command {
            Command::RunGeneration { live } => {
                // Silent generations still count their steps; live only
                // adds the snapshot stream.
                if live {
                    population.run_generation_with(|snapshot| {
                        metrics.record_step();
                        let _ = updates.send(Update::Step(snapshot.clone()));
                    });
                } else {
                    population.run_generation_with(|_| metrics.record_step());
                }
                let snapshot = population.snapshot(population.steps_per_generation());
                metrics.record_generation(
                    snapshot.generation,
                    snapshot.survival_rate,
                    snapshot.positions.len(),
                );
                let _ = updates.send(Update::GenerationComplete(snapshot));
            }
            Command::AdvanceGeneration => {
                if let Err(error) = population.reproduce() {
                    // Placement exhaustion is a misconfiguration; nothing
                    // sensible can continue from here.
                    tracing::error!(%error, "reproduction failed; stopping worker");
                    return;
                }
                let _ = updates.send(Update::GenerationAdvanced(population.snapshot(0)));
            }
            Command::SetPredicate(predicate) => population.set_predicate(predicate),
        }
    }
}
