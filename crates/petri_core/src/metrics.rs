//! Metrics collection and structured logging for the simulation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Collector for simulation progress statistics.
pub struct Metrics {
    step_count: AtomicU64,
    generation_count: AtomicU64,
    /// Last survival rate in permille, so it fits an atomic.
    last_survival_permille: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step_count: AtomicU64::new(0),
            generation_count: AtomicU64::new(0),
            last_survival_permille: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records one completed simulation step.
    pub fn record_step(&self) {
        self.step_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a completed generation and logs a structured summary line.
    pub fn record_generation(&self, generation: u32, survival_rate: f64, population: usize) {
        self.generation_count.fetch_add(1, Ordering::Relaxed);
        self.last_survival_permille
            .store((survival_rate * 1000.0) as u64, Ordering::Relaxed);
        tracing::info!(
            generation = generation,
            survival_rate = survival_rate,
            population = population,
            "Generation complete"
        );
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn generation_count(&self) -> u64 {
        self.generation_count.load(Ordering::Relaxed)
    }

    /// Last recorded survival rate.
    #[must_use]
    pub fn last_survival_rate(&self) -> f64 {
        self.last_survival_permille.load(Ordering::Relaxed) as f64 / 1000.0
    }

    /// Elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
