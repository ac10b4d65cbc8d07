//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to the `config.toml`
//! file. Defaults reproduce the reference program's constants: a 160x160
//! grid, population 1000, genome length 8, 4 internal neurons and 200
//! steps per generation.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 160
//! height = 160
//! population = 1000
//! seed = 42
//!
//! [evolution]
//! steps_per_generation = 200
//! predicate = "right-half"
//! ```

use crate::selection::SelectionPredicate;
use serde::{Deserialize, Serialize};

/// Grid and population configuration.
///
/// `width` and `height` include the reserved 1-cell border; the habitable
/// interior is two cells smaller on each axis.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub population: usize,
    /// Seeds the simulation RNG for reproducible runs; omitted means
    /// entropy-seeded.
    pub seed: Option<u64>,
    /// Budget of random draws when looking for a vacant cell.
    pub placement_attempts: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 160,
            population: 1000,
            seed: None,
            placement_attempts: 10_000,
        }
    }
}

/// Genome shape configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GenomeConfig {
    /// Genes per genome; every agent carries exactly this many.
    pub length: usize,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self { length: 8 }
    }
}

/// Network shape configuration. Sensor and action counts are fixed by the
/// brain's input/output contracts; only the internal layer is sized here.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BrainConfig {
    pub internal_neurons: usize,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self { internal_neurons: 4 }
    }
}

/// Generational loop configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    pub steps_per_generation: u64,
    pub predicate: SelectionPredicate,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            steps_per_generation: 200,
            predicate: SelectionPredicate::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub genome: GenomeConfig,
    #[serde(default)]
    pub brain: BrainConfig,
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    ///
    /// # Validation Rules
    /// - Grid dimensions must leave an interior and stay reasonable (< 1000)
    /// - Interior capacity must strictly exceed the population
    /// - Genome length, internal neuron count and the placement budget must
    ///   be positive
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width >= 3, "World width leaves no interior");
        anyhow::ensure!(self.world.height >= 3, "World height leaves no interior");
        anyhow::ensure!(self.world.width <= 1000, "World width too large (max 1000)");
        anyhow::ensure!(
            self.world.height <= 1000,
            "World height too large (max 1000)"
        );
        anyhow::ensure!(self.world.population > 0, "Population must be positive");

        let interior =
            usize::from(self.world.width - 2) * usize::from(self.world.height - 2);
        anyhow::ensure!(
            interior > self.world.population,
            "Interior capacity ({interior}) must exceed population ({})",
            self.world.population
        );

        anyhow::ensure!(self.genome.length >= 1, "Genome length must be positive");
        anyhow::ensure!(
            self.brain.internal_neurons >= 1,
            "Internal neuron count must be positive"
        );
        anyhow::ensure!(
            self.world.placement_attempts >= 1,
            "Placement attempt budget must be positive"
        );

        Ok(())
    }

    /// Loads and validates configuration from `config.toml` content.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable digest of the evolution-relevant sections, for tagging runs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.genome).as_bytes());
        hasher.update(format!("{:?}", self.brain).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_borderless_world_rejected() {
        let config = AppConfig {
            world: WorldConfig {
                width: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overfull_grid_rejected() {
        let config = AppConfig {
            world: WorldConfig {
                width: 12,
                height: 12,
                population: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_genome_length_rejected() {
        let config = AppConfig {
            genome: GenomeConfig { length: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            width = 40
            height = 40
            population = 100
            seed = 7

            [evolution]
            steps_per_generation = 50
            predicate = "upper-half"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.genome.length, 8);
        assert_eq!(config.evolution.predicate, SelectionPredicate::UpperHalf);
    }

    #[test]
    fn test_from_toml_partial_world_section() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            width = 40
            height = 40
            "#,
        )
        .expect("valid config");
        assert_eq!(config.world.width, 40);
        assert_eq!(config.world.population, 1000);
        assert_eq!(config.world.placement_attempts, 10_000);
        assert_eq!(config.world.seed, None);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut config3 = AppConfig::default();
        config3.genome.length = 4;
        assert_ne!(config1.fingerprint(), config3.fingerprint());
    }
}
