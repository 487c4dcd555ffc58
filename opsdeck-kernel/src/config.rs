use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use tokio::fs;

use crate::devices::DEFAULT_FLIP_PROBABILITY;
use crate::error::{ConsoleError, Result};
use crate::metrics::{DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_DELTA, MAX_DELTA_LIMIT};

pub const CONFIG_ENV: &str = "OPSDECK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "opsdeck.yaml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub simulation: SimulationConf,
    pub console: TerminalConf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConf {
    pub tick_interval_ms: u64,          // ticks métriques/devices (5s en référence)
    pub clock_interval_ms: u64,         // horloge affichée (1s)
    pub metric_max_delta: f64,
    pub history_capacity: usize,
    pub device_flip_probability: f64,
    pub seed: Option<u64>,              // None = RNG initialisé par entropie
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TerminalConf {
    pub pitch_delay_ms: u64,
    pub boot_commands: Vec<String>,     // exécutées au démarrage pour amorcer l'historique
    pub profile_path: Option<String>,
}

impl Default for SimulationConf {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5_000,
            clock_interval_ms: 1_000,
            metric_max_delta: DEFAULT_MAX_DELTA,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            device_flip_probability: DEFAULT_FLIP_PROBABILITY,
            seed: None,
        }
    }
}

impl Default for TerminalConf {
    fn default() -> Self {
        Self {
            pitch_delay_ms: 2_000,
            boot_commands: vec!["system --status".into(), "whoami".into()],
            profile_path: None,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConf::default(),
            console: TerminalConf::default(),
        }
    }
}

impl SimulationConf {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }
}

impl TerminalConf {
    pub fn pitch_delay(&self) -> Duration {
        Duration::from_millis(self.pitch_delay_ms)
    }
}

impl ConsoleConfig {
    /// Parse + validation ; un texte vide donne la config par défaut
    pub fn from_yaml_str(txt: &str) -> Result<Self> {
        if txt.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: ConsoleConfig = serde_yaml::from_str(txt)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.tick_interval_ms == 0 {
            return Err(ConsoleError::InvalidConfig("simulation.tick_interval_ms must be > 0".into()));
        }
        if sim.clock_interval_ms == 0 {
            return Err(ConsoleError::InvalidConfig("simulation.clock_interval_ms must be > 0".into()));
        }
        if sim.history_capacity == 0 {
            return Err(ConsoleError::InvalidConfig("simulation.history_capacity must be > 0".into()));
        }
        if !(0.0..=MAX_DELTA_LIMIT).contains(&sim.metric_max_delta) {
            return Err(ConsoleError::InvalidConfig(format!(
                "simulation.metric_max_delta must lie within [0, {MAX_DELTA_LIMIT}], got {}",
                sim.metric_max_delta
            )));
        }
        if !(0.0..=1.0).contains(&sim.device_flip_probability) {
            return Err(ConsoleError::InvalidConfig(format!(
                "simulation.device_flip_probability must lie within [0, 1], got {}",
                sim.device_flip_probability
            )));
        }
        Ok(())
    }
}

/// Charge la config depuis `OPSDECK_CONFIG` (défaut `opsdeck.yaml`).
/// Fichier absent, vide ou invalide : config par défaut + warning.
pub async fn load_config() -> ConsoleConfig {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    load_config_from(&path).await
}

pub async fn load_config_from(path: impl AsRef<Path>) -> ConsoleConfig {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("no {} found, using default config", path.display());
        return ConsoleConfig::default();
    }

    let txt = match fs::read_to_string(path).await {
        Ok(txt) => txt,
        Err(e) => {
            tracing::warn!("failed to read {}: {e}, using default config", path.display());
            return ConsoleConfig::default();
        }
    };

    ConsoleConfig::from_yaml_str(&txt).unwrap_or_else(|e| {
        tracing::warn!("invalid config {}: {e}, using default config", path.display());
        ConsoleConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.simulation.tick_interval(), Duration::from_secs(5));
        assert_eq!(cfg.simulation.clock_interval(), Duration::from_secs(1));
        assert_eq!(cfg.simulation.history_capacity, 6);
        assert_eq!(cfg.console.pitch_delay(), Duration::from_secs(2));
        assert_eq!(cfg.console.boot_commands, vec!["system --status", "whoami"]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = ConsoleConfig::from_yaml_str("simulation:\n  seed: 42\n  tick_interval_ms: 250\n").unwrap();
        assert_eq!(cfg.simulation.seed, Some(42));
        assert_eq!(cfg.simulation.tick_interval_ms, 250);
        assert_eq!(cfg.simulation.device_flip_probability, 0.3);
        assert_eq!(cfg.console, TerminalConf::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ConsoleConfig::from_yaml_str("  \n").unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for bad in [
            "simulation:\n  tick_interval_ms: 0\n",
            "simulation:\n  clock_interval_ms: 0\n",
            "simulation:\n  history_capacity: 0\n",
            "simulation:\n  metric_max_delta: -1.0\n",
            "simulation:\n  metric_max_delta: 1.0e308\n",
            "simulation:\n  metric_max_delta: .nan\n",
            "simulation:\n  device_flip_probability: 1.5\n",
        ] {
            assert!(
                matches!(ConsoleConfig::from_yaml_str(bad), Err(ConsoleError::InvalidConfig(_))),
                "accepted: {bad}"
            );
        }
    }

    #[test]
    fn test_largest_accepted_delta_ticks() {
        let yaml = format!("simulation:\n  metric_max_delta: {MAX_DELTA_LIMIT:?}\n  seed: 1\n");
        let cfg = ConsoleConfig::from_yaml_str(&yaml).unwrap();
        let mut store = crate::metrics::MetricStore::seeded(
            cfg.simulation.history_capacity,
            cfg.simulation.metric_max_delta,
        );
        let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(1);
        store.tick(&mut rng);
        assert!(store.iter().all(|m| m.value().is_finite()));
    }

    #[tokio::test]
    async fn test_load_falls_back_on_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opsdeck.yaml");
        std::fs::write(&path, "simulation: [oops").unwrap();
        assert_eq!(load_config_from(&path).await, ConsoleConfig::default());

        std::fs::write(&path, "console:\n  pitch_delay_ms: 10\n").unwrap();
        assert_eq!(load_config_from(&path).await.console.pitch_delay_ms, 10);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(dir.path().join("nope.yaml")).await;
        assert_eq!(cfg, ConsoleConfig::default());
    }
}
