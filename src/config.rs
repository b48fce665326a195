//! Training configuration.
//!
//! A YAML file and the command line both produce an [`AppConfig`] whose fields are all optional.
//! Configs are merged so later sources win, then resolved into a validated [`TrainingConfig`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use ndarray_rand::rand::{Rng, thread_rng};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Defines the config file format (every field can be omitted).
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Sizes of the hidden layers between the input and output layers
    pub hidden_layers: Option<Vec<usize>>,
    pub epochs: Option<usize>,
    pub mini_batch_size: Option<usize>,
    pub learning_rate: Option<f64>,
    /// Seed for weight initialization and shuffling; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Directory holding the gzipped IDX files
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    // merge configs where the second overwrites the first
    pub fn merge(self, other: Self) -> Self {
        Self {
            hidden_layers: other.hidden_layers.or(self.hidden_layers),
            epochs: other.epochs.or(self.epochs),
            mini_batch_size: other.mini_batch_size.or(self.mini_batch_size),
            learning_rate: other.learning_rate.or(self.learning_rate),
            seed: other.seed.or(self.seed),
            data_dir: other.data_dir.or(self.data_dir),
        }
    }

    /// Fill in defaults for anything still unset and validate the result.
    pub fn resolve(self) -> Result<TrainingConfig> {
        let defaults = TrainingConfig::default();
        let config = TrainingConfig {
            hidden_layers: self.hidden_layers.unwrap_or(defaults.hidden_layers),
            epochs: self.epochs.unwrap_or(defaults.epochs),
            mini_batch_size: self.mini_batch_size.unwrap_or(defaults.mini_batch_size),
            learning_rate: self.learning_rate.unwrap_or(defaults.learning_rate),
            seed: self.seed.or(defaults.seed),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub hidden_layers: Vec<usize>,
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub learning_rate: f64,
    pub seed: Option<u64>,
    pub data_dir: PathBuf,
}

impl Default for TrainingConfig {
    // A [784, 30, 10] network trained for 30 epochs in batches of 10 with a learning rate of 3.0.
    fn default() -> Self {
        Self {
            hidden_layers: vec![30],
            epochs: 30,
            mini_batch_size: 10,
            learning_rate: 3.0,
            seed: None,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self.hidden_layers.iter().position(|&size| size == 0) {
            return Err(Error::Config(format!("hidden layer {index} has no neurons")));
        }
        check_hyperparameters(self.epochs, self.mini_batch_size, self.learning_rate)
    }

    /// Full layer sizes for a dataset with `input` features and `output` classes.
    pub fn layer_sizes(&self, input: usize, output: usize) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(input);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(output);
        sizes
    }
}

// The configured seed, or a fresh one from the thread-local generator when none was given.
pub fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| thread_rng().r#gen())
}

// Rejects the settings for which gradient descent either does nothing or divides by zero.
pub fn check_hyperparameters(
    epochs: usize,
    mini_batch_size: usize,
    learning_rate: f64,
) -> Result<()> {
    if epochs == 0 {
        return Err(Error::Config("epochs must be at least 1".into()));
    }
    if mini_batch_size == 0 {
        return Err(Error::Config("mini-batch size must be at least 1".into()));
    }
    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(Error::Config(format!(
            "learning rate must be a positive number, got {learning_rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_run() {
        let config = AppConfig::default().resolve().unwrap();
        assert_eq!(config.layer_sizes(784, 10), vec![784, 30, 10]);
        assert_eq!(config.epochs, 30);
        assert_eq!(config.mini_batch_size, 10);
        assert_eq!(config.learning_rate, 3.0);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn parses_partial_yaml() {
        let config = AppConfig::from_yaml("epochs: 5\nhidden_layers: [16, 8]\nseed: 42\n").unwrap();
        assert_eq!(config.epochs, Some(5));
        assert_eq!(config.hidden_layers, Some(vec![16, 8]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.mini_batch_size, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            AppConfig::from_yaml("epoch: 5\n"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn later_config_wins_on_merge() {
        let file = AppConfig {
            epochs: Some(10),
            learning_rate: Some(0.5),
            ..AppConfig::default()
        };
        let cli = AppConfig {
            epochs: Some(2),
            ..AppConfig::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.epochs, Some(2));
        assert_eq!(merged.learning_rate, Some(0.5));
    }

    #[test]
    fn degenerate_settings_fail_to_resolve() {
        for config in [
            AppConfig {
                epochs: Some(0),
                ..AppConfig::default()
            },
            AppConfig {
                mini_batch_size: Some(0),
                ..AppConfig::default()
            },
            AppConfig {
                learning_rate: Some(-1.0),
                ..AppConfig::default()
            },
            AppConfig {
                learning_rate: Some(f64::NAN),
                ..AppConfig::default()
            },
            AppConfig {
                hidden_layers: Some(vec![30, 0]),
                ..AppConfig::default()
            },
        ] {
            assert!(matches!(config.resolve(), Err(Error::Config(_))));
        }
    }

    #[test]
    fn explicit_seed_is_kept() {
        assert_eq!(seed_or_random(Some(42)), 42);
        assert_eq!(seed_or_random(Some(0)), 0);
    }

    #[test]
    fn no_hidden_layers_connects_input_to_output() {
        let config = TrainingConfig {
            hidden_layers: Vec::new(),
            ..TrainingConfig::default()
        };
        assert_eq!(config.layer_sizes(2, 2), vec![2, 2]);
    }
}
