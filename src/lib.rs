//! A from-scratch feed-forward network of sigmoid layers, trained by mini-batch stochastic
//! gradient descent and backpropagation, plus a handful of small algorithm katas.
//!
//! ```
//! use digit_network::{Dataset, Network};
//! use ndarray_rand::rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut dataset = Dataset::two_clusters(50, &mut rng).unwrap();
//! let mut network = Network::new(vec![2, 4, 2], &mut rng).unwrap();
//! let reports = network
//!     .stochastic_gradient_descent(&mut dataset.training_data, 2, 10, 3.0, None, &mut rng)
//!     .unwrap();
//! assert_eq!(reports.len(), 2);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod katas;
pub mod logging;
pub mod mnist;
pub mod network;

pub use config::{AppConfig, TrainingConfig};
pub use data::{Dataset, TestDatum, TrainingDatum};
pub use error::{Error, Result};
pub use network::{EpochReport, Network};
