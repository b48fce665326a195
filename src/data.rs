use ndarray::{Array, Array1, Array2, Axis};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
};

use crate::error::{Error, Result};

// A single input paired with the activation the output layer should produce for it. The
// expected_output is a [classes x 1] array with the neuron linked to the correct class set to 1.0
// and all other neurons set to 0.0, which is the format of the perfect activation output of the
// network.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingDatum {
    pub input: Array2<f64>,
    pub expected_output: Array2<f64>,
}

impl TrainingDatum {
    pub fn new(input: Vec<f64>, expected_output: Vec<f64>) -> TrainingDatum {
        TrainingDatum {
            input: column(input),
            expected_output: column(expected_output),
        }
    }
}

// A single input paired with its correct class index. This is the form used for evaluation, where
// only the index of the most active output neuron matters.
#[derive(Debug, Clone, PartialEq)]
pub struct TestDatum {
    pub input: Array2<f64>,
    pub label: usize,
}

impl TestDatum {
    pub fn new(input: Vec<f64>, label: usize) -> TestDatum {
        TestDatum {
            input: column(input),
            label,
        }
    }

    // Turn the label into a [classes x 1] one-hot array so the datum can be used for training.
    pub fn into_training_datum(self, classes: usize) -> Result<TrainingDatum> {
        if self.label >= classes {
            return Err(Error::Config(format!(
                "label {} does not fit in {classes} output classes",
                self.label
            )));
        }
        Ok(TrainingDatum {
            input: self.input,
            expected_output: one_hot(self.label, classes),
        })
    }
}

/// The three sample sets a loader hands to the trainer.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub training_data: Vec<TrainingDatum>,
    pub validation_data: Vec<TestDatum>,
    pub test_data: Vec<TestDatum>,
}

impl Dataset {
    // Two well-separated gaussian blobs in the plane, centred on (-1, -1) and (1, 1). The
    // validation and test sets are each a fifth of the size of the training set.
    pub fn two_clusters<R: Rng + ?Sized>(samples_per_class: usize, rng: &mut R) -> Result<Dataset> {
        if samples_per_class == 0 {
            return Err(Error::Config(
                "synthetic dataset needs at least one sample per class".into(),
            ));
        }
        if samples_per_class.checked_mul(2).is_none() {
            return Err(Error::Config(format!(
                "{samples_per_class} samples per class is too many for two classes"
            )));
        }
        let held_out = (samples_per_class / 5).max(1);

        let training_data = two_clusters(samples_per_class, CLUSTER_SPREAD, rng)
            .into_iter()
            .map(|datum| datum.into_training_datum(2))
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset {
            training_data,
            validation_data: two_clusters(held_out, CLUSTER_SPREAD, rng),
            test_data: two_clusters(held_out, CLUSTER_SPREAD, rng),
        })
    }

    // Length of the input column every sample in the dataset shares.
    pub fn input_size(&self) -> Result<usize> {
        self.training_data
            .first()
            .map(|datum| datum.input.nrows())
            .ok_or_else(|| Error::Config("training set is empty".into()))
    }
}

const CLUSTER_SPREAD: f64 = 0.3;

/// Samples alternate between class 0 around (-1, -1) and class 1 around (1, 1), each coordinate
/// jittered by normal noise with standard deviation `spread`.
pub fn two_clusters<R: Rng + ?Sized>(
    samples_per_class: usize,
    spread: f64,
    rng: &mut R,
) -> Vec<TestDatum> {
    (0..samples_per_class)
        .flat_map(|_| [0, 1])
        .map(|label| {
            let centre = if label == 0 { -1.0 } else { 1.0 };
            let input = (0..2)
                .map(|_| {
                    let noise: f64 = StandardNormal.sample(&mut *rng);
                    centre + spread * noise
                })
                .collect();
            TestDatum::new(input, label)
        })
        .collect()
}

pub fn one_hot(label: usize, classes: usize) -> Array2<f64> {
    Array::from_shape_fn([classes, 1], |(i, _j)| if i == label { 1.0 } else { 0.0 })
}

// Turn a flat vector into an [n x 1] column, the shape the network consumes.
pub fn column(values: Vec<f64>) -> Array2<f64> {
    Array1::from(values).insert_axis(Axis(1))
}
