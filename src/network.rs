use std::ops::Range;

use ndarray::{Array, Array2};
use ndarray_rand::{
    RandomExt,
    rand::{Rng, seq::SliceRandom},
    rand_distr::StandardNormal,
};
use tracing::{debug, info};

use crate::{
    config::check_hyperparameters,
    data::{TestDatum, TrainingDatum},
    error::{Error, Result},
};

// Bias and weight gradients, one array per non-input layer, in the same order as the network's own
// biases and weights.
pub type Gradient = (Vec<Array2<f64>>, Vec<Array2<f64>>);

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    sizes: Vec<usize>,
    biases: Vec<Array2<f64>>,
    weights: Vec<Array2<f64>>,
}

/// What one epoch of [`Network::stochastic_gradient_descent`] achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    /// Correctly classified test samples, when a test set was supplied.
    pub correct: Option<usize>,
    pub total: Option<usize>,
    /// Mean quadratic cost over the training set after the epoch's updates.
    pub cost: f64,
}

impl EpochReport {
    pub fn accuracy(&self) -> Option<f64> {
        match (self.correct, self.total) {
            (Some(correct), Some(total)) if total > 0 => Some(correct as f64 / total as f64),
            _ => None,
        }
    }
}

impl Network {
    pub fn new<R: Rng + ?Sized>(sizes: Vec<usize>, rng: &mut R) -> Result<Network> {
        check_layer_sizes(&sizes)?;

        let biases = sizes
            // For each size in sizes...
            .iter()
            // Except the first one...
            .skip(1)
            // Make a [size x 1] array of numbers randomly chosen from a standard normal
            // distribution (a normal distribution with mean 0 and standard deviation 1)...
            .map(|&size| Array::random_using((size, 1), StandardNormal, rng))
            // And collect each of these arrays into a Vec.
            .collect();
        let weights = sizes
            // For each size in sizes...
            .iter()
            // Paired with the following size in sizes...
            .zip(sizes.iter().skip(1))
            // Make a [next_size x current_size] array of numbers randomly chosen from a standard
            // normal distribution.
            .map(|(&current_size, &next_size)| {
                Array::random_using((next_size, current_size), StandardNormal, rng)
            })
            .collect();

        debug!(?sizes, "initialized network");
        Ok(Network {
            sizes,
            biases,
            weights,
        })
    }

    // Build a network from explicit parameters. The layer sizes are read off the weight matrices,
    // so every bias and weight must chain together: weights[l] is [sizes[l+1] x sizes[l]] and
    // biases[l] is [sizes[l+1] x 1].
    pub fn from_parameters(biases: Vec<Array2<f64>>, weights: Vec<Array2<f64>>) -> Result<Network> {
        if weights.is_empty() || biases.len() != weights.len() {
            return Err(Error::Config(format!(
                "need matching, non-empty bias and weight lists, got {} and {}",
                biases.len(),
                weights.len()
            )));
        }

        let mut sizes = vec![weights[0].ncols()];
        sizes.extend(weights.iter().map(|weight| weight.nrows()));
        check_layer_sizes(&sizes)?;

        for (layer, (bias, weight)) in biases.iter().zip(&weights).enumerate() {
            check_shape("weights", (sizes[layer + 1], sizes[layer]), weight)?;
            check_shape("biases", (sizes[layer + 1], 1), bias)?;
        }

        Ok(Network {
            sizes,
            biases,
            weights,
        })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    pub fn biases(&self) -> &[Array2<f64>] {
        &self.biases
    }

    pub fn weights(&self) -> &[Array2<f64>] {
        &self.weights
    }

    // Calculates the activations of the output layer, given the activations of the input layer. The
    // input activation must be a [self.sizes[0] x 1] array (i.e. it must match the size of the
    // input layer), or this method will panic due to improper dimensions on the dot product. Use
    // try_feedforward when the input shape has not been checked already.
    pub fn feedforward(&self, input_activation: &Array2<f64>) -> Array2<f64> {
        // For every layer, compute its activation from the previous one using a' = σ(w.a + b).
        // Only the prior activation is needed, so each layer's result replaces the last.
        self.biases.iter().zip(&self.weights).fold(
            input_activation.clone(),
            |activation, (biases, weights)| (weights.dot(&activation) + biases).mapv_into(sigmoid),
        )
    }

    pub fn try_feedforward(&self, input_activation: &Array2<f64>) -> Result<Array2<f64>> {
        check_shape("input", (self.sizes[0], 1), input_activation)?;
        Ok(self.feedforward(input_activation))
    }

    // The index of the most active output neuron. Ties go to the last of the maximal neurons.
    pub fn predict(&self, input_activation: &Array2<f64>) -> usize {
        self.feedforward(input_activation)
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map_or(0, |(index, _)| index)
    }

    // Using stochastic gradient descent, trains the network. The training data is shuffled, then
    // divided into batches of size mini_batch_size. For each batch, the gradient of the cost
    // function is calculated through backpropagation, and the network's biases and weights are
    // adjusted accordingly. After all batches have been used, the network is evaluated against the
    // test data (if any was given) and the number of correct classifications is printed. This
    // entire process is repeated for the given number of epochs.
    pub fn stochastic_gradient_descent<R: Rng + ?Sized>(
        &mut self,
        training_data: &mut [TrainingDatum],
        epochs: usize,
        mini_batch_size: usize,
        learning_rate: f64,
        test_data: Option<&[TestDatum]>,
        rng: &mut R,
    ) -> Result<Vec<EpochReport>> {
        // Nothing below may mutate the network until every check has passed.
        check_hyperparameters(epochs, mini_batch_size, learning_rate)?;
        if training_data.is_empty() {
            return Err(Error::Config("training set is empty".into()));
        }
        for datum in training_data.iter() {
            self.check_training_datum(datum)?;
        }
        for datum in test_data.unwrap_or_default() {
            check_shape("test input", (self.sizes[0], 1), &datum.input)?;
        }

        info!(
            samples = training_data.len(),
            epochs, mini_batch_size, learning_rate, "starting stochastic gradient descent"
        );

        let mut reports = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            training_data.shuffle(rng);

            for batch in mini_batch_ranges(training_data.len(), mini_batch_size) {
                self.update_mini_batch(&training_data[batch], learning_rate);
            }

            let cost = self.total_cost(training_data);
            let report = match test_data {
                Some(test_data) => {
                    let correct = self.evaluate(test_data);
                    println!("Epoch {epoch}: {correct} / {}", test_data.len());
                    EpochReport {
                        epoch,
                        correct: Some(correct),
                        total: Some(test_data.len()),
                        cost,
                    }
                }
                None => {
                    println!("Epoch {epoch} complete");
                    EpochReport {
                        epoch,
                        correct: None,
                        total: None,
                        cost,
                    }
                }
            };
            info!(epoch, cost, accuracy = ?report.accuracy(), "epoch finished");
            reports.push(report);
        }

        Ok(reports)
    }

    // Adjust the network's biases and weights according to the given batch of training data. The
    // gradients of every datum are summed, and the step taken is the learning rate divided by the
    // number of data in the batch times that sum. An empty batch leaves the network untouched.
    pub fn update_mini_batch(&mut self, mini_batch: &[TrainingDatum], learning_rate: f64) {
        if mini_batch.is_empty() {
            return;
        }

        let mut nabla_biases: Vec<Array2<f64>> = self
            .biases
            .iter()
            .map(|bias| Array::zeros(bias.raw_dim()))
            .collect();
        let mut nabla_weights: Vec<Array2<f64>> = self
            .weights
            .iter()
            .map(|weight| Array::zeros(weight.raw_dim()))
            .collect();

        for datum in mini_batch {
            let (delta_nabla_biases, delta_nabla_weights) =
                self.backpropagate(&datum.input, &datum.expected_output);
            for (nabla_bias, delta) in nabla_biases.iter_mut().zip(&delta_nabla_biases) {
                *nabla_bias += delta;
            }
            for (nabla_weight, delta) in nabla_weights.iter_mut().zip(&delta_nabla_weights) {
                *nabla_weight += delta;
            }
        }

        let step = learning_rate / mini_batch.len() as f64;
        for (bias, nabla_bias) in self.biases.iter_mut().zip(&nabla_biases) {
            bias.scaled_add(-step, nabla_bias);
        }
        for (weight, nabla_weight) in self.weights.iter_mut().zip(&nabla_weights) {
            weight.scaled_add(-step, nabla_weight);
        }
    }

    // Calculate the gradient of the quadratic cost C = ½‖a - y‖² for a single input and its
    // expected output, with respect to every bias and weight.
    pub fn backpropagate(
        &self,
        input: &Array2<f64>,
        expected_output: &Array2<f64>,
    ) -> Gradient {
        let layers = self.weights.len();
        let mut activation = input.clone();
        let mut activations = Vec::with_capacity(self.num_layers());
        let mut zs = Vec::with_capacity(layers);

        // Pushing an array to a vector moves it, so the input activation is pushed inside the
        // loop and each new activation becomes the "previous" one for the next layer. After the
        // loop, activation holds the output layer, which is never needed again in the vector.
        for (bias, weight) in self.biases.iter().zip(&self.weights) {
            let z = weight.dot(&activation) + bias;
            activations.push(activation);
            activation = z.mapv(sigmoid);
            zs.push(z);
        }

        // Walk backwards from the output layer. The gradients are produced last layer first and
        // reversed at the end.
        let mut nabla_biases = Vec::with_capacity(layers);
        let mut nabla_weights = Vec::with_capacity(layers);

        let last = layers - 1;
        let mut delta = (&activation - expected_output) * &zs[last].mapv(sigmoid_derivative);
        for layer in (0..layers).rev() {
            if layer < last {
                // The error of this layer is the error of the layer ahead, sent back through that
                // layer's weights and scaled by how sensitive this layer's sigmoid is.
                delta = self.weights[layer + 1].t().dot(&delta)
                    * &zs[layer].mapv(sigmoid_derivative);
            }
            nabla_weights.push(delta.dot(&activations[layer].t()));
            nabla_biases.push(delta.clone());
        }

        nabla_biases.reverse();
        nabla_weights.reverse();
        (nabla_biases, nabla_weights)
    }

    // Run the network on all test data and report how many samples were correctly identified.
    pub fn evaluate(&self, test_data: &[TestDatum]) -> usize {
        test_data
            .iter()
            .filter(|datum| self.predict(&datum.input) == datum.label)
            .count()
    }

    // Mean of ½‖a - y‖² over the given data, or 0.0 for no data.
    pub fn total_cost(&self, data: &[TrainingDatum]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        let sum: f64 = data
            .iter()
            .map(|datum| {
                let error = self.feedforward(&datum.input) - &datum.expected_output;
                0.5 * error.mapv(|e| e * e).sum()
            })
            .sum();
        sum / data.len() as f64
    }

    fn check_training_datum(&self, datum: &TrainingDatum) -> Result<()> {
        check_shape("training input", (self.sizes[0], 1), &datum.input)?;
        let outputs = self.sizes[self.sizes.len() - 1];
        check_shape("expected output", (outputs, 1), &datum.expected_output)
    }
}

/// Index ranges of consecutive mini-batches over `len` samples. Every batch holds
/// `mini_batch_size` samples except possibly the last, which holds the remainder.
///
/// Panics if `mini_batch_size` is zero.
pub fn mini_batch_ranges(len: usize, mini_batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    (0..len)
        .step_by(mini_batch_size)
        .map(move |start| start..(start + mini_batch_size).min(len))
}

fn check_layer_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(Error::Config(format!(
            "a network needs an input and an output layer, got {} layer(s)",
            sizes.len()
        )));
    }
    if let Some(layer) = sizes.iter().position(|&size| size == 0) {
        return Err(Error::Config(format!("layer {layer} has no neurons")));
    }
    Ok(())
}

fn check_shape(what: &'static str, expected: (usize, usize), array: &Array2<f64>) -> Result<()> {
    if array.dim() != expected {
        return Err(Error::ShapeMismatch {
            what,
            expected,
            found: array.dim(),
        });
    }
    Ok(())
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-z))
}

pub fn sigmoid_derivative(z: f64) -> f64 {
    (1.0 - sigmoid(z)) * sigmoid(z)
}
