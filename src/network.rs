//! A [feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) trained
//! one sample at a time.
//!
//! # Example
//!
//! Let's fit a small network to a single labelled sample:
//!
//! ```
//! # use dendrite::activator::Activator;
//! # use dendrite::network::Network;
//! # use dendrite::optimizer::Sgd;
//! # use rand::SeedableRng;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(17);
//! let mut network =
//!     Network::new(2, 3, 2, 4, Activator::ReLU, Sgd::new(0.1), &mut rng)
//!         .unwrap();
//!
//! network.feed_labelled(&[0.5, -1.0], 0).unwrap();
//! let before = network.loss();
//! for _ in 0..20 {
//!     network.feed_labelled(&[0.5, -1.0], 0).unwrap();
//!     network.backward_and_optimize(0).unwrap();
//! }
//! network.feed_labelled(&[0.5, -1.0], 0).unwrap();
//!
//! // The output is a probability distribution, and the loss went down.
//! let total: f64 = network.output().iter().sum();
//! assert!((total - 1.0).abs() < 1e-12);
//! assert!(network.loss() <= before);
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::activator::{Activator, InnerActivation, SoftMax};
use crate::error::Error;
use crate::layer::DenseLayer;
use crate::loss::CrossEntropy;
use crate::optimizer::Optimizer;

/// A feedforward neural network with a softmax + cross-entropy head.
///
/// Owns an ordered chain of dense layers, one inner activation per
/// non-final layer, the output softmax, the loss, and the optimizer.
/// Every buffer is mutated in place by the forward/backward/optimize
/// cycle, so an instance must be driven from a single place at a time.
#[derive(Debug, Serialize, Deserialize)]
pub struct Network<O> {
    inputs_number: usize,
    outputs_number: usize,
    layers: Vec<DenseLayer>,
    inner_activations: Vec<InnerActivation>,
    output_activation: SoftMax,
    loss: CrossEntropy,
    optimizer: O,
    forwarded: bool,
}

impl<O: Optimizer> Network<O> {
    /// Creates a new, untrained network.
    ///
    /// Arguments:
    ///
    ///  * `inputs_number` - the width of the input vector.
    ///  * `layers_number` - the total number of dense layers; at least 2
    ///                      (one hidden layer plus the output layer).
    ///  * `outputs_number` - the number of classes.
    ///  * `neurons_per_layer` - the uniform width of every hidden layer.
    ///  * `activator` - the activation applied after each hidden layer.
    ///  * `optimizer` - the parameter-update rule.
    ///  * `rng` - the generator used to initialize the weights.
    pub fn new<R: Rng>(
        inputs_number: usize,
        layers_number: usize,
        outputs_number: usize,
        neurons_per_layer: usize,
        activator: Activator,
        optimizer: O,
        rng: &mut R,
    ) -> Result<Self, Error> {
        if layers_number < 2 {
            return Err(Error::InvalidTopology(
                "a network needs at least two layers",
            ));
        }
        if inputs_number == 0 || outputs_number == 0 || neurons_per_layer == 0 {
            return Err(Error::InvalidTopology("layer widths must be nonzero"));
        }

        let mut layers = Vec::with_capacity(layers_number);
        let mut inner_activations = Vec::with_capacity(layers_number - 1);

        layers.push(DenseLayer::new(inputs_number, neurons_per_layer, rng));
        inner_activations.push(InnerActivation::new(activator, neurons_per_layer));
        for _ in 1..layers_number - 1 {
            layers.push(DenseLayer::new(neurons_per_layer, neurons_per_layer, rng));
            inner_activations.push(InnerActivation::new(activator, neurons_per_layer));
        }
        layers.push(DenseLayer::new(neurons_per_layer, outputs_number, rng));

        Ok(Network {
            inputs_number,
            outputs_number,
            layers,
            inner_activations,
            output_activation: SoftMax::new(outputs_number),
            loss: CrossEntropy::new(outputs_number),
            optimizer,
            forwarded: false,
        })
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.inputs_number
    }

    /// Returns the size of the output distribution.
    pub fn output_len(&self) -> usize {
        self.outputs_number
    }

    fn check_label(&self, label: usize) -> Result<(), Error> {
        if label >= self.outputs_number {
            return Err(Error::InvalidLabel {
                label,
                classes: self.outputs_number,
            });
        }
        Ok(())
    }

    /// Drives `input` through every layer and activation in sequence,
    /// ending in the output softmax.
    fn forward(&mut self, input: &[f64]) -> Result<(), Error> {
        if input.len() != self.inputs_number {
            return Err(Error::ShapeMismatch {
                expected: self.inputs_number,
                got: input.len(),
            });
        }

        self.layers[0].forward(input);
        self.inner_activations[0].forward(self.layers[0].outputs());
        for layer in 1..self.layers.len() - 1 {
            self.layers[layer].forward(self.inner_activations[layer - 1].outputs());
            self.inner_activations[layer].forward(self.layers[layer].outputs());
        }
        let last = self.layers.len() - 1;
        self.layers[last].forward(self.inner_activations[last - 1].outputs());
        self.output_activation.forward(self.layers[last].outputs());

        self.forwarded = true;
        Ok(())
    }

    /// Runs a forward pass for inference only.
    pub fn feed(&mut self, input: &[f64]) -> Result<(), Error> {
        self.forward(input)
    }

    /// Runs a forward pass, then records the loss against the true class
    /// `label`.
    pub fn feed_labelled(&mut self, input: &[f64], label: usize) -> Result<(), Error> {
        self.check_label(label)?;
        self.forward(input)?;
        let probability = self.output_activation.outputs()[label];
        self.loss.forward(probability)?;
        Ok(())
    }

    /// Backpropagates the gradient of the current output against `label`
    /// through the whole chain, leaving every layer's gradients cached
    /// for a later [`optimize`](Network::optimize).
    pub fn backward(&mut self, label: usize) -> Result<(), Error> {
        self.backpropagate(label, false)
    }

    /// Like [`backward`](Network::backward), but applies the optimizer to
    /// each layer as soon as that layer's gradients are ready. Valid
    /// because a layer's update only needs its own gradients, never
    /// another layer's updated weights.
    pub fn backward_and_optimize(&mut self, label: usize) -> Result<(), Error> {
        self.backpropagate(label, true)
    }

    fn backpropagate(&mut self, label: usize, optimize: bool) -> Result<(), Error> {
        if !self.forwarded {
            return Err(Error::UninitializedState("backward"));
        }
        self.check_label(label)?;

        self.loss.backward(self.output_activation.outputs(), label);
        self.output_activation.backward(self.loss.gradient());

        let last = self.layers.len() - 1;
        self.layers[last].backward(self.output_activation.gradient());
        if optimize {
            self.optimizer.optimize(&mut self.layers[last]);
        }
        for layer in (0..last).rev() {
            self.inner_activations[layer].backward(self.layers[layer + 1].input_gradient());
            self.layers[layer].backward(self.inner_activations[layer].gradient());
            if optimize {
                self.optimizer.optimize(&mut self.layers[layer]);
            }
        }
        Ok(())
    }

    /// Applies the optimizer to every layer using whatever gradients are
    /// currently cached. Gradients start out zeroed, so calling this
    /// before any backward pass leaves the parameters unchanged.
    pub fn optimize(&mut self) {
        for layer in self.layers.iter_mut() {
            self.optimizer.optimize(layer);
        }
    }

    /// Returns the network's current output distribution.
    pub fn output(&self) -> &[f64] {
        self.output_activation.outputs()
    }

    /// Returns the loss recorded by the last labelled feed.
    pub fn loss(&self) -> f64 {
        self.loss.value()
    }

    /// Returns the dense layers, for external inspection of weights,
    /// biases, and gradients.
    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }
}

impl<O: Optimizer + Serialize> Network<O> {
    /// Stores the complete network state (topology, weights, biases, and
    /// transient buffers) to `path` as a single JSON document.
    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl<O: Optimizer + DeserializeOwned> Network<O> {
    /// Loads a network previously written by [`store`](Network::store).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
