use itertools::multizip;
use rand::distributions::Uniform;
use rand::Rng;

use crate::matrix::{Mat, ZeroOut};

/// A fully connected layer.
///
/// Holds the learnable weights and biases together with every buffer the
/// backward pass and the optimizer need: the inputs cached by the last
/// forward call, the per-parameter gradients, and the gradient handed to
/// the upstream layer.
#[derive(Debug, Serialize, Deserialize)]
pub struct DenseLayer {
    /// The network weights, with each neuron's weights stored as a row.
    weights: Mat,
    biases: Vec<f64>,
    outputs: Vec<f64>,
    inputs: Vec<f64>,
    weight_gradients: Mat,
    bias_gradient: Vec<f64>,
    input_gradient: Vec<f64>,
}

impl DenseLayer {
    /// Initializes a new, untrained layer.
    ///
    /// Weights are drawn uniformly from `[-0.9, 0.9]`; biases start at
    /// zero.
    ///
    /// Arguments:
    ///
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `neurons` - the number of neurons in this layer.
    ///  * `rng` - the generator to draw the initial weights from.
    pub fn new<R: Rng>(inputs: usize, neurons: usize, rng: &mut R) -> Self {
        DenseLayer {
            weights: Mat::random(Uniform::new_inclusive(-0.9, 0.9), rng, neurons, inputs),
            biases: vec![0.0; neurons],
            outputs: vec![0.0; neurons],
            inputs: vec![0.0; inputs],
            weight_gradients: Mat::zeros(neurons, inputs),
            bias_gradient: vec![0.0; neurons],
            input_gradient: vec![0.0; inputs],
        }
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.weights.cols()
    }

    /// Returns the number of neurons in this layer.
    pub fn output_len(&self) -> usize {
        self.weights.rows()
    }

    /// Feeds the provided `inputs` forward through the layer.
    ///
    /// Every output is overwritten with the affine transform
    /// `biases[k] + Σ inputs[i] * weights[k][i]`, and the inputs are
    /// cached for the backward pass.
    pub fn forward(&mut self, inputs: &[f64]) {
        assert_eq!(inputs.len(), self.input_len());
        self.inputs.copy_from_slice(inputs);
        for (neuron, output) in self.outputs.iter_mut().enumerate() {
            let mut sum = self.biases[neuron];
            for (&x, &w) in inputs.iter().zip(self.weights.row(neuron)) {
                sum += x * w;
            }
            *output = sum;
        }
    }

    /// Feeds the downstream gradient backwards through the layer.
    ///
    /// Computes the weight gradient (`inputs[i] * upstream[k]`), the bias
    /// gradient (`upstream[k]`), and the gradient to hand upstream: each
    /// input's total incoming gradient, accumulated across every neuron
    /// that consumed it.
    pub fn backward(&mut self, upstream: &[f64]) {
        assert_eq!(upstream.len(), self.output_len());
        self.input_gradient.zero_out();
        for (neuron, &g) in upstream.iter().enumerate() {
            for (wg, &w, &x, ig) in multizip((
                self.weight_gradients.row_mut(neuron).iter_mut(),
                self.weights.row(neuron).iter(),
                self.inputs.iter(),
                self.input_gradient.iter_mut(),
            )) {
                *wg = x * g;
                *ig += g * w;
            }
            self.bias_gradient[neuron] = g;
        }
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn weights(&self) -> &Mat {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn weight_gradients(&self) -> &Mat {
        &self.weight_gradients
    }

    pub fn bias_gradient(&self) -> &[f64] {
        &self.bias_gradient
    }

    pub fn input_gradient(&self) -> &[f64] {
        &self.input_gradient
    }

    /// Returns the flat weight parameters paired with their gradients,
    /// for an optimizer to consume.
    pub fn weights_mut(&mut self) -> (&mut [f64], &[f64]) {
        (
            self.weights.as_mut_slice(),
            self.weight_gradients.as_slice(),
        )
    }

    /// Returns the bias parameters paired with their gradients.
    pub fn biases_mut(&mut self) -> (&mut [f64], &[f64]) {
        (self.biases.as_mut_slice(), self.bias_gradient.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// A 2-input, 2-neuron layer with hand-picked weights and biases.
    fn known_layer() -> DenseLayer {
        let mut rng = StdRng::seed_from_u64(3);
        let mut layer = DenseLayer::new(2, 2, &mut rng);
        {
            let (weights, _) = layer.weights_mut();
            weights.copy_from_slice(&[0.5, -1.0, 2.0, 0.25]);
        }
        {
            let (biases, _) = layer.biases_mut();
            biases.copy_from_slice(&[0.1, -0.2]);
        }
        layer
    }

    #[test]
    fn construction_shapes_and_ranges() {
        let mut rng = StdRng::seed_from_u64(4);
        let layer = DenseLayer::new(8, 3, &mut rng);
        assert_eq!(layer.input_len(), 8);
        assert_eq!(layer.output_len(), 3);
        assert_eq!(layer.weights().rows(), 3);
        assert_eq!(layer.weights().cols(), 8);
        assert!(layer.biases().iter().all(|&b| b == 0.0));
        for &w in layer.weights().as_slice() {
            assert!((-0.9..=0.9).contains(&w));
        }
    }

    #[test]
    fn forward_computes_the_affine_transform() {
        let mut layer = known_layer();
        layer.forward(&[1.0, 2.0]);
        // neuron 0: 0.1 + 1*0.5 + 2*(-1.0) = -1.4
        // neuron 1: -0.2 + 1*2.0 + 2*0.25 = 2.3
        assert!((layer.outputs()[0] - -1.4).abs() < 1e-12);
        assert!((layer.outputs()[1] - 2.3).abs() < 1e-12);
    }

    #[test]
    fn forward_overwrites_instead_of_accumulating() {
        let mut layer = known_layer();
        layer.forward(&[1.0, 2.0]);
        let first = layer.outputs().to_vec();
        layer.forward(&[1.0, 2.0]);
        assert_eq!(layer.outputs(), first.as_slice());
    }

    #[test]
    fn backward_computes_parameter_gradients() {
        let mut layer = known_layer();
        layer.forward(&[1.0, 2.0]);
        layer.backward(&[0.5, -1.5]);
        // weight gradient is input * upstream, row per neuron
        assert_eq!(layer.weight_gradients().row(0), &[0.5, 1.0]);
        assert_eq!(layer.weight_gradients().row(1), &[-1.5, -3.0]);
        assert_eq!(layer.bias_gradient(), &[0.5, -1.5]);
    }

    #[test]
    fn input_gradient_is_indexed_by_input_and_summed_over_neurons() {
        // A rectangular layer, so neuron- and input-indexing diverge.
        let mut rng = StdRng::seed_from_u64(5);
        let mut layer = DenseLayer::new(3, 2, &mut rng);
        {
            let (weights, _) = layer.weights_mut();
            weights.copy_from_slice(&[1.0, 2.0, 3.0, -1.0, 0.5, 4.0]);
        }
        layer.forward(&[0.1, 0.2, 0.3]);
        layer.backward(&[2.0, -1.0]);

        assert_eq!(layer.input_gradient().len(), 3);
        // input i receives sum_k upstream[k] * weights[k][i]
        assert!((layer.input_gradient()[0] - (2.0 * 1.0 + -1.0 * -1.0)).abs() < 1e-12);
        assert!((layer.input_gradient()[1] - (2.0 * 2.0 + -1.0 * 0.5)).abs() < 1e-12);
        assert!((layer.input_gradient()[2] - (2.0 * 3.0 + -1.0 * 4.0)).abs() < 1e-12);
    }

    #[test]
    fn backward_resets_the_input_gradient_each_call() {
        let mut layer = known_layer();
        layer.forward(&[1.0, 2.0]);
        layer.backward(&[1.0, 1.0]);
        let first = layer.input_gradient().to_vec();
        layer.backward(&[1.0, 1.0]);
        assert_eq!(layer.input_gradient(), first.as_slice());
    }
}
