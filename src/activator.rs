//! Activation function types and their per-layer state.

use itertools::multizip;

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types for hidden layers.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub enum Activator {
    /// Rectified Linear Unit
    ReLU,
    /// Leaky Rectified Linear Unit
    ///
    /// Takes an `alpha` value to use for negative inputs.
    LeakyReLU(f64),
    /// Sigmoid function
    Sigmoid,
    /// Hyperbolic tan function
    TanH,
}

impl Activator {
    /// Evaluates `f(x)` for the selected activation function.
    pub fn f(&self, x: f64) -> f64 {
        match *self {
            Activator::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Activator::LeakyReLU(alpha) => {
                if x > 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
            Activator::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activator::TanH => x.tanh(),
        }
    }

    /// Evaluates the derivative `f'(x)`, given both the input `x` and the
    /// already-computed output `y = f(x)`.
    ///
    /// The rectifier family inspects the input with a strict `> 0`, so the
    /// derivative at exactly zero is zero. The saturating functions are
    /// cheaper to differentiate through their output.
    pub fn derivative(&self, x: f64, y: f64) -> f64 {
        match *self {
            Activator::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activator::LeakyReLU(alpha) => {
                if x > 0.0 {
                    1.0
                } else {
                    alpha
                }
            }
            Activator::Sigmoid => y * (1.0 - y),
            Activator::TanH => 1.0 - y * y,
        }
    }
}

/// An elementwise nonlinearity sitting between two dense layers.
///
/// Each instance remembers the inputs and outputs of its last forward
/// call so the backward pass can evaluate the derivative without
/// recomputing anything.
#[derive(Debug, Serialize, Deserialize)]
pub struct InnerActivation {
    kind: Activator,
    inputs: Vec<f64>,
    outputs: Vec<f64>,
    gradient: Vec<f64>,
}

impl InnerActivation {
    pub fn new(kind: Activator, width: usize) -> Self {
        InnerActivation {
            kind,
            inputs: vec![0.0; width],
            outputs: vec![0.0; width],
            gradient: vec![0.0; width],
        }
    }

    /// Applies the activation to `inputs`, caching both sides of the call.
    pub fn forward(&mut self, inputs: &[f64]) {
        assert_eq!(inputs.len(), self.inputs.len());
        self.inputs.copy_from_slice(inputs);
        for (y, &x) in self.outputs.iter_mut().zip(inputs) {
            *y = self.kind.f(x);
        }
    }

    /// Converts the downstream gradient into the gradient with respect to
    /// this activation's pre-activation inputs.
    pub fn backward(&mut self, upstream: &[f64]) {
        assert_eq!(upstream.len(), self.gradient.len());
        let kind = self.kind;
        for (g, &up, &x, &y) in multizip((
            self.gradient.iter_mut(),
            upstream.iter(),
            self.inputs.iter(),
            self.outputs.iter(),
        )) {
            *g = up * kind.derivative(x, y);
        }
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }
}

/// The output-side activation: a numerically stabilized softmax.
///
/// `backward` passes the upstream gradient through untouched. That is
/// only correct because [`CrossEntropy`](crate::loss::CrossEntropy)
/// already produces the combined softmax + cross-entropy gradient;
/// pairing this activation with any other loss is unsupported.
#[derive(Debug, Serialize, Deserialize)]
pub struct SoftMax {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
    gradient: Vec<f64>,
}

impl SoftMax {
    pub fn new(width: usize) -> Self {
        SoftMax {
            inputs: vec![0.0; width],
            outputs: vec![0.0; width],
            gradient: vec![0.0; width],
        }
    }

    /// Normalizes `inputs` into a probability distribution, subtracting
    /// the largest input before exponentiating so large scores cannot
    /// overflow.
    pub fn forward(&mut self, inputs: &[f64]) {
        assert_eq!(inputs.len(), self.inputs.len());
        self.inputs.copy_from_slice(inputs);

        let biggest = inputs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut exp_sum = 0.0;
        for (y, &x) in self.outputs.iter_mut().zip(inputs) {
            *y = (x - biggest).exp();
            exp_sum += *y;
        }
        for y in self.outputs.iter_mut() {
            *y /= exp_sum;
        }
    }

    /// Copies the loss gradient through unchanged.
    pub fn backward(&mut self, upstream: &[f64]) {
        assert_eq!(upstream.len(), self.gradient.len());
        self.gradient.copy_from_slice(upstream);
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }
}
