//! Gradient-descent optimizers.

use crate::layer::DenseLayer;

/// Consumes a layer's cached gradients and updates its parameters in
/// place.
///
/// Optimizers carry no per-layer state; the same instance is applied to
/// every layer in a network. Calling `optimize` twice without a fresh
/// backward pass reapplies the same cached gradient.
pub trait Optimizer {
    fn optimize(&self, layer: &mut DenseLayer);
}

/// Stochastic gradient descent.
///
/// The plain update rule `parameter -= learning_rate * gradient`, with
/// no momentum and no regularization.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Sgd {
    learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Sgd { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn update(&self, parameters: &mut [f64], gradients: &[f64]) {
        assert_eq!(parameters.len(), gradients.len());
        for (parameter, gradient) in parameters.iter_mut().zip(gradients) {
            *parameter -= self.learning_rate * gradient;
        }
    }
}

impl Optimizer for Sgd {
    fn optimize(&self, layer: &mut DenseLayer) {
        let (weights, gradients) = layer.weights_mut();
        self.update(weights, gradients);
        let (biases, gradients) = layer.biases_mut();
        self.update(biases, gradients);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sgd_reports_its_learning_rate() {
        assert_eq!(Sgd::new(0.01).learning_rate(), 0.01);
    }

    #[test]
    fn sgd_applies_the_exact_update_rule() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut layer = DenseLayer::new(1, 1, &mut rng);
        {
            let (weights, _) = layer.weights_mut();
            weights[0] = 0.8;
        }

        // forward then backward give weight gradient x * g and bias
        // gradient g exactly
        let x = 1.5;
        let g = 0.4;
        layer.forward(&[x]);
        layer.backward(&[g]);

        let learning_rate = 0.1;
        Sgd::new(learning_rate).optimize(&mut layer);

        assert_eq!(layer.weights()[(0, 0)], 0.8 - learning_rate * (x * g));
        assert_eq!(layer.biases()[0], 0.0 - learning_rate * g);
    }

    #[test]
    fn zero_learning_rate_changes_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut layer = DenseLayer::new(3, 2, &mut rng);
        layer.forward(&[1.0, -2.0, 0.5]);
        layer.backward(&[1.0, 1.0]);

        let weights_before = layer.weights().clone();
        let biases_before = layer.biases().to_vec();
        Sgd::new(0.0).optimize(&mut layer);

        assert_eq!(layer.weights(), &weights_before);
        assert_eq!(layer.biases(), biases_before.as_slice());
    }

    #[test]
    fn repeated_optimize_reapplies_the_cached_gradient() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut layer = DenseLayer::new(1, 1, &mut rng);
        {
            let (weights, _) = layer.weights_mut();
            weights[0] = 1.0;
        }
        layer.forward(&[2.0]);
        layer.backward(&[1.0]);

        let optimizer = Sgd::new(0.25);
        optimizer.optimize(&mut layer);
        optimizer.optimize(&mut layer);

        // two identical steps of 0.25 * 2.0 each
        assert_eq!(layer.weights()[(0, 0)], 0.0);
    }
}
