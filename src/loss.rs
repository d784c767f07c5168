//! Loss functions.

use crate::error::Error;

/// [Cross-entropy loss](https://en.wikipedia.org/wiki/Cross_entropy)
/// over a predicted probability distribution.
///
/// `forward` consumes only the probability assigned to the true class;
/// `backward` consumes the whole distribution and produces the combined
/// softmax + cross-entropy gradient. Because the softmax derivative is
/// folded in here, this loss must be paired with
/// [`SoftMax`](crate::activator::SoftMax).
#[derive(Debug, Serialize, Deserialize)]
pub struct CrossEntropy {
    gradient: Vec<f64>,
    value: f64,
}

impl CrossEntropy {
    pub fn new(width: usize) -> Self {
        CrossEntropy {
            gradient: vec![0.0; width],
            value: 0.0,
        }
    }

    /// Records and returns `-ln(p)` for the true-class probability `p`.
    ///
    /// Fails with [`Error::NonPositiveProbability`] when `p <= 0`, where
    /// the logarithm is undefined.
    pub fn forward(&mut self, probability: f64) -> Result<f64, Error> {
        if probability <= 0.0 {
            return Err(Error::NonPositiveProbability(probability));
        }
        self.value = -probability.ln();
        Ok(self.value)
    }

    /// Computes the gradient of the loss with respect to the scores
    /// behind the softmax: the predicted distribution, minus one at the
    /// true class.
    pub fn backward(&mut self, predicted: &[f64], label: usize) {
        assert_eq!(predicted.len(), self.gradient.len());
        assert!(label < self.gradient.len());
        self.gradient.copy_from_slice(predicted);
        self.gradient[label] -= 1.0;
    }

    /// The loss recorded by the most recent `forward` call.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }
}
