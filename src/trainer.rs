//! Utilities for training networks.

use std::time::{Duration, Instant};

use crate::dataset::Sample;
use crate::error::Error;
use crate::network::Network;
use crate::optimizer::Optimizer;

/// A builder that drives online training of a [`Network`].
///
/// Training is strictly one sample at a time: every sample triggers a
/// forward pass, a loss evaluation, a backward pass, and a parameter
/// update before the next sample is touched.
#[derive(Debug)]
pub struct Trainer<O: Optimizer> {
    network: Network<O>,
    logging: Logging,
    stop_condition: StopCondition,
}

impl<O: Optimizer> Trainer<O> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * Stops after 1000 training epochs.
    /// * Logs on training completion.
    pub fn new(network: Network<O>) -> Self {
        Trainer {
            network,
            logging: Logging::Completion,
            stop_condition: StopCondition::Epochs(1000),
        }
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Trains the network on the provided labelled `samples`.
    ///
    /// Returns the trained network, or the first error a sample raises
    /// (wrong feature count, out-of-range label, vanished probability).
    pub fn train(mut self, samples: &[Sample]) -> Result<Network<O>, Error> {
        if samples.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let start_time = Instant::now();
        let mut epoch = 0;
        let mut epoch_loss;
        let mut accuracy;
        loop {
            epoch_loss = 0.0;
            let mut correct = 0;
            for sample in samples {
                self.network.feed_labelled(&sample.features, sample.label)?;
                self.network.backward_and_optimize(sample.label)?;
                epoch_loss += self.network.loss();
                if argmax(self.network.output()) == sample.label {
                    correct += 1;
                }
            }
            epoch_loss /= samples.len() as f64;
            accuracy = correct as f64 / samples.len() as f64;
            epoch += 1;

            self.logging.epoch(epoch, epoch_loss, accuracy);
            if self
                .stop_condition
                .should_stop(epoch, epoch_loss, start_time)
            {
                break;
            }
        }
        self.logging
            .completion(epoch, epoch_loss, accuracy, start_time);
        Ok(self.network)
    }
}

/// Returns the index of the largest value.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = index;
        }
    }
    best
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be printed
    Silent,
    /// A summary will be printed at completion
    Completion,
    /// A summary will be printed after every `n` training epochs
    Epochs(usize),
}

impl Logging {
    /// Performs logging at the current `epoch` of training.
    fn epoch(&self, epoch: usize, loss: f64, accuracy: f64) {
        if let Logging::Epochs(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                println!(
                    "Epoch {}:\tloss={:.6}\taccuracy={:.1}%",
                    epoch,
                    loss,
                    100.0 * accuracy
                );
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, epochs: usize, loss: f64, accuracy: f64, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        println!(
            "Ran {} epochs in {} seconds.",
            epochs,
            start_time.elapsed().as_secs()
        );
        println!("Final loss: {}", loss);
        println!("Final accuracy: {:.1}%", 100.0 * accuracy);
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug)]
pub enum StopCondition {
    /// Stops after the provided number of training epochs
    Epochs(usize),
    /// Stops when the average epoch loss drops below the provided
    /// threshold
    LossThreshold(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(&self, epoch: usize, loss: f64, start_time: Instant) -> bool {
        match *self {
            StopCondition::Epochs(epochs) => epoch >= epochs,
            StopCondition::LossThreshold(threshold) => loss < threshold,
            StopCondition::Duration(duration) => start_time.elapsed() > duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::activator::Activator;
    use crate::optimizer::Sgd;

    fn two_class_samples() -> Vec<Sample> {
        vec![
            Sample {
                features: vec![1.0, 0.0],
                label: 0,
            },
            Sample {
                features: vec![0.0, 1.0],
                label: 1,
            },
        ]
    }

    #[test]
    fn training_needs_samples() {
        let mut rng = StdRng::seed_from_u64(20);
        let network =
            Network::new(2, 2, 2, 4, Activator::Sigmoid, Sgd::new(0.5), &mut rng).unwrap();
        assert!(matches!(
            Trainer::new(network).train(&[]),
            Err(Error::EmptyDataset)
        ));
    }

    #[test]
    fn a_separable_pair_is_learned() {
        let mut rng = StdRng::seed_from_u64(21);
        let network =
            Network::new(2, 2, 2, 4, Activator::Sigmoid, Sgd::new(0.5), &mut rng).unwrap();
        let samples = two_class_samples();

        let mut network = Trainer::new(network)
            .logging(Logging::Silent)
            .stop_condition(StopCondition::Epochs(500))
            .train(&samples)
            .unwrap();

        for sample in &samples {
            network.feed(&sample.features).unwrap();
            assert_eq!(argmax(network.output()), sample.label);
        }
    }

    #[test]
    fn a_zero_duration_stops_after_one_epoch() {
        let mut rng = StdRng::seed_from_u64(22);
        let network =
            Network::new(2, 2, 2, 4, Activator::Sigmoid, Sgd::new(0.5), &mut rng).unwrap();

        // From<Duration> picks the duration stop condition.
        let trained = Trainer::new(network)
            .logging(Logging::Silent)
            .stop_condition(Duration::from_secs(0))
            .train(&two_class_samples());
        assert!(trained.is_ok());
    }

    #[test]
    fn a_bad_label_in_the_dataset_surfaces() {
        let mut rng = StdRng::seed_from_u64(23);
        let network =
            Network::new(2, 2, 2, 4, Activator::Sigmoid, Sgd::new(0.5), &mut rng).unwrap();
        let samples = vec![Sample {
            features: vec![1.0, 0.0],
            label: 7,
        }];

        assert!(matches!(
            Trainer::new(network)
                .logging(Logging::Silent)
                .train(&samples),
            Err(Error::InvalidLabel { label: 7, .. })
        ));
    }

    #[test]
    fn argmax_picks_the_first_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), 1);
    }
}
