use dendrite::activator::Activator;
use dendrite::dataset::Sample;
use dendrite::network::Network;
use dendrite::optimizer::Sgd;
use dendrite::trainer::{Logging, StopCondition, Trainer};

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Noisy points on the unit circle, labelled by quadrant parity.
fn generate_data<R: Rng>(rng: &mut R, num_samples: usize) -> Vec<Sample> {
    let radians = Uniform::new(0.0, 2.0 * std::f64::consts::PI);
    let noise = Uniform::new_inclusive(-0.15, 0.15);

    let mut data = Vec::new();
    for _ in 0..num_samples {
        let theta = radians.sample(rng);
        let point = vec![
            theta.cos() + noise.sample(rng),
            theta.sin() + noise.sample(rng),
        ];
        let label = if point[0] * point[1] > 0.0 { 0 } else { 1 };
        data.push(Sample {
            features: point,
            label,
        });
    }
    data
}

fn score(set_name: &str, network: &mut Network<Sgd>, test_data: &[Sample]) {
    let mut num_correct = 0;
    for sample in test_data {
        network.feed(&sample.features).unwrap();
        let output = network.output();
        let class = if output[0] > output[1] { 0 } else { 1 };
        if class == sample.label {
            num_correct += 1;
        }
    }
    println!(
        "{} set results: {} of {} correct",
        set_name,
        num_correct,
        test_data.len()
    );
}

fn main() {
    let mut rng = StdRng::seed_from_u64(271_828);
    let training_data = generate_data(&mut rng, 10_000);

    let network =
        Network::new(2, 3, 2, 8, Activator::Sigmoid, Sgd::new(0.1), &mut rng).unwrap();
    let mut network = Trainer::new(network)
        .stop_condition(StopCondition::Epochs(25))
        .logging(Logging::Epochs(5))
        .train(&training_data)
        .unwrap();

    println!();
    score("Training", &mut network, &training_data);
    score("Test", &mut network, &generate_data(&mut rng, 1_000));
}
