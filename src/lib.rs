//! An online supervised-learning engine: dense layers, pluggable
//! activation functions, a softmax + cross-entropy head, and stochastic
//! gradient descent, trained one sample at a time.

#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod dataset;
pub mod error;
pub mod layer;
pub mod loss;
pub mod matrix;
pub mod network;
pub mod optimizer;
pub mod trainer;

pub use crate::error::Error;
pub use crate::network::Network;
