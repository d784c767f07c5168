use thiserror::Error;

/// Errors surfaced at the crate's public boundaries.
///
/// Shape and label validation happens once, at the network's public
/// methods; the numeric internals assume validated inputs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("label {label} is out of range for {classes} classes")]
    InvalidLabel { label: usize, classes: usize },

    #[error("cross-entropy is undefined for probability {0}")]
    NonPositiveProbability(f64),

    #[error("{0} called before a forward pass")]
    UninitializedState(&'static str),

    #[error("invalid topology: {0}")]
    InvalidTopology(&'static str),

    #[error("training requires at least one sample")]
    EmptyDataset,

    #[error("bad sample on line {line}: {message}")]
    Dataset { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
