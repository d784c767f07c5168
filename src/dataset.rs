//! Reading and writing labelled sample files.
//!
//! A dataset is a plain text file with one sample per line: the feature
//! values followed by the class label, separated by whitespace. Blank
//! lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use crate::error::Error;

/// A single labelled training sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: usize,
}

/// Loads every sample in the file at `path`, expecting `inputs_number`
/// feature values per line followed by the label.
pub fn load<P: AsRef<Path>>(path: P, inputs_number: usize) -> Result<Vec<Sample>, Error> {
    let file = File::open(path)?;
    let mut samples = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != inputs_number + 1 {
            return Err(Error::Dataset {
                line: index + 1,
                message: format!(
                    "expected {} values and a label, got {} fields",
                    inputs_number,
                    tokens.len()
                ),
            });
        }

        let mut features = Vec::with_capacity(inputs_number);
        for token in &tokens[..inputs_number] {
            features.push(token.parse().map_err(|_| Error::Dataset {
                line: index + 1,
                message: format!("bad feature value {:?}", token),
            })?);
        }
        let label = tokens[inputs_number].parse().map_err(|_| Error::Dataset {
            line: index + 1,
            message: format!("bad label {:?}", tokens[inputs_number]),
        })?;
        samples.push(Sample { features, label });
    }
    Ok(samples)
}

/// Writes `samples` to `path` in the same format [`load`] reads.
pub fn store<P: AsRef<Path>>(path: P, samples: &[Sample]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        writeln!(
            writer,
            "{} {}",
            sample.features.iter().join(" "),
            sample.label
        )?;
    }
    Ok(())
}
