use std::ops::{Index, IndexMut};

use rand::distributions::Distribution;
use rand::Rng;

/// A trait to replace all elements in a container with zeros.
pub trait ZeroOut {
    fn zero_out(&mut self);
}

impl ZeroOut for Vec<f64> {
    fn zero_out(&mut self) {
        for value in self.iter_mut() {
            *value = 0.0;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn random<D, R>(distribution: D, rng: &mut R, rows: usize, cols: usize) -> Self
    where
        D: Distribution<f64>,
        R: Rng,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for _ in 0..(rows * cols) {
            data.push(distribution.sample(rng));
        }
        Mat { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

impl ZeroOut for Mat {
    fn zero_out(&mut self) {
        self.data.zero_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::distributions::Uniform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zeros_has_requested_shape() {
        let mat = Mat::zeros(3, 2);
        assert_eq!(mat.rows(), 3);
        assert_eq!(mat.cols(), 2);
        assert!(mat.as_slice().iter().all(|&value| value == 0.0));
    }

    #[test]
    fn random_stays_in_distribution_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mat = Mat::random(Uniform::new_inclusive(-0.9, 0.9), &mut rng, 4, 5);
        assert_eq!(mat.as_slice().len(), 20);
        for &value in mat.as_slice() {
            assert!((-0.9..=0.9).contains(&value));
        }
    }

    #[test]
    fn rows_are_contiguous() {
        let mut mat = Mat::zeros(2, 3);
        mat[(1, 0)] = 4.0;
        mat[(1, 2)] = 6.0;
        assert_eq!(mat.row(0), &[0.0, 0.0, 0.0]);
        assert_eq!(mat.row(1), &[4.0, 0.0, 6.0]);
        mat.row_mut(0)[1] = 2.0;
        assert_eq!(mat[(0, 1)], 2.0);
    }

    #[test]
    fn zero_out_clears_every_entry() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut mat = Mat::random(Uniform::new_inclusive(-0.9, 0.9), &mut rng, 2, 2);
        mat.zero_out();
        assert_eq!(mat, Mat::zeros(2, 2));
    }
}
