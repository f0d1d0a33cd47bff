use std::ops::Range;

use rayon::prelude::*;

use crate::error::{AnalysisError, Result};

/// Dense cosine self-similarity matrix, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Similarity between frames `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Mean over the block `rows x cols`; 0 for an empty block
    pub fn block_mean(&self, rows: Range<usize>, cols: Range<usize>) -> f64 {
        let count = rows.len() * cols.len();
        if count == 0 {
            return 0.0;
        }

        let sum: f64 = rows
            .map(|i| {
                let row = &self.values[i * self.size..(i + 1) * self.size];
                row[cols.clone()].iter().sum::<f64>()
            })
            .sum();

        sum / count as f64
    }
}

/// Builds self-similarity matrices and checkerboard novelty curves
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    max_kernel_size: usize,
}

impl SimilarityEngine {
    pub fn new(max_kernel_size: usize) -> Self {
        Self { max_kernel_size }
    }

    /// Cosine similarity between every pair of L2-normalized rows.
    ///
    /// Rows with zero norm are left unscaled, so they are similar to nothing.
    pub fn self_similarity<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<SimilarityMatrix> {
        let size = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);

        let mut normalized: Vec<Vec<f64>> = Vec::with_capacity(size);
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(AnalysisError::RaggedFeatures {
                    row: row_idx,
                    expected: width,
                    actual: row.len(),
                }.into());
            }

            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            let norm = if norm == 0.0 { 1.0 } else { norm };
            normalized.push(row.iter().map(|v| v / norm).collect());
        }

        if size == 0 {
            return Ok(SimilarityMatrix { size, values: Vec::new() });
        }

        // Rows are independent; each worker fills one
        let mut values = vec![0.0; size * size];
        values
            .par_chunks_mut(size)
            .zip(normalized.par_iter())
            .for_each(|(out, a)| {
                for (cell, b) in out.iter_mut().zip(&normalized) {
                    *cell = a.iter().zip(b).map(|(x, y)| x * y).sum();
                }
            });

        Ok(SimilarityMatrix { size, values })
    }

    /// Checkerboard kernel half-width for a matrix of `frames` rows
    pub fn kernel_size(&self, frames: usize) -> usize {
        self.max_kernel_size.min(frames / 4)
    }

    /// Novelty curve: contrast between the two diagonal blocks around each
    /// frame and the two cross blocks. Zero where the kernel does not fit.
    pub fn novelty(&self, ssm: &SimilarityMatrix) -> Vec<f64> {
        let n = ssm.size();
        let k = self.kernel_size(n);
        let mut novelty = vec![0.0; n];

        if k == 0 {
            return novelty;
        }

        for i in k..n - k {
            let past = i - k..i;
            let future = i..i + k;

            let within = ssm.block_mean(past.clone(), past.clone())
                + ssm.block_mean(future.clone(), future.clone());
            let across = ssm.block_mean(past.clone(), future.clone())
                + ssm.block_mean(future, past);

            novelty[i] = within - across;
        }

        novelty
    }
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new(32)
    }
}
