//! Row-stochastic view of a CPT.

use crate::dist::Dist;
use crate::error::ParamError;
use crate::PROB_TOLERANCE;

/// A Markov kernel from parent configurations to states of a variable.
///
/// - `k[i][j]` = P(variable = j | parent configuration = i)
/// - Each row sums to 1
///
/// # Example
///
/// ```rust
/// use bayesnet_params::{Dist, Kernel};
///
/// let k = Kernel::new(vec![
///     vec![0.9, 0.1],
///     vec![0.2, 0.8],
/// ]).unwrap();
///
/// let parents = Dist::new(vec![0.5, 0.5]).unwrap();
/// let child = k.apply(&parents).unwrap();
/// assert!((child.p[1] - 0.45).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Row-stochastic matrix: `k[i][j]` = P(output=j | input=i)
    pub k: Vec<Vec<f64>>,
    /// Number of input states (parent configurations)
    pub n_inputs: usize,
    /// Number of output states
    pub n_outputs: usize,
}

impl Kernel {
    /// Create a new kernel from a row-stochastic matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The matrix is empty
    /// - Rows have different lengths
    /// - Any row doesn't sum to 1 (within tolerance)
    pub fn new(k: Vec<Vec<f64>>) -> Result<Self, ParamError> {
        let n_inputs = k.len();
        let n_outputs = k.first().map(Vec::len).unwrap_or(0);
        if n_outputs == 0 {
            return Err(ParamError::EmptyDistribution);
        }

        for (i, row) in k.iter().enumerate() {
            if row.len() != n_outputs {
                return Err(ParamError::RaggedMatrix);
            }

            if row.iter().any(|&x| x < -PROB_TOLERANCE) {
                return Err(ParamError::NegativeProbability);
            }

            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > PROB_TOLERANCE {
                return Err(ParamError::RowNotNormalized { row: i, sum });
            }
        }

        Ok(Self {
            k,
            n_inputs,
            n_outputs,
        })
    }

    /// Push a distribution over parent configurations through the kernel.
    ///
    /// `K(p)[j] = Σᵢ p[i] · K[i,j]`
    pub fn apply(&self, dist: &Dist) -> Result<Dist, ParamError> {
        if dist.p.len() != self.n_inputs {
            return Err(ParamError::ShapeMismatch {
                expected: self.n_inputs,
                got: dist.p.len(),
            });
        }

        let mut result = vec![0.0; self.n_outputs];
        for (row, &weight) in self.k.iter().zip(&dist.p) {
            for (out, &x) in result.iter_mut().zip(row) {
                *out += weight * x;
            }
        }

        Ok(Dist { p: result })
    }
}
