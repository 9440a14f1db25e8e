//! Probability distributions over finite sets.

use crate::error::ParamError;
use crate::PROB_TOLERANCE;

/// A probability distribution over a finite set {0, 1, ..., n-1}.
///
/// Invariants:
/// - All probabilities are non-negative
/// - Probabilities sum to 1 (within tolerance)
///
/// # Example
///
/// ```rust
/// use bayesnet_params::Dist;
///
/// let coin = Dist::uniform(2).unwrap();
/// assert!((coin.p[0] - 0.5).abs() < 1e-9);
///
/// let d = Dist::from_weights(vec![2.0, 4.0]).unwrap();
/// assert!((d.p[1] - 2.0 / 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dist {
    /// Probability vector (sums to 1).
    pub p: Vec<f64>,
}

impl Dist {
    /// Create a new distribution from a probability vector.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vector is empty
    /// - Any probability is negative
    /// - The probabilities don't sum to 1 (within tolerance)
    pub fn new(p: Vec<f64>) -> Result<Self, ParamError> {
        if p.is_empty() {
            return Err(ParamError::EmptyDistribution);
        }

        if p.iter().any(|&x| x < -PROB_TOLERANCE) {
            return Err(ParamError::NegativeProbability);
        }

        let sum: f64 = p.iter().sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(ParamError::NotNormalized { sum });
        }

        Ok(Self { p })
    }

    /// Create a distribution from unnormalized weights (e.g. counts).
    ///
    /// # Errors
    ///
    /// Returns an error if the weights are empty, any weight is negative or
    /// not finite, or the weights sum to zero.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, ParamError> {
        if weights.is_empty() {
            return Err(ParamError::EmptyDistribution);
        }

        if weights.iter().any(|&x| x < 0.0 || x.is_nan()) {
            return Err(ParamError::NegativeProbability);
        }
        if weights.iter().any(|x| x.is_infinite()) {
            return Err(ParamError::NotNormalized { sum: f64::INFINITY });
        }

        let mut sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(ParamError::ZeroWeights);
        }

        // Finite weights can still overflow when summed
        let mut weights = weights;
        if sum.is_infinite() {
            let max = weights.iter().fold(0.0_f64, |m, &x| m.max(x));
            weights.iter_mut().for_each(|w| *w /= max);
            sum = weights.iter().sum();
        }

        let p: Vec<f64> = weights.iter().map(|w| w / sum).collect();
        Ok(Self { p })
    }

    /// Create a uniform distribution over n elements.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::EmptyDistribution`] if `n` is 0.
    pub fn uniform(n: usize) -> Result<Self, ParamError> {
        if n == 0 {
            return Err(ParamError::EmptyDistribution);
        }
        Ok(Self {
            p: vec![1.0 / n as f64; n],
        })
    }

    /// The number of outcomes in the sample space.
    pub fn len(&self) -> usize {
        self.p.len()
    }

    /// Check if the distribution is over an empty set (always false for valid Dist).
    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    /// Get the probability of outcome i.
    pub fn prob(&self, i: usize) -> Option<f64> {
        self.p.get(i).copied()
    }

    /// Mode: the index with highest probability.
    ///
    /// Returns the first index if there are ties.
    pub fn mode(&self) -> usize {
        self.p
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, best_p), (i, &x)| {
                if x > best_p {
                    (i, x)
                } else {
                    (best, best_p)
                }
            })
            .0
    }

    /// Shannon entropy (natural log). Zero-probability outcomes contribute 0.
    pub fn entropy(&self) -> f64 {
        self.p
            .iter()
            .filter(|&&x| x > PROB_TOLERANCE)
            .map(|&x| -x * x.ln())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist_new_valid() {
        let d = Dist::new(vec![0.3, 0.7]).unwrap();
        assert_eq!(d.len(), 2);
        assert!((d.p[0] - 0.3).abs() < PROB_TOLERANCE);
    }

    #[test]
    fn test_dist_new_not_normalized() {
        let result = Dist::new(vec![0.3, 0.6]);
        assert!(matches!(result, Err(ParamError::NotNormalized { .. })));
    }

    #[test]
    fn test_dist_new_negative() {
        let result = Dist::new(vec![-0.5, 1.5]);
        assert!(matches!(result, Err(ParamError::NegativeProbability)));
    }

    #[test]
    fn test_dist_from_weights() {
        let d = Dist::from_weights(vec![1.0, 2.0, 3.0]).unwrap();
        assert!((d.p[0] - 1.0 / 6.0).abs() < PROB_TOLERANCE);
        assert!((d.p[1] - 2.0 / 6.0).abs() < PROB_TOLERANCE);
        assert!((d.p[2] - 3.0 / 6.0).abs() < PROB_TOLERANCE);
    }

    #[test]
    fn test_dist_from_zero_weights() {
        let result = Dist::from_weights(vec![0.0, 0.0]);
        assert!(matches!(result, Err(ParamError::ZeroWeights)));
    }

    #[test]
    fn test_dist_from_huge_weights() {
        let d = Dist::from_weights(vec![1e308, 1e308]).unwrap();
        assert_eq!(d.p, vec![0.5, 0.5]);

        let d = Dist::from_weights(vec![1.5e308, 0.5e308, 0.0]).unwrap();
        assert!((d.p[0] - 0.75).abs() < PROB_TOLERANCE);
        assert!((d.p.iter().sum::<f64>() - 1.0).abs() < PROB_TOLERANCE);

        assert!(Dist::from_weights(vec![f64::INFINITY, 1.0]).is_err());
        assert!(Dist::from_weights(vec![f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_dist_uniform() {
        let d = Dist::uniform(4).unwrap();
        for p in &d.p {
            assert!((p - 0.25).abs() < PROB_TOLERANCE);
        }
        assert!(matches!(Dist::uniform(0), Err(ParamError::EmptyDistribution)));
    }

    #[test]
    fn test_mode_and_entropy() {
        let d = Dist::new(vec![0.2, 0.5, 0.3]).unwrap();
        assert_eq!(d.mode(), 1);
        assert_eq!(d.prob(2), Some(0.3));
        assert_eq!(d.prob(3), None);

        let certain = Dist::new(vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        assert!(certain.entropy().abs() < PROB_TOLERANCE);
        let uniform = Dist::uniform(4).unwrap();
        assert!((uniform.entropy() - 4.0_f64.ln()).abs() < PROB_TOLERANCE);
    }
}
