//! # Bayesnet Params - Dirichlet-prior CPT estimation
//!
//! Fills in the conditional probability tables of a discrete Bayesian
//! network whose structure is already known, from a complete dataset.
//!
//! ## Core Concepts
//!
//! - **Flat CPTs**: a variable's table has `|X| · ∏|Pᵢ|` cells; the
//!   variable's own value is the least significant digit, so each parent
//!   configuration owns a contiguous block of `|X|` cells
//! - **Equivalent sample size**: `S` pseudo-counts spread evenly over every
//!   table before any data is seen (`S / n` per cell)
//! - **One counting pass**: every row adds exactly one count to one cell of
//!   every table
//! - **Per-block normalization**: each block is divided by its own sum, so
//!   `Σₓ P(X=x | pa) = 1` for every parent configuration `pa`
//!
//! ## Example: Binary Variable with a Prior
//!
//! ```rust
//! use bayesnet_params::{BayesianEstimator, Dataset, Network, Variable};
//!
//! let mut net = Network::new();
//! let p = net.add_variable(Variable::binary("P")).unwrap();
//! let y = net.add_variable(Variable::binary("Y")).unwrap();
//! net.set_parents(y, vec![p]).unwrap();
//!
//! let mut data = Dataset::for_structure(&net);
//! for (pv, yv) in [("0", "0"), ("0", "1"), ("1", "1"), ("1", "1")] {
//!     data.push_record(&net, [("P", pv), ("Y", yv)]).unwrap();
//! }
//!
//! BayesianEstimator::maximum_likelihood().fit(&mut net, &data).unwrap();
//!
//! let cpt = net.cpt(y).unwrap();
//! assert!((cpt.prob(1, &[0]).unwrap() - 0.5).abs() < 1e-9);  // P(Y=1 | P=0)
//! assert!((cpt.prob(1, &[1]).unwrap() - 1.0).abs() < 1e-9);  // P(Y=1 | P=1)
//! ```

mod codec;
mod config;
mod counting;
mod cpt;
mod dataset;
mod dist;
mod error;
mod estimator;
mod kernel;
mod network;
mod normalize;
mod prior;

pub use codec::Scope;
pub use config::EstimatorConfig;
pub use counting::{count_rows, CountTable};
pub use cpt::Cpt;
pub use dataset::{Dataset, Observation};
pub use dist::Dist;
pub use error::ParamError;
pub use estimator::{BayesianEstimator, Parameters};
pub use kernel::Kernel;
pub use network::{
    sprinkler_structure, Network, NetworkStructure, ParameterStore, VarId, Variable,
};
pub use prior::PriorCounts;

/// Tolerance for probability comparisons.
pub const PROB_TOLERANCE: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_sprinkler_blocks_sum_to_one() {
        let mut net = sprinkler_structure().unwrap();
        let mut data = Dataset::for_structure(&net);
        for row in [[1, 0, 1, 1], [0, 1, 0, 1], [0, 0, 0, 0], [1, 0, 1, 1]] {
            data.push_row(row).unwrap();
        }

        BayesianEstimator::new().fit(&mut net, &data).unwrap();
        assert!(net.is_parameterized());

        for var in net.variables() {
            let cpt = net.cpt(var).unwrap();
            assert_eq!(cpt.len(), net.scope_size(var));
            for block in cpt.blocks() {
                let sum: f64 = block.iter().sum();
                assert!((sum - 1.0).abs() < PROB_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_log_likelihood_after_fit() {
        let mut net = Network::new();
        let x = net.add_variable(Variable::binary("X")).unwrap();
        let data = Dataset::from_rows(1, [[0], [1], [1], [1]]).unwrap();

        BayesianEstimator::maximum_likelihood()
            .fit(&mut net, &data)
            .unwrap();

        let expected = 0.25_f64.ln() + 3.0 * 0.75_f64.ln();
        assert!((net.log_likelihood(&data).unwrap() - expected).abs() < PROB_TOLERANCE);
        assert!((net.cpt(x).unwrap().probs()[1] - 0.75).abs() < PROB_TOLERANCE);
    }
}
