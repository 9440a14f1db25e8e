//! Estimated conditional probability tables.

use std::slice::ChunksExact;

use crate::codec::Scope;
use crate::dist::Dist;
use crate::error::ParamError;
use crate::kernel::Kernel;
use crate::network::VarId;

/// P(variable | parents) as a flat table in codec order.
///
/// Produced by the normalizer and owned by whoever installs it; it is never
/// mutated afterwards. Every block of `cardinality()` cells sums to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Cpt {
    scope: Scope,
    probs: Vec<f64>,
}

impl Cpt {
    pub(crate) fn from_parts(scope: Scope, probs: Vec<f64>) -> Self {
        debug_assert_eq!(scope.len(), probs.len());
        Self { scope, probs }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn variable(&self) -> VarId {
        self.scope.variable()
    }

    /// All cells, in codec order.
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Number of states of the variable.
    pub fn cardinality(&self) -> usize {
        self.scope.cardinality()
    }

    pub fn n_parent_configs(&self) -> usize {
        self.scope.n_parent_configs()
    }

    /// The conditional distribution of parent configuration `config`.
    pub fn block(&self, config: usize) -> Option<&[f64]> {
        if config >= self.n_parent_configs() {
            return None;
        }
        Some(&self.probs[self.scope.block_range(config)])
    }

    /// Iterate blocks in parent-configuration order.
    pub fn blocks(&self) -> ChunksExact<'_, f64> {
        self.probs.chunks_exact(self.cardinality())
    }

    /// P(variable = state | parents = parent_states).
    ///
    /// `parent_states` are value-indices in the scope's parent order.
    pub fn prob(&self, state: usize, parent_states: &[usize]) -> Result<f64, ParamError> {
        let digits: Vec<usize> = std::iter::once(state)
            .chain(parent_states.iter().copied())
            .collect();
        let offset = self.scope.encode(&digits)?;
        Ok(self.probs[offset])
    }

    /// P(variable | parents = parent_states) as a distribution.
    pub fn distribution(&self, parent_states: &[usize]) -> Result<Dist, ParamError> {
        let offset = self.prob_offset(parent_states)?;
        let config = self.scope.parent_config(offset);
        Ok(Dist {
            p: self.probs[self.scope.block_range(config)].to_vec(),
        })
    }

    /// The table as a row-stochastic kernel (rows = parent configurations).
    pub fn to_kernel(&self) -> Kernel {
        Kernel {
            k: self.blocks().map(<[f64]>::to_vec).collect(),
            n_inputs: self.n_parent_configs(),
            n_outputs: self.cardinality(),
        }
    }

    fn prob_offset(&self, parent_states: &[usize]) -> Result<usize, ParamError> {
        let digits: Vec<usize> = std::iter::once(0)
            .chain(parent_states.iter().copied())
            .collect();
        self.scope.encode(&digits)
    }
}
