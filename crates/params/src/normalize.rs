//! Counts to conditional probabilities, one parent configuration at a time.

use crate::counting::CountTable;
use crate::cpt::Cpt;
use crate::dist::Dist;

impl CountTable {
    /// Turn the table into a CPT.
    ///
    /// Each parent configuration's block is divided by its own sum, so
    /// every conditional distribution sums to 1. A block with zero mass
    /// (only possible with a zero equivalent sample size and no matching
    /// rows) becomes uniform.
    pub fn normalize(self) -> Cpt {
        let CountTable { scope, cells } = self;
        let card = scope.cardinality();

        let mut probs = Vec::with_capacity(cells.len());
        for (_config, block) in cells.chunks_exact(card).enumerate() {
            match Dist::from_weights(block.to_vec()) {
                Ok(dist) => probs.extend(dist.p),
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "'{}': parent configuration {} has no mass, using uniform",
                        scope.name(),
                        _config
                    );
                    probs.extend(std::iter::repeat(1.0 / card as f64).take(card));
                }
            }
        }

        Cpt::from_parts(scope, probs)
    }
}
