//! The counting pass: one sweep over the dataset, one increment per
//! (row, variable) pair.

use crate::codec::Scope;
use crate::dataset::Dataset;
use crate::error::ParamError;
use crate::network::{NetworkStructure, VarId};

/// Pseudo-counts plus observed counts for one variable's CPT.
///
/// Created seeded by the prior (see [`CountTable::seeded`]), filled by
/// [`count_rows`], consumed by [`CountTable::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable {
    pub(crate) scope: Scope,
    pub(crate) cells: Vec<f64>,
}

impl CountTable {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn variable(&self) -> VarId {
        self.scope.variable()
    }

    /// Cell values in codec order.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Total mass of the table.
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Total mass of parent configuration `config`.
    pub fn block_total(&self, config: usize) -> f64 {
        self.cells[self.scope.block_range(config)].iter().sum()
    }
}

/// Add one count per row to every table.
///
/// Each table is located through its own scope, so tables may come in any
/// order. The first missing or out-of-domain value aborts the pass; the
/// tables are then in an unspecified partially-counted state and must be
/// discarded.
pub fn count_rows<S: NetworkStructure + ?Sized>(
    structure: &S,
    tables: &mut [CountTable],
    data: &Dataset,
) -> Result<(), ParamError> {
    for (row_idx, row) in data.iter().enumerate() {
        for table in tables.iter_mut() {
            let offset = table.scope.encode_observation(structure, row, row_idx)?;
            table.cells[offset] += 1.0;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Counting pass consumed {} rows for {} tables",
        data.len(),
        tables.len()
    );

    Ok(())
}
