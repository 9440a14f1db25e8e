//! Dirichlet prior seeding.
//!
//! Every cell of a variable's table starts at `S / n`, where `S` is the
//! equivalent sample size and `n` the scope size. A prior override replaces
//! that seed for chosen values of the variable.

use std::collections::{BTreeMap, HashMap};

use crate::codec::Scope;
use crate::counting::CountTable;
use crate::error::ParamError;
use crate::network::{NetworkStructure, VarId};

/// Prior frequency overrides resolved against a structure.
///
/// For each overridden variable, one optional pseudo-count per value-index
/// of the variable's own domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorCounts {
    overrides: HashMap<VarId, Vec<Option<f64>>>,
}

impl PriorCounts {
    /// Resolve `variable name → value label → frequency` against `structure`.
    ///
    /// # Errors
    ///
    /// [`ParamError::InvalidPrior`] if a variable or value is unknown, a
    /// frequency is negative or not finite, or a variable's frequencies sum
    /// past the range of `f64`.
    pub fn resolve<S: NetworkStructure + ?Sized>(
        structure: &S,
        priors: &BTreeMap<String, BTreeMap<String, f64>>,
    ) -> Result<Self, ParamError> {
        let mut overrides = HashMap::new();

        for (name, frequencies) in priors {
            let var = structure
                .find(name)
                .ok_or_else(|| ParamError::InvalidPrior {
                    variable: name.clone(),
                    reason: "unknown variable".to_string(),
                })?;

            let mut seeds = vec![None; structure.cardinality(var)];
            for (value, &frequency) in frequencies {
                let idx = structure
                    .value_index(var, value)
                    .ok_or_else(|| ParamError::InvalidPrior {
                        variable: name.clone(),
                        reason: format!("unknown value '{}'", value),
                    })?;

                if !frequency.is_finite() || frequency < 0.0 {
                    return Err(ParamError::InvalidPrior {
                        variable: name.clone(),
                        reason: format!(
                            "frequency {} for '{}' is not a pseudo-count",
                            frequency, value
                        ),
                    });
                }
                seeds[idx] = Some(frequency);
            }

            let mass: f64 = seeds.iter().flatten().sum();
            if !mass.is_finite() {
                return Err(ParamError::InvalidPrior {
                    variable: name.clone(),
                    reason: "prior frequencies sum to infinity".to_string(),
                });
            }
            overrides.insert(var, seeds);
        }

        Ok(Self { overrides })
    }

    /// Per-value seeds for `var`, if it has an override.
    pub fn for_variable(&self, var: VarId) -> Option<&[Option<f64>]> {
        self.overrides.get(&var).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl CountTable {
    /// Fresh table for `scope`, every cell at `equivalent_sample_size / n`.
    ///
    /// `overrides[v]`, when set, replaces the seed of every cell whose own
    /// value-index is `v`, in every parent configuration.
    ///
    /// # Errors
    ///
    /// - [`ParamError::DegenerateDomain`] if the scope has no cells
    /// - [`ParamError::InvalidSampleSize`] if the sample size is negative or
    ///   not finite
    pub fn seeded(
        scope: Scope,
        equivalent_sample_size: f64,
        overrides: Option<&[Option<f64>]>,
    ) -> Result<Self, ParamError> {
        let n = scope.len();
        if n == 0 {
            return Err(ParamError::DegenerateDomain {
                variable: scope.name().to_string(),
            });
        }
        if !equivalent_sample_size.is_finite() || equivalent_sample_size < 0.0 {
            return Err(ParamError::InvalidSampleSize {
                value: equivalent_sample_size,
            });
        }

        let seed = equivalent_sample_size / n as f64;
        let mut cells = vec![seed; n];

        if let Some(overrides) = overrides {
            let card = scope.cardinality();
            for (offset, cell) in cells.iter_mut().enumerate() {
                if let Some(Some(freq)) = overrides.get(offset % card) {
                    *cell = *freq;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Seeded '{}': {} cells at {:.4} (overrides: {})",
            scope.name(),
            n,
            seed,
            overrides.is_some()
        );

        Ok(Self { scope, cells })
    }
}
