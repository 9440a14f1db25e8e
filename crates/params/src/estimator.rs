//! Bayesian (Dirichlet-prior) estimation of every CPT in a network.
//!
//! # Algorithm
//!
//! 1. Seed each variable's table with `S / n` pseudo-counts (or the
//!    configured prior frequencies)
//! 2. Count every (row, variable) cell in one pass over the dataset
//! 3. Normalize each parent configuration's block to sum to 1
//!
//! The result is the posterior mean of a Dirichlet prior updated with
//! multinomial counts. With `S = 0` it is the maximum likelihood estimate;
//! as `S` grows the tables approach uniform.

use crate::codec::Scope;
use crate::config::EstimatorConfig;
use crate::counting::{count_rows, CountTable};
use crate::cpt::Cpt;
use crate::dataset::Dataset;
use crate::error::ParamError;
use crate::network::{scopes, NetworkStructure, ParameterStore, VarId};
use crate::prior::PriorCounts;

/// Estimates CPTs from complete data with a Dirichlet prior.
///
/// # Example
///
/// ```rust
/// use bayesnet_params::{BayesianEstimator, Dataset, Network, Variable};
///
/// let mut net = Network::new();
/// let x = net.add_variable(Variable::binary("X")).unwrap();
///
/// let data = Dataset::from_rows(1, [[0], [1], [1], [1]]).unwrap();
///
/// BayesianEstimator::new()
///     .with_equivalent_sample_size(2.0)
///     .fit(&mut net, &data)
///     .unwrap();
///
/// let cpt = net.cpt(x).unwrap();
/// assert!((cpt.probs()[0] - 1.0 / 3.0).abs() < 1e-9);
/// assert!((cpt.probs()[1] - 2.0 / 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BayesianEstimator {
    config: EstimatorConfig,
}

impl BayesianEstimator {
    /// Uniform prior with equivalent sample size = number of rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero pseudo-counts: relative-frequency estimation.
    pub fn maximum_likelihood() -> Self {
        Self::new().with_equivalent_sample_size(0.0)
    }

    pub fn from_config(config: EstimatorConfig) -> Result<Self, ParamError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_equivalent_sample_size(mut self, size: f64) -> Self {
        self.config = self.config.with_equivalent_sample_size(size);
        self
    }

    /// Seed `value` of `variable` with `frequency` pseudo-counts.
    pub fn with_prior(
        mut self,
        variable: impl Into<String>,
        value: impl Into<String>,
        frequency: f64,
    ) -> Self {
        self.config = self.config.with_prior(variable, value, frequency);
        self
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Seeded and counted tables, before normalization.
    ///
    /// These are the posterior Dirichlet parameters of every table.
    pub fn counts<S: NetworkStructure + ?Sized>(
        &self,
        structure: &S,
        data: &Dataset,
    ) -> Result<Vec<CountTable>, ParamError> {
        let sample_size = self.config.sample_size_for(data.len())?;
        let priors = PriorCounts::resolve(structure, &self.config.priors)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Estimating {} variables from {} rows (equivalent sample size {})",
            structure.variables().len(),
            data.len(),
            sample_size
        );

        let mut tables = scopes(structure)?
            .into_iter()
            .map(|scope| {
                let seeds = priors.for_variable(scope.variable());
                CountTable::seeded(scope, sample_size, seeds)
            })
            .collect::<Result<Vec<_>, _>>()?;

        count_rows(structure, &mut tables, data)?;
        Ok(tables)
    }

    /// Estimate every CPT without touching the structure.
    ///
    /// Any observation or domain error aborts the run; no tables are
    /// returned from a failed run.
    pub fn estimate<S: NetworkStructure + ?Sized>(
        &self,
        structure: &S,
        data: &Dataset,
    ) -> Result<Parameters, ParamError> {
        let cpts: Vec<Cpt> = self
            .counts(structure, data)?
            .into_iter()
            .map(CountTable::normalize)
            .collect();

        #[cfg(feature = "tracing")]
        tracing::info!("Estimated {} CPTs", cpts.len());

        Ok(Parameters { cpts })
    }

    /// Estimate every CPT and install them into the structure.
    ///
    /// Either every variable receives a new CPT or, on error, none does.
    pub fn fit<S: ParameterStore + ?Sized>(
        &self,
        structure: &mut S,
        data: &Dataset,
    ) -> Result<(), ParamError> {
        let params = self.estimate(&*structure, data)?;
        params.install_into(structure)
    }
}

/// The CPTs produced by one estimation run, one per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    cpts: Vec<Cpt>,
}

impl Parameters {
    /// The CPT of `var`.
    pub fn get(&self, var: VarId) -> Option<&Cpt> {
        self.cpts.iter().find(|cpt| cpt.variable() == var)
    }

    pub fn len(&self) -> usize {
        self.cpts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cpt> {
        self.cpts.iter()
    }

    /// Hand every CPT over to `store`.
    ///
    /// All tables are checked against the store before the first one is
    /// installed: every variable must exist there with the same parent
    /// order and cardinalities the table was laid out for.
    pub fn install_into<S: ParameterStore + ?Sized>(self, store: &mut S) -> Result<(), ParamError> {
        let known = store.variables();
        for cpt in &self.cpts {
            let var = cpt.variable();
            let in_store = known.contains(&var)
                && cpt.scope().parents().iter().all(|p| known.contains(p));
            if !in_store {
                return Err(ParamError::UnknownVariable {
                    name: var.to_string(),
                });
            }

            let scope = Scope::of(&*store, var)?;
            if scope.members() != cpt.scope().members()
                || scope.cardinalities() != cpt.scope().cardinalities()
            {
                return Err(ParamError::ScopeMismatch {
                    variable: scope.name().to_string(),
                });
            }
        }

        for cpt in self.cpts {
            store.install_cpt(cpt.variable(), cpt);
        }
        Ok(())
    }
}

impl IntoIterator for Parameters {
    type Item = Cpt;
    type IntoIter = std::vec::IntoIter<Cpt>;

    fn into_iter(self) -> Self::IntoIter {
        self.cpts.into_iter()
    }
}
