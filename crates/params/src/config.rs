//! Estimator configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Settings for [`BayesianEstimator`](crate::BayesianEstimator).
///
/// ```rust
/// use bayesnet_params::EstimatorConfig;
///
/// let config = EstimatorConfig::from_json(r#"{
///     "equivalent_sample_size": 10.0,
///     "priors": { "Rain": { "1": 2.0 } }
/// }"#).unwrap();
///
/// assert_eq!(config.equivalent_sample_size, Some(10.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Total pseudo-count mass per table. `None` means "number of rows".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalent_sample_size: Option<f64>,

    /// Variable name → value label → pseudo-count frequency.
    ///
    /// Replaces the uniform seed for that value in every parent
    /// configuration of the variable's table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub priors: BTreeMap<String, BTreeMap<String, f64>>,
}

impl EstimatorConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ParamError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ParamError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the equivalent sample size.
    pub fn with_equivalent_sample_size(mut self, size: f64) -> Self {
        self.equivalent_sample_size = Some(size);
        self
    }

    /// Add a prior frequency for one value of one variable.
    pub fn with_prior(
        mut self,
        variable: impl Into<String>,
        value: impl Into<String>,
        frequency: f64,
    ) -> Self {
        self.priors
            .entry(variable.into())
            .or_default()
            .insert(value.into(), frequency);
        self
    }

    /// Check the sample size, if one is set.
    ///
    /// Prior entries are checked against a structure when an estimation
    /// run resolves them.
    pub fn validate(&self) -> Result<(), ParamError> {
        if let Some(size) = self.equivalent_sample_size {
            check_sample_size(size)?;
        }
        Ok(())
    }

    /// The equivalent sample size for a dataset of `n_rows` rows.
    pub fn sample_size_for(&self, n_rows: usize) -> Result<f64, ParamError> {
        let size = self.equivalent_sample_size.unwrap_or(n_rows as f64);
        check_sample_size(size)?;
        Ok(size)
    }
}

fn check_sample_size(size: f64) -> Result<(), ParamError> {
    if !size.is_finite() || size < 0.0 {
        return Err(ParamError::InvalidSampleSize { value: size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_row_count() {
        let config = EstimatorConfig::default();
        assert_eq!(config.sample_size_for(42).unwrap(), 42.0);

        let config = config.with_equivalent_sample_size(3.5);
        assert_eq!(config.sample_size_for(42).unwrap(), 3.5);
    }

    #[test]
    fn test_from_json() {
        let config = EstimatorConfig::from_json(
            r#"{ "priors": { "X": { "0": 1.0, "1": 3.0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.equivalent_sample_size, None);
        assert_eq!(config.priors["X"]["1"], 3.0);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        let result = EstimatorConfig::from_json(r#"{ "equivalent_sample_size": -1.0 }"#);
        assert!(matches!(result, Err(ParamError::InvalidSampleSize { .. })));

        let result = EstimatorConfig::from_json(r#"{ "sample_size": 1.0 }"#);
        assert!(matches!(result, Err(ParamError::Config(_))));

        let result = EstimatorConfig::from_json("not json");
        assert!(matches!(result, Err(ParamError::Config(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EstimatorConfig::default()
            .with_equivalent_sample_size(8.0)
            .with_prior("Rain", "1", 2.0);
        let json = config.to_json().unwrap();
        assert_eq!(EstimatorConfig::from_json(&json).unwrap(), config);
    }
}
