//! Error types for parameter estimation.

use thiserror::Error;

/// Errors that can occur while building a network or estimating its CPTs.
///
/// The observation and domain errors abort an estimation run as a whole:
/// no CPT from a failed run is ever installed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// A row holds a value outside the variable's declared domain.
    #[error("Row {row}: value '{value}' is not in the domain of '{variable}'")]
    InvalidObservation {
        row: usize,
        variable: String,
        value: String,
    },

    /// A row omits a value the estimator needs.
    #[error("Row {row}: missing value for '{variable}'")]
    IncompleteObservation { row: usize, variable: String },

    /// A variable (or one of its parents) has an empty domain.
    #[error("Variable '{variable}' has an empty domain or zero scope size")]
    DegenerateDomain { variable: String },

    /// A value index is outside a scope member's cardinality.
    #[error("Index {index} out of range for '{variable}' (cardinality {cardinality})")]
    ValueIndexOutOfRange {
        variable: String,
        index: usize,
        cardinality: usize,
    },

    /// The product of scope cardinalities does not fit in `usize`.
    #[error("Scope of '{variable}' is too large to index")]
    ScopeOverflow { variable: String },

    /// A record names a variable the network does not declare.
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },

    /// A positional row carries more values than the network has variables.
    #[error("Row width mismatch: expected at most {expected} values, got {got}")]
    RowWidth { expected: usize, got: usize },

    /// Two variables share a name.
    #[error("Variable '{name}' is declared twice")]
    DuplicateVariable { name: String },

    /// A domain lists the same value twice.
    #[error("Value '{value}' appears twice in the domain of '{variable}'")]
    DuplicateValue { variable: String, value: String },

    /// Adding the parent edge would make the structure cyclic.
    #[error("Edge {parent} -> {child} would create a cycle")]
    CyclicStructure { child: String, parent: String },

    /// Equivalent sample size is negative, NaN or infinite.
    #[error("Equivalent sample size must be finite and non-negative, got {value}")]
    InvalidSampleSize { value: f64 },

    /// A prior override could not be resolved against the network.
    #[error("Invalid prior for '{variable}': {reason}")]
    InvalidPrior { variable: String, reason: String },

    /// A CPT's parent order or cardinalities differ from the store's.
    #[error("CPT for '{variable}' does not match its scope in the target network")]
    ScopeMismatch { variable: String },

    /// A query needs a CPT that has not been installed.
    #[error("No CPT installed for '{variable}'")]
    MissingParameters { variable: String },

    /// Distribution doesn't sum to 1.
    #[error("Distribution not normalized: sum = {sum} (expected 1.0)")]
    NotNormalized { sum: f64 },

    /// Negative probability encountered.
    #[error("Negative probability encountered")]
    NegativeProbability,

    /// All weights are zero (can't normalize).
    #[error("Cannot normalize: all weights are zero")]
    ZeroWeights,

    /// Empty distribution.
    #[error("Distribution cannot be empty")]
    EmptyDistribution,

    /// Rows have different lengths.
    #[error("Kernel has ragged rows (rows have different lengths)")]
    RaggedMatrix,

    /// A row doesn't sum to 1.
    #[error("Row {row} not normalized: sum = {sum} (expected 1.0)")]
    RowNotNormalized { row: usize, sum: f64 },

    /// Shape mismatch between a table and the values used to index it.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ParamError {
    fn from(err: serde_json::Error) -> Self {
        ParamError::Config(err.to_string())
    }
}
