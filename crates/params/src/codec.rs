//! Mixed-radix index codec for CPT cells.
//!
//! A CPT over a variable `X` with ordered parents `[P₁, ..., Pₖ]` is stored
//! flat. The digits of a cell are `[x, p₁, ..., pₖ]`, with `x` the least
//! significant:
//!
//! ```text
//! stride(X)  = 1
//! stride(P₁) = |X|
//! stride(P₂) = |X| · |P₁|
//! ...
//! offset     = Σ digitᵢ · strideᵢ
//! ```
//!
//! Cells sharing one parent assignment are therefore contiguous blocks of
//! `|X|` cells, and block `j` starts at `j · |X|`.
//!
//! [`Scope`] is the only place strides and the table size are derived, so a
//! table can never be sized with one parent order and indexed with another.

use std::ops::Range;

use crate::dataset::Observation;
use crate::error::ParamError;
use crate::network::{NetworkStructure, VarId};

/// The ordered members of one CPT (the variable, then its parents) with
/// their cardinalities and strides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    members: Vec<VarId>,
    names: Vec<String>,
    cardinalities: Vec<usize>,
    strides: Vec<usize>,
    size: usize,
}

impl Scope {
    /// Build the scope of `var` from the structure's parent order.
    ///
    /// # Errors
    ///
    /// - [`ParamError::DegenerateDomain`] if any member has cardinality 0
    /// - [`ParamError::ScopeOverflow`] if the table size overflows `usize`
    pub fn of<S: NetworkStructure + ?Sized>(structure: &S, var: VarId) -> Result<Self, ParamError> {
        let members: Vec<VarId> = std::iter::once(var)
            .chain(structure.parents(var).iter().copied())
            .collect();
        let names: Vec<String> = members
            .iter()
            .map(|&m| structure.name(m).to_string())
            .collect();
        let cardinalities: Vec<usize> = members.iter().map(|&m| structure.cardinality(m)).collect();

        if let Some(pos) = cardinalities.iter().position(|&c| c == 0) {
            return Err(ParamError::DegenerateDomain {
                variable: names[pos].clone(),
            });
        }

        let mut strides = Vec::with_capacity(members.len());
        let mut size: usize = 1;
        for &card in &cardinalities {
            strides.push(size);
            size = size
                .checked_mul(card)
                .ok_or_else(|| ParamError::ScopeOverflow {
                    variable: names[0].clone(),
                })?;
        }

        Ok(Self {
            members,
            names,
            cardinalities,
            strides,
            size,
        })
    }

    /// The variable this CPT defines.
    pub fn variable(&self) -> VarId {
        self.members[0]
    }

    /// Name of the variable this CPT defines.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    /// Parents in stride order.
    pub fn parents(&self) -> &[VarId] {
        &self.members[1..]
    }

    /// The variable followed by its parents.
    pub fn members(&self) -> &[VarId] {
        &self.members
    }

    pub fn cardinalities(&self) -> &[usize] {
        &self.cardinalities
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Cardinality of the variable itself (the block length).
    pub fn cardinality(&self) -> usize {
        self.cardinalities[0]
    }

    /// Number of cells in the table.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Always false: a scope with no cells is rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of parent configurations (blocks).
    pub fn n_parent_configs(&self) -> usize {
        self.size / self.cardinality()
    }

    /// Cell range of parent configuration `config`.
    pub fn block_range(&self, config: usize) -> Range<usize> {
        let start = config * self.cardinality();
        start..start + self.cardinality()
    }

    /// Parent configuration of a cell offset.
    pub fn parent_config(&self, offset: usize) -> usize {
        offset / self.cardinality()
    }

    /// Encode value-indices `[own, parent₁, ..., parentₖ]` as a flat offset.
    ///
    /// # Errors
    ///
    /// - [`ParamError::ShapeMismatch`] if the digit count differs from the
    ///   number of scope members
    /// - [`ParamError::ValueIndexOutOfRange`] if a digit is not below its
    ///   member's cardinality
    pub fn encode(&self, digits: &[usize]) -> Result<usize, ParamError> {
        if digits.len() != self.members.len() {
            return Err(ParamError::ShapeMismatch {
                expected: self.members.len(),
                got: digits.len(),
            });
        }

        let mut offset = 0;
        for (i, &digit) in digits.iter().enumerate() {
            if digit >= self.cardinalities[i] {
                return Err(ParamError::ValueIndexOutOfRange {
                    variable: self.names[i].clone(),
                    index: digit,
                    cardinality: self.cardinalities[i],
                });
            }
            offset += digit * self.strides[i];
        }
        Ok(offset)
    }

    /// Encode the cell a dataset row falls into.
    ///
    /// Reads the variable's and each parent's value from `row` and maps the
    /// labels through the structure's domains.
    ///
    /// # Errors
    ///
    /// - [`ParamError::IncompleteObservation`] if the row lacks a member
    /// - [`ParamError::InvalidObservation`] if a value is outside its domain
    pub fn encode_observation<S: NetworkStructure + ?Sized>(
        &self,
        structure: &S,
        row: &Observation,
        row_idx: usize,
    ) -> Result<usize, ParamError> {
        let mut offset = 0;
        for (i, &member) in self.members.iter().enumerate() {
            let value = row
                .get(member)
                .ok_or_else(|| ParamError::IncompleteObservation {
                    row: row_idx,
                    variable: self.names[i].clone(),
                })?;

            let digit = structure
                .value_index(member, value)
                .filter(|&d| d < self.cardinalities[i])
                .ok_or_else(|| ParamError::InvalidObservation {
                    row: row_idx,
                    variable: self.names[i].clone(),
                    value: value.to_string(),
                })?;

            offset += digit * self.strides[i];
        }
        Ok(offset)
    }

    /// Decode a flat offset back into `[own, parent₁, ..., parentₖ]`.
    pub fn decode(&self, offset: usize) -> Option<Vec<usize>> {
        if offset >= self.size {
            return None;
        }
        Some(
            self.strides
                .iter()
                .zip(&self.cardinalities)
                .map(|(&stride, &card)| (offset / stride) % card)
                .collect(),
        )
    }
}
