//! Complete-case observation rows.
//!
//! Rows are keyed by [`VarId`]. Named records are validated against the
//! structure when they are pushed, so a misspelled variable is rejected at
//! the boundary instead of silently becoming a missing value.

use std::slice;

use crate::error::ParamError;
use crate::network::{NetworkStructure, VarId};

/// One observation row: at most one value label per variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    values: Vec<Option<String>>,
}

impl Observation {
    /// The observed value of `var`, if present.
    pub fn get(&self, var: VarId) -> Option<&str> {
        self.values.get(var.index()).and_then(|v| v.as_deref())
    }

    /// True when every slot holds a value.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

/// An ordered, in-memory sequence of observation rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    width: usize,
    rows: Vec<Observation>,
}

impl Dataset {
    /// An empty dataset with one slot per variable of `structure`.
    pub fn for_structure<S: NetworkStructure + ?Sized>(structure: &S) -> Self {
        Self::with_width(structure.variables().len())
    }

    /// An empty dataset with `width` variable slots per row.
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from positional rows (see [`Dataset::push_row`]).
    pub fn from_rows<R, I, V>(width: usize, rows: R) -> Result<Self, ParamError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let mut data = Self::with_width(width);
        for row in rows {
            data.push_row(row)?;
        }
        Ok(data)
    }

    /// Append a row given as `(variable name, value)` pairs.
    ///
    /// Variables not named in the record are left unobserved; the
    /// estimator reports them as incomplete when it reaches them.
    ///
    /// # Errors
    ///
    /// - [`ParamError::UnknownVariable`] for a name the structure lacks
    /// - [`ParamError::DuplicateVariable`] if a name appears twice
    /// - [`ParamError::RowWidth`] if the structure is wider than this dataset
    pub fn push_record<S, I, K, V>(&mut self, structure: &S, record: I) -> Result<(), ParamError>
    where
        S: NetworkStructure + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let mut values = vec![None; self.width];
        for (name, value) in record {
            let name = name.as_ref();
            let var = structure
                .find(name)
                .ok_or_else(|| ParamError::UnknownVariable {
                    name: name.to_string(),
                })?;

            let slot = values
                .get_mut(var.index())
                .ok_or(ParamError::RowWidth {
                    expected: self.width,
                    got: var.index() + 1,
                })?;
            if slot.is_some() {
                return Err(ParamError::DuplicateVariable {
                    name: name.to_string(),
                });
            }
            *slot = Some(value.to_string());
        }

        self.rows.push(Observation { values });
        Ok(())
    }

    /// Append a row whose `i`-th value belongs to variable `i`.
    ///
    /// A shorter row leaves the trailing variables unobserved.
    pub fn push_row<I, V>(&mut self, row: I) -> Result<(), ParamError>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let mut values: Vec<Option<String>> = row.into_iter().map(|v| Some(v.to_string())).collect();
        if values.len() > self.width {
            return Err(ParamError::RowWidth {
                expected: self.width,
                got: values.len(),
            });
        }
        values.resize(self.width, None);

        self.rows.push(Observation { values });
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of variable slots per row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn iter(&self) -> slice::Iter<'_, Observation> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
