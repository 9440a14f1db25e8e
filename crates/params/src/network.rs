//! Network structure: variables, ordered parent sets and CPT slots.
//!
//! The estimator only talks to a structure through [`NetworkStructure`]
//! (read-only topology and domain queries) and [`ParameterStore`] (the
//! writable CPT slot per variable). [`Network`] is the in-crate
//! implementation of both.
//!
//! ```text
//!      Cloudy
//!      ↙    ↘
//! Sprinkler  Rain
//!      ↘    ↙
//!     WetGrass
//! ```

use std::collections::HashSet;
use std::fmt;

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::codec::Scope;
use crate::cpt::Cpt;
use crate::dataset::Dataset;
use crate::error::ParamError;

/// Identifier of a random variable within one network.
///
/// Ids are handed out by the structure that owns the variable, so row and
/// table lookups never go through loosely-typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Wrap a zero-based variable position.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The zero-based variable position.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}", self.0)
    }
}

/// A discrete random variable: a name and an ordered domain of value labels.
///
/// The position of a label in the domain is its value-index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    values: Vec<String>,
}

impl Variable {
    /// Create a variable with the given domain labels.
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create a variable whose domain is `"0"`, `"1"`, ..., `"k-1"`.
    pub fn with_cardinality(name: impl Into<String>, k: usize) -> Self {
        Self::new(name, 0..k)
    }

    /// A binary variable with domain `{"0", "1"}`.
    pub fn binary(name: impl Into<String>) -> Self {
        Self::with_cardinality(name, 2)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn cardinality(&self) -> usize {
        self.values.len()
    }

    /// Zero-based index of `value` in the domain.
    pub fn value_index(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }
}

/// Read-only view of a network structure.
///
/// Parent order is part of the contract: it must be stable, because it
/// fixes the stride assignment of the variable's CPT.
pub trait NetworkStructure {
    /// All variable ids, in a stable order.
    fn variables(&self) -> Vec<VarId>;

    /// Name of a variable.
    fn name(&self, var: VarId) -> &str;

    /// Ordered parents of a variable.
    fn parents(&self, var: VarId) -> &[VarId];

    /// Domain size of a variable.
    fn cardinality(&self, var: VarId) -> usize;

    /// Zero-based index of `value` within the domain of `var`.
    fn value_index(&self, var: VarId, value: &str) -> Option<usize>;

    /// Look up a variable by name.
    fn find(&self, name: &str) -> Option<VarId>;

    /// Domain label at `index` within the domain of `var`.
    fn value_label(&self, var: VarId, index: usize) -> Option<&str>;

    /// `cardinality(var) × ∏ cardinality(parent)`, saturating on overflow.
    fn scope_size(&self, var: VarId) -> usize {
        self.parents(var)
            .iter()
            .fold(self.cardinality(var), |acc, &p| {
                acc.saturating_mul(self.cardinality(p))
            })
    }
}

/// A structure that can receive estimated CPTs.
pub trait ParameterStore: NetworkStructure {
    /// Replace the CPT of `var`, taking ownership of the table.
    fn install_cpt(&mut self, var: VarId, cpt: Cpt);
}

/// A discrete Bayesian network structure with one CPT slot per variable.
///
/// The DAG is kept in a `petgraph` graph for cycle checks; parent order is
/// kept separately because edge iteration order is not the declared order.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: DiGraph<Variable, ()>,
    parents: Vec<Vec<VarId>>,
    cpts: Vec<Option<Cpt>>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Add a root variable, returning its id.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VarId, ParamError> {
        if self.find(variable.name()).is_some() {
            return Err(ParamError::DuplicateVariable {
                name: variable.name,
            });
        }

        let mut seen = HashSet::new();
        for value in &variable.values {
            if !seen.insert(value.as_str()) {
                return Err(ParamError::DuplicateValue {
                    variable: variable.name.clone(),
                    value: value.clone(),
                });
            }
        }

        let node = self.graph.add_node(variable);
        self.parents.push(Vec::new());
        self.cpts.push(None);
        Ok(VarId(node.index()))
    }

    /// Set the ordered parents of `child`, replacing any previous set.
    ///
    /// The child's installed CPT (if any) is dropped, since its layout no
    /// longer matches. On error the previous parent set is kept.
    pub fn set_parents(&mut self, child: VarId, parents: Vec<VarId>) -> Result<(), ParamError> {
        self.check_id(child)?;
        let mut seen = HashSet::new();
        for &p in &parents {
            self.check_id(p)?;
            if !seen.insert(p) {
                return Err(ParamError::DuplicateVariable {
                    name: self.name(p).to_string(),
                });
            }
        }

        let child_node = NodeIndex::new(child.0);
        let previous = std::mem::take(&mut self.parents[child.0]);
        self.clear_incoming(child_node);

        for &p in &parents {
            let parent_node = NodeIndex::new(p.0);
            if p == child || has_path_connecting(&self.graph, child_node, parent_node, None) {
                self.clear_incoming(child_node);
                for &old in &previous {
                    self.graph.add_edge(NodeIndex::new(old.0), child_node, ());
                }
                self.parents[child.0] = previous;
                return Err(ParamError::CyclicStructure {
                    child: self.name(child).to_string(),
                    parent: self.name(p).to_string(),
                });
            }
            self.graph.add_edge(parent_node, child_node, ());
        }

        self.parents[child.0] = parents;
        self.cpts[child.0] = None;
        Ok(())
    }

    /// The variable behind an id.
    pub fn variable(&self, var: VarId) -> &Variable {
        &self.graph[NodeIndex::new(var.0)]
    }

    /// The installed CPT of a variable, if any.
    pub fn cpt(&self, var: VarId) -> Option<&Cpt> {
        self.cpts.get(var.0).and_then(Option::as_ref)
    }

    /// True when every variable has a CPT.
    pub fn is_parameterized(&self) -> bool {
        self.cpts.iter().all(Option::is_some)
    }

    /// Variables ordered so that parents come before children.
    pub fn topological_order(&self) -> Result<Vec<VarId>, ParamError> {
        toposort(&self.graph, None)
            .map(|nodes| nodes.into_iter().map(|n| VarId(n.index())).collect())
            .map_err(|cycle| {
                let name = self.graph[cycle.node_id()].name().to_string();
                ParamError::CyclicStructure {
                    child: name.clone(),
                    parent: name,
                }
            })
    }

    /// Log-likelihood of a dataset under the installed CPTs.
    ///
    /// `Σ_rows Σ_vars ln P(x_v | pa_v)`. Returns negative infinity when a
    /// row hits a zero-probability cell.
    pub fn log_likelihood(&self, data: &Dataset) -> Result<f64, ParamError> {
        let cpts = self
            .variables()
            .into_iter()
            .map(|var| {
                self.cpt(var).ok_or_else(|| ParamError::MissingParameters {
                    variable: self.name(var).to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut total = 0.0;
        for (row_idx, row) in data.iter().enumerate() {
            for cpt in &cpts {
                let offset = cpt.scope().encode_observation(self, row, row_idx)?;
                total += cpt.probs()[offset].ln();
            }
        }
        Ok(total)
    }

    fn check_id(&self, var: VarId) -> Result<(), ParamError> {
        if var.0 >= self.len() {
            return Err(ParamError::UnknownVariable {
                name: var.to_string(),
            });
        }
        Ok(())
    }

    fn clear_incoming(&mut self, node: NodeIndex) {
        while let Some(edge) = self.graph.first_edge(node, Direction::Incoming) {
            self.graph.remove_edge(edge);
        }
    }
}

impl NetworkStructure for Network {
    fn variables(&self) -> Vec<VarId> {
        (0..self.len()).map(VarId).collect()
    }

    fn name(&self, var: VarId) -> &str {
        self.variable(var).name()
    }

    fn parents(&self, var: VarId) -> &[VarId] {
        &self.parents[var.0]
    }

    fn cardinality(&self, var: VarId) -> usize {
        self.variable(var).cardinality()
    }

    fn value_index(&self, var: VarId, value: &str) -> Option<usize> {
        self.variable(var).value_index(value)
    }

    fn find(&self, name: &str) -> Option<VarId> {
        self.graph
            .node_indices()
            .find(|&n| self.graph[n].name() == name)
            .map(|n| VarId(n.index()))
    }

    fn value_label(&self, var: VarId, index: usize) -> Option<&str> {
        self.variable(var).values().get(index).map(String::as_str)
    }
}

impl ParameterStore for Network {
    fn install_cpt(&mut self, var: VarId, cpt: Cpt) {
        self.cpts[var.0] = Some(cpt);
    }
}

/// Scope of every variable in the network, in variable order.
pub(crate) fn scopes<S: NetworkStructure + ?Sized>(structure: &S) -> Result<Vec<Scope>, ParamError> {
    structure
        .variables()
        .into_iter()
        .map(|var| Scope::of(structure, var))
        .collect()
}

/// The classic "sprinkler" structure, without parameters.
///
/// All variables are binary (`"0"` = false, `"1"` = true).
/// WetGrass has parents `[Sprinkler, Rain]`, in that order.
pub fn sprinkler_structure() -> Result<Network, ParamError> {
    let mut net = Network::new();
    let cloudy = net.add_variable(Variable::binary("Cloudy"))?;
    let sprinkler = net.add_variable(Variable::binary("Sprinkler"))?;
    let rain = net.add_variable(Variable::binary("Rain"))?;
    let wet = net.add_variable(Variable::binary("WetGrass"))?;

    net.set_parents(sprinkler, vec![cloudy])?;
    net.set_parents(rain, vec![cloudy])?;
    net.set_parents(wet, vec![sprinkler, rain])?;
    Ok(net)
}
