//! Defines a `BeliefNetwork`, the discrete Bayesian network sampled by the CPT samplers.

mod builder;
mod registry;

pub use self::builder::BeliefNetworkBuilder;
pub use self::registry::NodeRegistry;

use cpt::Cpt;
use util::{InferenceError, Result};
use variable::Variable;

use bidir_map::BidirMap;
use indexmap::IndexMap;


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model.
///
/// # Representation
/// The CPT of each node implicitly defines the edges of the graph. The nodes are held in their
/// topological order, so position ```i``` in `nodes()` is also the index under which the
/// `NodeRegistry` knows the node.
#[derive(Clone, Debug)]
pub struct BeliefNetwork {

    /// The nodes and their CPTs, in topological order
    graph: IndexMap<Variable, Cpt>,

    /// The user-defined names of each node, as a two way lookup
    names: BidirMap<Variable, String>,

    /// Node <-> index
    registry: NodeRegistry

}

impl BeliefNetwork {

    /// Get the CPT for the given node in this network.
    pub fn cpt(&self, v: &Variable) -> Option<&Cpt> {
        self.graph.get(v)
    }

    /// Get the nodes in topological order
    pub fn nodes(&self) -> Vec<Variable> {
        self.graph.keys().cloned().collect()
    }

    /// Iterate over the nodes and their CPTs in topological order
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Cpt)> {
        self.graph.iter()
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.len()
    }

    /// Lookup a node based on the name
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.names.get_by_second(&String::from(name))
    }

    /// Lookup a node's name
    pub fn lookup_name(&self, var: &Variable) -> Option<&String> {
        self.names.get_by_first(var)
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }


    /// Determine the probability of a full assignment to the nodes of the network.
    ///
    /// # Args
    /// * `assignment`: the domain index of every node, indexed like the `NodeRegistry`
    ///
    /// # Errors
    /// * `InferenceError::EvidenceLength` if the assignment does not cover every node
    /// * `InferenceError::InvalidDomainIndex` if a value is out of range for its node
    pub fn probability(&self, assignment: &[usize]) -> Result<f64> {
        self.check_assignment(assignment)?;

        // the chain rule, one CPT entry per node
        let p = self.graph.values()
                          .map(|cpt| self.cpt_address(cpt, assignment).map(|addr| cpt.value(&addr)))
                          .collect::<Result<Vec<f64>>>()?
                          .into_iter()
                          .product();
        Ok(p)
    }


    /// Check that `assignment` holds a valid domain index for every node of the network.
    ///
    /// # Errors
    /// * `InferenceError::EvidenceLength` if the assignment does not cover every node
    /// * `InferenceError::InvalidDomainIndex` if a value is out of range for its node
    pub fn check_assignment(&self, assignment: &[usize]) -> Result<()> {
        self.check_length(assignment)?;
        for (i, var) in self.graph.keys().enumerate() {
            self.check_value(i, var, assignment[i])?;
        }
        Ok(())
    }

    fn check_length(&self, assignment: &[usize]) -> Result<()> {
        if assignment.len() != self.num_nodes() {
            return Err(InferenceError::EvidenceLength { expected: self.num_nodes(), actual: assignment.len() });
        }
        Ok(())
    }

    fn check_value(&self, node: usize, var: &Variable, value: usize) -> Result<()> {
        if value >= var.cardinality() {
            return Err(InferenceError::InvalidDomainIndex { node, value, cardinality: var.cardinality() });
        }
        Ok(())
    }


    /// Build the address into `cpt` for an assignment indexed like the registry. Only the entries
    /// of the CPT's node and parents are range checked.
    ///
    /// # Errors
    /// * `InferenceError::EvidenceLength` if the assignment does not cover every node
    /// * `InferenceError::InvalidDomainIndex` if an addressed value is out of range
    /// * `InferenceError::UnknownNode` if the CPT refers to a node outside the network
    pub(crate) fn cpt_address(&self, cpt: &Cpt, assignment: &[usize]) -> Result<Vec<usize>> {
        self.check_length(assignment)?;

        cpt.domain_product()
           .iter()
           .map(|v| -> Result<usize> {
               let i = self.registry.index_of(v).ok_or(InferenceError::UnknownNode)?;
               self.check_value(i, v, assignment[i])?;
               Ok(assignment[i])
           })
           .collect()
    }
}
