use super::{BeliefNetwork, NodeRegistry};
use cpt::Cpt;
use init::Initialization;
use util::{InferenceError, Result};
use variable::Variable;

use bidir_map::BidirMap;
use indexmap::IndexMap;


/// An implementation of the [builder pattern] for creating a `BeliefNetwork`.
///
/// Networks must be assembled in topological order: the parents of a node have to be added
/// before the node itself.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct BeliefNetworkBuilder {

    /// The nodes and their associated CPTs
    cpts: IndexMap<Variable, Cpt>,

    /// The names of each node
    names: BidirMap<Variable, String>,

    /// The error state of the builder
    err: Option<InferenceError>

}


impl BeliefNetworkBuilder {

    /// Construct a new `BeliefNetworkBuilder` representing an empty `BeliefNetwork`
    pub fn new() -> Self {
        BeliefNetworkBuilder {
            cpts: IndexMap::new(),
            names: BidirMap::new(),
            err: None
        }
    }


    /// Add an anonymous node to the network.
    ///
    /// # Args
    /// * `var`: the variable to add to the network
    /// * `parents`: the parent variables. The parents must already be in the network.
    /// * `init`: the initialization mechanism for the CPT of `var`
    pub fn with_variable(self, var: &Variable, parents: Vec<Variable>, init: Initialization) -> Self {
        self.add_variable(var, var.to_string(), parents, init)
    }


    /// Add a named node to the network.
    ///
    /// # Args
    /// * `var`: the variable to add to the network
    /// * `name`: the name for the variable
    /// * `parents`: the parent variables. The parents must already be in the network.
    /// * `init`: the initialization mechanism for the CPT of `var`
    pub fn with_named_variable(
        self,
        var: &Variable,
        name: &str,
        parents: Vec<Variable>,
        init: Initialization,
    ) -> Self {
        self.add_variable(var, String::from(name), parents, init)
    }


    /// Complete building the network.
    ///
    /// # Returns
    /// the `BeliefNetwork`, or the first error generated during the building process
    pub fn build(self) -> Result<BeliefNetwork> {
        if let Some(e) = self.err {
            return Err(e);
        }

        let registry = NodeRegistry::new(self.cpts.keys());
        Ok(BeliefNetwork { graph: self.cpts, names: self.names, registry })
    }


    /// Internal function that actually does the node addition
    fn add_variable(
        mut self,
        var: &Variable,
        name: String,
        parents: Vec<Variable>,
        init: Initialization,
    ) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Check for error conditions
        if parents.iter().any(|v| !self.cpts.contains_key(v)) {
            self.err = Some(InferenceError::MissingParent);
            return self;
        }

        if self.cpts.contains_key(var) || self.names.get_by_second(&name).is_some() {
            self.err = Some(InferenceError::DuplicateVariable);
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) Build the CPT based on the initialization
        match init.build_cpt(*var, parents) {
            Ok(cpt) => {
                self.cpts.insert(*var, cpt);
                self.names.insert(*var, name);
            },
            Err(e) => self.err = Some(e)
        }

        self
    }
}

impl Default for BeliefNetworkBuilder {

    fn default() -> Self {
        BeliefNetworkBuilder::new()
    }

}
