//! Module containing initialization routines for the CPTs of a belief network.

use cpt::{Cpt, Table};
use util::{InferenceError, Result};
use variable::Variable;

use ndarray::prelude as nd;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;

use std::collections::HashSet;

/// Defines possible ways to initialize a `Variable`s CPT.
#[derive(Clone, Debug)]
pub enum Initialization<'a> {
    /// A uniform distribution over the values of the node, for every parent configuration
    Uniform,

    /// Randomly initialize the entries of the CPT.
    Random,

    /// Initialize the CPT as a Binomial distribution with parameter ```p = P(X = 0)```.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Binomial(f64),

    /// Initialize the CPT as a Multinomial distribution with parameters ```p_0, p_1...```.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Multinomial(&'a [f64]),

    /// User defined CPT
    Table(Cpt)
}


impl<'a> Initialization<'a> {

    /// Construct a CPT, initialized based on ```self```
    ///
    /// # Args
    /// * `var`: the node the CPT describes
    /// * `parents`: the parents of `var`, in the order of the table's axes
    ///
    /// # Returns
    /// a `Cpt` with axes ```[var, parents...]```. A user-defined table keeps its own parent
    /// order.
    pub fn build_cpt(self, var: Variable, parents: Vec<Variable>) -> Result<Cpt> {
        ///////////////////////////////////////////////////////////////////////////////
        // Trivial cases

        // if this is a user defined table, it just needs to be verified and returned
        if let Initialization::Table(cpt) = self {
            let expected: HashSet<&Variable> = parents.iter().collect();
            let actual: HashSet<&Variable> = cpt.parents().iter().collect();

            if cpt.node() == var && expected == actual && parents.len() == cpt.parents().len() {
                return Ok(cpt);
            } else {
                return Err(InferenceError::InvalidScope);
            }
        }

        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        if parents.is_empty() {

            match self {

                // A binomial distribution on a non-binary variable
                Initialization::Binomial(_) if var.cardinality() != 2 => {
                    return Err(InferenceError::InvalidInitialization);
                },

                Initialization::Binomial(p) if !(p >= 0.0 && p <= 1.0) => {
                    return Err(InferenceError::InvalidInitialization);
                },

                // A multinomial distribution with an incorrect number of parameters
                Initialization::Multinomial(ps) if ps.len() != var.cardinality() => {
                    return Err(InferenceError::InvalidInitialization);
                },

                _ => ()
            }
        } else {
            match self {

                // A binomial/multinomial on a node with parents
                Initialization::Binomial(_) | Initialization::Multinomial(_) => {
                    return Err(InferenceError::InvalidInitialization);
                },

                _ => ()
            }
        }

        ///////////////////////////////////////////////////////////////////////////////
        // now, build CPT
        let shape: Vec<usize> = Some(var).iter()
                                         .chain(parents.iter())
                                         .map(|v| v.cardinality())
                                         .collect();

        let tbl: Table = match self {
            Initialization::Uniform => {
                // every column is normalized by the cardinality of the node
                let val = 1. / (var.cardinality() as f64);
                nd::Array::from_elem(nd::IxDyn(&shape), val)
            },
            Initialization::Random => {
                let tbl = nd::Array::random(nd::IxDyn(&shape), Uniform::new(1.0, 100.0));
                let z = tbl.sum_axis(nd::Axis(0));
                tbl / &z
            },
            Initialization::Binomial(p) => {
                nd::arr1(&[p, (1.0 - p)]).into_dyn()
            },
            Initialization::Multinomial(p) => {
                nd::Array::from_iter(p.iter().cloned()).into_dyn()
            },
            Initialization::Table(_) => unreachable!()
        };

        Cpt::new(var, parents, tbl)
    }
}
