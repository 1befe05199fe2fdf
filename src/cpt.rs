//! Definition of the cpt module
//!
//! A `Cpt` is the conditional probability table ```P(X | Pa(X))``` of a node ```X``` in a belief
//! network. The table has one axis per variable of its domain product ```[X, Pa_1, ..., Pa_k]```
//! and is stored in row-major order, so every address into the table maps to a single "real"
//! (flattened) address, and consecutive values of ```X``` for a fixed parent configuration lie a
//! constant stride apart.

use util::{InferenceError, Result};
use variable::Variable;

use ndarray::prelude as nd;
use itertools::Itertools;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;

/// Tolerance when checking that a column of a CPT sums to one
const TOLERANCE: f64 = 0.001;


#[derive(Clone, Debug)]
pub struct Cpt {

    /// The node whose distribution is described
    node: Variable,

    /// The parents of `node`, in the order of the table's axes 1..
    parents: Vec<Variable>,

    /// The table, in standard (row-major) layout
    table: Table,

    /// The row-major strides of `table`
    strides: Vec<usize>

}


impl Cpt {

    /// Create a new `Cpt`
    ///
    /// # Args
    /// * `node`: the node ```X```
    /// * `parents`: the parents ```Pa(X)```
    /// * `table`: the values, with axes ```[X, Pa_1, ..., Pa_k]```
    ///
    /// # Errors
    /// * `InferenceError::InvalidScope` if the shape of the table does not match the variables
    /// * `InferenceError::DuplicateVariable` if a variable occurs twice
    /// * `InferenceError::NotACpt` if a value is negative or a column sums to neither one nor zero
    pub fn new(node: Variable, parents: Vec<Variable>, table: Table) -> Result<Self> {
        ///////////////////////////////////////////////////////////////////////
        // 1) check the scope
        let scope: Vec<Variable> = Some(node).into_iter().chain(parents.iter().cloned()).collect();
        if scope.iter().unique().count() != scope.len() {
            return Err(InferenceError::DuplicateVariable);
        }

        if table.ndim() != scope.len() {
            return Err(InferenceError::InvalidScope);
        }

        if scope.iter().zip(table.shape().iter()).any(|(v, &n)| v.cardinality() != n) {
            return Err(InferenceError::InvalidScope);
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) check the values
        if table.iter().any(|&p| !(p >= 0.0) || !p.is_finite()) {
            return Err(InferenceError::NotACpt(String::from("negative or non-finite entry")));
        }

        // a column of zeros marks an impossible parent configuration
        let sums = table.sum_axis(nd::Axis(0));
        if let Some(s) = sums.iter().find(|&&s| s != 0.0 && (s - 1.0).abs() > TOLERANCE) {
            return Err(InferenceError::NotACpt(format!("a column sums to {}", s)));
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) store in row-major layout
        let shape = table.shape().to_vec();
        let values: Vec<f64> = table.iter().cloned().collect();
        let table = Table::from_shape_vec(nd::IxDyn(&shape), values)
            .map_err(|e| InferenceError::General(e.to_string()))?;

        let mut strides = vec![1; shape.len()];
        for i in (0..shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }

        Ok(Cpt { node, parents, table, strides })
    }


    /// The node described by this `Cpt`
    pub fn node(&self) -> Variable {
        self.node
    }

    pub fn parents(&self) -> &[Variable] {
        &self.parents
    }

    /// The variables of the table's axes: the node followed by its parents
    pub fn domain_product(&self) -> Vec<Variable> {
        Some(self.node).into_iter().chain(self.parents.iter().cloned()).collect()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }


    /// The table's values in row-major order
    pub fn entries(&self) -> &[f64] {
        self.table.as_slice().expect("CPT tables are stored in standard layout")
    }


    /// Map an address (one domain index per variable of the domain product) to the position of
    /// the value in `entries`
    pub fn real_address(&self, addr: &[usize]) -> usize {
        debug_assert_eq!(addr.len(), self.strides.len());
        addr.iter().zip(self.strides.iter()).map(|(a, s)| a * s).sum()
    }


    /// The difference between the real addresses of two consecutive values of the node for a
    /// fixed parent configuration
    pub fn column_stride(&self) -> usize {
        self.strides[0]
    }


    /// The value ```P(X = addr[0] | Pa = addr[1..])```
    pub fn value(&self, addr: &[usize]) -> f64 {
        self.entries()[self.real_address(addr)]
    }

}
