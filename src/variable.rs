//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable - a node - in a belief network. Variables
//! are lightweight, copyable identities; the values they take are tracked elsewhere, as domain
//! indices in ```[0, cardinality)```.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {

    /// Unique identifier of the `Variable`
    id: usize,

    /// The number of values in the domain of the `Variable`
    cardinality: usize

}

impl Variable {

    /// Construct a new binary `Variable`
    pub fn binary() -> Self {
        Variable::discrete(2)
    }

    /// Construct a new discrete `Variable` with values ```0..cardinality```
    ///
    /// # Panics
    /// if `cardinality` is zero
    pub fn discrete(cardinality: usize) -> Self {
        assert!(cardinality > 0, "a Variable needs at least one value");
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Variable { id, cardinality }
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn id(&self) -> usize {
        self.id
    }

}

impl fmt::Display for Variable {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X{}", self.id)
    }

}


// Unit Tests for the Variable struct.
#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn distinct() {
        let a = Variable::binary();
        let b = Variable::binary();

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.cardinality(), 2);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn discrete() {
        let v = Variable::discrete(10);
        assert_eq!(v.cardinality(), 10);
    }

    #[test]
    #[should_panic]
    fn empty_domain() {
        Variable::discrete(0);
    }
}
