//! A bijection between the nodes of a belief network and dense indices

use variable::Variable;

use bidir_map::BidirMap;


/// Maps every node of a `BeliefNetwork` to its position ```[0, n)``` in the network's
/// topological order, and back. Samples, evidence and distributions are all indexed by these
/// positions.
#[derive(Clone, Debug)]
pub struct NodeRegistry {
    map: BidirMap<Variable, usize>
}

impl NodeRegistry {

    /// Create a registry numbering `nodes` in the order they are given
    pub fn new<'a, I>(nodes: I) -> Self
        where I: IntoIterator<Item = &'a Variable>
    {
        let mut map = BidirMap::new();
        for (i, &v) in nodes.into_iter().enumerate() {
            map.insert(v, i);
        }
        NodeRegistry { map }
    }

    /// The index of `var`, if it is registered
    pub fn index_of(&self, var: &Variable) -> Option<usize> {
        self.map.get_by_first(var).cloned()
    }

    /// The node at index `idx`
    pub fn node(&self, idx: usize) -> Option<Variable> {
        self.map.get_by_second(&idx).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn bijection() {
        let vars = vec![Variable::binary(), Variable::discrete(3), Variable::binary()];
        let reg = NodeRegistry::new(&vars);

        assert_eq!(reg.len(), 3);
        for (i, v) in vars.iter().enumerate() {
            assert_eq!(reg.index_of(v), Some(i));
            assert_eq!(reg.node(i), Some(*v));
        }

        assert_eq!(reg.index_of(&Variable::binary()), None);
        assert_eq!(reg.node(3), None);
    }
}
