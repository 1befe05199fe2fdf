//! Ground atoms, the registry that indexes them and truth assignments over that registry.

use util::{InferenceError, Result};

use indexmap::IndexMap;

use std::fmt;


/// A boolean proposition, identified by its index in the `WorldVariables`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroundAtom {

    /// The stable index of the atom. Assigned once, when the atom is registered.
    pub index: usize,

    /// The name of the atom, e.g. `smokes(Anna)`
    pub name: String

}

impl fmt::Display for GroundAtom {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }

}


/// The ordered registry of all ground atoms of a model. Defines the index space `[0, n)`.
#[derive(Clone, Debug, Default)]
pub struct WorldVariables {

    /// The atoms, stored at their index
    atoms: Vec<GroundAtom>,

    /// Lookup from name to index
    names: IndexMap<String, usize>

}

impl WorldVariables {

    pub fn new() -> Self {
        WorldVariables::default()
    }

    /// Build a registry from a sequence of atom names. Duplicate names are registered once.
    pub fn from_names<I, S>(names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        let mut vars = WorldVariables::new();
        for name in names {
            vars.add(name);
        }
        vars
    }

    /// Register a ground atom.
    ///
    /// # Returns
    /// the index of the atom. If an atom with the same name is already registered, its index is
    /// returned and the registry is unchanged.
    pub fn add<S: Into<String>>(&mut self, name: S) -> usize {
        let name = name.into();
        if let Some(&idx) = self.names.get(&name) {
            return idx;
        }

        let index = self.atoms.len();
        self.names.insert(name.clone(), index);
        self.atoms.push(GroundAtom { index, name });
        index
    }

    pub fn get(&self, index: usize) -> Option<&GroundAtom> {
        self.atoms.get(index)
    }

    pub fn lookup(&self, name: &str) -> Option<&GroundAtom> {
        self.names.get(name).map(|&i| &self.atoms[i])
    }

    /// Like `lookup`, but a missing atom is an error
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.names.get(name).cloned().ok_or_else(|| InferenceError::UnknownAtom(String::from(name)))
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundAtom> {
        self.atoms.iter()
    }

}


/// A complete truth assignment to the `WorldVariables`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PossibleWorld {
    values: Vec<bool>
}

impl PossibleWorld {

    /// The world in which every atom is false
    pub fn new(vars: &WorldVariables) -> Self {
        PossibleWorld::with_len(vars.len())
    }

    pub fn with_len(n: usize) -> Self {
        PossibleWorld { values: vec![false; n] }
    }

    pub fn from_values(values: Vec<bool>) -> Self {
        PossibleWorld { values }
    }

    pub fn is_true(&self, atom: usize) -> bool {
        self.values[atom]
    }

    pub fn set(&mut self, atom: usize, value: bool) {
        self.values[atom] = value;
    }

    pub fn flip(&mut self, atom: usize) {
        self.values[atom] = !self.values[atom];
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Render the world with atom names, one `name = value` pair per line
    pub fn describe(&self, vars: &WorldVariables) -> String {
        vars.iter()
            .map(|a| format!("{} = {}", a.name, self.values[a.index]))
            .collect::<Vec<String>>()
            .join("\n")
    }

}


/// Evidence: atoms whose truth value is fixed in every world considered
#[derive(Clone, Debug, Default)]
pub struct Database {
    entries: IndexMap<usize, bool>
}

impl Database {

    pub fn new() -> Self {
        Database::default()
    }

    pub fn set(&mut self, atom: usize, value: bool) {
        self.entries.insert(atom, value);
    }

    pub fn get(&self, atom: usize) -> Option<bool> {
        self.entries.get(&atom).cloned()
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.entries.contains_key(&atom)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.entries.iter().map(|(&a, &v)| (a, v))
    }

    /// Check that every entry refers to an atom of a world of size `n`
    pub fn check_bounds(&self, n: usize) -> Result<()> {
        match self.entries.keys().find(|&&a| a >= n) {
            Some(a) => Err(InferenceError::UnknownAtom(a.to_string())),
            None => Ok(())
        }
    }

    /// Overwrite the evidence atoms in `world` with their fixed values
    pub fn apply(&self, world: &mut PossibleWorld) {
        for (&atom, &value) in self.entries.iter() {
            world.set(atom, value);
        }
    }

    pub fn is_consistent(&self, world: &PossibleWorld) -> bool {
        self.entries.iter().all(|(&atom, &value)| world.is_true(atom) == value)
    }

}
