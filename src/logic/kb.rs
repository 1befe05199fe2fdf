//! Weighted formulas and the clausal knowledge base MC-SAT operates on.

use super::{Clause, Formula, PossibleWorld};
use util::{InferenceError, Result};

use std::fmt;


/// A `Formula` with a real-valued weight. A hard formula has infinite weight: it must hold in
/// every world.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedFormula {
    pub formula: Formula,
    pub weight: f64,
    pub is_hard: bool
}

impl WeightedFormula {

    /// A soft formula with the given weight
    pub fn soft(formula: Formula, weight: f64) -> Self {
        WeightedFormula { formula, weight, is_hard: false }
    }

    /// A hard formula
    pub fn hard(formula: Formula) -> Self {
        WeightedFormula { formula, weight: ::std::f64::INFINITY, is_hard: true }
    }

    pub fn is_true(&self, world: &PossibleWorld) -> bool {
        self.formula.is_true(world)
    }

    /// Check that the weight can be used as a slice-sampling inclusion weight.
    ///
    /// The probability of keeping a satisfied soft formula is `1 - exp(-w)`, which is a
    /// probability only for `w >= 0`. Negative weights must be expressed by negating the formula.
    pub fn validate(&self) -> Result<()> {
        if self.is_hard {
            return Ok(());
        }

        if self.weight.is_nan() || self.weight.is_infinite() || self.weight < 0.0 {
            return Err(InferenceError::InvalidWeight {
                formula: self.formula.to_string(),
                weight: self.weight
            });
        }

        Ok(())
    }

}

impl fmt::Display for WeightedFormula {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_hard {
            write!(f, "{}.", self.formula)
        } else {
            write!(f, "{} {}", self.weight, self.formula)
        }
    }

}


/// One clause of the CNF of a `WeightedFormula`, carrying the formula's weight and hardness
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedClause {
    pub clause: Clause,
    pub weight: f64,
    pub is_hard: bool
}

impl WeightedClause {

    pub fn is_true(&self, world: &PossibleWorld) -> bool {
        self.clause.is_true(world)
    }

}

impl fmt::Display for WeightedClause {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_hard {
            write!(f, "{}.", self.clause)
        } else {
            write!(f, "{} {}", self.weight, self.clause)
        }
    }

}


/// A weighted knowledge base in clausal form: each `WeightedFormula` together with the
/// `WeightedClause`s of its CNF.
#[derive(Clone, Debug, Default)]
pub struct WeightedClausalKb {
    entries: Vec<(WeightedFormula, Vec<WeightedClause>)>
}

impl WeightedClausalKb {

    pub fn new() -> Self {
        WeightedClausalKb::default()
    }


    /// Add a formula; its clauses are obtained by CNF conversion.
    pub fn add(&mut self, wf: WeightedFormula) -> &mut Self {
        let clauses = wf.formula.to_cnf();
        self.add_with_clauses(wf, clauses)
    }


    /// Add a formula along with a precomputed clausal form.
    ///
    /// # Args
    /// * `wf`: the weighted formula
    /// * `clauses`: clauses whose conjunction is equivalent to `wf.formula`
    pub fn add_with_clauses(&mut self, wf: WeightedFormula, clauses: Vec<Clause>) -> &mut Self {
        let weighted = clauses.into_iter()
                              .map(|clause| WeightedClause { clause, weight: wf.weight, is_hard: wf.is_hard })
                              .collect();

        self.entries.push((wf, weighted));
        self
    }


    /// Iterate over every formula and its clauses
    pub fn formulas_and_clauses(&self) -> impl Iterator<Item = (&WeightedFormula, &[WeightedClause])> {
        self.entries.iter().map(|(wf, clauses)| (wf, clauses.as_slice()))
    }

    pub fn formulas(&self) -> impl Iterator<Item = &WeightedFormula> {
        self.entries.iter().map(|(wf, _)| wf)
    }

    /// Iterate over all clauses of all formulas
    pub fn clauses(&self) -> impl Iterator<Item = &WeightedClause> {
        self.entries.iter().flat_map(|(_, clauses)| clauses.iter())
    }

    /// The clauses of all hard formulas
    pub fn hard_clauses(&self) -> Vec<WeightedClause> {
        self.entries.iter()
                    .filter(|(wf, _)| wf.is_hard)
                    .flat_map(|(_, clauses)| clauses.iter().cloned())
                    .collect()
    }

    /// The number of formulas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn num_clauses(&self) -> usize {
        self.entries.iter().map(|(_, clauses)| clauses.len()).sum()
    }

    /// Validate every formula's weight and check that all atoms exist in a world of size `n`
    pub fn validate(&self, n: usize) -> Result<()> {
        for (wf, clauses) in self.entries.iter() {
            wf.validate()?;

            let atoms = wf.formula.atoms().into_iter()
                          .chain(clauses.iter().flat_map(|c| c.clause.literals().iter().map(|l| l.atom)));
            for atom in atoms {
                if atom >= n {
                    return Err(InferenceError::UnknownAtom(atom.to_string()));
                }
            }
        }

        Ok(())
    }

}
