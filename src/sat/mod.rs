//! Samplers for the satisfying assignments of a set of clauses.
//!
//! MC-SAT needs, at every step, a (near-)uniform sample from the worlds satisfying the currently
//! active clauses. A `ConstraintSampler` holds the current state, receives the active clauses
//! through `init_constraints` and replaces its state with a new satisfying one on every `run`.

use logic::{Clause, Database, Literal, PossibleWorld, WeightedClause};
use util::{InferenceError, Result};

use rand::RngCore;

mod exhaustive;
mod samplesat;

pub use self::exhaustive::ExhaustiveSampler;
pub use self::samplesat::{SampleSat, SampleSatStats};


/// A stateful sampler of satisfying assignments.
///
/// # Contract
/// After a successful `run`, `state()` satisfies every clause passed to the last
/// `init_constraints` and agrees with the evidence database the sampler was created with.
/// Evidence atoms are never changed. Among all such assignments, the new state is drawn
/// uniformly at random (exactly, or approximately for local-search samplers).
pub trait ConstraintSampler {

    /// Replace the active constraints
    fn init_constraints(&mut self, constraints: &[WeightedClause]);

    /// Move to a new state satisfying the active constraints.
    ///
    /// # Errors
    /// * `InferenceError::Unsatisfiable` if no satisfying state was found
    fn run(&mut self, rng: &mut dyn RngCore) -> Result<()>;

    /// The current state
    fn state(&self) -> &PossibleWorld;

    /// Set the probability of a greedy local-search move (samplers that have no such moves
    /// ignore it)
    fn set_p(&mut self, p: f64);

    fn set_debug_mode(&mut self, active: bool);

    fn algorithm_name(&self) -> &'static str;

}


/// Active constraints with the evidence folded in.
///
/// Clauses satisfied by the evidence are dropped, and literals on evidence atoms that the evidence
/// makes false are removed, so every remaining literal is on a free atom.
#[derive(Clone, Debug, Default)]
struct Simplified {

    /// The remaining clauses, none of them tautological
    clauses: Vec<Clause>,

    /// The number of constraints before simplification
    num_constraints: usize,

    /// `true` if some constraint is violated by the evidence alone
    contradicted: bool

}

impl Simplified {

    fn new(constraints: &[WeightedClause], evidence: &[Option<bool>]) -> Self {
        let mut clauses = Vec::with_capacity(constraints.len());
        let mut contradicted = false;

        for wc in constraints.iter() {
            if wc.clause.is_tautology() {
                continue;
            }

            let satisfied = wc.clause.literals().iter().any(|l| evidence[l.atom] == Some(l.positive));
            if satisfied {
                continue;
            }

            let free: Vec<Literal> = wc.clause.literals()
                                              .iter()
                                              .filter(|l| evidence[l.atom].is_none())
                                              .cloned()
                                              .collect();
            if free.is_empty() {
                contradicted = true;
            }
            clauses.push(Clause::new(free));
        }

        Simplified { clauses, num_constraints: constraints.len(), contradicted }
    }

    fn unsatisfiable(&self, flips: usize) -> InferenceError {
        InferenceError::Unsatisfiable { constraints: self.num_constraints, flips }
    }

}


/// The evidence of `db` as one entry per atom, checked against the number of atoms
fn evidence_vector(n: usize, db: &Database) -> Result<Vec<Option<bool>>> {
    db.check_bounds(n)?;
    Ok((0..n).map(|atom| db.get(atom)).collect())
}
