//! Exact uniform sampling of satisfying assignments by enumeration. Only usable for a handful of
//! free atoms.

use super::{evidence_vector, ConstraintSampler, Simplified};
use logic::{Database, PossibleWorld, WeightedClause, WorldVariables};
use util::{InferenceError, Result};

use rand::{Rng, RngCore};


/// The default maximum number of free atoms
pub const DEFAULT_ATOM_LIMIT: usize = 20;


/// Enumerates every assignment of the free atoms, and picks one of the satisfying ones uniformly
/// at random.
pub struct ExhaustiveSampler {

    state: PossibleWorld,

    evidence: Vec<Option<bool>>,

    free_atoms: Vec<usize>,

    constraints: Simplified,

    /// The maximum number of free atoms to enumerate
    limit: usize,

    debug: bool

}

impl ExhaustiveSampler {

    /// Create a new `ExhaustiveSampler`.
    ///
    /// # Errors
    /// * `InferenceError::UnknownAtom` if the evidence refers to an atom outside `vars`
    /// * `InferenceError::TooManyAtoms` if there are more than `DEFAULT_ATOM_LIMIT` free atoms
    pub fn new(vars: &WorldVariables, db: &Database) -> Result<Self> {
        ExhaustiveSampler::with_limit(vars, db, DEFAULT_ATOM_LIMIT)
    }

    /// Create a new `ExhaustiveSampler` that enumerates up to `limit` free atoms
    pub fn with_limit(vars: &WorldVariables, db: &Database, limit: usize) -> Result<Self> {
        let evidence = evidence_vector(vars.len(), db)?;
        let free_atoms: Vec<usize> = (0..vars.len()).filter(|&a| evidence[a].is_none()).collect();

        // limited by the width of the enumeration counter as well
        let limit = limit.min(63);
        if free_atoms.len() > limit {
            return Err(InferenceError::TooManyAtoms { atoms: free_atoms.len(), limit });
        }

        let mut state = PossibleWorld::new(vars);
        db.apply(&mut state);

        Ok(ExhaustiveSampler { state, evidence, free_atoms, constraints: Simplified::default(), limit, debug: false })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }


    /// Set the free atoms to the bits of `mask`
    fn load(&mut self, mask: u64) {
        for (bit, &atom) in self.free_atoms.iter().enumerate() {
            self.state.set(atom, mask & (1 << bit) != 0);
        }
    }

    fn satisfied(&self) -> bool {
        self.constraints.clauses.iter().all(|c| c.is_true(&self.state))
    }

    /// The satisfying masks, in increasing order
    fn solutions(&mut self) -> Vec<u64> {
        let mut solutions = Vec::new();
        for mask in 0..(1u64 << self.free_atoms.len()) {
            self.load(mask);
            if self.satisfied() {
                solutions.push(mask);
            }
        }
        solutions
    }

}


impl ConstraintSampler for ExhaustiveSampler {

    fn init_constraints(&mut self, constraints: &[WeightedClause]) {
        self.constraints = Simplified::new(constraints, &self.evidence);

        if self.debug {
            debug!("Exhaustive constraints ({} of {} remain after evidence):", self.constraints.clauses.len(), constraints.len());
            for clause in self.constraints.clauses.iter() {
                debug!("  {}", clause);
            }
        }
    }

    fn run(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let assignments = 1usize << self.free_atoms.len();
        if self.constraints.contradicted {
            return Err(self.constraints.unsatisfiable(0));
        }

        let solutions = self.solutions();
        if solutions.is_empty() {
            return Err(self.constraints.unsatisfiable(assignments));
        }

        let pick = solutions[rng.gen_range(0..solutions.len())];
        self.load(pick);

        if self.debug {
            debug!("Exhaustive: {} of {} assignments satisfy the constraints", solutions.len(), assignments);
        }

        Ok(())
    }

    fn state(&self) -> &PossibleWorld {
        &self.state
    }

    fn set_p(&mut self, _p: f64) {}

    fn set_debug_mode(&mut self, active: bool) {
        self.debug = active;
    }

    fn algorithm_name(&self) -> &'static str {
        "Exhaustive"
    }

}
