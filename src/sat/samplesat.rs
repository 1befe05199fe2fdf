//! SampleSAT: near-uniform sampling of satisfying assignments by local search.
//!
//! Each step is either a WalkSAT move (with probability `p`) or a simulated annealing move at a
//! fixed temperature. The WalkSAT moves drive the search towards a solution, the annealing moves
//! mix among solutions. See Wei, Erenrich & Selman, "Towards Efficient Sampling: Exploiting Random
//! Walk Strategies" (AAAI 2004).
//!
//! Once a solution is found, a fixed number of mixing sweeps follow. A mixing move flips a random
//! free atom only if every clause stays satisfied. The proposal is symmetric, so the uniform
//! distribution over the solutions reachable by single flips is stationary.

use super::{evidence_vector, ConstraintSampler, Simplified};
use logic::{Database, PossibleWorld, WeightedClause, WorldVariables};
use util::Result;

use rand::{Rng, RngCore};


/// Statistics of a `SampleSat` sampler, accumulated over all runs
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SampleSatStats {

    /// Number of calls to `run`
    pub runs: u64,

    /// Number of atoms flipped by WalkSAT moves
    pub walk_flips: u64,

    /// Number of atoms flipped by simulated annealing moves
    pub annealing_flips: u64,

    /// Number of atoms flipped by mixing moves
    pub mixing_flips: u64,

    /// Number of rejected simulated annealing and mixing moves
    pub rejected_moves: u64

}


pub struct SampleSat {

    /// The current assignment
    state: PossibleWorld,

    /// The fixed value of every evidence atom
    evidence: Vec<Option<bool>>,

    /// The atoms that may be flipped
    free_atoms: Vec<usize>,

    /// The active constraints, simplified by the evidence
    constraints: Simplified,

    /// For every atom, the clauses it occurs in and the sign of its literal there
    occurrences: Vec<Vec<(usize, bool)>>,

    /// For every clause, the number of true literals in `state`
    true_literals: Vec<usize>,

    /// The indices of the unsatisfied clauses
    unsatisfied: Vec<usize>,

    /// The position of every clause in `unsatisfied`
    unsatisfied_pos: Vec<Option<usize>>,

    /// The probability of a WalkSAT move
    p: f64,

    /// The probability of a random (rather than greedy) flip within a WalkSAT move
    noise: f64,

    /// The simulated annealing temperature
    temperature: f64,

    /// The maximum number of flips per run
    max_flips: usize,

    /// The number of mixing sweeps over the free atoms after a solution is found
    mixing_sweeps: usize,

    debug: bool,

    stats: SampleSatStats

}


impl SampleSat {

    /// Create a new `SampleSat` sampler.
    ///
    /// # Args
    /// * `vars`: the ground atoms
    /// * `db`: the evidence; evidence atoms keep their value in every state
    ///
    /// # Errors
    /// * `InferenceError::UnknownAtom` if the evidence refers to an atom outside `vars`
    pub fn new(vars: &WorldVariables, db: &Database) -> Result<Self> {
        let evidence = evidence_vector(vars.len(), db)?;
        let free_atoms = (0..vars.len()).filter(|&a| evidence[a].is_none()).collect();

        let mut state = PossibleWorld::new(vars);
        db.apply(&mut state);

        Ok(SampleSat {
            state,
            evidence,
            free_atoms,
            constraints: Simplified::default(),
            occurrences: vec![Vec::new(); vars.len()],
            true_literals: Vec::new(),
            unsatisfied: Vec::new(),
            unsatisfied_pos: Vec::new(),
            p: 0.5,
            noise: 0.5,
            temperature: 0.5,
            max_flips: 100_000,
            mixing_sweeps: 10,
            debug: false,
            stats: SampleSatStats::default()
        })
    }

    /// Set the probability of a random flip within a WalkSAT move
    pub fn set_noise(&mut self, noise: f64) {
        self.noise = noise;
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    /// Set the number of flips after which a run gives up
    pub fn set_max_flips(&mut self, max_flips: usize) {
        self.max_flips = max_flips;
    }

    /// Set the number of mixing sweeps after a solution is found. A sweep proposes as many flips
    /// as there are free atoms.
    pub fn set_mixing_sweeps(&mut self, sweeps: usize) {
        self.mixing_sweeps = sweeps;
    }

    pub fn stats(&self) -> &SampleSatStats {
        &self.stats
    }


    /// Draw a uniformly random value for every free atom and rebuild the clause bookkeeping
    fn initialize(&mut self, rng: &mut dyn RngCore) {
        for &atom in self.free_atoms.iter() {
            let value = rng.gen::<bool>();
            self.state.set(atom, value);
        }

        let n = self.constraints.clauses.len();
        self.true_literals = vec![0; n];
        self.unsatisfied.clear();
        self.unsatisfied_pos = vec![None; n];

        for c in 0..n {
            let count = self.constraints.clauses[c]
                            .literals()
                            .iter()
                            .filter(|l| l.is_true(&self.state))
                            .count();
            self.true_literals[c] = count;
            if count == 0 {
                self.mark_unsatisfied(c);
            }
        }
    }

    fn mark_unsatisfied(&mut self, c: usize) {
        self.unsatisfied_pos[c] = Some(self.unsatisfied.len());
        self.unsatisfied.push(c);
    }

    fn mark_satisfied(&mut self, c: usize) {
        if let Some(pos) = self.unsatisfied_pos[c].take() {
            self.unsatisfied.swap_remove(pos);
            if pos < self.unsatisfied.len() {
                let moved = self.unsatisfied[pos];
                self.unsatisfied_pos[moved] = Some(pos);
            }
        }
    }


    /// Flip `atom` and update the clause bookkeeping
    fn flip(&mut self, atom: usize) {
        self.state.flip(atom);
        let value = self.state.is_true(atom);

        for i in 0..self.occurrences[atom].len() {
            let (c, positive) = self.occurrences[atom][i];
            if positive == value {
                self.true_literals[c] += 1;
                if self.true_literals[c] == 1 {
                    self.mark_satisfied(c);
                }
            } else {
                self.true_literals[c] -= 1;
                if self.true_literals[c] == 0 {
                    self.mark_unsatisfied(c);
                }
            }
        }
    }

    /// The change in the number of unsatisfied clauses if `atom` were flipped
    fn delta(&self, atom: usize) -> i64 {
        let value = self.state.is_true(atom);
        let mut delta = 0;

        for &(c, positive) in self.occurrences[atom].iter() {
            if positive == value {
                // the literal is true and would become false
                if self.true_literals[c] == 1 {
                    delta += 1;
                }
            } else if self.true_literals[c] == 0 {
                delta -= 1;
            }
        }

        delta
    }

    /// The number of satisfied clauses that would become unsatisfied if `atom` were flipped
    fn break_count(&self, atom: usize) -> usize {
        let value = self.state.is_true(atom);
        self.occurrences[atom]
            .iter()
            .filter(|&&(c, positive)| positive == value && self.true_literals[c] == 1)
            .count()
    }


    /// WalkSAT: pick an unsatisfied clause and flip one of its atoms, either at random or the one
    /// that breaks the fewest clauses
    fn walk_move(&mut self, rng: &mut dyn RngCore) {
        let c = self.unsatisfied[rng.gen_range(0..self.unsatisfied.len())];
        let literals = self.constraints.clauses[c].literals();

        let atom = if rng.gen::<f64>() < self.noise {
            literals[rng.gen_range(0..literals.len())].atom
        } else {
            let mut best = Vec::new();
            let mut best_count = usize::max_value();
            for l in literals.iter() {
                let count = self.break_count(l.atom);
                if count < best_count {
                    best_count = count;
                    best.clear();
                }
                if count == best_count {
                    best.push(l.atom);
                }
            }
            best[rng.gen_range(0..best.len())]
        };

        self.flip(atom);
        self.stats.walk_flips += 1;
    }

    /// Simulated annealing: flip a random free atom if that does not increase the number of
    /// unsatisfied clauses, otherwise with probability ```exp(-delta / T)```
    fn annealing_move(&mut self, rng: &mut dyn RngCore) {
        let atom = self.free_atoms[rng.gen_range(0..self.free_atoms.len())];
        let delta = self.delta(atom);

        if delta <= 0 || rng.gen::<f64>() < (-(delta as f64) / self.temperature).exp() {
            self.flip(atom);
            self.stats.annealing_flips += 1;
        } else {
            self.stats.rejected_moves += 1;
        }
    }

    /// Flip a random free atom if no clause becomes unsatisfied. Only called on a solution.
    fn mixing_move(&mut self, rng: &mut dyn RngCore) {
        let atom = self.free_atoms[rng.gen_range(0..self.free_atoms.len())];

        if self.break_count(atom) == 0 {
            self.flip(atom);
            self.stats.mixing_flips += 1;
        } else {
            self.stats.rejected_moves += 1;
        }
    }

}


impl ConstraintSampler for SampleSat {

    fn init_constraints(&mut self, constraints: &[WeightedClause]) {
        self.constraints = Simplified::new(constraints, &self.evidence);

        for occ in self.occurrences.iter_mut() {
            occ.clear();
        }
        for (c, clause) in self.constraints.clauses.iter().enumerate() {
            for l in clause.literals().iter() {
                self.occurrences[l.atom].push((c, l.positive));
            }
        }

        if self.debug {
            debug!("SampleSAT constraints ({} of {} remain after evidence):", self.constraints.clauses.len(), constraints.len());
            for clause in self.constraints.clauses.iter() {
                debug!("  {}", clause);
            }
        }
    }


    fn run(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        self.stats.runs += 1;

        if self.constraints.contradicted {
            return Err(self.constraints.unsatisfiable(0));
        }

        self.initialize(rng);

        let mut flips = 0;
        while !self.unsatisfied.is_empty() {
            if flips >= self.max_flips {
                return Err(self.constraints.unsatisfiable(flips));
            }

            if rng.gen::<f64>() < self.p {
                self.walk_move(rng);
            } else {
                self.annealing_move(rng);
            }
            flips += 1;
        }

        for _ in 0..self.mixing_sweeps * self.free_atoms.len() {
            self.mixing_move(rng);
        }

        if self.debug {
            debug!("SampleSAT: satisfied {} constraints after {} steps", self.constraints.clauses.len(), flips);
        }

        Ok(())
    }


    fn state(&self) -> &PossibleWorld {
        &self.state
    }

    fn set_p(&mut self, p: f64) {
        self.p = p;
    }

    fn set_debug_mode(&mut self, active: bool) {
        self.debug = active;
    }

    fn algorithm_name(&self) -> &'static str {
        "SampleSAT"
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use logic::{Clause, Literal};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hard(lits: Vec<Literal>) -> WeightedClause {
        WeightedClause { clause: Clause::new(lits), weight: ::std::f64::INFINITY, is_hard: true }
    }

    #[test]
    fn satisfies_constraints() {
        let vars = WorldVariables::from_names((0..8).map(|i| format!("a{}", i)));
        let mut db = Database::new();
        db.set(0, true);
        db.set(5, false);

        let constraints = vec![
            hard(vec![Literal::neg(0), Literal::pos(1)]),
            hard(vec![Literal::neg(1), Literal::pos(2), Literal::pos(5)]),
            hard(vec![Literal::neg(2), Literal::neg(3)]),
            hard(vec![Literal::pos(3), Literal::pos(4), Literal::pos(6)]),
            hard(vec![Literal::neg(6), Literal::neg(7)]),
            hard(vec![Literal::pos(7), Literal::pos(5), Literal::neg(4)])
        ];

        let mut sat = SampleSat::new(&vars, &db).unwrap();
        sat.init_constraints(&constraints);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            sat.run(&mut rng).unwrap();
            let state = sat.state();
            assert!(constraints.iter().all(|c| c.is_true(state)));
            assert!(db.is_consistent(state));
        }

        assert_eq!(sat.stats().runs, 200);
        assert_eq!(sat.algorithm_name(), "SampleSAT");
    }

    #[test]
    fn uniform() {
        // a v b has three solutions
        let vars = WorldVariables::from_names(vec!["a", "b"]);
        let mut sat = SampleSat::new(&vars, &Database::new()).unwrap();
        sat.init_constraints(&[hard(vec![Literal::pos(0), Literal::pos(1)])]);

        let mut rng = StdRng::seed_from_u64(9);
        let mut counts = [0usize; 4];
        let n = 30000;
        for _ in 0..n {
            sat.run(&mut rng).unwrap();
            let s = sat.state();
            counts[s.is_true(0) as usize * 2 + s.is_true(1) as usize] += 1;
        }

        assert_eq!(counts[0], 0);
        for &c in counts[1..].iter() {
            assert_abs_diff_eq!(c as f64 / n as f64, 1.0 / 3.0, epsilon = 0.015);
        }
        assert!(sat.stats().mixing_flips > 0);
    }

    #[test]
    fn uniform_with_evidence() {
        // with c = false, (a v b v c) ^ (-a v -b) has the two solutions 01 and 10 for a, b
        let vars = WorldVariables::from_names(vec!["a", "b", "c", "d"]);
        let mut db = Database::new();
        db.set(2, false);

        let mut sat = SampleSat::new(&vars, &db).unwrap();
        sat.init_constraints(&[
            hard(vec![Literal::pos(0), Literal::pos(1), Literal::pos(2)]),
            hard(vec![Literal::neg(0), Literal::neg(1)])
        ]);

        let mut rng = StdRng::seed_from_u64(21);
        let n = 20000;
        let mut a = 0;
        let mut d = 0;
        for _ in 0..n {
            sat.run(&mut rng).unwrap();
            let s = sat.state();
            assert!(!s.is_true(2));
            assert!(s.is_true(0) != s.is_true(1));
            a += s.is_true(0) as usize;
            d += s.is_true(3) as usize;
        }

        assert_abs_diff_eq!(a as f64 / n as f64, 0.5, epsilon = 0.015);
        assert_abs_diff_eq!(d as f64 / n as f64, 0.5, epsilon = 0.015);
    }

    #[test]
    fn empty_constraints() {
        let vars = WorldVariables::from_names((0..4).map(|i| format!("a{}", i)));
        let mut sat = SampleSat::new(&vars, &Database::new()).unwrap();
        sat.init_constraints(&[]);
        let mut rng = StdRng::seed_from_u64(1);

        // every atom is true about half the time
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            sat.run(&mut rng).unwrap();
            for a in 0..4 {
                if sat.state().is_true(a) {
                    counts[a] += 1;
                }
            }
        }
        for &c in counts.iter() {
            assert_abs_diff_eq!(c as f64 / 4000.0, 0.5, epsilon = 0.05);
        }
    }

    #[test]
    fn contradicted_by_evidence() {
        let vars = WorldVariables::from_names(vec!["a", "b"]);
        let mut db = Database::new();
        db.set(0, false);

        let mut sat = SampleSat::new(&vars, &db).unwrap();
        sat.init_constraints(&[hard(vec![Literal::pos(0)])]);
        let mut rng = StdRng::seed_from_u64(1);

        match sat.run(&mut rng) {
            Err(::util::InferenceError::Unsatisfiable { constraints: 1, flips: 0 }) => (),
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn gives_up() {
        let vars = WorldVariables::from_names(vec!["a", "b"]);
        let mut sat = SampleSat::new(&vars, &Database::new()).unwrap();
        sat.set_max_flips(1000);
        sat.init_constraints(&[hard(vec![Literal::pos(0)]), hard(vec![Literal::neg(0)])]);
        let mut rng = StdRng::seed_from_u64(1);

        match sat.run(&mut rng) {
            Err(::util::InferenceError::Unsatisfiable { constraints: 2, flips: 1000 }) => (),
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn unknown_evidence_atom() {
        let vars = WorldVariables::from_names(vec!["a"]);
        let mut db = Database::new();
        db.set(3, true);
        assert!(SampleSat::new(&vars, &db).is_err());
    }
}
