//! The MC-SAT algorithm for approximate inference in weighted knowledge bases.
//!
//! MC-SAT (Poon & Domingos, "Sound and Efficient Inference with Probabilistic and Deterministic
//! Dependencies", AAAI 2006) is a slice sampler over possible worlds. Starting from a world that
//! satisfies every hard formula, each step selects a random subset ```M``` of the formulas that
//! are true in the current world - every hard formula, and every soft formula with weight ```w```
//! with probability ```1 - exp(-w)``` - and moves to a world drawn (near-)uniformly from those
//! satisfying ```M```. The fraction of sampled worlds in which an atom is true estimates its
//! marginal probability.

use config::McSatConfig;
use distribution::{SampledDistribution, SharedDistribution};
use logic::{Database, GroundAtom, PossibleWorld, WeightedClausalKb, WeightedClause, WorldVariables};
use sat::{ConstraintSampler, SampleSat};
use util::Result;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};


/// Decide whether a satisfied soft formula of weight `weight` is kept in the slice.
///
/// # Returns
/// `true` with probability ```1 - exp(-weight)```. Exactly one uniform number is drawn.
pub fn soft_inclusion<R: Rng + ?Sized>(weight: f64, rng: &mut R) -> bool {
    rng.gen::<f64>() > (-weight).exp()
}


/// The MC-SAT sampler over the worlds of a weighted clausal knowledge base.
pub struct McSat<'a, S: ConstraintSampler> {

    kb: &'a WeightedClausalKb,

    vars: &'a WorldVariables,

    /// The sampler of satisfying assignments; its state is the current world of the chain
    sat: S,

    /// The distribution of the current run
    results: SharedDistribution,

    rng: StdRng,

    config: McSatConfig

}


impl<'a> McSat<'a, SampleSat> {

    /// Create an MC-SAT sampler that uses `SampleSat` and the default configuration.
    ///
    /// # Args
    /// * `kb`: the weighted knowledge base
    /// * `vars`: the ground atoms
    /// * `db`: the evidence
    ///
    /// # Errors
    /// * `InferenceError::InvalidWeight` if a soft formula has a negative or non-finite weight
    /// * `InferenceError::UnknownAtom` if a formula or the evidence refers to an unknown atom
    pub fn new(kb: &'a WeightedClausalKb, vars: &'a WorldVariables, db: &Database) -> Result<Self> {
        let sat = SampleSat::new(vars, db)?;
        McSat::with_sampler(kb, vars, sat, McSatConfig::default())
    }

}


impl<'a, S: ConstraintSampler> McSat<'a, S> {

    /// Create an MC-SAT sampler with the given constraint sampler and configuration. The sampler
    /// must have been created for the same ground atoms and evidence.
    ///
    /// # Errors
    /// * `InferenceError::InvalidWeight` if a soft formula has a negative or non-finite weight
    /// * `InferenceError::UnknownAtom` if a formula refers to an unknown atom
    /// * `InferenceError::InvalidConfig` if the configuration is invalid
    pub fn with_sampler(kb: &'a WeightedClausalKb, vars: &'a WorldVariables, mut sat: S, config: McSatConfig) -> Result<Self> {
        config.validate()?;
        kb.validate(vars.len())?;

        sat.set_p(config.p);
        sat.set_debug_mode(config.debug);
        let rng = config.rng();

        Ok(McSat { kb, vars, sat, results: SharedDistribution::new(), rng, config })
    }


    pub fn kb(&self) -> &WeightedClausalKb {
        self.kb
    }

    pub fn vars(&self) -> &WorldVariables {
        self.vars
    }

    pub fn config(&self) -> &McSatConfig {
        &self.config
    }

    /// Log the size of the active constraint set on every step
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    /// Dump the knowledge base and every active constraint set
    pub fn set_debug_mode(&mut self, active: bool) {
        self.config.debug = active;
    }

    pub fn set_info_interval(&mut self, interval: usize) {
        self.config.info_interval = interval;
    }

    /// Set the probability of a WalkSAT move in the constraint sampler
    pub fn set_p(&mut self, p: f64) {
        self.config.p = p;
        self.sat.set_p(p);
    }

    /// Reseed the random number generator
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Publish results through `handle` instead of a private one, e.g. to monitor the run from
    /// another thread
    pub fn set_results_handle(&mut self, handle: SharedDistribution) {
        self.results = handle;
    }

    /// A handle to the distribution of the current run
    pub fn results_handle(&self) -> SharedDistribution {
        self.results.clone()
    }

    /// A snapshot of the distribution of the current run, or `None` if sampling has not started
    pub fn poll_results(&self) -> Option<SampledDistribution> {
        self.results.poll()
    }

    /// The current world of the chain
    pub fn state(&self) -> &PossibleWorld {
        self.sat.state()
    }

    pub fn algorithm_name(&self) -> String {
        format!("MCSAT[{}]", self.sat.algorithm_name())
    }


    /// The estimated probability that `atom` is true. Meaningful after `run`; 0 before.
    pub fn get_result(&self, atom: &GroundAtom) -> f64 {
        self.results.with(|dist| dist.get_result(atom.index)).unwrap_or(0.0)
    }


    /// Run `steps` steps of MC-SAT. See `run_with`.
    pub fn run(&mut self, steps: usize) -> Result<()> {
        self.run_with(steps, |_| ())
    }


    /// Run `steps` steps of MC-SAT, calling `on_sample` with every sampled world.
    ///
    /// A fresh distribution is installed in the results handle at the start; it is normalized
    /// after the last step, or when the run is cancelled through the handle.
    ///
    /// # Errors
    /// * `InferenceError::InvalidConfig` if a setter left the configuration invalid. Nothing is
    ///   sampled in this case.
    /// * `InferenceError::Unsatisfiable` if no world satisfies the hard formulas, or if the
    ///   constraint sampler fails on a step
    pub fn run_with<F>(&mut self, steps: usize, mut on_sample: F) -> Result<()>
        where F: FnMut(&PossibleWorld)
    {
        self.config.validate()?;

        let debug = self.config.debug;
        let verbose = self.config.verbose || debug;
        let info_interval = self.config.info_interval;
        let name = self.algorithm_name();

        if debug {
            debug!("MC-SAT constraints:");
            for wc in self.kb.clauses() {
                debug!("  {}", wc);
            }
        }
        if verbose {
            info!("{} sampling...", name);
        }

        self.results.install(SampledDistribution::boolean(self.vars.len()));
        self.sat.set_debug_mode(debug);

        ///////////////////////////////////////////////////////////////////////
        // 1) find an initial state satisfying all hard constraints
        let hard = self.kb.hard_clauses();
        self.sat.init_constraints(&hard);
        self.sat.run(&mut self.rng)?;

        ///////////////////////////////////////////////////////////////////////
        // 2) sample
        let mut m: Vec<WeightedClause> = Vec::new();
        for i in 0..steps {
            if self.results.is_cancelled() {
                info!("{}: cancelled after {} steps", name, i);
                break;
            }

            m.clear();
            for (wf, clauses) in self.kb.formulas_and_clauses() {
                if wf.is_true(self.sat.state()) && (wf.is_hard || soft_inclusion(wf.weight, &mut self.rng)) {
                    m.extend(clauses.iter().cloned());
                }
            }

            if verbose || (i + 1) % info_interval == 0 {
                info!("MC-SAT step {}: {} constraints to be satisfied", i + 1, m.len());
                if debug {
                    for wc in m.iter() {
                        debug!("    {}", wc);
                    }
                }
            }

            self.sat.init_constraints(&m);
            self.sat.run(&mut self.rng)?;

            let state = self.sat.state();
            on_sample(state);
            self.results.with(|dist| dist.add_world(state, 1.0));
        }

        self.results.with(|dist| dist.normalize());
        Ok(())
    }

}
