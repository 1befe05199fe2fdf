//! Defines the `Sampler` driver, which estimates posterior marginals of a `BeliefNetwork` by Monte
//! Carlo sampling, and the `InferenceStrategy` trait implemented by the concrete algorithms.
//!
//! The driver owns everything that is shared between algorithms - the evidence, the
//! configuration, the random number generator and the accumulated distribution - in a
//! `SamplingContext`. A strategy draws individual samples from the context; the driver times the
//! run and hands out the results.

use bayesnet::BeliefNetwork;
use config::SamplerConfig;
use discrete;
use distribution::{SampledDistribution, SharedDistribution};
use util::{InferenceError, Result};
use variable::Variable;

use rand::rngs::StdRng;
use rand::SeedableRng;

use std::time::{Duration, Instant};

pub mod forward;
pub mod likelihood;

pub use self::forward::ForwardSampling;
pub use self::likelihood::LikelihoodWeighting;


/// A full assignment to the nodes of a network together with its importance weight.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedSample {

    /// The domain index of every node, indexed like the network's `NodeRegistry`
    pub node_domain_indices: Vec<usize>,

    /// The weight of the sample
    pub weight: f64,

    /// How many attempts it took to draw the sample
    pub trials: usize

}

impl WeightedSample {

    pub fn new(node_domain_indices: Vec<usize>, weight: f64) -> Self {
        WeightedSample { node_domain_indices, weight, trials: 1 }
    }

}


/// A sampling algorithm for belief networks.
///
/// Implementors only need to provide `draw`, a single attempt at a sample. The provided `run`
/// repeats it `num_samples` times, retrying failed attempts up to `max_trials` times, and stops
/// early on convergence or cancellation.
pub trait InferenceStrategy {

    /// A short name for reports and logging
    fn algorithm_name(&self) -> &'static str;

    /// Attempt to draw a single sample.
    ///
    /// # Returns
    /// the sample, or `None` if the attempt failed (e.g. it contradicts the evidence)
    fn draw(&mut self, ctx: &mut SamplingContext) -> Option<WeightedSample>;

    /// Draw samples into the context's distribution until the sample budget is exhausted.
    ///
    /// # Errors
    /// * `InferenceError::MaxTrialsExceeded` if a step fails `max_trials` times and failed steps
    ///   may not be skipped
    /// * errors raised by `SamplingContext::add_sample` and `SamplingContext::converged`
    fn run(&mut self, ctx: &mut SamplingContext) -> Result<()> {
        let name = self.algorithm_name();
        let num_samples = ctx.config().num_samples;
        let max_trials = ctx.config().max_trials;
        let info_interval = ctx.config().info_interval;

        let mut drawn = 0;
        let mut skipped = 0;
        let mut total_trials = 0;

        for step in 1..=num_samples {
            if ctx.is_cancelled() {
                info!("{}: cancelled after {} samples", name, drawn);
                break;
            }

            let mut trials = 0;
            let sample = loop {
                trials += 1;
                if let Some(mut s) = self.draw(ctx) {
                    s.trials = trials;
                    break Some(s);
                }

                if trials >= max_trials {
                    if ctx.config().skip_failed_steps {
                        warn!("{}: step {} failed after {} trials, skipping", name, step, trials);
                        break None;
                    }
                    return Err(InferenceError::MaxTrialsExceeded(trials));
                }
            };
            total_trials += trials;

            match sample {
                Some(s) => {
                    ctx.add_sample(&s)?;
                    drawn += 1;
                },
                None => skipped += 1
            }

            if step % info_interval == 0 {
                info!("{}: step {} of {}", name, step, num_samples);
            }

            if ctx.converged()? {
                break;
            }
        }

        ctx.report(format!("{}: {} samples, {} skipped steps, {} trials", name, drawn, skipped, total_trials));
        Ok(())
    }

}


/// The state shared between the `Sampler` driver and its `InferenceStrategy`
pub struct SamplingContext<'a> {

    /// The network to sample
    network: &'a BeliefNetwork,

    /// The observed domain index of every node, or `None` if the node is unobserved
    evidence: Vec<Option<usize>>,

    config: SamplerConfig,

    /// The nodes whose confidence intervals decide convergence. Defaults to every unobserved node.
    query_vars: Option<Vec<usize>>,

    rng: StdRng,

    /// The distribution of the current run
    results: SharedDistribution,

    /// Lines emitted after the run
    report: Vec<String>

}

impl<'a> SamplingContext<'a> {

    fn new(network: &'a BeliefNetwork, config: SamplerConfig) -> Self {
        let rng = config.rng();
        SamplingContext {
            network,
            evidence: vec![None; network.num_nodes()],
            config,
            query_vars: None,
            rng,
            results: SharedDistribution::new(),
            report: Vec::new()
        }
    }

    pub fn network(&self) -> &'a BeliefNetwork {
        self.network
    }

    pub fn evidence(&self) -> &[Option<usize>] {
        &self.evidence
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn is_cancelled(&self) -> bool {
        self.results.is_cancelled()
    }

    /// Append a line to the report of the current run
    pub fn report(&mut self, line: String) {
        self.report.push(line);
    }

    /// The query variables, defaulting to every unobserved node
    pub fn query_vars(&self) -> Vec<usize> {
        match self.query_vars {
            Some(ref q) => q.clone(),
            None => (0..self.evidence.len()).filter(|&i| self.evidence[i].is_none()).collect()
        }
    }


    /// Sample a value for `node` given the values of its parents.
    ///
    /// # Args
    /// * `node`: the node for which to sample a value
    /// * `assignment`: the domain index of every node; the entries of the parents of `node` must
    ///   be set already
    ///
    /// # Returns
    /// the sampled domain index, or `None` if the node is not part of the network, `assignment`
    /// is not a valid assignment to the node and its parents, or every entry of the relevant CPT
    /// column is zero
    pub fn sample_forward(&mut self, node: &Variable, assignment: &[usize]) -> Option<usize> {
        let network = self.network;
        let cpt = network.cpt(node)?;

        // the address of the first entry of the column; the node's own entry is irrelevant
        let mut addr = network.cpt_address(cpt, assignment).ok()?;
        addr[0] = 0;
        let start = cpt.real_address(&addr);
        let stride = cpt.column_stride();

        let entries = cpt.entries();
        let column = (0..node.cardinality()).map(|k| entries[start + k * stride]);
        let sum: f64 = column.clone().sum();

        // a column of zeros is an impossible parent configuration
        if sum == 0.0 {
            return None;
        }

        discrete::sample_iter_with_sum(column, sum, &mut self.rng)
    }


    /// The CPT entry of `node` for the values in `assignment`, i.e.
    /// ```P(node = assignment[node] | Pa(node) = assignment[Pa(node)])```
    pub fn cpt_probability(&self, node: &Variable, assignment: &[usize]) -> Result<f64> {
        let cpt = self.network.cpt(node).ok_or(InferenceError::UnknownNode)?;
        let addr = self.network.cpt_address(cpt, assignment)?;
        Ok(cpt.value(&addr))
    }


    /// Add a sample to the distribution of the current run.
    ///
    /// # Errors
    /// * `InferenceError::EvidenceLength` or `InferenceError::InvalidDomainIndex` if the sample is
    ///   not a full assignment to the network
    /// * `InferenceError::EvidenceViolation` in debug mode, if the sample disagrees with the
    ///   evidence. The sample is not added.
    pub fn add_sample(&self, sample: &WeightedSample) -> Result<()> {
        self.network.check_assignment(&sample.node_domain_indices)?;

        if self.config.debug {
            let violation = self.evidence
                                .iter()
                                .zip(sample.node_domain_indices.iter())
                                .enumerate()
                                .find(|&(_, (e, &v))| e.map_or(false, |e| e != v));

            if let Some((node, (&Some(expected), &actual))) = violation {
                return Err(InferenceError::EvidenceViolation { node, expected, actual });
            }
        }

        self.results
            .with(|dist| dist.add_sample(sample))
            .ok_or_else(|| InferenceError::General(String::from("sampling has not started")))
    }


    /// Check whether the estimates are precise enough to stop sampling.
    ///
    /// The check only happens when the number of samples is a multiple of the convergence check
    /// interval and a confidence interval size threshold is set. Sampling has converged if no
    /// query variable has a confidence interval wider than the threshold.
    ///
    /// # Errors
    /// * `InferenceError::MissingConfidenceLevel` if a threshold is set but the distribution has
    ///   no confidence level
    /// * `InferenceError::General` if sampling has not started
    pub fn converged(&self) -> Result<bool> {
        let threshold = match self.config.confidence_interval_size_threshold {
            Some(t) => t,
            None => return Ok(false)
        };
        let interval = self.config.convergence_check_interval;
        let query = self.query_vars();

        let res = self.results.with(|dist| -> Result<bool> {
            if dist.num_samples() % interval != 0 {
                return Ok(false);
            }

            if !dist.uses_confidence_computation() {
                return Err(InferenceError::MissingConfidenceLevel);
            }

            let mut max: f64 = 0.0;
            for &i in query.iter() {
                for v in 0..dist.domain_size(i) {
                    max = max.max(dist.confidence_interval(i, v)?.size());
                }
            }

            if max <= threshold {
                info!("Convergence criterion reached: maximum confidence interval size = {}", max);
                Ok(true)
            } else {
                Ok(false)
            }
        });

        res.unwrap_or_else(|| Err(InferenceError::General(String::from("sampling has not started"))))
    }

}


/// Monte Carlo inference in a `BeliefNetwork` with a selectable `InferenceStrategy`.
///
/// # Example
/// ```ignore
/// let mut sampler = Sampler::new(&network, LikelihoodWeighting::new());
/// sampler.set_evidence(vec![None, Some(1), None])?;
/// sampler.set_num_samples(10000);
/// let dist = sampler.infer()?;
/// ```
pub struct Sampler<'a, S: InferenceStrategy> {

    ctx: SamplingContext<'a>,

    strategy: S,

    /// The duration of the last call to `infer`
    sampling_time: Duration

}

impl<'a, S: InferenceStrategy> Sampler<'a, S> {

    /// Create a sampler with the default configuration
    pub fn new(network: &'a BeliefNetwork, strategy: S) -> Self {
        Sampler {
            ctx: SamplingContext::new(network, SamplerConfig::default()),
            strategy,
            sampling_time: Duration::from_secs(0)
        }
    }

    /// Create a sampler with the given configuration
    ///
    /// # Errors
    /// * `InferenceError::InvalidConfig` if the configuration is invalid
    pub fn with_config(network: &'a BeliefNetwork, strategy: S, config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Sampler {
            ctx: SamplingContext::new(network, config),
            strategy,
            sampling_time: Duration::from_secs(0)
        })
    }


    /// Set the evidence.
    ///
    /// # Args
    /// * `evidence`: for every node, its observed domain index or `None`
    ///
    /// # Errors
    /// * `InferenceError::EvidenceLength` if the vector does not have one entry per node
    /// * `InferenceError::InvalidDomainIndex` if an observed value is out of range
    pub fn set_evidence(&mut self, evidence: Vec<Option<usize>>) -> Result<()> {
        let network = self.ctx.network;
        if evidence.len() != network.num_nodes() {
            return Err(InferenceError::EvidenceLength { expected: network.num_nodes(), actual: evidence.len() });
        }

        for (node, ((var, _), e)) in network.iter().zip(evidence.iter()).enumerate() {
            if let Some(value) = *e {
                if value >= var.cardinality() {
                    return Err(InferenceError::InvalidDomainIndex { node, value, cardinality: var.cardinality() });
                }
            }
        }

        self.ctx.evidence = evidence;
        Ok(())
    }

    pub fn evidence(&self) -> &[Option<usize>] {
        &self.ctx.evidence
    }

    pub fn set_num_samples(&mut self, n: usize) {
        self.ctx.config.num_samples = n;
    }

    pub fn set_max_trials(&mut self, n: usize) {
        self.ctx.config.max_trials = n;
    }

    pub fn set_skip_failed_steps(&mut self, skip: bool) {
        self.ctx.config.skip_failed_steps = skip;
    }

    pub fn set_confidence_interval_size_threshold(&mut self, t: f64) {
        self.ctx.config.confidence_interval_size_threshold = Some(t);
    }

    pub fn set_confidence_level(&mut self, level: f64) {
        self.ctx.config.confidence_level = Some(level);
    }

    pub fn set_convergence_check_interval(&mut self, n: usize) {
        self.ctx.config.convergence_check_interval = n;
    }

    pub fn set_info_interval(&mut self, n: usize) {
        self.ctx.config.info_interval = n;
    }

    /// In debug mode, every sample is checked against the evidence before it is added
    pub fn set_debug_mode(&mut self, active: bool) {
        self.ctx.config.debug = active;
    }

    /// Restrict the convergence check to the given nodes
    pub fn set_query_vars(&mut self, query_vars: Vec<usize>) {
        self.ctx.query_vars = Some(query_vars);
    }

    /// Reseed the random number generator
    pub fn set_seed(&mut self, seed: u64) {
        self.ctx.config.seed = Some(seed);
        self.ctx.rng = StdRng::seed_from_u64(seed);
    }

    /// Publish results through `handle` instead of a private one, e.g. to monitor the run from
    /// another thread
    pub fn set_results_handle(&mut self, handle: SharedDistribution) {
        self.ctx.results = handle;
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.ctx.config
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.strategy.algorithm_name()
    }

    /// The index of `node` in samples and distributions
    pub fn node_index(&self, node: &Variable) -> Option<usize> {
        self.ctx.network.registry().index_of(node)
    }

    /// The duration of the last call to `infer`
    pub fn sampling_time(&self) -> Duration {
        self.sampling_time
    }

    /// The report of the last call to `infer`
    pub fn report(&self) -> &[String] {
        &self.ctx.report
    }


    /// See `SamplingContext::sample_forward`
    pub fn sample_forward(&mut self, node: &Variable, assignment: &[usize]) -> Option<usize> {
        self.ctx.sample_forward(node, assignment)
    }

    /// See `SamplingContext::cpt_probability`
    pub fn cpt_probability(&self, node: &Variable, assignment: &[usize]) -> Result<f64> {
        self.ctx.cpt_probability(node, assignment)
    }

    /// See `SamplingContext::add_sample`
    pub fn add_sample(&self, sample: &WeightedSample) -> Result<()> {
        self.ctx.add_sample(sample)
    }

    /// See `SamplingContext::converged`
    pub fn converged(&self) -> Result<bool> {
        self.ctx.converged()
    }


    /// Run the inference.
    ///
    /// # Returns
    /// the normalized distribution over every node
    ///
    /// # Errors
    /// * `InferenceError::MissingConfidenceLevel` if a confidence interval size threshold is set
    ///   without a confidence level. Nothing is sampled in this case.
    /// * any error of the strategy
    pub fn infer(&mut self) -> Result<SampledDistribution> {
        ///////////////////////////////////////////////////////////////////////
        // 1) check the configuration
        self.ctx.config.validate()?;
        if self.ctx.config.confidence_interval_size_threshold.is_some() && self.ctx.config.confidence_level.is_none() {
            return Err(InferenceError::MissingConfidenceLevel);
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) create the distribution
        let domain_sizes: Vec<usize> = self.ctx.network.iter().map(|(v, _)| v.cardinality()).collect();
        let mut dist = SampledDistribution::new(&domain_sizes);
        if let Some(level) = self.ctx.config.confidence_level {
            dist.set_confidence_level(level)?;
        }
        self.ctx.results.install(dist);
        self.ctx.report.clear();

        ///////////////////////////////////////////////////////////////////////
        // 3) sample
        info!("{}: drawing {} samples", self.strategy.algorithm_name(), self.ctx.config.num_samples);
        let start = Instant::now();
        let res = self.strategy.run(&mut self.ctx);
        self.sampling_time = start.elapsed();
        res?;

        for line in self.ctx.report.iter() {
            info!("{}", line);
        }
        info!("{}: sampling took {:?}", self.strategy.algorithm_name(), self.sampling_time);

        self.ctx
            .results
            .with(|dist| {
                dist.normalize();
                dist.clone()
            })
            .ok_or_else(|| InferenceError::General(String::from("no distribution installed")))
    }


    /// A snapshot of the distribution of the current run, or `None` if sampling has not started.
    /// May be called while `infer` runs on another thread, through a handle passed to
    /// `set_results_handle`.
    pub fn poll_results(&self) -> Option<SampledDistribution> {
        self.ctx.results.poll()
    }

    /// A handle to the distribution of the current run
    pub fn results_handle(&self) -> SharedDistribution {
        self.ctx.results.clone()
    }

}
