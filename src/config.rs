//! Parameters of the samplers.
//!
//! Both configurations can be built in code (every field has a default) or deserialized from JSON,
//! e.g. `{"num_samples": 5000, "confidence_level": 0.95}`. Unknown keys are rejected.

use util::{InferenceError, Result};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;


/// General settings of a `Sampler`
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {

    /// How many samples to draw from the distribution
    pub num_samples: usize,

    /// How many times drawing a single sample may fail before the step is skipped or the run fails
    pub max_trials: usize,

    /// Skip a step after `max_trials` failures instead of failing the run
    pub skip_failed_steps: bool,

    /// The confidence level for interval estimates. Required by
    /// `confidence_interval_size_threshold`.
    pub confidence_level: Option<f64>,

    /// Stop sampling once every query variable's confidence interval is at most this wide
    pub confidence_interval_size_threshold: Option<f64>,

    /// After how many samples to check for convergence
    pub convergence_check_interval: usize,

    /// After how many samples to log the current status
    pub info_interval: usize,

    /// Check every sample against the evidence before it is added
    pub debug: bool,

    /// Seed for the random number generator. Drawn from system entropy if absent.
    pub seed: Option<u64>

}

impl Default for SamplerConfig {

    fn default() -> Self {
        SamplerConfig {
            num_samples: 1000,
            max_trials: 5000,
            skip_failed_steps: false,
            confidence_level: None,
            confidence_interval_size_threshold: None,
            convergence_check_interval: 100,
            info_interval: 100,
            debug: false,
            seed: None
        }
    }

}

impl SamplerConfig {

    /// Parse a configuration from a JSON object. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SamplerConfig = serde_json::from_str(json)
            .map_err(|e| InferenceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are in range
    pub fn validate(&self) -> Result<()> {
        if self.max_trials == 0 {
            return Err(InferenceError::InvalidConfig(String::from("max_trials must be positive")));
        }
        if self.convergence_check_interval == 0 {
            return Err(InferenceError::InvalidConfig(String::from("convergence_check_interval must be positive")));
        }
        if self.info_interval == 0 {
            return Err(InferenceError::InvalidConfig(String::from("info_interval must be positive")));
        }
        if let Some(level) = self.confidence_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(InferenceError::InvalidConfig(format!("confidence level {} is not in (0, 1)", level)));
            }
        }
        if let Some(t) = self.confidence_interval_size_threshold {
            if !(t >= 0.0 && t <= 1.0) {
                return Err(InferenceError::InvalidConfig(format!("confidence interval size threshold {} is not in [0, 1]", t)));
            }
        }
        Ok(())
    }

    /// The random number generator for a run
    pub fn rng(&self) -> StdRng {
        make_rng(self.seed)
    }

}


/// Settings of the MC-SAT engine
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct McSatConfig {

    /// Log the size of the active constraint set on every step
    pub verbose: bool,

    /// Dump the knowledge base and every active constraint set. Implies `verbose`.
    pub debug: bool,

    /// After how many steps to log the size of the active constraint set
    pub info_interval: usize,

    /// The probability of a WalkSAT move (rather than a simulated-annealing move) in the
    /// constraint sampler
    pub p: f64,

    /// Seed for the random number generator. Drawn from system entropy if absent.
    pub seed: Option<u64>

}

impl Default for McSatConfig {

    fn default() -> Self {
        McSatConfig {
            verbose: false,
            debug: false,
            info_interval: 100,
            p: 0.5,
            seed: None
        }
    }

}

impl McSatConfig {

    /// Parse a configuration from a JSON object. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: McSatConfig = serde_json::from_str(json)
            .map_err(|e| InferenceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.info_interval == 0 {
            return Err(InferenceError::InvalidConfig(String::from("info_interval must be positive")));
        }
        if !(self.p >= 0.0 && self.p <= 1.0) {
            return Err(InferenceError::InvalidConfig(format!("p = {} is not a probability", self.p)));
        }
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        make_rng(self.seed)
    }

}


fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy()
    }
}
