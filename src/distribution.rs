//! Defines the `SampledDistribution`, an accumulator of weighted samples that yields estimates of
//! the marginal distribution of every variable, and the `SharedDistribution` handle through which
//! a running inference publishes its intermediate results.

use logic::PossibleWorld;
use samplers::WeightedSample;
use util::{InferenceError, Result};

use statrs::distribution::{ContinuousCDF, Normal};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};


/// A closed interval `[lower, upper]` around a probability estimate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64
}

impl ConfidenceInterval {

    /// The width of the interval
    pub fn size(&self) -> f64 {
        self.upper - self.lower
    }

}


/// Accumulated sample weight per variable and domain value.
///
/// For every variable ```i``` and value ```v```, ```values[i][v]``` holds the total weight of all
/// samples in which ```i = v```, and ```z``` holds the total weight of all samples. After
/// `normalize`, each entry is the estimated marginal probability ```P(i = v)``` and ```z = 1```.
///
/// Boolean variables (ground atoms) have two values, `false` (0) and `true` (1).
#[derive(Clone, Debug)]
pub struct SampledDistribution {

    /// Accumulated weight, indexed by variable and domain value
    values: Vec<Vec<f64>>,

    /// The normalizing constant - the total weight of all samples
    z: f64,

    /// The sum of squared sample weights, for the effective sample size
    z_squared: f64,

    /// The number of samples added
    num_samples: usize,

    /// The confidence level for interval estimates, if any
    confidence_level: Option<f64>,

    /// The standard normal quantile matching `confidence_level`
    quantile: f64

}

impl SampledDistribution {

    /// Construct an empty distribution over variables with the given domain sizes
    pub fn new(domain_sizes: &[usize]) -> Self {
        SampledDistribution {
            values: domain_sizes.iter().map(|&n| vec![0.0; n]).collect(),
            z: 0.0,
            z_squared: 0.0,
            num_samples: 0,
            confidence_level: None,
            quantile: 0.0
        }
    }

    /// Construct an empty distribution over `n` boolean variables
    pub fn boolean(n: usize) -> Self {
        SampledDistribution::new(&vec![2; n])
    }


    /// Enable confidence interval computation.
    ///
    /// # Args
    /// * `level`: the confidence level, e.g. `0.95`
    ///
    /// # Errors
    /// * `InferenceError::InvalidConfig` if `level` is not in `(0, 1)`
    pub fn set_confidence_level(&mut self, level: f64) -> Result<()> {
        if !(level > 0.0 && level < 1.0) {
            return Err(InferenceError::InvalidConfig(format!("confidence level {} is not in (0, 1)", level)));
        }

        let normal = Normal::new(0.0, 1.0).map_err(|e| InferenceError::General(e.to_string()))?;
        self.quantile = normal.inverse_cdf(0.5 + level / 2.0);
        self.confidence_level = Some(level);
        Ok(())
    }

    pub fn confidence_level(&self) -> Option<f64> {
        self.confidence_level
    }

    /// `true` if a confidence level has been set
    pub fn uses_confidence_computation(&self) -> bool {
        self.confidence_level.is_some()
    }


    /// Add a sample, given as the domain index of every variable, with the given weight
    pub fn add_assignment(&mut self, domain_indices: &[usize], weight: f64) {
        debug_assert_eq!(domain_indices.len(), self.values.len());

        for (i, &v) in domain_indices.iter().enumerate() {
            self.values[i][v] += weight;
        }
        self.record(weight);
    }

    /// Add a weighted sample
    pub fn add_sample(&mut self, sample: &WeightedSample) {
        self.add_assignment(&sample.node_domain_indices, sample.weight);
    }

    /// Add a possible world with the given weight. Every variable must be boolean.
    pub fn add_world(&mut self, world: &PossibleWorld, weight: f64) {
        debug_assert_eq!(world.len(), self.values.len());

        for (i, &v) in world.values().iter().enumerate() {
            self.values[i][v as usize] += weight;
        }
        self.record(weight);
    }

    fn record(&mut self, weight: f64) {
        self.z += weight;
        self.z_squared += weight * weight;
        self.num_samples += 1;
    }


    /// Divide every accumulated weight by the normalizing constant and set it to 1.
    ///
    /// Calling this a second time has no effect. An empty distribution is left unchanged.
    pub fn normalize(&mut self) {
        if self.z == 0.0 || self.z == 1.0 {
            return;
        }

        let z = self.z;
        for dist in self.values.iter_mut() {
            for p in dist.iter_mut() {
                *p /= z;
            }
        }
        self.z_squared /= z * z;
        self.z = 1.0;
    }


    /// The current value for the `true` value (domain index 1) of a boolean variable. This is
    /// the estimated marginal probability only after `normalize` has been called.
    pub fn get_result(&self, var: usize) -> f64 {
        self.values[var][1]
    }

    /// The current value for ```var = value```
    pub fn get(&self, var: usize, value: usize) -> f64 {
        self.values[var][value]
    }

    /// The estimated probability ```P(var = value)```, whether or not the distribution has been
    /// normalized. `None` if no samples have been added.
    pub fn probability(&self, var: usize, value: usize) -> Option<f64> {
        if self.z > 0.0 {
            Some(self.values[var][value] / self.z)
        } else {
            None
        }
    }

    /// The estimated marginal distribution of a variable
    pub fn distribution(&self, var: usize) -> Vec<f64> {
        if self.z > 0.0 {
            self.values[var].iter().map(|v| v / self.z).collect()
        } else {
            vec![0.0; self.values[var].len()]
        }
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn domain_size(&self, var: usize) -> usize {
        self.values[var].len()
    }

    /// Kish's effective sample size ```(sum w)^2 / sum w^2```. Equals `num_samples` for
    /// unweighted samples.
    pub fn effective_sample_size(&self) -> f64 {
        if self.z_squared > 0.0 {
            self.z * self.z / self.z_squared
        } else {
            0.0
        }
    }


    /// The Wilson score interval for ```P(var = value)``` at the configured confidence level.
    ///
    /// # Errors
    /// * `InferenceError::MissingConfidenceLevel` if no confidence level has been set
    pub fn confidence_interval(&self, var: usize, value: usize) -> Result<ConfidenceInterval> {
        if self.confidence_level.is_none() {
            return Err(InferenceError::MissingConfidenceLevel);
        }

        let n = self.effective_sample_size();
        let p = match self.probability(var, value) {
            Some(p) if n > 0.0 => p,
            _ => return Ok(ConfidenceInterval { lower: 0.0, upper: 1.0 })
        };

        let q = self.quantile;
        let q2n = q * q / n;
        let center = (p + q2n / 2.0) / (1.0 + q2n);
        let half = q / (1.0 + q2n) * (p * (1.0 - p) / n + q2n / (4.0 * n)).sqrt();

        Ok(ConfidenceInterval {
            lower: (center - half).max(0.0),
            upper: (center + half).min(1.0)
        })
    }

}


/// A thread-safe handle to the distribution of a running inference.
///
/// The sampling thread adds samples through the handle while a monitoring thread may `poll` a deep
/// copy at any time. Both take the same lock, so a snapshot never observes a partially added
/// sample. The handle also carries a cooperative cancellation flag that sampling loops check
/// between steps.
#[derive(Clone, Debug, Default)]
pub struct SharedDistribution {
    inner: Arc<Mutex<Option<SampledDistribution>>>,
    cancelled: Arc<AtomicBool>
}

impl SharedDistribution {

    pub fn new() -> Self {
        SharedDistribution::default()
    }

    fn lock(&self) -> MutexGuard<Option<SampledDistribution>> {
        // samples are added in a single call, so a poisoned lock still guards a whole sample
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the current distribution, e.g. at the start of a run
    pub fn install(&self, dist: SampledDistribution) {
        *self.lock() = Some(dist);
    }

    /// Apply `f` to the distribution under the lock. `None` if no distribution is installed.
    pub fn with<T, F>(&self, f: F) -> Option<T>
        where F: FnOnce(&mut SampledDistribution) -> T
    {
        self.lock().as_mut().map(f)
    }

    /// A deep copy of the current distribution, or `None` if sampling has not started
    pub fn poll(&self) -> Option<SampledDistribution> {
        self.lock().clone()
    }

    /// Request cooperative cancellation of the run using this handle
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation request
    pub fn reset_cancellation(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

}
