//! Monte Carlo inference for weighted knowledge bases and belief networks.
//!
//! * `mcsat`: the MC-SAT slice sampler over the worlds of a weighted clausal knowledge base,
//!   driven by a `sat::ConstraintSampler`
//! * `samplers`: a generic driver for sampling belief networks from their conditional probability
//!   tables, with forward sampling and likelihood weighting as strategies
//! * `distribution`: the weighted accumulator both of them fill in
//! * `time_limited`: run either of them under a deadline

extern crate bidir_map;
extern crate crossbeam_channel;
extern crate indexmap;
extern crate itertools;
extern crate ndarray;
extern crate ndarray_rand;
extern crate rand;
extern crate serde;
extern crate serde_json;
extern crate statrs;
extern crate thiserror;
#[macro_use]
extern crate tracing;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod bayesnet;
pub mod config;
pub mod cpt;
pub mod discrete;
pub mod distribution;
pub mod init;
pub mod logic;
pub mod mcsat;
pub mod samplers;
pub mod sat;
pub mod time_limited;
pub mod util;
pub mod variable;

pub use bayesnet::{BeliefNetwork, BeliefNetworkBuilder};
pub use config::{McSatConfig, SamplerConfig};
pub use distribution::{SampledDistribution, SharedDistribution};
pub use mcsat::McSat;
pub use samplers::{Sampler, WeightedSample};
pub use util::{InferenceError, Result};
pub use variable::Variable;
