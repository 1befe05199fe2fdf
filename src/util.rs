//! Defines the `Error` type for the mcinfer library

use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, InferenceError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum InferenceError {

    /// The constraint sampler could not find a state satisfying the active constraints. For the
    /// warm start of MC-SAT this means the hard constraints are (very likely) jointly
    /// unsatisfiable.
    #[error("Unable to satisfy {constraints} constraints after {flips} flips")]
    Unsatisfiable { constraints: usize, flips: usize },

    /// A sample was added to a distribution although it contradicts the evidence
    #[error("Attempted to add sample to distribution that does not respect evidence (node {node}: expected {expected}, got {actual})")]
    EvidenceViolation { node: usize, expected: usize, actual: usize },

    /// An evidence vector did not cover exactly the registered nodes
    #[error("Evidence has {actual} entries, but the network has {expected} nodes")]
    EvidenceLength { expected: usize, actual: usize },

    /// A domain index that is not part of the node's domain
    #[error("Domain index {value} is out of range for node {node} with {cardinality} values")]
    InvalidDomainIndex { node: usize, value: usize, cardinality: usize },

    /// Sampling failed repeatedly and skipping failed steps was not permitted
    #[error("Could not draw a sample consistent with the evidence after {0} trials")]
    MaxTrialsExceeded(usize),

    /// A convergence threshold was configured but the distribution cannot compute intervals
    #[error("Cannot determine convergence based on confidence interval size: No confidence level specified")]
    MissingConfidenceLevel,

    /// A formula weight that cannot be turned into an inclusion probability
    #[error("Invalid weight {weight} for formula {formula}")]
    InvalidWeight { formula: String, weight: f64 },

    /// Represents an error where a certain constraint on a scope was not satisfied
    #[error("Provided scope did not satisfy constraints")]
    InvalidScope,

    /// Represents an error where there was a parent variable expected, but not found
    #[error("Missing a parent from the network")]
    MissingParent,

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("A variable was encountered twice")]
    DuplicateVariable,

    /// Represents an attempt to initialize a variable with an incompatible `Initialization`
    #[error("An invalid initialization was provided")]
    InvalidInitialization,

    /// Represents a table that does not hold a conditional probability distribution
    #[error("Requires a conditional probability table: {0}")]
    NotACpt(String),

    /// A variable that is not part of the network
    #[error("Unknown node")]
    UnknownNode,

    /// An atom index or name that is not part of the world variables
    #[error("Unknown ground atom {0}")]
    UnknownAtom(String),

    /// Exhaustive enumeration was requested for a problem that is too large
    #[error("Cannot enumerate {atoms} free atoms (limit is {limit})")]
    TooManyAtoms { atoms: usize, limit: usize },

    /// A configuration value was out of range or could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A general error with the given description
    #[error("{0}")]
    General(String)

}
