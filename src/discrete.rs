//! Sampling of an index from an unnormalized, discrete distribution.
//!
//! All functions consume exactly one uniform draw `u ~ U(0, S)`, where `S` is either the sum of
//! the weights or a normalizing constant supplied by the caller, and return the first index whose
//! running sum reaches `u`. A distribution that cannot be sampled (`S == 0`, or a walk that runs
//! out of entries because of rounding at the boundary) yields `None`. This is not an error: the
//! caller decides whether to retry, skip or give up.

use rand::Rng;


/// Sample from a distribution whose normalization constant is not known.
///
/// # Args
/// * `weights`: the non-negative, unnormalized weights
/// * `rng`: the source of randomness
///
/// # Returns
/// the index of the value that was sampled, or `None` if the distribution is not well-defined
pub fn sample<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let sum: f64 = weights.iter().sum();
    sample_with_sum(weights, sum, rng)
}


/// Sample from the given distribution.
///
/// # Args
/// * `weights`: the non-negative, unnormalized weights
/// * `sum`: the distribution's normalization constant
/// * `rng`: the source of randomness
///
/// # Returns
/// the index of the value that was sampled, or `None` if the distribution is not well-defined
pub fn sample_with_sum<R: Rng + ?Sized>(weights: &[f64], sum: f64, rng: &mut R) -> Option<usize> {
    sample_iter_with_sum(weights.iter().cloned(), sum, rng)
}


/// Sample from a sequence of weights that can be traversed twice, but not indexed. The first
/// pass computes the normalization constant.
pub fn sample_iter<I, R>(weights: I, rng: &mut R) -> Option<usize>
    where I: IntoIterator<Item = f64> + Clone,
          R: Rng + ?Sized
{
    let sum: f64 = weights.clone().into_iter().sum();
    sample_iter_with_sum(weights, sum, rng)
}


/// Sample from a one-pass sequence of weights whose normalization constant is already known.
pub fn sample_iter_with_sum<I, R>(weights: I, sum: f64, rng: &mut R) -> Option<usize>
    where I: IntoIterator<Item = f64>,
          R: Rng + ?Sized
{
    let u = rng.gen::<f64>() * sum;
    if !(sum > 0.0) || !sum.is_finite() {
        return None;
    }

    locate(weights, u)
}


/// Walk the weights, accumulating a running sum, and return the first index whose running sum is
/// at least `u`.
///
/// Entries with zero weight are never selected, so a draw of exactly `u = 0` still yields a
/// possible outcome.
pub fn locate<I>(weights: I, u: f64) -> Option<usize>
    where I: IntoIterator<Item = f64>
{
    let mut running = 0.0;

    for (i, w) in weights.into_iter().enumerate() {
        debug_assert!(w >= 0.0, "negative weight {} at index {}", w, i);

        running += w;
        if w > 0.0 && running >= u {
            return Some(i);
        }
    }

    None
}
