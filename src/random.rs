//! Random distributions driven by a sponge.
//!
//! Every routine draws bytes through [`SpongeInterface::squeeze`] and
//! treats the sponge as its sole, opaque entropy source, so any two
//! sponges with identical histories produce identical samples. Bounded
//! draws use rejection sampling to stay exactly uniform; the structured
//! generators are Fisher-Yates, Sattolo, reservoir sampling, the Vose
//! alias method, and Chao's weighted reservoir.

use crate::errors::Error;
use crate::sponge::SpongeInterface;

/// Draws `n_bits` random bits (at most 64), packed into the low end of
/// the result.
///
/// Whole bytes are squeezed MSB-first and the excess high bits masked
/// away.
pub fn natural_bits<S: SpongeInterface>(sponge: &mut S, n_bits: u32) -> u64 {
    let n_bits = n_bits.min(64);
    let mut result = 0u64;
    for _ in 0..n_bits.div_ceil(8) {
        result = (result << 8) | sponge.squeeze() as u64;
    }
    if n_bits == 0 || n_bits == 64 {
        result
    } else {
        result & ((1u64 << n_bits) - 1)
    }
}

/// Draws a raw uniform 64-bit natural.
pub fn natural<S: SpongeInterface>(sponge: &mut S) -> u64 {
    natural_bits(sponge, 64)
}

/// Draws a uniform natural in `[0, high]`.
///
/// Draws outside the largest multiple of `high + 1` are rejected and
/// redrawn, so the reduction carries no modulo bias.
pub fn natural_bounded<S: SpongeInterface>(sponge: &mut S, high: u64) -> u64 {
    let mut result = natural(sponge);
    if high != u64::MAX {
        let delta = high + 1;
        let limit = u64::MAX - (u64::MAX % delta);
        while result >= limit {
            result = natural(sponge);
        }
        result %= delta;
    }
    result
}

/// Draws a uniform real in `[0, 1]`.
///
/// The draw is divided by 2⁶⁴−1, so the upper endpoint is attainable;
/// callers needing a half-open interval must reject it themselves.
pub fn real<S: SpongeInterface>(sponge: &mut S) -> f64 {
    natural(sponge) as f64 / u64::MAX as f64
}

/// Generates a uniform random permutation of `[0, size)` by
/// Fisher-Yates shuffling.
pub fn permutation<S: SpongeInterface>(sponge: &mut S, size: usize) -> Vec<usize> {
    let mut result = vec![0usize; size];
    for i in 0..size {
        let j = natural_bounded(sponge, i as u64) as usize;
        if j != i {
            result[i] = result[j];
        }
        result[j] = i;
    }
    result
}

/// Generates a uniform random cyclic permutation of `[0, size)` by
/// Sattolo's shuffle.
pub fn cycle<S: SpongeInterface>(sponge: &mut S, size: usize) -> Vec<usize> {
    let mut result = vec![0usize; size];
    for i in 1..size {
        // Drawing strictly below i keeps the permutation a single cycle.
        let j = natural_bounded(sponge, (i - 1) as u64) as usize;
        result[i] = result[j];
        result[j] = i;
    }
    result
}

/// Generates a uniform random derangement of `[0, size)` by rejecting
/// permutations with fixed points.
///
/// # Errors
///
/// A single element cannot be deranged; `size == 1` is rejected rather
/// than resampled forever.
pub fn derangement<S: SpongeInterface>(sponge: &mut S, size: usize) -> Result<Vec<usize>, Error> {
    if size == 1 {
        return Err(Error::NoDerangement);
    }
    let mut result = permutation(sponge, size);
    while result.iter().enumerate().any(|(i, &x)| x == i) {
        result = permutation(sponge, size);
    }
    Ok(result)
}

/// Samples `size` elements of `[0, total)` uniformly, with replacement.
pub fn uniform_sample_with_replacement<S: SpongeInterface>(
    sponge: &mut S,
    total: usize,
    size: usize,
) -> Result<Vec<usize>, Error> {
    if total == 0 {
        return Err(Error::EmptyPopulation);
    }
    if size == 0 {
        return Err(Error::ZeroSampleSize);
    }
    let mut result = vec![0usize; size];
    for slot in result.iter_mut() {
        *slot = natural_bounded(sponge, (total - 1) as u64) as usize;
    }
    Ok(result)
}

/// Samples a uniform `size`-subset of `[0, total)` by reservoir
/// sampling, returned as an unordered list.
pub fn uniform_sample_without_replacement<S: SpongeInterface>(
    sponge: &mut S,
    total: usize,
    size: usize,
) -> Result<Vec<usize>, Error> {
    if size == 0 {
        return Err(Error::ZeroSampleSize);
    }
    if size > total {
        return Err(Error::SampleExceedsPopulation { size, total });
    }
    let mut result: Vec<usize> = (0..size).collect();
    for i in size..total {
        let j = natural_bounded(sponge, i as u64) as usize;
        if j < size {
            result[j] = i;
        }
    }
    Ok(result)
}

/// Samples `size` part indices with replacement, weighted by `parts`,
/// using the Vose alias method.
///
/// Preprocessing builds the probability and alias columns in O(k) with
/// the usual large/small worklists; each sample then costs one column
/// draw and one weighted coin.
pub fn non_uniform_sample_with_replacement<S: SpongeInterface>(
    sponge: &mut S,
    parts: &[u64],
    size: usize,
) -> Result<Vec<usize>, Error> {
    let (probability, alias) = vose_columns(parts)?;
    if size == 0 {
        return Err(Error::ZeroSampleSize);
    }

    let count = parts.len();
    let mut result = vec![0usize; size];
    for slot in result.iter_mut() {
        let column = natural_bounded(sponge, (count - 1) as u64) as usize;
        *slot = if real(sponge) < probability[column] {
            column
        } else {
            alias[column]
        };
    }
    Ok(result)
}

/// Samples a `size`-subset of part indices, weighted by `parts`, using
/// Chao's one-pass weighted reservoir.
pub fn non_uniform_sample_without_replacement<S: SpongeInterface>(
    sponge: &mut S,
    parts: &[u64],
    size: usize,
) -> Result<Vec<usize>, Error> {
    if parts.is_empty() {
        return Err(Error::EmptyParts);
    }
    if parts.iter().all(|&weight| weight == 0) {
        return Err(Error::ZeroTotalWeight);
    }
    if size == 0 {
        return Err(Error::ZeroSampleSize);
    }
    if size > parts.len() {
        return Err(Error::SampleExceedsPopulation {
            size,
            total: parts.len(),
        });
    }

    let mut result: Vec<usize> = (0..size).collect();
    let mut total_so_far: u64 = parts[..size].iter().sum();
    for (j, &weight) in parts.iter().enumerate().skip(size) {
        if total_so_far as f64 * real(sponge) <= weight as f64 {
            let slot = natural_bounded(sponge, (size - 1) as u64) as usize;
            result[slot] = j;
        }
        total_so_far += weight;
    }
    Ok(result)
}

/// Builds the Vose probability and alias columns for `parts`.
fn vose_columns(parts: &[u64]) -> Result<(Vec<f64>, Vec<usize>), Error> {
    if parts.is_empty() {
        return Err(Error::EmptyParts);
    }
    let total: u64 = parts.iter().sum();
    if total == 0 {
        return Err(Error::ZeroTotalWeight);
    }

    let count = parts.len();
    let mut scaled: Vec<f64> = parts
        .iter()
        .map(|&weight| weight as f64 * count as f64 / total as f64)
        .collect();
    let mut probability = vec![1.0f64; count];
    let mut alias: Vec<usize> = (0..count).collect();

    let mut small: Vec<usize> = Vec::new();
    let mut large: Vec<usize> = Vec::new();
    for (index, &p) in scaled.iter().enumerate() {
        if p < 1.0 {
            small.push(index);
        } else {
            large.push(index);
        }
    }

    while let (Some(&light), Some(&heavy)) = (small.last(), large.last()) {
        small.pop();
        large.pop();
        probability[light] = scaled[light];
        alias[light] = heavy;
        scaled[heavy] = (scaled[heavy] + scaled[light]) - 1.0;
        if scaled[heavy] < 1.0 {
            small.push(heavy);
        } else {
            large.push(heavy);
        }
    }
    // Whatever remains on either worklist has probability one.

    Ok((probability, alias))
}
