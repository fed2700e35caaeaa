//! Distribution-layer behavior: structural validity of the shuffles,
//! uniformity smoke tests, and weighted-sampling frequencies.

use draupnir::{crc64, random, Error};

#[test]
fn bounded_naturals_cover_the_range_uniformly() {
    let mut sponge = crc64().build().unwrap();
    const DRAWS: usize = 1_000_000;
    let mut counts = [0u32; 10];
    for _ in 0..DRAWS {
        counts[random::natural_bounded(&mut sponge, 9) as usize] += 1;
    }
    let expected = DRAWS as f64 / 10.0;
    let chi_square: f64 = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum();
    // df = 9; a uniform source stays far below this bound, a biased
    // modulo reduction lands in the thousands.
    assert!(chi_square < 35.0, "chi-square {chi_square} too high");
}

#[test]
fn awkward_bounds_never_escape_their_range() {
    let mut sponge = crc64().build().unwrap();
    for high in [0u64, 1, 2, 6, 255, 256, (1 << 33) - 7, u64::MAX - 1] {
        for _ in 0..64 {
            assert!(random::natural_bounded(&mut sponge, high) <= high);
        }
    }
    // The degenerate bound draws raw words and must not reject at all.
    let _ = random::natural_bounded(&mut sponge, u64::MAX);
}

#[test]
fn permutations_are_bijections() {
    let mut sponge = crc64().build().unwrap();
    for size in [1usize, 2, 3, 10, 64, 257] {
        let permutation = random::permutation(&mut sponge, size);
        let mut seen = vec![false; size];
        for &value in &permutation {
            assert!(value < size);
            assert!(!seen[value], "duplicate in permutation of {size}");
            seen[value] = true;
        }
    }
}

#[test]
fn permutations_replay_after_a_reset() {
    let mut sponge = crc64().build().unwrap();
    let first = random::permutation(sponge.reset(), 10);
    let second = random::permutation(sponge.reset(), 10);
    assert_eq!(first, second);
}

#[test]
fn cycles_are_single_n_cycles() {
    let mut sponge = crc64().build().unwrap();
    for size in [2usize, 3, 10, 33] {
        let cycle = random::cycle(&mut sponge, size);
        // Follow the cycle from 0; it must return after exactly `size`
        // hops having visited everything once.
        let mut position = 0usize;
        let mut visited = vec![false; size];
        for _ in 0..size {
            assert!(!visited[position]);
            visited[position] = true;
            position = cycle[position];
        }
        assert_eq!(position, 0);
        assert!(visited.iter().all(|&v| v));
    }
}

#[test]
fn derangements_have_no_fixed_points() {
    let mut sponge = crc64().build().unwrap();
    for size in [2usize, 3, 4, 5, 12] {
        let derangement = random::derangement(&mut sponge, size).unwrap();
        for (index, &value) in derangement.iter().enumerate() {
            assert_ne!(index, value, "fixed point in derangement of {size}");
        }
    }
}

#[test]
fn uniform_samples_with_replacement_stay_in_range() {
    let mut sponge = crc64().build().unwrap();
    let sample = random::uniform_sample_with_replacement(&mut sponge, 7, 1000).unwrap();
    assert_eq!(sample.len(), 1000);
    assert!(sample.iter().all(|&v| v < 7));
}

#[test]
fn uniform_samples_without_replacement_are_subsets() {
    let mut sponge = crc64().build().unwrap();
    for (total, size) in [(10usize, 3usize), (100, 100), (1000, 1)] {
        let sample = random::uniform_sample_without_replacement(&mut sponge, total, size).unwrap();
        assert_eq!(sample.len(), size);
        let mut sorted = sample.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), size, "duplicates in {size} of {total}");
        assert!(sorted.iter().all(|&v| v < total));
    }
}

#[test]
fn reservoir_membership_is_roughly_uniform() {
    let mut sponge = crc64().build().unwrap();
    let mut hits = [0u32; 20];
    for _ in 0..2000 {
        for v in random::uniform_sample_without_replacement(&mut sponge, 20, 5).unwrap() {
            hits[v] += 1;
        }
    }
    // Each element belongs to the sample with probability 1/4.
    for (element, &count) in hits.iter().enumerate() {
        assert!(
            (380..=620).contains(&count),
            "element {element} sampled {count} times"
        );
    }
}

#[test]
fn vose_frequencies_match_the_weights() {
    let mut sponge = crc64().build().unwrap();
    const DRAWS: usize = 100_000;
    let sample = random::non_uniform_sample_with_replacement(&mut sponge, &[1, 3, 6], DRAWS).unwrap();
    let mut counts = [0usize; 3];
    for value in sample {
        counts[value] += 1;
    }
    let frequencies: Vec<f64> = counts.iter().map(|&c| c as f64 / DRAWS as f64).collect();
    for (frequency, expected) in frequencies.iter().zip([0.1, 0.3, 0.6]) {
        assert!(
            (frequency - expected).abs() < 0.015,
            "frequency {frequency} far from {expected}"
        );
    }
}

#[test]
fn chao_samples_favor_heavy_parts() {
    let mut sponge = crc64().build().unwrap();
    let parts = [1u64, 1, 1, 1, 50, 50];
    let mut heavy_hits = 0usize;
    for _ in 0..500 {
        let sample = random::non_uniform_sample_without_replacement(&mut sponge, &parts, 2).unwrap();
        assert_eq!(sample.len(), 2);
        let mut sorted = sample.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 2);
        heavy_hits += sample.iter().filter(|&&v| v >= 4).count();
    }
    // The two heavy parts carry ~96% of the weight; they must dominate.
    assert!(heavy_hits > 600, "heavy parts hit only {heavy_hits} times");
}

#[test]
fn distributions_are_deterministic_given_the_sponge_state() {
    let mut first = crc64().build().unwrap();
    let mut second = crc64().build().unwrap();
    assert_eq!(
        random::non_uniform_sample_with_replacement(&mut first, &[2, 5, 13], 50).unwrap(),
        random::non_uniform_sample_with_replacement(&mut second, &[2, 5, 13], 50).unwrap()
    );
    assert_eq!(
        random::cycle(&mut first, 17),
        random::cycle(&mut second, 17)
    );
}

#[test]
fn bounds_errors_cover_the_taxonomy() {
    let mut sponge = crc64().build().unwrap();
    assert!(matches!(
        random::uniform_sample_without_replacement(&mut sponge, 3, 4),
        Err(Error::SampleExceedsPopulation { size: 4, total: 3 })
    ));
    assert!(matches!(
        random::uniform_sample_with_replacement(&mut sponge, 5, 0),
        Err(Error::ZeroSampleSize)
    ));
    assert!(matches!(
        random::non_uniform_sample_without_replacement(&mut sponge, &[1, 2], 3),
        Err(Error::SampleExceedsPopulation { size: 3, total: 2 })
    ));
    assert!(matches!(
        random::non_uniform_sample_with_replacement(&mut sponge, &[], 10),
        Err(Error::EmptyParts)
    ));
    assert!(matches!(
        random::derangement(&mut sponge, 1),
        Err(Error::NoDerangement)
    ));
}
