//! Rejection sampling: derangements for the shuffle and distinct colour picks.

use crate::shuffle::{BLOCK_COUNT, PALETTE_LEN};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

/// Draw candidates until one satisfies `accept`. Terminates with probability 1 as long
/// as `accept` holds for a non-zero share of what `draw` produces.
pub fn sample_until<R, T, D, A>(rng: &mut R, mut draw: D, accept: A) -> T
where
    R: Rng + ?Sized,
    D: FnMut(&mut R) -> T,
    A: Fn(&T) -> bool,
{
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let candidate = draw(rng);
        if accept(&candidate) {
            trace!(attempts, "sample accepted");
            return candidate;
        }
    }
}

/// True if `p` is a permutation of `0..p.len()` with no fixed point.
pub fn is_derangement(p: &[usize]) -> bool {
    let mut seen = vec![false; p.len()];
    p.iter().enumerate().all(|(i, &v)| {
        v != i && v < p.len() && !std::mem::replace(&mut seen[v], true)
    })
}

/// Random derangement of the nine grid cells: Fisher–Yates shuffle, retried while any
/// index maps to itself (about e ≈ 2.72 shuffles on average).
pub fn derangement<R: Rng + ?Sized>(rng: &mut R) -> [usize; BLOCK_COUNT] {
    sample_until(
        rng,
        |rng| {
            let mut p: [usize; BLOCK_COUNT] = std::array::from_fn(|i| i);
            p.shuffle(rng);
            p
        },
        |p| is_derangement(p),
    )
}

/// Uniform palette index that differs from `current`.
pub fn next_color_index<R: Rng + ?Sized>(rng: &mut R, current: usize) -> usize {
    sample_until(rng, |rng| rng.gen_range(0..PALETTE_LEN), |&c| c != current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_is_derangement() {
        assert!(is_derangement(&[1, 2, 0]));
        assert!(is_derangement(&[1, 0, 3, 2]));
        assert!(!is_derangement(&[0, 2, 1]));
        // not a permutation
        assert!(!is_derangement(&[1, 0, 0]));
        assert!(!is_derangement(&[1, 3, 0]));
        assert!(is_derangement(&[]));
    }

    #[test]
    fn test_thousand_derangements_have_no_fixed_point() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut distinct = HashSet::new();
        for _ in 0..1000 {
            let p = derangement(&mut rng);
            assert!(is_derangement(&p), "{:?}", p);
            let mut sorted = p;
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
            distinct.insert(p);
        }
        // 133496 derangements of 9; a thousand draws should barely repeat
        assert!(distinct.len() > 900, "only {} distinct", distinct.len());
    }

    #[test]
    fn test_derangement_reproducible_with_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(derangement(&mut a), derangement(&mut b));
            assert_eq!(next_color_index(&mut a, 3), next_color_index(&mut b, 3));
        }
    }

    #[test]
    fn test_next_color_differs_and_covers_palette() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hits = [0u32; PALETTE_LEN];
        for _ in 0..2000 {
            let c = next_color_index(&mut rng, 2);
            assert_ne!(c, 2);
            assert!(c < PALETTE_LEN);
            hits[c] += 1;
        }
        assert_eq!(hits[2], 0);
        assert!(hits.iter().enumerate().all(|(i, &n)| i == 2 || n > 0));
    }

    #[test]
    fn test_sample_until_retries() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut calls = 0;
        let v = sample_until(
            &mut rng,
            |_| {
                calls += 1;
                calls
            },
            |&n| n == 5,
        );
        assert_eq!(v, 5);
        assert_eq!(calls, 5);
    }
}
