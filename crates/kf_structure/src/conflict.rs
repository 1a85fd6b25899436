//! Partitioning of pair sets into mutually non-crossing groups.
//!
//! Crossing pairs cannot share a bracket family in text form, so the codec
//! needs a partition of the set into groups that are internally crossing
//! free. Group 0 collects every pair that crosses nothing at all; later
//! groups hold increasingly deep pseudoknot levels.

use crate::Pair;
use crate::PairSet;

/// Split a pair set into ordered, internally crossing-free groups.
///
/// Pairs are processed sorted by (i, j). The pairwise conflict relation is
/// O(n²) in the number of pairs. Group 0 holds all pairs with zero
/// conflicts (it may be empty). The rest is resolved iteratively: take the
/// first unresolved pair, exclude everything it crosses, and keep of the
/// remaining candidates those that do not cross an earlier kept candidate.
/// That last sweep is required as soon as three regions cross each other
/// simultaneously; the complement of one conflict set alone is not
/// guaranteed to be crossing-free. Every pair ends up in exactly one group.
pub fn partition(set: &PairSet) -> Vec<Vec<Pair>> {
    let pairs = set.to_vec();
    let n = pairs.len();

    let mut crossing: Vec<Vec<usize>> = vec![Vec::new(); n];
    for a in 0..n {
        for b in a + 1..n {
            if pairs[a].crosses(&pairs[b]) {
                crossing[a].push(b);
                crossing[b].push(a);
            }
        }
    }

    let mut groups: Vec<Vec<Pair>> = Vec::new();
    groups.push(
        (0..n)
            .filter(|&k| crossing[k].is_empty())
            .map(|k| pairs[k])
            .collect(),
    );

    let mut unresolved: Vec<usize> = (0..n).filter(|&k| !crossing[k].is_empty()).collect();
    let mut grouped = vec![false; n];

    while let Some(&current) = unresolved.first() {
        let in_conflict: Vec<bool> = {
            let mut flags = vec![false; n];
            for &k in &crossing[current] {
                flags[k] = true;
            }
            flags
        };

        // Candidates: unresolved pairs outside the conflict set of `current`.
        // Keep each candidate only if it does not cross an earlier keeper.
        let mut group: Vec<usize> = Vec::new();
        for &k in unresolved.iter().filter(|&&k| !in_conflict[k]) {
            if group.iter().all(|&g| !pairs[k].crosses(&pairs[g])) {
                group.push(k);
            }
        }

        for &k in &group {
            grouped[k] = true;
        }
        unresolved.retain(|&k| !grouped[k]);
        groups.push(group.into_iter().map(|k| pairs[k]).collect());
    }

    groups
}
