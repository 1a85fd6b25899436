//! Iterative reciprocal-best-partner assignment ("ThreshKnot").
//!
//! Each round pairs up positions whose probability is the best remaining
//! entry for *both* sides, then removes them from play and repeats. The
//! result may cross freely; helix filtering and bracket-level assignment
//! happen afterwards.

use log::warn;
use colored::Colorize;
use ndarray::Array2;
use nohash_hasher::IntSet;

use kf_structure::HelixFilter;
use kf_structure::NAIDX;
use kf_structure::Pair;
use kf_structure::PairSet;

use crate::ensure_square;
use crate::KnotError;

/// Parameters for [`threshknot`].
///
/// `theta` is the minimum probability for a pair to be considered at all;
/// `max_iter` bounds the number of accumulation rounds. One round with
/// `theta = 0` is plain ProbKnot selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreshKnotConfig {
    pub theta: f64,
    pub max_iter: usize,
    pub helix: HelixFilter,
}

impl Default for ThreshKnotConfig {
    fn default() -> Self {
        Self {
            theta: 0.3,
            max_iter: 1,
            helix: HelixFilter::new(0, 2),
        }
    }
}

/// Resolve a probability matrix into a (possibly pseudoknotted) pair set.
///
/// Rounds continue until one adds no pair (converged) or `max_iter`
/// rounds have been accumulated while more pairs remain selectable; the
/// latter is reported as a warning, never an error. Duplicate-position
/// assignments from tied probabilities are resolved towards the shorter
/// span (see [`PairSet::sanitize`]), then helices below the configured
/// length are dropped.
pub fn threshknot(bpps: &Array2<f64>, config: &ThreshKnotConfig) -> Result<PairSet, KnotError> {
    let n = ensure_square(bpps)?;

    let mut assigned: IntSet<NAIDX> = IntSet::default();
    let mut accumulated: Vec<Pair> = Vec::new();
    let mut rounds = 0;
    loop {
        let fresh = select_round(bpps, config.theta, &assigned);
        if fresh.is_empty() {
            break;
        }
        if rounds >= config.max_iter {
            warn!(
                "{} stopping after {} round(s) before convergence, {} selectable pair(s) dropped",
                "WARNING:".red(),
                config.max_iter,
                fresh.len()
            );
            break;
        }
        for pair in &fresh {
            assigned.insert(pair.i());
            assigned.insert(pair.j());
        }
        accumulated.extend(fresh);
        rounds += 1;
    }

    let set = PairSet::from_pairs(n, accumulated).sanitize();
    Ok(config.helix.filter(&set))
}

/// One reciprocal-best round over the positions not yet assigned.
///
/// The per-position maximum is taken over unassigned partners only, so
/// later rounds can recover pairs that lost their first-choice partner.
fn select_round(bpps: &Array2<f64>, theta: f64, assigned: &IntSet<NAIDX>) -> Vec<Pair> {
    let n = bpps.dim().0;

    let mut pmax = vec![f64::NEG_INFINITY; n];
    for ((i, j), &p) in bpps.indexed_iter() {
        if !assigned.contains(&(j as NAIDX)) && p > pmax[i] {
            pmax[i] = p;
        }
    }

    let mut fresh = Vec::new();
    for i in 0..n {
        if assigned.contains(&(i as NAIDX)) {
            continue;
        }
        for j in i + 1..n {
            if assigned.contains(&(j as NAIDX)) {
                continue;
            }
            let p = bpps[(i, j)];
            if p > theta && p == pmax[i] && p == pmax[j] {
                fresh.push(Pair::new(i as NAIDX, j as NAIDX));
            }
        }
    }
    fresh
}
