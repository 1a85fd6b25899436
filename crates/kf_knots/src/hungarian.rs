//! Global-assignment pseudoknot resolution ("Hungarian").
//!
//! Builds an augmented scoring matrix (optionally with synthetic
//! self-pairs standing in for "stays unpaired"), pushes it through a
//! stack of optional transforms, and solves one global maximum-weight
//! matching so that every position receives exactly one partner.

use ndarray::Array2;

use kf_structure::HelixFilter;
use kf_structure::NAIDX;
use kf_structure::Pair;
use kf_structure::PairSet;

use crate::assignment;
use crate::ensure_square;
use crate::KnotError;

/// Large finite stand-in for ±infinity after the log transform.
const LOG_SENTINEL: f64 = 1e10;

/// Parameters for [`hungarian`].
///
/// `theta` filters the *original* probabilities after the assignment;
/// the prior thresholds, the power/log transforms and the sigmoid act on
/// the scoring matrix before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HungarianConfig {
    pub theta: f64,
    pub add_p_unpaired: bool,
    pub prob_to_0_threshold: f64,
    pub prob_to_1_threshold: f64,
    pub exp: f64,
    pub ln: bool,
    pub sigmoid_slope_factor: Option<f64>,
    pub helix: HelixFilter,
}

impl Default for HungarianConfig {
    fn default() -> Self {
        Self {
            theta: 0.0,
            add_p_unpaired: true,
            prob_to_0_threshold: 0.0,
            prob_to_1_threshold: 1.0,
            exp: 1.0,
            ln: false,
            sigmoid_slope_factor: None,
            helix: HelixFilter::new(0, 2),
        }
    }
}

/// Resolve a probability matrix through one global assignment.
///
/// Each position is matched to exactly one partner; with
/// `add_p_unpaired`, matching a position to itself means leaving it
/// unpaired, weighted by one minus its row sum. Of the matching, only
/// pairs (i, j) with i < j whose untransformed probability exceeds
/// `theta` survive; symmetric ties can still hand one position two
/// partners, which [`PairSet::sanitize`] resolves before the helix
/// filter runs.
pub fn hungarian(bpps: &Array2<f64>, config: &HungarianConfig) -> Result<PairSet, KnotError> {
    let n = ensure_square(bpps)?;
    if n == 0 {
        return Ok(PairSet::new(0));
    }

    let mut scores = bpps.clone();
    if config.add_p_unpaired {
        for i in 0..n {
            scores[(i, i)] = 1.0 - bpps.row(i).sum();
        }
    }

    scores.mapv_inplace(|x| if x < config.prob_to_0_threshold { 0.0 } else { x });
    scores.mapv_inplace(|x| if x > config.prob_to_1_threshold { 1.0 } else { x });
    scores.mapv_inplace(|x| x.powf(config.exp));
    if config.ln {
        scores.mapv_inplace(f64::ln);
    }
    scores.mapv_inplace(|x| {
        if x == f64::NEG_INFINITY {
            -LOG_SENTINEL
        } else if x == f64::INFINITY {
            LOG_SENTINEL
        } else {
            x
        }
    });
    if let Some(slope) = config.sigmoid_slope_factor {
        if scores.iter().any(|&x| x != 0.0) {
            sigmoid_rescale(&mut scores, slope);
        }
    }

    let cost = scores.mapv(|x| -x);
    let partner = assignment(&cost);

    let selected = partner.iter().enumerate().filter_map(|(i, &j)| {
        (i < j && bpps[(i, j)] > config.theta).then(|| Pair::new(i as NAIDX, j as NAIDX))
    });
    let set = PairSet::from_pairs(n, selected).sanitize();
    Ok(config.helix.filter(&set))
}

/// Rescale to [−1, 1], then squash through a slope-adjusted logistic.
fn sigmoid_rescale(scores: &mut Array2<f64>, slope: f64) {
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    scores.mapv_inplace(|x| {
        let y = (x - min) * 2.0 / (max - min + 1e-6) - 1.0;
        1.0 / (1.0 + (-y / slope).exp())
    });
}
