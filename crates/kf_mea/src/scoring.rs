//! Accuracy metrics for predicted structures.
//!
//! Two flavours: expected-value scores straight against a probability
//! matrix, and hard confusion-matrix scores against a ground-truth
//! structure. Both read only the upper triangle (diagonal included) and
//! never divide by zero; the expected scores use a fixed epsilon
//! regularizer, the ground-truth scores use documented edge-case
//! defaults instead.

use ndarray::Array2;
use serde::Deserialize;
use serde::Serialize;

use kf_structure::PairSet;
use kf_structure::StructureError;

use crate::ensure_square;
use crate::MeaError;

/// Additive regularizer for the expected-value confusion terms.
const REGULARIZER: f64 = 1e-6;

/// Sensitivity, positive predictive value, Matthews correlation and
/// F1 for one predicted structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub sensitivity: f64,
    pub ppv: f64,
    pub mcc: f64,
    pub f1: f64,
}

/// Symmetric 0/1 indicator matrix for a pair set.
pub fn pair_matrix(pairs: &PairSet) -> Array2<f64> {
    let n = pairs.length();
    let mut m = Array2::from_elem((n, n), 0.0);
    for pair in pairs.iter() {
        m[(pair.i() as usize, pair.j() as usize)] = 1.0;
        m[(pair.j() as usize, pair.i() as usize)] = 1.0;
    }
    m
}

/// Indicator matrix straight from bracket notation, for reference
/// structures that arrive as text.
pub fn dotbracket_matrix(s: &str, allow_pseudoknots: bool) -> Result<Array2<f64>, StructureError> {
    Ok(pair_matrix(&PairSet::from_dotbracket(s, allow_pseudoknots)?))
}

fn ensure_same_shape(pred: &Array2<f64>, reference: &Array2<f64>) -> Result<usize, MeaError> {
    let n = ensure_square(pred)?;
    ensure_square(reference)?;
    if pred.dim() != reference.dim() {
        return Err(MeaError::ShapeMismatch {
            expected: pred.dim(),
            found: reference.dim(),
        });
    }
    Ok(n)
}

/// Expected confusion scores of a 0/1 prediction against the probability
/// matrix it was derived from.
///
/// The compatible-false-positive credit is a placeholder constant in this
/// mode; only the ground-truth scorer can tell which false positives are
/// truly unconstrained.
pub fn score_expected(
    pred: &Array2<f64>,
    bpps: &Array2<f64>,
) -> Result<AccuracyReport, MeaError> {
    let n = ensure_same_shape(pred, bpps)?;

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut fnp = 0.0;
    for i in 0..n {
        for j in i..n {
            let p = pred[(i, j)];
            let q = bpps[(i, j)];
            tp += p * q;
            fp += p * (1.0 - q);
            fnp += (1.0 - p) * q;
        }
    }
    let cells = (n * (n + 1) / 2) as f64;
    let tn = cells - tp - fp - fnp + REGULARIZER;
    let tp = tp + REGULARIZER;
    let fp = fp + REGULARIZER;
    let fnp = fnp + REGULARIZER;
    let cfp = REGULARIZER;

    let sensitivity = tp / (tp + fnp);
    let ppv = tp / (tp + fp - cfp);
    let mcc = (tp * tn - (fp - cfp) * fnp)
        / ((tp + fp - cfp) * (tp + fnp) * (tn + fp - cfp) * (tn + fnp)).sqrt();
    let f1 = 2.0 * tp / (2.0 * tp + fp - cfp + fnp);

    Ok(AccuracyReport { sensitivity, ppv, mcc, f1 })
}

/// Hard confusion scores of a 0/1 prediction against a 0/1 reference.
///
/// A false positive (i, j) counts as *compatible*, and is excluded from
/// the FP penalty, exactly when neither i nor j participates in any true
/// pair. Degenerate denominators resolve to the documented defaults:
/// sensitivity and PPV to 1, the Matthews correlation to its raw
/// numerator, F1 to 0.
pub fn score_ground_truth(
    pred: &Array2<f64>,
    truth: &Array2<f64>,
) -> Result<AccuracyReport, MeaError> {
    let n = ensure_same_shape(pred, truth)?;

    // Positions constrained by the reference, read from both triangles so
    // upper-only and symmetric conventions are treated alike.
    let mut constrained = vec![false; n];
    for ((i, j), &t) in truth.indexed_iter() {
        if t != 0.0 {
            constrained[i] = true;
            constrained[j] = true;
        }
    }

    let mut tp = 0.0_f64;
    let mut tn = 0.0_f64;
    let mut fp = 0.0_f64;
    let mut fnp = 0.0_f64;
    let mut cfp = 0.0_f64;
    for i in 0..n {
        for j in i..n {
            let t = truth[(i, j)] != 0.0;
            let p = pred[(i, j)] != 0.0;
            match (t, p) {
                (true, true) => tp += 1.0,
                (true, false) => fnp += 1.0,
                (false, false) => tn += 1.0,
                (false, true) => {
                    fp += 1.0;
                    if !constrained[i] && !constrained[j] {
                        cfp += 1.0;
                    }
                }
            }
        }
    }

    let sensitivity = if tp + fnp == 0.0 { 1.0 } else { tp / (tp + fnp) };
    let ppv = if tp + fp - cfp == 0.0 { 1.0 } else { tp / (tp + fp - cfp) };

    let mcc_num = tp * tn - (fp - cfp) * fnp;
    let mcc_den = ((tp + fp - cfp) * (tp + fnp) * (tn + fp - cfp) * (tn + fnp)).sqrt();
    let mcc = if mcc_den == 0.0 { mcc_num } else { mcc_num / mcc_den };

    let f1 = if ppv + sensitivity == 0.0 {
        0.0
    } else {
        2.0 * ppv * sensitivity / (ppv + sensitivity)
    };

    Ok(AccuracyReport { sensitivity, ppv, mcc, f1 })
}
