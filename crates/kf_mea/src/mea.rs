//! Gamma-weighted maximum expected accuracy folding.
//!
//! Fills an interval DP table over a base-pairing probability matrix and
//! reads one representative structure back out of it. Besides the
//! deterministic fill there is a stochastic variant that samples among
//! the recurrence options, and a greedy reciprocal-best-partner mode that
//! skips the DP entirely.

use ndarray::Array2;
use rand::Rng;

use kf_structure::NAIDX;
use kf_structure::Pair;
use kf_structure::PairSet;

use crate::ensure_square;
use crate::MeaError;

/// Options of the MEA recurrence, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trace {
    FivePrime,
    ThreePrime,
    Paired,
    Split,
}

const TRACES: [Trace; 4] = [Trace::FivePrime, Trace::ThreePrime, Trace::Paired, Trace::Split];

/// Parameters of the MEA recurrence.
///
/// `gamma` trades sensitivity against specificity: a pair (i, j) is worth
/// `(gamma + 1)·P[i,j] − 1` against leaving both positions unpaired, so
/// larger gamma admits pairs of lower probability. `min_hp_length` is the
/// smallest allowed hairpin span: no pair (i, j) with `j − i` below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeaConfig {
    pub gamma: f64,
    pub min_hp_length: usize,
}

impl Default for MeaConfig {
    fn default() -> Self {
        Self { gamma: 1.0, min_hp_length: 3 }
    }
}

/// The filled MEA table for one probability matrix.
///
/// Owns its DP and traceback tables; both are dropped with the value and
/// never shared between invocations.
#[derive(Debug)]
pub struct MeaFold {
    bpps: Array2<f64>,
    config: MeaConfig,
    w: Array2<f64>,
    tb: Array2<Trace>,
}

impl MeaFold {
    /// Deterministic fill: every cell takes the best of the four options.
    pub fn new(bpps: &Array2<f64>, config: MeaConfig) -> Result<Self, MeaError> {
        let mut fold = Self::with_tables(bpps, config)?;
        for (i, j) in fold.cell_order() {
            let options = fold.options(i, j);
            let mut best = 0;
            for k in 1..4 {
                if options[k] > options[best] {
                    best = k;
                }
            }
            fold.w[(i, j)] = options[best];
            fold.tb[(i, j)] = TRACES[best];
        }
        Ok(fold)
    }

    /// Stochastic fill: the winning option is sampled instead of maximized.
    ///
    /// The weights are the four option values shifted by their minimum and
    /// L1-normalized. This is a relative-weighting heuristic, not a
    /// Boltzmann distribution; when all four options are equal the draw
    /// falls back to uniform.
    pub fn new_stochastic<R>(
        bpps: &Array2<f64>,
        config: MeaConfig,
        rng: &mut R,
    ) -> Result<Self, MeaError>
    where
        R: Rng + ?Sized,
    {
        let mut fold = Self::with_tables(bpps, config)?;
        for (i, j) in fold.cell_order() {
            let options = fold.options(i, j);
            let chosen = sample_option(options, rng);
            fold.w[(i, j)] = options[chosen];
            fold.tb[(i, j)] = TRACES[chosen];
        }
        Ok(fold)
    }

    fn with_tables(bpps: &Array2<f64>, config: MeaConfig) -> Result<Self, MeaError> {
        let n = ensure_square(bpps)?;
        Ok(Self {
            bpps: bpps.clone(),
            config,
            w: Array2::from_elem((n, n), 0.0),
            tb: Array2::from_elem((n, n), Trace::FivePrime),
        })
    }

    /// Cells in fill order: all intervals of one length before any longer
    /// ones, since every option only looks at strictly shorter intervals.
    fn cell_order(&self) -> Vec<(usize, usize)> {
        let n = self.len();
        let min_len = self.config.min_hp_length.max(1);
        let mut order = Vec::new();
        for length in min_len..n {
            for i in 0..n - length {
                order.push((i, i + length));
            }
        }
        order
    }

    /// The four recurrence options for interval (i, j):
    /// i unpaired, j unpaired, (i, j) paired, best bifurcation.
    ///
    /// The constant −1 in the pairing option offsets double-counted
    /// probability mass; reference outputs depend on it exactly.
    fn options(&self, i: usize, j: usize) -> [f64; 4] {
        let paired =
            (self.config.gamma + 1.0) * self.bpps[(i, j)] + self.w[(i + 1, j - 1)] - 1.0;
        let split = (i + 1..j)
            .map(|k| self.w[(i, k)] + self.w[(k + 1, j)])
            .fold(f64::NEG_INFINITY, f64::max);
        [self.w[(i + 1, j)], self.w[(i, j - 1)], paired, split]
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.w.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Probability matrix this fold was computed from.
    pub fn bpps(&self) -> &Array2<f64> {
        &self.bpps
    }

    /// Read the structure out of the traceback table.
    ///
    /// Iterative with an explicit stack; recursion depth would otherwise
    /// scale with the sequence length. Bifurcation cells re-derive their
    /// split point by scanning for the first k that reproduces the stored
    /// value (exact equality holds because both sides were computed from
    /// the same sums during the fill).
    pub fn pairs(&self) -> PairSet {
        let n = self.len();
        let mut pairs = PairSet::new(n);
        if n < 2 {
            return pairs;
        }

        let mut stack = vec![(0usize, n - 1)];
        while let Some((i, j)) = stack.pop() {
            if j <= i {
                continue;
            }
            match self.tb[(i, j)] {
                Trace::FivePrime => stack.push((i + 1, j)),
                Trace::ThreePrime => stack.push((i, j - 1)),
                Trace::Paired => {
                    pairs.insert(Pair::new(i as NAIDX, j as NAIDX));
                    stack.push((i + 1, j - 1));
                }
                Trace::Split => {
                    for k in i + 1..j {
                        if self.w[(i, j)] == self.w[(i, k)] + self.w[(k + 1, j)] {
                            stack.push((i, k));
                            stack.push((k + 1, j));
                            break;
                        }
                    }
                }
            }
        }
        pairs
    }

    /// The structure in bracket notation.
    pub fn structure(&self) -> String {
        self.pairs().to_dotbracket()
    }
}

/// Draw one of the four options with max-shifted, L1-normalized weights.
fn sample_option<R>(options: [f64; 4], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let min = options.iter().cloned().fold(f64::INFINITY, f64::min);
    let weights = options.map(|x| x - min);
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..4);
    }
    let mut threshold = rng.random::<f64>() * total;
    for (k, weight) in weights.iter().enumerate() {
        if threshold < *weight {
            return k;
        }
        threshold -= weight;
    }
    3
}

/// Greedy reciprocal-best-partner selection ("ProbKnot").
///
/// Entries at or below `theta` are zeroed first; a pair (i, j) is kept
/// when its probability is positive and equals both the best of column i
/// and the best of column j. Nothing prevents the result from crossing,
/// which is the point: rendered directly, this is the fastest way to a
/// pseudoknotted candidate structure. Pairs with `j − i <= 1` are
/// discarded.
pub fn probknot(bpps: &Array2<f64>, theta: f64) -> Result<PairSet, MeaError> {
    let n = ensure_square(bpps)?;
    let filtered = bpps.mapv(|x| if x <= theta { 0.0 } else { x });

    let mut colmax = vec![0.0_f64; n];
    for ((_, j), &p) in filtered.indexed_iter() {
        if p > colmax[j] {
            colmax[j] = p;
        }
    }

    let mut pairs = PairSet::new(n);
    for i in 0..n {
        for j in i + 2..n {
            let p = filtered[(i, j)];
            if p > 0.0 && p == colmax[j] && filtered[(j, i)] == colmax[i] {
                pairs.insert(Pair::new(i as NAIDX, j as NAIDX));
            }
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Symmetric matrix with the given upper-triangle entries set.
    fn bpp_matrix(n: usize, entries: &[(usize, usize, f64)]) -> Array2<f64> {
        let mut m = Array2::from_elem((n, n), 0.0);
        for &(i, j, p) in entries {
            m[(i, j)] = p;
            m[(j, i)] = p;
        }
        m
    }

    #[test]
    fn test_rejects_non_square() {
        let m = Array2::from_elem((3, 4), 0.0);
        let err = MeaFold::new(&m, MeaConfig::default()).unwrap_err();
        assert_eq!(err, MeaError::NotSquare { rows: 3, cols: 4 });
    }

    #[test]
    fn test_degenerate_lengths() {
        for n in 0..2 {
            let m = Array2::from_elem((n, n), 0.0);
            let fold = MeaFold::new(&m, MeaConfig::default()).unwrap();
            assert!(fold.pairs().is_empty());
        }
    }

    #[test]
    fn test_single_strong_pair() {
        let m = bpp_matrix(5, &[(0, 4, 0.9), (1, 3, 0.8)]);
        let fold = MeaFold::new(&m, MeaConfig::default()).unwrap();
        // (1,3) spans less than the hairpin floor and must not appear.
        assert_eq!(fold.structure(), "(...)");
    }

    #[test]
    fn test_hairpin_floor_respected() {
        let m = bpp_matrix(8, &[(2, 4, 1.0)]);
        let fold = MeaFold::new(&m, MeaConfig::default()).unwrap();
        assert!(fold.pairs().is_empty());

        let relaxed = MeaConfig { gamma: 1.0, min_hp_length: 2 };
        let fold = MeaFold::new(&m, relaxed).unwrap();
        assert!(fold.pairs().contains(&Pair::new(2, 4)));
    }

    #[test]
    fn test_nested_helix() {
        let m = bpp_matrix(12, &[(0, 11, 0.95), (1, 10, 0.9), (2, 9, 0.85)]);
        let fold = MeaFold::new(&m, MeaConfig::default()).unwrap();
        assert_eq!(fold.structure(), "(((......)))");
    }

    #[test]
    fn test_bifurcation() {
        let m = bpp_matrix(12, &[(0, 5, 0.9), (6, 11, 0.9)]);
        let fold = MeaFold::new(&m, MeaConfig::default()).unwrap();
        assert_eq!(fold.structure(), "(....)(....)");
    }

    #[test]
    fn test_gamma_admits_more_pairs() {
        let m = bpp_matrix(10, &[(0, 9, 0.9), (1, 8, 0.45), (2, 7, 0.2)]);
        let counts: Vec<usize> = [1.0, 4.0, 9.0]
            .iter()
            .map(|&gamma| {
                let config = MeaConfig { gamma, min_hp_length: 3 };
                MeaFold::new(&m, config).unwrap().pairs().len()
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_output_is_always_nested_and_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 40;
        let mut m = Array2::from_elem((n, n), 0.0);
        for i in 0..n {
            for j in i + 3..n {
                let p: f64 = rng.random();
                m[(i, j)] = p;
                m[(j, i)] = p;
            }
        }
        let fold = MeaFold::new(&m, MeaConfig::default()).unwrap();
        let pairs = fold.pairs();
        assert!(!pairs.is_empty());
        assert!(pairs.is_valid());
        assert!(!pairs.is_pseudoknotted());
        assert!(pairs.iter().all(|p| p.span() >= 3));
    }

    #[test]
    fn test_stochastic_is_reproducible() {
        let m = bpp_matrix(10, &[(0, 9, 0.9), (1, 8, 0.45), (2, 7, 0.2)]);
        let config = MeaConfig::default();

        let mut rng = StdRng::seed_from_u64(42);
        let a = MeaFold::new_stochastic(&m, config, &mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let b = MeaFold::new_stochastic(&m, config, &mut rng).unwrap();

        assert_eq!(a.pairs(), b.pairs());
        assert!(a.pairs().is_valid());
        assert!(a.pairs().iter().all(|p| p.span() >= 3));
    }

    #[test]
    fn test_probknot_reciprocal_best() {
        let m = bpp_matrix(10, &[(0, 9, 0.9), (1, 8, 0.8), (3, 6, 0.4), (3, 9, 0.7)]);
        let pairs = probknot(&m, 0.0).unwrap();
        // (3,9) loses column 9 to the stronger (0,9); (3,6) is best for
        // column 6 but not for column 3.
        assert_eq!(
            pairs.to_vec(),
            vec![Pair::new(0, 9), Pair::new(1, 8)]
        );
    }

    #[test]
    fn test_probknot_theta_filter() {
        let m = bpp_matrix(10, &[(0, 9, 0.9), (2, 7, 0.25)]);
        let keep = probknot(&m, 0.0).unwrap();
        assert!(keep.contains(&Pair::new(2, 7)));

        let strict = probknot(&m, 0.3).unwrap();
        assert_eq!(strict.to_vec(), vec![Pair::new(0, 9)]);
    }

    #[test]
    fn test_probknot_may_cross() {
        let m = bpp_matrix(12, &[(0, 6, 0.9), (3, 9, 0.8)]);
        let pairs = probknot(&m, 0.0).unwrap();
        assert!(pairs.is_pseudoknotted());
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_probknot_ignores_adjacent() {
        let m = bpp_matrix(6, &[(2, 3, 0.9)]);
        assert!(probknot(&m, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_probknot_empty_matrix() {
        let m = Array2::from_elem((8, 8), 0.0);
        assert!(probknot(&m, 0.0).unwrap().is_empty());
    }
}
