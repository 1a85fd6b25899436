//! Grouping base pairs into helices and dropping the short ones.
//!
//! A helix here is a maximal run of sequentially adjacent pairs: walking
//! the set sorted by (i, j), the next pair must step inward on both sides
//! by at most `allowed_bulge_len + 1`. This is sequence adjacency, not the
//! crossing-based grouping of the conflict partitioner, and it applies to
//! pseudoknotted sets just as well.

use crate::Pair;
use crate::PairSet;

/// Removes helices shorter than `min_len_helix` pairs, tolerating bulges
/// of up to `allowed_bulge_len` on either side when measuring runs.
///
/// `allowed_bulge_len = 0` accepts only perfectly stacked pairs;
/// 1 additionally accepts 0-1 and 1-1 bulges, 2 adds 2-0, 2-1, 2-2, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelixFilter {
    pub allowed_bulge_len: usize,
    pub min_len_helix: usize,
}

impl Default for HelixFilter {
    fn default() -> Self {
        Self { allowed_bulge_len: 0, min_len_helix: 1 }
    }
}

impl HelixFilter {
    pub fn new(allowed_bulge_len: usize, min_len_helix: usize) -> Self {
        Self { allowed_bulge_len, min_len_helix }
    }

    /// Group the pairs of `set` into maximal sequentially adjacent runs.
    pub fn helices(&self, set: &PairSet) -> Vec<Vec<Pair>> {
        let step = (self.allowed_bulge_len + 1) as u16;
        let mut helices = Vec::new();
        let mut current: Vec<Pair> = Vec::new();

        for pair in set.to_vec() {
            if let Some(last) = current.last() {
                let stacks_left = pair.i() > last.i() && pair.i() - last.i() <= step;
                let stacks_right = pair.j() < last.j() && last.j() - pair.j() <= step;
                if stacks_left && stacks_right {
                    current.push(pair);
                } else {
                    helices.push(std::mem::take(&mut current));
                    current.push(pair);
                }
            } else {
                current.push(pair);
            }
        }
        if !current.is_empty() {
            helices.push(current);
        }
        helices
    }

    /// Rebuild the set from helices of at least `min_len_helix` pairs.
    pub fn filter(&self, set: &PairSet) -> PairSet {
        let mut out = PairSet::new(set.length());
        for helix in self.helices(set) {
            if helix.len() >= self.min_len_helix {
                for pair in helix {
                    out.insert(pair);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helix_indices(helices: &[Vec<Pair>]) -> Vec<Vec<(u16, u16)>> {
        helices
            .iter()
            .map(|h| h.iter().map(|p| (p.i(), p.j())).collect())
            .collect()
    }

    fn filtered(s: &str, bulge: usize, min_len: usize) -> String {
        let set = PairSet::from_dotbracket(s, true).unwrap();
        HelixFilter::new(bulge, min_len).filter(&set).to_dotbracket()
    }

    const S: &str = "(((....)).)...(..)....(((..(((....))))))";

    #[test]
    fn test_helix_grouping() {
        let set = PairSet::from_dotbracket(S, false).unwrap();
        assert_eq!(
            helix_indices(&HelixFilter::new(0, 1).helices(&set)),
            vec![
                vec![(0, 10)],
                vec![(1, 8), (2, 7)],
                vec![(14, 17)],
                vec![(22, 39), (23, 38), (24, 37)],
                vec![(27, 36), (28, 35), (29, 34)],
            ]
        );
        assert_eq!(
            helix_indices(&HelixFilter::new(1, 1).helices(&set)),
            vec![
                vec![(0, 10), (1, 8), (2, 7)],
                vec![(14, 17)],
                vec![(22, 39), (23, 38), (24, 37)],
                vec![(27, 36), (28, 35), (29, 34)],
            ]
        );
        assert_eq!(
            helix_indices(&HelixFilter::new(2, 1).helices(&set)),
            vec![
                vec![(0, 10), (1, 8), (2, 7)],
                vec![(14, 17)],
                vec![(22, 39), (23, 38), (24, 37), (27, 36), (28, 35), (29, 34)],
            ]
        );
    }

    #[test]
    fn test_filter_plain_structures() {
        assert_eq!(filtered(S, 0, 1), S);
        assert_eq!(filtered(S, 0, 2), ".((....)).............(((..(((....))))))");
        assert_eq!(filtered(S, 0, 3), "......................(((..(((....))))))");
        assert_eq!(filtered(S, 1, 3), "(((....)).)...........(((..(((....))))))");
        assert_eq!(filtered(S, 2, 3), "(((....)).)...........(((..(((....))))))");
        assert_eq!(filtered(S, 0, 4), "........................................");
        assert_eq!(filtered(S, 1, 4), "........................................");
        assert_eq!(filtered(S, 2, 4), "......................(((..(((....))))))");
        assert_eq!(filtered(S, 1, 2), "(((....)).)...........(((..(((....))))))");
    }

    const PK: &str = "(((.((([..[[..))))((...)){...]]]...)})";

    #[test]
    fn test_helix_grouping_pseudoknot() {
        let set = PairSet::from_dotbracket(PK, true).unwrap();
        assert_eq!(
            helix_indices(&HelixFilter::new(1, 1).helices(&set)),
            vec![
                vec![(0, 37), (1, 35)],
                vec![(2, 17), (4, 16), (5, 15), (6, 14)],
                vec![(7, 31)],
                vec![(10, 30), (11, 29)],
                vec![(18, 24), (19, 23)],
                vec![(25, 36)],
            ]
        );
    }

    #[test]
    fn test_filter_pseudoknot_structures() {
        // Bracket families may be reassigned on re-encoding, so compare
        // as pair sets.
        let expect = |s: &str| PairSet::from_dotbracket(s, true).unwrap();
        let run = |bulge, min_len| {
            let set = PairSet::from_dotbracket(PK, true).unwrap();
            HelixFilter::new(bulge, min_len).filter(&set)
        };

        assert_eq!(run(0, 1), expect(PK));
        assert_eq!(run(0, 2), expect("....(((...[[..))).((...))....]]......."));
        assert_eq!(run(0, 3), expect("....(((.......)))....................."));
        assert_eq!(run(1, 3), expect("..(.(((.......))))...................."));
        assert_eq!(run(2, 3), expect("..(.((([..[[..))))...........]]]......"));
        assert_eq!(run(0, 4), expect("......................................"));
        assert_eq!(run(1, 4), expect("..(.(((.......))))...................."));
        assert_eq!(run(2, 4), expect("..(.(((.......))))...................."));
        assert_eq!(run(1, 2), expect("(((.(((...[[..))))((...))....]]....).)"));
    }
}
