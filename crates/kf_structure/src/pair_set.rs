//! Pair and PairSet definitions.
//!
//! Compact integer-based representation of base pairs. A `Pair` is two
//! 16-bit indices (`NAIDX`) packed into a 32-bit key (`P1KEY`) for cheap
//! set storage. In contrast to a pair table, a `PairSet` may contain
//! crossing pairs, so it is the working representation for everything
//! pseudoknot-related.

use std::fmt;
use nohash_hasher::IntSet;

use crate::NAIDX;
use crate::P1KEY;

/// A base pair (i, j) with i < j.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    i: NAIDX,
    j: NAIDX,
}

impl Pair {
    /// Create a new pair (i, j). Panics in debug if i >= j.
    pub fn new(i: NAIDX, j: NAIDX) -> Self {
        debug_assert!(i < j);
        debug_assert!(j < NAIDX::MAX);
        Pair { i, j }
    }

    /// Return the 5'-side index.
    pub fn i(&self) -> NAIDX {
        self.i
    }

    /// Return the 3'-side index.
    pub fn j(&self) -> NAIDX {
        self.j
    }

    /// Distance between the two endpoints.
    pub fn span(&self) -> usize {
        (self.j - self.i) as usize
    }

    /// Compact 32-bit key encoding both indices.
    pub fn key(&self) -> P1KEY {
        ((self.i as P1KEY) << 16) | (self.j as P1KEY)
    }

    /// Decode a key back into a `Pair`.
    pub fn from_key(key: P1KEY) -> Self {
        let i = (key >> 16) as NAIDX;
        let j = (key & 0xFFFF) as NAIDX;
        debug_assert!(i < j);
        Pair { i, j }
    }

    /// True if the two pairs intertwine (i1 < i2 < j1 < j2).
    pub fn crosses(&self, other: &Pair) -> bool {
        let (a, b) = if self.i < other.i { (self, other) } else { (other, self) };
        b.i < a.j && a.j < b.j
    }

    /// True if the two pairs use a common position.
    pub fn shares_position(&self, other: &Pair) -> bool {
        self.i == other.i || self.i == other.j || self.j == other.i || self.j == other.j
    }
}

/// A collection of base pairs represented as compact integer keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSet {
    length: usize,
    pairs: IntSet<P1KEY>,
}

impl PairSet {
    /// Create an empty pair set for a given sequence length.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            pairs: IntSet::default(),
        }
    }

    /// Collect pairs into a set for a given sequence length.
    pub fn from_pairs<I>(length: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = Pair>,
    {
        let mut set = Self::new(length);
        for pair in pairs {
            set.insert(pair);
        }
        set
    }

    /// Number of pairs contained in the set.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Insert a new pair; returns true if it was newly inserted.
    pub fn insert(&mut self, pair: Pair) -> bool {
        debug_assert!((pair.j() as usize) < self.length);
        self.pairs.insert(pair.key())
    }

    /// Check if a pair exists in the set.
    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(&pair.key())
    }

    /// Iterator over all pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = Pair> + '_ {
        self.pairs.iter().map(|&k| Pair::from_key(k))
    }

    /// Return all pairs as a Vec sorted by (i, j).
    pub fn to_vec(&self) -> Vec<Pair> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_unstable();
        v
    }

    /// Underlying sequence length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// True if no position participates in more than one pair.
    pub fn is_valid(&self) -> bool {
        let mut used: IntSet<NAIDX> = IntSet::default();
        for pair in self.iter() {
            if !used.insert(pair.i()) || !used.insert(pair.j()) {
                return false;
            }
        }
        true
    }

    /// True if any two pairs in the set intertwine.
    pub fn is_pseudoknotted(&self) -> bool {
        let pairs = self.to_vec();
        for (a, pair) in pairs.iter().enumerate() {
            if pairs[a + 1..].iter().any(|other| pair.crosses(other)) {
                return true;
            }
        }
        false
    }

    /// Resolve duplicate-position assignments.
    ///
    /// Whenever two pairs claim a common position, the pair with the
    /// shorter span wins; equal spans keep whichever sorts first by
    /// (i, j). Heuristic selection (reciprocal-best rounds with tied
    /// probabilities, non-involutive assignments) can hand us such sets.
    pub fn sanitize(&self) -> PairSet {
        let mut order = self.to_vec();
        order.sort_unstable_by_key(|p| (p.span(), p.i(), p.j()));

        let mut used: IntSet<NAIDX> = IntSet::default();
        let mut kept = PairSet::new(self.length);
        for pair in order {
            if used.contains(&pair.i()) || used.contains(&pair.j()) {
                continue;
            }
            used.insert(pair.i());
            used.insert(pair.j());
            kept.insert(pair);
        }
        kept
    }
}

impl fmt::Display for PairSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pair in self.to_vec() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "({},{})", pair.i(), pair.j())?;
            first = false;
        }
        Ok(())
    }
}
