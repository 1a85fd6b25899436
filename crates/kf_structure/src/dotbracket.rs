//! Conversions between pair sets and (pseudoknotted) bracket notation.
//!
//! The canonical family order is `()`, `[]`, `{}`, `<>`, then the 26
//! lowercase/uppercase letter pairs for deeper pseudoknot levels. The
//! nesting-level-to-family mapping is canonical but not unique: two valid
//! partitions of the same set may render differently, yet both decode back
//! to the same pairs.

use log::warn;
use colored::Colorize;

use crate::conflict::partition;
use crate::NAIDX;
use crate::Pair;
use crate::PairSet;
use crate::StructureError;

/// Bracket families a closer/opener can belong to: 4 bracket pairs plus
/// 26 letter pairs.
const NUM_FAMILIES: usize = 4 + 26;

const BRACKET_OPEN: [char; 4] = ['(', '[', '{', '<'];
const BRACKET_CLOSE: [char; 4] = [')', ']', '}', '>'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Open,
    Close,
}

/// Family index and role of a structure character, `None` for anything
/// outside the pair alphabet.
fn classify(c: char) -> Option<(usize, Role)> {
    if let Some(f) = BRACKET_OPEN.iter().position(|&o| o == c) {
        return Some((f, Role::Open));
    }
    if let Some(f) = BRACKET_CLOSE.iter().position(|&o| o == c) {
        return Some((f, Role::Close));
    }
    match c {
        'a'..='z' => Some((4 + (c as usize - 'a' as usize), Role::Open)),
        'A'..='Z' => Some((4 + (c as usize - 'A' as usize), Role::Close)),
        _ => None,
    }
}

/// Characters used to render a conflict group at the given nesting level.
///
/// Group 0 never crosses anything, so the first conflict group can reuse
/// the parens family without ambiguity; that keeps simple pseudoknots in
/// the familiar `(((...[[[...)))...]]]` shape.
fn level_chars(level: usize) -> Option<(char, char)> {
    match level {
        0 | 1 => Some(('(', ')')),
        2 => Some(('[', ']')),
        3 => Some(('{', '}')),
        4 => Some(('<', '>')),
        5..=30 => {
            let k = (level - 5) as u8;
            Some(((b'a' + k) as char, (b'A' + k) as char))
        }
        _ => None,
    }
}

impl PairSet {
    /// Parse bracket notation into a pair set.
    ///
    /// Each family matches its closers to the most recent unmatched opener
    /// of the same family; different families may intertwine freely when
    /// `allow_pseudoknots` is set. Without it, letters are rejected
    /// outright and only a *single* bracket family may appear in the whole
    /// string (re-encoding normalizes it to parens). Whitespace counts as
    /// an unpaired position.
    pub fn from_dotbracket(s: &str, allow_pseudoknots: bool) -> Result<Self, StructureError> {
        let length = s.chars().count();
        let mut set = PairSet::new(length);
        let mut stacks: Vec<Vec<usize>> = vec![Vec::new(); NUM_FAMILIES];
        let mut established: Option<(usize, char)> = None;

        for (i, c) in s.chars().enumerate() {
            if c == '.' || c.is_whitespace() {
                continue;
            }
            let Some((family, role)) = classify(c) else {
                return Err(StructureError::UnexpectedCharacter(c, i));
            };
            if !allow_pseudoknots {
                if family >= 4 {
                    return Err(StructureError::UnexpectedCharacter(c, i));
                }
                match established {
                    None => established = Some((family, c)),
                    Some((f, e)) if f != family => {
                        return Err(StructureError::MixedDelimiters(c, e));
                    }
                    _ => {}
                }
            }
            match role {
                Role::Open => stacks[family].push(i),
                Role::Close => {
                    let j = stacks[family]
                        .pop()
                        .ok_or(StructureError::UnmatchedClose(c, i))?;
                    set.insert(Pair::new(j as NAIDX, i as NAIDX));
                }
            }
        }

        for (family, stack) in stacks.iter().enumerate() {
            if let Some(&i) = stack.first() {
                let c = if family < 4 {
                    BRACKET_OPEN[family]
                } else {
                    (b'a' + (family - 4) as u8) as char
                };
                return Err(StructureError::UnmatchedOpen(c, i));
            }
        }
        Ok(set)
    }

    /// Render the set as bracket notation.
    ///
    /// Conflict groups are assigned families in canonical order. Should the
    /// partition need more families than exist (an extremely entangled
    /// structure), the remaining pairs are left unrendered with a warning;
    /// this is not an error. Positions used by more than one pair get
    /// overwritten in no particular order; `sanitize` first if in doubt.
    pub fn to_dotbracket(&self) -> String {
        let mut out = vec!['.'; self.length()];
        let groups = partition(self);
        for (level, group) in groups.iter().enumerate() {
            let Some((open, close)) = level_chars(level) else {
                let dropped: usize = groups[level..].iter().map(|g| g.len()).sum();
                warn!(
                    "{} pseudoknot too deep for the bracket alphabets: {} pair(s) left unrendered",
                    "WARNING:".red(),
                    dropped
                );
                break;
            };
            for pair in group {
                out[pair.i() as usize] = open;
                out[pair.j() as usize] = close;
            }
        }
        out.into_iter().collect()
    }
}

impl TryFrom<&str> for PairSet {
    type Error = StructureError;

    /// Strict single-family parsing; see [`PairSet::from_dotbracket`].
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PairSet::from_dotbracket(s, false)
    }
}
