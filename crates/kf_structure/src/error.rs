use std::fmt;

/// Errors raised while reading bracket notation.
///
/// All of these mean the input text does not describe a structure; none of
/// them are recoverable by the codec itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// An opening character was never closed.
    UnmatchedOpen(char, usize),
    /// A closing character has no matching opener.
    UnmatchedClose(char, usize),
    /// A character outside the accepted alphabet.
    UnexpectedCharacter(char, usize),
    /// Two different bracket families while pseudoknots are disabled.
    MixedDelimiters(char, char),
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::UnmatchedOpen(c, i) => {
                write!(f, "Unmatched '{}' at position {}: pair is never closed", c, i)
            }
            StructureError::UnmatchedClose(c, i) => {
                write!(f, "Unmatched '{}' at position {}: no matching opener", c, i)
            }
            StructureError::UnexpectedCharacter(c, i) => {
                write!(
                    f,
                    "Unexpected character '{}' at position {}; did you mean to allow pseudoknots?",
                    c, i
                )
            }
            StructureError::MixedDelimiters(found, established) => {
                write!(
                    f,
                    "Mixed pair delimiters '{}' and '{}'; did you mean to allow pseudoknots?",
                    found, established
                )
            }
        }
    }
}

impl std::error::Error for StructureError {}
