//! # knotfold
//!
//! Turning base-pairing probability matrices into representative
//! secondary structures, pseudoknots included.
//!
//! This crate re-exports the main functionality from its submodules.

pub mod structure {
    pub use ::kf_structure::*;
}

pub mod mea {
    pub use ::kf_mea::*;
}

pub mod knots {
    pub use ::kf_knots::*;
}
