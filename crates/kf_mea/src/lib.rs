mod error;
mod mea;
mod scoring;

pub use error::*;
pub use mea::*;
pub use scoring::*;
