//! Folding and the bowtie crossing-point solver.

pub mod bowtie;
pub mod fold;

pub use bowtie::*;
pub use fold::*;
