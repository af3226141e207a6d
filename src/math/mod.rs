//! Mathematical utilities: integration, statistics, interpolation, root finding.

pub mod integrate;
pub mod interp;
pub mod roots;
pub mod stats;

pub use integrate::*;
pub use interp::*;
pub use roots::*;
pub use stats::*;
