//! Input/output helpers.
//!
//! - analysis JSON read/write (`results`)
//! - channel-table CSV export (`export`)

pub mod export;
pub mod results;

pub use export::*;
pub use results::*;
