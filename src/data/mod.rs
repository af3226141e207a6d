//! Synthetic channel-response generation.

pub mod synthetic;

pub use synthetic::*;
