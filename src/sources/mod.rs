//! Document sources.

pub mod local;

pub use local::{DocumentReader, ReadOutcome};
