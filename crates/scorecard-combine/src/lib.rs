//! Reconciles PMML cards with schema types and spreadsheet methods.

pub mod combiner;
pub mod error;
pub mod options;
pub mod source;

pub use combiner::{CombineOutcome, Combiner};
pub use error::{CombineError, Result};
pub use options::{CombineOptions, MissingPolicy};
pub use source::{MethodSource, TypeSource};
