//! Error types for combining score cards.

use thiserror::Error;

/// A card that could not be combined. Other cards in the batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error(
        "card '{card}' is incomplete: {} parameter(s) without a schema type, {} without a method",
        .missing_types.len(),
        .missing_methods.len()
    )]
    IncompleteCard {
        card: String,
        missing_types: Vec<String>,
        missing_methods: Vec<String>,
    },
}

impl CombineError {
    pub fn card(&self) -> &str {
        match self {
            CombineError::IncompleteCard { card, .. } => card,
        }
    }
}

pub type Result<T> = std::result::Result<T, CombineError>;
