//! Error types for rendering.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A name would break out of the quoted strings in the templates.
    #[error("card '{card}': name {name:?} contains {found:?}, which cannot be embedded in generated code")]
    UnsafeName {
        card: String,
        name: String,
        found: char,
    },

    /// Advanced report field numbering ran past the largest line number.
    #[error("card '{card}': {fields} report fields starting after line {start} overflow the line number")]
    LineNumberOverflow {
        card: String,
        start: u32,
        fields: usize,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
