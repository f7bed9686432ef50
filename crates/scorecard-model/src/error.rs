use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{what} name must not be empty")]
    EmptyName { what: &'static str },
    #[error("unknown parameter type '{raw}' (expected decimal or string)")]
    UnknownParamType { raw: String },
    #[error("ambiguous method list needs at least two distinct methods, got {count}")]
    NotAmbiguous { count: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
