//! Policies for parameters that a source cannot resolve.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with a parameter that is missing from one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// Report it, keep scanning the card, then reject the whole card.
    #[default]
    FailCard,
    /// Report it and drop the parameter from its card.
    Skip,
}

impl MissingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingPolicy::FailCard => "fail-card",
            MissingPolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineOptions {
    /// Parameter not declared in the schema.
    pub missing_type: MissingPolicy,
    /// Parameter without a usable spreadsheet method.
    pub missing_method: MissingPolicy,
}

impl CombineOptions {
    pub fn with_missing_type(mut self, policy: MissingPolicy) -> Self {
        self.missing_type = policy;
        self
    }

    pub fn with_missing_method(mut self, policy: MissingPolicy) -> Self {
        self.missing_method = policy;
        self
    }
}
