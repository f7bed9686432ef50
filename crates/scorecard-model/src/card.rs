use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::param::{FullParameter, RawParameter};

/// A score card as declared in one PMML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score_name: String,
    /// PMML file the card was read from.
    pub source: PathBuf,
    /// Parameters in declaration order, duplicates included.
    pub params: Vec<RawParameter>,
}

impl ScoreCard {
    pub fn new(score_name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            score_name: score_name.into(),
            source: source.into(),
            params: Vec::new(),
        }
    }

    /// Adds raw parameters, keeping the given order.
    #[must_use]
    pub fn with_params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = RawParameter>,
    {
        self.params.extend(params);
        self
    }
}

/// A score card whose parameters have been resolved against every source.
///
/// Built once by the combiner; there is no way to change it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCardExt {
    score_name: String,
    params: Vec<FullParameter>,
}

impl ScoreCardExt {
    pub fn new(score_name: impl Into<String>, params: Vec<FullParameter>) -> Self {
        Self {
            score_name: score_name.into(),
            params,
        }
    }

    pub fn score_name(&self) -> &str {
        &self.score_name
    }

    pub fn params(&self) -> &[FullParameter] {
        &self.params
    }

    pub fn ambiguous_count(&self) -> usize {
        self.params
            .iter()
            .filter(|param| param.method.is_ambiguous())
            .count()
    }
}
