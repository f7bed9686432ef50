//! Per-parameter records produced by the extractors and the combiner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Semantic data type of a score card parameter.
///
/// Only the two types the scoring engine understands are representable;
/// anything else is rejected at parse time instead of being carried around
/// as an unknown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Decimal,
    String,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Decimal => "decimal",
            ParamType::String => "string",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("decimal") {
            Ok(ParamType::Decimal)
        } else if trimmed.eq_ignore_ascii_case("string") {
            Ok(ParamType::String)
        } else {
            Err(ModelError::UnknownParamType {
                raw: s.to_string(),
            })
        }
    }
}

/// A parameter name exactly as declared inside one PMML score card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParameter(String);

impl RawParameter {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName { what: "PMML parameter" });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One declaration from the schema text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaParameter {
    /// Parameter name in the schema's own casing.
    pub name: String,
    pub param_type: ParamType,
    /// 1-based line number in the schema file.
    pub line: usize,
}

impl SchemaParameter {
    pub fn new(name: impl Into<String>, param_type: ParamType, line: usize) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName { what: "schema parameter" });
        }
        Ok(Self {
            name,
            param_type,
            line,
        })
    }
}

/// The computation method(s) resolved for one parameter.
///
/// `Ambiguous` always holds at least two distinct methods, in the order the
/// spreadsheet rows listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodSpec {
    Single(String),
    Ambiguous(Vec<String>),
}

impl MethodSpec {
    /// Builds a spec from a list of already de-duplicated methods.
    ///
    /// Returns `None` for an empty list.
    pub fn from_distinct(methods: Vec<String>) -> Option<Self> {
        match methods.len() {
            0 => None,
            1 => methods.into_iter().next().map(MethodSpec::Single),
            _ => Some(MethodSpec::Ambiguous(methods)),
        }
    }

    /// Builds an ambiguous spec, rejecting lists with fewer than two entries.
    pub fn ambiguous(methods: Vec<String>) -> Result<Self> {
        if methods.len() < 2 {
            return Err(ModelError::NotAmbiguous {
                count: methods.len(),
            });
        }
        Ok(MethodSpec::Ambiguous(methods))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MethodSpec::Ambiguous(_))
    }

    /// The single resolved method, if there is exactly one.
    pub fn single(&self) -> Option<&str> {
        match self {
            MethodSpec::Single(method) => Some(method.as_str()),
            MethodSpec::Ambiguous(_) => None,
        }
    }

    pub fn candidates(&self) -> Vec<&str> {
        match self {
            MethodSpec::Single(method) => vec![method.as_str()],
            MethodSpec::Ambiguous(methods) => methods.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodSpec::Single(method) => f.write_str(method),
            MethodSpec::Ambiguous(methods) => {
                write!(f, "<<AMBIGUOUS: {}>>", methods.join(" | "))
            }
        }
    }
}

/// Everything the spreadsheet knows about one queried parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetMethodInfo {
    /// The name that was queried.
    pub name: String,
    /// Distinct `Var_Name` values of the matching rows, first-seen order.
    pub matched_names: Vec<String>,
    pub method: MethodSpec,
}

/// A parameter after all three sources agreed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullParameter {
    /// Canonical name, in the schema's casing.
    pub name: String,
    pub param_type: ParamType,
    /// Name as declared in the PMML card.
    pub pmml_name: String,
    pub method: MethodSpec,
}
