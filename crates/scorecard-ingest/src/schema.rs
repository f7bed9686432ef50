//! Schema text extraction.
//!
//! The schema file declares one parameter per line, positionally:
//!
//! ```text
//! <xs:attribute name="param_1" type="xs:decimal" use="optional"/>
//! ```
//!
//! The second token carries the name and the third the type; the type's
//! value after the last `:` is the semantic type.

use std::fmt;
use std::path::{Path, PathBuf};

use scorecard_model::{
    CaseInsensitiveIndex, Diagnostic, DiagnosticKind, ModelError, ParamType, Reporter,
    SchemaParameter,
};

use crate::discovery::read_text;
use crate::error::{IngestError, Result};

const NAME_KEY: &str = "name";
const TYPE_KEY: &str = "type";

/// Parameter declarations from one schema file, indexed by name.
#[derive(Debug, Clone)]
pub struct SchemaExtractor {
    path: PathBuf,
    params: Vec<SchemaParameter>,
    index: CaseInsensitiveIndex,
}

impl SchemaExtractor {
    /// Reads and parses the schema file. An unreadable file is fatal;
    /// malformed lines are reported and dropped.
    pub fn load(path: &Path, reporter: &mut dyn Reporter) -> Result<Self> {
        let content = read_text(path).map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_text(path, &content, reporter))
    }

    pub fn from_text(path: &Path, content: &str, reporter: &mut dyn Reporter) -> Self {
        let mut params: Vec<SchemaParameter> = Vec::new();
        let mut index = CaseInsensitiveIndex::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let (name, param_type) = match parse_schema_line(line) {
                Ok(parsed) => parsed,
                Err(error) => {
                    reporter.report(
                        Diagnostic::error(error.kind(), format!("skipping schema line: {error}"))
                            .at(path, line_no),
                    );
                    continue;
                }
            };

            let param = match SchemaParameter::new(name, param_type, line_no) {
                Ok(param) => param,
                Err(error) => {
                    reporter.report(
                        Diagnostic::error(
                            DiagnosticKind::SchemaMalformedLine,
                            format!("skipping schema line: {error}"),
                        )
                        .at(path, line_no),
                    );
                    continue;
                }
            };

            if index.insert(&param.name, params.len()) {
                let first = index
                    .first(&param.name)
                    .map(|pos: usize| params[pos].line)
                    .unwrap_or_default();
                reporter.report(
                    Diagnostic::warning(
                        DiagnosticKind::SchemaDuplicateName,
                        format!(
                            "'{}' is already declared on line {first}; lookups use the first declaration",
                            param.name
                        ),
                    )
                    .at(path, line_no)
                    .for_parameter(param.name.as_str()),
                );
            }
            params.push(param);
        }

        tracing::debug!(
            path = %path.display(),
            declarations = params.len(),
            distinct = index.len(),
            "parsed schema file"
        );

        Self {
            path: path.to_path_buf(),
            params,
            index,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every declaration, in file order (duplicates included).
    pub fn params(&self) -> &[SchemaParameter] {
        &self.params
    }

    /// Case-insensitive lookup; resolves to the first declaration of a name.
    pub fn lookup(&self, name: &str) -> Option<&SchemaParameter> {
        self.index.first(name).map(|pos| &self.params[pos])
    }

    /// Every declaration of a name, in file order.
    pub fn declarations(&self, name: &str) -> Vec<&SchemaParameter> {
        self.index
            .all(name)
            .iter()
            .map(|&pos| &self.params[pos])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemaLineError {
    Malformed(String),
    UnknownType(String),
}

impl SchemaLineError {
    fn kind(&self) -> DiagnosticKind {
        match self {
            SchemaLineError::Malformed(_) => DiagnosticKind::SchemaMalformedLine,
            SchemaLineError::UnknownType(_) => DiagnosticKind::SchemaUnknownType,
        }
    }
}

impl fmt::Display for SchemaLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLineError::Malformed(reason) => f.write_str(reason),
            SchemaLineError::UnknownType(raw) => {
                write!(f, "unknown type '{raw}' (expected decimal or string)")
            }
        }
    }
}

fn parse_schema_line(line: &str) -> std::result::Result<(String, ParamType), SchemaLineError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(SchemaLineError::Malformed(format!(
            "expected at least 3 tokens, found {}",
            tokens.len()
        )));
    }

    let name = quoted_value(tokens[1], NAME_KEY)?;
    let raw_type = quoted_value(tokens[2], TYPE_KEY)?;
    let semantic = raw_type.rsplit(':').next().unwrap_or(raw_type);
    let param_type = semantic.parse::<ParamType>().map_err(|error| match error {
        ModelError::UnknownParamType { raw } => SchemaLineError::UnknownType(raw),
        other => SchemaLineError::Malformed(other.to_string()),
    })?;

    Ok((name.to_string(), param_type))
}

/// Extracts `X` from a `key="X"` token.
fn quoted_value<'a>(token: &'a str, key: &str) -> std::result::Result<&'a str, SchemaLineError> {
    let rest = token
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix("=\""))
        .ok_or_else(|| {
            SchemaLineError::Malformed(format!("expected {key}=\"…\", found '{token}'"))
        })?;
    let end = rest.find('"').ok_or_else(|| {
        SchemaLineError::Malformed(format!("unterminated quote in '{token}'"))
    })?;
    Ok(&rest[..end])
}
