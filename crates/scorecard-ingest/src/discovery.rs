//! Input directory discovery and classification.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, InputKind, Result};

/// Spreadsheet extensions calamine can open.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];
const SCHEMA_EXTENSION: &str = "txt";
const PMML_EXTENSION: &str = "pmml";

/// The classified input files of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    pub spreadsheet: PathBuf,
    pub schema: PathBuf,
    /// PMML files sorted by file name.
    pub pmml: Vec<PathBuf>,
}

/// Lists regular files in a directory, sorted by file name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Classifies the files of `dir` into one spreadsheet, one schema file and
/// the PMML cards.
///
/// Fails if any category is empty. When a directory holds more than one
/// spreadsheet or schema file, the first by name wins and the rest are
/// logged as ignored.
pub fn resolve_file_set(dir: &Path) -> Result<FileSet> {
    let files = list_files(dir)?;

    let mut spreadsheets = Vec::new();
    let mut schemas = Vec::new();
    let mut pmml = Vec::new();
    for path in files {
        match classify(&path) {
            Some(InputKind::Spreadsheet) => spreadsheets.push(path),
            Some(InputKind::Schema) => schemas.push(path),
            Some(InputKind::Pmml) => pmml.push(path),
            None => tracing::trace!(path = %path.display(), "ignoring unrelated file"),
        }
    }

    let spreadsheet = pick_single(spreadsheets, InputKind::Spreadsheet)?;
    let schema = pick_single(schemas, InputKind::Schema)?;
    if pmml.is_empty() {
        return Err(IngestError::MissingInput {
            kind: InputKind::Pmml,
        });
    }

    tracing::debug!(
        spreadsheet = %spreadsheet.display(),
        schema = %schema.display(),
        pmml_count = pmml.len(),
        "resolved input files"
    );

    Ok(FileSet {
        spreadsheet,
        schema,
        pmml,
    })
}

fn classify(path: &Path) -> Option<InputKind> {
    let ext = path.extension().and_then(std::ffi::OsStr::to_str)?;
    if SPREADSHEET_EXTENSIONS
        .iter()
        .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    {
        Some(InputKind::Spreadsheet)
    } else if ext.eq_ignore_ascii_case(SCHEMA_EXTENSION) {
        Some(InputKind::Schema)
    } else if ext.eq_ignore_ascii_case(PMML_EXTENSION) {
        Some(InputKind::Pmml)
    } else {
        None
    }
}

fn pick_single(candidates: Vec<PathBuf>, kind: InputKind) -> Result<PathBuf> {
    let mut candidates = candidates.into_iter();
    let chosen = candidates
        .next()
        .ok_or(IngestError::MissingInput { kind })?;
    let ignored: Vec<String> = candidates.map(|p| p.display().to_string()).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            kind = %kind,
            chosen = %chosen.display(),
            ignored = ?ignored,
            "more than one candidate file, using the first"
        );
    }
    Ok(chosen)
}

/// Reads a text input. Bytes that are not UTF-8 become U+FFFD so one bad
/// line cannot take the rest of the file with it.
pub(crate) fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        dir
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(Path::new("params.XLSX")),
            Some(InputKind::Spreadsheet)
        );
        assert_eq!(classify(Path::new("model.txt")), Some(InputKind::Schema));
        assert_eq!(classify(Path::new("card.pmml")), Some(InputKind::Pmml));
        assert_eq!(classify(Path::new("notes.md")), None);
        assert_eq!(classify(Path::new("README")), None);
    }

    #[test]
    fn test_resolve_file_set() {
        let dir = create_test_dir(&[
            "params.xlsx",
            "model.txt",
            "b_card.pmml",
            "a_card.pmml",
            "script.log",
        ]);
        let files = resolve_file_set(dir.path()).unwrap();

        assert_eq!(files.spreadsheet.file_name().unwrap(), "params.xlsx");
        assert_eq!(files.schema.file_name().unwrap(), "model.txt");
        let names: Vec<_> = files
            .pmml
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_card.pmml", "b_card.pmml"]);
    }

    #[test]
    fn test_missing_category_is_fatal() {
        let dir = create_test_dir(&["params.xlsx", "card.pmml"]);
        let err = resolve_file_set(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingInput {
                kind: InputKind::Schema
            }
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            resolve_file_set(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_extra_schema_files_use_first_by_name() {
        let dir = create_test_dir(&["params.xlsx", "b_model.txt", "a_model.txt", "card.pmml"]);
        let files = resolve_file_set(dir.path()).unwrap();
        assert_eq!(files.schema.file_name().unwrap(), "a_model.txt");
    }
}
