//! Spreadsheet extraction.
//!
//! The workbook is opened once; the `Data` sheet's header row must carry
//! the `Var_Name` and `OMDM Data_Method` columns. Every other column is kept
//! as display text so `lookup` can show whole rows.

use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, open_workbook_auto};

use scorecard_model::{
    CaseInsensitiveIndex, Diagnostic, DiagnosticKind, MethodSpec, Reporter, SpreadsheetMethodInfo,
};

use crate::error::{IngestError, LookupError, Result};

pub const DATA_SHEET: &str = "Data";
pub const NAME_COLUMN: &str = "Var_Name";
pub const METHOD_COLUMN: &str = "OMDM Data_Method";

/// One data row of the `Data` sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetRow {
    /// 1-based row number as shown by spreadsheet applications.
    pub row_number: usize,
    pub var_name: String,
    /// Trimmed method cell; `None` when blank.
    pub method: Option<String>,
    /// Every cell of the row rendered as text, aligned with `headers()`.
    pub cells: Vec<String>,
}

/// The `Data` sheet, loaded and indexed by `Var_Name`.
#[derive(Debug, Clone)]
pub struct SpreadsheetExtractor {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<SpreadsheetRow>,
    index: CaseInsensitiveIndex,
}

impl SpreadsheetExtractor {
    /// Opens the workbook and reads the `Data` sheet.
    pub fn load(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if !workbook.sheet_names().iter().any(|name| name == DATA_SHEET) {
            return Err(IngestError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: DATA_SHEET.to_string(),
            });
        }

        let range = workbook
            .worksheet_range(DATA_SHEET)
            .map_err(|e| IngestError::Workbook {
                path: path.to_path_buf(),
                message: format!("failed to read sheet '{DATA_SHEET}': {e}"),
            })?;

        Self::from_range(path, &range)
    }

    /// Builds the extractor from an already decoded sheet range.
    pub fn from_range(path: &Path, range: &Range<Data>) -> Result<Self> {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows_iter = range.rows();

        let headers: Vec<String> = rows_iter
            .next()
            .map(|row| row.iter().map(|cell| cell_text(cell).trim().to_string()).collect())
            .ok_or_else(|| IngestError::EmptySheet {
                path: path.to_path_buf(),
                sheet: DATA_SHEET.to_string(),
            })?;

        let name_col = column_index(&headers, NAME_COLUMN, path)?;
        let method_col = column_index(&headers, METHOD_COLUMN, path)?;

        let mut rows = Vec::new();
        let mut index = CaseInsensitiveIndex::new();
        for (offset, row) in rows_iter.enumerate() {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            let var_name = cells
                .get(name_col)
                .map(|cell| cell.trim().to_string())
                .unwrap_or_default();
            if var_name.is_empty() {
                continue;
            }
            let method = cells
                .get(method_col)
                .map(|cell| cell.as_str().trim())
                .filter(|cell| !cell.is_empty())
                .map(str::to_string);

            index.insert(&var_name, rows.len());
            rows.push(SpreadsheetRow {
                // +1 for the header, +1 for 1-based numbering
                row_number: first_row + offset + 2,
                var_name,
                method,
                cells,
            });
        }

        tracing::debug!(
            path = %path.display(),
            rows = rows.len(),
            distinct_names = index.len(),
            "loaded spreadsheet"
        );

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
            index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[SpreadsheetRow] {
        &self.rows
    }

    /// Rows whose `Var_Name` matches `name` ignoring ASCII case, in sheet order.
    pub fn find_rows(&self, name: &str) -> Vec<&SpreadsheetRow> {
        self.index
            .all(name)
            .iter()
            .map(|&pos| &self.rows[pos])
            .collect()
    }

    /// Resolves the computation method for `name`.
    ///
    /// Not-found and no-method results are reported as errors and returned
    /// as `Err`. Conflicting methods are reported but still returned, as
    /// `MethodSpec::Ambiguous`.
    pub fn param_info(
        &self,
        name: &str,
        reporter: &mut dyn Reporter,
    ) -> std::result::Result<SpreadsheetMethodInfo, LookupError> {
        let rows = self.find_rows(name);
        if rows.is_empty() {
            let error = LookupError::NotFound {
                name: name.to_string(),
            };
            reporter.report(
                Diagnostic::error(DiagnosticKind::SpreadsheetNotFound, error.to_string())
                    .in_file(&self.path)
                    .for_parameter(name),
            );
            return Err(error);
        }

        let mut matched_names: Vec<String> = Vec::new();
        let mut methods: Vec<String> = Vec::new();
        for row in &rows {
            if !matched_names.contains(&row.var_name) {
                matched_names.push(row.var_name.clone());
            }
            if let Some(method) = &row.method
                && !methods.contains(method)
            {
                methods.push(method.clone());
            }
        }

        let Some(method) = MethodSpec::from_distinct(methods) else {
            let error = LookupError::NoMethod {
                name: name.to_string(),
                rows: rows.len(),
            };
            reporter.report(
                Diagnostic::error(DiagnosticKind::SpreadsheetMissingMethod, error.to_string())
                    .at(&self.path, rows[0].row_number)
                    .for_parameter(name),
            );
            return Err(error);
        };

        if method.is_ambiguous() {
            let listed: Vec<String> = rows
                .iter()
                .map(|row| {
                    format!(
                        "row {} {}={}",
                        row.row_number,
                        row.var_name,
                        row.method.as_deref().unwrap_or("")
                    )
                })
                .collect();
            reporter.report(
                Diagnostic::error(
                    DiagnosticKind::SpreadsheetAmbiguousMethod,
                    format!(
                        "parameter '{name}' maps to {} different methods ({})",
                        method.candidates().len(),
                        listed.join(", ")
                    ),
                )
                .at(&self.path, rows[0].row_number)
                .for_parameter(name),
            );
        }

        Ok(SpreadsheetMethodInfo {
            name: name.to_string(),
            matched_names,
            method,
        })
    }
}

fn column_index(headers: &[String], column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}

/// Renders a cell as display text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_model::DiagnosticReport;

    fn string_range(rows: &[&[&str]]) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    range.set_value((r as u32, c as u32), Data::String(value.to_string()));
                }
            }
        }
        range
    }

    fn sheet(rows: &[&[&str]]) -> SpreadsheetExtractor {
        SpreadsheetExtractor::from_range(Path::new("params.xlsx"), &string_range(rows)).unwrap()
    }

    #[test]
    fn test_header_is_trimmed() {
        let extractor = sheet(&[
            &[" Var_Name ", "Description", "OMDM Data_Method  "],
            &["AGE", "applicant age", "dmi_Get_Age"],
        ]);
        assert_eq!(
            extractor.headers(),
            &["Var_Name", "Description", "OMDM Data_Method"]
        );
        assert_eq!(extractor.rows()[0].row_number, 2);
        assert_eq!(extractor.rows()[0].method.as_deref(), Some("dmi_Get_Age"));
    }

    #[test]
    fn test_missing_column() {
        let range = string_range(&[&["Var_Name", "Method"], &["AGE", "x"]]);
        let err = SpreadsheetExtractor::from_range(Path::new("p.xlsx"), &range).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn { ref column, .. } if column == METHOD_COLUMN
        ));
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let extractor = sheet(&[
            &["Var_Name", "OMDM Data_Method"],
            &["", "orphan_method"],
            &["GENDER", "dms_Get_Gender"],
        ]);
        assert_eq!(extractor.rows().len(), 1);
        assert_eq!(extractor.rows()[0].row_number, 3);
    }

    #[test]
    fn test_param_info_single_method() {
        let extractor = sheet(&[
            &["Var_Name", "OMDM Data_Method"],
            &["Age", "dmi_Get_Age"],
            &["AGE", "dmi_Get_Age"],
        ]);
        let mut report = DiagnosticReport::new();
        for query in ["AGE", "age", "Age"] {
            let info = extractor.param_info(query, &mut report).unwrap();
            assert_eq!(info.name, query);
            assert_eq!(info.matched_names, vec!["Age", "AGE"]);
            assert_eq!(info.method, MethodSpec::Single("dmi_Get_Age".to_string()));
        }
        assert!(report.is_empty());
    }

    #[test]
    fn test_param_info_ambiguous() {
        let extractor = sheet(&[
            &["Var_Name", "OMDM Data_Method"],
            &["LIMIT", "m1"],
            &["limit", "m2"],
        ]);
        let mut report = DiagnosticReport::new();
        let info = extractor.param_info("Limit", &mut report).unwrap();
        assert_eq!(
            info.method,
            MethodSpec::Ambiguous(vec!["m1".to_string(), "m2".to_string()])
        );
        assert_eq!(report.kind_count(DiagnosticKind::SpreadsheetAmbiguousMethod), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn test_param_info_without_method_is_an_error() {
        let extractor = sheet(&[&["Var_Name", "OMDM Data_Method"], &["INCOME", ""]]);
        let mut report = DiagnosticReport::new();
        let err = extractor.param_info("INCOME", &mut report).unwrap_err();
        assert_eq!(
            err,
            LookupError::NoMethod {
                name: "INCOME".to_string(),
                rows: 1
            }
        );
        assert_eq!(report.kind_count(DiagnosticKind::SpreadsheetMissingMethod), 1);
    }

    #[test]
    fn test_param_info_not_found() {
        let extractor = sheet(&[&["Var_Name", "OMDM Data_Method"], &["AGE", "m"]]);
        let mut report = DiagnosticReport::new();
        assert!(matches!(
            extractor.param_info("ZIP", &mut report),
            Err(LookupError::NotFound { .. })
        ));
        assert_eq!(report.kind_count(DiagnosticKind::SpreadsheetNotFound), 1);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(-7)), "-7");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
