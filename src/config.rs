//! Export plans - YAML files describing which sheets/columns to export where
//!
//! ```yaml
//! workbook: ./CA_BA_Grade_1.xlsx
//! jobs:
//!   - kind: dict
//!     sheet: G1 CA
//!     key_column: 5
//!     value_columns: [7, 8, 9]
//!     output_dir: output777
//!     var_name: G1_CA
//!   - kind: grades
//!     output_dir: grades
//! ```
//!
//! Relative paths are resolved against the directory containing the plan.

use crate::core::{GradeCollector, KeyedDictBuilder};
use crate::error::{ExportError, ExportResult};
use crate::excel::SheetReader;
use crate::types::ColumnRef;
use crate::writer::{is_js_identifier, ExportSummary, JsExporter, DEFAULT_EXCLUDED_SHEETS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportPlan {
    pub workbook: PathBuf,
    pub jobs: Vec<ExportJob>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ExportJob {
    /// One sheet as a coordinate-keyed dictionary, written with `includes.js`
    Dict {
        sheet: String,
        key_column: ColumnRef,
        #[serde(default)]
        value_columns: Vec<ColumnRef>,
        output_dir: PathBuf,
        var_name: String,
    },
    /// Every sheet as column records, written with `combined.js`
    Grades {
        output_dir: PathBuf,
        #[serde(default = "default_excluded")]
        exclude: Vec<String>,
    },
}

fn default_excluded() -> Vec<String> {
    DEFAULT_EXCLUDED_SHEETS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Load and validate a plan file
pub fn load_plan(path: &Path) -> ExportResult<ExportPlan> {
    let content = std::fs::read_to_string(path)?;
    let plan = parse_plan(&content)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(plan.resolve_paths(base_dir))
}

/// Parse and validate plan YAML without resolving paths
pub fn parse_plan(content: &str) -> ExportResult<ExportPlan> {
    let plan: ExportPlan = serde_yaml::from_str(content)?;
    plan.validate()?;
    Ok(plan)
}

impl ExportPlan {
    pub fn validate(&self) -> ExportResult<()> {
        if self.jobs.is_empty() {
            return Err(ExportError::InvalidFormat(
                "export plan has no jobs".to_string(),
            ));
        }
        for job in &self.jobs {
            if let ExportJob::Dict { var_name, .. } = job {
                if !is_js_identifier(var_name) {
                    return Err(ExportError::InvalidName(var_name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Make relative workbook/output paths relative to `base_dir`
    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        self.workbook = resolve(base_dir, &self.workbook);
        for job in &mut self.jobs {
            match job {
                ExportJob::Dict { output_dir, .. } | ExportJob::Grades { output_dir, .. } => {
                    *output_dir = resolve(base_dir, output_dir);
                }
            }
        }
        self
    }

    /// Open the workbook once and run every job in order
    pub fn run(&self) -> ExportResult<Vec<ExportSummary>> {
        let reader = SheetReader::open(&self.workbook)?;
        self.jobs.iter().map(|job| job.run(&reader)).collect()
    }
}

impl ExportJob {
    pub fn output_dir(&self) -> &Path {
        match self {
            ExportJob::Dict { output_dir, .. } | ExportJob::Grades { output_dir, .. } => {
                output_dir
            }
        }
    }

    pub fn run(&self, reader: &SheetReader) -> ExportResult<ExportSummary> {
        match self {
            ExportJob::Dict {
                sheet,
                key_column,
                value_columns,
                output_dir,
                var_name,
            } => {
                info!(sheet = %sheet, var_name = %var_name, "running dict job");
                let builder = KeyedDictBuilder::new(
                    key_column.index(),
                    value_columns.iter().map(|column| column.index()),
                );
                let dict = builder.build(reader, sheet)?;
                JsExporter::new(output_dir).export(&dict, var_name)
            }
            ExportJob::Grades {
                output_dir,
                exclude,
            } => {
                info!(output_dir = %output_dir.display(), "running grades job");
                let grades = GradeCollector::new(reader).collect();
                JsExporter::new(output_dir).export_sheets(&grades, exclude.as_slice())
            }
        }
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAN: &str = r#"
workbook: ./CA_BA_Grade_1.xlsx
jobs:
  - kind: dict
    sheet: G1 CA
    key_column: E
    value_columns: [7, 8, "I"]
    output_dir: output777
    var_name: G1_CA
  - kind: grades
    output_dir: grades
"#;

    #[test]
    fn test_parse_plan() {
        let plan = parse_plan(PLAN).unwrap();

        assert_eq!(plan.workbook, PathBuf::from("./CA_BA_Grade_1.xlsx"));
        assert_eq!(plan.jobs.len(), 2);
        assert_eq!(
            plan.jobs[0],
            ExportJob::Dict {
                sheet: "G1 CA".to_string(),
                key_column: ColumnRef::new(5),
                value_columns: vec![ColumnRef::new(7), ColumnRef::new(8), ColumnRef::new(9)],
                output_dir: PathBuf::from("output777"),
                var_name: "G1_CA".to_string(),
            }
        );
        assert_eq!(
            plan.jobs[1],
            ExportJob::Grades {
                output_dir: PathBuf::from("grades"),
                exclude: vec!["G_U_Wk_L".to_string(), "TEMPLATE_SHEET".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_plan_custom_exclude() {
        let plan = parse_plan(
            "workbook: a.xlsx\njobs:\n  - kind: grades\n    output_dir: out\n    exclude: []\n",
        )
        .unwrap();
        assert!(matches!(&plan.jobs[0], ExportJob::Grades { exclude, .. } if exclude.is_empty()));
    }

    #[test]
    fn test_parse_plan_rejects_empty_jobs() {
        assert!(matches!(
            parse_plan("workbook: a.xlsx\njobs: []\n"),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_plan_rejects_bad_var_name() {
        let yaml = "workbook: a.xlsx\njobs:\n  - kind: dict\n    sheet: S\n    key_column: 1\n    output_dir: o\n    var_name: G1 CA\n";
        assert!(matches!(parse_plan(yaml), Err(ExportError::InvalidName(_))));
    }

    #[test]
    fn test_parse_plan_rejects_unknown_kind_and_fields() {
        assert!(parse_plan("workbook: a.xlsx\njobs:\n  - kind: csv\n    output_dir: o\n").is_err());
        assert!(parse_plan("workbook: a.xlsx\nextra: 1\njobs:\n  - kind: grades\n    output_dir: o\n").is_err());
    }

    #[test]
    fn test_parse_plan_rejects_misspelled_job_field() {
        let yaml = "workbook: a.xlsx\njobs:\n  - kind: dict\n    sheet: S\n    key_column: 5\n    value_colums: [7, 8, 9]\n    output_dir: o\n    var_name: data\n";
        let err = parse_plan(yaml).unwrap_err();
        assert!(matches!(err, ExportError::Yaml(_)));
        assert!(err.to_string().contains("value_colums"));

        let yaml = "workbook: a.xlsx\njobs:\n  - kind: grades\n    output_dir: o\n    exclude_sheets: []\n";
        assert!(matches!(parse_plan(yaml), Err(ExportError::Yaml(_))));
    }

    #[test]
    fn test_resolve_paths() {
        let plan = parse_plan(PLAN).unwrap().resolve_paths(Path::new("/data/plans"));
        assert_eq!(plan.workbook, PathBuf::from("/data/plans/./CA_BA_Grade_1.xlsx"));
        assert_eq!(plan.jobs[0].output_dir(), Path::new("/data/plans/output777"));
        assert_eq!(plan.jobs[1].output_dir(), Path::new("/data/plans/grades"));
    }
}
