//! JavaScript variable file writer
//!
//! Each export produces `var <name> = <json>;` files plus a manifest of
//! `#include` directives that a page template pulls in.

use crate::error::{ExportError, ExportResult};
use crate::types::SheetGrades;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Manifest written next to a single-variable export
pub const INCLUDES_FILE: &str = "includes.js";

/// Manifest written by the per-sheet export
pub const COMBINED_FILE: &str = "combined.js";

/// Sheets that get a variable file but stay out of `combined.js`
pub const DEFAULT_EXCLUDED_SHEETS: &[&str] = &["G_U_Wk_L", "TEMPLATE_SHEET"];

/// Files produced by one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    /// Variable files, in write order
    pub files: Vec<PathBuf>,
    pub manifest: PathBuf,
}

/// Writes mappings as JavaScript variable declarations into one output directory
#[derive(Debug, Clone)]
pub struct JsExporter {
    output_dir: PathBuf,
}

impl JsExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Reset the output directory and write `<var_name>.js` plus `includes.js`.
    ///
    /// The directory is deleted recursively before anything is written, so it
    /// must not hold unrelated files. A failure part-way through leaves the
    /// directory incomplete.
    pub fn export<T: Serialize>(&self, data: &T, var_name: &str) -> ExportResult<ExportSummary> {
        if !is_js_identifier(var_name) {
            return Err(ExportError::InvalidName(var_name.to_string()));
        }

        self.reset_output_dir()?;

        let json = to_json_pretty(data)?;
        let file_path = self.output_dir.join(format!("{}.js", var_name));
        fs::write(&file_path, js_var_declaration(var_name, &json))?;
        debug!(path = %file_path.display(), bytes = json.len(), "wrote variable file");

        let manifest = self.output_dir.join(INCLUDES_FILE);
        fs::write(&manifest, includes_manifest(var_name))?;

        info!(
            output_dir = %self.output_dir.display(),
            var_name,
            "exported variable file"
        );

        Ok(ExportSummary {
            output_dir: self.output_dir.clone(),
            files: vec![file_path],
            manifest,
        })
    }

    /// Write one variable file per sheet and a `combined.js` manifest.
    ///
    /// The directory is created if missing but not cleared. Sheets named in
    /// `excluded` still get their own file; they are only left out of the
    /// manifest.
    pub fn export_sheets<S: AsRef<str>>(
        &self,
        grades: &SheetGrades,
        excluded: &[S],
    ) -> ExportResult<ExportSummary> {
        fs::create_dir_all(&self.output_dir)?;

        let mut files = Vec::with_capacity(grades.len());
        let mut includes = Vec::new();

        for (sheet_name, columns) in grades {
            let sheet_name = sheet_name.as_str();
            let var_name = sheet_var_name(sheet_name);
            if !is_js_identifier(&var_name) {
                warn!(
                    sheet = sheet_name,
                    var_name = %var_name,
                    "sheet name is not a valid JavaScript identifier"
                );
            }

            let file_name = format!("{}.js", var_name);
            let file_path = self.output_dir.join(&file_name);
            let json = serde_json::to_string(columns)?;
            fs::write(&file_path, js_var_declaration(&var_name, &json))?;
            debug!(sheet = sheet_name, path = %file_path.display(), "wrote sheet file");
            files.push(file_path);

            if excluded.iter().any(|name| name.as_ref() == sheet_name) {
                debug!(sheet = sheet_name, "left out of combined manifest");
            } else {
                includes.push(format!("#include \"{}\"", file_name));
            }
        }

        let manifest = self.output_dir.join(COMBINED_FILE);
        fs::write(&manifest, includes.join("\n"))?;

        info!(
            output_dir = %self.output_dir.display(),
            sheets = files.len(),
            included = includes.len(),
            "exported sheet files"
        );

        Ok(ExportSummary {
            output_dir: self.output_dir.clone(),
            files,
            manifest,
        })
    }

    fn reset_output_dir(&self) -> ExportResult<()> {
        if self.output_dir.exists() {
            debug!(path = %self.output_dir.display(), "removing previous output");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

/// Serialize with four-space indentation; non-ASCII text is written as-is
pub fn to_json_pretty<T: Serialize>(data: &T) -> ExportResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

pub fn js_var_declaration(var_name: &str, json: &str) -> String {
    format!("var {} = {};", var_name, json)
}

pub fn includes_manifest(var_name: &str) -> String {
    format!(
        "#include \"{name}.js\";\nvar {name}_DATA = {name};",
        name = var_name
    )
}

/// Variable (and file) name for a sheet: spaces become underscores
pub fn sheet_var_name(sheet_name: &str) -> String {
    sheet_name.replace(' ', "_")
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Split a written variable file into its variable name and JSON payload
pub fn parse_js_var(text: &str) -> ExportResult<(&str, &str)> {
    let malformed = || ExportError::InvalidFormat("expected `var <name> = <json>;`".to_string());

    let rest = text.trim().strip_prefix("var ").ok_or_else(malformed)?;
    let (name, json) = rest.split_once('=').ok_or_else(malformed)?;
    let json = json.trim().strip_suffix(';').ok_or_else(malformed)?;
    let name = name.trim();
    if !is_js_identifier(name) {
        return Err(ExportError::InvalidName(name.to_string()));
    }
    Ok((name, json.trim()))
}
