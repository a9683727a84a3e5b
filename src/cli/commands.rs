use crate::config::load_plan;
use crate::core::{GradeCollector, KeyedDictBuilder};
use crate::error::{ExportError, ExportResult};
use crate::excel::{coords, SheetReader};
use crate::types::{CellValue, ColumnRef};
use crate::writer::{parse_js_var, ExportSummary, JsExporter};
use colored::Colorize;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Parse an inclusive 1-based span: `3`, `2:10`, `E:I`
pub fn parse_span(s: &str) -> Result<RangeInclusive<usize>, String> {
    let bound = |part: &str| {
        part.parse::<ColumnRef>()
            .map(ColumnRef::index)
            .map_err(|e| e.to_string())
    };

    let (start, end) = match s.split_once(':') {
        Some((start, end)) => (bound(start)?, bound(end)?),
        None => {
            let single = bound(s)?;
            (single, single)
        }
    };

    if start == 0 {
        return Err(format!("span {:?} must start at 1 or later", s));
    }
    Ok(start..=end)
}

fn open_workbook(workbook: &Path, verbose: bool) -> ExportResult<SheetReader> {
    if verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let reader = SheetReader::open(workbook)?;
    if verbose {
        println!("   Found {} sheets\n", reader.sheets().len());
    }
    Ok(reader)
}

fn print_summary(summary: &ExportSummary) {
    for file in &summary.files {
        println!("   {} {}", "✓".green(), file.display());
    }
    println!("   {} {}", "✓".green(), summary.manifest.display());
}

/// Execute the sheets command
pub fn sheets(workbook: PathBuf) -> ExportResult<()> {
    println!("{}", "📚 xlsx2js - Sheets".bold().green());
    println!("   Workbook: {}\n", workbook.display());

    let reader = SheetReader::open(&workbook)?;
    if reader.sheets().is_empty() {
        println!("{}", "⚠️  No readable sheets found".yellow());
        return Ok(());
    }

    for sheet in reader.sheets() {
        if sheet.is_empty() {
            println!("   {} (no cells)", sheet.name().bright_blue().bold());
        } else {
            println!(
                "   {} ({} rows × {} columns)",
                sheet.name().bright_blue().bold(),
                sheet.height(),
                sheet.width()
            );
        }
    }
    println!();

    Ok(())
}

/// Execute the show command - print a block of cells
pub fn show(
    workbook: PathBuf,
    sheet: String,
    rows: Option<RangeInclusive<usize>>,
    columns: Option<RangeInclusive<usize>>,
) -> ExportResult<()> {
    let reader = SheetReader::open(&workbook)?;
    let (height, width) = {
        let found = reader.sheet(&sheet)?;
        (found.height(), found.width())
    };
    if height == 0 || width == 0 {
        println!("{} {} (no cells)", "📋".bold(), sheet.bright_blue().bold());
        return Ok(());
    }
    let rows = rows.unwrap_or(1..=height);
    let columns = columns.unwrap_or(1..=width);

    println!(
        "{} {}!{}:{}",
        "📋".bold(),
        sheet.bright_blue().bold(),
        coords::coordinate(*rows.start(), *columns.start()),
        coords::coordinate(*rows.end(), *columns.end())
    );

    let block = reader.range_values(&sheet, rows.clone(), columns)?;
    for (row, values) in rows.zip(block) {
        let cells: Vec<String> = values.iter().map(format_cell).collect();
        println!("   {:>4} │ {}", row.to_string().dimmed(), cells.join(" │ "));
    }

    Ok(())
}

fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => "·".dimmed().to_string(),
        CellValue::Text(s) => s.replace('\n', "⏎"),
        other => other.to_string().cyan().to_string(),
    }
}

/// Execute the dict command - one sheet as a coordinate-keyed dictionary
pub fn dict(
    workbook: PathBuf,
    sheet: String,
    key_column: ColumnRef,
    value_columns: Vec<ColumnRef>,
    output_dir: PathBuf,
    var_name: String,
    verbose: bool,
) -> ExportResult<()> {
    println!("{}", "🔥 xlsx2js - Dictionary Export".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Sheet:    {}", sheet.bright_blue());
    println!("   Output:   {}\n", output_dir.display());

    let reader = open_workbook(&workbook, verbose)?;

    let builder = KeyedDictBuilder::new(
        key_column.index(),
        value_columns.iter().map(|column| column.index()),
    );
    let dict = builder.build(&reader, &sheet)?;

    if verbose {
        println!(
            "   Key column {} + {} value columns → {} entries\n",
            coords::column_letter(builder.key_column()).cyan(),
            builder.value_columns().len(),
            dict.len()
        );
        println!("{}", "💾 Writing JavaScript files...".cyan());
    }

    let summary = JsExporter::new(&output_dir).export(&dict, &var_name)?;
    print_summary(&summary);

    println!("\n{}", "✅ Export Complete!".bold().green());
    println!("   Variables: {} / {}_DATA\n", var_name, var_name);

    Ok(())
}

/// Execute the grades command - every sheet as column records
pub fn grades(
    workbook: PathBuf,
    output_dir: PathBuf,
    exclude: Vec<String>,
    verbose: bool,
) -> ExportResult<()> {
    println!("{}", "🔥 xlsx2js - Sheet Export".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Output:   {}\n", output_dir.display());

    let reader = open_workbook(&workbook, verbose)?;
    let grades = GradeCollector::new(&reader).collect();

    if verbose {
        for (sheet_name, columns) in grades.iter() {
            let rows = columns.values().next().map(Vec::len).unwrap_or(0);
            println!("   📊 Sheet: {}", sheet_name.bright_blue());
            println!("      {} columns, {} data rows", columns.len(), rows);
        }
        println!();
        println!("{}", "💾 Writing JavaScript files...".cyan());
    }

    let summary = JsExporter::new(&output_dir).export_sheets(&grades, exclude.as_slice())?;
    print_summary(&summary);

    println!("\n{}", "✅ Export Complete!".bold().green());
    println!("   {} sheet files written\n", summary.files.len());

    Ok(())
}

/// Execute the run command - every job of an export plan
pub fn run(plan_path: PathBuf, verbose: bool) -> ExportResult<()> {
    println!("{}", "🔥 xlsx2js - Export Plan".bold().green());
    println!("   Plan: {}\n", plan_path.display());

    let plan = load_plan(&plan_path)?;
    if verbose {
        println!("   Workbook: {}", plan.workbook.display());
        println!("   Jobs:     {}\n", plan.jobs.len());
    }

    let summaries = plan.run()?;
    for summary in &summaries {
        println!("   📁 {}", summary.output_dir.display().to_string().bright_blue());
        if verbose {
            print_summary(summary);
        }
    }

    println!("\n{}", "✅ All jobs complete!".bold().green());
    println!("   {} jobs run\n", summaries.len());

    Ok(())
}

/// Execute the inspect command - describe a written variable file
pub fn inspect(file: PathBuf) -> ExportResult<()> {
    let content = fs::read_to_string(&file)?;
    let (var_name, json) = parse_js_var(&content)?;
    let value: serde_json::Value = serde_json::from_str(json)?;

    println!("{}", "🔍 xlsx2js - Inspect".bold().green());
    println!("   File:     {}", file.display());
    println!("   Variable: {}", var_name.bright_blue().bold());

    match &value {
        serde_json::Value::Object(map) => {
            println!("   Keys:     {}", map.len());
        }
        serde_json::Value::Array(items) => {
            println!("   Items:    {}", items.len());
        }
        _ => {
            return Err(ExportError::InvalidFormat(format!(
                "{} does not hold an object or array",
                file.display()
            )));
        }
    }
    println!();

    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
