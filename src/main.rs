use anyhow::Context;
use clap::{Parser, Subcommand};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlsx2js::cli;
use xlsx2js::types::ColumnRef;
use xlsx2js::writer::DEFAULT_EXCLUDED_SHEETS;

#[derive(Parser)]
#[command(name = "xlsx2js")]
#[command(about = "Export spreadsheet sheets as embeddable JavaScript variables.")]
#[command(long_about = "xlsx2js - spreadsheet data for web page templates

Reads .xlsx/.xls/.ods workbooks and writes `var <name> = <json>;` files
plus an #include manifest.

COMMANDS:
  sheets   - List sheets with their sizes
  show     - Print a block of cells
  dict     - One sheet as a coordinate-keyed dictionary (+ includes.js)
  grades   - Every sheet as column records (+ combined.js)
  run      - Execute the jobs of a YAML export plan
  inspect  - Describe a written variable file

EXAMPLES:
  xlsx2js sheets CA_BA_Grade_1.xlsx
  xlsx2js dict CA_BA_Grade_1.xlsx -s \"G1 CA\" -k 5 -c 7,8,9 -o output777 -n G1_CA
  xlsx2js grades CA_BA_Grade_1.xlsx -o grades
  xlsx2js run export.yaml")]
#[command(version)]
struct Cli {
    /// Log filter (e.g. warn, info, xlsx2js=debug)
    #[arg(long, global = true, env = "XLSX2JS_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a workbook
    Sheets {
        /// Path to workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
        workbook: PathBuf,
    },

    #[command(long_about = "Print a block of cells from one sheet.

Rows and columns are 1-based inclusive spans. Columns accept letters.

EXAMPLES:
  xlsx2js show book.xlsx -s \"G1 CA\" --rows 1:10 --columns E:I
  xlsx2js show book.xlsx -s Sheet1 --rows 5")]
    /// Print a block of cells
    Show {
        /// Path to workbook
        workbook: PathBuf,

        /// Sheet name
        #[arg(short, long)]
        sheet: String,

        /// Row span, e.g. 2:10 (default: all rows)
        #[arg(long, value_parser = cli::parse_span)]
        rows: Option<RangeInclusive<usize>>,

        /// Column span, e.g. E:I or 5:9 (default: all columns)
        #[arg(long, value_parser = cli::parse_span)]
        columns: Option<RangeInclusive<usize>>,
    },

    #[command(long_about = "Export one sheet as a coordinate-keyed dictionary.

Every row becomes an entry keyed by the key cell's coordinate (e.g. E5):
  \"E5\": [\"<key cell>\", \"<value col 1>\", \"<value col 2>\", ...]

The output directory is DELETED and recreated, then two files are written:
  <name>.js     var <name> = {...};
  includes.js   #include \"<name>.js\"; var <name>_DATA = <name>;")]
    /// Export one sheet as a coordinate-keyed dictionary
    Dict {
        /// Path to workbook
        workbook: PathBuf,

        /// Sheet name
        #[arg(short, long)]
        sheet: String,

        /// Key column (index or letters)
        #[arg(short, long)]
        key_column: ColumnRef,

        /// Value columns, comma separated (indices or letters)
        #[arg(short = 'c', long, value_delimiter = ',')]
        value_columns: Vec<ColumnRef>,

        /// Output directory (replaced on every run)
        #[arg(short, long)]
        output_dir: PathBuf,

        /// JavaScript variable name
        #[arg(short = 'n', long, default_value = "data")]
        var_name: String,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Export every sheet as column records.

Row 1 holds the headers; each header is sanitized into a key and maps to
  [{\"value\": ..., \"row\": ..., \"column\": ...}, ...]

Writes <sheet_name>.js per sheet (spaces become underscores) and a
combined.js manifest. Excluded sheets still get a file but are left out
of combined.js.")]
    /// Export every sheet as column records
    Grades {
        /// Path to workbook
        workbook: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Sheets to leave out of combined.js (default: G_U_Wk_L, TEMPLATE_SHEET)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the jobs of a YAML export plan
    Run {
        /// Path to plan file
        plan: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Describe a written variable file
    Inspect {
        /// Path to a .js file written by dict or grades
        file: PathBuf,
    },
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Sheets { workbook } => {
            let context = format!("failed to list sheets of {}", workbook.display());
            cli::sheets(workbook).context(context)
        }

        Commands::Show {
            workbook,
            sheet,
            rows,
            columns,
        } => {
            let context = format!("failed to show sheet '{}'", sheet);
            cli::show(workbook, sheet, rows, columns).context(context)
        }

        Commands::Dict {
            workbook,
            sheet,
            key_column,
            value_columns,
            output_dir,
            var_name,
            verbose,
        } => {
            let context = format!("failed to export sheet '{}'", sheet);
            cli::dict(
                workbook,
                sheet,
                key_column,
                value_columns,
                output_dir,
                var_name,
                verbose,
            )
            .context(context)
        }

        Commands::Grades {
            workbook,
            output_dir,
            exclude,
            verbose,
        } => {
            let exclude = if exclude.is_empty() {
                DEFAULT_EXCLUDED_SHEETS
                    .iter()
                    .map(|name| name.to_string())
                    .collect()
            } else {
                exclude
            };
            let context = format!("failed to export sheets of {}", workbook.display());
            cli::grades(workbook, output_dir, exclude, verbose).context(context)
        }

        Commands::Run { plan, verbose } => {
            let context = format!("failed to run plan {}", plan.display());
            cli::run(plan, verbose).context(context)
        }

        Commands::Inspect { file } => {
            let context = format!("failed to inspect {}", file.display());
            cli::inspect(file).context(context)
        }
    }
}
