// gridkit CLI - render grid documents and replay interaction scripts

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use gridkit_cli::render::{render, OutputFormat};
use gridkit_cli::script::{parse_script, Session};
use gridkit_config::Settings;
use gridkit_engine::{Grid, Row, ValueCodec};
use gridkit_io::{document, ColumnSpec, DocumentError, GridDocument};

use exit_codes::{
    document_exit_code, EXIT_DOCUMENT_WRITE, EXIT_ERROR, EXIT_SCRIPT_PARSE, EXIT_SCRIPT_READ, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "gridkit")]
#[command(about = "Editable data grid, driven headless")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "GRIDKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Log state transitions to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a grid document as display text
    #[command(after_help = "\
Examples:
  gridkit show donors.json
  gridkit show donors.toml --format json")]
    Show {
        /// Grid document (.json or .toml)
        document: PathBuf,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = Format::Tsv)]
        format: Format,
    },

    /// Replay an interaction script against a grid document
    #[command(after_help = "\
Examples:
  gridkit run donors.json --script edit.grid
  gridkit run donors.json --script paste.grid --format json -o donors.json
  gridkit run donors.json --script edit.grid -o donors.csv")]
    Run {
        /// Grid document (.json or .toml)
        document: PathBuf,

        /// Script file, one step per line
        #[arg(long, short = 's')]
        script: PathBuf,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = Format::Tsv)]
        format: Format,

        /// Write the result: .csv/.tsv export display text, anything else a JSON document
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Suppress the selection summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Tsv,
    Csv,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Tsv => OutputFormat::Tsv,
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  gridkit-engine ", env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        Commands::Show { document, format } => cmd_show(&settings, &document, format),
        Commands::Run { document, script, format, output, quiet } => {
            cmd_run(&settings, &document, &script, format, output.as_deref(), quiet)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn document(err: DocumentError) -> Self {
        let code = document_exit_code(&err);
        let hint = match &err {
            DocumentError::UnsupportedFormat(_) => Some("use a .json or .toml document".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// show
// ============================================================================

fn cmd_show(settings: &Settings, path: &Path, format: Format) -> Result<(), CliError> {
    let (columns, grid) = open_grid(settings, path)?;
    print_grid(&grid, &columns, format)
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    settings: &Settings,
    path: &Path,
    script_path: &Path,
    format: Format,
    output: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let (columns, grid) = open_grid(settings, path)?;

    let source = std::fs::read_to_string(script_path)
        .map_err(|e| CliError::new(EXIT_SCRIPT_READ, format!("{}: {}", script_path.display(), e)))?;
    let steps = parse_script(&source).map_err(|e| {
        CliError::new(EXIT_SCRIPT_PARSE, e.to_string()).with_hint("see `gridkit run --help` for the step syntax")
    })?;

    let mut session = Session::new(grid).with_command_modifiers(settings.command_modifiers());
    session.run(&steps);
    session.grid.teardown();

    if let Some(out) = output {
        write_output(&session.grid, &columns, out)?;
    }

    print_grid(&session.grid, &columns, format)?;
    if !quiet {
        eprintln!("{}", session.selection_summary());
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn open_grid(settings: &Settings, path: &Path) -> Result<(Vec<ColumnSpec>, Grid<Row>), CliError> {
    if !path.exists() {
        return Err(CliError::new(EXIT_USAGE, format!("{}: no such file", path.display())));
    }
    let document = GridDocument::load(path).map_err(CliError::document)?;
    let columns = document.columns.clone();
    let (descriptors, rows) = document.into_grid_parts();
    log::debug!("Loaded {} row(s), {} column(s) from {}", rows.len(), descriptors.len(), path.display());

    let mut next_id = rows.len();
    let grid = Grid::new(rows, descriptors, move || {
        next_id += 1;
        Row::new(format!("row-{}", next_id))
    })
    .with_codec(ValueCodec::new(settings.display_locale()));
    Ok((columns, grid))
}

fn write_output(grid: &Grid<Row>, columns: &[ColumnSpec], path: &Path) -> Result<(), CliError> {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    let exported = match ext.as_deref() {
        Some("csv") => gridkit_io::csv::export(grid, path),
        Some("tsv") => gridkit_io::csv::export_tsv(grid, path),
        _ => return document::save_rows(path, columns, grid.rows()).map_err(CliError::document),
    };
    exported.map_err(|e| CliError::new(EXIT_DOCUMENT_WRITE, format!("{}: {}", path.display(), e)))?;
    log::debug!("Exported display text to {}", path.display());
    Ok(())
}

fn print_grid(grid: &Grid<Row>, columns: &[ColumnSpec], format: Format) -> Result<(), CliError> {
    let text = render(grid, columns, format.into()).map_err(|e| CliError::new(EXIT_ERROR, e))?;
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}
