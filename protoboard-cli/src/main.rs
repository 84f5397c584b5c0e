//! Protoboard CLI - layout checks, SVG rendering and interactive editing.

mod shell;

use clap::{Parser, Subcommand, ValueEnum};
use protoboard::{
    default_footprints_path, open_board, write_svg, Diagnostic, DrcEngine, ProtoboardCore,
    RenderOptions, Severity, ValidationOptions, ValidationResult,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "protoboard")]
#[command(about = "Prototyping board layout checker and editor", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run design-rule checks on a board file
    Check {
        /// Path to the board .json file
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Footprint library (defaults to footprints.json next to the board)
        #[arg(short = 'p', long, value_name = "FILE")]
        footprints: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if diagnostics at this severity or higher are found
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Only run the given check (repeatable)
        #[arg(long = "check", value_name = "ID")]
        checks: Vec<String>,
    },

    /// Render the board to SVG with offending pins highlighted
    Render {
        /// Path to the board .json file
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Footprint library (defaults to footprints.json next to the board)
        #[arg(short = 'p', long, value_name = "FILE")]
        footprints: Option<PathBuf>,

        /// Output SVG path
        #[arg(short, long, default_value = "board.svg")]
        output: PathBuf,
    },

    /// List available design-rule checks
    Checks {
        /// Show check descriptions
        #[arg(short, long)]
        verbose: bool,
    },

    /// Edit a board interactively
    Shell {
        /// Path to the board .json file
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Footprint library (defaults to footprints.json next to the board)
        #[arg(short = 'p', long, value_name = "FILE")]
        footprints: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let exit_code = match cli.command {
        Commands::Check {
            board,
            footprints,
            format,
            fail_on,
            checks,
        } => handle_check(&board, footprints, format, fail_on, checks),
        Commands::Render {
            board,
            footprints,
            output,
        } => handle_render(&board, footprints, &output),
        Commands::Checks { verbose } => {
            handle_checks(verbose);
            0
        }
        Commands::Shell { board, footprints } => handle_shell(&board, footprints),
    };

    process::exit(exit_code);
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn footprints_for(board: &Path, footprints: Option<PathBuf>) -> PathBuf {
    footprints.unwrap_or_else(|| default_footprints_path(board))
}

fn handle_check(
    board: &Path,
    footprints: Option<PathBuf>,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    checks: Vec<String>,
) -> i32 {
    let footprints = footprints_for(board, footprints);
    let options = ValidationOptions { checks };

    match ProtoboardCore::validate_board(board, &footprints, options) {
        Ok(result) => {
            output_result(&result, &format);
            if let Some(severity) = fail_on {
                if should_fail(&result, &severity) {
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn should_fail(result: &ValidationResult, severity: &FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Error => result.has_errors(),
        FailOnSeverity::Warning => result.has_warnings_or_errors(),
    }
}

fn output_result(result: &ValidationResult, format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(result),
        OutputFormat::Json => output_json(result),
        OutputFormat::Github => output_github(result),
    }
}

fn output_human(result: &ValidationResult) {
    println!("\nBoard: {}", result.file.display());
    println!("{}", "─".repeat(60));

    if result.total_diagnostics() == 0 {
        println!("  No problems found");
        return;
    }

    let errors: Vec<&Diagnostic> = result
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    let warnings: Vec<&Diagnostic> = result
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();

    if !errors.is_empty() {
        println!("\n  ERRORS:");
        for d in errors {
            println!("    - {}", d.message);
        }
    }
    if !warnings.is_empty() {
        println!("\n  WARNINGS:");
        for d in warnings {
            println!("    - {}", d.message);
        }
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", result.stats.errors);
    println!("    Warnings: {}", result.stats.warnings);
}

fn output_json(result: &ValidationResult) {
    let output = serde_json::json!({
        "file": result.file.display().to_string(),
        "diagnostics": result.diagnostics,
        "stats": result.stats,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn output_github(result: &ValidationResult) {
    for d in &result.diagnostics {
        let level = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("::{} file={}::{}", level, result.file.display(), d.message);
    }
}

fn handle_render(board: &Path, footprints: Option<PathBuf>, output: &Path) -> i32 {
    let footprints = footprints_for(board, footprints);
    let document = match open_board(board, &footprints) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let diagnostics = DrcEngine::with_default_checks().run(&document.board);
    for d in &diagnostics {
        println!("{}", d);
    }
    match write_svg(output, &document.board, &diagnostics, &RenderOptions::default()) {
        Ok(()) => {
            println!("{} updated", output.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_checks(verbose: bool) {
    println!("Available design-rule checks:\n");

    let engine = DrcEngine::with_default_checks();
    for check in engine.checks() {
        println!("  {}", check.id());
        println!("    {}", check.name());
        if verbose {
            println!("    {}", check.description());
        }
        println!();
    }
}

fn handle_shell(board: &Path, footprints: Option<PathBuf>) -> i32 {
    let footprints = footprints_for(board, footprints);
    let document = match open_board(board, &footprints) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut session = shell::Session::new(document, board.to_path_buf());
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match shell::run(&mut session, stdin.lock(), &mut stdout.lock()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
