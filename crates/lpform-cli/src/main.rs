use clap::{Args, Parser, Subcommand};
use lpform_lang::{DEFAULT_DELIMITER, LpError, LpParser, Matrices, ValidationReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lpform")]
#[command(about = "Turns LP problem text into canonical and dual matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the problem text comes from: a file or an inline string
#[derive(Args)]
struct Source {
    /// The problem file
    file: Option<PathBuf>,
    /// Problem text given inline instead of a file
    #[arg(short, long)]
    text: Option<String>,
    /// Line delimiter for --text
    #[arg(short, long, default_value = DEFAULT_DELIMITER)]
    delimiter: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a problem for syntax errors
    Check {
        #[command(flatten)]
        source: Source,
    },
    /// Show the variables of one line, or of the whole problem
    Vars {
        #[command(flatten)]
        source: Source,
        /// Zero-based line index
        #[arg(short, long)]
        line: Option<usize>,
    },
    /// Print the primal (or dual) matrices
    Matrices {
        #[command(flatten)]
        source: Source,
        /// Print the dual problem instead
        #[arg(long)]
        dual: bool,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Write the primal (or dual) matrices to a dump file
    Dump {
        #[command(flatten)]
        source: Source,
        /// The dump file to write
        #[arg(short, long)]
        output: PathBuf,
        /// Dump the dual problem instead
        #[arg(long)]
        dual: bool,
    },
    /// Read a matrix dump file back
    Read {
        /// The dump file
        file: PathBuf,
        /// The dump holds a dual problem
        #[arg(long)]
        dual: bool,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("LPFORM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fail(context: &str, err: LpError) -> ! {
    eprintln!("{}: {}", context, err);
    std::process::exit(1);
}

fn open(source: &Source) -> LpParser {
    LpParser::from_options(source.file.as_deref(), source.text.as_deref(), &source.delimiter)
        .unwrap_or_else(|e| fail("Error reading problem", e))
}

/// Opens the problem and requires a clean validation run
fn open_checked(source: &Source) -> LpParser {
    let mut parser = open(source);
    let errors = parser
        .detect_errors()
        .unwrap_or_else(|e| fail("Error checking problem", e));
    if !errors.is_empty() {
        eprintln!("{}", ValidationReport(&errors));
        std::process::exit(1);
    }
    parser
}

fn print_matrices(matrices: &Matrices, format: &str) {
    if format == "json" {
        let named: serde_json::Map<String, serde_json::Value> = matrices
            .named()
            .into_iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&named)
                .unwrap_or_else(|_| "Error: could not render json".to_string())
        );
    } else {
        print!("{}", lpform_matrix::write_dump(matrices));
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { source } => {
            let mut parser = open(&source);
            let errors = parser
                .detect_errors()
                .unwrap_or_else(|e| fail("Error checking problem", e));
            println!("{}", ValidationReport(&errors));
            if !errors.is_empty() {
                std::process::exit(1);
            }
            if let Ok(dims) = parser.dimensions() {
                println!("  {} constraints", dims.m);
                println!("  {} variables", dims.n);
            }
        }
        Commands::Vars { source, line } => {
            let parser = open(&source);
            match line {
                Some(line) => {
                    let vars = parser
                        .variables(line)
                        .unwrap_or_else(|e| fail("Error reading variables", e));
                    println!("existing: {}", vars.existing.join(" "));
                    println!("extended: {}", vars.extended.join(" "));
                }
                None => {
                    let vars = parser
                        .all_variables()
                        .unwrap_or_else(|e| fail("Error reading variables", e));
                    println!("{}", vars.join(" "));
                }
            }
        }
        Commands::Matrices {
            source,
            dual,
            format,
        } => {
            let parser = open_checked(&source);
            let matrices = if dual {
                parser.dual_matrices()
            } else {
                parser.matrices()
            }
            .unwrap_or_else(|e| fail("Error building matrices", e));
            print_matrices(&matrices, &format);
        }
        Commands::Dump {
            source,
            output,
            dual,
        } => {
            let parser = open_checked(&source);
            if let Err(e) = parser.write_matrices(&output, dual) {
                fail("Error writing matrices", e);
            }
            println!("✓ wrote {}", output.display());
        }
        Commands::Read { file, dual, format } => {
            let matrices = LpParser::read_matrices(&file, dual)
                .unwrap_or_else(|e| fail("Error reading matrices", e));
            print_matrices(&matrices, &format);
        }
    }
}
