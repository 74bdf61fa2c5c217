use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sql_nolock::{apply_nolock, check_files, report, ApplyOptions, HostSyntax, ScanOptions};

#[derive(Parser)]
#[command(name = "sql-nolock")]
#[command(author, version, about = "Add WITH (NOLOCK) hints to SELECT statements embedded in source files")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite files so every table read by a SELECT carries NOLOCK
    Apply {
        #[command(flatten)]
        scan: ScanArgs,

        /// Host string delimiter; doubled inside a literal it stands for itself
        #[arg(long, default_value_t = '"')]
        quote: char,

        /// Character starting a host line comment outside literals
        #[arg(long, default_value_t = '\'')]
        line_comment: char,

        /// Do not treat any character as a host line comment
        #[arg(long, conflicts_with = "line_comment")]
        no_line_comment: bool,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,

        /// Copy each changed file to <file>.bak before writing
        #[arg(long)]
        backup: bool,
    },
    /// Report WITH (NOLOCK) hints glued to the following token
    Check {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Base directory to scan
    #[arg(short, long, env = "NOLOCK_SQL_DIR", default_value = ".")]
    dir: PathBuf,

    /// File extensions to process (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = ".aspx,.aspx.vb,.vb")]
    ext: Vec<String>,

    /// Glob pattern, relative to the base directory, of files to skip
    #[arg(short = 'x', long)]
    exclude: Vec<String>,

    /// Only process files directly inside the base directory
    #[arg(long)]
    no_recursive: bool,

    /// Text encoding label (utf-8, windows-1252, ...)
    #[arg(long, default_value = "utf-8")]
    encoding: String,
}

impl From<ScanArgs> for ScanOptions {
    fn from(args: ScanArgs) -> Self {
        ScanOptions {
            dir: args.dir,
            extensions: args.ext,
            exclude: args.exclude,
            recursive: !args.no_recursive,
            encoding: args.encoding,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "sql_nolock=debug"
    } else {
        "sql_nolock=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Apply {
            scan,
            quote,
            line_comment,
            no_line_comment,
            dry_run,
            backup,
        } => {
            let mut syntax = HostSyntax::with_delimiter(quote);
            if !no_line_comment {
                syntax.line_comment = Some(line_comment);
            }

            let options = ApplyOptions {
                scan: scan.into(),
                dry_run,
                backup,
                syntax,
            };

            let summary = apply_nolock(&options)?;
            report::print_apply_summary(&summary, dry_run);
        }
        Commands::Check { scan } => {
            let summary = check_files(&scan.into())?;
            report::print_check_summary(&summary);
            if summary.has_issues() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
