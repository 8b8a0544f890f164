//! # prisma-nestjs-dto
//!
//! Prisma generator emitting NestJS DTO decorators and enum mappings.
//!
//! ## Usage
//!
//! ```prisma
//! generator nestjsDto {
//!   provider        = "prisma-nestjs-dto"
//!   output          = "../src/generated/nestjs-dto"
//!   classValidation = "true"
//! }
//! ```
//!
//! ```bash
//! # Run by Prisma (speaks the generator protocol on stdin/stderr)
//! prisma-nestjs-dto
//!
//! # Offline run from a DMMF dump
//! prisma-nestjs-dto generate --dmmf dmmf.json --output ./generated
//!
//! # Preview without writing
//! prisma-nestjs-dto generate --dmmf dmmf.json --dry-run
//!
//! # Check generated files are current
//! prisma-nestjs-dto validate --dmmf dmmf.json
//!
//! # Initialize configuration
//! prisma-nestjs-dto init
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use prisma_nestjs_dto::GeneratedFile;
use prisma_nestjs_dto_cli::{
    config::{CliArgs, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    logging::LogConfig,
    pipeline,
    rpc::GeneratorServer,
    writer::{FileStatus, OutputWriter},
};

#[derive(Parser)]
#[command(name = "prisma-nestjs-dto")]
#[command(author, version, about = "Generate NestJS DTO decorators from a Prisma schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the Prisma generator protocol on stdin/stderr (default)
    Serve,

    /// Generate outputs from a DMMF JSON file
    Generate {
        /// DMMF document (or dumped generate params) to read
        #[arg(short, long)]
        dmmf: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip class-validator decorators
        #[arg(long)]
        no_class_validation: bool,

        /// Skip @nestjs/swagger decorators
        #[arg(long)]
        no_dependencies: bool,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated files are up-to-date
    Validate {
        /// DMMF document (or dumped generate params) to read
        #[arg(short, long)]
        dmmf: PathBuf,

        /// Output directory holding the generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match &cli.command {
        None | Some(Commands::Serve) => LogConfig::protocol().init(),
        Some(_) => LogConfig::default().init(),
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(),

        Commands::Generate {
            dmmf,
            output,
            dry_run,
            config,
            no_class_validation,
            no_dependencies,
        } => {
            let args = CliArgs {
                output,
                class_validation: no_class_validation.then_some(false),
                no_dependencies: no_dependencies.then_some(true),
                ..Default::default()
            };
            cmd_generate(dmmf, args, dry_run, config)
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate {
            dmmf,
            output,
            config,
        } => cmd_validate(dmmf, output, config),
    }
}

/// Serve command implementation.
fn cmd_serve() -> Result<(), CliError> {
    let server = GeneratorServer::default();
    let stdin = io::stdin();
    let mut stderr = io::stderr();
    server.serve(stdin.lock(), &mut stderr)?;
    Ok(())
}

/// Generate command implementation.
fn cmd_generate(
    dmmf: PathBuf,
    args: CliArgs,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &args);

    println!("{}", "Reading DMMF document...".cyan());
    let document = pipeline::load_document(&dmmf)?;
    println!(
        "  Found {} model(s) and {} enum(s)",
        document.datamodel.models.len().to_string().green(),
        document.datamodel.enums.len().to_string().green()
    );

    println!("{}", "Generating DTO decorators...".cyan());
    let output = pipeline::generate(&config, &document)?;
    println!(
        "  Planned {} model(s), {} file(s) to write",
        output.plans.len().to_string().green(),
        output.files.len().to_string().green()
    );

    let report = OutputWriter::new(dry_run).write_all(&output.files)?;
    for (file, outcome) in output.files.iter().zip(&report.outcomes) {
        match outcome.status {
            FileStatus::Written { bytes } => {
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    outcome.path.display()
                );
            }
            FileStatus::Unchanged => {
                println!("{} Unchanged {}", "·".dimmed(), outcome.path.display());
            }
            FileStatus::Previewed => {
                println!(
                    "{} Would write to {}:",
                    "[dry-run]".yellow(),
                    outcome.path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", file.content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    if !dry_run {
        println!(
            "  {} written, {} unchanged",
            report.written().to_string().green(),
            report.unchanged()
        );
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    OutputWriter::new(false).write_file(&GeneratedFile {
        path: output.clone(),
        content: ConfigManager::default_config_content().to_string(),
    })?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(
    dmmf: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    println!("{}", "Validating generated files...".cyan());

    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            output,
            ..Default::default()
        },
    );

    let document = pipeline::load_document(&dmmf)?;
    let generated = pipeline::generate(&config, &document)?;
    let stale = pipeline::stale_files(&generated.files);

    if stale.is_empty() {
        println!("{} Generated files are up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Generated files are out of date:", "✗".red());
        for path in &stale {
            println!("  {}", path.display());
        }
        println!("  Run 'prisma generate' or 'prisma-nestjs-dto generate' to update");
        Err(CliError::Validation(format!(
            "{} file(s) out of date",
            stale.len()
        )))
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
