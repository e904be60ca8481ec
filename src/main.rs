//! blockgen CLI - block program to Rust generator

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use blockgen::errors::print_error;
use blockgen::{BlockgenError, CodeGenerator, Document, GeneratorConfig, RustGenerator};

#[derive(Parser)]
#[command(name = "blockgen", version, about = "Generate Rust source code from visual block programs")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate Rust code from a block document
    Generate(GenerateArgs),

    /// Run a generation pass and report errors without writing output
    Check(CheckArgs),

    /// List the supported block types
    Blocks,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Block document (JSON)
    file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generator configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Loop trap template; `%1` is replaced by the quoted loop block id
    #[arg(long)]
    loop_trap: Option<String>,

    /// Prepend a "generated file" banner
    #[arg(long)]
    header: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Block document (JSON)
    file: PathBuf,

    /// Generator configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Check(args) => check(args),
        Command::Blocks => {
            let generator = RustGenerator::new();
            for tag in generator.registry().block_types() {
                println!("{}", tag);
            }
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig, BlockgenError> {
    match path {
        Some(path) => GeneratorConfig::load(path),
        None => Ok(GeneratorConfig::default()),
    }
}

fn generate(args: GenerateArgs) -> ExitCode {
    let filename = args.file.display().to_string();
    let source = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(args.config.as_ref())
        .and_then(|config| config.with_overrides(args.loop_trap, args.header))
    {
        Ok(config) => config,
        Err(e) => {
            print_error("", &filename, &e);
            return ExitCode::FAILURE;
        }
    };

    let code = match Document::from_json(&source)
        .and_then(|doc| RustGenerator::with_config(config).generate(&doc))
    {
        Ok(code) => code,
        Err(e) => {
            print_error(&source, &filename, &e);
            return ExitCode::FAILURE;
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &code) {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", code),
    }
    ExitCode::SUCCESS
}

fn check(args: CheckArgs) -> ExitCode {
    let filename = args.file.display().to_string();
    let source = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            print_error("", &filename, &e);
            return ExitCode::FAILURE;
        }
    };

    let document = match Document::from_json(&source) {
        Ok(doc) => doc,
        Err(e) => {
            print_error(&source, &filename, &e);
            return ExitCode::FAILURE;
        }
    };

    let mut generator = RustGenerator::with_config(config);
    match generator.generate(&document) {
        Ok(_) => {
            println!(
                "{}: ok ({} top-level stacks, target {})",
                filename,
                document.blocks.len(),
                generator.language_name()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&source, &filename, &e);
            ExitCode::FAILURE
        }
    }
}
