mod logging;
mod store;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use avt_parser::{line_col, parse_script};
use avt_transpile::{transpile, TranspilerConfig};
use clap::{Parser, Subcommand};

use crate::store::{ConfigStore, FileStore};

#[derive(Parser)]
#[command(name = "avt", version, about = "Rewrite AiScript 0.19 scripts for AiScript 1.x")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// More logging (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Preference file (defaults to the user config directory).
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a legacy script for the 1.x grammar.
    Transpile {
        /// Input script, or `-` for stdin.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Insert or update the `/// @ <version>` line. Overrides the
        /// stored preference.
        #[arg(long)]
        set_version_notation: Option<bool>,
    },
    /// Parse the script with the legacy grammar and report any syntax error.
    Check { input: PathBuf },
    /// Parse and dump the legacy AST.
    Parse {
        input: PathBuf,
        /// JSON instead of the debug form.
        #[arg(long)]
        ast: bool,
    },
    /// Show or change the stored preferences.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Set {
        #[arg(long)]
        set_version_notation: bool,
    },
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let store = open_store(cli.config_file)?;

    match cli.command {
        Commands::Transpile {
            input,
            output,
            set_version_notation,
        } => {
            let source = read_input(&input)?;
            let mut config = store.load()?;
            if let Some(set) = set_version_notation {
                config.set_version_notation = set;
            }
            let out = transpile(&source, &config)
                .map_err(|e| anyhow!("{}: {e}", input.display()))?;
            match &output {
                Some(path) => std::fs::write(path, &out)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{out}"),
            }
        }
        Commands::Check { input } => {
            let source = read_input(&input)?;
            match parse_script(&source) {
                Ok(_) => eprintln!("OK: {}", input.display()),
                Err(e) => {
                    let (line, column) = line_col(&source, e.position());
                    return Err(anyhow!("{}:{line}:{column}: {e}", input.display()));
                }
            }
        }
        Commands::Parse { input, ast } => {
            let source = read_input(&input)?;
            let nodes = parse_script(&source)?;
            if ast {
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                println!("{nodes:#?}");
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = store.load()?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Set {
                set_version_notation,
            } => {
                store.save(&TranspilerConfig {
                    set_version_notation,
                })?;
                eprintln!("saved to {}", store.path().display());
            }
            ConfigAction::Reset => store.reset()?,
        },
    }

    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Result<FileStore> {
    let path = path
        .or_else(FileStore::default_path)
        .context("no config directory; pass --config-file")?;
    Ok(FileStore::new(path))
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}
