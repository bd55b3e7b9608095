use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use class_slim::cmd::{self, RunOptions};
use class_slim::pipeline::ConfigOverrides;
use std::path::PathBuf;
use std::process;

/// Utility-class consolidator for built web output
///
/// class-slim replaces utility-class groups that repeat across a finished
/// build with short synthetic classes and appends one rule per class to
/// the build's stylesheet.
#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Consolidate repeated class groups in a build directory
    Optimize {
        #[command(flatten)]
        run: RunArgs,

        /// Show what would change without writing anything
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Report consolidation candidates without touching the build
    Scan {
        #[command(flatten)]
        run: RunArgs,

        /// Number of candidates to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Initialize class-slim configuration
    Init {
        /// Template to use: conservative, balanced, aggressive
        #[arg(short, long, default_value = "balanced")]
        template: String,

        /// List available templates and exit
        #[arg(long)]
        list: bool,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments shared by `optimize` and `scan`
#[derive(Args)]
struct RunArgs {
    /// Build output directory
    #[arg(value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Configuration file (default: .class-slim.toml in the working directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output as JSON (for CI/CD integration)
    #[arg(long)]
    json: bool,

    /// Minimum number of repeats
    #[arg(long, value_name = "N")]
    min_occurrences: Option<usize>,

    /// Minimum number of tokens in a group
    #[arg(long, value_name = "N")]
    min_tokens: Option<usize>,

    /// Minimum estimated savings in bytes
    #[arg(long, value_name = "BYTES")]
    min_savings: Option<usize>,

    /// Prefix of synthetic class names
    #[arg(long)]
    prefix: Option<String>,

    /// Initial length of the generated name part
    #[arg(long, value_name = "N")]
    name_length: Option<usize>,

    /// Wrap emitted rules in this cascade layer
    #[arg(long)]
    layer: Option<String>,

    /// Stylesheet to inject into, relative to the build directory
    #[arg(long, value_name = "PATH")]
    stylesheet: Option<String>,

    /// Annotate rewritten markup with the original classes
    #[arg(long)]
    debug_attributes: bool,

    /// Only consolidate groups seen in both server and script output
    #[arg(long)]
    consistency_safe: bool,

    /// Keep groups whose rule costs more than it saves
    #[arg(long)]
    force: bool,

    /// Do not write .bak files before modifying artifacts
    #[arg(long)]
    no_backup: bool,
}

impl RunArgs {
    fn into_options(self) -> RunOptions {
        RunOptions {
            target_dir: self.dir,
            config_path: self.config,
            json: self.json,
            overrides: ConfigOverrides {
                min_occurrences: self.min_occurrences,
                min_tokens: self.min_tokens,
                min_savings: self.min_savings,
                prefix: self.prefix,
                name_length: self.name_length,
                layer: self.layer,
                stylesheet: self.stylesheet,
                debug_attributes: self.debug_attributes,
                consistency_safe: self.consistency_safe,
                force: self.force,
                no_backup: self.no_backup,
            },
        }
    }
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match cli.command {
        Some(Commands::Optimize { run, dry_run }) => {
            cmd::cmd_optimize(&run.into_options(), dry_run)
        }
        Some(Commands::Scan { run, limit }) => cmd::cmd_scan(&run.into_options(), limit),
        Some(Commands::Init {
            template,
            list,
            force,
        }) => cmd::cmd_init(&template, list, force),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(shell, &mut Cli::command(), &mut std::io::stdout());
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("class-slim v{}", env!("CARGO_PKG_VERSION"));
            println!("Utility-class consolidator for built web output\n");
            println!("Usage: class-slim <COMMAND>\n");
            println!("Commands:");
            println!("  optimize     Consolidate repeated class groups");
            println!("  scan         Report candidates without writing");
            println!("  init         Initialize class-slim configuration");
            println!("  completions  Generate shell completions");
            println!("\nRun 'class-slim <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use class_slim::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_run_args_become_overrides() {
        let cli = Cli::parse_from([
            "class-slim",
            "scan",
            "dist",
            "--min-tokens",
            "3",
            "--prefix",
            "u-",
            "--no-backup",
        ]);
        let Some(Commands::Scan { run, limit }) = cli.command else {
            panic!("expected scan");
        };
        let options = run.into_options();
        assert_eq!(limit, 20);
        assert_eq!(options.target_dir, PathBuf::from("dist"));
        assert_eq!(options.overrides.min_tokens, Some(3));
        assert_eq!(options.overrides.prefix.as_deref(), Some("u-"));
        assert!(options.overrides.no_backup);
        assert!(!options.overrides.force);
    }
}
