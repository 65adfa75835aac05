//! Differentiate functions given as source text from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dualrewrite::eval::EvalConfig;
use dualrewrite::json::JSON;
use dualrewrite::rewrite::transform;
use dualrewrite::syntax::parse;
use dualrewrite::{evaluate_with, rewrite_source};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dualrewrite")]
#[command(about = "Forward mode automatic differentiation by source rewriting")]
#[command(version)]
struct Cli {
    /// Read the function source from a file
    #[arg(short, long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Maximum nesting of function calls during evaluation
    #[arg(long, global = true, value_name = "N")]
    max_call_depth: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derivative of a function at a point
    Diff {
        /// Function source, e.g. 'x => x * Math.sin(x)'
        source: Option<String>,

        /// Point of differentiation
        #[arg(long, allow_negative_numbers = true)]
        at: f64,

        /// Also print the value of the function
        #[arg(long)]
        value: bool,
    },

    /// Print the function rewritten onto dual numbers
    Rewrite {
        source: Option<String>,

        /// Print the rewritten syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the value and derivative of a function at a point as a dual number
    Eval {
        source: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        at: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = EvalConfig::default();
    if let Some(depth) = cli.max_call_depth {
        config.max_call_depth = depth;
    }

    match &cli.command {
        Commands::Diff { source, at, value } => {
            let source = read_source(source.as_deref(), cli.file.as_ref())?;
            let result = evaluate_with(&source, *at, config)?;
            if *value {
                println!("{}", result.real());
            }
            println!("{}", result.gradient());
        }
        Commands::Rewrite { source, json } => {
            let source = read_source(source.as_deref(), cli.file.as_ref())?;
            if *json {
                let program = parse(&format!("({})", source))?;
                println!("{}", transform(&program).into_program().to_json_pretty()?);
            } else {
                print!("{}", rewrite_source(&source)?);
            }
        }
        Commands::Eval { source, at } => {
            let source = read_source(source.as_deref(), cli.file.as_ref())?;
            println!("{}", evaluate_with(&source, *at, config)?);
        }
    }
    Ok(())
}

/// Source text from the positional argument or from `--file`, but not both.
fn read_source(source: Option<&str>, file: Option<&PathBuf>) -> Result<String> {
    match (source, file) {
        (Some(source), None) => Ok(source.to_string()),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        (Some(_), Some(_)) => bail!("give the function source either inline or with --file, not both"),
        (None, None) => bail!("no function source given"),
    }
}
