use clap::Parser;
use cse_rust::{CseBatch, Mode};
use std::fs;
use tracing_subscriber::EnvFilter;

/// Common subexpression eliminator for binary expression trees.
#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// Path to batch input: a record count, then one expression per line.
    /// Standard input is read when omitted.
    #[arg(index = 1)]
    input_file: Option<String>,

    /// Indicates that INPUT_FILE should be interpreted as a single in-line expression.
    #[arg(short, requires = "input_file")]
    e: bool,

    /// Whether the parsed tree is rewritten in place or copied.
    #[arg(long, value_enum, default_value_t = ModeArg::Destructive)]
    mode: ModeArg,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// Rewrite the parsed tree in place.
    Destructive,
    /// Build a new tree, leaving the parsed one untouched.
    NonDestructive,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Destructive => Mode::Destructive,
            ModeArg::NonDestructive => Mode::NonDestructive,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let batch = CseBatch::new(args.mode.into());

    let Some(input_file) = args.input_file else {
        if let Err(err) = batch.run_console() {
            println!("Input error: {}", err);
        }
        return;
    };

    if args.e {
        match batch.eliminate_line(&input_file) {
            Ok(result) => println!("{}", result),
            Err(err) => println!("Parsing error: {}", err),
        }
        return;
    }

    let source = match fs::read(&input_file) {
        Ok(x) => x,
        Err(err) => {
            println!("Could not read input: {}", err);
            return;
        }
    };
    match batch.run_vec(source) {
        Ok(output) => print!("{}", String::from_utf8_lossy(&output)),
        Err(err) => println!("Input error: {}", err),
    }
}
