use anyhow::{anyhow, Result};
use circuit_boards::board::render_trace;
use circuit_boards::document::{parse_document, EvalOptions};
use circuit_boards::files::{evaluate_file, expand_inputs, read_circuit_file};
use circuit_boards::generate::{generate, render_document, GenerateConfig};
use circuit_boards::segment::SegmentKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "circuits", version, about = "Evaluate ASCII-art logic circuit boards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print `off`/`on` for every board of the given files
    Eval {
        /// Files, glob patterns, or comma-separated lists of either
        #[arg(required = true)]
        inputs: Vec<String>,
        /// One JSON object per board instead of bare labels
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Show each board's segments and how its branches were resolved
    Inspect {
        input: PathBuf,
    },
    /// Print random boards with known results
    Generate {
        #[arg(long)]
        seed: u64,
        #[arg(long, default_value_t = 3)]
        depth: usize,
        #[arg(long, default_value_t = 1)]
        boards: usize,
        #[arg(long, default_value_t = 8)]
        dashes: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Eval {
            inputs,
            json,
            parallel,
        } => eval(&inputs, json, parallel)?,
        Commands::Inspect { input } => inspect(input)?,
        Commands::Generate {
            seed,
            depth,
            boards,
            dashes,
        } => {
            let config = GenerateConfig {
                seed,
                depth,
                boards,
                dashes,
            };
            let generated = generate(&config);
            for (idx, board) in generated.iter().enumerate() {
                info!(board = idx, expected = board.expected.label(), "generated board");
            }
            print!("{}", render_document(&generated));
        }
    }
    Ok(())
}

fn eval(inputs: &[String], json: bool, parallel: bool) -> Result<()> {
    let options = EvalOptions { parallel };
    let mut failures = 0;
    for path in expand_inputs(inputs)? {
        let report = evaluate_file(&path, &options)?;
        failures += report.failures();
        if json {
            println!("{}", report.to_ndjson()?);
        } else if report.failures() == 0 {
            println!("{}", report.labels()?);
        }
    }
    if failures > 0 {
        return Err(anyhow!("{} board(s) could not be evaluated", failures));
    }
    Ok(())
}

fn inspect(input: PathBuf) -> Result<()> {
    let text = read_circuit_file(&input)?;
    for (idx, board) in parse_document(&text).iter().enumerate() {
        println!("board {} blake3:{}", idx, board.hash());
        for seg in board.segments() {
            let kind = match seg.kind() {
                SegmentKind::Literal(v) => format!("literal {}", v as u8),
                SegmentKind::Gate(op) => format!("gate {}", op),
                SegmentKind::Invalid => "invalid".to_string(),
            };
            let marker = if seg.is_terminal() { " (output)" } else { "" };
            println!(
                "  [{},{}..{}] {}{}",
                seg.row(),
                seg.first(),
                seg.last(),
                kind,
                marker
            );
        }
        let (result, trace) = board.evaluate_traced();
        print!("{}", render_trace(&trace));
        match result {
            Ok(signal) => println!("  => {}", signal),
            Err(e) => println!("  => error: {}", e),
        }
        println!();
    }
    Ok(())
}
