//! Synthesizes a gate tree for a Boolean expression.
//!
//! Run with:
//! ```bash
//! cargo run --example synthesize -- "A & (B | ~C)" --nands
//! cargo run --example synthesize -- "A ^ B ^ C ^ D" --max-inputs 3 --dot > tree.dot
//! ```

use std::collections::HashMap;

use clap::Parser;
use gate_synth::expr::Expr;
use gate_synth::synth::{SynthConfig, SynthOptions, Synthesizer, DEFAULT_MAX_INPUTS};
use gate_synth::value::Value;

#[derive(Debug, Parser)]
#[command(author, version, about = "Gate synthesis from Boolean expressions")]
struct Cli {
    /// Expression, e.g. "A & (B | ~C)"
    expr: String,

    /// Maximum number of inputs per gate
    #[arg(long, default_value_t = DEFAULT_MAX_INPUTS)]
    max_inputs: usize,

    /// Use two-input gates only
    #[arg(long)]
    two_inputs: bool,

    /// Use NAND gates only
    #[arg(long)]
    nands: bool,

    /// Print the tree in DOT format instead of the summary
    #[arg(long)]
    dot: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        if cli.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let expr: Expr = cli.expr.parse()?;
    let synth = Synthesizer::new(SynthConfig {
        max_inputs: cli.max_inputs,
    })?;
    let options = SynthOptions {
        two_inputs: cli.two_inputs,
        use_nands: cli.nands,
    };
    let tree = synth.synthesize(&expr, options)?;

    if cli.dot {
        print!("{}", tree.to_dot()?);
        return Ok(());
    }

    println!("expr = {}", expr);
    println!("tree = {}", tree);
    println!("gates = {}", tree.gate_count());
    println!("depth = {}", tree.depth());
    println!("max fan-in = {}", tree.max_fan_in());

    // Truth table, checked against the expression.
    let names: Vec<String> = expr.variables().into_iter().collect();
    if names.len() > 6 {
        println!("(truth table skipped: {} variables)", names.len());
        return Ok(());
    }
    println!();
    println!("{} | out", names.join(" "));
    for bits in 0u32..(1 << names.len()) {
        let assignments: HashMap<String, bool> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), (bits >> (names.len() - 1 - i)) & 1 == 1))
            .collect();
        let out = tree.evaluate(&assignments);
        assert_eq!(out, expr.evaluate(&assignments), "synthesized tree disagrees with {}", expr);
        let row: Vec<String> = names
            .iter()
            .map(|name| Value::from(assignments[name]).to_string())
            .collect();
        println!("{} | {}", row.join(" "), Value::from(out));
    }

    Ok(())
}
