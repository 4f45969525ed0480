use anyhow::Context;
use clap::Parser;
use qreg::gates::{hadamard_on, hadamard_reg};
use qreg::{Operator, Register, emit_dump};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, Write};
use tracing::info;

/// Runs the two-qubit Deutsch circuit on the dense state-vector simulator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for the measurement RNG. Drawn from the OS when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the register after every step.
    #[arg(short, long)]
    dump: bool,

    /// Print dumps as JSON lines instead of text.
    #[arg(long, requires = "dump")]
    json: bool,
}

#[rustfmt::skip]
const ORACLE: [f64; 16] = [
    0.0, 1.0, 0.0, 0.0,
    1.0, 0.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

struct Printer {
    enabled: bool,
    json: bool,
}

impl Printer {
    fn show(&self, step: &str, register: &Register, out: &mut impl Write) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.json {
            emit_dump(&register.dump(), out).context("failed to write JSON dump")?;
        } else {
            writeln!(out, "-- {step}")?;
            write!(out, "{register}")?;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let printer = Printer {
        enabled: cli.dump,
        json: cli.json,
    };
    let mut out = io::stdout().lock();

    info!(seed = ?cli.seed, "starting Deutsch circuit");
    let mut register = Register::new(2, &[1])?;
    printer.show("prepare |01>", &register, &mut out)?;

    hadamard_reg(&mut register)?;
    printer.show("hadamard on both qubits", &register, &mut out)?;

    let oracle = Operator::from_real_matrix(&ORACLE)?;
    oracle.apply_reg(&mut register)?;
    printer.show("oracle", &register, &mut out)?;

    hadamard_on(&mut register, 1)?;
    printer.show("hadamard on qubit 1", &register, &mut out)?;

    let outcome = register.bmeasure(1, &mut rng)?;
    printer.show("measure qubit 1", &register, &mut out)?;
    info!(outcome, "measured qubit 1");

    if outcome == 0 {
        writeln!(out, "constant")?;
    } else {
        writeln!(out, "balanced")?;
    }
    Ok(())
}
