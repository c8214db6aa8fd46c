//! Backprop demo CLI.
//!
//! Trains one of the three update policies from the literal XOR seed weights,
//! prints the per-epoch MSE learning curve, then prints the trained network's
//! output for every pattern.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use rust_backprop::{
    data, seeds, ErrorSignal, Network, PatternSet, TrainConfig, TrainState, UpdatePolicy,
    DEFAULT_MOMENTUM,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    /// No bias weights
    Plain,
    /// Trailing bias weight per neuron
    Bias,
    /// Bias plus momentum
    Momentum,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Patterns {
    /// All four XOR patterns
    Xor,
    /// {(0,1)->0, (1,1)->1}
    Reduced,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Signal {
    Backpropagated,
    Broadcast,
}

/// Train a 2-2-1 sigmoid network by backpropagation
#[derive(Parser)]
#[command(name = "rust-backprop")]
#[command(version)]
#[command(about = "Train a 2-2-1 sigmoid network on XOR by backpropagation")]
struct Cli {
    /// Weight-update policy
    #[arg(long, value_enum, default_value_t = Variant::Momentum)]
    variant: Variant,

    /// Training patterns
    #[arg(long, value_enum, default_value_t = Patterns::Xor)]
    patterns: Patterns,

    /// How the output error reaches the hidden layer
    #[arg(long, value_enum, default_value_t = Signal::Backpropagated)]
    signal: Signal,

    #[arg(long, default_value_t = 0.25)]
    learning_rate: f64,

    /// Momentum rate (momentum variant only)
    #[arg(long, default_value_t = DEFAULT_MOMENTUM)]
    momentum: f64,

    /// Stop once an epoch's MSE is at or below this value
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,

    #[arg(long, default_value_t = 10_000)]
    max_epochs: usize,

    /// Do not print the per-epoch learning curve
    #[arg(short, long)]
    quiet: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_target(false).init();

    match run(&cli) {
        Ok(TrainState::Converged) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> rust_backprop::Result<TrainState> {
    let (weights, policy) = match cli.variant {
        Variant::Plain => (seeds::xor_plain(), UpdatePolicy::PlainDelta),
        Variant::Bias => (seeds::xor_biased(), UpdatePolicy::BiasedDelta),
        Variant::Momentum => (
            seeds::xor_biased(),
            UpdatePolicy::BiasedMomentumDelta {
                momentum: cli.momentum,
            },
        ),
    };
    let signal = match cli.signal {
        Signal::Backpropagated => ErrorSignal::Backpropagated,
        Signal::Broadcast => ErrorSignal::Broadcast,
    };
    let patterns: PatternSet = match cli.patterns {
        Patterns::Xor => data::xor(),
        Patterns::Reduced => data::xor_reduced(),
    };

    let mut net = Network::new(weights, policy)?.with_error_signal(signal);
    let cfg = TrainConfig {
        learning_rate: cli.learning_rate,
        tolerance: cli.tolerance,
        max_epochs: cli.max_epochs,
    };

    let report = net.train_with(&patterns, cfg, |epoch| {
        if !cli.quiet {
            println!("{:>6} {:.6}", epoch.epoch, epoch.mse);
        }
        std::ops::ControlFlow::Continue(())
    })?;

    println!(
        "{:?} after {} epochs, mse={:.6}",
        report.state, report.epochs, report.final_mse
    );

    let xor = data::xor();
    let eval = net.evaluate(&xor)?;
    for (prediction, (input, _)) in eval.predictions.iter().zip(xor.iter()) {
        println!(
            "x={input:?} actual={:.4} ideal={}",
            prediction.actual, prediction.ideal
        );
    }
    println!("xor mse={:.6}", eval.mse);

    for (l, layer) in net.weights().layers().iter().enumerate() {
        for (n, neuron) in layer.iter().enumerate() {
            println!("w[{l}][{n}] = {neuron:.4?}");
        }
    }

    Ok(report.state)
}
