use std::ops::ControlFlow;

use rust_backprop::{data, seeds, Network, TrainConfig, UpdatePolicy};

fn main() -> rust_backprop::Result<()> {
    let patterns = data::xor();
    let cfg = TrainConfig {
        learning_rate: 0.25,
        tolerance: 0.01,
        max_epochs: 5_000,
    };

    // Same seed weights, with and without momentum.
    for policy in [UpdatePolicy::BiasedDelta, UpdatePolicy::momentum()] {
        let mut net = Network::new(seeds::xor_biased(), policy)?;
        let report = net.train_with(&patterns, cfg, |epoch| {
            if epoch.epoch % 500 == 0 {
                println!("  epoch={} mse={:.6}", epoch.epoch, epoch.mse);
            }
            ControlFlow::Continue(())
        })?;
        println!(
            "{policy:?}: {:?} after {} epochs (mse={:.6})",
            report.state, report.epochs, report.final_mse
        );

        for (input, ideal) in patterns.iter() {
            println!("  x={input:?} y={:.4} ideal={ideal}", net.predict(input)?);
        }
    }

    Ok(())
}
