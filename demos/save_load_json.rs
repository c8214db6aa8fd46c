use rust_backprop::{data, seeds, Network, TrainConfig, UpdatePolicy, Weights};

fn main() -> rust_backprop::Result<()> {
    let mut net = Network::new(seeds::xor_biased(), UpdatePolicy::momentum())?;
    net.train(&data::xor(), TrainConfig::default())?;

    let path = "target/tmp_xor_weights.json";
    net.weights().save_json(path)?;

    let loaded = Weights::load_json(path)?;
    let restored = Network::new(loaded, UpdatePolicy::momentum())?;
    for (input, ideal) in data::xor().iter() {
        println!(
            "x={input:?} trained={:.4} restored={:.4} ideal={ideal}",
            net.predict(input)?,
            restored.predict(input)?
        );
    }
    println!("saved and loaded weights: {path}");
    Ok(())
}
