use std::sync::OnceLock;

use proptest::prelude::*;
use rust_backprop::{
    data, seeds, ErrorSignal, Init, Network, TrainConfig, TrainState, UpdatePolicy, Weights,
};

fn cfg(max_epochs: usize) -> TrainConfig {
    TrainConfig {
        learning_rate: 0.25,
        tolerance: 0.01,
        max_epochs,
    }
}

fn trained_momentum_xor() -> &'static Network {
    static NET: OnceLock<Network> = OnceLock::new();
    NET.get_or_init(|| {
        let mut net = Network::new(seeds::xor_biased(), UpdatePolicy::momentum()).unwrap();
        let report = net.train(&data::xor(), cfg(5_000)).unwrap();
        assert!(report.converged());
        assert!(net.weights().is_finite());
        net
    })
}

#[test]
fn plain_network_fits_reduced_patterns() {
    let mut net = Network::new(seeds::xor_plain(), UpdatePolicy::PlainDelta).unwrap();
    let report = net.train(&data::xor_reduced(), cfg(1_500)).unwrap();

    assert_eq!(report.state, TrainState::Converged);
    assert!(report.final_mse <= 0.01);
    assert!(net.evaluate(&data::xor_reduced()).unwrap().mse < 0.02);
}

#[test]
fn biased_network_fits_xor() {
    let mut net = Network::new(seeds::xor_biased(), UpdatePolicy::BiasedDelta).unwrap();
    let report = net.train(&data::xor(), cfg(5_000)).unwrap();

    assert_eq!(report.state, TrainState::Converged);
    assert!(report.epochs > 1_000);

    let eval = net.evaluate(&data::xor()).unwrap();
    for p in &eval.predictions {
        assert!((p.actual - p.ideal).abs() < 0.25, "{p:?}");
    }
}

#[test]
fn momentum_converges_no_slower_than_plain_bias() {
    let mut biased = Network::new(seeds::xor_biased(), UpdatePolicy::BiasedDelta).unwrap();
    let mut momentum = Network::new(seeds::xor_biased(), UpdatePolicy::momentum()).unwrap();

    let slow = biased.train(&data::xor(), cfg(5_000)).unwrap();
    let fast = momentum.train(&data::xor(), cfg(5_000)).unwrap();

    assert!(slow.converged() && fast.converged());
    assert!(
        fast.epochs <= slow.epochs,
        "momentum took {} epochs, plain bias took {}",
        fast.epochs,
        slow.epochs
    );
}

#[test]
fn broadcast_error_signal_fits_reduced_patterns() {
    let mut biased = Network::new(seeds::xor_biased(), UpdatePolicy::BiasedDelta)
        .unwrap()
        .with_error_signal(ErrorSignal::Broadcast);
    let mut momentum = Network::new(seeds::xor_biased(), UpdatePolicy::momentum())
        .unwrap()
        .with_error_signal(ErrorSignal::Broadcast);

    let slow = biased.train(&data::xor_reduced(), cfg(1_000)).unwrap();
    let fast = momentum.train(&data::xor_reduced(), cfg(1_000)).unwrap();

    assert!(slow.converged() && fast.converged());
    assert!(fast.epochs <= slow.epochs);
}

#[test]
fn unbiased_network_cannot_fit_full_xor() {
    // (0,0) drives every hidden unit to exactly 0.5 when there is no bias.
    let mut net = Network::new(seeds::xor_plain(), UpdatePolicy::PlainDelta).unwrap();
    let report = net.train(&data::xor(), cfg(2_000)).unwrap();

    assert_eq!(report.state, TrainState::Exhausted);
    assert_eq!(report.epochs, 2_000);
    assert!(report.final_mse > 0.01);
}

#[test]
fn steep_learning_rate_keeps_weights_finite() {
    let mut net = Network::new(seeds::xor_biased(), UpdatePolicy::momentum()).unwrap();
    let report = net
        .train(
            &data::xor(),
            TrainConfig {
                learning_rate: 50.0,
                tolerance: 1e-9,
                max_epochs: 500,
            },
        )
        .unwrap();

    assert!(report.final_mse.is_finite());
    assert!(net.weights().is_finite());
}

#[test]
fn identical_runs_produce_bit_identical_weights() {
    let run = || {
        let mut net = Network::new(seeds::xor_biased(), UpdatePolicy::momentum()).unwrap();
        let report = net.train(&data::xor(), cfg(1_000)).unwrap();
        (report, net.into_weights())
    };

    let (report_a, a) = run();
    let (report_b, b) = run();

    assert_eq!(report_a.epochs, report_b.epochs);
    assert_eq!(report_a.final_mse.to_bits(), report_b.final_mse.to_bits());
    let bits = |w: &Weights| w.to_flat().iter().map(|v| v.to_bits()).collect::<Vec<u64>>();
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn learning_curve_is_reported_every_epoch() {
    let mut net = Network::new(seeds::xor_biased(), UpdatePolicy::momentum()).unwrap();
    let patterns = data::xor();
    let mut epochs = net.epochs(&patterns, cfg(5_000)).unwrap();

    let curve: Vec<f64> = epochs.by_ref().map(|r| r.mse).collect();
    assert_eq!(epochs.state(), TrainState::Converged);
    assert_eq!(curve.len(), epochs.epoch());
    assert!(curve.last().copied().unwrap() <= 0.01);
    assert!(curve[0] > 0.2);
}

#[test]
fn randomly_seeded_network_reduces_error() {
    let weights = Weights::with_seed(2, &[3, 1], true, Init::Xavier, 42).unwrap();
    let mut net = Network::new(weights, UpdatePolicy::BiasedDelta).unwrap();
    let patterns = data::xor_reduced();

    let first = net.train_epoch(&patterns, 0.25).unwrap();
    let report = net
        .train(
            &patterns,
            TrainConfig {
                tolerance: 1e-4,
                max_epochs: 5_000,
                ..TrainConfig::default()
            },
        )
        .unwrap();

    assert!(report.final_mse < first);
    assert_eq!(net.weights().connection_count(), 3 * 3 + 4);
}

#[test]
fn flat_weights_round_trip_through_training() {
    let net = trained_momentum_xor();
    let flat = net.weights().to_flat();
    let rebuilt = Weights::from_flat(2, &[2, 1], true, &flat).unwrap();
    let copy = Network::new(rebuilt, UpdatePolicy::BiasedDelta).unwrap();

    for (input, _) in data::xor().iter() {
        assert_eq!(
            net.predict(input).unwrap().to_bits(),
            copy.predict(input).unwrap().to_bits()
        );
    }
}

proptest! {
    #[test]
    fn trained_outputs_stay_in_open_unit_interval(a in 0.0_f64..=1.0, b in 0.0_f64..=1.0) {
        let y = trained_momentum_xor().predict(&[a, b]).unwrap();
        prop_assert!(y > 0.0 && y < 1.0, "y={y}");
    }

    #[test]
    fn seed_outputs_stay_in_open_unit_interval(a in -10.0_f64..10.0, b in -10.0_f64..10.0) {
        let net = Network::new(seeds::xor_biased(), UpdatePolicy::BiasedDelta).unwrap();
        let y = net.predict(&[a, b]).unwrap();
        prop_assert!(y > 0.0 && y < 1.0, "y={y}");
    }

    #[test]
    fn inference_is_idempotent(a in -5.0_f64..5.0, b in -5.0_f64..5.0) {
        let net = trained_momentum_xor();
        let first = net.predict(&[a, b]).unwrap();
        let second = net.predict(&[a, b]).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }
}
