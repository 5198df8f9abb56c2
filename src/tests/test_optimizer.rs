use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::history::ObservationHistory;
use crate::network::TwoLayerNetwork;
use crate::optimizer::{Prior, RegularizedSgd};

fn one_observation_history() -> ObservationHistory {
    let mut history = ObservationHistory::new(10, 2, 1);
    history.record_action(0, array![1.0, -0.5].view()).unwrap();
    history.record_reward(0, 0, 3.0).unwrap();
    history
}

#[test]
fn test_regularization_pulls_toward_snapshot() {
    let history = one_observation_history();
    let prior = TwoLayerNetwork::new(
        array![[0.3, -1.2], [0.8, 0.1], [-0.6, 0.4]],
        array![1.5, -0.2, 0.7],
        0.01,
    ).unwrap();
    let mut network = prior.clone();
    network.w1.mapv_inplace(|w| w + 0.1);
    network.w2.mapv_inplace(|w| w - 0.1);

    // a huge noise variance leaves only the prior term
    let sgd = RegularizedSgd::new(1e12, 1.0, 8, 1);
    let mut rng = StdRng::seed_from_u64(9);

    let mut distance = network.distance_sq(&prior);
    for _ in 0..25 {
        sgd.update(&mut network, Prior::Snapshot(&prior), &history, 0, 0, 0.1, None, &mut rng).unwrap();
        let next = network.distance_sq(&prior);
        assert!(next < distance, "distance grew from {} to {}", distance, next);
        distance = next;
    }
    assert!(distance < 1e-3);
}

#[test]
fn test_regularization_pulls_toward_origin() {
    let history = one_observation_history();
    let mut network = TwoLayerNetwork::new(
        array![[0.3, -1.2], [0.8, 0.1]],
        array![1.5, -0.2],
        0.01,
    ).unwrap();
    let origin = TwoLayerNetwork::new(array![[0.0, 0.0], [0.0, 0.0]], array![0.0, 0.0], 0.01).unwrap();

    let sgd = RegularizedSgd::new(1e12, 2.0, 4, 3);
    let mut rng = StdRng::seed_from_u64(9);

    let mut distance = network.distance_sq(&origin);
    for _ in 0..10 {
        sgd.update(&mut network, Prior::Zero, &history, 0, 0, 0.1, Some(0.5), &mut rng).unwrap();
        let next = network.distance_sq(&origin);
        assert!(next < distance);
        distance = next;
    }
}

#[test]
fn test_regularization_weakens_with_time() {
    let mut history = ObservationHistory::new(10, 2, 1);
    for t in 0..10 {
        history.record_action(t, array![1.0, -0.5].view()).unwrap();
        history.record_reward(0, t, 0.0).unwrap();
    }
    let start = TwoLayerNetwork::new(array![[0.0, 0.0]], array![1.0], 0.01).unwrap();
    let sgd = RegularizedSgd::new(1e12, 1.0, 1, 1);
    let mut rng = StdRng::seed_from_u64(2);

    let mut early = start.clone();
    sgd.update(&mut early, Prior::Zero, &history, 0, 0, 0.1, None, &mut rng).unwrap();
    let mut late = start.clone();
    sgd.update(&mut late, Prior::Zero, &history, 0, 9, 0.1, None, &mut rng).unwrap();

    // strength 2 at t = 0 versus 0.2 at t = 9
    assert!((early.w2[0] - 0.8).abs() < 1e-9);
    assert!((late.w2[0] - 0.98).abs() < 1e-9);
}

#[test]
fn test_update_fits_observed_rewards() {
    let mut history = ObservationHistory::new(20, 2, 1);
    let rows = [array![1.0, 0.0], array![0.0, 1.0]];
    for t in 0..20 {
        history.record_action(t, rows[t % 2].view()).unwrap();
        history.record_reward(0, t, if t % 2 == 0 { 1.0 } else { -1.0 }).unwrap();
    }

    let mut rng = StdRng::seed_from_u64(4);
    let mut network = TwoLayerNetwork::random(2, 8, 0.5, 0.01, &mut rng).unwrap();
    let sgd = RegularizedSgd::new(1.0, 10.0, 16, 200);
    sgd.update(&mut network, Prior::Zero, &history, 0, 19, 0.05, None, &mut rng).unwrap();

    let scores = network.predict(array![[1.0, 0.0], [0.0, 1.0]].view()).unwrap();
    assert!(scores[0] > 0.5, "scores {:?}", scores);
    assert!(scores[1] < -0.5, "scores {:?}", scores);
}

#[test]
fn test_sampling_beyond_history_fails() {
    let history = one_observation_history();
    let mut network = TwoLayerNetwork::new(array![[1.0, 1.0]], array![1.0], 0.01).unwrap();
    let sgd = RegularizedSgd::new(1.0, 1.0, 4, 1);
    let mut rng = StdRng::seed_from_u64(0);
    assert!(sgd.update(&mut network, Prior::Zero, &history, 0, 3, 0.1, None, &mut rng).is_err());
}
