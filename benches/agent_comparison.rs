//! Benchmark comparison of the exploration agents
//!
//! Each iteration runs a full pick/update loop on a synthetic problem whose
//! reward is itself a random two-layer network:
//! - Epsilon-greedy (fixed and annealing)
//! - Dropout
//! - Ensemble sampling

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array2, ArrayView2};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use neural_bandit::agent::build_agent;
use neural_bandit::config::{AgentConfigBuilder, AgentKind};
use neural_bandit::env::BanditEnvironment;
use neural_bandit::network::TwoLayerNetwork;
use rand::rngs::StdRng;
use rand::SeedableRng;

const INPUT_DIM: usize = 10;
const HIDDEN_DIM: usize = 20;
const NUM_ACTIONS: usize = 50;
const HORIZON: usize = 100;

/// Fixed action set scored by a random ground-truth network
struct RandomNetworkBandit {
    actions: Array2<f64>,
    rewards: Vec<f64>,
}

impl RandomNetworkBandit {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let actions = Array2::random_using((NUM_ACTIONS, INPUT_DIM), Normal::new(0.0, 1.0).unwrap(), &mut rng);
        let truth = TwoLayerNetwork::random(INPUT_DIM, HIDDEN_DIM, 1.0, 0.01, &mut rng).unwrap();
        let rewards = truth.predict(actions.view()).unwrap().to_vec();
        RandomNetworkBandit { actions, rewards }
    }
}

impl BanditEnvironment for RandomNetworkBandit {
    fn actions(&self) -> ArrayView2<f64> {
        self.actions.view()
    }

    fn step(&mut self, action: usize) -> f64 {
        self.rewards[action]
    }
}

fn bench_agents(c: &mut Criterion) {
    let config = AgentConfigBuilder::new(INPUT_DIM, HIDDEN_DIM)
        .time_horizon(HORIZON)
        .prior_var(1.0)
        .noise_var(1.0)
        .learning_rate(0.01)
        .batch_size(32)
        .build()
        .unwrap();

    let kinds = [
        ("epsilon_greedy", AgentKind::EpsilonGreedy { epsilon_param: 0.05 }),
        ("annealing", AgentKind::AnnealingEpsilonGreedy { epsilon_param: 10.0 }),
        ("dropout", AgentKind::Dropout { drop_prob: 0.5 }),
        ("ensemble", AgentKind::Ensemble { num_models: 10 }),
    ];

    let mut group = c.benchmark_group("agent_loop");
    group.sample_size(10);
    for (name, kind) in &kinds {
        group.bench_with_input(BenchmarkId::from_parameter(name), kind, |b, kind| {
            b.iter(|| {
                let mut env = RandomNetworkBandit::new(0);
                let mut agent = build_agent(config.clone(), kind, env.actions().to_owned(), 1).unwrap();
                let mut total = 0.0;
                for t in 0..HORIZON {
                    let action = agent.pick_action(t).unwrap();
                    let reward = env.step(action);
                    agent.update_observation(t, action, reward).unwrap();
                    total += reward;
                }
                total
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_agents);
criterion_main!(benches);
