use neural_bandit::{
    agent::{build_agent, BanditAgent, EpsilonGreedyAgent, EpsilonSchedule},
    config::{AgentConfig, AgentConfigBuilder, AgentKind},
    env::BanditEnvironment,
};
use ndarray::{array, Array1, Array2, ArrayView2};

/// Fixed action set with a deterministic linear reward
struct LinearEnvironment {
    actions: Array2<f64>,
    theta: Array1<f64>,
}

impl LinearEnvironment {
    fn new() -> Self {
        LinearEnvironment {
            actions: array![[1.0, 0.0], [0.0, 1.0], [0.6, 0.6], [-1.0, 0.2]],
            theta: array![0.3, 1.0],
        }
    }
}

impl BanditEnvironment for LinearEnvironment {
    fn actions(&self) -> ArrayView2<f64> {
        self.actions.view()
    }

    fn step(&mut self, action: usize) -> f64 {
        self.actions.row(action).dot(&self.theta)
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run<E: BanditEnvironment>(agent: &mut dyn BanditAgent, env: &mut E, steps: usize) -> Vec<usize> {
    (0..steps)
        .map(|t| {
            let action = agent.pick_action(t).unwrap();
            assert!(action < env.actions().nrows());
            let reward = env.step(action);
            agent.update_observation(t, action, reward).unwrap();
            action
        })
        .collect()
}

#[test]
fn test_end_to_end_two_actions() {
    init_logger();

    let config = AgentConfigBuilder::new(2, 4)
        .time_horizon(100)
        .prior_var(10.0)
        .noise_var(1.0)
        .learning_rate(0.1)
        .num_gradient_steps(10)
        .batch_size(32)
        .build()
        .unwrap();
    let actions = array![[1.0, 0.0], [0.0, 1.0]];
    let mut agent = EpsilonGreedyAgent::with_seed(config, actions.clone(), EpsilonSchedule::Fixed(0.0), 7).unwrap();

    // action 0 always pays 1.0 and action 1 always pays -1.0
    for t in 0..60 {
        let action = t % 2;
        let reward = if action == 0 { 1.0 } else { -1.0 };
        agent.update_observation(t, action, reward).unwrap();
    }

    let scores = agent.network().predict(actions.view()).unwrap();
    assert!(scores[0] > scores[1], "scores {:?}", scores);
    assert_eq!(agent.pick_action(60).unwrap(), 0);
}

#[test]
fn test_agents_are_interchangeable() {
    init_logger();

    let config = AgentConfigBuilder::new(2, 8)
        .time_horizon(60)
        .prior_var(1.0)
        .noise_var(1.0)
        .learning_rate(0.01)
        .batch_size(16)
        .build()
        .unwrap();
    let kinds = [
        AgentKind::EpsilonGreedy { epsilon_param: 0.1 },
        AgentKind::AnnealingEpsilonGreedy { epsilon_param: 10.0 },
        AgentKind::Dropout { drop_prob: 0.5 },
        AgentKind::Ensemble { num_models: 5 },
    ];

    for kind in &kinds {
        let mut env = LinearEnvironment::new();
        let mut agent = build_agent(config.clone(), kind, env.actions().to_owned(), 3).unwrap();
        let picks = run(agent.as_mut(), &mut env, 60);
        assert_eq!(picks.len(), 60);
    }
}

#[test]
fn test_same_seed_reproduces_every_variant() {
    let config = AgentConfigBuilder::new(2, 8)
        .time_horizon(30)
        .learning_rate(0.01)
        .batch_size(8)
        .build()
        .unwrap();
    let kinds = [
        AgentKind::AnnealingEpsilonGreedy { epsilon_param: 3.0 },
        AgentKind::Dropout { drop_prob: 0.3 },
        AgentKind::Ensemble { num_models: 4 },
    ];

    for kind in &kinds {
        let picks: Vec<Vec<usize>> = (0..2)
            .map(|_| {
                let mut env = LinearEnvironment::new();
                let mut agent = build_agent(config.clone(), kind, env.actions().to_owned(), 1234).unwrap();
                run(agent.as_mut(), &mut env, 30)
            })
            .collect();
        assert_eq!(picks[0], picks[1], "{:?} is not reproducible", kind);
    }
}

#[test]
fn test_config_from_json_drives_agent() {
    let config = AgentConfig::from_json(
        r#"{
            "input_dim": 2,
            "hidden_dim": 4,
            "time_horizon": 20,
            "prior_var": 1.0,
            "noise_var": 0.5,
            "batch_size": 4,
            "lr_decay": 0.99
        }"#,
    ).unwrap();
    let kind: AgentKind = serde_json::from_str(r#"{"kind": "annealing_epsilon_greedy", "epsilon_param": 2.0}"#).unwrap();

    let mut env = LinearEnvironment::new();
    let mut agent = build_agent(config, &kind, env.actions().to_owned(), 5).unwrap();
    assert_eq!(agent.exploration_rate(2), Some(0.5));
    run(agent.as_mut(), &mut env, 20);

    // the horizon bounds the history
    assert!(agent.update_observation(20, 0, 0.0).is_err());
}

#[test]
fn test_build_agent_validates_kind() {
    let config = AgentConfigBuilder::new(2, 4).build().unwrap();
    let actions = array![[1.0, 0.0]];
    assert!(build_agent(config.clone(), &AgentKind::Dropout { drop_prob: 1.5 }, actions.clone(), 0).is_err());
    assert!(build_agent(config, &AgentKind::Ensemble { num_models: 0 }, actions, 0).is_err());
}
