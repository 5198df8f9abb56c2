use log::debug;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::config::{validate_epsilon, AgentConfig};
use crate::error::Result;
use crate::network::{argmax, TwoLayerNetwork};

use super::single::SingleModel;
use super::traits::{BanditAgent, Choice};

/// How the exploration probability evolves over time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EpsilonSchedule {
    /// Constant `epsilon`
    Fixed(f64),

    /// `epsilon = p / (p + t)`, shrinking with every step
    Annealing(f64),
}

impl EpsilonSchedule {
    /// Exploration probability at time step `t`.
    ///
    /// An annealing schedule with `p = 0` never explores, including at `t = 0`.
    pub fn epsilon(&self, t: usize) -> f64 {
        match *self {
            EpsilonSchedule::Fixed(epsilon) => epsilon,
            EpsilonSchedule::Annealing(p) => {
                let denom = p + t as f64;
                if denom == 0.0 { 0.0 } else { p / denom }
            }
        }
    }

    pub fn param(&self) -> f64 {
        match *self {
            EpsilonSchedule::Fixed(p) | EpsilonSchedule::Annealing(p) => p,
        }
    }
}

/// Epsilon-greedy agent over a two-layer network
///
/// With probability epsilon the agent picks a uniformly random action, otherwise
/// the arg-max of the deterministic forward pass over the action set.
///
/// # Example
///
/// ```rust
/// use neural_bandit::agent::{BanditAgent, EpsilonGreedyAgent, EpsilonSchedule};
/// use neural_bandit::config::AgentConfigBuilder;
/// use ndarray::array;
///
/// let config = AgentConfigBuilder::new(2, 4).time_horizon(10).build().unwrap();
/// let actions = array![[1.0, 0.0], [0.0, 1.0]];
/// let mut agent = EpsilonGreedyAgent::with_seed(config, actions, EpsilonSchedule::Fixed(0.1), 42).unwrap();
///
/// let action = agent.pick_action(0).unwrap();
/// agent.update_observation(0, action, 1.0).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct EpsilonGreedyAgent<R: Rng = StdRng> {
    model: SingleModel,
    schedule: EpsilonSchedule,
    rng: R,
}

impl EpsilonGreedyAgent<StdRng> {
    /// Create an agent whose random source is seeded from `seed`
    pub fn with_seed(config: AgentConfig, actions: Array2<f64>, schedule: EpsilonSchedule, seed: u64) -> Result<Self> {
        Self::new(config, actions, schedule, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> EpsilonGreedyAgent<R> {
    /// Create an agent with randomly initialised weights drawn from `rng`
    pub fn new(config: AgentConfig, actions: Array2<f64>, schedule: EpsilonSchedule, mut rng: R) -> Result<Self> {
        validate_epsilon(schedule.param())?;
        let model = SingleModel::random(config, actions, None, &mut rng)?;
        debug!(
            "EpsilonGreedyAgent: {:?}, hidden_dim = {}, {} actions",
            schedule,
            model.config().hidden_dim,
            model.num_actions()
        );
        Ok(EpsilonGreedyAgent { model, schedule, rng })
    }

    /// Create an agent starting from explicit weights
    pub fn from_network(
        config: AgentConfig,
        actions: Array2<f64>,
        network: TwoLayerNetwork,
        schedule: EpsilonSchedule,
        rng: R,
    ) -> Result<Self> {
        validate_epsilon(schedule.param())?;
        let model = SingleModel::new(config, actions, network, None)?;
        Ok(EpsilonGreedyAgent { model, schedule, rng })
    }

    /// Decide whether to explore at `time_step`
    pub fn decide(&mut self, time_step: usize) -> Choice {
        let epsilon = self.schedule.epsilon(time_step);
        if self.rng.gen::<f64>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Greedy action under the current weights
    pub fn greedy_action(&mut self) -> Result<usize> {
        let scores = self.model.scores(&mut self.rng)?;
        argmax(scores.view())
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        self.schedule
    }

    pub fn model(&self) -> &SingleModel {
        &self.model
    }

    pub fn network(&self) -> &TwoLayerNetwork {
        self.model.network()
    }

    pub fn set_actions(&mut self, actions: Array2<f64>) -> Result<()> {
        self.model.set_actions(actions)
    }
}

impl<R: Rng> BanditAgent for EpsilonGreedyAgent<R> {
    fn pick_action(&mut self, time_step: usize) -> Result<usize> {
        match self.decide(time_step) {
            Choice::Explore => Ok(self.rng.gen_range(0..self.model.num_actions())),
            Choice::Exploit => self.greedy_action(),
        }
    }

    fn update_observation(&mut self, time_step: usize, action: usize, reward: f64) -> Result<()> {
        self.model.update_observation(time_step, action, reward, &mut self.rng)?;
        Ok(())
    }

    fn num_actions(&self) -> usize {
        self.model.num_actions()
    }

    fn exploration_rate(&self, time_step: usize) -> Option<f64> {
        Some(self.schedule.epsilon(time_step))
    }
}
