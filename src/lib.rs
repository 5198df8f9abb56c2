//! # Neural Bandit - Exploration Agents for Neural-Network Bandits
//!
//! Agents for action-set bandit problems whose reward is modelled by a small
//! two-layer neural network. At each step the agent receives a finite set of
//! candidate actions (feature vectors), picks one, observes a scalar reward and
//! retrains its network.
//!
//! The forward pass, backward pass and regularized minibatch SGD are written by
//! hand on top of `ndarray`. Three exploration strategies are built on them:
//!
//! - **Epsilon-greedy**: uniformly random action with a fixed or annealing
//!   probability, greedy otherwise
//! - **Dropout**: hidden units dropped at random in every forward pass, including
//!   at decision time
//! - **Ensemble sampling**: several networks, each regularized toward its own
//!   random prior and trained on independently perturbed rewards; each decision
//!   follows one member chosen at random
//!
//! ## Quick Start
//!
//! ```rust
//! use neural_bandit::agent::{BanditAgent, EnsembleAgent};
//! use neural_bandit::config::AgentConfigBuilder;
//! use ndarray::array;
//!
//! let config = AgentConfigBuilder::new(2, 16)
//!     .time_horizon(100)
//!     .prior_var(1.0)
//!     .noise_var(1.0)
//!     .learning_rate(0.01)
//!     .batch_size(16)
//!     .build()
//!     .unwrap();
//! let actions = array![[1.0, 0.0], [0.0, 1.0], [0.7, 0.7]];
//!
//! let mut agent = EnsembleAgent::with_seed(config, actions, 10, 42).unwrap();
//! for t in 0..20 {
//!     let action = agent.pick_action(t).unwrap();
//!     let reward = if action == 2 { 1.0 } else { 0.0 };
//!     agent.update_observation(t, action, reward).unwrap();
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - The capability contract and the three agent variants
//! - [`config`] - Hyperparameters, builders and JSON loading
//! - [`debug`] - Finite-difference gradient checks and non-finite weight detection
//! - [`env`] - Interface expected from environments
//! - [`error`] - Error types and result handling
//! - [`history`] - Pre-allocated observation buffers and minibatch sampling
//! - [`network`] - Two-layer network forward and backward passes
//! - [`optimizer`] - Regularized SGD and learning-rate decay

pub mod agent;
pub mod config;
pub mod debug;
pub mod env;
pub mod error;
pub mod history;
pub mod network;
pub mod optimizer;

pub use agent::{
    build_agent, BanditAgent, DropoutAgent, EnsembleAgent, EpsilonGreedyAgent,
    EpsilonSchedule,
};
pub use config::{AgentConfig, AgentConfigBuilder, AgentKind};
pub use error::{BanditError, Result};

#[cfg(test)]
mod tests;
