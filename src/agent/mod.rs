//! # Bandit Agents Module
//!
//! Three agents for action-set bandits whose reward is modelled by a two-layer
//! network. They share the network, the observation history and the
//! regularized SGD update, and differ only in how uncertainty drives the choice
//! of action.
//!
//! ## Available Agents
//!
//! - **EpsilonGreedyAgent**: random action with a fixed or annealing probability
//! - **DropoutAgent**: greedy action under a randomly masked network
//! - **EnsembleAgent**: greedy action under one randomly chosen member of an
//!   ensemble trained on perturbed rewards around random priors
//!
//! Every agent implements [`BanditAgent`], so a driver can swap variants
//! without changing its loop:
//!
//! ```rust
//! use neural_bandit::agent::build_agent;
//! use neural_bandit::config::{AgentConfigBuilder, AgentKind};
//! use ndarray::array;
//!
//! let config = AgentConfigBuilder::new(2, 8)
//!     .time_horizon(20)
//!     .learning_rate(0.01)
//!     .batch_size(8)
//!     .build()
//!     .unwrap();
//! let actions = array![[1.0, 0.0], [0.0, 1.0]];
//!
//! for kind in [
//!     AgentKind::AnnealingEpsilonGreedy { epsilon_param: 5.0 },
//!     AgentKind::Dropout { drop_prob: 0.5 },
//!     AgentKind::Ensemble { num_models: 4 },
//! ] {
//!     let mut agent = build_agent(config.clone(), &kind, actions.clone(), 0).unwrap();
//!     for t in 0..5 {
//!         let action = agent.pick_action(t).unwrap();
//!         let reward = if action == 0 { 1.0 } else { 0.0 };
//!         agent.update_observation(t, action, reward).unwrap();
//!     }
//! }
//! ```
//!
//! Random sources are owned by the agents and injected at construction, so two
//! agents built with the same seed produce identical trajectories.

pub mod traits;

mod dropout;
mod ensemble;
mod epsilon_greedy;
mod single;

pub use dropout::DropoutAgent;
pub use ensemble::{EnsembleAgent, EnsembleMember};
pub use epsilon_greedy::{EpsilonGreedyAgent, EpsilonSchedule};
pub use single::{SingleModel, INIT_WEIGHT_STD};
pub use traits::{BanditAgent, Choice};

use ndarray::{Array2, ArrayView2};

use crate::config::{AgentConfig, AgentKind};
use crate::error::{Result, BanditError};
use crate::history::ObservationHistory;

/// Build any agent variant behind the common capability contract
pub fn build_agent(
    config: AgentConfig,
    kind: &AgentKind,
    actions: Array2<f64>,
    seed: u64,
) -> Result<Box<dyn BanditAgent>> {
    kind.validate()?;
    let agent: Box<dyn BanditAgent> = match *kind {
        AgentKind::EpsilonGreedy { epsilon_param } => Box::new(EpsilonGreedyAgent::with_seed(
            config,
            actions,
            EpsilonSchedule::Fixed(epsilon_param),
            seed,
        )?),
        AgentKind::AnnealingEpsilonGreedy { epsilon_param } => Box::new(EpsilonGreedyAgent::with_seed(
            config,
            actions,
            EpsilonSchedule::Annealing(epsilon_param),
            seed,
        )?),
        AgentKind::Dropout { drop_prob } => Box::new(DropoutAgent::with_seed(config, actions, drop_prob, seed)?),
        AgentKind::Ensemble { num_models } => Box::new(EnsembleAgent::with_seed(config, actions, num_models, seed)?),
    };
    Ok(agent)
}

pub(crate) fn validate_actions(actions: ArrayView2<f64>, input_dim: usize) -> Result<()> {
    if actions.nrows() == 0 {
        return Err(BanditError::EmptyActionSet);
    }
    if actions.ncols() != input_dim {
        return Err(BanditError::dimension_mismatch(
            format!("actions with {} features", input_dim),
            format!("actions with {} features", actions.ncols()),
        ));
    }
    Ok(())
}

/// Reject an observation before any state is touched
pub(crate) fn check_observation(
    history: &ObservationHistory,
    num_actions: usize,
    time_step: usize,
    action: usize,
    reward: f64,
) -> Result<()> {
    if action >= num_actions {
        return Err(BanditError::InvalidAction {
            action,
            max_actions: num_actions,
        });
    }
    if !reward.is_finite() {
        return Err(BanditError::NumericalError(format!("non-finite reward {} at step {}", reward, time_step)));
    }
    history.check_time_step(time_step)
}
