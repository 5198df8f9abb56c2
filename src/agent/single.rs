use ndarray::{Array1, Array2, ArrayView2};
use rand::Rng;

use crate::config::AgentConfig;
use crate::debug::ensure_finite;
use crate::error::Result;
use crate::history::ObservationHistory;
use crate::network::{sample_mask, TwoLayerNetwork};
use crate::optimizer::{ExponentialDecay, Prior, RegularizedSgd};

use super::{check_observation, validate_actions};

/// Scale of the initial weights of single-model agents
pub const INIT_WEIGHT_STD: f64 = 1e-2;

/// One network with its observation history and optimiser state.
///
/// Shared by the epsilon-greedy and dropout agents, which differ only in how
/// they turn the model's scores into a decision. The model regularizes toward
/// the origin.
#[derive(Clone, Debug)]
pub struct SingleModel {
    config: AgentConfig,
    network: TwoLayerNetwork,
    actions: Array2<f64>,
    history: ObservationHistory,
    sgd: RegularizedSgd,
    learning_rate: ExponentialDecay,
    drop_prob: Option<f64>,
}

impl SingleModel {
    pub fn new(
        config: AgentConfig,
        actions: Array2<f64>,
        network: TwoLayerNetwork,
        drop_prob: Option<f64>,
    ) -> Result<Self> {
        config.validate()?;
        validate_actions(actions.view(), config.input_dim)?;
        if network.input_dim() != config.input_dim || network.hidden_dim() != config.hidden_dim {
            return Err(crate::error::BanditError::dimension_mismatch(
                format!("network of shape ({}, {})", config.hidden_dim, config.input_dim),
                format!("network of shape ({}, {})", network.hidden_dim(), network.input_dim()),
            ));
        }

        Ok(SingleModel {
            history: ObservationHistory::new(config.time_horizon, config.input_dim, 1),
            sgd: RegularizedSgd::from_config(&config),
            learning_rate: ExponentialDecay::new(config.learning_rate, config.lr_decay),
            config,
            network,
            actions,
            drop_prob,
        })
    }

    /// Sample `1e-2 * N(0, 1)` initial weights
    pub fn random<R: Rng + ?Sized>(
        config: AgentConfig,
        actions: Array2<f64>,
        drop_prob: Option<f64>,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let network = TwoLayerNetwork::random(
            config.input_dim,
            config.hidden_dim,
            INIT_WEIGHT_STD,
            config.leaky_coeff,
            rng,
        )?;
        Self::new(config, actions, network, drop_prob)
    }

    /// Score every action in the current set.
    ///
    /// With dropout enabled a fresh mask is drawn on every call.
    pub fn scores<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array1<f64>> {
        let mask = self
            .drop_prob
            .map(|p| sample_mask((self.actions.nrows(), self.network.hidden_dim()), p, rng));
        let (out, _) = self.network.forward(self.actions.view(), mask)?;
        Ok(out)
    }

    /// Record an observation, retrain, and decay the learning rate.
    ///
    /// Returns the loss of the last minibatch.
    pub fn update_observation<R: Rng + ?Sized>(
        &mut self,
        time_step: usize,
        action: usize,
        reward: f64,
        rng: &mut R,
    ) -> Result<f64> {
        check_observation(&self.history, self.actions.nrows(), time_step, action, reward)?;

        self.history.record_action(time_step, self.actions.row(action))?;
        self.history.record_reward(0, time_step, reward)?;

        let loss = self.sgd.update(
            &mut self.network,
            Prior::Zero,
            &self.history,
            0,
            time_step,
            self.learning_rate.current(),
            self.drop_prob,
            rng,
        )?;
        self.learning_rate.step();

        ensure_finite(&self.network)?;
        Ok(loss)
    }

    pub fn set_actions(&mut self, actions: Array2<f64>) -> Result<()> {
        validate_actions(actions.view(), self.config.input_dim)?;
        self.actions = actions;
        Ok(())
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn network(&self) -> &TwoLayerNetwork {
        &self.network
    }

    pub fn actions(&self) -> ArrayView2<f64> {
        self.actions.view()
    }

    pub fn history(&self) -> &ObservationHistory {
        &self.history
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate.current()
    }

    pub fn num_actions(&self) -> usize {
        self.actions.nrows()
    }
}
