use log::debug;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{validate_drop_prob, AgentConfig};
use crate::error::Result;
use crate::network::{argmax, TwoLayerNetwork};

use super::single::SingleModel;
use super::traits::BanditAgent;

/// Dropout agent: hidden units are dropped at random in every forward pass,
/// including the one used to choose an action.
///
/// There is no explicit exploration probability. The greedy action under a
/// freshly masked network stands in for a posterior sample, so dropout is
/// never switched off at decision time.
#[derive(Clone, Debug)]
pub struct DropoutAgent<R: Rng = StdRng> {
    model: SingleModel,
    drop_prob: f64,
    rng: R,
}

impl DropoutAgent<StdRng> {
    pub fn with_seed(config: AgentConfig, actions: Array2<f64>, drop_prob: f64, seed: u64) -> Result<Self> {
        Self::new(config, actions, drop_prob, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DropoutAgent<R> {
    pub fn new(config: AgentConfig, actions: Array2<f64>, drop_prob: f64, mut rng: R) -> Result<Self> {
        validate_drop_prob(drop_prob)?;
        let model = SingleModel::random(config, actions, Some(drop_prob), &mut rng)?;
        debug!(
            "DropoutAgent: drop_prob = {}, hidden_dim = {}, {} actions",
            drop_prob,
            model.config().hidden_dim,
            model.num_actions()
        );
        Ok(DropoutAgent { model, drop_prob, rng })
    }

    pub fn from_network(
        config: AgentConfig,
        actions: Array2<f64>,
        network: TwoLayerNetwork,
        drop_prob: f64,
        rng: R,
    ) -> Result<Self> {
        validate_drop_prob(drop_prob)?;
        let model = SingleModel::new(config, actions, network, Some(drop_prob))?;
        Ok(DropoutAgent { model, drop_prob, rng })
    }

    pub fn drop_prob(&self) -> f64 {
        self.drop_prob
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

impl<R: Rng> BanditAgent for DropoutAgent<R> {
    fn pick_action(&mut self, _time_step: usize) -> Result<usize> {
        let scores = self.model.scores(&mut self.rng)?;
        argmax(scores.view())
    }

    fn update_observation(&mut self, time_step: usize, action: usize, reward: f64) -> Result<()> {
        self.model.update_observation(time_step, action, reward, &mut self.rng)?;
        Ok(())
    }

    fn num_actions(&self) -> usize {
        self.model.num_actions()
    }
}
