pub mod lr_scheduler;

use log::trace;
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::config::AgentConfig;
use crate::debug::gradient_norm;
use crate::error::Result;
use crate::history::ObservationHistory;
use crate::network::{sample_mask, Gradients, TwoLayerNetwork};

pub use lr_scheduler::ExponentialDecay;

/// Anchor the L2 penalty pulls the weights toward
#[derive(Clone, Copy, Debug)]
pub enum Prior<'a> {
    /// Regularize toward the origin
    Zero,

    /// Regularize toward a fixed weight snapshot of the same shape
    Snapshot(&'a TwoLayerNetwork),
}

impl Prior<'_> {
    /// Add `strength * (W - W_prior)` to the gradients
    pub fn add_pull(&self, gradients: &mut Gradients, network: &TwoLayerNetwork, strength: f64) {
        match self {
            Prior::Zero => {
                gradients.w1.zip_mut_with(&network.w1, |g, &w| *g += strength * w);
                gradients.w2.zip_mut_with(&network.w2, |g, &w| *g += strength * w);
            }
            Prior::Snapshot(prior) => {
                let d1: Array2<f64> = &network.w1 - &prior.w1;
                let d2: Array1<f64> = &network.w2 - &prior.w2;
                gradients.w1.zip_mut_with(&d1, |g, &d| *g += strength * d);
                gradients.w2.zip_mut_with(&d2, |g, &d| *g += strength * d);
            }
        }
    }
}

/// Plain gradient-descent step, `W -= learning_rate * gradient`
pub fn sgd_step(network: &mut TwoLayerNetwork, gradients: &Gradients, learning_rate: f64) {
    network.w1.zip_mut_with(&gradients.w1, |w, &g| *w -= learning_rate * g);
    network.w2.zip_mut_with(&gradients.w2, |w, &g| *w -= learning_rate * g);
}

/// Minibatch SGD on the squared error with an L2 pull toward a prior whose
/// strength decays as `2 / (prior_var * (t + 1))`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegularizedSgd {
    pub noise_var: f64,
    pub prior_var: f64,
    pub batch_size: usize,
    pub num_gradient_steps: usize,
}

impl RegularizedSgd {
    pub fn new(noise_var: f64, prior_var: f64, batch_size: usize, num_gradient_steps: usize) -> Self {
        RegularizedSgd {
            noise_var,
            prior_var,
            batch_size,
            num_gradient_steps,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.noise_var,
            config.prior_var,
            config.batch_size,
            config.num_gradient_steps,
        )
    }

    /// Regularization strength after observing steps `0..=t`
    pub fn prior_strength(&self, t: usize) -> f64 {
        2.0 / (self.prior_var * (t as f64 + 1.0))
    }

    /// Run `num_gradient_steps` minibatch updates on reward `stream` of `history`.
    ///
    /// Minibatches are drawn with replacement from steps `0..=t`. With
    /// `drop_prob` set, every forward pass draws a fresh dropout mask.
    /// Returns the mean squared error of the last minibatch, before its step.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng + ?Sized>(
        &self,
        network: &mut TwoLayerNetwork,
        prior: Prior<'_>,
        history: &ObservationHistory,
        stream: usize,
        t: usize,
        learning_rate: f64,
        drop_prob: Option<f64>,
        rng: &mut R,
    ) -> Result<f64> {
        let strength = self.prior_strength(t);
        let mut last_loss = 0.0;
        let mut last_norm = 0.0;

        for _ in 0..self.num_gradient_steps {
            let indices = history.sample_indices(t, self.batch_size, rng)?;
            let (actions, rewards) = history.batch(&indices, stream);

            let mask = drop_prob.map(|p| sample_mask((actions.nrows(), network.hidden_dim()), p, rng));
            let (out, cache) = network.forward(actions.view(), mask)?;
            let mut gradients = network.backward(actions.view(), out.view(), &cache, rewards.view(), self.noise_var)?;
            gradients.scale(1.0 / self.batch_size as f64);
            prior.add_pull(&mut gradients, network, strength);
            last_norm = gradient_norm(&gradients);

            sgd_step(network, &gradients, learning_rate);
            last_loss = crate::network::squared_error(out.view(), rewards.view()) / self.batch_size as f64;
        }

        trace!(
            "sgd update: t = {}, lr = {:.3e}, batch mse = {:.4}, grad norm = {:.4}",
            t,
            learning_rate,
            last_loss,
            last_norm
        );
        Ok(last_loss)
    }
}
