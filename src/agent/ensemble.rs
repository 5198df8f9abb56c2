use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::{validate_num_models, AgentConfig};
use crate::debug::ensure_finite;
use crate::error::{Result, BanditError};
use crate::history::ObservationHistory;
use crate::network::{argmax, TwoLayerNetwork};
use crate::optimizer::{ExponentialDecay, Prior, RegularizedSgd};

use super::traits::BanditAgent;
use super::{check_observation, validate_actions};

/// One member of the ensemble: live weights plus the prior they are pulled toward
#[derive(Clone, Debug)]
pub struct EnsembleMember {
    network: TwoLayerNetwork,
    prior: TwoLayerNetwork,
}

impl EnsembleMember {
    /// Start training from a copy of `prior`
    pub fn new(prior: TwoLayerNetwork) -> Self {
        EnsembleMember {
            network: prior.clone(),
            prior,
        }
    }

    pub fn network(&self) -> &TwoLayerNetwork {
        &self.network
    }

    /// The immutable regularization anchor drawn at construction
    pub fn prior(&self) -> &TwoLayerNetwork {
        &self.prior
    }
}

/// Ensemble sampling agent with randomized prior functions
///
/// Each member is initialised at its own prior draw `sqrt(prior_var) * N(0, 1)`,
/// regularized toward it, and trained on its own copy of the rewards perturbed
/// with `N(0, noise_var)` noise. Every decision acts greedily under one member
/// chosen uniformly at random.
///
/// # Example
///
/// ```rust
/// use neural_bandit::agent::{BanditAgent, EnsembleAgent};
/// use neural_bandit::config::AgentConfigBuilder;
/// use ndarray::array;
///
/// let config = AgentConfigBuilder::new(2, 4).time_horizon(10).batch_size(4).build().unwrap();
/// let actions = array![[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]];
/// let mut agent = EnsembleAgent::with_seed(config, actions, 5, 7).unwrap();
///
/// for t in 0..3 {
///     let action = agent.pick_action(t).unwrap();
///     agent.update_observation(t, action, 0.5).unwrap();
/// }
/// assert_eq!(agent.members().len(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct EnsembleAgent<R: Rng = StdRng> {
    config: AgentConfig,
    members: Vec<EnsembleMember>,
    actions: Array2<f64>,
    history: ObservationHistory,
    sgd: RegularizedSgd,
    learning_rate: ExponentialDecay,
    perturbation: Normal<f64>,
    rng: R,
}

impl EnsembleAgent<StdRng> {
    pub fn with_seed(config: AgentConfig, actions: Array2<f64>, num_models: usize, seed: u64) -> Result<Self> {
        Self::new(config, actions, num_models, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> EnsembleAgent<R> {
    /// Draw `num_models` independent priors from `rng`
    pub fn new(config: AgentConfig, actions: Array2<f64>, num_models: usize, mut rng: R) -> Result<Self> {
        config.validate()?;
        validate_num_models(num_models)?;

        let prior_std = config.prior_var.sqrt();
        let priors = (0..num_models)
            .map(|_| {
                TwoLayerNetwork::random(
                    config.input_dim,
                    config.hidden_dim,
                    prior_std,
                    config.leaky_coeff,
                    &mut rng,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_priors(config, actions, priors, rng)
    }

    /// Build an ensemble from explicit prior snapshots, one per member
    pub fn from_priors(
        config: AgentConfig,
        actions: Array2<f64>,
        priors: Vec<TwoLayerNetwork>,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        validate_num_models(priors.len())?;
        validate_actions(actions.view(), config.input_dim)?;
        for prior in &priors {
            if prior.input_dim() != config.input_dim || prior.hidden_dim() != config.hidden_dim {
                return Err(BanditError::dimension_mismatch(
                    format!("prior of shape ({}, {})", config.hidden_dim, config.input_dim),
                    format!("prior of shape ({}, {})", prior.hidden_dim(), prior.input_dim()),
                ));
            }
        }

        let perturbation = Normal::new(0.0, config.noise_var.sqrt())
            .map_err(|e| BanditError::invalid_parameter("noise_var".to_string(), e.to_string()))?;

        debug!(
            "EnsembleAgent: {} members, hidden_dim = {}, {} actions",
            priors.len(),
            config.hidden_dim,
            actions.nrows()
        );

        Ok(EnsembleAgent {
            history: ObservationHistory::new(config.time_horizon, config.input_dim, priors.len()),
            members: priors.into_iter().map(EnsembleMember::new).collect(),
            sgd: RegularizedSgd::from_config(&config),
            learning_rate: ExponentialDecay::new(config.learning_rate, config.lr_decay),
            config,
            actions,
            perturbation,
            rng,
        })
    }

    pub fn num_models(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[EnsembleMember] {
        &self.members
    }

    /// Deterministic scores of member `m` over the current action set
    pub fn member_scores(&self, m: usize) -> Result<Array1<f64>> {
        let member = self.members.get(m).ok_or_else(|| {
            BanditError::invalid_parameter("member".to_string(), format!("{} exceeds {} members", m, self.members.len()))
        })?;
        member.network.predict(self.actions.view())
    }

    /// Perturbed reward history of member `m`
    pub fn member_rewards(&self, m: usize) -> ndarray::ArrayView1<f64> {
        self.history.rewards(m)
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
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

    pub fn set_actions(&mut self, actions: Array2<f64>) -> Result<()> {
        validate_actions(actions.view(), self.config.input_dim)?;
        self.actions = actions;
        Ok(())
    }
}

impl<R: Rng> BanditAgent for EnsembleAgent<R> {
    fn pick_action(&mut self, _time_step: usize) -> Result<usize> {
        let m = self.rng.gen_range(0..self.members.len());
        let scores = self.member_scores(m)?;
        argmax(scores.view())
    }

    fn update_observation(&mut self, time_step: usize, action: usize, reward: f64) -> Result<()> {
        check_observation(&self.history, self.actions.nrows(), time_step, action, reward)?;
        self.history.record_action(time_step, self.actions.row(action))?;

        let learning_rate = self.learning_rate.current();
        for (m, member) in self.members.iter_mut().enumerate() {
            let noise = self.perturbation.sample(&mut self.rng);
            self.history.record_reward(m, time_step, reward + noise)?;

            let loss = self.sgd.update(
                &mut member.network,
                Prior::Snapshot(&member.prior),
                &self.history,
                m,
                time_step,
                learning_rate,
                None,
                &mut self.rng,
            )?;
            trace!("member {}: perturbed reward = {:.4}, batch mse = {:.4}", m, reward + noise, loss);
        }
        self.learning_rate.step();

        for member in &self.members {
            ensure_finite(&member.network)?;
        }
        Ok(())
    }

    fn num_actions(&self) -> usize {
        self.actions.nrows()
    }
}
