//! # Agent Configuration
//!
//! Hyperparameters shared by every agent variant, plus the variant-specific
//! parameters carried by [`AgentKind`]. Configurations are immutable once an
//! agent has been built from them.
//!
//! ```rust
//! use neural_bandit::config::AgentConfig;
//!
//! let config = AgentConfig::from_json(r#"{
//!     "input_dim": 2,
//!     "hidden_dim": 8,
//!     "time_horizon": 500,
//!     "prior_var": 1.0,
//!     "noise_var": 0.1
//! }"#).unwrap();
//!
//! assert_eq!(config.batch_size, 64);
//! assert_eq!(config.leaky_coeff, 0.01);
//! ```

use serde::{Serialize, Deserialize};
use crate::error::{Result, BanditError};

fn default_learning_rate() -> f64 {
    1e-1
}

fn default_lr_decay() -> f64 {
    1.0
}

fn default_num_gradient_steps() -> usize {
    1
}

fn default_batch_size() -> usize {
    64
}

fn default_leaky_coeff() -> f64 {
    0.01
}

/// Hyperparameters common to all agent variants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Width of an action feature vector
    pub input_dim: usize,

    /// Number of hidden units
    pub hidden_dim: usize,

    /// Number of steps the history buffers are sized for
    pub time_horizon: usize,

    /// Prior variance; regularization strength is `2 / (prior_var * (t + 1))`
    pub prior_var: f64,

    /// Assumed observation noise variance
    pub noise_var: f64,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Multiplicative decay applied once per observation
    #[serde(default = "default_lr_decay")]
    pub lr_decay: f64,

    #[serde(default = "default_num_gradient_steps")]
    pub num_gradient_steps: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Slope of the negative part of the Leaky ReLU
    #[serde(default = "default_leaky_coeff")]
    pub leaky_coeff: f64,
}

impl AgentConfig {
    /// Create a config with the default optimisation settings
    pub fn new(
        input_dim: usize,
        hidden_dim: usize,
        time_horizon: usize,
        prior_var: f64,
        noise_var: f64,
    ) -> Self {
        AgentConfig {
            input_dim,
            hidden_dim,
            time_horizon,
            prior_var,
            noise_var,
            learning_rate: default_learning_rate(),
            lr_decay: default_lr_decay(),
            num_gradient_steps: default_num_gradient_steps(),
            batch_size: default_batch_size(),
            leaky_coeff: default_leaky_coeff(),
        }
    }

    /// Parse and validate a config from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every hyperparameter, failing on the first bad one
    pub fn validate(&self) -> Result<()> {
        if self.input_dim == 0 {
            return Err(BanditError::invalid_parameter("input_dim", "must be positive"));
        }
        if self.hidden_dim == 0 {
            return Err(BanditError::invalid_parameter("hidden_dim", "must be positive"));
        }
        if self.time_horizon == 0 {
            return Err(BanditError::invalid_parameter("time_horizon", "must be positive"));
        }
        if !(self.prior_var.is_finite() && self.prior_var > 0.0) {
            return Err(BanditError::invalid_parameter("prior_var", "must be positive and finite"));
        }
        if !(self.noise_var.is_finite() && self.noise_var > 0.0) {
            return Err(BanditError::invalid_parameter("noise_var", "must be positive and finite"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate >= 0.0) {
            return Err(BanditError::invalid_parameter("learning_rate", "must be non-negative and finite"));
        }
        if !(self.lr_decay.is_finite() && self.lr_decay > 0.0) {
            return Err(BanditError::invalid_parameter("lr_decay", "must be positive and finite"));
        }
        if self.batch_size == 0 {
            return Err(BanditError::invalid_parameter("batch_size", "must be positive"));
        }
        if !self.leaky_coeff.is_finite() {
            return Err(BanditError::invalid_parameter("leaky_coeff", "must be finite"));
        }
        Ok(())
    }
}

/// Builder pattern for AgentConfig
pub struct AgentConfigBuilder {
    config: AgentConfig,
}

impl AgentConfigBuilder {
    pub fn new(input_dim: usize, hidden_dim: usize) -> Self {
        AgentConfigBuilder {
            config: AgentConfig::new(input_dim, hidden_dim, 1000, 1.0, 1.0),
        }
    }

    pub fn time_horizon(mut self, time_horizon: usize) -> Self {
        self.config.time_horizon = time_horizon;
        self
    }

    pub fn prior_var(mut self, prior_var: f64) -> Self {
        self.config.prior_var = prior_var;
        self
    }

    pub fn noise_var(mut self, noise_var: f64) -> Self {
        self.config.noise_var = noise_var;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn lr_decay(mut self, lr_decay: f64) -> Self {
        self.config.lr_decay = lr_decay;
        self
    }

    pub fn num_gradient_steps(mut self, steps: usize) -> Self {
        self.config.num_gradient_steps = steps;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    pub fn leaky_coeff(mut self, leaky_coeff: f64) -> Self {
        self.config.leaky_coeff = leaky_coeff;
        self
    }

    pub fn build(self) -> Result<AgentConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Which exploration strategy to build, with its variant-specific parameter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentKind {
    /// Random action with fixed probability `epsilon_param`
    EpsilonGreedy {
        #[serde(default)]
        epsilon_param: f64,
    },

    /// Random action with probability `epsilon_param / (epsilon_param + t)`
    AnnealingEpsilonGreedy {
        #[serde(default)]
        epsilon_param: f64,
    },

    /// Dropout kept active at decision time
    Dropout {
        #[serde(default = "default_drop_prob")]
        drop_prob: f64,
    },

    /// Ensemble of randomized-prior networks
    Ensemble {
        #[serde(default = "default_num_models")]
        num_models: usize,
    },
}

fn default_drop_prob() -> f64 {
    0.5
}

fn default_num_models() -> usize {
    10
}

impl AgentKind {
    pub fn validate(&self) -> Result<()> {
        match self {
            AgentKind::EpsilonGreedy { epsilon_param }
            | AgentKind::AnnealingEpsilonGreedy { epsilon_param } => validate_epsilon(*epsilon_param),
            AgentKind::Dropout { drop_prob } => validate_drop_prob(*drop_prob),
            AgentKind::Ensemble { num_models } => validate_num_models(*num_models),
        }
    }
}

pub(crate) fn validate_epsilon(epsilon_param: f64) -> Result<()> {
    if !(epsilon_param.is_finite() && epsilon_param >= 0.0) {
        return Err(BanditError::invalid_parameter("epsilon_param", "must be non-negative and finite"));
    }
    Ok(())
}

pub(crate) fn validate_drop_prob(drop_prob: f64) -> Result<()> {
    if !(0.0..1.0).contains(&drop_prob) {
        return Err(BanditError::invalid_parameter("drop_prob", "must be in [0, 1)"));
    }
    Ok(())
}

pub(crate) fn validate_num_models(num_models: usize) -> Result<()> {
    if num_models == 0 {
        return Err(BanditError::invalid_parameter("num_models", "must be at least 1"));
    }
    Ok(())
}
