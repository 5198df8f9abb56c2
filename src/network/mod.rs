//! # Two-Layer Network Module
//!
//! The reward model shared by every agent: a single Leaky-ReLU hidden layer with
//! no bias terms and a scalar linear readout. Forward and backward passes are
//! written out by hand; the backward pass differentiates the scaled squared error
//! `Σ (y - ŷ)² / noise_var`.
//!
//! ```text
//! affine = actions · W1ᵀ          (batch × hidden)
//! hidden = max(leaky * affine, affine)
//! out    = (hidden ⊙ mask) · W2    (batch)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use neural_bandit::network::TwoLayerNetwork;
//! use ndarray::array;
//!
//! let network = TwoLayerNetwork::new(
//!     array![[1.0, 0.0], [0.0, -1.0]],
//!     array![1.0, 2.0],
//!     0.01,
//! ).unwrap();
//!
//! let scores = network.predict(array![[1.0, 1.0]].view()).unwrap();
//! assert!((scores[0] - (1.0 - 0.02)).abs() < 1e-12);
//! ```

pub mod dropout;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Result, BanditError};

pub use dropout::sample_mask;

/// Weights of a two-layer network, exclusively owned by one agent or ensemble member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TwoLayerNetwork {
    /// First-layer weights, `hidden_dim × input_dim`
    pub w1: Array2<f64>,

    /// Second-layer weights, `hidden_dim`
    pub w2: Array1<f64>,

    /// Slope of the negative part of the Leaky ReLU
    pub leaky_coeff: f64,
}

/// Intermediate values of a forward pass, consumed by the backward pass
#[derive(Clone, Debug)]
pub struct ForwardCache {
    pub affine: Array2<f64>,
    pub hidden: Array2<f64>,
    pub mask: Option<Array2<f64>>,
}

impl ForwardCache {
    /// Hidden activations after the dropout mask (if any)
    pub fn masked_hidden(&self) -> Array2<f64> {
        match &self.mask {
            Some(mask) => &self.hidden * mask,
            None => self.hidden.clone(),
        }
    }
}

/// Weight gradients with the same shapes as the network
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub w1: Array2<f64>,
    pub w2: Array1<f64>,
}

impl Gradients {
    pub fn zeros_like(network: &TwoLayerNetwork) -> Self {
        Gradients {
            w1: Array2::zeros(network.w1.dim()),
            w2: Array1::zeros(network.w2.dim()),
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.w1.mapv_inplace(|g| g * factor);
        self.w2.mapv_inplace(|g| g * factor);
    }
}

impl TwoLayerNetwork {
    /// Create a network from explicit weights
    pub fn new(w1: Array2<f64>, w2: Array1<f64>, leaky_coeff: f64) -> Result<Self> {
        if w1.nrows() != w2.len() {
            return Err(BanditError::dimension_mismatch(
                format!("w2 of length {}", w1.nrows()),
                format!("w2 of length {}", w2.len()),
            ));
        }
        if w1.is_empty() {
            return Err(BanditError::invalid_parameter("w1", "network must have at least one weight"));
        }
        Ok(TwoLayerNetwork { w1, w2, leaky_coeff })
    }

    /// Sample every weight independently from `N(0, std²)`
    pub fn random<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        std: f64,
        leaky_coeff: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let normal = Normal::new(0.0, std).map_err(|e| {
            BanditError::invalid_parameter("std".to_string(), e.to_string())
        })?;
        let w1 = Array2::random_using((hidden_dim, input_dim), normal, rng);
        let w2 = Array1::random_using(hidden_dim, normal, rng);
        Self::new(w1, w2, leaky_coeff)
    }

    pub fn input_dim(&self) -> usize {
        self.w1.ncols()
    }

    pub fn hidden_dim(&self) -> usize {
        self.w1.nrows()
    }

    fn check_actions(&self, actions: &ArrayView2<f64>) -> Result<()> {
        if actions.ncols() != self.input_dim() {
            return Err(BanditError::dimension_mismatch(
                format!("actions with {} features", self.input_dim()),
                format!("actions with {} features", actions.ncols()),
            ));
        }
        Ok(())
    }

    /// Forward pass over a batch of actions, optionally through a dropout mask.
    ///
    /// The mask, when given, must have shape `batch × hidden_dim`.
    pub fn forward(
        &self,
        actions: ArrayView2<f64>,
        mask: Option<Array2<f64>>,
    ) -> Result<(Array1<f64>, ForwardCache)> {
        self.check_actions(&actions)?;
        if let Some(mask) = &mask {
            let expected = (actions.nrows(), self.hidden_dim());
            if mask.dim() != expected {
                return Err(BanditError::dimension_mismatch(
                    format!("mask of shape {:?}", expected),
                    format!("mask of shape {:?}", mask.dim()),
                ));
            }
        }

        let leaky = self.leaky_coeff;
        let affine = actions.dot(&self.w1.t());
        let hidden = affine.mapv(|a| (leaky * a).max(a));
        let cache = ForwardCache { affine, hidden, mask };
        let out = cache.masked_hidden().dot(&self.w2);
        Ok((out, cache))
    }

    /// Deterministic forward pass without dropout
    pub fn predict(&self, actions: ArrayView2<f64>) -> Result<Array1<f64>> {
        let (out, _) = self.forward(actions, None)?;
        Ok(out)
    }

    /// Backward pass of the scaled squared error.
    ///
    /// Gradients are summed, not averaged, over the batch.
    pub fn backward(
        &self,
        actions: ArrayView2<f64>,
        predictions: ArrayView1<f64>,
        cache: &ForwardCache,
        targets: ArrayView1<f64>,
        noise_var: f64,
    ) -> Result<Gradients> {
        if predictions.len() != targets.len() || predictions.len() != actions.nrows() {
            return Err(BanditError::dimension_mismatch(
                format!("{} predictions and targets", actions.nrows()),
                format!("{} predictions, {} targets", predictions.len(), targets.len()),
            ));
        }

        let dout = (&targets - &predictions).mapv(|e| -(2.0 / noise_var) * e);
        let w2_grad = cache.masked_hidden().t().dot(&dout);

        let mut dhidden = Array2::from_shape_fn(cache.hidden.dim(), |(i, j)| dout[i] * self.w2[j]);
        if let Some(mask) = &cache.mask {
            dhidden *= mask;
        }
        let leaky = self.leaky_coeff;
        let daffine = &dhidden * &cache.affine.mapv(|a| if a >= 0.0 { 1.0 } else { leaky });
        let w1_grad = daffine.t().dot(&actions);

        Ok(Gradients { w1: w1_grad, w2: w2_grad })
    }

    /// The loss that [`backward`](Self::backward) differentiates
    pub fn loss(
        &self,
        actions: ArrayView2<f64>,
        targets: ArrayView1<f64>,
        mask: Option<Array2<f64>>,
        noise_var: f64,
    ) -> Result<f64> {
        let (out, _) = self.forward(actions, mask)?;
        Ok(squared_error(out.view(), targets) / noise_var)
    }

    /// Whether every weight is finite
    pub fn is_finite(&self) -> bool {
        self.w1.iter().chain(self.w2.iter()).all(|w| w.is_finite())
    }

    /// Squared Frobenius distance to another network of the same shape
    pub fn distance_sq(&self, other: &TwoLayerNetwork) -> f64 {
        let d1 = (&self.w1 - &other.w1).mapv(|x| x * x).sum();
        let d2 = (&self.w2 - &other.w2).mapv(|x| x * x).sum();
        d1 + d2
    }
}

pub(crate) fn squared_error(predictions: ArrayView1<f64>, targets: ArrayView1<f64>) -> f64 {
    (&targets - &predictions).mapv(|e| e * e).sum()
}

/// Index of the first maximum score.
///
/// Ties resolve to the lowest index. Any non-finite score is an error.
pub fn argmax(scores: ArrayView1<f64>) -> Result<usize> {
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(BanditError::NumericalError("non-finite action score".to_string()));
    }
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx).ok_or(BanditError::EmptyActionSet)
}

/// Gather rows of `actions` into a new batch
pub(crate) fn select_rows(actions: ArrayView2<f64>, indices: &[usize]) -> Array2<f64> {
    actions.select(Axis(0), indices)
}
