use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::Result;
use crate::network::{Gradients, TwoLayerNetwork};

/// Central finite-difference gradients of [`TwoLayerNetwork::loss`].
///
/// The same `mask` is reused for every perturbed evaluation so the result is
/// comparable with the analytic gradient of a masked forward pass.
pub fn numerical_gradients(
    network: &TwoLayerNetwork,
    actions: ArrayView2<f64>,
    targets: ArrayView1<f64>,
    mask: Option<&Array2<f64>>,
    noise_var: f64,
    epsilon: f64,
) -> Result<Gradients> {
    let mut probe = network.clone();
    let mut gradients = Gradients::zeros_like(network);
    let loss = |net: &TwoLayerNetwork| net.loss(actions, targets, mask.cloned(), noise_var);

    for ((i, j), grad) in gradients.w1.indexed_iter_mut() {
        let original = network.w1[[i, j]];
        probe.w1[[i, j]] = original + epsilon;
        let loss_plus = loss(&probe)?;
        probe.w1[[i, j]] = original - epsilon;
        let loss_minus = loss(&probe)?;
        probe.w1[[i, j]] = original;
        *grad = (loss_plus - loss_minus) / (2.0 * epsilon);
    }

    for (j, grad) in gradients.w2.indexed_iter_mut() {
        let original = network.w2[j];
        probe.w2[j] = original + epsilon;
        let loss_plus = loss(&probe)?;
        probe.w2[j] = original - epsilon;
        let loss_minus = loss(&probe)?;
        probe.w2[j] = original;
        *grad = (loss_plus - loss_minus) / (2.0 * epsilon);
    }

    Ok(gradients)
}

/// Relative error `‖a - b‖ / (‖a‖ + ‖b‖)` over both layers.
///
/// Two all-zero gradient sets have zero error.
pub fn relative_error(analytic: &Gradients, numerical: &Gradients) -> f64 {
    let diff = (&analytic.w1 - &numerical.w1).mapv(|x| x * x).sum()
        + (&analytic.w2 - &numerical.w2).mapv(|x| x * x).sum();
    let norm_a = (analytic.w1.mapv(|x| x * x).sum() + analytic.w2.mapv(|x| x * x).sum()).sqrt();
    let norm_n = (numerical.w1.mapv(|x| x * x).sum() + numerical.w2.mapv(|x| x * x).sum()).sqrt();

    let denom = norm_a + norm_n;
    if denom == 0.0 {
        0.0
    } else {
        diff.sqrt() / denom
    }
}

/// Compute gradient norm for diagnostics
pub fn gradient_norm(gradients: &Gradients) -> f64 {
    (gradients.w1.mapv(|x| x * x).sum() + gradients.w2.mapv(|x| x * x).sum()).sqrt()
}
