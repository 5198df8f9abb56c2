use ndarray::Array2;
use rand::Rng;

/// Sample a Bernoulli keep-mask of the given shape.
///
/// Each unit is kept (1.0) when a uniform draw exceeds `drop_prob`, otherwise
/// zeroed. Kept units are not rescaled, so the expected activation shrinks by
/// `1 - drop_prob` in both training and decision-time passes.
pub fn sample_mask<R: Rng + ?Sized>(shape: (usize, usize), drop_prob: f64, rng: &mut R) -> Array2<f64> {
    let mut mask = Array2::zeros(shape);
    for value in mask.iter_mut() {
        if rng.gen::<f64>() > drop_prob {
            *value = 1.0;
        }
    }
    mask
}
