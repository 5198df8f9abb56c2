use log::warn;
use ndarray::{ArrayBase, Data, Dimension};

use crate::error::{Result, BanditError};
use crate::network::TwoLayerNetwork;

/// Types of numerical issues
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalIssue {
    NaN { layer: usize, count: usize },
    Infinity { layer: usize, count: usize },
}

fn scan<S, D>(layer: usize, values: &ArrayBase<S, D>, issues: &mut Vec<NumericalIssue>)
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let nan_count = values.iter().filter(|v| v.is_nan()).count();
    let inf_count = values.iter().filter(|v| v.is_infinite()).count();

    if nan_count > 0 {
        warn!("Layer {}: Found {} NaN values in weights", layer, nan_count);
        issues.push(NumericalIssue::NaN { layer, count: nan_count });
    }
    if inf_count > 0 {
        warn!("Layer {}: Found {} infinite values in weights", layer, inf_count);
        issues.push(NumericalIssue::Infinity { layer, count: inf_count });
    }
}

/// Check both weight layers for NaN and infinite values
pub fn check_weights(network: &TwoLayerNetwork) -> Vec<NumericalIssue> {
    let mut issues = Vec::new();
    scan(0, &network.w1, &mut issues);
    scan(1, &network.w2, &mut issues);
    issues
}

/// Turn non-finite weights into a [`BanditError::NumericalError`]
pub fn ensure_finite(network: &TwoLayerNetwork) -> Result<()> {
    let issues = check_weights(network);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(BanditError::NumericalError(format!("non-finite weights: {:?}", issues)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_clean_network() {
        let network = TwoLayerNetwork::new(array![[1.0]], array![2.0], 0.01).unwrap();
        assert!(check_weights(&network).is_empty());
        assert!(ensure_finite(&network).is_ok());
    }

    #[test]
    fn test_detects_nan_and_inf() {
        let network = TwoLayerNetwork::new(
            array![[f64::NAN, 1.0], [f64::NAN, 0.0]],
            array![f64::INFINITY, 0.0],
            0.01,
        ).unwrap();

        let issues = check_weights(&network);
        assert_eq!(issues, vec![
            NumericalIssue::NaN { layer: 0, count: 2 },
            NumericalIssue::Infinity { layer: 1, count: 1 },
        ]);
        assert!(matches!(ensure_finite(&network), Err(BanditError::NumericalError(_))));
    }
}
