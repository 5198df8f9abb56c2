use serde::{Serialize, Deserialize};

/// Exponential learning-rate decay: `lr = initial_lr * decay_rate^step`.
///
/// The rate is advanced by multiplying once per [`step`](Self::step), so the
/// current value matches a running product rather than a recomputed power.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExponentialDecay {
    initial_lr: f64,
    decay_rate: f64,
    current: f64,
    steps: usize,
}

impl ExponentialDecay {
    pub fn new(initial_lr: f64, decay_rate: f64) -> Self {
        ExponentialDecay {
            initial_lr,
            decay_rate,
            current: initial_lr,
            steps: 0,
        }
    }

    /// Learning rate for the next update
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn initial(&self) -> f64 {
        self.initial_lr
    }

    /// Number of decay steps applied so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn step(&mut self) {
        self.current *= self.decay_rate;
        self.steps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_when_decay_is_one() {
        let mut lr = ExponentialDecay::new(0.1, 1.0);
        for _ in 0..10 {
            lr.step();
        }
        assert_eq!(lr.current(), 0.1);
        assert_eq!(lr.steps(), 10);
    }

    #[test]
    fn test_decay_is_multiplicative() {
        let mut lr = ExponentialDecay::new(1.0, 0.5);
        lr.step();
        lr.step();
        lr.step();
        assert_eq!(lr.current(), 0.125);
        assert_eq!(lr.initial(), 1.0);
    }
}
