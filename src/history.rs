use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;

use crate::error::{Result, BanditError};

/// Pre-allocated record of chosen actions and their rewards, indexed by time step.
///
/// Rewards are kept in one or more streams: single-model agents use one, an
/// ensemble keeps one independently perturbed stream per member. Only rows
/// `0..=t` for the most recent observed `t` are valid and ever sampled.
#[derive(Clone, Debug)]
pub struct ObservationHistory {
    actions: Array2<f64>,
    rewards: Array2<f64>,
    last_step: Option<usize>,
}

impl ObservationHistory {
    pub fn new(time_horizon: usize, input_dim: usize, streams: usize) -> Self {
        ObservationHistory {
            actions: Array2::zeros((time_horizon, input_dim)),
            rewards: Array2::zeros((streams, time_horizon)),
            last_step: None,
        }
    }

    pub fn horizon(&self) -> usize {
        self.actions.nrows()
    }

    pub fn streams(&self) -> usize {
        self.rewards.nrows()
    }

    /// Most recently recorded time step
    pub fn last_step(&self) -> Option<usize> {
        self.last_step
    }

    /// Number of valid rows
    pub fn len(&self) -> usize {
        self.last_step.map_or(0, |t| t + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.last_step.is_none()
    }

    /// Check that `time_step` may be recorded next.
    ///
    /// Steps must start at 0 and advance by one; repeating the latest step is
    /// allowed and overwrites it.
    pub fn check_time_step(&self, time_step: usize) -> Result<()> {
        if time_step >= self.horizon() {
            return Err(BanditError::TimeStepOutOfRange {
                time_step,
                horizon: self.horizon(),
            });
        }
        match self.last_step {
            None if time_step != 0 => Err(BanditError::OutOfOrder {
                time_step,
                expected: "0".to_string(),
            }),
            Some(last) if time_step != last && time_step != last + 1 => Err(BanditError::OutOfOrder {
                time_step,
                expected: format!("{} or {}", last, last + 1),
            }),
            _ => Ok(()),
        }
    }

    /// Record the feature vector of the action chosen at `time_step`
    pub fn record_action(&mut self, time_step: usize, action: ArrayView1<f64>) -> Result<()> {
        self.check_time_step(time_step)?;
        if action.len() != self.actions.ncols() {
            return Err(BanditError::dimension_mismatch(
                format!("action with {} features", self.actions.ncols()),
                format!("action with {} features", action.len()),
            ));
        }
        self.actions.row_mut(time_step).assign(&action);
        self.last_step = Some(time_step);
        Ok(())
    }

    /// Record the reward of `stream` at an already recorded time step
    pub fn record_reward(&mut self, stream: usize, time_step: usize, reward: f64) -> Result<()> {
        if stream >= self.streams() {
            return Err(BanditError::invalid_parameter(
                "stream".to_string(),
                format!("{} exceeds {} reward streams", stream, self.streams()),
            ));
        }
        if Some(time_step) != self.last_step {
            return Err(BanditError::OutOfOrder {
                time_step,
                expected: format!("{:?}", self.last_step),
            });
        }
        self.rewards[[stream, time_step]] = reward;
        Ok(())
    }

    /// Draw `batch_size` indices uniformly with replacement from `0..=t`
    pub fn sample_indices<R: Rng + ?Sized>(&self, t: usize, batch_size: usize, rng: &mut R) -> Result<Vec<usize>> {
        match self.last_step {
            Some(last) if t <= last => Ok((0..batch_size).map(|_| rng.gen_range(0..=t)).collect()),
            _ => Err(BanditError::OutOfOrder {
                time_step: t,
                expected: format!("a recorded step, latest is {:?}", self.last_step),
            }),
        }
    }

    /// Gather the actions and `stream` rewards at `indices`
    pub fn batch(&self, indices: &[usize], stream: usize) -> (Array2<f64>, Array1<f64>) {
        let actions = crate::network::select_rows(self.actions.view(), indices);
        let rewards = self.rewards.row(stream).select(Axis(0), indices);
        (actions, rewards)
    }

    pub fn actions(&self) -> ArrayView2<f64> {
        self.actions.view()
    }

    pub fn rewards(&self, stream: usize) -> ArrayView1<f64> {
        self.rewards.row(stream)
    }
}
