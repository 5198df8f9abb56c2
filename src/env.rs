//! Environment interface boundary.
//!
//! Environments are supplied by the caller; the agents only ever see the
//! candidate action set and the scalar reward of the action they chose.

use ndarray::ArrayView2;

/// A source of action sets and rewards for a bandit experiment
pub trait BanditEnvironment {
    /// Candidate actions for the current step, one feature vector per row.
    ///
    /// The width must stay fixed for the whole horizon.
    fn actions(&self) -> ArrayView2<f64>;

    /// Apply the chosen action and return its reward
    fn step(&mut self, action: usize) -> f64;
}
