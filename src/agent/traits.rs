use crate::error::Result;

/// Capability contract shared by every bandit agent.
///
/// A driver calls [`pick_action`](BanditAgent::pick_action), applies the
/// action in its environment, then reports the reward through
/// [`update_observation`](BanditAgent::update_observation) exactly once per
/// time step, with time steps starting at 0 and never decreasing.
pub trait BanditAgent {
    /// Select an index into the current action set
    fn pick_action(&mut self, time_step: usize) -> Result<usize>;

    /// Record the outcome of `action` at `time_step` and retrain
    fn update_observation(&mut self, time_step: usize, action: usize, reward: f64) -> Result<()>;

    /// Size of the current action set
    fn num_actions(&self) -> usize;

    /// Probability of a uniformly random action at `time_step` (if applicable)
    fn exploration_rate(&self, _time_step: usize) -> Option<f64> {
        None
    }
}

/// Outcome of an explicit exploration decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}
