use crate::env::Environment;

use super::EpisodeRecord;

/// What the training loop should do after a hook call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Control {
    #[default]
    Continue,
    /// End the current episode at this step boundary; it is still recorded
    EndEpisode,
    /// End the current episode like [`Control::EndEpisode`], then end the run
    ///
    /// Returned from [`StepHook::on_episode_start`] it ends the run before the episode
    /// is played, so nothing is recorded for it.
    Stop,
}

/// What happened in a single step
#[derive(Debug, Clone)]
pub struct StepInfo<S, A> {
    pub episode: usize,
    /// 1-based step number within the episode
    pub step: usize,
    pub action: A,
    pub next_state: S,
    pub reward: f64,
    pub done: bool,
}

/// Observer hooks called by [`TrainingLoop`](super::TrainingLoop)
///
/// Hooks only ever see the environment through a shared reference, so they can watch a
/// run (rendering, progress reporting) and ask it to stop, but never steer it. A hook may
/// block, which pauses training.
///
/// `()` is the hook that does nothing.
pub trait StepHook<E: Environment> {
    /// Called after `reset`, before the first step of an episode
    ///
    /// [`Control::EndEpisode`] here records a zero-step episode.
    fn on_episode_start(&mut self, _env: &E, _episode: usize) -> Control {
        Control::Continue
    }

    /// Called after each step has been applied and learned from
    fn on_step(&mut self, _env: &E, _info: &StepInfo<E::State, E::Action>) -> Control {
        Control::Continue
    }

    /// Called once the episode's record has been appended
    fn on_episode_end(&mut self, _episode: usize, _record: &EpisodeRecord) {}
}

impl<E: Environment> StepHook<E> for () {}

/// Adapts a per-step closure into a [`StepHook`]
pub struct FnHook<F>(pub F);

impl<E, F> StepHook<E> for FnHook<F>
where
    E: Environment,
    F: FnMut(&E, &StepInfo<E::State, E::Action>) -> Control,
{
    fn on_step(&mut self, env: &E, info: &StepInfo<E::State, E::Action>) -> Control {
        (self.0)(env, info)
    }
}
