mod hook;
mod metrics;

pub use hook::{Control, FnHook, StepHook, StepInfo};
pub use metrics::{EpisodeRecord, Metrics};

use crate::{agent::Agent, ds::RingBuffer, env::Environment, exp::Exp};

/// The episodic training loop
///
/// Each episode resets the environment, then alternates act / step / learn until the
/// environment reports `done`, the step cap is hit, or a hook asks to end the episode.
/// The agent's [`end_episode`](Agent::end_episode) runs exactly once per episode and one
/// [`EpisodeRecord`] is appended per episode, whichever way it ended. The one exception is
/// a hook stopping the run from `on_episode_start`: that episode never happened.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingLoop {
    episodes: usize,
    max_steps: usize,
    log_every: usize,
}

impl Default for TrainingLoop {
    fn default() -> Self {
        Self::new(500, 500)
    }
}

impl TrainingLoop {
    /// A loop of `episodes` episodes of at most `max_steps` steps each
    pub fn new(episodes: usize, max_steps: usize) -> Self {
        Self {
            episodes,
            max_steps,
            log_every: 50,
        }
    }

    /// Log a progress summary every `n` episodes; `0` turns it off
    pub fn with_log_every(mut self, n: usize) -> Self {
        self.log_every = n;
        self
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Train `agent` in `env`, reporting to `hook`
    ///
    /// Returns the metrics of every episode that ran. If the hook stops the run mid-episode,
    /// that episode is still recorded; a stop from
    /// [`on_episode_start`](StepHook::on_episode_start) ends the run before the episode
    /// counts. Either way the metrics are marked cancelled.
    pub fn run<E, A, H>(&self, env: &mut E, agent: &mut A, hook: &mut H) -> Metrics
    where
        E: Environment,
        A: Agent<E>,
        H: StepHook<E>,
    {
        let mut metrics = Metrics::with_capacity(self.episodes);
        let mut window = (self.log_every > 0).then(|| Progress::new(self.log_every));

        for episode in 0..self.episodes {
            let Some((record, control)) = self.run_episode(env, agent, hook, episode) else {
                log::warn!(
                    "training stopped before episode {} of {}",
                    episode + 1,
                    self.episodes
                );
                metrics.cancel();
                break;
            };

            agent.end_episode();
            metrics.push(record);
            hook.on_episode_end(episode, &record);
            log::debug!(
                "episode {episode}: reward {:.3}, steps {}, success {}",
                record.total_reward,
                record.steps,
                record.success
            );

            if let Some(progress) = window.as_mut() {
                progress.record(&record);
                if (episode + 1) % self.log_every == 0 {
                    progress.report(episode + 1, self.episodes, agent.exploration_rate());
                }
            }

            if control == Control::Stop {
                log::warn!(
                    "training stopped after {} of {} episodes",
                    episode + 1,
                    self.episodes
                );
                metrics.cancel();
                break;
            }
        }

        metrics
    }

    /// Play one episode; `None` if the hook stopped the run before it began
    fn run_episode<E, A, H>(
        &self,
        env: &mut E,
        agent: &mut A,
        hook: &mut H,
        episode: usize,
    ) -> Option<(EpisodeRecord, Control)>
    where
        E: Environment,
        A: Agent<E>,
        H: StepHook<E>,
    {
        let mut state = env.reset();
        let mut total_reward = 0.0;
        let mut steps = 0;
        let mut control = hook.on_episode_start(env, episode);
        if control == Control::Stop {
            return None;
        }

        while control == Control::Continue && steps < self.max_steps {
            let action = agent.act(&state);
            let (next_state, reward, done) = env.step(action);
            agent.learn(Exp {
                state,
                action,
                next_state: next_state.clone(),
                reward,
                done,
            });
            total_reward += reward;
            steps += 1;

            let info = StepInfo {
                episode,
                step: steps,
                action,
                next_state: next_state.clone(),
                reward,
                done,
            };
            log::trace!("episode {episode} step {steps}: reward {reward:.3}, done {done}");
            control = hook.on_step(env, &info);
            state = next_state;

            if done {
                break;
            }
        }

        let record = EpisodeRecord {
            total_reward,
            steps,
            success: env.is_success(),
        };
        Some((record, control))
    }
}

/// Rolling window behind the periodic progress log line
struct Progress {
    rewards: RingBuffer<f64>,
    successes: RingBuffer<f64>,
}

impl Progress {
    fn new(window: usize) -> Self {
        Self {
            rewards: RingBuffer::new(window),
            successes: RingBuffer::new(window),
        }
    }

    fn record(&mut self, record: &EpisodeRecord) {
        self.rewards.push(record.total_reward);
        self.successes.push(if record.success { 1.0 } else { 0.0 });
    }

    fn report(&self, done: usize, total: usize, epsilon: Option<f64>) {
        let epsilon = epsilon.map_or_else(|| String::from("-"), |e| format!("{e:.3}"));
        log::info!(
            "episode {done}/{total}: mean reward {:.3}, success rate {:.2}, epsilon {epsilon}",
            self.rewards.mean(),
            self.successes.mean(),
        );
    }
}
