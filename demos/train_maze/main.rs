use std::{error::Error, fs, path::PathBuf};

use clap::Parser;
use smart_maze::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    config::MazeConfig,
    gym::{GridWorld, MazeAction, RenderSnapshot},
    train::{Control, EpisodeRecord, Metrics, StepHook, StepInfo, TrainingLoop},
};

const SUMMARY_WINDOW: usize = 50;

#[derive(Parser, Debug)]
#[command(
    about = "Train a Q-learning agent on a maze, no graphics",
    allow_negative_numbers = true
)]
struct Args {
    /// Path to the maze JSON config
    #[arg(long, default_value = "demos/mazes/basic.json")]
    config: PathBuf,

    #[arg(long, default_value_t = 500)]
    episodes: usize,

    #[arg(long, default_value_t = 500)]
    max_steps: usize,

    #[arg(long, default_value_t = 0.1)]
    alpha: f64,

    #[arg(long, default_value_t = 0.95)]
    gamma: f64,

    #[arg(long, default_value_t = 1.0)]
    epsilon: f64,

    #[arg(long, default_value_t = 0.05)]
    epsilon_min: f64,

    #[arg(long, default_value_t = 0.995)]
    epsilon_decay: f64,

    /// Log the maze as text at the end of every N-th episode; 0 never does
    #[arg(long, default_value_t = 0)]
    render_every: usize,

    /// Print reward and success rate per window of episodes after training
    #[arg(long)]
    show_plot: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Where metrics.csv and q_table.json are written
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
}

impl Args {
    fn agent_config(&self) -> QTableAgentConfig {
        QTableAgentConfig {
            alpha: self.alpha,
            gamma: self.gamma,
            epsilon: self.epsilon,
            epsilon_min: self.epsilon_min,
            epsilon_decay: self.epsilon_decay,
        }
    }
}

/// Logs the final maze of every `every`-th episode
struct TextRenderer {
    every: usize,
    last: Option<RenderSnapshot>,
}

impl StepHook<GridWorld> for TextRenderer {
    fn on_step(&mut self, env: &GridWorld, info: &StepInfo<usize, MazeAction>) -> Control {
        if self.every > 0 && info.episode % self.every == 0 {
            self.last = Some(env.render_snapshot());
        }
        Control::Continue
    }

    fn on_episode_end(&mut self, episode: usize, record: &EpisodeRecord) {
        if let Some(maze) = self.last.take() {
            log::info!(
                "episode {episode} ended after {} steps, reward {:.2}:\n{maze}",
                record.steps,
                record.total_reward
            );
        }
    }
}

fn print_summary(metrics: &Metrics) {
    println!("{:>13} {:>12} {:>8}", "episodes", "mean reward", "success");
    for (i, window) in metrics.records().chunks(SUMMARY_WINDOW).enumerate() {
        let n = window.len() as f64;
        let reward = window.iter().map(|r| r.total_reward).sum::<f64>() / n;
        let success = window.iter().filter(|r| r.success).count() as f64 / n;
        let first = i * SUMMARY_WINDOW;
        println!(
            "{:>13} {reward:>12.3} {success:>8.2}",
            format!("{first}-{}", first + window.len() - 1)
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;

    let mut world = GridWorld::from_config(MazeConfig::from_path(&args.config)?)?;
    let (states, actions) = (world.num_states(), world.num_actions());
    let mut agent = match args.seed {
        Some(seed) => QTableAgent::with_seed(states, actions, args.agent_config(), seed),
        None => QTableAgent::new(states, actions, args.agent_config()),
    };

    let mut renderer = TextRenderer {
        every: args.render_every,
        last: None,
    };
    let metrics =
        TrainingLoop::new(args.episodes, args.max_steps).run(&mut world, &mut agent, &mut renderer);
    log::info!(
        "trained {} episodes: success rate {:.3}, mean reward {:.3}",
        metrics.len(),
        metrics.success_rate(),
        metrics.mean_reward()
    );
    if args.show_plot {
        print_summary(&metrics);
    }

    fs::create_dir_all(&args.out_dir)?;
    let mut writer = csv::Writer::from_path(args.out_dir.join("metrics.csv"))?;
    writer.write_record(["episode", "reward", "steps", "success"])?;
    for (episode, record) in metrics.records().iter().enumerate() {
        writer.serialize((episode, record.total_reward, record.steps, u8::from(record.success)))?;
    }
    writer.flush()?;
    agent.snapshot().save(args.out_dir.join("q_table.json"))?;

    // One greedy rollout with the learned table
    agent.set_epsilon(0.0);
    let greedy = TrainingLoop::new(1, args.max_steps)
        .with_log_every(0)
        .run(&mut world, &mut agent, &mut ());
    if let Some(record) = greedy.records().first() {
        log::info!(
            "greedy rollout: reward {:.3} in {} steps, reached goal: {}",
            record.total_reward,
            record.steps,
            record.success
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use smart_maze::env::Environment;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_agent_defaults() {
        let args = Args::try_parse_from(["train_maze"]).unwrap();
        assert_eq!(args.agent_config(), QTableAgentConfig::default());
        assert_eq!(args.episodes, 500);
        assert_eq!(args.max_steps, 500);
        assert_eq!(args.render_every, 0);
        assert!(!args.show_plot);
    }

    #[test]
    fn flags_reach_the_agent() {
        let args = Args::try_parse_from([
            "train_maze",
            "--config",
            "maze.json",
            "--episodes",
            "20",
            "--max-steps",
            "30",
            "--alpha",
            "0.5",
            "--gamma",
            "0.9",
            "--epsilon",
            "0.8",
            "--epsilon-min",
            "0.1",
            "--epsilon-decay",
            "0.9",
            "--render-every",
            "5",
            "--show-plot",
            "--seed",
            "3",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("maze.json"));
        assert_eq!((args.episodes, args.max_steps), (20, 30));
        assert_eq!(
            args.agent_config(),
            QTableAgentConfig {
                alpha: 0.5,
                gamma: 0.9,
                epsilon: 0.8,
                epsilon_min: 0.1,
                epsilon_decay: 0.9,
            }
        );
        assert_eq!(args.render_every, 5);
        assert!(args.show_plot);
        assert_eq!(args.seed, Some(3));
    }

    #[test]
    fn renderer_logs_only_chosen_episodes() {
        let mut world = GridWorld::from_config(
            MazeConfig::from_json(
                r#"{ "width": 2, "height": 1, "start": [0, 0], "goal": [1, 0],
                     "rewards": { "goal": 1.0, "hazard": -1.0, "wall": -1.0, "step": 0.0 } }"#,
            )
            .unwrap(),
        )
        .unwrap();
        let mut agent = QTableAgent::with_seed(2, 4, QTableAgentConfig::default(), 1);
        let mut renderer = TextRenderer {
            every: 2,
            last: None,
        };

        TrainingLoop::new(1, 10).run(&mut world, &mut agent, &mut renderer);
        assert!(renderer.last.is_none(), "taken when the episode ended");

        let mut renderer = TextRenderer {
            every: 0,
            last: None,
        };
        let mut env = world.clone();
        env.reset();
        let info = StepInfo {
            episode: 0,
            step: 1,
            action: MazeAction::Right,
            next_state: 1,
            reward: 1.0,
            done: true,
        };
        renderer.on_step(&env, &info);
        assert!(renderer.last.is_none(), "0 never renders");
    }
}
