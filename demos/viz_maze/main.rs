use std::{error::Error, path::PathBuf, time::Duration};

use clap::Parser;
use smart_maze::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    config::MazeConfig,
    gym::GridWorld,
    train::TrainingLoop,
    viz::{self, MazeViewer},
};

#[derive(Parser, Debug)]
#[command(
    about = "Train a Q-learning agent on a maze in the terminal viewer",
    allow_negative_numbers = true
)]
struct Args {
    /// Path to the maze JSON config
    #[arg(long, default_value = "demos/mazes/basic.json")]
    config: PathBuf,

    #[arg(long, default_value_t = 300)]
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

    /// Draw every N-th episode step by step; 0 only updates the plots
    #[arg(long, default_value_t = 25)]
    render_every: usize,

    /// Pause between drawn steps, in milliseconds
    #[arg(long, default_value_t = 40)]
    frame_delay_ms: u64,

    /// Keep the viewer and its plots open after training until `q`
    #[arg(long)]
    show_plot: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
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

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    viz::init_logger(log::LevelFilter::Info)?;

    let mut world = GridWorld::from_config(MazeConfig::from_path(&args.config)?)?;
    let (states, actions) = (world.num_states(), world.num_actions());
    let mut agent = match args.seed {
        Some(seed) => QTableAgent::with_seed(states, actions, args.agent_config(), seed),
        None => QTableAgent::new(states, actions, args.agent_config()),
    };

    let mut viewer = MazeViewer::new(args.episodes)?
        .with_render_every(args.render_every)
        .with_frame_delay(Duration::from_millis(args.frame_delay_ms));

    let metrics =
        TrainingLoop::new(args.episodes, args.max_steps).run(&mut world, &mut agent, &mut viewer);
    log::info!(
        "finished {} episodes, success rate {:.3}",
        metrics.len(),
        metrics.success_rate()
    );

    if args.show_plot && !metrics.is_cancelled() {
        viewer.wait_for_quit()?;
    }

    Ok(())
}
