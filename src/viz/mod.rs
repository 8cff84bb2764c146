//! Terminal rendering for maze training runs
//!
//! [`MazeViewer`] is a [`StepHook`](crate::train::StepHook) that draws the maze, per-episode
//! plots and captured logs with `ratatui`. Install the log capture with [`init_logger`]
//! before training so log lines show up in the viewer instead of corrupting the screen.

mod components;
mod tui;
mod util;
mod viewer;

pub use viewer::MazeViewer;

/// Route the `log` facade into the viewer's log tab
pub fn init_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);
    Ok(())
}
