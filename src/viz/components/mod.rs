pub mod help;
pub mod log;
pub mod maze;
pub mod plot;

pub use log::Logs;
pub use maze::MazeView;
pub use plot::Plots;
