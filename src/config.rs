use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    gym::{MazeDescription, Pos, Rewards},
};

/// Maze description as written in a JSON config file
///
/// ```json
/// {
///   "width": 3, "height": 1,
///   "start": [0, 0], "goal": [2, 0],
///   "walls": [], "hazards": [[1, 0]],
///   "rewards": { "goal": 10.0, "hazard": -5.0, "wall": -1.0, "step": -0.1 }
/// }
/// ```
///
/// Nothing here is trusted until [`validate`](MazeConfig::validate) succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub start: (usize, usize),
    pub goal: (usize, usize),
    #[serde(default)]
    pub walls: Vec<(usize, usize)>,
    #[serde(default, alias = "traps")]
    pub hazards: Vec<(usize, usize)>,
    pub rewards: Rewards,
}

impl MazeConfig {
    /// Parse a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading maze config from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Check dimensions and bounds, producing the immutable [`MazeDescription`]
    ///
    /// Checks run in the order dimensions, start, goal, walls, hazards; the first failure is reported.
    pub fn validate(self) -> Result<MazeDescription, ConfigError> {
        let Self {
            width,
            height,
            start,
            goal,
            walls,
            hazards,
            rewards,
        } = self;

        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }

        let check = |what: &'static str, pos: (usize, usize)| {
            let pos = Pos::from(pos);
            if pos.x < width && pos.y < height {
                Ok(pos)
            } else {
                Err(ConfigError::OutOfBounds {
                    what,
                    pos,
                    width,
                    height,
                })
            }
        };

        let start = check("start", start)?;
        let goal = check("goal", goal)?;
        let walls = walls
            .into_iter()
            .map(|w| check("wall", w))
            .collect::<Result<_, _>>()?;
        let hazards = hazards
            .into_iter()
            .map(|h| check("hazard", h))
            .collect::<Result<_, _>>()?;

        let maze = MazeDescription {
            width,
            height,
            start,
            goal,
            walls,
            hazards,
            rewards,
        };
        log::debug!(
            "validated {}x{} maze with {} walls and {} hazards",
            width,
            height,
            maze.walls.len(),
            maze.hazards.len()
        );
        Ok(maze)
    }
}
