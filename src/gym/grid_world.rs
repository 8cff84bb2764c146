use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, VariantArray};

use crate::{
    config::MazeConfig,
    env::{DiscreteAction, Environment},
    error::ConfigError,
};

/// A cell coordinate; `x` grows to the right, `y` grows downwards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell in direction `action`, or `None` if it would leave the positive quadrant
    fn offset(self, action: MazeAction) -> Option<Pos> {
        let (dx, dy) = action.delta();
        Some(Pos {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(EnumCount, EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MazeAction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl MazeAction {
    /// Unit displacement `(dx, dy)`
    pub const fn delta(self) -> (isize, isize) {
        match self {
            MazeAction::Up => (0, -1),
            MazeAction::Right => (1, 0),
            MazeAction::Down => (0, 1),
            MazeAction::Left => (-1, 0),
        }
    }
}

impl DiscreteAction for MazeAction {
    const COUNT: usize = <Self as EnumCount>::COUNT;

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        Self::VARIANTS[index]
    }
}

/// Reward components; a transition's reward is the sum of every component that applies
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    pub goal: f64,
    #[serde(alias = "trap")]
    pub hazard: f64,
    pub wall: f64,
    pub step: f64,
}

/// A validated maze, produced by [`MazeConfig::validate`]
///
/// Every cell it mentions lies inside the grid. Walls and hazards may overlap each other
/// and the goal.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeDescription {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) start: Pos,
    pub(crate) goal: Pos,
    pub(crate) walls: HashSet<Pos>,
    pub(crate) hazards: HashSet<Pos>,
    pub(crate) rewards: Rewards,
}

impl MazeDescription {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn walls(&self) -> &HashSet<Pos> {
        &self.walls
    }

    pub fn hazards(&self) -> &HashSet<Pos> {
        &self.hazards
    }

    pub fn rewards(&self) -> Rewards {
        self.rewards
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }
}

/// An owned copy of everything a renderer needs to draw the maze
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub width: usize,
    pub height: usize,
    pub pos: Pos,
    pub start: Pos,
    pub goal: Pos,
    pub walls: HashSet<Pos>,
    pub hazards: HashSet<Pos>,
}

/// One character per cell: `A` agent, `G` goal, `#` wall, `x` hazard, `S` start, `.` free
impl fmt::Display for RenderSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                let pos = Pos::new(x, y);
                let cell = if pos == self.pos {
                    'A'
                } else if pos == self.goal {
                    'G'
                } else if self.walls.contains(&pos) {
                    '#'
                } else if self.hazards.contains(&pos) {
                    'x'
                } else if pos == self.start {
                    'S'
                } else {
                    '.'
                };
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

/// A deterministic grid maze with walls, hazard cells, a start and a goal
///
/// States are cell indices `y * width + x`. Bumping into a wall or the edge of the grid
/// leaves the agent in place and costs `step + wall`. Hazards are penalized but do not
/// end the episode; only reaching the goal does.
#[derive(Clone, Debug)]
pub struct GridWorld {
    maze: MazeDescription,
    pos: Pos,
}

impl GridWorld {
    pub fn new(maze: MazeDescription) -> Self {
        let pos = maze.start;
        Self { maze, pos }
    }

    /// Validate `config` and build a world from it
    pub fn from_config(config: MazeConfig) -> Result<Self, ConfigError> {
        config.validate().map(Self::new)
    }

    pub fn maze(&self) -> &MazeDescription {
        &self.maze
    }

    pub fn width(&self) -> usize {
        self.maze.width
    }

    pub fn height(&self) -> usize {
        self.maze.height
    }

    /// Current agent position
    pub fn position(&self) -> Pos {
        self.pos
    }

    pub fn start(&self) -> Pos {
        self.maze.start
    }

    pub fn goal(&self) -> Pos {
        self.maze.goal
    }

    pub fn num_states(&self) -> usize {
        self.maze.width * self.maze.height
    }

    pub const fn num_actions(&self) -> usize {
        <MazeAction as DiscreteAction>::COUNT
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.maze.in_bounds(pos)
    }

    pub fn state_index(&self, pos: Pos) -> usize {
        pos.y * self.maze.width + pos.x
    }

    /// Inverse of [`state_index`](Self::state_index)
    ///
    /// **Panics** if `index` is not a valid state
    pub fn index_to_pos(&self, index: usize) -> Pos {
        assert!(
            index < self.num_states(),
            "state index {index} out of range for a {}x{} maze",
            self.maze.width,
            self.maze.height
        );
        Pos::new(index % self.maze.width, index / self.maze.width)
    }

    fn is_blocked(&self, pos: Pos) -> bool {
        !self.in_bounds(pos) || self.maze.walls.contains(&pos)
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            width: self.maze.width,
            height: self.maze.height,
            pos: self.pos,
            start: self.maze.start,
            goal: self.maze.goal,
            walls: self.maze.walls.clone(),
            hazards: self.maze.hazards.clone(),
        }
    }
}

impl Environment for GridWorld {
    type State = usize;
    type Action = MazeAction;

    fn reset(&mut self) -> Self::State {
        self.pos = self.maze.start;
        self.state_index(self.pos)
    }

    fn step(&mut self, action: Self::Action) -> (Self::State, f64, bool) {
        let Rewards {
            goal,
            hazard,
            wall,
            step,
        } = self.maze.rewards;
        let mut reward = step;
        let mut done = false;

        match self.pos.offset(action).filter(|&p| !self.is_blocked(p)) {
            None => reward += wall,
            Some(next) => {
                self.pos = next;
                if self.maze.hazards.contains(&next) {
                    reward += hazard;
                }
                if next == self.maze.goal {
                    reward += goal;
                    done = true;
                }
            }
        }

        (self.state_index(self.pos), reward, done)
    }

    fn is_success(&self) -> bool {
        self.pos == self.maze.goal
    }
}
