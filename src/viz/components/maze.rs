use ratatui::{prelude::*, widgets::*};

use crate::gym::{Pos, RenderSnapshot};

/// Draws a [`RenderSnapshot`], two terminal columns per cell
pub struct MazeView<'a> {
    maze: Option<&'a RenderSnapshot>,
    episode: usize,
    status: Option<&'a str>,
}

impl<'a> MazeView<'a> {
    pub fn new(maze: Option<&'a RenderSnapshot>, episode: usize) -> Self {
        Self {
            maze,
            episode,
            status: None,
        }
    }

    /// Line shown under the grid, e.g. the last step taken
    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    fn cell(maze: &RenderSnapshot, pos: Pos) -> Span<'static> {
        if pos == maze.pos {
            "()".light_yellow().bold()
        } else if pos == maze.goal {
            "GG".black().on_green()
        } else if maze.walls.contains(&pos) {
            "██".gray()
        } else if maze.hazards.contains(&pos) {
            "^^".light_red()
        } else if pos == maze.start {
            "SS".dark_gray()
        } else {
            " .".dark_gray()
        }
    }
}

impl Widget for MazeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!("Maze (episode {})", self.episode));

        let Some(maze) = self.maze else {
            Paragraph::new("waiting for a rendered episode")
                .dark_gray()
                .block(block)
                .render(area, buf);
            return;
        };

        let mut lines = (0..maze.height)
            .map(|y| {
                (0..maze.width)
                    .map(|x| Self::cell(maze, Pos::new(x, y)))
                    .collect::<Vec<_>>()
                    .into()
            })
            .collect::<Vec<Line>>();
        if let Some(status) = self.status {
            lines.push(Line::default());
            lines.push(Line::styled(status.to_owned(), Style::default().dark_gray()));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
