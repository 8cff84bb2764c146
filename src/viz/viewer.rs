use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{help::render_help, plot::Plot, Logs, MazeView, Plots},
    tui::{self, Tui},
    util::event_keycode,
};
use crate::{
    ds::RingBuffer,
    gym::{GridWorld, MazeAction, RenderSnapshot},
    train::{Control, EpisodeRecord, StepHook, StepInfo},
};

const TABS: [&str; 2] = ["Plots", "Logs"];
const SUCCESS_WINDOW: usize = 50;
const REDRAW_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal viewer for training runs on a [`GridWorld`]
///
/// Pass it as the hook to [`TrainingLoop::run`](crate::train::TrainingLoop::run). Every
/// `render_every`-th episode is drawn step by step, pausing `frame_delay` per step; the
/// plots and progress gauge update after every episode. Press `q` to stop the run and
/// `n` to skip the rest of the rendered episode.
///
/// The terminal is taken over on construction and restored on drop.
pub struct MazeViewer {
    terminal: Tui,
    render_every: usize,
    frame_delay: Duration,
    total_episodes: usize,
    episode: usize,
    rendering: bool,
    selected_tab: usize,
    show_help: bool,
    maze: Option<RenderSnapshot>,
    last_step: Option<String>,
    plots: Plots,
    success_window: RingBuffer<f64>,
    logs: Logs,
    pending: Control,
    last_draw: Instant,
}

impl MazeViewer {
    /// Take over the terminal for a run of `total_episodes` episodes
    pub fn new(total_episodes: usize) -> io::Result<Self> {
        let plots = Plots::new(vec![
            Plot::new("Reward", total_episodes),
            Plot::new("Steps", total_episodes),
            Plot::new("Success rate", total_episodes).with_y_bounds([0.0, 1.0]),
        ]);

        Ok(Self {
            terminal: tui::init()?,
            render_every: 50,
            frame_delay: Duration::from_millis(50),
            total_episodes,
            episode: 0,
            rendering: false,
            selected_tab: 0,
            show_help: false,
            maze: None,
            last_step: None,
            plots,
            success_window: RingBuffer::new(SUCCESS_WINDOW),
            logs: Logs::new(),
            pending: Control::Continue,
            last_draw: Instant::now(),
        })
    }

    /// Draw every `n`-th episode step by step; `0` never draws steps
    pub fn with_render_every(mut self, n: usize) -> Self {
        self.render_every = n;
        self
    }

    /// Pause between drawn steps
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Keep showing the final state until the user presses `q` or `Esc`
    pub fn wait_for_quit(&mut self) -> io::Result<()> {
        loop {
            self.draw()?;
            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            match event_keycode(&event::read()?) {
                Some(KeyCode::Char('q') | KeyCode::Esc) => return Ok(()),
                Some(key) => {
                    self.handle_key(key);
                }
                None => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> Control {
        match key {
            KeyCode::Char('q') => return Control::Stop,
            KeyCode::Char('n') => return Control::EndEpisode,
            KeyCode::Char('h') => self.show_help = !self.show_help,
            KeyCode::Tab => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            KeyCode::Left if self.selected_tab == 0 => self.plots.prev_plot(),
            KeyCode::Right if self.selected_tab == 0 => self.plots.next_plot(),
            key if self.selected_tab == 1 => self.logs.handle_key(key),
            _ => {}
        }
        Control::Continue
    }

    fn draw(&mut self) -> io::Result<()> {
        let view = View {
            episode: self.episode,
            total_episodes: self.total_episodes,
            selected_tab: self.selected_tab,
            show_help: self.show_help,
            maze: self.maze.as_ref(),
            last_step: self.last_step.as_deref(),
            plots: &self.plots,
            logs: &self.logs,
        };
        self.terminal
            .draw(|frame| frame.render_widget(view, frame.size()))?;
        self.last_draw = Instant::now();
        Ok(())
    }

    /// Handle key presses until `timeout` has passed or one of them asks the loop to act
    fn poll(&mut self, timeout: Duration) -> io::Result<Control> {
        let deadline = Instant::now() + timeout;
        while event::poll(deadline.saturating_duration_since(Instant::now()))? {
            let Some(key) = event_keycode(&event::read()?) else {
                continue;
            };
            match self.handle_key(key) {
                Control::Continue => {}
                control => return Ok(control),
            }
        }
        Ok(Control::Continue)
    }

    fn refresh(&mut self, timeout: Duration) -> Control {
        let result = self.draw().and_then(|()| self.poll(timeout));
        result.unwrap_or_else(|e| {
            log::error!("terminal error, stopping training: {e}");
            Control::Stop
        })
    }
}

impl StepHook<GridWorld> for MazeViewer {
    fn on_episode_start(&mut self, env: &GridWorld, episode: usize) -> Control {
        self.episode = episode;
        self.rendering = self.render_every > 0 && episode % self.render_every == 0;

        let pending = std::mem::take(&mut self.pending);
        if pending != Control::Continue || !self.rendering {
            return pending;
        }

        self.maze = Some(env.render_snapshot());
        self.last_step = None;
        match self.refresh(Duration::ZERO) {
            Control::Stop => Control::Stop,
            _ => Control::Continue,
        }
    }

    fn on_step(&mut self, env: &GridWorld, info: &StepInfo<usize, MazeAction>) -> Control {
        if !self.rendering {
            return Control::Continue;
        }
        self.episode = info.episode;
        if let Some(maze) = self.maze.as_mut() {
            maze.pos = env.index_to_pos(info.next_state);
        }
        self.last_step = Some(format!(
            "step {}: {:?}, reward {:+.2}{}",
            info.step,
            info.action,
            info.reward,
            if info.done { ", goal" } else { "" }
        ));
        self.refresh(self.frame_delay)
    }

    fn on_episode_end(&mut self, episode: usize, record: &EpisodeRecord) {
        self.episode = episode + 1;
        self.success_window.push(f64::from(u8::from(record.success)));
        self.plots.push(
            episode,
            &[
                record.total_reward,
                record.steps as f64,
                self.success_window.mean(),
            ],
        );

        if self.rendering || self.last_draw.elapsed() >= REDRAW_INTERVAL {
            // Between episodes only a stop request is kept.
            if self.refresh(Duration::ZERO) == Control::Stop {
                self.pending = Control::Stop;
            }
        }
    }
}

impl Drop for MazeViewer {
    fn drop(&mut self) {
        let _ = tui::restore();
    }
}

struct View<'a> {
    episode: usize,
    total_episodes: usize,
    selected_tab: usize,
    show_help: bool,
    maze: Option<&'a RenderSnapshot>,
    last_step: Option<&'a str>,
    plots: &'a Plots,
    logs: &'a Logs,
}

impl Widget for View<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [main, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

        let maze_width = self
            .maze
            .map_or(0, |m| m.width * 2 + 2)
            .clamp(30, usize::from(u16::MAX)) as u16;
        let [maze_area, tab_area] =
            Layout::horizontal([Constraint::Length(maze_width), Constraint::Fill(1)]).areas(main);

        MazeView::new(self.maze, self.episode)
            .with_status(self.last_step)
            .render(maze_area, buf);

        let [tab_bar, content] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(tab_area);
        Tabs::new(TABS)
            .white()
            .highlight_style(Style::default().yellow())
            .select(self.selected_tab)
            .render(tab_bar, buf);

        match self.selected_tab {
            0 => self.plots.render(content, buf),
            _ => self.logs.render(content, buf),
        }

        let total = self.total_episodes.max(1);
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Progress"),
            )
            .gauge_style(Color::Cyan)
            .label(format!("{}/{}", self.episode, self.total_episodes))
            .ratio((self.episode as f64 / total as f64).min(1.0))
            .render(footer, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}
