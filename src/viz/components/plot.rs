use ratatui::{prelude::*, style::Stylize, widgets::*};

fn bound_labels(bounds: [f64; 2]) -> Vec<String> {
    bounds.iter().map(|x| format!("{x:.2}")).collect()
}

/// A single per-episode series with bounds that grow to fit the data
pub struct Plot {
    title: &'static str,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_labels: Vec<String>,
    y_labels: Vec<String>,
    data: Vec<(f64, f64)>,
}

impl Plot {
    pub fn new(title: &'static str, episodes: usize) -> Self {
        let x_bounds = [0.0, episodes as f64];
        Self {
            title,
            x_bounds,
            y_bounds: [f64::MAX, f64::MIN],
            x_labels: bound_labels(x_bounds),
            y_labels: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Fix the y range up front, e.g. `[0, 1]` for a rate
    pub fn with_y_bounds(mut self, y_bounds: [f64; 2]) -> Self {
        self.y_bounds = y_bounds;
        self.y_labels = bound_labels(y_bounds);
        self
    }

    pub fn push(&mut self, point: (f64, f64)) {
        let (x, y) = point;
        if x > self.x_bounds[1] {
            self.x_bounds[1] = x;
            self.x_labels = bound_labels(self.x_bounds);
        }

        let [lo, hi] = self.y_bounds;
        self.y_bounds = [lo.min(y), hi.max(y)];
        if self.y_bounds != [lo, hi] {
            self.y_labels = bound_labels(self.y_bounds);
        }

        self.data.push(point);
    }
}

impl Widget for &Plot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .cyan()
            .data(&self.data);

        let x_axis = Axis::default()
            .title("Episode")
            .dark_gray()
            .labels(self.x_labels.iter().map(|l| l.clone().bold()).collect())
            .bounds(self.x_bounds);

        let y_axis = Axis::default()
            .title(self.title)
            .dark_gray()
            .labels(self.y_labels.iter().map(|l| l.clone().bold()).collect())
            .bounds(self.y_bounds);

        Chart::new(vec![dataset])
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .padding(Padding::uniform(2)),
            )
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

/// A set of plots shown one at a time, selected with the arrow keys
pub struct Plots {
    plots: Vec<Plot>,
    selected: usize,
}

impl Plots {
    pub fn new(plots: Vec<Plot>) -> Self {
        Self { plots, selected: 0 }
    }

    pub fn next_plot(&mut self) {
        self.selected = (self.selected + 1) % self.plots.len().max(1);
    }

    pub fn prev_plot(&mut self) {
        let len = self.plots.len().max(1);
        self.selected = (self.selected + len - 1) % len;
    }

    /// Push one value per plot for `episode`, in plot order
    pub fn push(&mut self, episode: usize, values: &[f64]) {
        for (plot, value) in self.plots.iter_mut().zip(values) {
            plot.push((episode as f64, *value));
        }
    }
}

impl Widget for &Plots {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(plot) = self.plots.get(self.selected) {
            plot.render(area, buf);
        }

        Tabs::new(self.plots.iter().map(|p| p.title))
            .block(Block::default().padding(Padding::horizontal(2)))
            .white()
            .highlight_style(Style::default().light_green())
            .select(self.selected)
            .render(area, buf);
    }
}
