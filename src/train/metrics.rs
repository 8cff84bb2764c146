use serde::Serialize;

/// Summary of one finished episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeRecord {
    pub total_reward: f64,
    pub steps: usize,
    /// The agent ended the episode on the goal
    pub success: bool,
}

/// Append-only per-episode results of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    records: Vec<EpisodeRecord>,
    cancelled: bool,
}

/// Upper bound on the records reserved up front
const MAX_PREALLOC: usize = 4096;

impl Metrics {
    /// Empty metrics with room for `episodes` records, up to a fixed bound
    pub fn with_capacity(episodes: usize) -> Self {
        Self {
            records: Vec::with_capacity(episodes.min(MAX_PREALLOC)),
            cancelled: false,
        }
    }

    pub fn push(&mut self, record: EpisodeRecord) {
        self.records.push(record);
    }

    pub(crate) fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The run was stopped by a hook before all episodes ran
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Total reward per episode
    pub fn rewards(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.total_reward).collect()
    }

    /// Step count per episode
    pub fn steps(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.steps).collect()
    }

    /// `1` for each episode that reached the goal, `0` otherwise
    pub fn successes(&self) -> Vec<u8> {
        self.records.iter().map(|r| u8::from(r.success)).collect()
    }

    /// Fraction of episodes that reached the goal, `0.0` when empty
    pub fn success_rate(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.records.iter().filter(|r| r.success).count() as f64 / self.len() as f64
    }

    /// Mean total reward per episode, `0.0` when empty
    pub fn mean_reward(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.records.iter().map(|r| r.total_reward).sum::<f64>() / self.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total_reward: f64, steps: usize, success: bool) -> EpisodeRecord {
        EpisodeRecord {
            total_reward,
            steps,
            success,
        }
    }

    #[test]
    fn columns_line_up() {
        let mut metrics = Metrics::default();
        metrics.push(record(-3.0, 30, false));
        metrics.push(record(8.5, 12, true));
        metrics.push(record(9.0, 7, true));

        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics.rewards(), [-3.0, 8.5, 9.0]);
        assert_eq!(metrics.steps(), [30, 12, 7]);
        assert_eq!(metrics.successes(), [0, 1, 1]);
        assert_eq!(metrics.success_rate(), 2.0 / 3.0);
        assert_eq!(metrics.mean_reward(), 14.5 / 3.0);
        assert!(!metrics.is_cancelled());
    }

    #[test]
    fn empty_summaries() {
        let metrics = Metrics::default();
        assert!(metrics.is_empty());
        assert_eq!(metrics.success_rate(), 0.0);
        assert_eq!(metrics.mean_reward(), 0.0);
    }

    #[test]
    fn reservation_is_bounded() {
        let mut metrics = Metrics::with_capacity(usize::MAX);
        assert!(metrics.is_empty());
        metrics.push(record(1.0, 1, true));
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn serializes_records() {
        let mut metrics = Metrics::default();
        metrics.push(record(1.5, 2, true));
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["records"][0]["steps"], 2);
        assert_eq!(json["records"][0]["success"], true);
        assert_eq!(json["cancelled"], false);
    }
}
