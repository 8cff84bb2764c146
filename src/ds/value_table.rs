use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A dense `states x actions` table of values, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    data: Vec<f64>,
    num_states: usize,
    num_actions: usize,
}

impl ValueTable {
    /// A table of zeros
    ///
    /// **Panics** if either dimension is zero
    pub fn zeros(num_states: usize, num_actions: usize) -> Self {
        assert!(num_states > 0, "value table needs at least one state");
        assert!(num_actions > 0, "value table needs at least one action");
        Self {
            data: vec![0.0; num_states * num_actions],
            num_states,
            num_actions,
        }
    }

    /// `[num_states, num_actions]`
    pub fn shape(&self) -> [usize; 2] {
        [self.num_states, self.num_actions]
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// The values of every action in `state`
    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.num_actions;
        &self.data[start..start + self.num_actions]
    }

    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.row(state)[action]
    }

    pub fn get_mut(&mut self, state: usize, action: usize) -> &mut f64 {
        assert!(action < self.num_actions, "action {action} out of range");
        &mut self.data[state * self.num_actions + action]
    }

    /// Largest value in `state`
    pub fn max(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Copy the table out as a shaped flat buffer
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            shape: self.shape(),
            data: self.data.clone(),
        }
    }

    /// Replace every value with the contents of `snapshot`
    ///
    /// Fails with [`Error::ShapeMismatch`] and leaves the table untouched if the snapshot
    /// was taken from a differently shaped table, or its buffer does not match its own shape.
    pub fn restore(&mut self, snapshot: &TableSnapshot) -> Result<()> {
        let expected = self.shape();
        let [rows, cols] = snapshot.shape;
        if snapshot.shape != expected || snapshot.data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected,
                found: [rows, cols],
            });
        }
        self.data.copy_from_slice(&snapshot.data);
        Ok(())
    }
}

/// A value table exported as a flat row-major buffer with explicit shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// `[num_states, num_actions]`
    pub shape: [usize; 2],
    pub data: Vec<f64>,
}

impl TableSnapshot {
    /// Write the snapshot to `path` as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        log::info!("saved {:?} value table to {}", self.shape, path.display());
        Ok(())
    }

    /// Read a snapshot written by [`save`](TableSnapshot::save)
    ///
    /// The shape is not checked here; that happens on restore.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        log::info!(
            "loaded {:?} value table from {}",
            snapshot.shape,
            path.display()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(num_states: usize, num_actions: usize) -> ValueTable {
        let mut table = ValueTable::zeros(num_states, num_actions);
        for s in 0..num_states {
            for a in 0..num_actions {
                *table.get_mut(s, a) = (s * 10 + a) as f64;
            }
        }
        table
    }

    #[test]
    fn zeros_and_rows() {
        let table = ValueTable::zeros(3, 4);
        assert_eq!(table.shape(), [3, 4]);
        assert!(table.row(2).iter().all(|&v| v == 0.0), "initialized to zero");

        let table = filled(3, 4);
        assert_eq!(table.row(1), [10.0, 11.0, 12.0, 13.0], "row-major rows");
        assert_eq!(table.get(2, 3), 23.0);
        assert_eq!(table.max(2), 23.0);
    }

    #[test]
    fn max_with_negatives() {
        let mut table = ValueTable::zeros(1, 3);
        *table.get_mut(0, 0) = -3.0;
        *table.get_mut(0, 1) = -1.0;
        *table.get_mut(0, 2) = -2.0;
        assert_eq!(table.max(0), -1.0);
    }

    #[test]
    fn snapshot_restore() {
        let source = filled(2, 3);
        let snapshot = source.snapshot();
        assert_eq!(snapshot.shape, [2, 3]);
        assert_eq!(snapshot.data.len(), 6);

        let mut target = ValueTable::zeros(2, 3);
        target.restore(&snapshot).unwrap();
        assert_eq!(target, source, "restored table matches");
    }

    #[test]
    fn restore_shape_mismatch() {
        let snapshot = filled(3, 2).snapshot();
        let mut target = filled(2, 3);
        let before = target.clone();

        let err = target.restore(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: [2, 3],
                found: [3, 2]
            }
        ));
        assert_eq!(target, before, "no partial restore");
    }

    #[test]
    fn restore_truncated_buffer() {
        let mut snapshot = filled(2, 3).snapshot();
        snapshot.data.pop();
        let mut target = ValueTable::zeros(2, 3);
        assert!(matches!(
            target.restore(&snapshot),
            Err(Error::ShapeMismatch { .. })
        ));
        assert_eq!(target, ValueTable::zeros(2, 3), "no partial restore");
    }

    #[test]
    fn save_load_file() {
        let path = std::env::temp_dir().join(format!(
            "smart_maze_table_{}.json",
            std::process::id()
        ));
        let snapshot = filled(4, 4).snapshot();
        snapshot.save(&path).unwrap();
        let loaded = TableSnapshot::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    #[should_panic]
    fn zero_actions() {
        ValueTable::zeros(4, 0);
    }
}
