//! File-backed level grid
//!
//! Cells are stored column-major: `cells[column][row]`. All access to the
//! cells and tuning goes through one mutex so a level editor can save or
//! reload while a simulation reads the same grid. File I/O runs outside the
//! lock; only the parse/serialize step and the swap hold it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::error::LevelError;
use super::format;
use crate::consts::{DEFAULT_BALL_VELOCITY, DEFAULT_GRAVITY, DEFAULT_THEME};

/// Per-level tuning values stored after the grid data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTuning {
    /// Default ball speed multiplier
    pub ball_velocity: f32,
    /// Visual theme id
    pub theme: i32,
    /// Downward acceleration per reference tick
    pub gravity: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            ball_velocity: DEFAULT_BALL_VELOCITY,
            theme: DEFAULT_THEME,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

#[derive(Debug, Default)]
struct GridData {
    cells: Vec<Vec<i32>>,
    tuning: LevelTuning,
}

/// A level grid bound to its backing file
#[derive(Debug)]
pub struct LevelGrid {
    path: PathBuf,
    data: Mutex<GridData>,
}

impl LevelGrid {
    /// Create an empty grid backed by `path` (nothing is read yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: Mutex::new(GridData::default()),
        }
    }

    /// Create a grid with initial contents
    pub fn with_cells(path: impl Into<PathBuf>, cells: Vec<Vec<i32>>, tuning: LevelTuning) -> Self {
        Self {
            path: path.into(),
            data: Mutex::new(GridData { cells, tuning }),
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Critical sections never leave partial state; a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, GridData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load the grid from its file. Returns true on success.
    ///
    /// On a read failure the grid keeps its previous contents. On malformed
    /// data the grid is cleared. A short metadata line is logged but still
    /// counts as success.
    pub fn load(&self) -> bool {
        match self.try_load() {
            Ok(issues) => {
                for issue in issues {
                    log::error!("Level {}: {}", self.path.display(), issue);
                }
                true
            }
            Err(e) => {
                log::error!("Unable to load level {}: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Load the grid, returning the non-fatal issues found on success
    pub fn try_load(&self) -> Result<Vec<LevelError>, LevelError> {
        let text = fs::read_to_string(&self.path).map_err(|e| LevelError::io(&self.path, e))?;

        match format::parse(&text) {
            Ok(parsed) => {
                let mut data = self.lock();
                data.cells = parsed.cells;
                data.tuning = parsed.tuning;
                log::info!(
                    "Loaded level {} ({} columns)",
                    self.path.display(),
                    data.cells.len()
                );
                Ok(parsed.issues)
            }
            Err(e) => {
                *self.lock() = GridData::default();
                Err(e)
            }
        }
    }

    /// Write the grid to its file. Returns true on success.
    pub fn write(&self) -> bool {
        match self.try_write() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Unable to write level: {}", e);
                false
            }
        }
    }

    /// Write the grid to its file
    pub fn try_write(&self) -> Result<(), LevelError> {
        let text = {
            let data = self.lock();
            format::serialize(&data.cells, &data.tuning)
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LevelError::io(parent, e))?;
        }
        fs::write(&self.path, text).map_err(|e| LevelError::io(&self.path, e))?;
        log::info!("Level saved to {}", self.path.display());
        Ok(())
    }

    /// Delete the backing file. Returns true if it was removed.
    ///
    /// The in-memory grid is left untouched.
    pub fn delete_file(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) => {
                log::error!("{}", LevelError::io(&self.path, e));
                false
            }
        }
    }

    /// Set a cell, growing the grid with empty cells as needed
    pub fn set_cell(&self, column: usize, row: usize, code: i32) {
        let mut data = self.lock();
        if data.cells.len() <= column {
            data.cells.resize_with(column + 1, Vec::new);
        }
        let col = &mut data.cells[column];
        if col.len() <= row {
            col.resize(row + 1, 0);
        }
        col[row] = code;
    }

    /// Cell code at (column, row); 0 outside the grid
    pub fn cell(&self, column: usize, row: usize) -> i32 {
        self.lock()
            .cells
            .get(column)
            .and_then(|col| col.get(row))
            .copied()
            .unwrap_or(0)
    }

    /// Replace all cells
    pub fn set_cells(&self, cells: Vec<Vec<i32>>) {
        self.lock().cells = cells;
    }

    /// Copy of all cells
    pub fn cells(&self) -> Vec<Vec<i32>> {
        self.lock().cells.clone()
    }

    /// Copy of cells and tuning taken under a single lock
    pub fn snapshot(&self) -> (Vec<Vec<i32>>, LevelTuning) {
        let data = self.lock();
        (data.cells.clone(), data.tuning)
    }

    /// Remove all cells and reset tuning
    pub fn clear(&self) {
        *self.lock() = GridData::default();
    }

    pub fn column_count(&self) -> usize {
        self.lock().cells.len()
    }

    /// Length of the longest column
    pub fn longest_column(&self) -> usize {
        self.lock().cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn tuning(&self) -> LevelTuning {
        self.lock().tuning
    }

    pub fn set_tuning(&self, tuning: LevelTuning) {
        self.lock().tuning = tuning;
    }

    pub fn gravity(&self) -> f32 {
        self.lock().tuning.gravity
    }

    pub fn set_gravity(&self, gravity: f32) {
        self.lock().tuning.gravity = gravity;
    }

    pub fn ball_velocity(&self) -> f32 {
        self.lock().tuning.ball_velocity
    }

    pub fn set_ball_velocity(&self, ball_velocity: f32) {
        self.lock().tuning.ball_velocity = ball_velocity;
    }

    pub fn theme(&self) -> i32 {
        self.lock().tuning.theme
    }

    pub fn set_theme(&self, theme: i32) {
        self.lock().tuning.theme = theme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn sample_tuning() -> LevelTuning {
        LevelTuning {
            ball_velocity: 2.5,
            theme: 1,
            gravity: 0.05,
        }
    }

    #[test]
    fn test_set_cell_grows_with_empty_cells() {
        let grid = LevelGrid::new("unused.map");
        grid.set_cell(2, 3, -4);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.cells()[0], Vec::<i32>::new());
        assert_eq!(grid.cells()[2], vec![0, 0, 0, -4]);
        assert_eq!(grid.cell(2, 3), -4);
        assert_eq!(grid.cell(2, 1), 0);
        assert_eq!(grid.cell(9, 9), 0);
        assert_eq!(grid.longest_column(), 4);

        // Overwrite in place without growing
        grid.set_cell(2, 0, 1);
        assert_eq!(grid.cells()[2], vec![1, 0, 0, -4]);
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels").join("one.map");

        let cells = vec![vec![1, 0, -2], vec![-1, -1, -1]];
        let grid = LevelGrid::with_cells(&path, cells, sample_tuning());
        assert!(grid.write());

        let fresh = LevelGrid::new(&path);
        assert!(fresh.load());
        assert_eq!(fresh.cells(), grid.cells());
        assert_eq!(fresh.tuning(), sample_tuning());
    }

    #[test]
    fn test_written_file_is_comma_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.map");
        let grid = LevelGrid::with_cells(&path, vec![vec![3, -1]], sample_tuning());
        assert!(grid.write());
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "3,-1\n;\n2.5,1,0.05\n");
    }

    #[test]
    fn test_load_missing_file_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.map");
        let grid = LevelGrid::with_cells(path, vec![vec![1]], sample_tuning());

        assert!(!grid.load());
        assert!(grid.try_load().unwrap_err().is_not_found());
        assert_eq!(grid.cells(), vec![vec![1]]);
        assert_eq!(grid.tuning(), sample_tuning());
    }

    #[test]
    fn test_load_malformed_clears_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.map");
        fs::write(&path, "1,2\n1,oops\n;\n1,0,0\n").unwrap();

        let grid = LevelGrid::with_cells(&path, vec![vec![5, 5]], sample_tuning());
        assert!(!grid.load());
        assert!(grid.cells().is_empty());
        assert_eq!(grid.tuning(), LevelTuning::default());
    }

    #[test]
    fn test_load_short_metadata_succeeds_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.map");
        fs::write(&path, "-1,-1\n;\n3.0\n").unwrap();

        let grid = LevelGrid::with_cells(&path, Vec::new(), sample_tuning());
        assert!(grid.load());
        assert_eq!(grid.cells(), vec![vec![-1, -1]]);
        assert_eq!(grid.tuning(), LevelTuning::default());

        let issues = grid.try_load().unwrap();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_delete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.map");
        let grid = LevelGrid::with_cells(&path, vec![vec![1]], LevelTuning::default());
        assert!(grid.write());
        assert!(path.exists());
        assert!(grid.delete_file());
        assert!(!path.exists());
        assert!(!grid.delete_file());
        assert_eq!(grid.cells(), vec![vec![1]]);
    }

    #[test]
    fn test_write_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let grid = LevelGrid::with_cells(dir.path(), vec![vec![1]], LevelTuning::default());
        assert!(!grid.write());
    }

    #[test]
    fn test_concurrent_edit_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.map");
        let grid = Arc::new(LevelGrid::new(&path));

        let editors: Vec<_> = (0..4)
            .map(|column| {
                let grid = Arc::clone(&grid);
                thread::spawn(move || {
                    for row in 0..25 {
                        grid.set_cell(column, row, -1);
                        if row % 10 == 0 {
                            assert!(grid.write());
                        }
                    }
                })
            })
            .collect();
        for editor in editors {
            editor.join().unwrap();
        }

        assert!(grid.write());
        let fresh = LevelGrid::new(&path);
        assert!(fresh.load());
        assert_eq!(fresh.column_count(), 4);
        assert!(fresh.cells().iter().all(|col| col.len() == 25 && col.iter().all(|&c| c == -1)));
    }
}
