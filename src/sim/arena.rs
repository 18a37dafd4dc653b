//! Arena construction from a level grid
//!
//! Placement follows the level file's orientation: each grid column is laid
//! out as one horizontal strip of blocks, stacked from the top of the screen.
//! Grid column `c` becomes screen row `c`, grid row `r` becomes screen
//! column `r`. [`ArenaBuilder::cell_center`] is the only place that converts
//! between the two.

use std::path::Path;

use glam::Vec2;

use super::state::{Obstacle, ObstacleId, ObstacleKind};
use crate::level::{LevelError, LevelGrid, LevelTuning, OversizeAxis};
use crate::settings::Settings;

/// Obstacle lookup indexed `[screen_row][screen_col]`
pub type Lookup = Vec<Vec<Option<ObstacleId>>>;

/// Outcome of applying a hit to an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// Lost a hit point, `remaining` left
    Damaged { remaining: i32 },
    /// Took its last hit and was removed
    Destroyed,
    /// Permanent block with damage disabled
    Unaffected,
    /// No such obstacle in the arena
    Missing,
}

/// Live obstacles for one level, plus the level's tuning
#[derive(Debug)]
pub struct Arena {
    /// Grid order; collision tests iterate this order
    obstacles: Vec<Obstacle>,
    lookup: Lookup,
    tuning: LevelTuning,
    bounds: Vec2,
    /// Advisory oversize reports from the build
    warnings: Vec<LevelError>,
}

impl Arena {
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Scored blocks (negative cell codes)
    pub fn destructible(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.kind == ObstacleKind::Destructible)
    }

    /// Blocks that don't count for clearing (positive cell codes)
    pub fn permanent(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.kind == ObstacleKind::Permanent)
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// Obstacle at a screen cell, if any
    pub fn lookup_at(&self, screen_row: usize, screen_col: usize) -> Option<ObstacleId> {
        self.lookup
            .get(screen_row)
            .and_then(|row| row.get(screen_col))
            .copied()
            .flatten()
    }

    /// Obstacle in the screen cell offset by (d_row, d_col) from `id`
    pub fn neighbor(&self, id: ObstacleId, d_row: isize, d_col: isize) -> Option<ObstacleId> {
        let (column, row) = self.obstacle(id)?.cell;
        let screen_row = column.checked_add_signed(d_row)?;
        let screen_col = row.checked_add_signed(d_col)?;
        self.lookup_at(screen_row, screen_col)
    }

    pub fn tuning(&self) -> &LevelTuning {
        &self.tuning
    }

    pub fn theme(&self) -> i32 {
        self.tuning.theme
    }

    /// Playing field size
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn warnings(&self) -> &[LevelError] {
        &self.warnings
    }

    /// Scored blocks still standing
    pub fn remaining_scored(&self) -> usize {
        self.destructible().count()
    }

    /// True once no scored block remains
    pub fn is_cleared(&self) -> bool {
        self.remaining_scored() == 0
    }

    /// Apply one hit to an obstacle, removing it once it runs out of hit points
    pub fn apply_hit(&mut self, id: ObstacleId, permanent_take_damage: bool) -> HitResult {
        let Some(idx) = self.obstacles.iter().position(|o| o.id == id) else {
            return HitResult::Missing;
        };

        let obstacle = &mut self.obstacles[idx];
        if obstacle.kind == ObstacleKind::Permanent && !permanent_take_damage {
            return HitResult::Unaffected;
        }

        if !obstacle.decrease_life() {
            if obstacle.has_hits_left() {
                return HitResult::Damaged {
                    remaining: obstacle.hit_points,
                };
            }
            // Already at zero (set externally); treat as destroyed
        }

        let removed = self.obstacles.remove(idx);
        let (column, row) = removed.cell;
        if let Some(slot) = self.lookup.get_mut(column).and_then(|r| r.get_mut(row)) {
            *slot = None;
        }
        log::debug!("Block {:?} destroyed at cell {:?}", removed.id, removed.cell);
        HitResult::Destroyed
    }
}

/// Places grid cells on a screen of fixed size.
///
/// Block dimensions are at least one pixel.
#[derive(Debug, Clone, Copy)]
pub struct ArenaBuilder {
    screen_width: u32,
    screen_height: u32,
    cell_width: u32,
    cell_height: u32,
}

impl ArenaBuilder {
    pub fn new(settings: &Settings) -> Self {
        Self {
            screen_width: settings.screen_width,
            screen_height: settings.screen_height,
            cell_width: settings.cell_width.max(1),
            cell_height: settings.cell_height.max(1),
        }
    }

    /// Builder for a screen size with the default block size
    pub fn with_screen(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            ..Self::new(&Settings::default())
        }
    }

    /// Build an arena from the grid's current contents
    pub fn build(&self, grid: &LevelGrid) -> Arena {
        let (cells, tuning) = grid.snapshot();
        self.build_cells(&cells, tuning)
    }

    /// Build an arena from column-major cells.
    ///
    /// Oversized levels are logged and placed anyway; blocks may overlap or
    /// fall outside the screen.
    pub fn build_cells(&self, cells: &[Vec<i32>], tuning: LevelTuning) -> Arena {
        let longest = cells.iter().map(Vec::len).max().unwrap_or(0);
        let mut warnings = Vec::new();

        let max_columns = (self.screen_width / self.cell_width) as usize;
        if longest > max_columns {
            warnings.push(LevelError::Oversize {
                axis: OversizeAxis::Horizontal,
                found: longest,
                capacity: max_columns,
            });
        }
        let max_rows = (self.screen_height / self.cell_height) as usize;
        if cells.len() > max_rows {
            warnings.push(LevelError::Oversize {
                axis: OversizeAxis::Vertical,
                found: cells.len(),
                capacity: max_rows,
            });
        }
        for warning in &warnings {
            log::warn!("{}", warning);
        }

        let start_x = self.start_x(longest);
        let size = Vec2::new(self.cell_width as f32, self.cell_height as f32);

        let mut obstacles = Vec::new();
        let mut lookup: Lookup = Vec::with_capacity(cells.len());
        let mut next_id = 0u32;

        for (column, codes) in cells.iter().enumerate() {
            let mut screen_row = Vec::with_capacity(codes.len());
            for (row, &code) in codes.iter().enumerate() {
                if code == 0 {
                    screen_row.push(None);
                    continue;
                }
                let id = ObstacleId(next_id);
                next_id += 1;
                let pos = self.cell_center(start_x, column, row);
                obstacles.push(Obstacle::from_code(id, code, pos, size, (column, row)));
                screen_row.push(Some(id));
            }
            lookup.push(screen_row);
        }

        log::info!(
            "Built arena: {} blocks ({} scored), theme {}",
            obstacles.len(),
            obstacles.iter().filter(|o| o.is_scored()).count(),
            tuning.theme
        );

        Arena {
            obstacles,
            lookup,
            tuning,
            bounds: Vec2::new(self.screen_width as f32, self.screen_height as f32),
            warnings,
        }
    }

    /// Center x of the first block in each strip, centering the longest strip
    pub fn start_x(&self, longest_column: usize) -> i64 {
        let cw = self.cell_width as i64;
        (self.screen_width as i64 - longest_column as i64 * cw) / 2 + cw / 2
    }

    /// World center of grid cell (column, row)
    pub fn cell_center(&self, start_x: i64, column: usize, row: usize) -> Vec2 {
        let x = start_x + row as i64 * self.cell_width as i64;
        let y = (self.cell_height / 2) as i64 + column as i64 * self.cell_height as i64;
        Vec2::new(x as f32, y as f32)
    }
}

/// A level loaded from disk and placed on screen
#[derive(Debug)]
pub struct LoadedLevel {
    pub arena: Arena,
    /// False if the file could not be read or parsed
    pub loaded: bool,
}

/// Load a level file and build its arena.
///
/// A failed load still yields an arena from whatever the grid holds (empty
/// for a fresh grid), with `loaded` set to false.
pub fn load_level(path: impl AsRef<Path>, settings: &Settings) -> LoadedLevel {
    let path = path.as_ref();
    log::info!("Loading level {}", path.display());
    let grid = LevelGrid::new(path);
    let loaded = grid.load();
    let arena = ArenaBuilder::new(settings).build(&grid);
    LoadedLevel { arena, loaded }
}
