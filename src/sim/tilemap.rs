//! Procedural terrain generator
//!
//! The surface is a random walk: a single cursor moves left to right, marking
//! each cell it visits as `Surface` and stepping down, up or forward according
//! to the contour's probabilities. A fill pass then turns every air cell below
//! the first surface cell of a column into `Underground`.
//!
//! Columns are only ever appended. Tile entities are emitted in world space,
//! offset by the camera scroll so new columns line up with the scrolled world.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::settings::{Contour, Settings};

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Air,
    Surface,
    Underground,
}

/// A solid tile entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub rect: Rect,
}

/// Tile entities produced by a generation pass
#[derive(Debug, Clone, Default)]
pub struct TileSpawns {
    pub terrain: Vec<Tile>,
    pub underground: Vec<Tile>,
}

/// Outcome of appending columns
#[derive(Debug, Clone, Default)]
pub struct Extension {
    pub tiles: TileSpawns,
    /// The column count landed on a multiple of the spawn interval
    pub spawn_enemy: bool,
}

/// Row-major terrain grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    /// `cells[row][col]`
    cells: Vec<Vec<Cell>>,
    highest_row: usize,
    lowest_row: usize,
    tile_size: f32,
    contour: Contour,
    /// Row the surface walk left the last column on
    cursor_row: usize,
    spawn_interval: usize,
}

impl TileMap {
    /// Build the initial grid and its tile entities
    pub fn generate<R: Rng>(
        settings: &Settings,
        camera_offset: f32,
        rng: &mut R,
    ) -> (Self, TileSpawns) {
        assert!(
            settings.highest_row < settings.lowest_row && settings.lowest_row < settings.rows,
            "terrain row bounds must fit inside the grid"
        );

        let start_row = settings.start_row();
        let mut map = Self {
            cells: vec![vec![Cell::Air; settings.cols]; settings.rows],
            highest_row: settings.highest_row,
            lowest_row: settings.lowest_row,
            tile_size: settings.tile_size,
            contour: settings.contour,
            cursor_row: start_row,
            spawn_interval: settings.enemy_spawn_interval.max(1),
        };

        let mut spawns = TileSpawns::default();
        map.walk_surface(start_row, 0, camera_offset, rng, &mut spawns);
        map.fill_underground(0, camera_offset, &mut spawns);

        log::debug!(
            "Generated {}x{} {} terrain ({} surface tiles)",
            map.cols(),
            map.rows(),
            map.contour.as_str(),
            spawns.terrain.len()
        );

        (map, spawns)
    }

    /// Append `cols_to_add` columns, continuing the surface walk into them
    pub fn extend<R: Rng>(
        &mut self,
        cols_to_add: usize,
        camera_offset: f32,
        rng: &mut R,
    ) -> Extension {
        if cols_to_add == 0 {
            return Extension::default();
        }

        let first_new = self.cols();
        for row in &mut self.cells {
            row.extend(std::iter::repeat_n(Cell::Air, cols_to_add));
        }

        let spawn_enemy = self.cols() % self.spawn_interval == 0;

        let mut tiles = TileSpawns::default();
        self.walk_surface(self.cursor_row, first_new, camera_offset, rng, &mut tiles);
        self.fill_underground(first_new, camera_offset, &mut tiles);

        Extension { tiles, spawn_enemy }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Topmost surface row of a column
    pub fn surface_row(&self, col: usize) -> Option<usize> {
        (0..self.rows()).find(|&row| self.cells[row][col] == Cell::Surface)
    }

    fn tile_at(&self, row: usize, col: usize, camera_offset: f32) -> Tile {
        Tile {
            rect: Rect::new(
                col as f32 * self.tile_size - camera_offset,
                row as f32 * self.tile_size,
                self.tile_size,
                self.tile_size,
            ),
        }
    }

    fn walk_surface<R: Rng>(
        &mut self,
        mut row: usize,
        mut col: usize,
        camera_offset: f32,
        rng: &mut R,
        spawns: &mut TileSpawns,
    ) {
        let (down, up) = self.contour.chances();
        let cols = self.cols();

        while col < cols {
            if self.cells[row][col] != Cell::Surface {
                self.cells[row][col] = Cell::Surface;
                spawns.terrain.push(self.tile_at(row, col, camera_offset));
            }

            let roll: u32 = rng.random_range(0..=10);
            if roll <= down && row < self.lowest_row {
                row += 1;
            } else if roll <= up && row > self.highest_row {
                row -= 1;
            } else {
                self.cursor_row = row;
                col += 1;
            }
        }
    }

    fn fill_underground(&mut self, first_col: usize, camera_offset: f32, spawns: &mut TileSpawns) {
        for col in first_col..self.cols() {
            let mut below_surface = false;
            for row in 0..self.rows() {
                match self.cells[row][col] {
                    Cell::Surface => below_surface = true,
                    Cell::Air if below_surface => {
                        self.cells[row][col] = Cell::Underground;
                        spawns.underground.push(self.tile_at(row, col, camera_offset));
                    }
                    _ => {}
                }
            }
        }
    }
}
