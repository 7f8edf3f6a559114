use crate::types::{Cell, Direction, Point};
use crate::world::Passability;

pub fn cell_of(position: Point, tile_size: f32) -> Cell {
    Cell::new(
        (position.x / tile_size).floor() as i32,
        (position.y / tile_size).floor() as i32,
    )
}

/// Tracks which cell an agent occupies and which neighbors are open.
///
/// `cell_changed` stays true until `mark_decided` is called for the current
/// cell, so direction decisions run once per cell entry rather than per tick.
#[derive(Clone, Debug)]
pub struct GridTracker {
    tile_size: f32,
    cell: Cell,
    decided_cell: Option<Cell>,
    open: [bool; 4],
}

impl GridTracker {
    pub fn new(tile_size: f32, position: Point) -> Self {
        Self {
            tile_size,
            cell: cell_of(position, tile_size),
            decided_cell: None,
            open: [false; 4],
        }
    }

    pub fn update(&mut self, position: Point, maze: &dyn Passability) {
        self.cell = cell_of(position, self.tile_size);
        for dir in Direction::ALL {
            if let Some(idx) = dir.sensor_index() {
                self.open[idx] = maze.is_passable(self.cell, dir);
            }
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn cell_center(&self) -> Point {
        self.cell.center(self.tile_size)
    }

    pub fn is_open(&self, dir: Direction) -> bool {
        dir.sensor_index()
            .map(|idx| self.open[idx])
            .unwrap_or(false)
    }

    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |dir| self.is_open(*dir))
    }

    pub fn cell_changed(&self) -> bool {
        self.decided_cell != Some(self.cell)
    }

    pub fn mark_decided(&mut self) {
        self.decided_cell = Some(self.cell);
    }

    pub fn forget_decision(&mut self) {
        self.decided_cell = None;
    }
}
