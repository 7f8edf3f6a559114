use std::collections::BTreeSet;

use crate::error::MazeError;
use crate::types::{Cell, Direction, GhostName, Point};

/// Four-neighbor passability oracle supplied by the tilemap side.
pub trait Passability {
    fn is_passable(&self, cell: Cell, direction: Direction) -> bool;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub target: usize,
}

impl Portal {
    pub fn overlaps_body(&self, center: Point, half_extent: f32) -> bool {
        center.x + half_extent > self.x
            && center.x - half_extent < self.x + self.width
            && center.y + half_extent > self.y
            && center.y - half_extent < self.y + self.height
    }
}

#[derive(Clone, Debug)]
pub struct Maze {
    pub width: i32,
    pub height: i32,
    pub tile_size: f32,
    pub tiles: Vec<String>,
    pub pellets: BTreeSet<Cell>,
    pub pills: BTreeSet<Cell>,
    pub portals: Vec<Portal>,
    pub player_spawn: Cell,
    pub ghost_spawns: [Cell; 4],
    pub ghost_home: Cell,
    pub scatter_targets: [Cell; 4],
}

pub const CLASSIC_LAYOUT: [&str; 21] = [
    "#####################",
    "#.........#.........#",
    "#o###.###.#.###.###o#",
    "#...................#",
    "#.###.#.#####.#.###.#",
    "#.....#...#...#.....#",
    "#####.###.#.###.#####",
    "#####.#   1   #.#####",
    "#####.# ##-## #.#####",
    "T    .  #234#  .    T",
    "#####.# ##### #.#####",
    "#####.#       #.#####",
    "#####.# ##### #.#####",
    "#.........#.........#",
    "#.###.###.#.###.###.#",
    "#o..#.....S.....#..o#",
    "###.#.#.#####.#.#.###",
    "#.....#...#...#.....#",
    "#.#######.#.#######.#",
    "#...................#",
    "#####################",
];

impl Maze {
    pub fn classic(tile_size: f32) -> Result<Self, MazeError> {
        Self::parse(&CLASSIC_LAYOUT, tile_size)
    }

    /// Legend: `#` wall, `-` house door, `.` pellet, `o` power pill, ` ` floor,
    /// `S` player spawn, `1`-`4` ghost spawns (the first is the ghost home),
    /// `T` portal, paired in reading order.
    pub fn parse(rows: &[&str], tile_size: f32) -> Result<Self, MazeError> {
        let Some(first) = rows.first() else {
            return Err(MazeError::Empty);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut tiles = Vec::with_capacity(rows.len());
        let mut pellets = BTreeSet::new();
        let mut pills = BTreeSet::new();
        let mut portal_cells = Vec::new();
        let mut player_spawn = None;
        let mut ghost_spawns: [Option<Cell>; 4] = [None; 4];

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            let mut line = String::with_capacity(width);
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match ch {
                    '#' | '-' => {
                        line.push('#');
                        continue;
                    }
                    '.' => {
                        pellets.insert(cell);
                    }
                    'o' => {
                        pills.insert(cell);
                    }
                    'S' => player_spawn = Some(cell),
                    'T' => portal_cells.push(cell),
                    '1'..='4' => {
                        let idx = ch as usize - '1' as usize;
                        ghost_spawns[idx] = Some(cell);
                    }
                    _ => {}
                }
                line.push('.');
            }
            tiles.push(line);
        }

        if portal_cells.len() % 2 != 0 {
            return Err(MazeError::UnpairedPortal(portal_cells.len()));
        }
        let player_spawn = player_spawn.ok_or(MazeError::MissingPlayerSpawn)?;
        let mut spawns = [Cell::new(0, 0); 4];
        for (idx, spawn) in ghost_spawns.iter().enumerate() {
            spawns[idx] = spawn.ok_or(MazeError::MissingGhostSpawn(idx + 1))?;
        }

        let portals = portal_cells
            .iter()
            .enumerate()
            .map(|(id, cell)| Portal {
                id,
                x: cell.x as f32 * tile_size,
                y: cell.y as f32 * tile_size,
                width: tile_size,
                height: tile_size,
                target: id ^ 1,
            })
            .collect();

        let width = width as i32;
        let height = rows.len() as i32;
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
            pellets,
            pills,
            portals,
            player_spawn,
            ghost_spawns: spawns,
            ghost_home: spawns[GhostName::Blinky.index()],
            scatter_targets: [
                Cell::new(width - 1, 0),
                Cell::new(0, 0),
                Cell::new(width - 1, height - 1),
                Cell::new(0, height - 1),
            ],
        })
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height {
            return false;
        }
        self.tiles
            .get(cell.y as usize)
            .and_then(|row| row.as_bytes().get(cell.x as usize))
            .map(|tile| *tile == b'.')
            .unwrap_or(false)
    }

    pub fn portal(&self, id: usize) -> Option<&Portal> {
        self.portals.get(id)
    }

    pub fn ghost_spawn(&self, name: GhostName) -> Cell {
        self.ghost_spawns[name.index()]
    }

    pub fn scatter_target(&self, name: GhostName) -> Cell {
        self.scatter_targets[name.index()]
    }
}

impl Passability for Maze {
    fn is_passable(&self, cell: Cell, direction: Direction) -> bool {
        if direction == Direction::None {
            return false;
        }
        self.is_walkable(cell.neighbor(direction))
    }
}
