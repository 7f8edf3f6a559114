use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::engine::GameEngine;
use crate::rng::Rng;
use crate::types::{Cell, Direction, ModeKind, PlayerMode};
use crate::world::{Maze, Passability};

const DANGER_RADIUS: i32 = 4;

/// Scripted player for headless runs: heads for the nearest pellet and
/// backs away from ghosts that can still bite.
#[derive(Clone, Debug)]
pub struct Autopilot {
    rng: Rng,
}

impl Autopilot {
    pub fn new(seed: u32) -> Self {
        Self { rng: Rng::new(seed) }
    }

    pub fn choose(&mut self, engine: &GameEngine) -> Direction {
        let maze = engine.maze();
        let here = engine.player_cell();
        let current = engine.player_direction();
        let snapshot = engine.build_snapshot();
        let powered = snapshot.player.mode == PlayerMode::Power;

        let threats: Vec<Cell> = snapshot
            .ghosts
            .iter()
            .filter(|ghost| ghost.in_game && ghost.mode != ModeKind::Frightened)
            .map(|ghost| ghost.cell)
            .collect();
        let prey: Vec<Cell> = snapshot
            .ghosts
            .iter()
            .filter(|ghost| powered && ghost.in_game && ghost.mode == ModeKind::Frightened)
            .map(|ghost| ghost.cell)
            .collect();
        let food = nearest_item_direction(maze, here, engine.pellets(), engine.pills());

        let mut best = Direction::None;
        let mut best_score = f32::NEG_INFINITY;
        for dir in Direction::ALL {
            if !maze.is_passable(here, dir) {
                continue;
            }
            let next = here.neighbor(dir);
            let mut score = 0.0;
            if food == Some(dir) {
                score += 12.0;
            }
            if let Some(dist) = nearest(&threats, next) {
                if dist <= DANGER_RADIUS {
                    score += dist as f32 * 6.0 - 30.0;
                }
            }
            if let Some(dist) = nearest(&prey, next) {
                score += (DANGER_RADIUS * 2 - dist).max(0) as f32 * 2.0;
            }
            if current != Direction::None && dir == current.opposite() {
                score -= 2.0;
            }
            score += self.rng.next_f32() * 0.4;

            if score > best_score {
                best_score = score;
                best = dir;
            }
        }
        best
    }
}

fn nearest(cells: &[Cell], from: Cell) -> Option<i32> {
    cells.iter().map(|cell| cell.manhattan(from)).min()
}

/// First step of a shortest walk from `start` to any pellet or pill.
fn nearest_item_direction(
    maze: &Maze,
    start: Cell,
    pellets: &BTreeSet<Cell>,
    pills: &BTreeSet<Cell>,
) -> Option<Direction> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    for dir in Direction::ALL {
        if maze.is_passable(start, dir) {
            let next = start.neighbor(dir);
            if seen.insert(next) {
                queue.push_back((next, dir));
            }
        }
    }
    while let Some((cell, first)) = queue.pop_front() {
        if pellets.contains(&cell) || pills.contains(&cell) {
            return Some(first);
        }
        for dir in Direction::ALL {
            if !maze.is_passable(cell, dir) {
                continue;
            }
            let next = cell.neighbor(dir);
            if seen.insert(next) {
                queue.push_back((next, first));
            }
        }
    }
    None
}
