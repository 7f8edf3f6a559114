use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info, warn};

use crate::config::{LevelConfig, LevelTable};
use crate::constants::{
    bonus_for_pellets_eaten, bonus_multiplier, turn_tolerance, BONUS_MULTIPLIER_MS,
    DEATH_ANIMATION_MS, FRIGHTENED_ENDING_RATIO, GHOST_POINTS, GHOST_RELEASE_DELAYS_MS,
    PELLET_POINTS, PILL_POINTS, STARTING_LIVES, TILE_SIZE,
};
use crate::error::{ConfigError, Result};
use crate::rng::Rng;
use crate::types::{
    AgentId, BonusKind, BonusView, Cell, Direction, GameEvent, GameStatus, GhostName, GhostView,
    ModeKind, Overlap, PlayerMode, PlayerView, Snapshot,
};
use crate::world::Maze;

pub mod agent;
pub mod grid;
pub mod mode;
pub mod portal;
pub mod targeting;
pub mod turning;

mod movement_system;
mod overlap_system;
mod spawn_system;
mod timer_system;
mod utils;

use self::agent::{Agent, Ghost, Player};
use self::mode::{ModeScheduler, ModeTimerEvent, ModeTransition};
use self::timer_system::TimerEvent;
use self::turning::TurnRequest;

#[derive(Clone, Debug)]
pub struct GameEngineOptions {
    pub seed: u32,
    pub start_level: u32,
    pub lives: u32,
    /// Player turn tolerance in pixels; a quarter tile when unset.
    pub player_turn_tolerance: Option<f32>,
}

impl Default for GameEngineOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            start_level: 1,
            lives: STARTING_LIVES,
            player_turn_tolerance: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Bonus {
    kind: BonusKind,
    cell: Cell,
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    maze: Maze,
    levels: LevelTable,
    level: LevelConfig,
    level_number: u32,
    options: GameEngineOptions,

    rng: Rng,
    player: Player,
    ghosts: Vec<Ghost>,
    events: Vec<GameEvent>,
    timers: VecDeque<TimerEvent>,

    pellets: BTreeSet<Cell>,
    pills: BTreeSet<Cell>,
    bonuses: Vec<Bonus>,

    score: u32,
    lives: u32,
    multiplier: u32,
    status: GameStatus,

    power_until: Option<u64>,
    respawn_at: Option<u64>,
    release_at: [Option<u64>; 4],
    multiplier_resets: Vec<u64>,

    elapsed_ms: u64,
    tick_counter: u64,
}

impl GameEngine {
    pub fn new(maze: Maze, levels: LevelTable, options: GameEngineOptions) -> Result<Self> {
        levels.validate()?;
        if maze.tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize.into());
        }
        let level = levels.level(options.start_level)?.clone();
        let (player, ghosts) = spawn_system::build_agents(&maze, &level, &options);

        let mut engine = Self {
            rng: Rng::new(options.seed),
            level_number: options.start_level,
            lives: options.lives,
            multiplier: level.multiplier,
            pellets: maze.pellets.clone(),
            pills: maze.pills.clone(),
            maze,
            levels,
            level,
            options,
            player,
            ghosts,
            events: Vec::new(),
            timers: VecDeque::new(),
            bonuses: Vec::new(),
            score: 0,
            status: GameStatus::Playing,
            power_until: None,
            respawn_at: None,
            release_at: [None; 4],
            multiplier_resets: Vec::new(),
            elapsed_ms: 0,
            tick_counter: 0,
        };
        engine.load_level();
        info!(level = engine.level_number, seed = engine.options.seed, "game started");
        Ok(engine)
    }

    /// Built-in maze with the default level table.
    pub fn classic(options: GameEngineOptions) -> Result<Self> {
        let maze = Maze::classic(TILE_SIZE as f32)?;
        Self::new(maze, LevelTable::default(), options)
    }

    pub fn tick(&mut self, dt_ms: u64) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.tick_counter += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);

        self.collect_timer_events(dt_ms);
        self.process_timer_events();
        self.update_movement(dt_ms);
        if self.status != GameStatus::Playing {
            return;
        }
        for overlap in self.collect_overlaps() {
            self.handle_overlap(overlap);
        }
        self.update_targets();
        self.check_frightened_ending();
    }

    /// Held player input; `Direction::None` releases it.
    pub fn request_direction(&mut self, direction: Direction) {
        self.player.held = direction;
        if direction == Direction::None {
            self.player.agent.turn.cancel_pending();
            return;
        }
        if self.status == GameStatus::Playing {
            self.apply_held_input();
        }
    }

    /// Powers the player up and frightens every ghost in play. Calling it
    /// again while powered extends both timers.
    pub fn enable_frightened(&mut self, duration_ms: u64) {
        let now = self.elapsed_ms;
        self.power_until = Some(match self.power_until {
            Some(until) if until > now => until.saturating_add(duration_ms),
            _ => now.saturating_add(duration_ms),
        });
        for idx in 0..self.ghosts.len() {
            if !self.ghosts[idx].in_game {
                continue;
            }
            self.ghosts[idx].ending_notified = false;
            if let Some(transition) = self.ghosts[idx].scheduler.enable_frightened(duration_ms) {
                self.apply_transition(idx, transition, true);
            }
        }
    }

    pub fn disable_frightened(&mut self) {
        self.power_until = None;
        for idx in 0..self.ghosts.len() {
            if let Some(transition) = self.ghosts[idx].scheduler.disable_frightened() {
                self.apply_transition(idx, transition, true);
            }
        }
    }

    /// Sends a frightened ghost home. Returns false for any other mode.
    pub fn kill_ghost(&mut self, name: GhostName) -> bool {
        let idx = name.index();
        let Some(transition) = self.ghosts[idx].scheduler.kill() else {
            return false;
        };
        let ghost = &mut self.ghosts[idx];
        ghost.in_game = false;
        ghost.target = ghost.home;
        self.events.push(GameEvent::AgentDied {
            agent: AgentId::Ghost(name),
        });
        self.apply_transition(idx, transition, true);
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn build_snapshot(&self) -> Snapshot {
        let player = &self.player;
        Snapshot {
            tick: self.tick_counter,
            elapsed_ms: self.elapsed_ms,
            level: self.level_number,
            score: self.score,
            lives: self.lives,
            multiplier: self.multiplier,
            status: self.status,
            pellets_left: self.pellets.len(),
            player: PlayerView {
                x: player.agent.position().x,
                y: player.agent.position().y,
                cell: player.agent.cell(),
                dir: player.agent.direction(),
                mode: self.player_mode(),
                alive: player.agent.alive,
                started: player.started,
            },
            ghosts: self
                .ghosts
                .iter()
                .map(|ghost| GhostView {
                    name: ghost.name,
                    x: ghost.agent.position().x,
                    y: ghost.agent.position().y,
                    cell: ghost.agent.cell(),
                    dir: ghost.agent.direction(),
                    mode: ghost.scheduler.kind(),
                    target: ghost.target,
                    wave_index: ghost.scheduler.wave_index(),
                    phase_remaining_ms: ghost.scheduler.phase_remaining_ms(),
                    in_game: ghost.in_game,
                })
                .collect(),
            bonuses: self
                .bonuses
                .iter()
                .map(|bonus| BonusView {
                    kind: bonus.kind,
                    cell: bonus.cell,
                })
                .collect(),
        }
    }

    /// Loads the next level after a clear, keeping the score and adding a
    /// life.
    pub fn advance_level(&mut self) -> bool {
        if self.status != GameStatus::LevelCleared {
            return false;
        }
        let next = self.level_number + 1;
        let Ok(level) = self.levels.level(next) else {
            warn!(level = next, "no such level, staying on the cleared one");
            return false;
        };
        self.level = level.clone();
        self.level_number = next;
        self.lives += 1;
        self.load_level();
        info!(level = next, lives = self.lives, "level advanced");
        true
    }

    pub fn restart(&mut self) {
        let Ok(level) = self.levels.level(self.options.start_level) else {
            warn!(level = self.options.start_level, "start level missing, restart ignored");
            return;
        };
        self.level = level.clone();
        self.level_number = self.options.start_level;
        self.score = 0;
        self.lives = self.options.lives;
        self.load_level();
        info!(level = self.level_number, "game restarted");
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn pellets(&self) -> &BTreeSet<Cell> {
        &self.pellets
    }

    pub fn pills(&self) -> &BTreeSet<Cell> {
        &self.pills
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn player_cell(&self) -> Cell {
        self.player.agent.cell()
    }

    pub fn player_direction(&self) -> Direction {
        self.player.agent.direction()
    }

    /// False from each (re)spawn until the first legal input.
    pub fn player_started(&self) -> bool {
        self.player.started
    }

    pub fn ghost_mode(&self, name: GhostName) -> ModeKind {
        self.ghosts[name.index()].scheduler.kind()
    }

    pub fn player_mode(&self) -> PlayerMode {
        match self.power_until {
            Some(_) => PlayerMode::Power,
            None => PlayerMode::Normal,
        }
    }

    fn update_targets(&mut self) {
        let player_cell = self.player.agent.cell();
        for ghost in &mut self.ghosts {
            if !ghost.in_game {
                continue;
            }
            match ghost.scheduler.kind() {
                ModeKind::Scatter => ghost.target = ghost.corner,
                ModeKind::Chase => ghost.target = player_cell,
                ModeKind::Dead => ghost.target = ghost.home,
                ModeKind::Frightened => {}
            }
        }
    }

    fn check_frightened_ending(&mut self) {
        let threshold = self.level.frightened_ms as f32 * FRIGHTENED_ENDING_RATIO;
        for ghost in &mut self.ghosts {
            let Some(remaining) = ghost.scheduler.frightened_remaining_ms() else {
                continue;
            };
            if !ghost.ending_notified && (remaining as f32) < threshold {
                ghost.ending_notified = true;
                self.events
                    .push(GameEvent::FrightenedEnding { ghost: ghost.name });
            }
        }
    }

    fn add_score(&mut self, points: u32) {
        let delta = points.saturating_mul(self.multiplier);
        self.score = self.score.saturating_add(delta);
        self.events.push(GameEvent::Score {
            delta,
            total: self.score,
        });
    }
}
