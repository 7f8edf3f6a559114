use clap::Parser;
use maze_chase_core::autopilot::Autopilot;
use maze_chase_core::config::LevelTable;
use maze_chase_core::constants::{TICK_MS, TILE_SIZE};
use maze_chase_core::engine::{GameEngine, GameEngineOptions};
use maze_chase_core::error::GameError;
use maze_chase_core::types::{AgentId, Direction, GameEvent, GameStatus};
use maze_chase_core::world::Maze;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless maze-chase runs driven by an autopilot")]
struct Cli {
    /// Level to start on (1-based).
    #[arg(long, default_value_t = 1)]
    level: u32,
    #[arg(long)]
    seed: Option<u32>,
    /// Stop a game after this much simulated time.
    #[arg(long, default_value_t = 300)]
    seconds: u64,
    /// JSON level table replacing the built-in one.
    #[arg(long)]
    levels: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    games: u32,
}

#[derive(Clone, Debug, Serialize)]
struct GameResultLine {
    game: u32,
    seed: u32,
    #[serde(rename = "startLevel")]
    start_level: u32,
    #[serde(rename = "finalLevel")]
    final_level: u32,
    status: GameStatus,
    score: u32,
    lives: u32,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
    #[serde(rename = "levelClears")]
    level_clears: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    deaths: u32,
    bonuses: u32,
    teleports: u32,
    #[serde(rename = "timedOut")]
    timed_out: bool,
}

/// One autopilot game, advanced a tick at a time.
struct GameRun {
    engine: GameEngine,
    pilot: Autopilot,
    held: Direction,
    limit_ms: u64,
    total_ms: u64,
    result: GameResultLine,
}

impl GameRun {
    fn new(
        levels: &LevelTable,
        start_level: u32,
        seconds: u64,
        game: u32,
        seed: u32,
    ) -> Result<Self, GameError> {
        let maze = Maze::classic(TILE_SIZE as f32)?;
        let engine = GameEngine::new(
            maze,
            levels.clone(),
            GameEngineOptions {
                seed,
                start_level,
                ..GameEngineOptions::default()
            },
        )?;
        let result = GameResultLine {
            game,
            seed,
            start_level,
            final_level: start_level,
            status: GameStatus::Playing,
            score: 0,
            lives: engine.lives(),
            duration_ms: 0,
            level_clears: 0,
            ghosts_eaten: 0,
            deaths: 0,
            bonuses: 0,
            teleports: 0,
            timed_out: false,
        };
        Ok(Self {
            engine,
            pilot: Autopilot::new(seed ^ 0x9e37_79b9),
            held: Direction::None,
            limit_ms: seconds.saturating_mul(1_000),
            total_ms: 0,
            result,
        })
    }

    /// Advances one tick. Returns false once the game is over or out of time.
    fn step(&mut self) -> bool {
        match self.engine.status() {
            GameStatus::Playing => {}
            GameStatus::LevelCleared => {
                if !self.engine.advance_level() {
                    return false;
                }
                self.held = Direction::None;
            }
            GameStatus::GameOver | GameStatus::Completed => return false,
        }
        if self.total_ms >= self.limit_ms {
            warn!(game = self.result.game, seed = self.result.seed, "time limit reached");
            self.result.timed_out = true;
            return false;
        }

        // A respawned player waits for fresh input even if the wanted
        // direction has not changed.
        let wanted = self.pilot.choose(&self.engine);
        if wanted != self.held || !self.engine.player_started() {
            self.engine.request_direction(wanted);
            self.held = wanted;
        }
        self.engine.tick(TICK_MS);
        self.total_ms += TICK_MS;

        for event in self.engine.drain_events() {
            self.record(event);
        }
        true
    }

    fn record(&mut self, event: GameEvent) {
        match event {
            GameEvent::AgentDied {
                agent: AgentId::Player,
            } => {
                self.result.deaths += 1;
                self.held = Direction::None;
            }
            GameEvent::AgentDied {
                agent: AgentId::Ghost(_),
            } => self.result.ghosts_eaten += 1,
            GameEvent::BonusTaken { .. } => self.result.bonuses += 1,
            GameEvent::Teleported { .. } => self.result.teleports += 1,
            GameEvent::LevelClear { level } => {
                self.result.level_clears += 1;
                info!(
                    game = self.result.game,
                    level,
                    score = self.engine.score(),
                    "level clear"
                );
            }
            _ => {}
        }
    }

    fn finish(mut self) -> GameResultLine {
        self.result.final_level = self.engine.level_number();
        self.result.status = self.engine.status();
        self.result.score = self.engine.score();
        self.result.lives = self.engine.lives();
        self.result.duration_ms = self.total_ms;
        info!(
            game = self.result.game,
            seed = self.result.seed,
            score = self.result.score,
            status = ?self.result.status,
            "game finished"
        );
        self.result
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let levels = match load_levels(&cli) {
        Ok(levels) => levels,
        Err(err) => {
            error!(%err, "could not load level table");
            std::process::exit(2);
        }
    };
    let base_seed = cli.seed.unwrap_or_else(rand::random::<u32>);

    for game in 0..cli.games {
        let seed = base_seed.wrapping_add(game);
        info!(game, seed, level = cli.level, "game started");
        match run_game(&levels, cli.level, cli.seconds, game, seed) {
            Ok(result) => match serde_json::to_string(&result) {
                Ok(line) => println!("{line}"),
                Err(err) => error!(%err, "result did not serialize"),
            },
            Err(err) => {
                error!(%err, game, seed, "game could not start");
                std::process::exit(2);
            }
        }
    }
}

fn load_levels(cli: &Cli) -> Result<LevelTable, GameError> {
    match &cli.levels {
        Some(path) => Ok(LevelTable::from_path(path)?),
        None => Ok(LevelTable::default()),
    }
}

fn run_game(
    levels: &LevelTable,
    start_level: u32,
    seconds: u64,
    game: u32,
    seed: u32,
) -> Result<GameResultLine, GameError> {
    let mut run = GameRun::new(levels, start_level, seconds, game, seed)?;
    while run.step() {}
    Ok(run.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::constants::DEATH_ANIMATION_MS;

    #[test]
    fn result_line_uses_camel_case_keys() {
        let run = GameRun::new(&LevelTable::default(), 2, 1, 3, 42).expect("run starts");
        let line = serde_json::to_value(run.finish()).expect("result serializes");
        for key in [
            "startLevel",
            "finalLevel",
            "durationMs",
            "levelClears",
            "ghostsEaten",
            "timedOut",
        ] {
            assert!(line.get(key).is_some(), "missing {key}");
        }
        assert_eq!(line["seed"], 42);
        assert_eq!(line["startLevel"], 2);
        assert_eq!(line["status"], "playing");
    }

    #[test]
    fn time_limit_marks_the_game_timed_out() {
        let mut run = GameRun::new(&LevelTable::default(), 1, 1, 0, 5).expect("run starts");
        while run.step() {}
        let result = run.finish();
        assert!(result.timed_out);
        assert!(result.duration_ms >= 1_000);
        assert_eq!(result.status, GameStatus::Playing);
    }

    #[test]
    fn player_moves_again_after_losing_a_life() {
        let mut deaths_seen = 0;
        for seed in 1..=12 {
            let mut run =
                GameRun::new(&LevelTable::default(), 1, 120, 0, seed).expect("run starts");
            while run.result.deaths == 0 && run.step() {}
            if run.result.deaths == 0 || run.engine.status() != GameStatus::Playing {
                continue;
            }
            deaths_seen += 1;

            // Past the death window, then give the pilot a couple of seconds.
            let respawn_ticks = DEATH_ANIMATION_MS / TICK_MS + 2;
            for _ in 0..respawn_ticks {
                run.step();
            }
            let mut restarted = run.engine.player_started();
            for _ in 0..(2_000 / TICK_MS) {
                if restarted || !run.step() {
                    break;
                }
                restarted = run.engine.player_started();
            }
            assert!(
                restarted || run.engine.status() != GameStatus::Playing,
                "seed {seed}: player still idle at {:?}",
                run.engine.player_cell()
            );
        }
        assert!(deaths_seen > 0, "no seed lost a life");
    }
}
