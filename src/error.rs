use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("level table is empty")]
    EmptyLevelTable,

    #[error("level {0} is not in the level table")]
    UnknownLevel(u32),

    #[error("level {level}: wave schedule is empty")]
    EmptyWaveSchedule { level: u32 },

    #[error("level {level}: {field} must be positive")]
    NonPositive { level: u32, field: &'static str },

    #[error("tile size must be positive")]
    InvalidTileSize,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("level table parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("maze layout has no player spawn")]
    MissingPlayerSpawn,

    #[error("maze layout has no spawn for ghost {0}")]
    MissingGhostSpawn(usize),

    #[error("portal markers must come in pairs, found {0}")]
    UnpairedPortal(usize),
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("maze error: {0}")]
    Maze(#[from] MazeError),
}

pub type Result<T> = std::result::Result<T, GameError>;
