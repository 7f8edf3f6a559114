use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

const OPPOSITES: [Direction; 5] = [
    Direction::Down,
    Direction::Up,
    Direction::Right,
    Direction::Left,
    Direction::None,
];

impl Direction {
    /// Enumeration order used for neighbor scans and distance tie-breaks.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn opposite(self) -> Self {
        OPPOSITES[self as usize]
    }

    /// Slot in `Direction::ALL`; `None` has no slot.
    pub fn sensor_index(self) -> Option<usize> {
        match self {
            Self::Left => Some(0),
            Self::Right => Some(1),
            Self::Up => Some(2),
            Self::Down => Some(3),
            Self::None => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Left | Self::Up => -1.0,
            Self::Right | Self::Down => 1.0,
            Self::None => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbor(self, dir: Direction) -> Self {
        match dir {
            Direction::Up => Self::new(self.x, self.y - 1),
            Direction::Down => Self::new(self.x, self.y + 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
            Direction::None => self,
        }
    }

    pub fn center(self, tile_size: f32) -> Point {
        Point {
            x: self.x as f32 * tile_size + tile_size / 2.0,
            y: self.y as f32 * tile_size + tile_size / 2.0,
        }
    }

    pub fn distance(self, other: Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        dx.hypot(dy)
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostName {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostName {
    pub const ALL: [GhostName; 4] = [
        GhostName::Blinky,
        GhostName::Pinky,
        GhostName::Inky,
        GhostName::Clyde,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Scatter,
    Chase,
    Frightened,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePhase {
    Scatter,
    Chase,
}

impl From<WavePhase> for ModeKind {
    fn from(phase: WavePhase) -> Self {
        match phase {
            WavePhase::Scatter => ModeKind::Scatter,
            WavePhase::Chase => ModeKind::Chase,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    Player,
    Ghost(GhostName),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Cherry,
    Strawberry,
    Apple,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMode {
    Normal,
    Power,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    LevelCleared,
    GameOver,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ModeChanged {
        ghost: GhostName,
        mode: ModeKind,
    },
    Score {
        delta: u32,
        total: u32,
    },
    AgentDied {
        agent: AgentId,
    },
    LevelClear {
        level: u32,
    },
    GameOver {
        score: u32,
    },
    BonusSpawned {
        kind: BonusKind,
        cell: Cell,
    },
    BonusTaken {
        kind: BonusKind,
        multiplier: u32,
    },
    Teleported {
        agent: AgentId,
        portal: usize,
    },
    FrightenedEnding {
        ghost: GhostName,
    },
}

/// One overlapping pair, as a physics collaborator would report it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    Portal { agent: AgentId, portal: usize },
    Pellet(Cell),
    Pill(Cell),
    Bonus(Cell),
    Ghost(GhostName),
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub cell: Cell,
    pub dir: Direction,
    pub mode: PlayerMode,
    pub alive: bool,
    pub started: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub name: GhostName,
    pub x: f32,
    pub y: f32,
    pub cell: Cell,
    pub dir: Direction,
    pub mode: ModeKind,
    pub target: Cell,
    #[serde(rename = "waveIndex")]
    pub wave_index: usize,
    #[serde(rename = "phaseRemainingMs")]
    pub phase_remaining_ms: Option<u64>,
    #[serde(rename = "inGame")]
    pub in_game: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BonusView {
    pub kind: BonusKind,
    pub cell: Cell,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub multiplier: u32,
    pub status: GameStatus,
    #[serde(rename = "pelletsLeft")]
    pub pellets_left: usize,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub bonuses: Vec<BonusView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_are_symmetric() {
        for dir in Direction::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn sensor_index_follows_enumeration_order() {
        for (idx, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.sensor_index(), Some(idx));
        }
        assert_eq!(Direction::None.sensor_index(), None);
    }

    #[test]
    fn cell_center_is_half_tile_inside() {
        let center = Cell::new(2, 3).center(16.0);
        assert_eq!(center, Point::new(40.0, 56.0));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let value = serde_json::to_value(GameEvent::ModeChanged {
            ghost: GhostName::Pinky,
            mode: ModeKind::Frightened,
        })
        .expect("event serializes");
        assert_eq!(value["type"], "mode_changed");
        assert_eq!(value["ghost"], "pinky");
        assert_eq!(value["mode"], "frightened");
    }
}
