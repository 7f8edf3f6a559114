use crate::types::BonusKind;

pub const TICK_RATE: u32 = 60;
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

pub const TILE_SIZE: u32 = 16;
pub const TURN_TOLERANCE_RATIO: f32 = 0.25;

pub const STARTING_LIVES: u32 = 3;
pub const DEATH_ANIMATION_MS: u64 = 1_200;

pub const PELLET_POINTS: u32 = 10;
pub const PILL_POINTS: u32 = 50;
pub const GHOST_POINTS: u32 = 200;

pub const FRIGHTENED_SPEED_FACTOR: f32 = 0.5;
pub const DEAD_SPEED_FACTOR: f32 = 0.2;
pub const FRIGHTENED_ENDING_RATIO: f32 = 0.3;

pub const BONUS_MULTIPLIER_MS: u64 = 3_000;

// Delay after the first player input, house exit fade included.
pub const GHOST_RELEASE_DELAYS_MS: [u64; 4] = [0, 1_400, 1_600, 1_800];

pub fn bonus_for_pellets_eaten(eaten: usize) -> Option<BonusKind> {
    match eaten {
        60 => Some(BonusKind::Cherry),
        120 => Some(BonusKind::Strawberry),
        150 => Some(BonusKind::Apple),
        _ => None,
    }
}

pub fn bonus_multiplier(kind: BonusKind) -> u32 {
    match kind {
        BonusKind::Cherry => 2,
        BonusKind::Strawberry => 3,
        BonusKind::Apple => 4,
    }
}

pub fn turn_tolerance(tile_size: f32) -> f32 {
    tile_size * TURN_TOLERANCE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_thresholds_match_pellet_counts() {
        assert_eq!(bonus_for_pellets_eaten(59), None);
        assert_eq!(bonus_for_pellets_eaten(60), Some(BonusKind::Cherry));
        assert_eq!(bonus_for_pellets_eaten(120), Some(BonusKind::Strawberry));
        assert_eq!(bonus_for_pellets_eaten(150), Some(BonusKind::Apple));
        assert_eq!(bonus_for_pellets_eaten(151), None);
    }

    #[test]
    fn tolerance_is_a_quarter_tile() {
        assert_eq!(turn_tolerance(16.0), 4.0);
        assert_eq!(turn_tolerance(8.0), 2.0);
    }
}
