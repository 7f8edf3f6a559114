use super::agent::Agent;
use crate::types::Point;
use crate::world::Maze;

/// Bodies are half-tile squares centered on the agent position.
pub(super) fn body_half_extent(tile_size: f32) -> f32 {
    tile_size / 4.0
}

pub(super) fn bodies_overlap(a: Point, b: Point, tile_size: f32) -> bool {
    let reach = body_half_extent(tile_size) * 2.0;
    (a.x - b.x).abs() < reach && (a.y - b.y).abs() < reach
}

/// Substeps needed so nobody moves more than a quarter tile at once.
pub(super) fn substep_count(max_speed: f32, dt_ms: u64, tile_size: f32) -> u32 {
    let distance = max_speed * dt_ms as f32 / 1000.0;
    let max_step = tile_size / 4.0;
    if distance <= max_step || max_step <= 0.0 {
        return 1;
    }
    (distance / max_step).ceil() as u32
}

pub(super) fn portal_under(agent: &Agent, maze: &Maze) -> Option<usize> {
    let half = body_half_extent(maze.tile_size);
    maze.portals
        .iter()
        .find(|portal| portal.overlaps_body(agent.position(), half))
        .map(|portal| portal.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substeps_cap_movement_at_a_quarter_tile() {
        assert_eq!(substep_count(100.0, 16, 16.0), 1);
        assert_eq!(substep_count(250.0, 16, 16.0), 1);
        assert_eq!(substep_count(100.0, 100, 16.0), 3);
        assert_eq!(substep_count(0.0, 1_000, 16.0), 1);
    }

    #[test]
    fn overlap_needs_both_axes() {
        assert!(bodies_overlap(Point::new(8.0, 8.0), Point::new(15.9, 8.0), 16.0));
        assert!(!bodies_overlap(Point::new(8.0, 8.0), Point::new(16.0, 8.0), 16.0));
        assert!(!bodies_overlap(Point::new(8.0, 8.0), Point::new(10.0, 24.0), 16.0));
    }
}
