use crate::types::{Direction, Point};
use crate::world::Portal;

/// Where an agent entering `entry` reappears next to `exit`.
///
/// The agent lands half a tile outside the exit on the travel axis, on the
/// side facing away from the entry portal. The cross-axis offset relative to
/// the portal is kept.
pub fn exit_position(
    entry: &Portal,
    exit: &Portal,
    position: Point,
    direction: Direction,
    tile_size: f32,
) -> Point {
    let half = tile_size / 2.0;
    let horizontal = match direction {
        Direction::Left | Direction::Right => true,
        Direction::Up | Direction::Down => false,
        Direction::None => entry.x != exit.x,
    };

    if horizontal {
        let x = if entry.x > exit.x {
            exit.x + exit.width + half
        } else {
            exit.x - half
        };
        Point::new(x, exit.y + (position.y - entry.y))
    } else {
        let y = if entry.y > exit.y {
            exit.y + exit.height + half
        } else {
            exit.y - half
        };
        Point::new(exit.x + (position.x - entry.x), y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f32 = 16.0;

    fn portal(id: usize, cx: i32, cy: i32) -> Portal {
        Portal {
            id,
            x: cx as f32 * TILE,
            y: cy as f32 * TILE,
            width: TILE,
            height: TILE,
            target: id ^ 1,
        }
    }

    #[test]
    fn leaving_left_edge_lands_inside_right_edge() {
        let left = portal(0, 0, 9);
        let right = portal(1, 20, 9);
        let landed = exit_position(&left, &right, Point::new(10.0, 152.0), Direction::Left, TILE);
        assert_eq!(landed, Point::new(20.0 * TILE - 8.0, 152.0));
        assert!(!right.overlaps_body(landed, TILE / 4.0));
    }

    #[test]
    fn leaving_right_edge_lands_inside_left_edge() {
        let left = portal(0, 0, 9);
        let right = portal(1, 20, 9);
        let landed = exit_position(&right, &left, Point::new(326.0, 150.0), Direction::Right, TILE);
        assert_eq!(landed, Point::new(TILE + 8.0, 150.0));
        assert!(!left.overlaps_body(landed, TILE / 4.0));
    }

    #[test]
    fn vertical_portals_keep_column_offset() {
        let top = portal(0, 4, 0);
        let bottom = portal(1, 4, 12);
        let landed = exit_position(&bottom, &top, Point::new(70.0, 200.0), Direction::Down, TILE);
        assert_eq!(landed, Point::new(70.0, TILE + 8.0));
        let back = exit_position(&top, &bottom, Point::new(72.0, 4.0), Direction::Up, TILE);
        assert_eq!(back, Point::new(72.0, 12.0 * TILE - 8.0));
    }

    #[test]
    fn idle_agent_uses_the_axis_the_portals_differ_on() {
        let left = portal(0, 0, 9);
        let right = portal(1, 20, 9);
        let landed = exit_position(&left, &right, Point::new(8.0, 152.0), Direction::None, TILE);
        assert_eq!(landed.x, 20.0 * TILE - 8.0);
    }
}
