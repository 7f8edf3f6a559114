use super::grid::GridTracker;
use crate::rng::Rng;
use crate::types::{Cell, Direction, ModeKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub direction: Direction,
    pub cell: Cell,
}

/// Open neighbors of the tracked cell in enumeration order, minus the way back.
pub fn candidates(tracker: &GridTracker, current: Direction) -> Vec<Candidate> {
    let behind = current.opposite();
    tracker
        .open_directions()
        .filter(|dir| *dir != behind)
        .map(|direction| Candidate {
            direction,
            cell: tracker.cell().neighbor(direction),
        })
        .collect()
}

/// Picks the neighbor to move into. A single candidate is taken without
/// ranking; frightened ghosts pick at random.
pub fn choose_direction(
    candidates: &[Candidate],
    mode: ModeKind,
    target: Cell,
    rng: &mut Rng,
) -> Option<Direction> {
    match candidates {
        [] => None,
        [only] => Some(only.direction),
        _ if mode == ModeKind::Frightened => rng.pick(candidates).map(|c| c.direction),
        _ => {
            let mut ranked: Vec<(f32, Direction)> = candidates
                .iter()
                .map(|c| (c.cell.distance(target), c.direction))
                .collect();
            // Stable: exact ties keep enumeration order.
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
            ranked.first().map(|(_, dir)| *dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use crate::world::Passability;

    const TILE: f32 = 16.0;

    struct OpenField;

    impl Passability for OpenField {
        fn is_passable(&self, _cell: Cell, direction: Direction) -> bool {
            direction != Direction::None
        }
    }

    /// Only the horizontal corridor through row 5 is open.
    struct Corridor;

    impl Passability for Corridor {
        fn is_passable(&self, cell: Cell, direction: Direction) -> bool {
            direction.is_horizontal() && cell.neighbor(direction).y == 5
        }
    }

    fn tracker_at(cell: Cell, maze: &dyn Passability) -> GridTracker {
        let center = cell.center(TILE);
        let mut tracker = GridTracker::new(TILE, center);
        tracker.update(center, maze);
        tracker
    }

    fn directions(list: &[Candidate]) -> Vec<Direction> {
        list.iter().map(|c| c.direction).collect()
    }

    #[test]
    fn reversal_is_never_a_candidate() {
        let tracker = tracker_at(Cell::new(5, 5), &OpenField);
        let list = candidates(&tracker, Direction::Right);
        assert_eq!(
            directions(&list),
            vec![Direction::Right, Direction::Up, Direction::Down]
        );
        let idle = candidates(&tracker, Direction::None);
        assert_eq!(idle.len(), 4);
    }

    #[test]
    fn chase_picks_the_closer_neighbor() {
        let tracker = tracker_at(Cell::new(10, 5), &Corridor);
        let list = candidates(&tracker, Direction::Up);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].cell, Cell::new(9, 5));
        assert_eq!(list[1].cell, Cell::new(11, 5));

        let mut rng = Rng::new(3);
        assert_eq!(
            choose_direction(&list, ModeKind::Chase, Cell::new(0, 5), &mut rng),
            Some(Direction::Left)
        );
        assert_eq!(
            choose_direction(&list, ModeKind::Scatter, Cell::new(20, 0), &mut rng),
            Some(Direction::Right)
        );
    }

    #[test]
    fn exact_ties_follow_enumeration_order() {
        let tracker = tracker_at(Cell::new(5, 5), &OpenField);
        let list = candidates(&tracker, Direction::Up);
        assert_eq!(
            directions(&list),
            vec![Direction::Left, Direction::Right, Direction::Up]
        );
        let mut rng = Rng::new(0);
        // Left and Right are both sqrt(5) away; Up is 3 away.
        assert_eq!(
            choose_direction(&list, ModeKind::Chase, Cell::new(5, 7), &mut rng),
            Some(Direction::Left)
        );
    }

    #[test]
    fn chosen_distance_is_minimal() {
        let tracker = tracker_at(Cell::new(8, 8), &OpenField);
        let list = candidates(&tracker, Direction::Down);
        let mut rng = Rng::new(11);
        for tx in -3..20 {
            for ty in -3..20 {
                let target = Cell::new(tx, ty);
                let chosen = choose_direction(&list, ModeKind::Chase, target, &mut rng)
                    .expect("three candidates");
                let chosen_cell = Cell::new(8, 8).neighbor(chosen);
                for other in &list {
                    assert!(chosen_cell.distance(target) <= other.cell.distance(target));
                }
            }
        }
    }

    #[test]
    fn single_option_skips_ranking() {
        let tracker = tracker_at(Cell::new(3, 5), &Corridor);
        let list = candidates(&tracker, Direction::Left);
        assert_eq!(directions(&list), vec![Direction::Left]);
        let mut rng = Rng::new(5);
        assert_eq!(
            choose_direction(&list, ModeKind::Frightened, Cell::new(30, 5), &mut rng),
            Some(Direction::Left)
        );
        assert_eq!(
            choose_direction(&[], ModeKind::Chase, Cell::new(0, 0), &mut rng),
            None
        );
    }

    #[test]
    fn frightened_choice_stays_legal() {
        let tracker = tracker_at(Cell::new(5, 5), &OpenField);
        let mut seen = Vec::new();
        for seed in 0..200 {
            let mut rng = Rng::new(seed);
            let list = candidates(&tracker, Direction::Left);
            let chosen = choose_direction(&list, ModeKind::Frightened, Cell::new(0, 0), &mut rng)
                .expect("three candidates");
            assert_ne!(chosen, Direction::Right);
            assert!(tracker.is_open(chosen));
            if !seen.contains(&chosen) {
                seen.push(chosen);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn candidate_cells_follow_position_floor() {
        let position = Point::new(5.0 * TILE + 15.9, 5.0 * TILE);
        let mut tracker = GridTracker::new(TILE, position);
        tracker.update(position, &Corridor);
        let list = candidates(&tracker, Direction::Right);
        assert_eq!(list[0].cell, Cell::new(6, 5));
    }
}
