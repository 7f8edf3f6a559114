use super::grid::GridTracker;
use super::mode::ModeScheduler;
use super::turning::{Body, TurnController, TurnRequest};
use crate::types::{Cell, Direction, GhostName, Point};
use crate::world::Passability;

/// Movement state shared by the player and the ghosts.
#[derive(Clone, Debug)]
pub struct Agent {
    pub body: Body,
    pub grid: GridTracker,
    pub turn: TurnController,
    pub base_speed: f32,
    pub alive: bool,
    /// Direction held before the last wall stop.
    last_heading: Direction,
}

impl Agent {
    pub fn new(
        spawn: Cell,
        tile_size: f32,
        speed: f32,
        tolerance: f32,
        maze: &dyn Passability,
    ) -> Self {
        let position = spawn.center(tile_size);
        let mut grid = GridTracker::new(tile_size, position);
        grid.update(position, maze);
        Self {
            body: Body::at(position),
            grid,
            turn: TurnController::new(speed, tolerance),
            base_speed: speed,
            alive: true,
            last_heading: Direction::None,
        }
    }

    pub fn cell(&self) -> Cell {
        self.grid.cell()
    }

    pub fn position(&self) -> Point {
        self.body.position
    }

    pub fn direction(&self) -> Direction {
        self.turn.current()
    }

    /// Current direction, or the one it had when a wall stopped it.
    pub fn heading(&self) -> Direction {
        match self.turn.current() {
            Direction::None => self.last_heading,
            current => current,
        }
    }

    pub fn sense(&mut self, maze: &dyn Passability) {
        self.grid.update(self.body.position, maze);
    }

    /// Stops the agent on the center of `cell`; the next sense counts as a
    /// fresh cell entry.
    pub fn place_at(&mut self, cell: Cell, maze: &dyn Passability) {
        self.turn.stop(&mut self.body);
        self.body.position = cell.center(self.grid.tile_size());
        self.grid.update(self.body.position, maze);
        self.grid.forget_decision();
        self.last_heading = Direction::None;
    }

    pub fn relocate(&mut self, position: Point, maze: &dyn Passability) {
        self.body.position = position;
        self.grid.update(position, maze);
    }

    pub fn request_turn(&mut self, direction: Direction) -> TurnRequest {
        self.turn.request_turn(direction, &self.grid, &mut self.body)
    }

    pub fn reverse(&mut self) -> TurnRequest {
        let back = self.heading().opposite();
        self.request_turn(back)
    }

    pub fn set_velocity(&mut self, direction: Direction) {
        self.turn.set_velocity(direction, &mut self.body);
    }

    pub fn stop(&mut self) {
        self.turn.stop(&mut self.body);
    }

    pub fn set_speed_factor(&mut self, factor: f32) {
        self.turn.set_speed(self.base_speed * factor, &mut self.body);
    }

    pub fn settle_turn(&mut self) -> bool {
        self.turn.try_settle_turn(&mut self.body)
    }

    pub fn guard_stall(&mut self) -> bool {
        self.alive && self.turn.guard_stall(&mut self.body)
    }

    /// Moves the body for `dt_secs`. An agent heading into a wall stops on
    /// the center of its cell; returns true when that happened.
    pub fn integrate(&mut self, dt_secs: f32) -> bool {
        let direction = self.turn.current();
        self.body.position.x += self.body.velocity.x * dt_secs;
        self.body.position.y += self.body.velocity.y * dt_secs;
        if direction == Direction::None || self.grid.is_open(direction) {
            return false;
        }

        let center = self.grid.cell_center();
        let past_center = if direction.is_horizontal() {
            (self.body.position.x - center.x) * direction.sign() > 0.0
        } else {
            (self.body.position.y - center.y) * direction.sign() > 0.0
        };
        if !past_center {
            return false;
        }
        if direction.is_horizontal() {
            self.body.position.x = center.x;
        } else {
            self.body.position.y = center.y;
        }
        self.turn.stop(&mut self.body);
        self.last_heading = direction;
        true
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub agent: Agent,
    pub spawn: Cell,
    pub held: Direction,
    pub started: bool,
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub name: GhostName,
    pub agent: Agent,
    pub scheduler: ModeScheduler,
    pub spawn: Cell,
    pub home: Cell,
    pub corner: Cell,
    pub target: Cell,
    pub in_game: bool,
    pub ending_notified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::targeting::candidates;

    const TILE: f32 = 16.0;

    /// Row 2 is open from column 1 to 6; everything else is wall.
    struct Hallway;

    impl Passability for Hallway {
        fn is_passable(&self, cell: Cell, direction: Direction) -> bool {
            let next = cell.neighbor(direction);
            direction != Direction::None && next.y == 2 && (1..=6).contains(&next.x)
        }
    }

    #[test]
    fn stops_on_center_before_a_wall() {
        let mut agent = Agent::new(Cell::new(5, 2), TILE, 120.0, 4.0, &Hallway);
        agent.set_velocity(Direction::Right);
        assert!(!agent.integrate(0.05));
        agent.sense(&Hallway);
        assert_eq!(agent.cell(), Cell::new(5, 2));
        assert!(!agent.integrate(0.05));
        agent.sense(&Hallway);
        assert_eq!(agent.cell(), Cell::new(6, 2));

        assert!(agent.integrate(0.05));
        assert_eq!(agent.position(), Cell::new(6, 2).center(TILE));
        assert_eq!(agent.direction(), Direction::None);
        assert!(agent.body.velocity.is_zero());
    }

    #[test]
    fn wall_stop_remembers_the_heading() {
        let mut agent = Agent::new(Cell::new(6, 2), TILE, 120.0, 4.0, &Hallway);
        agent.set_velocity(Direction::Right);
        assert!(agent.integrate(0.05));
        assert_eq!(agent.direction(), Direction::None);
        assert_eq!(agent.heading(), Direction::Right);
        // Only the way back is open, so it is not offered as a choice.
        assert!(candidates(&agent.grid, agent.heading()).is_empty());

        assert_eq!(agent.reverse(), TurnRequest::Queued);
        assert!(agent.settle_turn());
        assert_eq!(agent.direction(), Direction::Left);

        agent.place_at(Cell::new(3, 2), &Hallway);
        assert_eq!(agent.heading(), Direction::None);
    }

    #[test]
    fn leaving_a_dead_end_is_not_clamped() {
        let mut agent = Agent::new(Cell::new(6, 2), TILE, 120.0, 4.0, &Hallway);
        assert!(!agent.grid.is_open(Direction::Right));
        agent.set_velocity(Direction::Left);
        assert!(!agent.integrate(0.05));
        assert_eq!(agent.position().x, 6.0 * TILE + 8.0 - 6.0);
    }

    #[test]
    fn place_at_forces_a_fresh_decision() {
        let mut agent = Agent::new(Cell::new(2, 2), TILE, 100.0, 4.0, &Hallway);
        agent.grid.mark_decided();
        agent.set_velocity(Direction::Right);
        agent.place_at(Cell::new(2, 2), &Hallway);
        assert!(agent.grid.cell_changed());
        assert_eq!(agent.direction(), Direction::None);
        assert_eq!(agent.position(), Point::new(40.0, 40.0));
    }

    #[test]
    fn speed_factor_scales_from_base() {
        let mut agent = Agent::new(Cell::new(3, 2), TILE, 90.0, 4.0, &Hallway);
        agent.set_velocity(Direction::Left);
        agent.set_speed_factor(0.5);
        assert_eq!(agent.body.velocity, Point::new(-45.0, 0.0));
        agent.set_speed_factor(1.0);
        assert_eq!(agent.body.velocity, Point::new(-90.0, 0.0));
    }

    #[test]
    fn dead_agents_are_not_restarted() {
        let mut agent = Agent::new(Cell::new(3, 2), TILE, 90.0, 4.0, &Hallway);
        agent.set_velocity(Direction::Left);
        agent.body.velocity = Point::ZERO;
        agent.alive = false;
        assert!(!agent.guard_stall());
        agent.alive = true;
        assert!(agent.guard_stall());
    }
}
