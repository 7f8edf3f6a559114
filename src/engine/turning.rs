use super::grid::GridTracker;
use crate::types::{Direction, Point};

/// Kinematic state the turn controller steers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub position: Point,
    pub velocity: Point,
}

impl Body {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            velocity: Point::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRequest {
    Ignored,
    Reversed,
    Queued,
}

/// Current/pending direction of one agent plus the cell center a queued
/// turn commits at.
#[derive(Clone, Debug)]
pub struct TurnController {
    current: Direction,
    pending: Direction,
    turn_point: Point,
    tolerance: f32,
    speed: f32,
}

impl TurnController {
    pub fn new(speed: f32, tolerance: f32) -> Self {
        Self {
            current: Direction::None,
            pending: Direction::None,
            turn_point: Point::ZERO,
            tolerance,
            speed,
        }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn pending(&self) -> Direction {
        self.pending
    }

    pub fn is_turning(&self) -> bool {
        self.pending != Direction::None
    }

    #[cfg(test)]
    pub(crate) fn turn_point(&self) -> Point {
        self.turn_point
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn request_turn(
        &mut self,
        direction: Direction,
        tracker: &GridTracker,
        body: &mut Body,
    ) -> TurnRequest {
        if direction == Direction::None
            || direction == self.pending
            || !tracker.is_open(direction)
        {
            return TurnRequest::Ignored;
        }

        if self.current == direction.opposite() {
            // A turn queued before the reversal points at a cell now behind us.
            self.pending = Direction::None;
            self.set_velocity(direction, body);
            return TurnRequest::Reversed;
        }

        self.pending = direction;
        self.turn_point = tracker.cell_center();
        TurnRequest::Queued
    }

    pub fn try_settle_turn(&mut self, body: &mut Body) -> bool {
        if self.pending == Direction::None {
            return false;
        }
        let cx = body.position.x.floor();
        let cy = body.position.y.floor();
        if (cx - self.turn_point.x).abs() >= self.tolerance
            || (cy - self.turn_point.y).abs() >= self.tolerance
        {
            return false;
        }

        body.position = self.turn_point;
        body.velocity = Point::ZERO;
        let direction = self.pending;
        self.set_velocity(direction, body);
        self.pending = Direction::None;
        true
    }

    pub fn set_velocity(&mut self, direction: Direction, body: &mut Body) {
        let signed = self.speed * direction.sign();
        body.velocity = if direction.is_horizontal() {
            Point::new(signed, 0.0)
        } else if direction.is_vertical() {
            Point::new(0.0, signed)
        } else {
            Point::ZERO
        };
        self.current = direction;
    }

    pub fn stop(&mut self, body: &mut Body) {
        body.velocity = Point::ZERO;
        self.current = Direction::None;
        self.pending = Direction::None;
    }

    pub fn cancel_pending(&mut self) {
        self.pending = Direction::None;
    }

    /// Changes speed; a moving agent keeps its heading at the new speed.
    pub fn set_speed(&mut self, speed: f32, body: &mut Body) {
        self.speed = speed;
        if !body.velocity.is_zero() {
            let direction = self.current;
            self.set_velocity(direction, body);
        }
    }

    /// Restarts an agent left at zero velocity by outside collision handling.
    pub fn guard_stall(&mut self, body: &mut Body) -> bool {
        if self.is_turning() || !body.velocity.is_zero() || self.current == Direction::None {
            return false;
        }
        let direction = self.current;
        self.set_velocity(direction, body);
        true
    }
}
