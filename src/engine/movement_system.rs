use super::portal::exit_position;
use super::targeting::{candidates, choose_direction};
use super::utils::{portal_under, substep_count};
use super::*;

impl GameEngine {
    pub(super) fn update_movement(&mut self, dt_ms: u64) {
        let tile = self.maze.tile_size;
        let fastest = std::iter::once(&self.player.agent)
            .chain(self.ghosts.iter().map(|ghost| &ghost.agent))
            .map(|agent| agent.turn.speed())
            .fold(0.0_f32, f32::max);
        let steps = substep_count(fastest, dt_ms, tile);
        let dt_secs = dt_ms as f32 / 1000.0 / steps as f32;

        for _ in 0..steps {
            self.step_player(dt_secs);
            for idx in 0..self.ghosts.len() {
                self.step_ghost(idx, dt_secs);
            }
            if self.status != GameStatus::Playing {
                break;
            }
        }
    }

    pub(super) fn apply_held_input(&mut self) {
        let player = &mut self.player;
        let held = player.held;
        if held == Direction::None || !player.agent.alive {
            return;
        }
        if held == player.agent.direction() && !player.agent.body.velocity.is_zero() {
            return;
        }
        let request = player.agent.request_turn(held);
        if request != TurnRequest::Ignored && !player.started {
            player.started = true;
            debug!(direction = ?held, at = self.elapsed_ms, "player started");
            self.schedule_releases();
        }
    }

    fn step_player(&mut self, dt_secs: f32) {
        if !self.player.agent.alive {
            return;
        }
        self.player.agent.integrate(dt_secs);
        if let Some(portal) = portal_under(&self.player.agent, &self.maze) {
            self.teleport(AgentId::Player, portal);
        }

        let agent = &mut self.player.agent;
        agent.sense(&self.maze);
        if agent.grid.cell_changed() {
            agent.turn.cancel_pending();
            agent.grid.mark_decided();
        }
        self.apply_held_input();

        let agent = &mut self.player.agent;
        agent.guard_stall();
        agent.settle_turn();
    }

    fn step_ghost(&mut self, idx: usize, dt_secs: f32) {
        let ghost = &self.ghosts[idx];
        let dead = ghost.scheduler.kind() == ModeKind::Dead;
        if !ghost.in_game && !dead {
            return;
        }

        if self.ghosts[idx].agent.integrate(dt_secs) {
            self.ghosts[idx].agent.grid.forget_decision();
        }
        if let Some(portal) = portal_under(&self.ghosts[idx].agent, &self.maze) {
            self.teleport(AgentId::Ghost(self.ghosts[idx].name), portal);
        }

        let ghost = &mut self.ghosts[idx];
        ghost.agent.sense(&self.maze);
        if ghost.agent.grid.cell_changed() {
            ghost.agent.grid.mark_decided();
            self.decide_ghost_direction(idx);
        }

        let ghost = &self.ghosts[idx];
        if dead && ghost.agent.cell() == ghost.home {
            self.revive_ghost(idx);
        }

        let agent = &mut self.ghosts[idx].agent;
        agent.guard_stall();
        agent.settle_turn();
    }

    /// Runs once per cell entry: pick among the forward options, or turn back
    /// at a dead end.
    fn decide_ghost_direction(&mut self, idx: usize) {
        let ghost = &mut self.ghosts[idx];
        ghost.agent.turn.cancel_pending();
        let current = ghost.agent.direction();
        let options = candidates(&ghost.agent.grid, ghost.agent.heading());
        if options.is_empty() {
            ghost.agent.reverse();
            return;
        }
        let Some(choice) = choose_direction(
            &options,
            ghost.scheduler.kind(),
            ghost.target,
            &mut self.rng,
        ) else {
            return;
        };
        if choice != current {
            ghost.agent.request_turn(choice);
        }
    }

    fn revive_ghost(&mut self, idx: usize) {
        let Some(transition) = self.ghosts[idx].scheduler.revive() else {
            return;
        };
        let ghost = &mut self.ghosts[idx];
        ghost.in_game = true;
        ghost.agent.place_at(ghost.home, &self.maze);
        ghost.agent.grid.mark_decided();
        self.apply_transition(idx, transition, false);
        self.ghosts[idx].agent.set_velocity(Direction::Left);
    }

    pub(super) fn teleport(&mut self, agent_id: AgentId, portal_id: usize) {
        let Some(entry) = self.maze.portal(portal_id) else {
            return;
        };
        let Some(exit) = self.maze.portal(entry.target) else {
            return;
        };
        let tile = self.maze.tile_size;
        let agent = match agent_id {
            AgentId::Player => &mut self.player.agent,
            AgentId::Ghost(name) => &mut self.ghosts[name.index()].agent,
        };
        let direction = agent.direction();
        let landed = exit_position(entry, exit, agent.position(), direction, tile);
        agent.relocate(landed, &self.maze);
        agent.set_velocity(direction);
        debug!(agent = ?agent_id, from = entry.id, to = exit.id, "teleported");
        self.events.push(GameEvent::Teleported {
            agent: agent_id,
            portal: portal_id,
        });
    }
}
