use super::utils::bodies_overlap;
use super::*;

impl GameEngine {
    /// Overlaps between the player body and items or ghosts this tick.
    pub(super) fn collect_overlaps(&self) -> Vec<Overlap> {
        let mut out = Vec::new();
        let player = &self.player.agent;
        if !player.alive {
            return out;
        }
        let tile = self.maze.tile_size;
        let position = player.position();
        let cell = player.cell();
        let touches_item = bodies_overlap(position, cell.center(tile), tile);

        if touches_item && self.pellets.contains(&cell) {
            out.push(Overlap::Pellet(cell));
        }
        if touches_item && self.pills.contains(&cell) {
            out.push(Overlap::Pill(cell));
        }
        if touches_item && self.bonuses.iter().any(|bonus| bonus.cell == cell) {
            out.push(Overlap::Bonus(cell));
        }
        for ghost in &self.ghosts {
            if ghost.in_game
                && ghost.agent.alive
                && bodies_overlap(position, ghost.agent.position(), tile)
            {
                out.push(Overlap::Ghost(ghost.name));
            }
        }
        out
    }

    /// Applies one overlap. Items already collected and ghosts out of play
    /// are ignored, so repeated reports are harmless.
    pub fn handle_overlap(&mut self, overlap: Overlap) {
        if self.status != GameStatus::Playing {
            return;
        }
        match overlap {
            Overlap::Portal { agent, portal } => self.teleport(agent, portal),
            Overlap::Pellet(cell) => self.eat_pellet(cell),
            Overlap::Pill(cell) => self.eat_pill(cell),
            Overlap::Bonus(cell) => self.take_bonus(cell),
            Overlap::Ghost(name) => self.meet_ghost(name),
        }
    }

    fn eat_pellet(&mut self, cell: Cell) {
        if !self.pellets.remove(&cell) {
            return;
        }
        self.add_score(PELLET_POINTS);
        if self.pellets.is_empty() {
            self.clear_level();
            return;
        }
        let eaten = self.maze.pellets.len() - self.pellets.len();
        if let Some(kind) = bonus_for_pellets_eaten(eaten) {
            self.spawn_bonus(kind);
        }
    }

    fn eat_pill(&mut self, cell: Cell) {
        if !self.pills.remove(&cell) {
            return;
        }
        self.add_score(PILL_POINTS);
        self.enable_frightened(self.level.frightened_ms);
    }

    fn spawn_bonus(&mut self, kind: BonusKind) {
        let cells: Vec<Cell> = self.maze.pellets.iter().copied().collect();
        let Some(cell) = self.rng.pick(&cells).copied() else {
            return;
        };
        self.bonuses.push(Bonus { kind, cell });
        debug!(?kind, ?cell, "bonus placed");
        self.events.push(GameEvent::BonusSpawned { kind, cell });
    }

    fn take_bonus(&mut self, cell: Cell) {
        let Some(pos) = self.bonuses.iter().position(|bonus| bonus.cell == cell) else {
            return;
        };
        let bonus = self.bonuses.remove(pos);
        self.multiplier = self.multiplier.saturating_mul(bonus_multiplier(bonus.kind));
        self.multiplier_resets
            .push(self.elapsed_ms + BONUS_MULTIPLIER_MS);
        self.events.push(GameEvent::BonusTaken {
            kind: bonus.kind,
            multiplier: self.multiplier,
        });
    }

    fn meet_ghost(&mut self, name: GhostName) {
        let ghost = &self.ghosts[name.index()];
        if !self.player.agent.alive || !ghost.in_game || !ghost.agent.alive {
            return;
        }
        let frightened = ghost.scheduler.kind() == ModeKind::Frightened;
        if frightened && self.player_mode() == PlayerMode::Power {
            if self.kill_ghost(name) {
                self.add_score(GHOST_POINTS);
            }
        } else {
            self.lose_life();
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.power_until = None;
        self.player.agent.stop();
        self.player.agent.alive = false;
        self.player.held = Direction::None;
        self.reset_ghosts();
        self.events.push(GameEvent::AgentDied {
            agent: AgentId::Player,
        });
        info!(lives = self.lives, score = self.score, "player caught");

        if self.lives == 0 {
            self.status = GameStatus::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            info!(score = self.score, level = self.level_number, "game over");
            return;
        }
        self.respawn_at = Some(self.elapsed_ms + DEATH_ANIMATION_MS);
    }

    fn clear_level(&mut self) {
        self.status = if self.level_number < self.levels.level_count() {
            GameStatus::LevelCleared
        } else {
            GameStatus::Completed
        };
        self.player.agent.stop();
        for ghost in &mut self.ghosts {
            ghost.agent.stop();
        }
        self.events.push(GameEvent::LevelClear {
            level: self.level_number,
        });
        info!(level = self.level_number, score = self.score, status = ?self.status, "level cleared");
    }
}
