use super::*;

pub(super) fn build_agents(
    maze: &Maze,
    level: &LevelConfig,
    options: &GameEngineOptions,
) -> (Player, Vec<Ghost>) {
    let tile = maze.tile_size;
    let player_tolerance = options
        .player_turn_tolerance
        .unwrap_or_else(|| turn_tolerance(tile));
    let player = Player {
        agent: Agent::new(
            maze.player_spawn,
            tile,
            level.player_speed,
            player_tolerance,
            maze,
        ),
        spawn: maze.player_spawn,
        held: Direction::None,
        started: false,
    };

    let ghosts = GhostName::ALL
        .iter()
        .map(|name| {
            let spawn = maze.ghost_spawn(*name);
            let corner = maze.scatter_target(*name);
            Ghost {
                name: *name,
                agent: Agent::new(spawn, tile, level.ghost_speed, turn_tolerance(tile), maze),
                scheduler: ModeScheduler::new(*name, level.waves.clone()),
                spawn,
                home: maze.ghost_home,
                corner,
                target: corner,
                in_game: false,
                ending_notified: false,
            }
        })
        .collect();
    (player, ghosts)
}

impl GameEngine {
    /// Fresh agents and items for the current level; score and lives stay.
    pub(super) fn load_level(&mut self) {
        let (player, ghosts) = build_agents(&self.maze, &self.level, &self.options);
        self.player = player;
        self.ghosts = ghosts;
        self.pellets = self.maze.pellets.clone();
        self.pills = self.maze.pills.clone();
        self.bonuses.clear();
        self.multiplier = self.level.multiplier;
        self.status = GameStatus::Playing;
        self.timers.clear();
        self.power_until = None;
        self.respawn_at = None;
        self.release_at = [None; 4];
        self.multiplier_resets.clear();
        debug!(
            level = self.level_number,
            waves = self.level.waves.len(),
            pellets = self.pellets.len(),
            "level loaded"
        );
    }

    /// Ghosts go back to their spawns, out of play, until the player moves
    /// again.
    pub(super) fn reset_ghosts(&mut self) {
        self.release_at = [None; 4];
        for ghost in &mut self.ghosts {
            ghost.scheduler.reset();
            ghost.in_game = false;
            ghost.ending_notified = false;
            ghost.target = ghost.corner;
            ghost.agent.place_at(ghost.spawn, &self.maze);
            ghost.agent.set_speed_factor(1.0);
        }
    }

    pub(super) fn respawn_player(&mut self) {
        let player = &mut self.player;
        player.agent.place_at(player.spawn, &self.maze);
        player.agent.alive = true;
        player.started = false;
        player.held = Direction::None;
        debug!(lives = self.lives, "player respawned");
    }

    #[cfg(test)]
    pub(super) fn place_player_for_test(&mut self, cell: Cell, direction: Direction) {
        let player = &mut self.player;
        player.agent.place_at(cell, &self.maze);
        player.agent.set_velocity(direction);
        player.agent.grid.mark_decided();
        player.started = true;
    }
}
