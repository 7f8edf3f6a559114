use super::*;

/// Everything the virtual clock can fire. Collected at the start of a tick
/// and drained before anything moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TimerEvent {
    Mode(ModeTimerEvent),
    GhostRelease(GhostName),
    PowerExpired,
    BonusMultiplierExpired,
    PlayerRespawn,
}

impl GameEngine {
    pub(super) fn collect_timer_events(&mut self, dt_ms: u64) {
        let now = self.elapsed_ms;

        let mut mode_events = VecDeque::new();
        for ghost in &mut self.ghosts {
            ghost.scheduler.advance(dt_ms, &mut mode_events);
        }
        self.timers
            .extend(mode_events.into_iter().map(TimerEvent::Mode));

        if self.power_until.is_some_and(|until| now >= until) {
            self.power_until = None;
            self.timers.push_back(TimerEvent::PowerExpired);
        }

        let before = self.multiplier_resets.len();
        self.multiplier_resets.retain(|at| now < *at);
        for _ in self.multiplier_resets.len()..before {
            self.timers.push_back(TimerEvent::BonusMultiplierExpired);
        }

        if self.respawn_at.is_some_and(|at| now >= at) {
            self.respawn_at = None;
            self.timers.push_back(TimerEvent::PlayerRespawn);
        }

        for name in GhostName::ALL {
            let slot = &mut self.release_at[name.index()];
            if slot.is_some_and(|at| now >= at) {
                *slot = None;
                self.timers.push_back(TimerEvent::GhostRelease(name));
            }
        }
    }

    pub(super) fn process_timer_events(&mut self) {
        while let Some(event) = self.timers.pop_front() {
            match event {
                TimerEvent::Mode(mode_event) => {
                    let ghost = match mode_event {
                        ModeTimerEvent::ModeExpired { ghost, .. } => ghost,
                        ModeTimerEvent::FrightenedExpired { ghost } => ghost,
                    };
                    let idx = ghost.index();
                    if let Some(transition) = self.ghosts[idx].scheduler.on_timer(mode_event) {
                        self.apply_transition(idx, transition, true);
                    }
                }
                TimerEvent::GhostRelease(name) => self.release_ghost(name),
                TimerEvent::PowerExpired => {
                    debug!(at = self.elapsed_ms, "power mode over");
                }
                TimerEvent::BonusMultiplierExpired => {
                    self.multiplier = self.level.multiplier;
                }
                TimerEvent::PlayerRespawn => self.respawn_player(),
            }
        }
    }

    /// First legal input after a (re)spawn lets the ghosts out one by one.
    pub(super) fn schedule_releases(&mut self) {
        let now = self.elapsed_ms;
        for name in GhostName::ALL {
            if !self.ghosts[name.index()].in_game {
                self.release_at[name.index()] =
                    Some(now + GHOST_RELEASE_DELAYS_MS[name.index()]);
            }
        }
    }

    pub(super) fn release_ghost(&mut self, name: GhostName) {
        let ghost = &mut self.ghosts[name.index()];
        if ghost.in_game || ghost.scheduler.kind() == ModeKind::Dead {
            return;
        }
        let transition = ghost.scheduler.release();
        ghost.in_game = true;
        ghost.target = ghost.corner;
        ghost.agent.place_at(ghost.home, &self.maze);
        ghost.agent.set_speed_factor(ghost.scheduler.speed_factor());
        ghost.agent.set_velocity(Direction::Left);
        ghost.agent.grid.mark_decided();
        debug!(ghost = ?name, at = self.elapsed_ms, "ghost released");
        self.events.push(GameEvent::ModeChanged {
            ghost: name,
            mode: transition.to,
        });
    }

    /// Speed, target and notification for a mode change. Every change except
    /// release and revive flips the ghost around.
    pub(super) fn apply_transition(&mut self, idx: usize, transition: ModeTransition, reverse: bool) {
        let player_cell = self.player.agent.cell();
        let ghost = &mut self.ghosts[idx];
        ghost.agent.set_speed_factor(ghost.scheduler.speed_factor());
        match transition.to {
            ModeKind::Scatter => ghost.target = ghost.corner,
            ModeKind::Chase => ghost.target = player_cell,
            ModeKind::Dead => ghost.target = ghost.home,
            ModeKind::Frightened => {}
        }
        if reverse {
            ghost.agent.reverse();
        }
        debug!(
            ghost = ?ghost.name,
            from = ?transition.from,
            to = ?transition.to,
            wave = ghost.scheduler.wave_index(),
            "mode changed"
        );
        self.events.push(GameEvent::ModeChanged {
            ghost: ghost.name,
            mode: transition.to,
        });
    }
}
