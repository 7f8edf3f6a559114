use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::config::WaveSchedule;
use crate::constants::{DEAD_SPEED_FACTOR, FRIGHTENED_SPEED_FACTOR};
use crate::types::{GhostName, ModeKind, WavePhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened { saved: WavePhase, remaining_ms: u64 },
    Dead { saved: WavePhase },
}

impl GhostMode {
    pub fn kind(self) -> ModeKind {
        match self {
            Self::Scatter => ModeKind::Scatter,
            Self::Chase => ModeKind::Chase,
            Self::Frightened { .. } => ModeKind::Frightened,
            Self::Dead { .. } => ModeKind::Dead,
        }
    }

    pub fn speed_factor(self) -> f32 {
        match self {
            Self::Frightened { .. } => FRIGHTENED_SPEED_FACTOR,
            Self::Dead { .. } => DEAD_SPEED_FACTOR,
            Self::Scatter | Self::Chase => 1.0,
        }
    }

    fn from_phase(phase: WavePhase) -> Self {
        match phase {
            WavePhase::Scatter => Self::Scatter,
            WavePhase::Chase => Self::Chase,
        }
    }
}

/// Events the per-ghost timers enqueue; the engine drains them once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeTimerEvent {
    ModeExpired { ghost: GhostName, phase: WavePhase },
    FrightenedExpired { ghost: GhostName },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: ModeKind,
    pub to: ModeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PhaseTimer {
    phase: WavePhase,
    // None: never expires (or already fired).
    remaining_ms: Option<u64>,
    paused: bool,
}

impl PhaseTimer {
    fn idle() -> Self {
        Self {
            phase: WavePhase::Scatter,
            remaining_ms: None,
            paused: true,
        }
    }

    fn start(phase: WavePhase, duration_ms: Option<u64>) -> Self {
        Self {
            phase,
            remaining_ms: duration_ms,
            paused: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ModeScheduler {
    ghost: GhostName,
    schedule: Arc<WaveSchedule>,
    mode: GhostMode,
    wave_index: usize,
    timer: PhaseTimer,
}

impl ModeScheduler {
    pub fn new(ghost: GhostName, schedule: Arc<WaveSchedule>) -> Self {
        Self {
            ghost,
            schedule,
            mode: GhostMode::Scatter,
            wave_index: 0,
            timer: PhaseTimer::idle(),
        }
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn wave_index(&self) -> usize {
        self.wave_index
    }

    pub fn speed_factor(&self) -> f32 {
        self.mode.speed_factor()
    }

    /// Remaining time of the paused or running wave phase, if it can expire.
    pub fn phase_remaining_ms(&self) -> Option<u64> {
        self.timer.remaining_ms
    }

    pub fn frightened_remaining_ms(&self) -> Option<u64> {
        match self.mode {
            GhostMode::Frightened { remaining_ms, .. } => Some(remaining_ms),
            _ => None,
        }
    }

    /// Entering play starts a fresh wave cycle.
    pub fn release(&mut self) -> ModeTransition {
        let from = self.kind();
        self.wave_index = 0;
        self.mode = GhostMode::Scatter;
        self.timer = PhaseTimer::start(WavePhase::Scatter, self.schedule.scatter_ms(0));
        ModeTransition {
            from,
            to: ModeKind::Scatter,
        }
    }

    /// Back to the pre-release state after the player loses a life.
    pub fn reset(&mut self) {
        self.mode = GhostMode::Scatter;
        self.timer.paused = true;
    }

    pub fn advance(&mut self, dt_ms: u64, queue: &mut VecDeque<ModeTimerEvent>) {
        if let GhostMode::Frightened { remaining_ms, .. } = &mut self.mode {
            if *remaining_ms > 0 {
                *remaining_ms = remaining_ms.saturating_sub(dt_ms);
                if *remaining_ms == 0 {
                    queue.push_back(ModeTimerEvent::FrightenedExpired { ghost: self.ghost });
                }
            }
        }

        if self.timer.paused {
            return;
        }
        if let Some(remaining) = self.timer.remaining_ms {
            let next = remaining.saturating_sub(dt_ms);
            if next == 0 {
                self.timer.remaining_ms = None;
                queue.push_back(ModeTimerEvent::ModeExpired {
                    ghost: self.ghost,
                    phase: self.timer.phase,
                });
            } else {
                self.timer.remaining_ms = Some(next);
            }
        }
    }

    pub fn on_timer(&mut self, event: ModeTimerEvent) -> Option<ModeTransition> {
        match event {
            ModeTimerEvent::ModeExpired { phase, .. } => {
                if self.kind() != ModeKind::from(phase) || self.timer.phase != phase {
                    debug!(ghost = ?self.ghost, ?phase, mode = ?self.kind(), "stale mode timer ignored");
                    return None;
                }
                match phase {
                    WavePhase::Scatter => Some(self.enter_chase()),
                    WavePhase::Chase => self.enter_next_scatter(),
                }
            }
            ModeTimerEvent::FrightenedExpired { .. } => match self.mode {
                GhostMode::Frightened {
                    remaining_ms: 0, ..
                } => self.disable_frightened(),
                _ => {
                    debug!(ghost = ?self.ghost, mode = ?self.kind(), "stale frightened timer ignored");
                    None
                }
            },
        }
    }

    fn enter_chase(&mut self) -> ModeTransition {
        let finished_wave = self.wave_index;
        self.wave_index += 1;
        self.mode = GhostMode::Chase;
        self.timer = PhaseTimer::start(WavePhase::Chase, self.schedule.chase_ms(finished_wave));
        ModeTransition {
            from: ModeKind::Scatter,
            to: ModeKind::Chase,
        }
    }

    fn enter_next_scatter(&mut self) -> Option<ModeTransition> {
        if !self.schedule.has_wave(self.wave_index) {
            // Schedule exhausted: chase for the rest of the level.
            self.timer = PhaseTimer::start(WavePhase::Chase, None);
            return None;
        }
        self.mode = GhostMode::Scatter;
        self.timer = PhaseTimer::start(
            WavePhase::Scatter,
            self.schedule.scatter_ms(self.wave_index),
        );
        Some(ModeTransition {
            from: ModeKind::Chase,
            to: ModeKind::Scatter,
        })
    }

    /// Returns a transition only when the ghost was not frightened already;
    /// a repeat call just extends the remaining time.
    pub fn enable_frightened(&mut self, duration_ms: u64) -> Option<ModeTransition> {
        let saved = match self.mode {
            GhostMode::Scatter => WavePhase::Scatter,
            GhostMode::Chase => WavePhase::Chase,
            GhostMode::Frightened {
                saved,
                remaining_ms,
            } => {
                self.mode = GhostMode::Frightened {
                    saved,
                    remaining_ms: remaining_ms.saturating_add(duration_ms),
                };
                return None;
            }
            GhostMode::Dead { .. } => return None,
        };
        let from = self.kind();
        self.mode = GhostMode::Frightened {
            saved,
            remaining_ms: duration_ms.max(1),
        };
        self.timer.paused = true;
        Some(ModeTransition {
            from,
            to: ModeKind::Frightened,
        })
    }

    pub fn disable_frightened(&mut self) -> Option<ModeTransition> {
        let GhostMode::Frightened { saved, .. } = self.mode else {
            return None;
        };
        self.mode = GhostMode::from_phase(saved);
        self.timer.paused = false;
        Some(ModeTransition {
            from: ModeKind::Frightened,
            to: saved.into(),
        })
    }

    pub fn kill(&mut self) -> Option<ModeTransition> {
        let GhostMode::Frightened { saved, .. } = self.mode else {
            return None;
        };
        self.mode = GhostMode::Dead { saved };
        Some(ModeTransition {
            from: ModeKind::Frightened,
            to: ModeKind::Dead,
        })
    }

    pub fn revive(&mut self) -> Option<ModeTransition> {
        let GhostMode::Dead { saved } = self.mode else {
            return None;
        };
        self.mode = GhostMode::from_phase(saved);
        self.timer.paused = false;
        Some(ModeTransition {
            from: ModeKind::Dead,
            to: saved.into(),
        })
    }
}
