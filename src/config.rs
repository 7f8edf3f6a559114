use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One scatter + chase pair. A missing (or zero) duration never expires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chase: Option<u64>,
}

impl Wave {
    pub const fn new(scatter: u64, chase: u64) -> Self {
        Self {
            scatter: Some(scatter),
            chase: Some(chase),
        }
    }

    pub const fn scatter_only(scatter: u64) -> Self {
        Self {
            scatter: Some(scatter),
            chase: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveSchedule {
    waves: Vec<Wave>,
}

impl WaveSchedule {
    pub fn new(waves: Vec<Wave>) -> Self {
        Self { waves }
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn has_wave(&self, index: usize) -> bool {
        index < self.waves.len()
    }

    pub fn scatter_ms(&self, index: usize) -> Option<u64> {
        self.waves
            .get(index)
            .and_then(|wave| wave.scatter)
            .filter(|ms| *ms > 0)
    }

    pub fn chase_ms(&self, index: usize) -> Option<u64> {
        self.waves
            .get(index)
            .and_then(|wave| wave.chase)
            .filter(|ms| *ms > 0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub multiplier: u32,
    #[serde(rename = "powerModeTime", alias = "frightened_ms")]
    pub frightened_ms: u64,
    #[serde(rename = "pacmanSpeed", alias = "player_speed")]
    pub player_speed: f32,
    #[serde(rename = "ghostSpeed", alias = "ghost_speed")]
    pub ghost_speed: f32,
    #[serde(rename = "wavesDurations", alias = "waves")]
    pub waves: Arc<WaveSchedule>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    multiplier: 1,
                    frightened_ms: 7_000,
                    player_speed: 100.0,
                    ghost_speed: 90.0,
                    waves: Arc::new(WaveSchedule::new(vec![
                        Wave::new(7_000, 20_000),
                        Wave::new(7_000, 20_000),
                        Wave::new(5_000, 20_000),
                        Wave::scatter_only(5_000),
                    ])),
                },
                LevelConfig {
                    multiplier: 2,
                    frightened_ms: 6_000,
                    player_speed: 110.0,
                    ghost_speed: 100.0,
                    waves: Arc::new(WaveSchedule::new(vec![
                        Wave::new(5_000, 15_000),
                        Wave::new(5_000, 20_000),
                        Wave::new(3_000, 15_000),
                        Wave::scatter_only(3_000),
                    ])),
                },
                LevelConfig {
                    multiplier: 3,
                    frightened_ms: 5_000,
                    player_speed: 120.0,
                    ghost_speed: 110.0,
                    waves: Arc::new(WaveSchedule::new(vec![
                        Wave::new(3_000, 20_000),
                        Wave::new(3_000, 20_000),
                        Wave::new(3_000, 15_000),
                        Wave::scatter_only(3_000),
                    ])),
                },
            ],
        }
    }
}

impl LevelTable {
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        let table = Self { levels };
        table.validate()?;
        Ok(table)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let table: LevelTable = serde_json::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptyLevelTable);
        }
        for (idx, level) in self.levels.iter().enumerate() {
            let number = idx as u32 + 1;
            if level.waves.is_empty() {
                return Err(ConfigError::EmptyWaveSchedule { level: number });
            }
            if level.player_speed <= 0.0 {
                return Err(ConfigError::NonPositive {
                    level: number,
                    field: "pacmanSpeed",
                });
            }
            if level.ghost_speed <= 0.0 {
                return Err(ConfigError::NonPositive {
                    level: number,
                    field: "ghostSpeed",
                });
            }
            if level.multiplier == 0 {
                return Err(ConfigError::NonPositive {
                    level: number,
                    field: "multiplier",
                });
            }
        }
        Ok(())
    }

    /// Levels are numbered from 1.
    pub fn level(&self, number: u32) -> Result<&LevelConfig, ConfigError> {
        number
            .checked_sub(1)
            .and_then(|idx| self.levels.get(idx as usize))
            .ok_or(ConfigError::UnknownLevel(number))
    }

    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let table = LevelTable::default();
        assert!(table.validate().is_ok());
        assert_eq!(table.level_count(), 3);
        assert_eq!(table.level(1).map(|l| l.frightened_ms).ok(), Some(7_000));
        assert!(matches!(table.level(0), Err(ConfigError::UnknownLevel(0))));
        assert!(matches!(table.level(4), Err(ConfigError::UnknownLevel(4))));
    }

    #[test]
    fn final_wave_has_permanent_chase() {
        let table = LevelTable::default();
        let waves = &table.level(1).expect("level 1").waves;
        assert_eq!(waves.scatter_ms(3), Some(5_000));
        assert_eq!(waves.chase_ms(3), None);
        assert_eq!(waves.chase_ms(7), None);
    }

    #[test]
    fn zero_duration_counts_as_missing() {
        let waves = WaveSchedule::new(vec![Wave {
            scatter: Some(0),
            chase: Some(1_000),
        }]);
        assert_eq!(waves.scatter_ms(0), None);
        assert_eq!(waves.chase_ms(0), Some(1_000));
    }

    #[test]
    fn json_table_reads_camel_case_fields() {
        let raw = r#"[
            {
                "multiplier": 1,
                "powerModeTime": 4000,
                "pacmanSpeed": 80,
                "ghostSpeed": 70,
                "wavesDurations": [{ "scatter": 7000, "chase": 20000 }, { "scatter": 5000 }]
            }
        ]"#;
        let table = LevelTable::from_json_str(raw).expect("table parses");
        let level = table.level(1).expect("level 1");
        assert_eq!(level.frightened_ms, 4_000);
        assert_eq!(level.waves.len(), 2);
        assert_eq!(level.waves.chase_ms(1), None);
    }

    #[test]
    fn empty_wave_schedule_is_rejected_at_load() {
        let raw = r#"[{ "multiplier": 1, "powerModeTime": 1, "pacmanSpeed": 1,
                        "ghostSpeed": 1, "wavesDurations": [] }]"#;
        assert!(matches!(
            LevelTable::from_json_str(raw),
            Err(ConfigError::EmptyWaveSchedule { level: 1 })
        ));
        assert!(matches!(
            LevelTable::from_json_str("[]"),
            Err(ConfigError::EmptyLevelTable)
        ));
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let mut level = LevelTable::default().level(1).expect("level 1").clone();
        level.ghost_speed = 0.0;
        assert!(matches!(
            LevelTable::new(vec![level]),
            Err(ConfigError::NonPositive {
                level: 1,
                field: "ghostSpeed"
            })
        ));
    }
}
