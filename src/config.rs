use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, StudyError};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub learn: LearnConfig,
    #[serde(rename = "match")]
    pub matching: MatchConfig,
    pub blast: BlastConfig,
    pub blocks: BlocksConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LearnConfig {
    /// Delay before advancing after a correct or wrong pick.
    pub answer_delay_ms: u64,
    /// Delay before advancing after "don't know".
    pub reveal_delay_ms: u64,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            answer_delay_ms: 1200,
            reveal_delay_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchConfig {
    pub pairs: usize,
    pub wrong_cooldown_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pairs: 8,
            wrong_cooldown_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub level: u8,
    pub label: String,
    pub questions: usize,
    pub asteroid_count: usize,
    /// Base speed in px per 60 Hz frame.
    pub speed: f64,
    pub time_per_question_secs: u32,
}

impl LevelConfig {
    fn new(level: u8, label: &str, asteroid_count: usize, speed: f64, secs: u32) -> Self {
        Self {
            level,
            label: label.to_string(),
            questions: 5,
            asteroid_count,
            speed,
            time_per_question_secs: secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlastConfig {
    pub levels: Vec<LevelConfig>,
    pub points_correct: u32,
    /// Subtracted (floored at zero) on a wrong hit or a timeout.
    pub points_wrong: u32,
    pub fade_delay_ms: u64,
    pub advance_delay_ms: u64,
    pub wrong_flash_ms: u64,
    pub timeout_advance_ms: u64,
    /// Px per 60 Hz frame.
    pub bullet_speed: f64,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig::new(1, "Cadet", 4, 0.3, 15),
                LevelConfig::new(2, "Pilot", 5, 0.45, 12),
                LevelConfig::new(3, "Commander", 6, 0.6, 10),
            ],
            points_correct: 5,
            points_wrong: 2,
            fade_delay_ms: 300,
            advance_delay_ms: 600,
            wrong_flash_ms: 500,
            timeout_advance_ms: 400,
            bullet_speed: 8.0,
        }
    }
}

impl BlastConfig {
    pub fn total_questions(&self) -> usize {
        self.levels.iter().map(|l| l.questions).sum()
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(StudyError::InvalidConfig(msg.to_string()));
        if self.levels.is_empty() {
            return bad("blast.levels must not be empty");
        }
        for l in &self.levels {
            if l.questions == 0 {
                return bad("every blast level needs at least one question");
            }
            if l.asteroid_count < 2 {
                return bad("every blast level needs at least two asteroids");
            }
            if !(l.speed.is_finite() && l.speed >= 0.0) {
                return bad("blast level speed must be a non-negative number");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlocksConfig {
    pub base_pieces: usize,
    pub line_points: u32,
    pub first_try_bonus: u32,
    pub clear_delay_ms: u64,
}

impl BlocksConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_pieces == 0 {
            return Err(StudyError::InvalidConfig("blocks.basePieces must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            base_pieces: 3,
            line_points: 10,
            first_try_bonus: 5,
            clear_delay_ms: 400,
        }
    }
}

impl StudyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.matching.pairs == 0 {
            return Err(StudyError::InvalidConfig("match.pairs must be at least 1".to_string()));
        }
        self.blast.validate()?;
        self.blocks.validate()
    }
}

/// Load a config file; fields it leaves out keep their defaults.
pub fn load_config_from_json<P: AsRef<Path>>(path: P) -> Result<StudyConfig> {
    let data = fs::read_to_string(path.as_ref())?;
    let cfg: StudyConfig = serde_json::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
