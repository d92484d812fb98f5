use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use serde::{Deserialize, Serialize};

use crate::entities::{ENEMY_HEIGHT, ENEMY_WIDTH, FormationLayout, PLAYER_HEIGHT, PLAYER_WIDTH};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "INVADERS_CONFIG";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "invaders.json";

/// What happens when the last enemy of a formation is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
    /// Spawn a bigger, faster formation and keep playing
    NextLevel,
    /// Clearing the board wins the game
    EndGame,
}

/// Tunables for one game. Every field has a default so a config file only
/// needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield_width: i32,
    pub playfield_height: i32,
    pub initial_lives: u32,

    pub base_rows: u32,
    pub max_rows: u32,
    pub cols: u32,
    /// Formation speed on level 1
    pub enemy_speed: i32,
    /// Extra formation speed gained per level
    pub enemy_speed_per_level: i32,

    pub player_bullet_speed: i32,
    pub enemy_bullet_speed: i32,
    /// Probability that an enemy fires on each enemy-bullet tick
    pub enemy_fire_chance: f64,

    pub enemy_step_ms: u64,
    pub player_bullet_step_ms: u64,
    pub enemy_bullet_step_ms: u64,
    /// Minimum time between two player shots, `None` disables the limit
    pub fire_cooldown_ms: Option<u64>,

    pub clear_policy: ClearPolicy,
    /// Messages flashed when an enemy is destroyed
    pub flavor_messages: Vec<String>,
    pub flavor_duration_ms: u64,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    pub enemy_sprite: Option<PathBuf>,
    pub sound_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: 640,
            playfield_height: 400,
            initial_lives: 3,
            base_rows: 2,
            max_rows: 5,
            cols: 6,
            enemy_speed: 2,
            enemy_speed_per_level: 1,
            player_bullet_speed: 4,
            enemy_bullet_speed: 10,
            enemy_fire_chance: 0.05,
            enemy_step_ms: 500,
            player_bullet_step_ms: 50,
            enemy_bullet_step_ms: 200,
            fire_cooldown_ms: Some(300),
            clear_policy: ClearPolicy::NextLevel,
            flavor_messages: [
                "Direct hit!",
                "Nice shot!",
                "Invader down!",
                "Keep it up!",
                "Boom!",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            flavor_duration_ms: 1000,
            seed: None,
            enemy_sprite: None,
            sound_dir: None,
        }
    }
}

impl GameConfig {
    /// Loads the file named by `INVADERS_CONFIG`, or `invaders.json` if it
    /// exists, falling back to defaults when neither is present.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but cannot make a playable game
    pub fn validate(&self) -> Result<()> {
        if self.initial_lives == 0 {
            bail!("initial_lives must be at least 1");
        }
        if self.base_rows == 0 || self.cols == 0 {
            bail!("formation needs at least one row and one column");
        }
        if self.max_rows < self.base_rows {
            bail!(
                "max_rows ({}) is below base_rows ({})",
                self.max_rows,
                self.base_rows
            );
        }
        if self.playfield_width < PLAYER_WIDTH.max(ENEMY_WIDTH)
            || self.playfield_height < PLAYER_HEIGHT.max(ENEMY_HEIGHT)
        {
            bail!(
                "playfield {}x{} is smaller than a ship",
                self.playfield_width,
                self.playfield_height
            );
        }
        if self.enemy_speed <= 0 || self.player_bullet_speed <= 0 || self.enemy_bullet_speed <= 0 {
            bail!("enemy_speed, player_bullet_speed and enemy_bullet_speed must be positive");
        }
        if self.enemy_speed_per_level < 0 {
            bail!("enemy_speed_per_level must not be negative");
        }
        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            bail!("enemy_fire_chance {} is not a probability", self.enemy_fire_chance);
        }
        Ok(())
    }

    pub fn layout_for_level(&self, level: u32) -> FormationLayout {
        FormationLayout::for_level(level, self.base_rows, self.max_rows, self.cols)
    }

    pub fn enemy_speed_for_level(&self, level: u32) -> i32 {
        self.enemy_speed + self.enemy_speed_per_level * level.saturating_sub(1) as i32
    }

    pub fn enemy_step(&self) -> Duration {
        Duration::from_millis(self.enemy_step_ms)
    }

    pub fn player_bullet_step(&self) -> Duration {
        Duration::from_millis(self.player_bullet_step_ms)
    }

    pub fn enemy_bullet_step(&self) -> Duration {
        Duration::from_millis(self.enemy_bullet_step_ms)
    }

    pub fn fire_cooldown(&self) -> Option<Duration> {
        self.fire_cooldown_ms.map(Duration::from_millis)
    }

    pub fn flavor_duration(&self) -> Duration {
        Duration::from_millis(self.flavor_duration_ms)
    }
}
