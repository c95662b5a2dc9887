use serde::{Deserialize, Serialize};
use snake_engine::PlayerIdentity;
use snake_engine::config::{Validate, check_range};
use snake_engine::game::{GameConfig, SnakeBotKind};
use snake_engine::score::DEFAULT_LEADERBOARD_SIZE;

pub const DEFAULT_CONFIG_PATH: &str = "snake_runner.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub player_id: String,
    pub display_name: String,
}

impl PlayerConfig {
    fn new(player_id: &str, display_name: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity::new(self.player_id.clone(), self.display_name.clone())
    }

    fn validate_named(&self, name: &str) -> Result<(), String> {
        if self.player_id.trim().is_empty() {
            return Err(format!("{}.player_id must not be empty", name));
        }
        if self.display_name.trim().is_empty() {
            return Err(format!("{}.display_name must not be empty", name));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub game: GameConfig,
    pub player: PlayerConfig,
    pub rival: PlayerConfig,
    pub bot: SnakeBotKind,
    pub games: u32,
    pub leaderboard_size: usize,
    pub challenge_ttl_hours: u32,
    pub entity_names: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            player: PlayerConfig::new("local", "Player"),
            rival: PlayerConfig::new("rival", "Rival"),
            bot: SnakeBotKind::Greedy,
            games: 3,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            challenge_ttl_hours: 24,
            entity_names: Vec::new(),
        }
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        self.player.validate_named("player")?;
        self.rival.validate_named("rival")?;
        if self.player.player_id == self.rival.player_id {
            return Err("player and rival must have different player_id".to_string());
        }
        check_range("games", self.games, 1, 1000)?;
        check_range("leaderboard_size", self.leaderboard_size, 1, 100)?;
        check_range("challenge_ttl_hours", self.challenge_ttl_hours, 1, 24 * 30)?;
        Ok(())
    }
}
