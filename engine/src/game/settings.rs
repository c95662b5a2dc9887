use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{Validate, check_range};
use super::grid::Grid;
use super::types::{Cell, Direction};

pub const DEFAULT_GRID_SIZE: u32 = 12;
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 250;
pub const DEFAULT_REWARD_PER_CONSUMPTION: u32 = 2;
pub const DEFAULT_HYDRATION_LIMIT: u32 = 2;
pub const DEFAULT_RELIEF_LIMIT: u32 = 5;

/// Room kept free beyond the snake and entities: two stations and a move.
const RESERVED_CELLS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellConfig {
    pub x: u32,
    pub y: u32,
}

impl From<CellConfig> for Cell {
    fn from(cell: CellConfig) -> Self {
        Cell::new(cell.x as usize, cell.y as usize)
    }
}

/// Serialized game tuning. Defaults reproduce the reference game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: u32,
    pub tick_interval_ms: u32,
    pub reward_per_consumption: u32,
    pub hydration_limit: u32,
    pub relief_limit: u32,
    pub entity_count: u32,
    pub shuffle_entities: bool,
    pub initial_snake: Vec<CellConfig>,
    pub initial_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            reward_per_consumption: DEFAULT_REWARD_PER_CONSUMPTION,
            hydration_limit: DEFAULT_HYDRATION_LIMIT,
            relief_limit: DEFAULT_RELIEF_LIMIT,
            entity_count: 1,
            shuffle_entities: true,
            initial_snake: vec![CellConfig { x: 6, y: 6 }, CellConfig { x: 5, y: 6 }],
            initial_direction: Direction::Right,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        check_range("grid_size", self.grid_size, 5, 50)?;
        check_range("tick_interval_ms", self.tick_interval_ms, 50, 5000)?;
        if self.reward_per_consumption == 0 {
            return Err("reward_per_consumption must be at least 1".to_string());
        }
        if self.hydration_limit == 0 || self.relief_limit == 0 {
            return Err("hydration_limit and relief_limit must be at least 1".to_string());
        }

        let grid = Grid::square(self.grid_size as usize);
        let snake: Vec<Cell> = self.initial_snake.iter().copied().map(Cell::from).collect();
        validate_initial_snake(&grid, &snake, self.initial_direction)?;

        if self.entity_count == 0 {
            return Err("entity_count must be at least 1".to_string());
        }
        if snake.len() + self.entity_count as usize + RESERVED_CELLS > grid.cell_count() {
            return Err(format!(
                "entity_count {} leaves no free cells on a {}x{} board",
                self.entity_count, self.grid_size, self.grid_size
            ));
        }
        Ok(())
    }
}

pub fn validate_initial_snake(grid: &Grid, snake: &[Cell], direction: Direction) -> Result<(), String> {
    if snake.len() < 2 {
        return Err("initial_snake must have at least 2 segments".to_string());
    }
    if let Some(cell) = snake.iter().find(|c| !grid.contains(**c)) {
        return Err(format!("initial_snake cell {} is outside the board", cell));
    }
    let unique: HashSet<Cell> = snake.iter().copied().collect();
    if unique.len() != snake.len() {
        return Err("initial_snake cells must be distinct".to_string());
    }
    if let Some(pair) = snake.windows(2).find(|w| !grid.are_adjacent(w[0], w[1])) {
        return Err(format!(
            "initial_snake segments {} and {} are not adjacent",
            pair[0], pair[1]
        ));
    }
    if grid.wrap(snake[0], direction) == snake[1] {
        return Err("initial_direction points back into the snake".to_string());
    }
    Ok(())
}

/// Runtime form of [`GameConfig`].
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub grid: Grid,
    pub tick_interval: Duration,
    pub reward_per_consumption: u32,
    pub hydration_limit: u32,
    pub relief_limit: u32,
    pub entity_count: usize,
    pub shuffle_entities: bool,
    pub initial_snake: Vec<Cell>,
    pub initial_direction: Direction,
}

impl From<&GameConfig> for GameSettings {
    fn from(config: &GameConfig) -> Self {
        let grid = Grid::square(config.grid_size.max(1) as usize);
        Self {
            grid,
            tick_interval: Duration::from_millis(config.tick_interval_ms as u64),
            reward_per_consumption: config.reward_per_consumption,
            hydration_limit: config.hydration_limit.max(1),
            relief_limit: config.relief_limit.max(1),
            entity_count: config.entity_count.max(1) as usize,
            shuffle_entities: config.shuffle_entities,
            initial_snake: config
                .initial_snake
                .iter()
                .map(|c| grid.clamp(Cell::from(*c)))
                .collect(),
            initial_direction: config.initial_direction,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSerializer, YamlConfigSerializer};

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_config_survives_yaml() {
        let serializer = YamlConfigSerializer;
        let text = serializer.serialize(&GameConfig::default()).unwrap();
        let parsed: GameConfig = serializer.deserialize(&text).unwrap();
        assert_eq!(parsed, GameConfig::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let parsed: GameConfig = YamlConfigSerializer
            .deserialize("reward_per_consumption: 1\ninitial_direction: down\n")
            .unwrap();
        assert_eq!(parsed.reward_per_consumption, 1);
        assert_eq!(parsed.initial_direction, Direction::Down);
        assert_eq!(parsed.grid_size, DEFAULT_GRID_SIZE);
    }

    #[test]
    fn test_single_segment_snake_rejected() {
        let config = GameConfig {
            initial_snake: vec![CellConfig { x: 1, y: 1 }],
            ..GameConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("at least 2"));
    }

    #[test]
    fn test_direction_into_body_rejected() {
        let config = GameConfig {
            initial_direction: Direction::Left,
            ..GameConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("points back"));
    }

    #[test]
    fn test_gap_in_snake_rejected() {
        let config = GameConfig {
            initial_snake: vec![CellConfig { x: 6, y: 6 }, CellConfig { x: 4, y: 6 }],
            ..GameConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("not adjacent"));
    }

    #[test]
    fn test_snake_may_straddle_edge() {
        let config = GameConfig {
            initial_snake: vec![CellConfig { x: 0, y: 3 }, CellConfig { x: 11, y: 3 }],
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_too_many_entities_rejected() {
        let config = GameConfig {
            grid_size: 5,
            entity_count: 21,
            ..GameConfig {
                initial_snake: vec![CellConfig { x: 2, y: 2 }, CellConfig { x: 1, y: 2 }],
                ..GameConfig::default()
            }
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let settings = GameSettings::from(&GameConfig::default());
        assert_eq!(settings.grid, Grid::square(12));
        assert_eq!(settings.tick_interval, Duration::from_millis(250));
        assert_eq!(settings.initial_snake, vec![Cell::new(6, 6), Cell::new(5, 6)]);
    }
}
