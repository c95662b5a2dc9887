use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SessionRng;
use super::game_state::SnakeGame;
use super::types::{Cell, Direction, StationKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnakeBotKind {
    Greedy,
    Random,
}

impl FromStr for SnakeBotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(SnakeBotKind::Greedy),
            "random" => Ok(SnakeBotKind::Random),
            other => Err(format!("Unknown bot kind: {}", other)),
        }
    }
}

/// Autopilot used wherever no human supplies direction intents.
pub struct BotController;

impl BotController {
    pub fn calculate_move(kind: SnakeBotKind, game: &SnakeGame, rng: &mut SessionRng) -> Option<Direction> {
        if !game.is_running() {
            return None;
        }
        match kind {
            SnakeBotKind::Greedy => Self::greedy(game, rng),
            SnakeBotKind::Random => Self::random_safe_move(game, rng),
        }
    }

    fn greedy(game: &SnakeGame, rng: &mut SessionRng) -> Option<Direction> {
        let Some(target) = Self::pick_target(game) else {
            return Self::random_safe_move(game, rng);
        };

        let grid = game.grid();
        let head = game.snake().head();
        Self::safe_directions(game)
            .into_iter()
            .min_by_key(|&dir| grid.distance(grid.wrap(head, dir), target))
            .or(Some(game.direction()))
    }

    fn pick_target(game: &SnakeGame) -> Option<Cell> {
        let constraints = game.constraints();
        for kind in [StationKind::Hydration, StationKind::Relief] {
            if constraints.is_due(kind) {
                // Overdue with no station in sight: wander, never eat.
                return game.station(kind);
            }
        }

        let grid = game.grid();
        let head = game.snake().head();
        game.entities()
            .iter()
            .map(|e| e.cell)
            .min_by_key(|&cell| grid.distance(head, cell))
    }

    fn random_safe_move(game: &SnakeGame, rng: &mut SessionRng) -> Option<Direction> {
        let safe = Self::safe_directions(game);
        if safe.is_empty() {
            return Some(game.direction());
        }
        Some(safe[rng.random_range(0..safe.len())])
    }

    fn safe_directions(game: &SnakeGame) -> Vec<Direction> {
        let grid = game.grid();
        let head = game.snake().head();
        let current = game.direction();
        let eating_is_fatal = game.constraints().is_forced_death();

        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(&current))
            .filter(|&d| {
                let next = grid.wrap(head, d);
                if game.snake().contains(next) {
                    return false;
                }
                !(eating_is_fatal && game.entities().iter().any(|e| e.cell == next))
            })
            .collect()
    }
}
