use std::collections::HashSet;

use crate::SessionRng;
use super::grid::Grid;
use super::types::Cell;

const RANDOM_ATTEMPTS: usize = 100;

/// Picks uniformly random free cells for entities and stations.
#[derive(Clone, Copy, Debug)]
pub struct EntitySpawner {
    grid: Grid,
}

impl EntitySpawner {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Returns `None` only when every cell is occupied.
    pub fn spawn(&self, occupied: &HashSet<Cell>, rng: &mut SessionRng) -> Option<Cell> {
        if occupied.len() < self.grid.cell_count() {
            for _ in 0..RANDOM_ATTEMPTS {
                let cell = Cell::new(
                    rng.random_range(0..self.grid.width),
                    rng.random_range(0..self.grid.height),
                );
                if !occupied.contains(&cell) {
                    return Some(cell);
                }
            }
        }

        // Crowded board: pick among what is left.
        let free: Vec<Cell> = self.grid.cells().filter(|c| !occupied.contains(c)).collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.random_range(0..free.len())])
    }

    /// Spawns up to `count` cells that avoid `occupied` and each other.
    pub fn spawn_many(&self, count: usize, occupied: &HashSet<Cell>, rng: &mut SessionRng) -> Vec<Cell> {
        let mut excluded = occupied.clone();
        let mut cells = Vec::with_capacity(count);
        for _ in 0..count {
            match self.spawn(&excluded, rng) {
                Some(cell) => {
                    excluded.insert(cell);
                    cells.push(cell);
                }
                None => break,
            }
        }
        cells
    }
}
