use std::collections::HashSet;

use super::types::{Cell, Direction};

/// Toroidal board: leaving one edge re-enters at the opposite one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Folds an out-of-range cell back onto the board.
    pub fn clamp(&self, cell: Cell) -> Cell {
        Cell::new(cell.x % self.width, cell.y % self.height)
    }

    pub fn wrap(&self, cell: Cell, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(
            wrap_axis(cell.x, dx, self.width),
            wrap_axis(cell.y, dy, self.height),
        )
    }

    /// True when the cells touch orthogonally, counting wrap-around.
    pub fn are_adjacent(&self, a: Cell, b: Cell) -> bool {
        Direction::ALL.iter().any(|&d| self.wrap(a, d) == b)
    }

    /// Manhattan distance on the torus.
    pub fn distance(&self, a: Cell, b: Cell) -> usize {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        dx.min(self.width - dx) + dy.min(self.height - dy)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

fn wrap_axis(value: usize, delta: i64, size: usize) -> usize {
    let size = size as i64;
    ((value as i64 + delta).rem_euclid(size)) as usize
}

pub fn is_occupied(cell: Cell, occupied: &HashSet<Cell>) -> bool {
    occupied.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_right_edge_reenters_at_zero() {
        let grid = Grid::square(12);
        assert_eq!(grid.wrap(Cell::new(11, 4), Direction::Right), Cell::new(0, 4));
    }

    #[test]
    fn test_wrap_all_edges() {
        let grid = Grid::square(12);
        assert_eq!(grid.wrap(Cell::new(0, 4), Direction::Left), Cell::new(11, 4));
        assert_eq!(grid.wrap(Cell::new(3, 0), Direction::Up), Cell::new(3, 11));
        assert_eq!(grid.wrap(Cell::new(3, 11), Direction::Down), Cell::new(3, 0));
    }

    #[test]
    fn test_wrap_stays_in_range_everywhere() {
        let grid = Grid::new(7, 5);
        for cell in grid.cells() {
            for direction in Direction::ALL {
                assert!(grid.contains(grid.wrap(cell, direction)));
            }
        }
    }

    #[test]
    fn test_adjacency_across_edge() {
        let grid = Grid::square(12);
        assert!(grid.are_adjacent(Cell::new(0, 6), Cell::new(11, 6)));
        assert!(!grid.are_adjacent(Cell::new(0, 6), Cell::new(10, 6)));
    }

    #[test]
    fn test_distance_uses_shorter_way_round() {
        let grid = Grid::square(12);
        assert_eq!(grid.distance(Cell::new(0, 0), Cell::new(11, 11)), 2);
        assert_eq!(grid.distance(Cell::new(2, 3), Cell::new(5, 3)), 3);
    }

    #[test]
    fn test_clamp_and_occupied() {
        let grid = Grid::square(12);
        assert_eq!(grid.clamp(Cell::new(13, 25)), Cell::new(1, 1));
        let occupied: HashSet<Cell> = [Cell::new(1, 1)].into_iter().collect();
        assert!(is_occupied(Cell::new(1, 1), &occupied));
        assert!(!is_occupied(Cell::new(1, 2), &occupied));
    }
}
