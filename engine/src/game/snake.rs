use std::collections::{HashSet, VecDeque};

use super::grid::Grid;
use super::types::{Cell, Direction};

/// Head-first segment list. Length stays at least two during play.
#[derive(Clone, Debug)]
pub struct SnakeBody {
    body: VecDeque<Cell>,
    body_set: HashSet<Cell>,
}

impl SnakeBody {
    pub fn new(cells: &[Cell]) -> Result<Self, String> {
        if cells.len() < 2 {
            return Err(format!("Snake needs at least 2 segments, got {}", cells.len()));
        }
        let body: VecDeque<Cell> = cells.iter().copied().collect();
        let body_set: HashSet<Cell> = body.iter().copied().collect();
        if body_set.len() != body.len() {
            return Err("Snake segments must not overlap".to_string());
        }
        Ok(Self { body, body_set })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body_set.contains(&cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }

    pub fn next_head(&self, grid: &Grid, direction: Direction) -> Cell {
        grid.wrap(self.head(), direction)
    }

    /// Compared against the body before it moves, tail included.
    pub fn will_self_collide(&self, next_head: Cell) -> bool {
        self.contains(next_head)
    }

    pub fn advance(&mut self, next_head: Cell, grow: bool) {
        self.body.push_front(next_head);
        self.body_set.insert(next_head);

        if !grow && let Some(tail) = self.body.pop_back() {
            self.body_set.remove(&tail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(cells: &[(usize, usize)]) -> SnakeBody {
        let cells: Vec<Cell> = cells.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        SnakeBody::new(&cells).unwrap()
    }

    #[test]
    fn test_next_head_wraps() {
        let snake = body(&[(11, 3), (10, 3)]);
        assert_eq!(snake.next_head(&Grid::square(12), Direction::Right), Cell::new(0, 3));
    }

    #[test]
    fn test_advance_without_growth_keeps_length() {
        let mut snake = body(&[(6, 6), (5, 6)]);
        snake.advance(Cell::new(7, 6), false);
        assert_eq!(snake.to_vec(), vec![Cell::new(7, 6), Cell::new(6, 6)]);
        assert!(!snake.contains(Cell::new(5, 6)));
    }

    #[test]
    fn test_advance_with_growth_keeps_tail() {
        let mut snake = body(&[(6, 6), (5, 6)]);
        snake.advance(Cell::new(7, 6), true);
        assert_eq!(
            snake.to_vec(),
            vec![Cell::new(7, 6), Cell::new(6, 6), Cell::new(5, 6)]
        );
    }

    #[test]
    fn test_self_collision_against_third_segment() {
        let snake = body(&[(2, 2), (3, 2), (3, 3)]);
        assert!(snake.will_self_collide(Cell::new(3, 3)));
        assert!(!snake.will_self_collide(Cell::new(1, 2)));
    }

    #[test]
    fn test_rejects_short_or_overlapping_body() {
        assert!(SnakeBody::new(&[Cell::new(1, 1)]).is_err());
        assert!(SnakeBody::new(&[Cell::new(1, 1), Cell::new(1, 1)]).is_err());
    }

    #[test]
    fn test_tail_counts_as_collision() {
        let snake = body(&[(4, 5), (4, 6), (5, 6), (5, 5)]);
        assert!(snake.will_self_collide(Cell::new(5, 5)));
    }
}
