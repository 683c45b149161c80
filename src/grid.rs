//! Weighted-grid shortest paths via Dijkstra's algorithm.
//!
//! Cells carry an entry weight; the cost of a path is the sum of the weights
//! of every cell stepped onto (the start cell is never paid for). The search
//! stops as soon as the goal is settled, since only one target is needed; a
//! full-convergence variant keeps going until the frontier is exhausted.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

/// Failure while parsing a digit-grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    /// A row whose length differs from the first row.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside `0-9`.
    InvalidDigit { row: usize, column: usize, found: char },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid input is empty"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells, expected {expected} like the first row"
            ),
            Self::InvalidDigit { row, column, found } => {
                write!(f, "invalid weight digit '{found}' at row {row}, column {column}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The cheapest path between two cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    /// Sum of entry weights along the path, excluding the start cell.
    pub total_cost: u32,
    /// Cells from start to goal inclusive.
    pub path: Vec<(usize, usize)>,
}

/// An immutable grid of per-cell entry weights.
#[derive(Debug, Clone)]
pub struct WeightGrid {
    weights: Vec<u32>,
    columns: usize,
    rows: usize,
}

impl WeightGrid {
    /// Parse newline-delimited digit rows, e.g. `"116\n138"`.
    pub fn parse(lines: &[&str]) -> Result<WeightGrid, ParseError> {
        if lines.is_empty() || lines[0].is_empty() {
            return Err(ParseError::Empty);
        }
        let columns = lines[0].chars().count();
        let mut weights = Vec::with_capacity(columns * lines.len());
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                return Err(ParseError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }
            for (column, c) in line.chars().enumerate() {
                let digit = c
                    .to_digit(10)
                    .ok_or(ParseError::InvalidDigit { row, column, found: c })?;
                weights.push(digit);
            }
        }
        Ok(WeightGrid {
            weights,
            columns,
            rows: lines.len(),
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn weight(&self, x: usize, y: usize) -> u32 {
        self.weights[self.index(x, y)]
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.columns + x
    }

    fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }

    /// Replicate the grid `x_mult` by `y_mult` times, adding one per tile
    /// step and wrapping weights above 9 back around to 1.
    pub fn tiled(&self, x_mult: usize, y_mult: usize) -> WeightGrid {
        let columns = self.columns * x_mult;
        let rows = self.rows * y_mult;
        let mut weights = Vec::with_capacity(columns * rows);
        for tile_y in 0..y_mult {
            for base_y in 0..self.rows {
                for tile_x in 0..x_mult {
                    for base_x in 0..self.columns {
                        let mut value = self.weight(base_x, base_y) + tile_x as u32 + tile_y as u32;
                        while value > 9 {
                            value -= 9;
                        }
                        weights.push(value);
                    }
                }
            }
        }
        WeightGrid {
            weights,
            columns,
            rows,
        }
    }

    fn orthogonal_neighbours(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (x, y) = self.coords(index);
        let up = (y > 0).then(|| self.index(x, y - 1));
        let down = (y + 1 < self.rows).then(|| self.index(x, y + 1));
        let left = (x > 0).then(|| self.index(x - 1, y));
        let right = (x + 1 < self.columns).then(|| self.index(x + 1, y));
        [up, down, left, right].into_iter().flatten()
    }

    /// Cheapest path from `start` to `goal`, or `None` when either cell is
    /// out of bounds (grids are fully connected, so in-bounds goals are
    /// always reachable).
    ///
    /// Ties in tentative distance break toward the lower cell index, so the
    /// result is deterministic.
    pub fn shortest_path(
        &self,
        start: (usize, usize),
        goal: (usize, usize),
    ) -> Option<PathResult> {
        if start.0 >= self.columns || start.1 >= self.rows {
            return None;
        }
        if goal.0 >= self.columns || goal.1 >= self.rows {
            return None;
        }
        let start_index = self.index(start.0, start.1);
        let goal_index = self.index(goal.0, goal.1);

        let (distances, previous) = self.run_dijkstra(start_index, Some(goal_index));
        if distances[goal_index] == u32::MAX {
            return None;
        }

        // Walk the back-pointers from the goal to the start.
        let mut path = vec![self.coords(goal_index)];
        let mut current = goal_index;
        while current != start_index {
            current = previous[current];
            path.push(self.coords(current));
        }
        path.reverse();

        Some(PathResult {
            total_cost: distances[goal_index],
            path,
        })
    }

    /// Best-known distance from `start` to every cell, running until the
    /// frontier is exhausted rather than stopping at a goal.
    pub fn distances_from(&self, start: (usize, usize)) -> Vec<Option<u32>> {
        let start_index = self.index(start.0, start.1);
        let (distances, _) = self.run_dijkstra(start_index, None);
        distances
            .into_iter()
            .map(|d| (d != u32::MAX).then_some(d))
            .collect()
    }

    fn run_dijkstra(&self, start: usize, goal: Option<usize>) -> (Vec<u32>, Vec<usize>) {
        let cells = self.weights.len();
        let mut distances = vec![u32::MAX; cells];
        let mut previous = vec![usize::MAX; cells];
        let mut visited = vec![false; cells];
        let mut frontier = BinaryHeap::new();

        distances[start] = 0;
        frontier.push(Reverse((0u32, start)));

        while let Some(Reverse((distance, current))) = frontier.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            if goal == Some(current) {
                break;
            }
            for neighbour in self.orthogonal_neighbours(current) {
                if visited[neighbour] {
                    continue;
                }
                let tentative = distance + self.weights[neighbour];
                if tentative < distances[neighbour] {
                    distances[neighbour] = tentative;
                    previous[neighbour] = current;
                    frontier.push(Reverse((tentative, neighbour)));
                }
            }
        }

        (distances, previous)
    }
}
