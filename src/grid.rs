use std::ops::Range;

use crate::error::ConfigError;

/// A cell on the arena, in grid cells rather than terminal columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Direction of an orthogonally adjacent cell, `None` for anything else
    /// (including the same cell).
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        match (other.x - self.x, other.y - self.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Velocity in cells per tick. Screen coordinates: `y` grows downward.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    pub fn is_perpendicular(self, other: Direction) -> bool {
        self.is_vertical() != other.is_vertical()
    }
}

/// Playable bounds. The first `top_margin` rows are reserved for the
/// scoreboard and never hold an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: i32,
    rows: i32,
    top_margin: i32,
}

impl Grid {
    /// Food spawns at least this many rows below the margin.
    pub const FOOD_CLEARANCE: i32 = 2;

    pub fn new(columns: u16, rows: u16, top_margin: u16) -> Result<Self, ConfigError> {
        let (columns, rows, top_margin) = (columns as i32, rows as i32, top_margin as i32);
        if columns < 2 || rows < top_margin + Self::FOOD_CLEARANCE + 1 {
            return Err(ConfigError::GridTooSmall {
                columns,
                rows,
                top_margin,
            });
        }
        Ok(Self {
            columns,
            rows,
            top_margin,
        })
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn top_margin(&self) -> i32 {
        self.top_margin
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.columns).contains(&pos.x) && (self.top_margin..self.rows).contains(&pos.y)
    }

    /// True when a step from `pos` toward `direction` would leave the arena.
    pub fn blocks(&self, pos: Position, direction: Direction) -> bool {
        match direction {
            Direction::Left => pos.x <= 0,
            Direction::Right => pos.x >= self.columns - 1,
            Direction::Up => pos.y <= self.top_margin,
            Direction::Down => pos.y >= self.rows - 1,
        }
    }

    pub fn clamp(&self, pos: Position) -> Position {
        Position::new(
            pos.x.clamp(0, self.columns - 1),
            pos.y.clamp(self.top_margin, self.rows - 1),
        )
    }

    pub fn food_columns(&self) -> Range<i32> {
        0..self.columns
    }

    pub fn food_rows(&self) -> Range<i32> {
        self.top_margin + Self::FOOD_CLEARANCE..self.rows
    }
}
