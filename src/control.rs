//! The three ways a snake gets steered: two keyboard layouts and the
//! food-seeking computer player.

use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::food::Food;
use crate::grid::{Direction, Grid};
use crate::snake::SnakeView;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum ControlScheme {
    /// Arrow keys.
    #[serde(rename = "direct-set-A")]
    #[value(name = "direct-set-A")]
    DirectSetA,
    /// W, A, S, D.
    #[serde(rename = "direct-set-B")]
    #[value(name = "direct-set-B")]
    DirectSetB,
    #[serde(rename = "autonomous")]
    #[value(name = "autonomous")]
    Autonomous,
}

impl ControlScheme {
    pub fn label(self) -> &'static str {
        match self {
            ControlScheme::DirectSetA => "arrow keys",
            ControlScheme::DirectSetB => "W A S D",
            ControlScheme::Autonomous => "computer",
        }
    }

    pub fn strategy(self, difficulty: u32) -> Box<dyn ControlStrategy> {
        match self {
            ControlScheme::DirectSetA => Box::new(DirectInput::new(KeySet::Arrows)),
            ControlScheme::DirectSetB => Box::new(DirectInput::new(KeySet::Wasd)),
            ControlScheme::Autonomous => Box::new(Pursuit::new(difficulty)),
        }
    }
}

impl fmt::Display for ControlScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlScheme::DirectSetA => "direct-set-A",
            ControlScheme::DirectSetB => "direct-set-B",
            ControlScheme::Autonomous => "autonomous",
        };
        f.write_str(name)
    }
}

/// A key press, independent of the terminal library that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySet {
    Arrows,
    Wasd,
}

impl KeySet {
    pub fn resolve(self, key: Key) -> Option<Direction> {
        match (self, key) {
            (KeySet::Arrows, Key::Up) => Some(Direction::Up),
            (KeySet::Arrows, Key::Down) => Some(Direction::Down),
            (KeySet::Arrows, Key::Left) => Some(Direction::Left),
            (KeySet::Arrows, Key::Right) => Some(Direction::Right),
            (KeySet::Wasd, Key::Char(c)) => match c.to_ascii_lowercase() {
                'w' => Some(Direction::Up),
                's' => Some(Direction::Down),
                'a' => Some(Direction::Left),
                'd' => Some(Direction::Right),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Decides, once per tick, whether a snake should turn.
pub trait ControlStrategy: fmt::Debug {
    fn scheme(&self) -> ControlScheme;

    fn decide_turn(
        &mut self,
        snake: &SnakeView,
        food: &Food,
        grid: &Grid,
        rng: &mut dyn RngCore,
    ) -> Option<Direction>;

    /// Offers a key press; strategies that don't listen to the keyboard
    /// ignore it.
    fn on_key(&mut self, _key: Key) {}

    /// Queues a turn for the next tick, replacing any earlier request.
    fn request_turn(&mut self, _direction: Direction) {}
}

/// Keyboard-driven control. Requests between ticks overwrite each other;
/// only the latest reaches the snake.
#[derive(Debug)]
pub struct DirectInput {
    keys: KeySet,
    pending: Option<Direction>,
}

impl DirectInput {
    pub fn new(keys: KeySet) -> Self {
        Self {
            keys,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }
}

impl ControlStrategy for DirectInput {
    fn scheme(&self) -> ControlScheme {
        match self.keys {
            KeySet::Arrows => ControlScheme::DirectSetA,
            KeySet::Wasd => ControlScheme::DirectSetB,
        }
    }

    fn decide_turn(
        &mut self,
        _snake: &SnakeView,
        _food: &Food,
        _grid: &Grid,
        _rng: &mut dyn RngCore,
    ) -> Option<Direction> {
        self.pending.take()
    }

    fn on_key(&mut self, key: Key) {
        if let Some(direction) = self.keys.resolve(key) {
            self.pending = Some(direction);
        }
    }

    fn request_turn(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }
}

/// Greedy food seeker with random exploration.
///
/// Turns straight at the food as soon as it lines up with it across the
/// direction of travel. Otherwise it re-decides every `turn_interval` ticks,
/// where the interval is re-rolled from `0..difficulty` after each decision.
#[derive(Debug)]
pub struct Pursuit {
    difficulty: u32,
    turn_timer: u32,
    turn_interval: u32,
}

impl Pursuit {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty: difficulty.max(1),
            turn_timer: 0,
            turn_interval: 0,
        }
    }

    pub fn turn_interval(&self) -> u32 {
        self.turn_interval
    }

    /// The perpendicular turn that points at the food when the snake shares
    /// its column (or row) and the food is not already behind it on that axis.
    fn toward_food(snake: &SnakeView, food: &Food) -> Option<Direction> {
        let head = snake.position;
        let target = food.position();
        let moving_vertically = snake.heading.is_some_and(Direction::is_vertical);
        let moving_horizontally = snake.heading.is_some_and(Direction::is_horizontal);

        if head.x == target.x && head.y != target.y && !moving_vertically {
            return Some(if target.y < head.y {
                Direction::Up
            } else {
                Direction::Down
            });
        }
        if head.y == target.y && head.x != target.x && !moving_horizontally {
            return Some(if target.x < head.x {
                Direction::Left
            } else {
                Direction::Right
            });
        }
        None
    }

    fn preferred(snake: &SnakeView, food: &Food, grid: &Grid) -> Option<Direction> {
        Self::toward_food(snake, food).filter(|&direction| snake.can_turn(direction, grid))
    }
}

impl ControlStrategy for Pursuit {
    fn scheme(&self) -> ControlScheme {
        ControlScheme::Autonomous
    }

    fn decide_turn(
        &mut self,
        snake: &SnakeView,
        food: &Food,
        grid: &Grid,
        rng: &mut dyn RngCore,
    ) -> Option<Direction> {
        if let Some(direction) = Self::preferred(snake, food, grid) {
            trace!(?direction, "pursuit lined up with food");
            self.turn_timer = 0;
            return Some(direction);
        }

        if self.turn_timer < self.turn_interval {
            self.turn_timer += 1;
            return None;
        }

        self.turn_timer = 0;
        self.turn_interval = rng.gen_range(0..self.difficulty);

        let legal = snake.legal_turns(grid);
        let choice = legal.choose(rng).copied();
        trace!(?choice, options = legal.len(), "pursuit wandering");
        choice
    }
}
