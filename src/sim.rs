use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use crate::config::{GameConfig, PlayerConfig};
use crate::control::Key;
use crate::error::ConfigError;
use crate::events::EventSink;
use crate::food::Food;
use crate::grid::{Direction, Grid, Position};
use crate::snake::{Rules, Snake, SnakeColor};

pub const MAX_PLAYERS: usize = 3;

/// Spawn cell, starting heading and color for each player slot.
fn slot(index: usize, grid: &Grid) -> (Position, Direction, SnakeColor) {
    let right = grid.columns() - 1;
    match index {
        0 => (
            Position::new(0, grid.top_margin()),
            Direction::Right,
            SnakeColor::Orange,
        ),
        1 => (
            Position::new(right, grid.top_margin()),
            Direction::Left,
            SnakeColor::Pink,
        ),
        _ => (
            Position::new(right, grid.rows() - 1),
            Direction::Left,
            SnakeColor::Magenta,
        ),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Winner {
    pub index: usize,
    pub name: String,
    pub score: u32,
}

/// One game: the arena, the food and up to three snakes, advanced one tick
/// at a time.
pub struct Simulation {
    grid: Grid,
    rules: Rules,
    food: Food,
    snakes: Vec<Snake>,
    rng: Box<dyn RngCore>,
    ticks: u64,
    winner: Option<Winner>,
}

impl Simulation {
    pub fn new(grid: Grid, config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(grid, config, Box::new(StdRng::from_entropy()))
    }

    pub fn with_rng(
        grid: Grid,
        config: &GameConfig,
        mut rng: Box<dyn RngCore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = Rules {
            winning_score: config.winning_score,
        };
        let snakes = config
            .players
            .iter()
            .enumerate()
            .map(|(index, player)| Self::spawn(index, player, &grid, config.difficulty))
            .collect::<Vec<_>>();
        let food = Food::spawn(&grid, config.harmful_food, rng.as_mut());

        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            players = snakes.len(),
            winning_score = rules.winning_score,
            harmful_food = config.harmful_food,
            "game started"
        );

        Ok(Self {
            grid,
            rules,
            food,
            snakes,
            rng,
            ticks: 0,
            winner: None,
        })
    }

    fn spawn(index: usize, player: &PlayerConfig, grid: &Grid, difficulty: u32) -> Snake {
        let (position, heading, color) = slot(index, grid);
        Snake::new(
            player.name.clone(),
            color,
            position,
            Some(heading),
            grid,
            player.control.strategy(difficulty),
        )
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    /// Replaces the food item. It keeps this game's harmful-food setting.
    pub fn place_food(&mut self, food: Food) {
        let harmful = self.food.harmful_enabled();
        self.food = food.with_harmful(harmful);
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake_mut(&mut self, index: usize) -> Option<&mut Snake> {
        self.snakes.get_mut(index)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Routes a key press to every keyboard-driven snake.
    pub fn handle_key(&mut self, key: Key) {
        for snake in &mut self.snakes {
            snake.control_mut().on_key(key);
        }
    }

    /// Queues a turn for `player`, applied at the start of its next update.
    pub fn request_turn(&mut self, player: usize, direction: Direction) {
        if let Some(snake) = self.snakes.get_mut(player) {
            snake.control_mut().request_turn(direction);
        }
    }

    /// Updates every snake in slot order, then the food. The first snake to
    /// reach the winning score ends the game; later snakes skip that tick.
    pub fn tick(&mut self, events: &mut dyn EventSink) {
        if self.is_over() {
            return;
        }

        for (index, snake) in self.snakes.iter_mut().enumerate() {
            let won = snake.update(
                &mut self.food,
                &self.grid,
                &self.rules,
                self.rng.as_mut(),
                events,
            );
            if won {
                self.winner = Some(Winner {
                    index,
                    name: snake.name().to_string(),
                    score: snake.score(),
                });
                break;
            }
        }

        self.food.update();
        self.ticks += 1;
    }
}
