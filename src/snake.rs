use std::collections::VecDeque;

use rand::RngCore;
use tracing::{debug, info, trace};

use crate::control::ControlStrategy;
use crate::events::{EventSink, GameEvent};
use crate::food::{Food, FoodKind};
use crate::grid::{Direction, Grid, Position};
use crate::segment::{classify_body, SegmentShape};

pub const INITIAL_LENGTH: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnakeColor {
    Orange,
    Pink,
    Magenta,
}

/// Read-only snapshot handed to control strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnakeView {
    pub position: Position,
    pub heading: Option<Direction>,
    pub moving: bool,
}

impl SnakeView {
    /// Whether `direction` is perpendicular to the current heading (any
    /// direction when standing still) and keeps the head on the grid.
    /// Ignores the per-tick turn gate.
    pub fn can_turn(&self, direction: Direction, grid: &Grid) -> bool {
        let perpendicular = self
            .heading
            .map_or(true, |heading| heading.is_perpendicular(direction));
        perpendicular && !grid.blocks(self.position, direction)
    }

    pub fn legal_turns(&self, grid: &Grid) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.can_turn(direction, grid))
            .collect()
    }
}

/// Rules shared by every snake in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub winning_score: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self { winning_score: 10 }
    }
}

#[derive(Debug)]
pub struct Snake {
    name: String,
    color: SnakeColor,
    position: Position,
    heading: Option<Direction>,
    segments: VecDeque<Position>,
    length: usize,
    score: u32,
    moving: bool,
    ready_to_turn: bool,
    control: Box<dyn ControlStrategy>,
}

impl Snake {
    /// Builds a snake whose head sits on `spawn`. The body is the trail it
    /// would have left reaching `spawn` along `heading`; trail cells outside
    /// the arena collapse onto the nearest edge cell.
    pub fn new(
        name: impl Into<String>,
        color: SnakeColor,
        spawn: Position,
        heading: Option<Direction>,
        grid: &Grid,
        control: Box<dyn ControlStrategy>,
    ) -> Self {
        let position = grid.clamp(spawn);
        let behind = heading.map(Direction::opposite);
        let mut segments = VecDeque::with_capacity(INITIAL_LENGTH + 1);
        let mut cell = position;
        for _ in 0..INITIAL_LENGTH {
            segments.push_back(cell);
            if let Some(behind) = behind {
                cell = grid.clamp(cell.step(behind));
            }
        }

        Self {
            name: name.into(),
            color,
            position,
            heading,
            segments,
            length: INITIAL_LENGTH,
            score: 0,
            moving: true,
            ready_to_turn: true,
            control,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> SnakeColor {
        self.color
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Head first.
    pub fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_ready_to_turn(&self) -> bool {
        self.ready_to_turn
    }

    pub fn control(&self) -> &dyn ControlStrategy {
        self.control.as_ref()
    }

    pub fn control_mut(&mut self) -> &mut dyn ControlStrategy {
        self.control.as_mut()
    }

    pub fn view(&self) -> SnakeView {
        SnakeView {
            position: self.position,
            heading: self.heading,
            moving: self.moving,
        }
    }

    pub fn segment_shapes(&self) -> Vec<(Position, SegmentShape)> {
        classify_body(&self.segments)
    }

    /// Applies a turn if it is perpendicular to the current heading, stays on
    /// the grid, and no other turn went through since the last tick started.
    /// Returns whether the turn was taken.
    pub fn turn(&mut self, direction: Direction, grid: &Grid) -> bool {
        if !self.ready_to_turn || !self.view().can_turn(direction, grid) {
            return false;
        }
        trace!(snake = %self.name, ?direction, "turn");
        self.heading = Some(direction);
        self.moving = true;
        self.ready_to_turn = false;
        true
    }

    pub fn turn_up(&mut self, grid: &Grid) -> bool {
        self.turn(Direction::Up, grid)
    }

    pub fn turn_down(&mut self, grid: &Grid) -> bool {
        self.turn(Direction::Down, grid)
    }

    pub fn turn_left(&mut self, grid: &Grid) -> bool {
        self.turn(Direction::Left, grid)
    }

    pub fn turn_right(&mut self, grid: &Grid) -> bool {
        self.turn(Direction::Right, grid)
    }

    /// Advances the snake by one tick. Returns `true` when this snake has
    /// reached the winning score; the game-won event has been emitted by then.
    pub fn update(
        &mut self,
        food: &mut Food,
        grid: &Grid,
        rules: &Rules,
        rng: &mut dyn RngCore,
        events: &mut dyn EventSink,
    ) -> bool {
        self.ready_to_turn = true;

        let view = self.view();
        if let Some(direction) = self.control.decide_turn(&view, food, grid, rng) {
            self.turn(direction, grid);
        }

        if self.position == food.position() {
            self.eat(food, grid, rng, events);
        }

        if let Some(heading) = self.heading {
            if grid.blocks(self.position, heading) {
                if self.moving {
                    debug!(snake = %self.name, ?heading, "halted at wall");
                }
                self.moving = false;
            }
        }

        if self.moving {
            if let Some(heading) = self.heading {
                self.position = self.position.step(heading);
            }
            self.segments.push_front(self.position);
            if self.segments.len() > self.length {
                self.segments.pop_back();
            }
        }

        if self.score >= rules.winning_score {
            info!(snake = %self.name, score = self.score, "game won");
            events.emit(GameEvent::GameWon {
                winner: self.name.clone(),
                score: self.score,
            });
            return true;
        }
        false
    }

    fn eat(
        &mut self,
        food: &mut Food,
        grid: &Grid,
        rng: &mut dyn RngCore,
        events: &mut dyn EventSink,
    ) {
        let position = food.position();
        match food.kind() {
            FoodKind::Beneficial => {
                self.score += 1;
                self.length += 1;
                debug!(snake = %self.name, score = self.score, length = self.length, "ate food");
                food.reset(grid, rng);
                events.emit(GameEvent::BeneficialEat { position });
            }
            FoodKind::Harmful => {
                self.score = self.score.saturating_sub(1);
                if self.length > INITIAL_LENGTH {
                    self.length -= 1;
                }
                // A halted snake may not have grown into its length yet.
                if self.segments.len() > self.length {
                    self.segments.pop_back();
                }
                debug!(snake = %self.name, score = self.score, length = self.length, "ate harmful food");
                food.reset(grid, rng);
                events.emit(GameEvent::HarmfulEat { position });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::control::{DirectInput, KeySet};
    use crate::food::FoodVariant;

    fn grid() -> Grid {
        Grid::new(10, 10, 2).unwrap()
    }

    fn snake_at(x: i32, y: i32, heading: Option<Direction>) -> Snake {
        Snake::new(
            "tester",
            SnakeColor::Orange,
            Position::new(x, y),
            heading,
            &grid(),
            Box::new(DirectInput::new(KeySet::Arrows)),
        )
    }

    fn far_food() -> Food {
        Food::at(Position::new(9, 9), FoodVariant::Mushroom)
    }

    fn tick(snake: &mut Snake, food: &mut Food) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = Vec::new();
        let mut rng = StepRng::new(0, 0);
        snake.update(food, &grid(), &Rules::default(), &mut rng, &mut events);
        events
    }

    fn cells(snake: &Snake) -> Vec<Position> {
        snake.segments().iter().copied().collect()
    }

    #[test]
    fn first_tick_from_corner_spawn() {
        let mut snake = snake_at(0, 2, Some(Direction::Right));
        assert_eq!(snake.position(), Position::new(0, 2));
        tick(&mut snake, &mut far_food());
        assert_eq!(snake.position(), Position::new(1, 2));
        assert_eq!(cells(&snake), vec![Position::new(1, 2), Position::new(0, 2)]);
    }

    #[test]
    fn spawn_trail_follows_heading() {
        let snake = snake_at(5, 5, Some(Direction::Down));
        assert_eq!(cells(&snake), vec![Position::new(5, 5), Position::new(5, 4)]);
        let still = snake_at(5, 5, None);
        assert_eq!(cells(&still), vec![Position::new(5, 5), Position::new(5, 5)]);
    }

    #[test]
    fn halts_at_wall_without_leaving_grid() {
        let mut snake = snake_at(9, 5, Some(Direction::Right));
        tick(&mut snake, &mut far_food());
        assert_eq!(snake.position(), Position::new(9, 5));
        assert!(!snake.is_moving());
        assert_eq!(snake.heading(), Some(Direction::Right));
    }

    #[test]
    fn turn_away_from_wall_resumes() {
        let grid = grid();
        let mut snake = snake_at(9, 5, Some(Direction::Right));
        tick(&mut snake, &mut far_food());
        assert!(snake.turn_down(&grid));
        assert!(snake.is_moving());
        tick(&mut snake, &mut far_food());
        assert_eq!(snake.position(), Position::new(9, 6));
    }

    #[test]
    fn reversal_is_rejected() {
        let grid = grid();
        let mut snake = snake_at(5, 5, Some(Direction::Right));
        assert!(!snake.turn_left(&grid));
        assert!(!snake.turn_right(&grid));
        assert_eq!(snake.heading(), Some(Direction::Right));
        assert!(snake.is_ready_to_turn());
    }

    #[test]
    fn turn_into_wall_is_rejected() {
        let grid = grid();
        let mut snake = snake_at(5, 2, Some(Direction::Right));
        assert!(!snake.turn_up(&grid));
        assert!(snake.turn_down(&grid));
    }

    #[test]
    fn one_turn_per_tick() {
        let grid = grid();
        let mut snake = snake_at(5, 5, Some(Direction::Right));
        assert!(snake.turn_up(&grid));
        assert!(!snake.turn_left(&grid));
        assert!(!snake.turn_right(&grid));
        assert_eq!(snake.heading(), Some(Direction::Up));

        tick(&mut snake, &mut far_food());
        assert!(snake.turn_left(&grid));
    }

    #[test]
    fn beneficial_food_grows_after_next_move() {
        let mut snake = snake_at(5, 5, Some(Direction::Right));
        let mut food = Food::at(Position::new(5, 5), FoodVariant::Mushroom);
        let events = tick(&mut snake, &mut food);

        assert_eq!(snake.score(), 1);
        assert_eq!(snake.length(), 3);
        assert_eq!(snake.segments().len(), 3);
        assert_ne!(food.position(), Position::new(5, 5));
        assert_eq!(
            events,
            vec![GameEvent::BeneficialEat {
                position: Position::new(5, 5)
            }]
        );

        for _ in 0..3 {
            tick(&mut snake, &mut far_food());
        }
        assert_eq!(snake.segments().len(), 3);
    }

    #[test]
    fn harmful_food_floors_at_initial_length_and_zero_score() {
        let mut snake = snake_at(5, 5, Some(Direction::Right));
        let mut food = Food::at(Position::new(5, 5), FoodVariant::Toadstool);
        let events = tick(&mut snake, &mut food);

        assert_eq!(snake.score(), 0);
        assert_eq!(snake.length(), INITIAL_LENGTH);
        assert_eq!(snake.segments().len(), INITIAL_LENGTH);
        assert_eq!(
            events,
            vec![GameEvent::HarmfulEat {
                position: Position::new(5, 5)
            }]
        );
    }

    #[test]
    fn harmful_food_shrinks_longer_snake() {
        let mut snake = snake_at(2, 5, Some(Direction::Right));
        for x in 2..4 {
            let mut food = Food::at(Position::new(x, 5), FoodVariant::Mushroom);
            tick(&mut snake, &mut food);
        }
        assert_eq!((snake.score(), snake.length()), (2, 4));
        assert_eq!(snake.segments().len(), 4);

        let mut food = Food::at(Position::new(4, 5), FoodVariant::Puffball);
        tick(&mut snake, &mut food);
        assert_eq!((snake.score(), snake.length()), (1, 3));
        assert_eq!(snake.segments().len(), 3);
    }

    #[test]
    fn harmful_food_at_wall_keeps_body() {
        let mut snake = snake_at(9, 5, Some(Direction::Right));
        tick(&mut snake, &mut far_food());
        assert!(!snake.is_moving());
        let body = cells(&snake);

        let meals = [
            FoodVariant::Mushroom,
            FoodVariant::Mushroom,
            FoodVariant::Toadstool,
            FoodVariant::Toadstool,
        ];
        for variant in meals {
            let mut food = Food::at(Position::new(9, 5), variant);
            tick(&mut snake, &mut food);
        }

        assert_eq!((snake.score(), snake.length()), (0, 2));
        assert_eq!(snake.position(), Position::new(9, 5));
        assert_eq!(cells(&snake), body);
        assert_eq!(snake.segments().front(), Some(&Position::new(9, 5)));
    }

    #[test]
    fn win_emitted_at_winning_score() {
        let grid = grid();
        let rules = Rules { winning_score: 1 };
        let mut snake = snake_at(5, 5, Some(Direction::Right));
        let mut food = Food::at(Position::new(5, 5), FoodVariant::Mushroom);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut rng = StepRng::new(0, 0);

        assert!(snake.update(&mut food, &grid, &rules, &mut rng, &mut events));
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameWon {
                winner: "tester".to_string(),
                score: 1
            })
        );
    }

    #[test]
    fn pending_key_applies_on_next_update() {
        let mut snake = snake_at(5, 5, Some(Direction::Right));
        snake.control_mut().request_turn(Direction::Down);
        tick(&mut snake, &mut far_food());
        assert_eq!(snake.heading(), Some(Direction::Down));
        assert_eq!(snake.position(), Position::new(5, 6));
        assert!(!snake.is_ready_to_turn());
    }
}
