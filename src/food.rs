use rand::{Rng, RngCore};
use tracing::debug;

use crate::grid::{Grid, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoodKind {
    Beneficial,
    Harmful,
}

/// What the food looks like. Only the derived [`FoodKind`] matters to the
/// simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoodVariant {
    Mushroom,
    Toadstool,
    Puffball,
}

impl FoodVariant {
    const ALL: [FoodVariant; 3] = [
        FoodVariant::Mushroom,
        FoodVariant::Toadstool,
        FoodVariant::Puffball,
    ];

    pub fn kind(self) -> FoodKind {
        match self {
            FoodVariant::Mushroom => FoodKind::Beneficial,
            FoodVariant::Toadstool | FoodVariant::Puffball => FoodKind::Harmful,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Food {
    position: Position,
    variant: FoodVariant,
    frame: u8,
    harmful_enabled: bool,
}

impl Food {
    pub const MAX_FRAME: u8 = 8;

    /// Places a new food item at a random cell.
    pub fn spawn(grid: &Grid, harmful_enabled: bool, rng: &mut dyn RngCore) -> Self {
        let mut food = Self::at(Position::new(0, grid.top_margin()), FoodVariant::Mushroom);
        food.harmful_enabled = harmful_enabled;
        food.reset(grid, rng);
        food
    }

    /// A food item pinned to `position`; it still relocates randomly on the
    /// next [`Food::reset`].
    pub fn at(position: Position, variant: FoodVariant) -> Self {
        Self {
            position,
            variant,
            frame: 0,
            harmful_enabled: variant.kind() == FoodKind::Harmful,
        }
    }

    pub fn with_harmful(mut self, harmful_enabled: bool) -> Self {
        self.harmful_enabled = harmful_enabled;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> FoodKind {
        self.variant.kind()
    }

    pub fn variant(&self) -> FoodVariant {
        self.variant
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn harmful_enabled(&self) -> bool {
        self.harmful_enabled
    }

    /// Moves to a uniformly random cell below the food clearance rows. Snake
    /// bodies are not avoided.
    pub fn reset(&mut self, grid: &Grid, rng: &mut dyn RngCore) {
        self.position = Position::new(
            rng.gen_range(grid.food_columns()),
            rng.gen_range(grid.food_rows()),
        );
        self.variant = if self.harmful_enabled {
            FoodVariant::ALL[rng.gen_range(0..FoodVariant::ALL.len())]
        } else {
            FoodVariant::Mushroom
        };
        self.frame = 0;
        debug!(x = self.position.x, y = self.position.y, variant = ?self.variant, "food placed");
    }

    /// Presentation-only: advances the growing animation.
    pub fn update(&mut self) {
        if self.frame < Self::MAX_FRAME {
            self.frame += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn grid() -> Grid {
        Grid::new(12, 10, 2).unwrap()
    }

    #[test]
    fn reset_stays_inside_food_region() {
        let grid = grid();
        let mut rng = StdRng::seed_from_u64(7);
        let mut food = Food::spawn(&grid, true, &mut rng);
        for _ in 0..500 {
            food.reset(&grid, &mut rng);
            let pos = food.position();
            assert!(grid.contains(pos));
            assert!(pos.y >= grid.top_margin() + Grid::FOOD_CLEARANCE);
        }
    }

    #[test]
    fn beneficial_only_without_harmful_flag() {
        let grid = grid();
        let mut rng = StdRng::seed_from_u64(11);
        let mut food = Food::spawn(&grid, false, &mut rng);
        for _ in 0..200 {
            food.reset(&grid, &mut rng);
            assert_eq!(food.kind(), FoodKind::Beneficial);
        }
    }

    #[test]
    fn harmful_flag_rolls_both_kinds() {
        let grid = grid();
        let mut rng = StdRng::seed_from_u64(3);
        let mut food = Food::spawn(&grid, true, &mut rng);
        let mut seen = (false, false);
        for _ in 0..200 {
            food.reset(&grid, &mut rng);
            match food.kind() {
                FoodKind::Beneficial => seen.0 = true,
                FoodKind::Harmful => seen.1 = true,
            }
        }
        assert_eq!(seen, (true, true));
    }

    #[test]
    fn reset_rewinds_animation() {
        let grid = grid();
        let mut rng = StepRng::new(0, 0);
        let mut food = Food::at(Position::new(5, 5), FoodVariant::Mushroom);
        for _ in 0..20 {
            food.update();
        }
        assert_eq!(food.frame(), Food::MAX_FRAME);
        food.reset(&grid, &mut rng);
        assert_eq!(food.frame(), 0);
        assert_eq!(food.position(), Position::new(0, 4));
    }
}
