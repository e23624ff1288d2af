use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use anyhow::{Context, Result};
use rand::rngs::ThreadRng;
use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::control::Key;
use crate::events::{EventSink, GameEvent};
use crate::food::{Food, FoodVariant};
use crate::grid::{Direction, Grid, Position};
use crate::particles::ParticlePool;
use crate::segment::SegmentShape;
use crate::sim::Simulation;
use crate::snake::{Snake, SnakeColor};

const PARTICLE_POOL_SIZE: usize = 24;
const BURST_SIZE: usize = 6;
const STATUS_LINES: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Menu,
    Playing,
    GameOver,
}

/// Receives simulation events and turns them into sparks and bells.
struct Effects<'a> {
    particles: &'a mut ParticlePool,
    rng: &'a mut ThreadRng,
    sound: bool,
    ring: bool,
}

impl EventSink for Effects<'_> {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::BeneficialEat { position } => {
                self.particles.burst(position, BURST_SIZE, false, &mut *self.rng);
            }
            GameEvent::HarmfulEat { position } => {
                self.particles.burst(position, BURST_SIZE, true, &mut *self.rng);
            }
            GameEvent::GameWon { .. } => {}
        }
        self.ring |= self.sound;
    }
}

pub struct Game {
    config: GameConfig,
    screen: Screen,
    sim: Option<Simulation>,
    particles: ParticlePool,
    rng: ThreadRng,
    debug_grid: bool,
    notice: Option<String>,
    quit: bool,
    last_update: Instant,
    out: Stdout,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Game {
            config,
            screen: Screen::Menu,
            sim: None,
            particles: ParticlePool::new(PARTICLE_POOL_SIZE),
            rng: rand::thread_rng(),
            debug_grid: false,
            notice: None,
            quit: false,
            last_update: Instant::now(),
            out: stdout(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        restoring(
            || Ok(execute!(stdout(), EnterAlternateScreen, Hide)?),
            || self.main_loop(),
            || {
                terminal::disable_raw_mode()?;
                execute!(stdout(), Show, LeaveAlternateScreen)?;
                Ok(())
            },
        )
    }

    fn main_loop(&mut self) -> Result<()> {
        let tick = Duration::from_millis(self.config.tick_ms);
        self.draw()?;

        while !self.quit {
            if event::poll(Duration::from_millis(10))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.on_key(key)?;
                        self.draw()?;
                    }
                    Event::Resize(..) => self.draw()?,
                    _ => {}
                }
            }

            if self.screen == Screen::Playing && self.last_update.elapsed() >= tick {
                self.step()?;
                self.draw()?;
                self.last_update = Instant::now();
            }
        }
        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('+') => self.debug_grid = !self.debug_grid,
            KeyCode::Enter => match self.screen {
                Screen::Menu | Screen::GameOver => self.start()?,
                Screen::Playing => {
                    info!("game abandoned");
                    self.sim = None;
                    self.screen = Screen::Menu;
                }
            },
            code => {
                if self.screen != Screen::Playing {
                    return Ok(());
                }
                if let (Some(sim), Some(key)) = (self.sim.as_mut(), to_key(code)) {
                    sim.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn arena(&self) -> Result<Grid> {
        let (width, height) = terminal::size().context("failed to read terminal size")?;
        let columns = self
            .config
            .columns
            .unwrap_or(width / self.config.cell_width.max(1));
        let rows = self
            .config
            .rows
            .unwrap_or(height.saturating_sub(STATUS_LINES));
        Ok(Grid::new(columns, rows, self.config.top_margin)?)
    }

    fn start(&mut self) -> Result<()> {
        let grid = match self.arena() {
            Ok(grid) => grid,
            Err(err) => {
                warn!(error = %err, "cannot start game");
                self.notice = Some(err.to_string());
                return Ok(());
            }
        };
        self.sim = Some(Simulation::new(grid, &self.config)?);
        self.notice = None;
        self.particles.clear();
        self.screen = Screen::Playing;
        self.last_update = Instant::now();
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        let Some(sim) = self.sim.as_mut() else {
            return Ok(());
        };
        self.particles.update();
        let mut effects = Effects {
            particles: &mut self.particles,
            rng: &mut self.rng,
            sound: self.config.sound,
            ring: false,
        };
        sim.tick(&mut effects);
        if effects.ring {
            queue!(self.out, Print('\u{7}'))?;
        }
        if let Some(winner) = sim.winner() {
            info!(winner = %winner.name, score = winner.score, ticks = sim.ticks(), "game over");
            self.screen = Screen::GameOver;
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        match self.screen {
            Screen::Menu => self.draw_menu()?,
            Screen::Playing => self.draw_arena()?,
            Screen::GameOver => {
                self.draw_arena()?;
                self.draw_game_over()?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn draw_menu(&mut self) -> Result<()> {
        let mut lines = vec![
            "Welcome to the Battle Arena".to_string(),
            "Choose your fighter".to_string(),
            String::new(),
        ];
        for (i, player) in self.config.players.iter().enumerate() {
            lines.push(format!("P{}  {} : {}", i + 1, player.name, player.control.label()));
        }
        lines.push(String::new());
        lines.push(format!("First to {} wins", self.config.winning_score));
        if self.config.harmful_food {
            lines.push("Beware the red toadstools".to_string());
        }
        lines.push(String::new());
        lines.push("Enter: start   +: debug grid   q: quit".to_string());
        if let Some(notice) = &self.notice {
            lines.push(String::new());
            lines.push(notice.clone());
        }
        self.print_centered(&lines, Color::White)
    }

    fn draw_game_over(&mut self) -> Result<()> {
        let Some(winner) = self.sim.as_ref().and_then(|sim| sim.winner()).cloned() else {
            return Ok(());
        };
        let lines = vec![
            format!("Game Over {} wins", winner.name),
            format!("Winning Score {}", winner.score),
            String::new(),
            "Enter: play again   q: quit".to_string(),
        ];
        self.print_centered(&lines, Color::Yellow)
    }

    fn print_centered(&mut self, lines: &[String], color: Color) -> Result<()> {
        let (width, height) = terminal::size()?;
        let top = height.saturating_sub(lines.len() as u16) / 2;
        queue!(self.out, SetForegroundColor(color))?;
        for (i, line) in lines.iter().enumerate() {
            let col = width.saturating_sub(line.chars().count() as u16) / 2;
            queue!(self.out, MoveTo(col, top + i as u16), Print(line))?;
        }
        Ok(())
    }

    fn draw_arena(&mut self) -> Result<()> {
        let Some(sim) = self.sim.as_ref() else {
            return Ok(());
        };
        let grid = *sim.grid();
        let cw = self.config.cell_width.max(1);
        let mut out = &self.out;

        // Forest strip over the margin rows, scoreboard on top of it.
        let strip = "▒".repeat((grid.columns() as u16 * cw) as usize);
        queue!(out, SetForegroundColor(Color::DarkGreen))?;
        for y in 0..grid.top_margin() {
            queue!(out, MoveTo(0, y as u16), Print(&strip))?;
        }
        let mut col = 1u16;
        for snake in sim.snakes() {
            let entry = format!(" {} : {} ", snake.name(), snake.score());
            queue!(
                out,
                MoveTo(col, 0),
                SetForegroundColor(snake_color(snake.color())),
                Print(&entry)
            )?;
            col += entry.chars().count() as u16 + 2;
        }

        if self.debug_grid {
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
            for y in grid.top_margin()..grid.rows() {
                for x in 0..grid.columns() {
                    queue!(out, MoveTo(x as u16 * cw, y as u16), Print('·'))?;
                }
            }
        }

        let food = sim.food();
        queue!(
            out,
            MoveTo(food.position().x as u16 * cw, food.position().y as u16),
            SetForegroundColor(food_color(food.variant())),
            Print(food_glyph(food))
        )?;

        for snake in sim.snakes() {
            draw_snake(&mut out, snake, cw)?;
        }

        for particle in self.particles.active() {
            let cell = particle.cell();
            if !grid.contains(cell) {
                continue;
            }
            let (glyph, color) = match (particle.is_harmful(), particle.is_fading()) {
                (_, true) => ('.', Color::DarkGrey),
                (false, false) => ('*', Color::Yellow),
                (true, false) => ('x', Color::Red),
            };
            queue!(
                out,
                MoveTo(cell.x as u16 * cw, cell.y as u16),
                SetForegroundColor(color),
                Print(glyph)
            )?;
        }

        queue!(
            out,
            MoveTo(0, grid.rows() as u16),
            SetForegroundColor(Color::Grey),
            Print(format!(
                "First to {} | arrows / WASD steer | Enter: menu | +: grid | q: quit",
                sim.rules().winning_score
            ))
        )?;
        Ok(())
    }
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

fn snake_color(color: SnakeColor) -> Color {
    match color {
        SnakeColor::Orange => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        SnakeColor::Pink => Color::Rgb {
            r: 255,
            g: 105,
            b: 180,
        },
        SnakeColor::Magenta => Color::Magenta,
    }
}

fn food_color(variant: FoodVariant) -> Color {
    match variant {
        FoodVariant::Mushroom => Color::Green,
        FoodVariant::Toadstool => Color::Red,
        FoodVariant::Puffball => Color::DarkYellow,
    }
}

/// Food sprouts over its first few frames.
fn food_glyph(food: &Food) -> char {
    match food.frame() {
        0..=2 => '.',
        3..=5 => 'o',
        _ => '@',
    }
}

/// Glyph for a segment, and whether it joins the cell to its right.
fn segment_glyph(shape: SegmentShape) -> (char, bool) {
    use Direction::*;
    match shape {
        SegmentShape::Head(facing) => {
            let glyph = match facing {
                Up => '▲',
                Down => '▼',
                Left => '◀',
                Right => '▶',
            };
            (glyph, facing == Left)
        }
        SegmentShape::Tail(toward_head) => ('•', toward_head == Right),
        SegmentShape::Straight(travel) if travel.is_vertical() => ('┃', false),
        SegmentShape::Straight(_) => ('━', true),
        SegmentShape::Bend {
            toward_head,
            toward_tail,
        } => {
            let sides = [toward_head, toward_tail];
            let glyph = match (sides.contains(&Up), sides.contains(&Right)) {
                (true, true) => '┗',
                (true, false) => '┛',
                (false, true) => '┏',
                (false, false) => '┓',
            };
            (glyph, sides.contains(&Right))
        }
        SegmentShape::Single | SegmentShape::Unclassified => ('■', false),
    }
}

/// Runs `setup` then `body`, and always runs `restore` afterwards, even when
/// either of them fails. The first error wins.
fn restoring<T>(
    setup: impl FnOnce() -> Result<()>,
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = setup().and_then(|()| body());
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn draw_snake(out: &mut &Stdout, snake: &Snake, cw: u16) -> Result<()> {
    queue!(out, SetForegroundColor(snake_color(snake.color())))?;
    // Tail first so the head ends up on top of stacked cells.
    for (Position { x, y }, shape) in snake.segment_shapes().into_iter().rev() {
        let (glyph, joins_right) = segment_glyph(shape);
        let mut cell = String::with_capacity(cw as usize * 3);
        cell.push(glyph);
        let fill = if joins_right { '━' } else { ' ' };
        for _ in 1..cw {
            cell.push(fill);
        }
        queue!(out, MoveTo(x as u16 * cw, y as u16), Print(cell))?;
    }
    Ok(())
}
