use rand::{Rng, RngCore};

use crate::grid::Position;

/// A spark thrown out when a snake eats. Coordinates are in grid cells.
#[derive(Clone, Debug, Default)]
pub struct Particle {
    x: f32,
    y: f32,
    speed_x: f32,
    speed_y: f32,
    life: u8,
    harmful: bool,
    free: bool,
}

impl Particle {
    const LIFETIME: u8 = 6;

    fn idle() -> Self {
        Self {
            free: true,
            ..Self::default()
        }
    }

    fn start(&mut self, origin: Position, harmful: bool, rng: &mut dyn RngCore) {
        self.free = false;
        self.harmful = harmful;
        self.x = origin.x as f32 + 0.5;
        self.y = origin.y as f32 + 0.5;
        self.speed_x = rng.gen_range(-1.0..1.0);
        self.speed_y = rng.gen_range(-1.0..0.3);
        self.life = Self::LIFETIME;
    }

    fn update(&mut self) {
        if self.free {
            return;
        }
        self.speed_x *= 0.8;
        self.speed_y += 0.15;
        self.x += self.speed_x;
        self.y += self.speed_y;
        self.life -= 1;
        if self.life == 0 {
            self.free = true;
        }
    }

    pub fn cell(&self) -> Position {
        Position::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    pub fn is_harmful(&self) -> bool {
        self.harmful
    }

    pub fn is_fading(&self) -> bool {
        self.life <= Self::LIFETIME / 2
    }
}

/// Fixed set of particles reused between bursts. A burst takes whatever is
/// free and skips the rest.
#[derive(Debug)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new(size: usize) -> Self {
        Self {
            particles: (0..size).map(|_| Particle::idle()).collect(),
        }
    }

    pub fn acquire(&mut self) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.free)
    }

    /// Starts up to `count` particles at `origin`; returns how many started.
    pub fn burst(
        &mut self,
        origin: Position,
        count: usize,
        harmful: bool,
        rng: &mut dyn RngCore,
    ) -> usize {
        let mut started = 0;
        while started < count {
            let Some(particle) = self.acquire() else {
                break;
            };
            particle.start(origin, harmful, rng);
            started += 1;
        }
        started
    }

    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| !p.free)
    }

    pub fn clear(&mut self) {
        for particle in &mut self.particles {
            particle.free = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn exhausted_pool_skips_extra_particles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = ParticlePool::new(4);
        assert_eq!(pool.burst(Position::new(3, 3), 3, false, &mut rng), 3);
        assert_eq!(pool.burst(Position::new(5, 5), 3, true, &mut rng), 1);
        assert_eq!(pool.burst(Position::new(5, 5), 3, true, &mut rng), 0);
        assert!(pool.acquire().is_none());
        assert_eq!(pool.active().count(), 4);
    }

    #[test]
    fn particles_return_to_pool_after_lifetime() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = ParticlePool::new(2);
        pool.burst(Position::new(1, 1), 2, false, &mut rng);
        for _ in 0..Particle::LIFETIME {
            pool.update();
        }
        assert_eq!(pool.active().count(), 0);
        assert_eq!(pool.burst(Position::new(1, 1), 2, false, &mut rng), 2);
    }
}
