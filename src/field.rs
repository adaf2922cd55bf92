// The particle field: the working set of particles for one viewport, the
// tracked pointer, and the per-frame update + draw pass.

use crate::color::{Color, PARTICLE_PALETTE};
use crate::particle::Particle;
use crate::surface::Surface;
use rand::Rng;
use tracing::debug;
use vecmath::{vec2_len, vec2_sub, Vector2};

pub const MAX_PARTICLES: usize = 80;
// One particle per this many square logical units
pub const DENSITY_DIVISOR: f64 = 15_000.0;
pub const INITIAL_SPEED: f64 = 0.4;
pub const MIN_RADIUS: f64 = 1.5;
pub const MAX_RADIUS: f64 = 3.5;

pub const CONNECTION_DISTANCE: f64 = 150.0;
pub const CONNECTION_MAX_OPACITY: f64 = 0.25;
pub const CONNECTION_LINE_WIDTH: f64 = 0.5;

pub const GLOW_SCALE: f64 = 2.0;
pub const GLOW_ALPHA: f64 = 0.15;

pub fn particle_count(width: f64, height: f64) -> usize {
    if !(width > 0.0 && height > 0.0) {
        return 0;
    }
    let by_area = (width * height / DENSITY_DIVISOR).floor() as usize;
    by_area.min(MAX_PARTICLES)
}

/// Line opacity for two particles `distance` apart: 0.25 when touching,
/// fading linearly to nothing at `CONNECTION_DISTANCE`.
pub fn connection_opacity(distance: f64) -> f64 {
    if distance < CONNECTION_DISTANCE {
        (1.0 - distance / CONNECTION_DISTANCE) * CONNECTION_MAX_OPACITY
    } else {
        0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Connection {
    pub from: Vector2<f64>,
    pub to: Vector2<f64>,
    pub opacity: f64,
}

#[derive(Default)]
pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    pointer: Option<Vector2<f64>>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throws away the current set and creates a fresh one sized for the
    /// viewport. There is no carry-over between layouts.
    pub fn populate<R: Rng>(&mut self, width: f64, height: f64, rng: &mut R) {
        let count = particle_count(width, height);
        self.width = width;
        self.height = height;
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let pos = [rng.gen::<f64>() * width, rng.gen::<f64>() * height];
            let vel = [
                rng.gen_range(-INITIAL_SPEED, INITIAL_SPEED),
                rng.gen_range(-INITIAL_SPEED, INITIAL_SPEED),
            ];
            let radius = rng.gen_range(MIN_RADIUS, MAX_RADIUS);
            let color = PARTICLE_PALETTE[rng.gen_range(0, PARTICLE_PALETTE.len())];
            self.particles.push(Particle::new(pos, vel, radius, color));
        }
        debug!(width, height, count, "particle field populated");
    }

    // Bounds used for wrapping; follows the live surface size between layouts
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> Option<Vector2<f64>> {
        self.pointer
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Some([x, y]);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    /// Every pair closer than `CONNECTION_DISTANCE`, each pair once.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let particles = &self.particles;
        particles.iter().enumerate().flat_map(move |(i, a)| {
            particles[i + 1..].iter().filter_map(move |b| {
                let distance = vec2_len(vec2_sub(a.pos, b.pos));
                if distance < CONNECTION_DISTANCE {
                    Some(Connection {
                        from: a.pos,
                        to: b.pos,
                        opacity: connection_opacity(distance),
                    })
                } else {
                    None
                }
            })
        })
    }

    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        let pointer = self.pointer;
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.update(pointer, width, height, rng);
        }
    }

    /// One frame: connections from the current positions, then the update,
    /// then every particle as a glow disc under a solid disc.
    pub fn draw_frame<S, R>(&mut self, surface: &mut S, rng: &mut R)
    where
        S: Surface + ?Sized,
        R: Rng,
    {
        surface.clear(self.width, self.height);
        for connection in self.connections() {
            surface.stroke_line(
                connection.from,
                connection.to,
                Color::WHITE.with_alpha(connection.opacity),
                CONNECTION_LINE_WIDTH,
            );
        }

        self.step(rng);

        for particle in &self.particles {
            let color = particle.color();
            surface.fill_circle(
                particle.pos,
                particle.radius() * GLOW_SCALE,
                color.with_alpha(GLOW_ALPHA),
            );
            surface.fill_circle(particle.pos, particle.radius(), color);
        }
    }
}
