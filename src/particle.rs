// Simple particle struct to keep track of individual position, velocity, size and color.
// Positions are in logical (CSS pixel) canvas units.

use crate::color::Color;
use rand::Rng;
use vecmath::{vec2_add, vec2_len, vec2_scale, vec2_sub, Vector2};

pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    radius: f64,
    color: Color,
}

impl Particle {
    pub const MAX_SPEED: f64 = 1.0;
    pub const FRICTION: f64 = 0.998;
    // Drift is drawn from [-DRIFT / 2, DRIFT / 2] per axis
    pub const DRIFT: f64 = 0.03;
    pub const REPULSION_RADIUS: f64 = 200.0;
    pub const REPULSION_STRENGTH: f64 = 0.15;

    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, color: Color) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            color,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn speed(&self) -> f64 {
        vec2_len(self.vel)
    }

    /// Push away from the pointer, strongest right next to it and fading to
    /// nothing at `REPULSION_RADIUS`. No pointer, no push.
    pub fn repulsion(&self, pointer: Option<Vector2<f64>>) -> Vector2<f64> {
        let pointer = match pointer {
            Some(pointer) => pointer,
            None => return [0.0, 0.0],
        };
        let away = vec2_sub(self.pos, pointer);
        let distance = vec2_len(away);
        if distance > 0.0 && distance < Self::REPULSION_RADIUS {
            let force = (Self::REPULSION_RADIUS - distance) / Self::REPULSION_RADIUS
                * Self::REPULSION_STRENGTH;
            vec2_scale(away, force / distance)
        } else {
            [0.0, 0.0]
        }
    }

    /// One simulation tick: repulsion, friction and drift, speed cap, move, wrap.
    pub fn update<R: Rng>(
        &mut self,
        pointer: Option<Vector2<f64>>,
        width: f64,
        height: f64,
        rng: &mut R,
    ) {
        self.vel = vec2_add(self.vel, self.repulsion(pointer));

        let drift = Self::DRIFT / 2.0;
        self.vel[0] = self.vel[0] * Self::FRICTION + rng.gen_range(-drift, drift);
        self.vel[1] = self.vel[1] * Self::FRICTION + rng.gen_range(-drift, drift);

        self.clamp_speed();

        self.pos = vec2_add(self.pos, self.vel);
        self.pos[0] = wrap(self.pos[0], width);
        self.pos[1] = wrap(self.pos[1], height);
    }

    fn clamp_speed(&mut self) {
        let speed = self.speed();
        if speed > Self::MAX_SPEED {
            self.vel = vec2_scale(self.vel, Self::MAX_SPEED / speed);
            // Rescaling can land an ulp above the cap
            while self.speed() > Self::MAX_SPEED {
                self.vel = vec2_scale(self.vel, 1.0 - 2.0 * f64::EPSILON);
            }
        }
    }
}

// Leaving one edge re-enters from the opposite one; result is in [0, extent)
fn wrap(value: f64, extent: f64) -> f64 {
    if !(extent > 0.0) {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    if wrapped < extent {
        wrapped
    } else {
        0.0
    }
}
