/// Eased back-and-forth sweep of a single rotation axis
///
/// The controller is a pure function of the current angle and sweep
/// direction. Per-frame state lives in [`Sweep`], which the frame driver owns
/// and advances once per frame.
use log::debug;

use crate::angle::rad_to_deg;
use crate::error::ConfigError;

/// Current sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Positive,
    Negative,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// Sweep amplitude and per-frame speed bounds
///
/// `max_angle` is in degrees. Speeds are per-frame increments in whatever
/// unit the caller rotates in (radians for [`Sweep`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillationConfig {
    max_angle: f32,
    min_speed: f32,
    max_speed: f32,
}

impl OscillationConfig {
    pub const DEFAULT_MAX_ANGLE: f32 = 20.0;
    pub const DEFAULT_MIN_SPEED: f32 = 0.001;
    pub const DEFAULT_MAX_SPEED: f32 = 0.01;

    /// Validate and build a configuration
    pub fn new(max_angle: f32, min_speed: f32, max_speed: f32) -> Result<Self, ConfigError> {
        if !(max_angle.is_finite() && min_speed.is_finite() && max_speed.is_finite()) {
            return Err(ConfigError::NotFinite);
        }
        if max_angle <= 0.0 {
            return Err(ConfigError::NonPositiveMaxAngle(max_angle));
        }
        if min_speed <= 0.0 {
            return Err(ConfigError::NonPositiveMinSpeed(min_speed));
        }
        if min_speed >= max_speed {
            return Err(ConfigError::SpeedRange {
                min: min_speed,
                max: max_speed,
            });
        }

        Ok(Self {
            max_angle,
            min_speed,
            max_speed,
        })
    }

    pub fn max_angle(&self) -> f32 {
        self.max_angle
    }

    pub fn min_speed(&self) -> f32 {
        self.min_speed
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }
}

impl Default for OscillationConfig {
    fn default() -> Self {
        Self {
            max_angle: Self::DEFAULT_MAX_ANGLE,
            min_speed: Self::DEFAULT_MIN_SPEED,
            max_speed: Self::DEFAULT_MAX_SPEED,
        }
    }
}

/// Quadratic ease-in-out over `t` in [0, 1]
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        0.5 * (2.0 * t).powi(2)
    } else {
        1.0 - 0.5 * (-2.0 * t + 2.0).powi(2)
    }
}

/// Speed coefficient for an angle: 0 at the limits, 1 at the centre
pub fn ease_coefficient(angle_degrees: f32, max_angle: f32) -> f32 {
    let t = ((angle_degrees.abs() - max_angle) / max_angle).abs();
    ease_in_out_quad(t)
}

/// Computes each frame's direction and signed angular step
#[derive(Debug, Clone, Copy, Default)]
pub struct OscillationController {
    config: OscillationConfig,
}

impl OscillationController {
    pub fn new(config: OscillationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OscillationConfig {
        &self.config
    }

    /// Direction to use this frame, flipped once the angle reaches a limit
    pub fn next_direction(&self, angle_degrees: f32, direction: Direction) -> Direction {
        match direction {
            Direction::Positive if angle_degrees >= self.config.max_angle => Direction::Negative,
            Direction::Negative if angle_degrees <= -self.config.max_angle => Direction::Positive,
            _ => direction,
        }
    }

    /// Unsigned step size, never below `min_speed`
    pub fn speed(&self, angle_degrees: f32) -> f32 {
        let coeff = ease_coefficient(angle_degrees, self.config.max_angle);
        self.config.min_speed.max(self.config.max_speed * coeff)
    }

    /// Returns `(direction, delta)` for the frame starting at `angle_degrees`
    pub fn step(&self, angle_degrees: f32, direction: Direction) -> (Direction, f32) {
        let direction = self.next_direction(angle_degrees, direction);
        (direction, direction.sign() * self.speed(angle_degrees))
    }
}

/// Angle and direction carried from one frame to the next
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sweep {
    /// Current rotation in radians
    pub angle: f32,
    pub direction: Direction,
}

impl Sweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(angle: f32, direction: Direction) -> Self {
        Self { angle, direction }
    }

    pub fn angle_degrees(&self) -> f32 {
        rad_to_deg(self.angle)
    }

    /// Apply one frame of the sweep and return the new angle in radians
    pub fn advance(&mut self, controller: &OscillationController) -> f32 {
        let (direction, delta) = controller.step(self.angle_degrees(), self.direction);
        if direction != self.direction {
            debug!(
                "sweep reversed to {:?} at {:.3} degrees",
                direction,
                self.angle_degrees()
            );
        }
        self.direction = direction;
        self.angle += delta;
        self.angle
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
