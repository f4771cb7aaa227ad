use blockview_common::MoveIntent;
use glam::Vec3;
use std::collections::BTreeSet;

pub const DEFAULT_SPEED: f32 = 10.0;
pub const DEFAULT_DRAG: f32 = 10.0;

/// Drag-damped kinematic state of the camera.
///
/// Velocity persists across frames. Acceleration only lives within one
/// [`CameraMotion::step`]: it is accumulated from intents, consumed, and reset
/// to zero before returning.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraMotion {
    velocity: Vec3,
    acceleration: Vec3,
    speed: f32,
    drag: f32,
}

impl Default for CameraMotion {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED, DEFAULT_DRAG)
    }
}

impl CameraMotion {
    pub fn new(speed: f32, drag: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            speed,
            drag,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Acceleration carried between steps. Always zero outside of `step`.
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Target (terminal) horizontal speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Horizontal speed, ignoring the undamped vertical axis.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Advance one frame and return the new position.
    ///
    /// `yaw` is in degrees. A `dt` that is zero, negative or not finite leaves
    /// every field untouched and returns `position` unchanged.
    pub fn step(
        &mut self,
        position: Vec3,
        yaw: f32,
        dt: f32,
        intents: &BTreeSet<MoveIntent>,
    ) -> Vec3 {
        if !(dt.is_finite() && dt > 0.0) {
            return position;
        }

        for intent in intents {
            self.acceleration += intent_direction(*intent, yaw);
        }

        // Uses the raw intent sum and the velocity from the previous frame.
        let position = position + self.acceleration * 0.5 * dt * dt + self.velocity * dt;

        if self.acceleration.length_squared() > 0.0 {
            self.acceleration = self.acceleration.normalize() * self.drag * self.speed;
        }

        let a = self.acceleration;
        let v = self.velocity;
        self.velocity = Vec3::new(
            v.x + a.x * dt - v.x * self.drag * dt,
            // No drag vertically.
            v.y + a.y * dt,
            v.z + a.z * dt - v.z * self.drag * dt,
        );

        self.acceleration = Vec3::ZERO;
        position
    }
}

/// Unit direction one intent contributes at the given yaw (degrees).
pub fn intent_direction(intent: MoveIntent, yaw: f32) -> Vec3 {
    match intent {
        MoveIntent::Forward => -heading(yaw),
        MoveIntent::Backward => heading(yaw),
        MoveIntent::Left => -heading(yaw + 90.0),
        MoveIntent::Right => heading(yaw + 90.0),
    }
}

fn heading(yaw: f32) -> Vec3 {
    let rad = yaw.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}
