use crate::motion::CameraMotion;
use crate::pose::{Pose, view_matrix};
use blockview_common::MoveIntent;
use glam::{Mat4, Vec2, Vec3};
use std::collections::BTreeSet;

pub const DEFAULT_SENSITIVITY: f32 = 0.5;
pub const PITCH_LIMIT: f32 = 90.0;

/// First-person camera: a pose driven by drag-damped motion and mouse-look.
///
/// Only yaw steers movement; pitch tilts the view but never the direction of
/// travel.
#[derive(Debug, Clone)]
pub struct Camera {
    pose: Pose,
    motion: CameraMotion,
    sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.5, 5.0))
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            pose: Pose::new(position),
            motion: CameraMotion::default(),
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }

    /// Builder: initial orientation in degrees. Pitch is clamped.
    pub fn with_orientation(mut self, pitch: f32, yaw: f32) -> Self {
        self.pose
            .set_orientation(pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT), yaw);
        self
    }

    /// Builder: replace the kinematic parameters. Velocity restarts at zero.
    pub fn with_motion(mut self, speed: f32, drag: f32) -> Self {
        self.motion = CameraMotion::new(speed, drag);
        self
    }

    /// Builder: degrees of rotation per pointer unit.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub(crate) fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    pub fn motion(&self) -> &CameraMotion {
        &self.motion
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.motion.velocity()
    }

    pub fn pitch(&self) -> f32 {
        self.pose.pitch()
    }

    pub fn yaw(&self) -> f32 {
        self.pose.yaw()
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Horizontal look direction.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw().to_radians();
        -Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Teleport. Velocity is kept.
    pub fn set_position(&mut self, position: Vec3) {
        self.pose.set_position(position);
    }

    /// Advance motion by one frame. Marks the pose dirty only if the camera
    /// actually moved.
    pub fn integrate(&mut self, dt: f32, intents: &BTreeSet<MoveIntent>) {
        let before = self.pose.position();
        let after = self.motion.step(before, self.pose.yaw(), dt, intents);
        if after != before {
            self.pose.set_position(after);
        }
    }

    /// Apply one pointer-delta sample. Each axis only changes when its delta
    /// is nonzero; pitch is clamped to [-90, 90] afterwards.
    pub fn look(&mut self, delta: Vec2) {
        if delta.x != 0.0 {
            let yaw = self.pose.yaw() - delta.x * self.sensitivity;
            self.pose.set_yaw(yaw);
        }
        if delta.y != 0.0 {
            let pitch = self.pose.pitch() - delta.y * self.sensitivity;
            self.pose.set_pitch(pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT));
        }
    }

    /// View matrix for the current fields, computed fresh.
    pub fn view_matrix(&self) -> Mat4 {
        view_matrix(&self.pose)
    }
}
