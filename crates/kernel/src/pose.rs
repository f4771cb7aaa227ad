use glam::{Mat4, Vec3};

/// Position, orientation and uniform scale of one entity, plus the cached
/// matrix derived from them.
///
/// Angles are stored in degrees and only converted when a matrix is built.
/// Every setter marks the pose dirty. Only the scene clears the flag, after it
/// has recomputed the cached matrix and uploaded it. Reading the cached matrix
/// never recomputes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    position: Vec3,
    pitch: f32,
    yaw: f32,
    scale: f32,
    dirty: bool,
    matrix: Mat4,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            scale: 1.0,
            dirty: true,
            matrix: Mat4::IDENTITY,
        }
    }
}

impl Pose {
    /// New pose at `position`, unrotated, unit scale. Starts dirty so the
    /// first frame uploads it.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: orientation in degrees.
    pub fn with_orientation(mut self, pitch: f32, yaw: f32) -> Self {
        self.set_orientation(pitch, yaw);
        self
    }

    /// Builder: uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.dirty = true;
    }

    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch = degrees;
        self.dirty = true;
    }

    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
        self.dirty = true;
    }

    pub fn set_orientation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the cached matrix with `build` and return it. The dirty flag is
    /// left set until the caller has uploaded the result.
    pub(crate) fn recompute(&mut self, build: fn(&Pose) -> Mat4) -> Mat4 {
        self.matrix = build(self);
        self.matrix
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Matrix as of the last upload; identity before the first one.
    pub fn cached_matrix(&self) -> Mat4 {
        self.matrix
    }
}

/// Object-to-world transform: `T(position) · Rx(pitch) · Ry(yaw) · S(scale)`.
///
/// Pitch is applied after yaw in object space; the order matters for any
/// pose with both angles nonzero.
pub fn model_matrix(pose: &Pose) -> Mat4 {
    Mat4::from_translation(pose.position)
        * Mat4::from_rotation_x(pose.pitch.to_radians())
        * Mat4::from_rotation_y(pose.yaw.to_radians())
        * Mat4::from_scale(Vec3::splat(pose.scale))
}

/// World-to-camera transform: `Rx(-pitch) · Ry(-yaw) · T(-position)`.
///
/// Rotation comes before translation, the opposite order from
/// [`model_matrix`]. Scale is ignored.
pub fn view_matrix(pose: &Pose) -> Mat4 {
    Mat4::from_rotation_x((-pose.pitch).to_radians())
        * Mat4::from_rotation_y((-pose.yaw).to_radians())
        * Mat4::from_translation(-pose.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Mat4, b: Mat4, eps: f32) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() <= eps)
    }

    #[test]
    fn new_pose_is_dirty_and_unit_scale() {
        let p = Pose::new(Vec3::new(1.0, 2.0, 3.0));
        assert!(p.is_dirty());
        assert_eq!(p.scale(), 1.0);
        assert_eq!(p.pitch(), 0.0);
        assert_eq!(p.yaw(), 0.0);
    }

    #[test]
    fn every_mutator_sets_dirty() {
        let mutators: [fn(&mut Pose); 7] = [
            |p| p.set_position(Vec3::ONE),
            |p| p.translate(Vec3::X),
            |p| p.set_pitch(10.0),
            |p| p.set_yaw(10.0),
            |p| p.set_orientation(1.0, 2.0),
            |p| p.set_scale(2.0),
            |p| p.mark_dirty(),
        ];
        for m in mutators {
            let mut p = Pose::default();
            p.mark_clean();
            m(&mut p);
            assert!(p.is_dirty());
        }
    }

    #[test]
    fn recompute_keeps_flag_until_marked_clean() {
        let mut p = Pose::new(Vec3::new(1.0, 0.0, 0.0));
        let m = p.recompute(model_matrix);
        assert!(p.is_dirty());
        assert_eq!(p.cached_matrix(), m);
        p.mark_clean();
        assert!(!p.is_dirty());
    }

    #[test]
    fn unrotated_unit_model_is_pure_translation() {
        let pos = Vec3::new(-2.0, 3.5, 7.0);
        let m = model_matrix(&Pose::new(pos));
        assert_eq!(m, Mat4::from_translation(pos));
    }

    #[test]
    fn model_applies_scale_then_rotation_then_translation() {
        let pose = Pose::new(Vec3::new(10.0, 0.0, 0.0))
            .with_orientation(0.0, 90.0)
            .with_scale(2.0);
        let p = model_matrix(&pose).transform_point3(Vec3::X);
        // Scaled to (2,0,0), yawed +90 about Y to (0,0,-2), then translated.
        assert!((p - Vec3::new(10.0, 0.0, -2.0)).length() < 1e-5, "{p:?}");
    }

    #[test]
    fn pitch_is_applied_after_yaw_in_object_space() {
        let pose = Pose::default().with_orientation(90.0, 90.0);
        let expected = Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2)
            * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let swapped = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2)
            * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let m = model_matrix(&pose);
        assert!(approx_eq(m, expected, 1e-6));
        assert!(!approx_eq(m, swapped, 1e-3));
    }

    #[test]
    fn view_undoes_model_for_translation_only() {
        let pose = Pose::new(Vec3::new(0.0, 1.5, 5.0));
        let product = view_matrix(&pose) * model_matrix(&pose);
        assert!(approx_eq(product, Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn view_undoes_model_with_single_axis_rotation() {
        for (pitch, yaw) in [(0.0, 37.0), (-60.0, 0.0), (0.0, -180.0), (89.0, 0.0)] {
            let pose = Pose::new(Vec3::new(3.0, -1.0, 2.5)).with_orientation(pitch, yaw);
            let product = view_matrix(&pose) * model_matrix(&pose);
            assert!(
                approx_eq(product, Mat4::IDENTITY, 1e-5),
                "pitch={pitch} yaw={yaw}: {product:?}"
            );
        }
    }

    #[test]
    fn view_maps_camera_position_to_origin() {
        let pose = Pose::new(Vec3::new(4.0, 2.0, -1.0)).with_orientation(25.0, 130.0);
        let p = view_matrix(&pose).transform_point3(pose.position());
        assert!(p.length() < 1e-5);
    }

    #[test]
    fn view_ignores_scale() {
        let a = Pose::new(Vec3::ONE).with_orientation(10.0, 20.0);
        let b = a.clone().with_scale(5.0);
        assert_eq!(view_matrix(&a), view_matrix(&b));
    }

    #[test]
    fn nan_propagates_without_panicking() {
        let pose = Pose::new(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(model_matrix(&pose).is_nan());
    }
}
