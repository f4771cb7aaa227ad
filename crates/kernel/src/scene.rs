use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::pose::{Pose, model_matrix, view_matrix};
use crate::sink::FrameSink;
use blockview_assets::{CuboidMesh, MeshStore};
use blockview_common::{BlockId, FrameInput, UploadSlot};
use glam::{Mat4, Vec3};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("unknown block {0}")]
    UnknownBlock(BlockId),
    #[error("block ids exhausted after {0} blocks")]
    TooManyBlocks(usize),
}

/// Id for the block appended after `len` existing ones.
fn next_block_id(len: usize) -> Result<BlockId, SceneError> {
    u32::try_from(len)
        .map(BlockId)
        .map_err(|_| SceneError::TooManyBlocks(len))
}

/// A drawable entity: its own pose plus a handle to shared geometry.
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    pose: Pose,
    mesh: Arc<CuboidMesh>,
}

impl Block {
    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn mesh(&self) -> &Arc<CuboidMesh> {
        &self.mesh
    }
}

/// Blocks, the camera, and the fixed projection, advanced once per frame.
///
/// The scene owns everything it mutates. A frame is `update` followed by
/// `render`; neither reads anything back from the sink. Everything starts
/// dirty, so the first `update` uploads the projection and every transform
/// even without `init`.
#[derive(Debug, Clone)]
pub struct Scene {
    blocks: Vec<Block>,
    camera: Camera,
    projection: Mat4,
    projection_dirty: bool,
    frame: u64,
}

impl Scene {
    pub fn new(camera: Camera, projection: Mat4) -> Self {
        Self {
            blocks: Vec::new(),
            camera,
            projection,
            projection_dirty: true,
            frame: 0,
        }
    }

    /// Build a scene from a validated config. Blocks of equal size share one
    /// mesh from `meshes`.
    pub fn from_config(
        config: &SceneConfig,
        aspect: f32,
        meshes: &mut MeshStore,
    ) -> Result<Self, SceneError> {
        let cam = &config.camera;
        let camera = Camera::new(cam.position)
            .with_orientation(cam.pitch, cam.yaw)
            .with_motion(cam.speed, cam.drag)
            .with_sensitivity(cam.sensitivity);
        let mut scene = Self::new(camera, config.projection.matrix(aspect));
        for block in &config.blocks {
            let mesh = meshes.cuboid(Vec3::ZERO, block.size);
            let pose = Pose::new(block.position)
                .with_orientation(block.pitch, block.yaw)
                .with_scale(block.scale);
            scene.add_block(pose, mesh)?;
        }
        Ok(scene)
    }

    /// Append a block. Ids are assigned in insertion order, which is also draw
    /// order.
    pub fn add_block(
        &mut self,
        pose: Pose,
        mesh: Arc<CuboidMesh>,
    ) -> Result<BlockId, SceneError> {
        let id = next_block_id(self.blocks.len())?;
        tracing::debug!(%id, position = ?pose.position(), "added block");
        self.blocks.push(Block { id, pose, mesh });
        Ok(id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Mutable access to a block's pose. Any setter marks it for upload on the
    /// next `update`.
    pub fn block_pose_mut(&mut self, id: BlockId) -> Result<&mut Pose, SceneError> {
        self.blocks
            .get_mut(id.index())
            .map(|b| &mut b.pose)
            .ok_or(SceneError::UnknownBlock(id))
    }

    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &Block> + '_ {
        self.blocks.iter()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Replace the projection, e.g. after a resize. It is uploaded on the next
    /// `update`, before any block.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.projection_dirty = true;
    }

    /// Number of completed `update` calls.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Upload the projection and every transform, dirty or not.
    pub fn init<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        sink.upload(UploadSlot::Projection, self.projection)?;
        self.projection_dirty = false;
        for block in &mut self.blocks {
            let m = block.pose.recompute(model_matrix);
            sink.upload(UploadSlot::Model(block.id), m)?;
            block.pose.mark_clean();
        }
        let view = self.camera.pose_mut().recompute(view_matrix);
        sink.upload(UploadSlot::View, view)?;
        self.camera.pose_mut().mark_clean();
        tracing::debug!(blocks = self.blocks.len(), "scene initialized");
        Ok(())
    }

    /// Advance one frame: camera motion, mouse-look, then upload a replaced
    /// projection, every dirty block, and finally the camera.
    ///
    /// The first failing upload is returned as is. Poses uploaded before it are
    /// clean; the failed one and everything after it stay dirty for the next
    /// frame.
    pub fn update<S: FrameSink>(
        &mut self,
        dt: f32,
        input: &FrameInput,
        sink: &mut S,
    ) -> Result<(), S::Error> {
        let _span = tracing::debug_span!("scene_update", frame = self.frame).entered();

        self.camera.integrate(dt, &input.intents);
        self.camera.look(input.pointer_delta);

        if self.projection_dirty {
            sink.upload(UploadSlot::Projection, self.projection)?;
            self.projection_dirty = false;
        }

        let mut uploaded = 0usize;
        for block in &mut self.blocks {
            if !block.pose.is_dirty() {
                continue;
            }
            let m = block.pose.recompute(model_matrix);
            sink.upload(UploadSlot::Model(block.id), m)?;
            block.pose.mark_clean();
            uploaded += 1;
        }

        let camera_dirty = self.camera.pose().is_dirty();
        if camera_dirty {
            let view = self.camera.pose_mut().recompute(view_matrix);
            sink.upload(UploadSlot::View, view)?;
            self.camera.pose_mut().mark_clean();
        }

        self.frame += 1;
        tracing::trace!(
            dt,
            uploaded,
            camera_dirty,
            position = ?self.camera.position(),
            "frame updated"
        );
        Ok(())
    }

    /// One draw per block, in insertion order.
    pub fn render<S: FrameSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        let _span = tracing::debug_span!("scene_render", frame = self.frame).entered();
        for block in &self.blocks {
            sink.draw(block.id, &block.mesh)?;
        }
        Ok(())
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            blocks: self.blocks.len(),
            dirty_blocks: self.blocks.iter().filter(|b| b.pose.is_dirty()).count(),
            camera_position: self.camera.position(),
            camera_velocity: self.camera.velocity(),
            yaw: self.camera.yaw(),
            pitch: self.camera.pitch(),
            frame: self.frame,
        }
    }
}

/// Snapshot of scene state for logs and the CLI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSummary {
    pub blocks: usize,
    pub dirty_blocks: usize,
    pub camera_position: Vec3,
    pub camera_velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub frame: u64,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.camera_position;
        let v = self.camera_velocity;
        write!(
            f,
            "frame {}: {} blocks ({} dirty), camera at ({:.3}, {:.3}, {:.3}) \
             vel ({:.3}, {:.3}, {:.3}) yaw {:.1} pitch {:.1}",
            self.frame,
            self.blocks,
            self.dirty_blocks,
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z,
            self.yaw,
            self.pitch
        )
    }
}
