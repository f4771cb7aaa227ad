use blockview_kernel::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface over a whole scene.
///
/// The renderer reads scene state and produces output. It never mutates the
/// scene; per-frame uploads go through `FrameSink` instead.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Human-readable dump of a scene, for the CLI and logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include the cached model matrix of each block.
    pub matrices: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matrices(mut self) -> Self {
        self.matrices = true;
        self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let cam = scene.camera();
        let p = cam.position();
        let v = cam.velocity();
        let _ = writeln!(out, "=== Scene (frame={}) ===", scene.frame());
        let _ = writeln!(out, "Blocks: {}", scene.blocks().len());
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1}",
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z,
            cam.yaw(),
            cam.pitch()
        );

        for block in scene.blocks() {
            let pose = block.pose();
            let pos = pose.position();
            let _ = writeln!(
                out,
                "  [{}] pos=({:.2}, {:.2}, {:.2}) pitch={:.1} yaw={:.1} scale={:.2} size={:.2}{}",
                block.id(),
                pos.x,
                pos.y,
                pos.z,
                pose.pitch(),
                pose.yaw(),
                pose.scale(),
                block.mesh().size(),
                if pose.is_dirty() { " dirty" } else { "" }
            );
            if self.matrices {
                for row in 0..4 {
                    let r = pose.cached_matrix().row(row);
                    let _ = writeln!(
                        out,
                        "      | {:8.3} {:8.3} {:8.3} {:8.3} |",
                        r.x, r.y, r.z, r.w
                    );
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingSink;
    use blockview_assets::MeshStore;
    use blockview_kernel::{Camera, SceneConfig};
    use glam::Mat4;

    #[test]
    fn empty_scene() {
        let scene = Scene::new(Camera::default(), Mat4::IDENTITY);
        let output = DebugTextRenderer::new().render(&scene);
        assert!(output.contains("frame=0"));
        assert!(output.contains("Blocks: 0"));
        assert!(output.contains("pos=(0.00, 1.50, 5.00)"));
    }

    #[test]
    fn reference_scene_lists_blocks() {
        let scene =
            Scene::from_config(&SceneConfig::default(), 1.0, &mut MeshStore::new()).unwrap();
        let output = DebugTextRenderer::new().render(&scene);
        assert!(output.contains("Blocks: 4"));
        assert!(output.contains("[block#2] pos=(2.00, 0.00, -2.00)"));
        assert_eq!(output.matches(" dirty").count(), 4);
    }

    #[test]
    fn matrices_after_init() {
        let mut scene =
            Scene::from_config(&SceneConfig::default(), 1.0, &mut MeshStore::new()).unwrap();
        scene.init(&mut RecordingSink::new()).unwrap();
        let output = DebugTextRenderer::new().with_matrices().render(&scene);
        assert!(!output.contains(" dirty"));
        // Translation column of block#1 shows up in the first row.
        assert!(output.contains("-2.000 |"), "{output}");
    }
}
