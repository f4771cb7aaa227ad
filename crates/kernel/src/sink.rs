use blockview_assets::CuboidMesh;
use blockview_common::{BlockId, UploadSlot};
use glam::Mat4;

/// The boundary between the scene and whatever draws it.
///
/// The scene only writes through this trait and never reads anything back.
/// Errors are returned to the caller of the scene unchanged; the scene does not
/// retry.
pub trait FrameSink {
    type Error;

    /// Store `matrix` (column-major) in `slot`.
    fn upload(&mut self, slot: UploadSlot, matrix: Mat4) -> Result<(), Self::Error>;

    /// Issue one draw of `mesh` using the model matrix last uploaded for `block`.
    fn draw(&mut self, block: BlockId, mesh: &CuboidMesh) -> Result<(), Self::Error>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    type Error = S::Error;

    fn upload(&mut self, slot: UploadSlot, matrix: Mat4) -> Result<(), Self::Error> {
        (**self).upload(slot, matrix)
    }

    fn draw(&mut self, block: BlockId, mesh: &CuboidMesh) -> Result<(), Self::Error> {
        (**self).draw(block, mesh)
    }
}
