use blockview_assets::CuboidMesh;
use blockview_common::{BlockId, UploadSlot};
use blockview_kernel::FrameSink;
use glam::Mat4;

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkEvent {
    Upload { slot: UploadSlot, matrix: Mat4 },
    Draw { block: BlockId, vertex_count: usize },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordingError {
    #[error("injected upload failure for {0:?}")]
    Injected(UploadSlot),
}

/// Sink that records every call in order.
///
/// A failure can be injected for one slot; every upload to it is refused
/// until [`RecordingSink::heal`] is called.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
    fail_on: Option<UploadSlot>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: refuse uploads to `slot`.
    pub fn failing_on(mut self, slot: UploadSlot) -> Self {
        self.fail_on = Some(slot);
        self
    }

    /// Stop refusing uploads.
    pub fn heal(&mut self) {
        self.fail_on = None;
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn uploads(&self) -> impl Iterator<Item = (UploadSlot, Mat4)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            SinkEvent::Upload { slot, matrix } => Some((slot, matrix)),
            SinkEvent::Draw { .. } => None,
        })
    }

    pub fn draws(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.events.iter().filter_map(|e| match *e {
            SinkEvent::Draw { block, .. } => Some(block),
            SinkEvent::Upload { .. } => None,
        })
    }

    /// Most recent matrix uploaded to `slot`.
    pub fn latest(&self, slot: UploadSlot) -> Option<Mat4> {
        self.uploads()
            .filter(|(s, _)| *s == slot)
            .map(|(_, m)| m)
            .last()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FrameSink for RecordingSink {
    type Error = RecordingError;

    fn upload(&mut self, slot: UploadSlot, matrix: Mat4) -> Result<(), RecordingError> {
        if self.fail_on == Some(slot) {
            tracing::debug!(?slot, "refusing upload");
            return Err(RecordingError::Injected(slot));
        }
        self.events.push(SinkEvent::Upload { slot, matrix });
        Ok(())
    }

    fn draw(&mut self, block: BlockId, mesh: &CuboidMesh) -> Result<(), RecordingError> {
        self.events.push(SinkEvent::Draw {
            block,
            vertex_count: mesh.vertex_count(),
        });
        Ok(())
    }
}
