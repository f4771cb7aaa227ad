use crate::cuboid::CuboidMesh;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Content-addressed mesh id: first 8 bytes of the SHA-256 of the vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u64);

impl std::fmt::Display for MeshId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Arena of shared, immutable meshes.
///
/// Blocks hold an `Arc` handed out here; the store keeps its own reference, so
/// geometry outlives every block built from it. Identical shapes share one
/// buffer.
#[derive(Debug, Default)]
pub struct MeshStore {
    meshes: BTreeMap<MeshId, Arc<CuboidMesh>>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared cuboid for the given shape, generated on first request.
    pub fn cuboid(&mut self, center: Vec3, size: f32) -> Arc<CuboidMesh> {
        let mesh = CuboidMesh::new(center, size);
        let id = mesh.id();
        self.meshes
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!(%id, size, "registered cuboid mesh");
                Arc::new(mesh)
            })
            .clone()
    }

    pub fn get(&self, id: MeshId) -> Option<&Arc<CuboidMesh>> {
        self.meshes.get(&id)
    }

    /// Ids in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.meshes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

pub(crate) fn content_hash(vertices: &[f32]) -> MeshId {
    let mut hasher = Sha256::new();
    for f in vertices {
        hasher.update(f.to_le_bytes());
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    MeshId(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_shapes_share_one_buffer() {
        let mut store = MeshStore::new();
        let a = store.cuboid(Vec3::ZERO, 1.0);
        let b = store.cuboid(Vec3::ZERO, 1.0);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn different_sizes_get_different_ids() {
        let mut store = MeshStore::new();
        let a = store.cuboid(Vec3::ZERO, 1.0);
        let b = store.cuboid(Vec3::ZERO, 2.0);
        assert_ne!(a.id(), b.id());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn lookup_by_id() {
        let mut store = MeshStore::new();
        let mesh = store.cuboid(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let id = mesh.id();
        let found = store.get(id);
        assert!(found.is_some_and(|m| Arc::ptr_eq(m, &mesh)));
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![id]);
    }

    #[test]
    fn mesh_outlives_its_users() {
        let mut store = MeshStore::new();
        let id = {
            let mesh = store.cuboid(Vec3::ZERO, 1.0);
            mesh.id()
        };
        assert!(store.get(id).is_some());
    }

    #[test]
    fn empty_store() {
        let store = MeshStore::new();
        assert!(store.is_empty());
        assert_eq!(store.ids().count(), 0);
    }
}
