//! Geometry for the viewer: cuboid vertex buffers and the store that shares them.
//!
//! # Invariants
//! - Generated buffers are immutable once built.
//! - Face order and corner-to-triangle mapping are fixed; front faces wind
//!   counter-clockwise seen from outside.
//! - The store hands out `Arc`s, so shared geometry outlives every block.

pub mod cuboid;
pub mod store;

pub use cuboid::{
    CUBOID_FLOAT_COUNT, CUBOID_VERTEX_COUNT, CuboidMesh, FLOATS_PER_VERTEX, Face, corner_points,
    cuboid_vertices,
};
pub use store::{MeshId, MeshStore};
