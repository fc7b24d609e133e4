//! Ray-driven world edits: turning a pick result into a voxel write plus
//! the set of chunks whose meshes the write can touch.

use crate::voxel::raycast::RayHit;
use crate::voxel::types::Voxel;
use crate::voxel::world::{VoxelWorld, WorldError};
use bevy::prelude::*;
use log::trace;

/// The edited cell plus its six neighbors; any of their chunks can gain or
/// lose boundary faces from a single voxel write.
const NEIGHBOR_OFFSETS: [IVec3; 7] = [
    IVec3::new(0, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 0, -1),
    IVec3::new(0, 0, 1),
];

/// Write `voxel` into the cell a ray hit selects and return the chunk
/// coordinates needing a remesh (deduplicated, allocated ones marked dirty).
///
/// The hit position lies exactly on a face, so float error could resolve to
/// either side of it. Nudge half a voxel along the normal: outward when
/// placing a solid voxel, inward when clearing.
pub fn place_voxel(
    world: &mut VoxelWorld,
    hit: &RayHit,
    voxel: Voxel,
) -> Result<Vec<IVec3>, WorldError> {
    let nudge = if voxel.is_solid() { 0.5 } else { -0.5 };
    let target = (hit.position + hit.normal * nudge).floor().as_ivec3();
    world.set_voxel(target, voxel)?;

    let affected = affected_chunks(world, target);
    for &chunk_pos in &affected {
        if let Some(chunk) = world.chunk_at_mut(chunk_pos) {
            chunk.mark_dirty();
        }
    }
    trace!("edit at {target:?} touches chunks {affected:?}");
    Ok(affected)
}

/// Clear the voxel the ray hit. Same contract as [`place_voxel`].
pub fn remove_voxel(world: &mut VoxelWorld, hit: &RayHit) -> Result<Vec<IVec3>, WorldError> {
    place_voxel(world, hit, Voxel::AIR)
}

/// Chunk coordinates whose meshes depend on the voxel at `pos`: the owning
/// chunk, plus neighboring chunks when `pos` lies on a boundary.
pub fn affected_chunks(world: &VoxelWorld, pos: IVec3) -> Vec<IVec3> {
    let mut chunks = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
    for offset in NEIGHBOR_OFFSETS {
        let chunk_pos = world.world_to_chunk(pos + offset);
        if !chunks.contains(&chunk_pos) {
            chunks.push(chunk_pos);
        }
    }
    chunks
}
