use crate::voxel::types::Voxel;
use bevy::prelude::*;
use ndshape::{RuntimeShape, Shape};

/// Dense storage for one chunk of the world: `chunk_height * chunk_size *
/// chunk_size` voxel slots, air-initialized, owned exclusively by the world.
pub struct Chunk {
    position: IVec3, // Chunk coords (not world)
    shape: RuntimeShape<u32, 3>,
    voxels: Box<[Voxel]>,
    dirty: bool,
    mesh_entity: Option<Entity>,
}

impl Chunk {
    pub fn new(position: IVec3, size: u32, height: u32) -> Self {
        // Axis order (x, z, y) makes the linear layout y-major, then z,
        // then x: index = y * size^2 + z * size + x.
        let shape = RuntimeShape::<u32, 3>::new([size, size, height]);
        let voxels = vec![Voxel::AIR; shape.size() as usize].into_boxed_slice();
        Self {
            position,
            shape,
            voxels,
            dirty: true,
            mesh_entity: None,
        }
    }

    pub fn get(&self, local: UVec3) -> Voxel {
        self.voxels[self.index(local)]
    }

    pub fn set(&mut self, local: UVec3, voxel: Voxel) {
        let index = self.index(local);
        if self.voxels[index] != voxel {
            self.voxels[index] = voxel;
            self.dirty = true;
        }
    }

    pub fn volume(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn set_mesh_entity(&mut self, entity: Entity) {
        self.mesh_entity = Some(entity);
    }

    pub fn clear_mesh_entity(&mut self) {
        self.mesh_entity = None;
    }

    pub fn mesh_entity(&self) -> Option<Entity> {
        self.mesh_entity
    }

    pub fn position(&self) -> IVec3 {
        self.position
    }

    fn index(&self, local: UVec3) -> usize {
        self.shape.linearize([local.x, local.z, local.y]) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_all_air() {
        let chunk = Chunk::new(IVec3::ZERO, 16, 180);
        assert_eq!(chunk.volume(), 16 * 16 * 180);
        assert_eq!(chunk.get(UVec3::new(0, 0, 0)), Voxel::AIR);
        assert_eq!(chunk.get(UVec3::new(15, 179, 15)), Voxel::AIR);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut chunk = Chunk::new(IVec3::ZERO, 16, 180);
        chunk.set(UVec3::new(3, 100, 7), Voxel(5));
        assert_eq!(chunk.get(UVec3::new(3, 100, 7)), Voxel(5));
        assert_eq!(chunk.get(UVec3::new(7, 100, 3)), Voxel::AIR);
    }

    #[test]
    fn linear_index_is_y_major() {
        let chunk = Chunk::new(IVec3::ZERO, 16, 180);
        assert_eq!(chunk.index(UVec3::new(0, 0, 0)), 0);
        assert_eq!(chunk.index(UVec3::new(1, 0, 0)), 1);
        assert_eq!(chunk.index(UVec3::new(0, 0, 1)), 16);
        assert_eq!(chunk.index(UVec3::new(0, 1, 0)), 256);
        assert_eq!(chunk.index(UVec3::new(2, 3, 5)), 3 * 256 + 5 * 16 + 2);
    }

    #[test]
    fn dirty_tracks_changes_only() {
        let mut chunk = Chunk::new(IVec3::ZERO, 16, 180);
        chunk.clear_dirty();
        chunk.set(UVec3::new(0, 0, 0), Voxel::AIR); // no-op write
        assert!(!chunk.is_dirty());
        chunk.set(UVec3::new(0, 0, 0), Voxel(1));
        assert!(chunk.is_dirty());
    }
}
