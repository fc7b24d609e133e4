use crate::config::WorldSettings;
use crate::voxel::chunk::Chunk;
use crate::voxel::types::Voxel;
use bevy::prelude::*;
use log::info;
use std::collections::HashMap;
use thiserror::Error;

/// Bits per axis in a packed [`ChunkId`]. 21 bits each leaves one spare bit
/// and covers chunk coordinates in `-2^20 .. 2^20 - 1`, far beyond any
/// coordinate a 32-bit voxel position can reach in practice.
const AXIS_BITS: u32 = 21;
const AXIS_MASK: u64 = (1 << AXIS_BITS) - 1;
const AXIS_MIN: i32 = -(1 << (AXIS_BITS - 1));
const AXIS_MAX: i32 = (1 << (AXIS_BITS - 1)) - 1;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    #[error("chunk coordinate {chunk:?} is outside the addressable range of ±2^20 chunks per axis")]
    ChunkOutOfRange { chunk: IVec3 },
    #[error("ray segment has zero length")]
    DegenerateRay,
}

/// Key identifying a chunk by its chunk-space coordinates, packed into a
/// single integer so the chunk map never allocates for lookups.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ChunkId(u64);

impl ChunkId {
    pub fn pack(chunk: IVec3) -> Result<Self, WorldError> {
        for c in chunk.to_array() {
            if !(AXIS_MIN..=AXIS_MAX).contains(&c) {
                return Err(WorldError::ChunkOutOfRange { chunk });
            }
        }
        let x = chunk.x as u64 & AXIS_MASK;
        let y = chunk.y as u64 & AXIS_MASK;
        let z = chunk.z as u64 & AXIS_MASK;
        Ok(ChunkId(x | y << AXIS_BITS | z << (2 * AXIS_BITS)))
    }

    pub fn unpack(self) -> IVec3 {
        IVec3::new(
            Self::extend(self.0 & AXIS_MASK),
            Self::extend(self.0 >> AXIS_BITS & AXIS_MASK),
            Self::extend(self.0 >> (2 * AXIS_BITS) & AXIS_MASK),
        )
    }

    // Sign-extend a 21-bit field back to i32.
    fn extend(field: u64) -> i32 {
        ((field << (64 - AXIS_BITS)) as i64 >> (64 - AXIS_BITS)) as i32
    }
}

/// Sparse, unbounded voxel world: a map from chunk coordinates to dense
/// chunks, allocated lazily on first write. Reads outside any allocated
/// chunk are air; only writes at coordinates the packed id cannot represent
/// fail.
#[derive(Resource)]
pub struct VoxelWorld {
    chunk_size: u32,
    chunk_height: u32,
    chunks: HashMap<ChunkId, Chunk>,
}

impl VoxelWorld {
    pub fn new(settings: &WorldSettings) -> Self {
        info!(
            "voxel world created, chunk extents {}x{}x{}",
            settings.chunk_size, settings.chunk_height, settings.chunk_size
        );
        Self {
            chunk_size: settings.chunk_size,
            chunk_height: settings.chunk_height,
            chunks: HashMap::new(),
        }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn chunk_height(&self) -> u32 {
        self.chunk_height
    }

    /// Chunk extents along each world axis.
    pub fn extents(&self) -> IVec3 {
        IVec3::new(
            self.chunk_size as i32,
            self.chunk_height as i32,
            self.chunk_size as i32,
        )
    }

    /// Chunk coordinates owning a world position. Floor division, so
    /// negative coordinates land in the correct chunk.
    pub fn world_to_chunk(&self, pos: IVec3) -> IVec3 {
        pos.div_euclid(self.extents())
    }

    /// Position within the owning chunk. Euclidean modulo keeps the result
    /// non-negative for negative world coordinates.
    pub fn world_to_local(&self, pos: IVec3) -> UVec3 {
        pos.rem_euclid(self.extents()).as_uvec3()
    }

    pub fn chunk_id_for(&self, pos: IVec3) -> Result<ChunkId, WorldError> {
        ChunkId::pack(self.world_to_chunk(pos))
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    pub fn chunk_at(&self, chunk_pos: IVec3) -> Option<&Chunk> {
        ChunkId::pack(chunk_pos).ok().and_then(|id| self.chunks.get(&id))
    }

    pub fn chunk_at_mut(&mut self, chunk_pos: IVec3) -> Option<&mut Chunk> {
        ChunkId::pack(chunk_pos).ok().and_then(|id| self.chunks.get_mut(&id))
    }

    /// Existing chunk at `chunk_pos`, or a freshly allocated air-filled one.
    pub fn chunk_or_create(&mut self, chunk_pos: IVec3) -> Result<&mut Chunk, WorldError> {
        let id = ChunkId::pack(chunk_pos)?;
        let (size, height) = (self.chunk_size, self.chunk_height);
        Ok(self
            .chunks
            .entry(id)
            .or_insert_with(|| Chunk::new(chunk_pos, size, height)))
    }

    /// Voxel at a world position. Unallocated regions read as air, as do
    /// positions beyond the packed chunk-id range (nothing can ever be
    /// written there).
    pub fn get_voxel(&self, pos: IVec3) -> Voxel {
        let Ok(id) = self.chunk_id_for(pos) else {
            return Voxel::AIR;
        };
        match self.chunks.get(&id) {
            Some(chunk) => chunk.get(self.world_to_local(pos)),
            None => Voxel::AIR,
        }
    }

    /// Write a voxel, allocating the owning chunk if needed. The chunk is
    /// marked dirty when the value actually changes.
    pub fn set_voxel(&mut self, pos: IVec3, voxel: Voxel) -> Result<(), WorldError> {
        let chunk_pos = self.world_to_chunk(pos);
        let local = self.world_to_local(pos);
        self.chunk_or_create(chunk_pos)?.set(local, voxel);
        Ok(())
    }

    /// Write a voxel only if its chunk is already allocated. Returns whether
    /// the write landed, so callers can tell a dropped write from a stored
    /// one without pre-checking chunk existence.
    pub fn set_voxel_if_loaded(&mut self, pos: IVec3, voxel: Voxel) -> Result<bool, WorldError> {
        let id = self.chunk_id_for(pos)?;
        let local = self.world_to_local(pos);
        match self.chunks.get_mut(&id) {
            Some(chunk) => {
                chunk.set(local, voxel);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Positions of all chunks currently flagged for remeshing.
    pub fn dirty_chunks(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.chunks
            .values()
            .filter(|chunk| chunk.is_dirty())
            .map(|chunk| chunk.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> VoxelWorld {
        VoxelWorld::new(&WorldSettings::default())
    }

    #[test]
    fn set_then_get_round_trips_across_chunks() {
        let mut world = world();
        let positions = [
            IVec3::new(0, 0, 0),
            IVec3::new(15, 179, 15),
            IVec3::new(16, 180, 16),
            IVec3::new(-1, -1, -1),
            IVec3::new(-17, -181, -33),
            IVec3::new(1000, -2000, 3000),
        ];
        for (i, &pos) in positions.iter().enumerate() {
            let voxel = Voxel(i as u8 + 1);
            world.set_voxel(pos, voxel).unwrap();
            assert_eq!(world.get_voxel(pos), voxel, "at {pos:?}");
        }
        // earlier writes survive later allocations
        assert_eq!(world.get_voxel(IVec3::new(0, 0, 0)), Voxel(1));
    }

    #[test]
    fn unallocated_reads_are_air() {
        let world = world();
        assert_eq!(world.get_voxel(IVec3::new(5, 5, 5)), Voxel::AIR);
        assert_eq!(world.get_voxel(IVec3::new(-1000, 50, 1000)), Voxel::AIR);
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn get_does_not_allocate() {
        let world = world();
        world.get_voxel(IVec3::new(3, 3, 3));
        assert!(world.chunk_at(IVec3::ZERO).is_none());
    }

    #[test]
    fn negative_coords_map_by_floor_division() {
        let world = world();
        assert_eq!(world.world_to_chunk(IVec3::new(-1, -1, -1)), IVec3::new(-1, -1, -1));
        assert_eq!(world.world_to_local(IVec3::new(-1, -1, -1)), UVec3::new(15, 179, 15));
        assert_eq!(world.world_to_chunk(IVec3::new(-16, -180, -16)), IVec3::new(-1, -1, -1));
        assert_eq!(world.world_to_local(IVec3::new(-16, -180, -16)), UVec3::ZERO);
        assert_eq!(world.world_to_chunk(IVec3::new(-17, -181, -17)), IVec3::new(-2, -2, -2));
    }

    #[test]
    fn chunk_id_is_deterministic_and_distinct() {
        let world = world();
        let id = world.chunk_id_for(IVec3::new(3, 3, 3)).unwrap();
        assert_eq!(world.chunk_id_for(IVec3::new(3, 3, 3)).unwrap(), id);
        // every position inside one chunk maps to the same id
        assert_eq!(world.chunk_id_for(IVec3::new(15, 179, 15)).unwrap(), world.chunk_id_for(IVec3::ZERO).unwrap());
        // one chunk over along X differs
        assert_ne!(world.chunk_id_for(IVec3::new(16, 3, 3)).unwrap(), world.chunk_id_for(IVec3::new(3, 3, 3)).unwrap());
    }

    #[test]
    fn chunk_id_round_trips_negative_coords() {
        for chunk in [
            IVec3::new(0, 0, 0),
            IVec3::new(-1, -1, -1),
            IVec3::new(12345, -6789, 1),
            IVec3::new(AXIS_MIN, AXIS_MAX, AXIS_MIN),
        ] {
            assert_eq!(ChunkId::pack(chunk).unwrap().unpack(), chunk);
        }
    }

    #[test]
    fn out_of_range_coords_error_on_write_and_read_as_air() {
        let mut world = world();
        // chunk x = 2^20, one past the packable range
        let pos = IVec3::new((1 << 20) * 16, 0, 0);
        assert_eq!(world.get_voxel(pos), Voxel::AIR);
        assert_eq!(
            world.set_voxel(pos, Voxel(1)),
            Err(WorldError::ChunkOutOfRange {
                chunk: IVec3::new(1 << 20, 0, 0)
            })
        );
    }

    #[test]
    fn set_if_loaded_drops_writes_to_missing_chunks() {
        let mut world = world();
        assert_eq!(world.set_voxel_if_loaded(IVec3::new(2, 2, 2), Voxel(7)), Ok(false));
        assert_eq!(world.get_voxel(IVec3::new(2, 2, 2)), Voxel::AIR);
        assert_eq!(world.chunk_count(), 0);

        world.set_voxel(IVec3::new(0, 0, 0), Voxel(1)).unwrap();
        assert_eq!(world.set_voxel_if_loaded(IVec3::new(2, 2, 2), Voxel(7)), Ok(true));
        assert_eq!(world.get_voxel(IVec3::new(2, 2, 2)), Voxel(7));
    }

    #[test]
    fn writes_flag_chunks_dirty() {
        let mut world = world();
        world.set_voxel(IVec3::new(1, 1, 1), Voxel(1)).unwrap();
        let dirty: Vec<IVec3> = world.dirty_chunks().collect();
        assert_eq!(dirty, vec![IVec3::ZERO]);

        world.chunk_at_mut(IVec3::ZERO).unwrap().clear_dirty();
        assert_eq!(world.dirty_chunks().count(), 0);
    }
}
