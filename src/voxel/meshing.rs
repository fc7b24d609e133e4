use crate::config::AtlasLayout;
use crate::voxel::world::VoxelWorld;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use log::debug;

/// Marker for entities carrying a chunk's generated mesh.
#[derive(Component)]
pub struct ChunkMesh {
    pub chunk_position: IVec3,
}

pub struct FaceCorner {
    /// Corner offset on the unit cube.
    pub offset: [f32; 3],
    /// UV corner within the atlas tile.
    pub uv: [f32; 2],
}

pub struct Face {
    pub dir: IVec3,
    /// Atlas row for this orientation (sides row 0, bottom 1, top 2).
    pub uv_row: u32,
    pub corners: [FaceCorner; 4],
}

const fn corner(offset: [f32; 3], uv: [f32; 2]) -> FaceCorner {
    FaceCorner { offset, uv }
}

/// The six cube faces in the fixed order left, right, bottom, top, back,
/// front. Corner order is chosen so the two triangles (0,1,2) and (2,1,3)
/// wind counter-clockwise seen from outside.
pub const FACES: [Face; 6] = [
    Face {
        // left
        dir: IVec3::new(-1, 0, 0),
        uv_row: 0,
        corners: [
            corner([0.0, 1.0, 0.0], [0.0, 1.0]),
            corner([0.0, 0.0, 0.0], [0.0, 0.0]),
            corner([0.0, 1.0, 1.0], [1.0, 1.0]),
            corner([0.0, 0.0, 1.0], [1.0, 0.0]),
        ],
    },
    Face {
        // right
        dir: IVec3::new(1, 0, 0),
        uv_row: 0,
        corners: [
            corner([1.0, 1.0, 1.0], [0.0, 1.0]),
            corner([1.0, 0.0, 1.0], [0.0, 0.0]),
            corner([1.0, 1.0, 0.0], [1.0, 1.0]),
            corner([1.0, 0.0, 0.0], [1.0, 0.0]),
        ],
    },
    Face {
        // bottom
        dir: IVec3::new(0, -1, 0),
        uv_row: 1,
        corners: [
            corner([1.0, 0.0, 1.0], [1.0, 0.0]),
            corner([0.0, 0.0, 1.0], [0.0, 0.0]),
            corner([1.0, 0.0, 0.0], [1.0, 1.0]),
            corner([0.0, 0.0, 0.0], [0.0, 1.0]),
        ],
    },
    Face {
        // top
        dir: IVec3::new(0, 1, 0),
        uv_row: 2,
        corners: [
            corner([0.0, 1.0, 1.0], [1.0, 1.0]),
            corner([1.0, 1.0, 1.0], [0.0, 1.0]),
            corner([0.0, 1.0, 0.0], [1.0, 0.0]),
            corner([1.0, 1.0, 0.0], [0.0, 0.0]),
        ],
    },
    Face {
        // back
        dir: IVec3::new(0, 0, -1),
        uv_row: 0,
        corners: [
            corner([1.0, 0.0, 0.0], [0.0, 0.0]),
            corner([0.0, 0.0, 0.0], [1.0, 0.0]),
            corner([1.0, 1.0, 0.0], [0.0, 1.0]),
            corner([0.0, 1.0, 0.0], [1.0, 1.0]),
        ],
    },
    Face {
        // front
        dir: IVec3::new(0, 0, 1),
        uv_row: 0,
        corners: [
            corner([0.0, 0.0, 1.0], [0.0, 0.0]),
            corner([1.0, 0.0, 1.0], [1.0, 0.0]),
            corner([0.0, 1.0, 1.0], [0.0, 1.0]),
            corner([1.0, 1.0, 1.0], [1.0, 1.0]),
        ],
    },
];

pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            bevy::render::render_asset::RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild the mesh buffers for the chunk at `chunk_pos` from scratch.
///
/// Every face of every solid voxel is emitted unless its neighbor is solid.
/// Neighbors are read through the world at world coordinates, so faces on a
/// chunk boundary are culled against the adjacent chunk. Vertex positions
/// are chunk-local; the consumer places the mesh at
/// `chunk_pos * (size, height, size)`.
pub fn generate_chunk_mesh(world: &VoxelWorld, chunk_pos: IVec3, atlas: &AtlasLayout) -> MeshData {
    let size = world.chunk_size() as i32;
    let height = world.chunk_height() as i32;
    let origin = chunk_pos * world.extents();

    let mut data = MeshData::new();

    for y in 0..height {
        for z in 0..size {
            for x in 0..size {
                let world_pos = origin + IVec3::new(x, y, z);
                let voxel = world.get_voxel(world_pos);
                if voxel.is_air() {
                    continue;
                }
                let tile = voxel.atlas_tile();
                for face in &FACES {
                    let neighbor = world.get_voxel(world_pos + face.dir);
                    if neighbor.is_solid() {
                        continue;
                    }
                    let base = data.positions.len() as u32;
                    let normal = face.dir.as_vec3().to_array();
                    for c in &face.corners {
                        data.positions.push([
                            x as f32 + c.offset[0],
                            y as f32 + c.offset[1],
                            z as f32 + c.offset[2],
                        ]);
                        data.normals.push(normal);
                        data.uvs.push(atlas.corner_uv(tile, face.uv_row, c.uv));
                    }
                    data.indices
                        .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
                }
            }
        }
    }

    debug!(
        "meshed chunk {:?}: {} faces, {} vertices",
        chunk_pos,
        data.face_count(),
        data.positions.len()
    );
    data
}
