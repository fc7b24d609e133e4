use crate::config::WorldSettings;
use crate::voxel::meshing::{generate_chunk_mesh, ChunkMesh};
use crate::voxel::world::VoxelWorld;
use bevy::prelude::*;

/// Installs the voxel world and a system that rebuilds the mesh of every
/// dirty chunk each frame. The application supplies the material via
/// [`ChunkMaterial`]; until it does, remeshing is deferred so no invisible
/// chunk entities pile up.
#[derive(Default)]
pub struct VoxelWorldPlugin {
    pub settings: WorldSettings,
}

impl VoxelWorldPlugin {
    pub fn with_settings(settings: WorldSettings) -> Self {
        Self { settings }
    }
}

/// Material applied to chunk meshes, provided by the application.
#[derive(Resource)]
pub struct ChunkMaterial {
    pub handle: Handle<StandardMaterial>,
}

impl Plugin for VoxelWorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .insert_resource(VoxelWorld::new(&self.settings))
            .add_systems(Update, mesh_dirty_chunks_system);
    }
}

fn mesh_dirty_chunks_system(
    mut commands: Commands,
    mut world: ResMut<VoxelWorld>,
    settings: Res<WorldSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Option<Res<ChunkMaterial>>,
) {
    let Some(material) = material else {
        return;
    };

    // Collect first: mesh generation borrows the world immutably, clearing
    // dirty state borrows it mutably.
    let dirty_chunks: Vec<IVec3> = world.dirty_chunks().collect();

    for chunk_pos in dirty_chunks {
        let mesh_data = generate_chunk_mesh(&world, chunk_pos, &settings.atlas);
        let origin = chunk_pos * world.extents();

        let Some(chunk) = world.chunk_at_mut(chunk_pos) else {
            continue;
        };
        chunk.clear_dirty();

        if mesh_data.is_empty() {
            if let Some(entity) = chunk.mesh_entity() {
                commands.entity(entity).despawn();
                chunk.clear_mesh_entity();
            }
            continue;
        }

        let mesh_handle = meshes.add(mesh_data.into_mesh());

        if let Some(entity) = chunk.mesh_entity() {
            // reuse the entity, swap the mesh asset
            commands.entity(entity).insert(Mesh3d(mesh_handle));
        } else {
            let entity = commands
                .spawn((
                    Mesh3d(mesh_handle),
                    MeshMaterial3d(material.handle.clone()),
                    Transform::from_xyz(origin.x as f32, origin.y as f32, origin.z as f32),
                    ChunkMesh {
                        chunk_position: chunk_pos,
                    },
                ))
                .id();
            chunk.set_mesh_entity(entity);
        }
    }
}
