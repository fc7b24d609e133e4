pub mod loader;

use crate::constants::{
    DEFAULT_ATLAS_HEIGHT, DEFAULT_ATLAS_WIDTH, DEFAULT_CHUNK_HEIGHT, DEFAULT_CHUNK_SIZE,
    DEFAULT_TILE_SIZE,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Geometry of the shared texture atlas: square tiles laid out in columns
/// (one per voxel type) and rows (one per face orientation).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct AtlasLayout {
    pub tile_size: u32,
    pub texture_width: u32,
    pub texture_height: u32,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            texture_width: DEFAULT_ATLAS_WIDTH,
            texture_height: DEFAULT_ATLAS_HEIGHT,
        }
    }
}

impl AtlasLayout {
    /// UV for one face corner. The atlas image has a top-left origin while
    /// UVs are bottom-left, hence the vertical flip.
    pub fn corner_uv(&self, tile: u32, row: u32, corner: [f32; 2]) -> [f32; 2] {
        let tile_size = self.tile_size as f32;
        let u = (tile as f32 + corner[0]) * tile_size / self.texture_width as f32;
        let v = 1.0 - (row as f32 + 1.0 - corner[1]) * tile_size / self.texture_height as f32;
        [u, v]
    }
}

/// World construction parameters, loadable from YAML (see [`loader`]).
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub chunk_size: u32,
    pub chunk_height: u32,
    pub atlas: AtlasLayout,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_height: DEFAULT_CHUNK_HEIGHT,
            atlas: AtlasLayout::default(),
        }
    }
}

impl WorldSettings {
    pub fn validate(&self) -> Result<(), loader::ConfigError> {
        if self.chunk_size == 0 || self.chunk_height == 0 {
            return Err(loader::ConfigError::Invalid(
                "chunk extents must be non-zero".into(),
            ));
        }
        if self.atlas.tile_size == 0 {
            return Err(loader::ConfigError::Invalid("atlas tile size must be non-zero".into()));
        }
        if self.atlas.texture_width % self.atlas.tile_size != 0
            || self.atlas.texture_height % self.atlas.tile_size != 0
        {
            return Err(loader::ConfigError::Invalid(
                "atlas texture extents must be a whole number of tiles".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(WorldSettings::default().validate().is_ok());
    }

    #[test]
    fn zero_extents_are_rejected() {
        let mut settings = WorldSettings::default();
        settings.chunk_size = 0;
        assert!(settings.validate().is_err());

        let mut settings = WorldSettings::default();
        settings.atlas.tile_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn ragged_atlas_is_rejected() {
        let mut settings = WorldSettings::default();
        settings.atlas.texture_width = 250;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn corner_uv_maps_tiles_with_flipped_rows() {
        let atlas = AtlasLayout::default();
        // tile 0, side row, bottom-left corner: one row down from the top
        assert_eq!(atlas.corner_uv(0, 0, [0.0, 0.0]), [0.0, 0.75]);
        // top-right corner of the same tile reaches the image top
        assert_eq!(atlas.corner_uv(0, 0, [1.0, 1.0]), [0.0625, 1.0]);
        // tile column shifts u by tile_size / texture_width
        assert_eq!(atlas.corner_uv(5, 0, [0.0, 0.0])[0], 0.3125);
        // lower rows move v toward 0
        assert_eq!(atlas.corner_uv(0, 2, [0.0, 0.0]), [0.0, 0.25]);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let settings: WorldSettings = serde_yaml::from_str("chunk_size: 32\n").unwrap();
        assert_eq!(settings.chunk_size, 32);
        assert_eq!(settings.chunk_height, DEFAULT_CHUNK_HEIGHT);
        assert_eq!(settings.atlas.tile_size, DEFAULT_TILE_SIZE);
    }
}
