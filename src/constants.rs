// Chunk dimensions (X and Z share the size, Y uses the height)
pub const DEFAULT_CHUNK_SIZE: u32 = 16;
pub const DEFAULT_CHUNK_HEIGHT: u32 = 180;

// Texture atlas: 16 tile columns by 4 face rows of 16px tiles
pub const DEFAULT_TILE_SIZE: u32 = 16;
pub const DEFAULT_ATLAS_WIDTH: u32 = 256;
pub const DEFAULT_ATLAS_HEIGHT: u32 = 64;
