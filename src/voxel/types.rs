/// Opaque voxel type code. `0` is reserved for air; every other value is
/// interpreted only by the texture-atlas mapping (`value - 1` = tile column).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
#[repr(transparent)]
pub struct Voxel(pub u8);

impl Voxel {
    pub const AIR: Voxel = Voxel(0);

    pub const fn new(code: u8) -> Self {
        Voxel(code)
    }

    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    pub const fn is_solid(self) -> bool {
        self.0 != 0
    }

    /// Atlas tile column for this voxel. Air has no tile; callers filter
    /// air before asking.
    pub fn atlas_tile(self) -> u32 {
        debug_assert!(self.is_solid());
        (self.0 - 1) as u32
    }
}
