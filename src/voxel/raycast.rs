use crate::voxel::types::Voxel;
use crate::voxel::world::{VoxelWorld, WorldError};
use bevy::prelude::*;

/// Result of a ray hitting the voxel field: the exact point on the entered
/// face, the face normal, and the voxel value at the hit cell. The normal is
/// all-zero when the ray starts inside solid geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub position: Vec3,
    pub normal: Vec3,
    pub voxel: Voxel,
}

// Per-axis traversal state: step sign, the t advance for crossing one full
// voxel, and the t of the next boundary ahead.
struct AxisState {
    step: i32,
    t_delta: f32,
    t_max: f32,
}

impl AxisState {
    fn new(start: f32, dir: f32, cell: i32) -> Self {
        let step = if dir > 0.0 { 1 } else { -1 };
        let t_delta = (1.0 / dir).abs();
        let boundary_dist = if step > 0 {
            cell as f32 + 1.0 - start
        } else {
            start - cell as f32
        };
        // guard the 0 * inf case for axis-parallel rays
        let t_max = if t_delta.is_finite() {
            t_delta * boundary_dist
        } else {
            f32::INFINITY
        };
        Self { step, t_delta, t_max }
    }
}

/// Walk the voxel grid from `start` toward `end` (3D-DDA), returning the
/// first solid voxel hit, or `None` when the segment is exhausted.
///
/// The traversal is clipped to the segment; `start == end` is rejected as a
/// degenerate input.
pub fn cast_ray(world: &VoxelWorld, start: Vec3, end: Vec3) -> Result<Option<RayHit>, WorldError> {
    let delta = end - start;
    let len = delta.length();
    if len == 0.0 {
        return Err(WorldError::DegenerateRay);
    }
    let dir = delta / len;

    let mut cell = start.floor().as_ivec3();
    let mut x = AxisState::new(start.x, dir.x, cell.x);
    let mut y = AxisState::new(start.y, dir.y, cell.y);
    let mut z = AxisState::new(start.z, dir.z, cell.z);

    let mut t = 0.0;
    let mut stepped_axis: Option<usize> = None;

    while t <= len {
        let voxel = world.get_voxel(cell);
        if voxel.is_solid() {
            let normal = match stepped_axis {
                Some(0) => Vec3::new(-x.step as f32, 0.0, 0.0),
                Some(1) => Vec3::new(0.0, -y.step as f32, 0.0),
                Some(2) => Vec3::new(0.0, 0.0, -z.step as f32),
                // no step yet: the ray began inside solid geometry
                _ => Vec3::ZERO,
            };
            return Ok(Some(RayHit {
                position: start + dir * t,
                normal,
                voxel,
            }));
        }

        // advance to the nearest boundary; on ties Z wins against either
        // other axis (fixed, arbitrary order)
        if x.t_max < y.t_max {
            if x.t_max < z.t_max {
                cell.x += x.step;
                t = x.t_max;
                x.t_max += x.t_delta;
                stepped_axis = Some(0);
            } else {
                cell.z += z.step;
                t = z.t_max;
                z.t_max += z.t_delta;
                stepped_axis = Some(2);
            }
        } else if y.t_max < z.t_max {
            cell.y += y.step;
            t = y.t_max;
            y.t_max += y.t_delta;
            stepped_axis = Some(1);
        } else {
            cell.z += z.step;
            t = z.t_max;
            z.t_max += z.t_delta;
            stepped_axis = Some(2);
        }
    }

    Ok(None)
}
