//! Procedural landscape heightfield.
//!
//! A static Perlin-displaced grid standing in for sculpted terrain: built
//! once at startup, never animated.

use glam::Vec3;
use noise::{NoiseFn, Perlin};

use super::geometry::MeshVertex;
use crate::params::LandscapeParams;

/// Landscape grid mesh with Perlin-displaced heights
pub struct LandscapeGrid {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl LandscapeGrid {
    /// Create the landscape grid with specified parameters
    pub fn new(params: &LandscapeParams) -> Self {
        let grid_size = params.grid_size;
        let spacing = params.grid_spacing;
        let half_size = (grid_size as f32 * spacing) / 2.0;
        let perlin = Perlin::new(params.noise_seed);
        let offset = Vec3::from_array(params.offset);

        let height_at = |x: f32, z: f32| {
            perlin.get([(x * params.frequency) as f64, (z * params.frequency) as f64]) as f32
                * params.height
        };

        let mut vertices = Vec::with_capacity((grid_size + 1) * (grid_size + 1));
        let mut indices = Vec::with_capacity(grid_size * grid_size * 6);

        for z in 0..=grid_size {
            for x in 0..=grid_size {
                let x_pos = x as f32 * spacing - half_size;
                let z_pos = z as f32 * spacing - half_size;
                let y_pos = height_at(x_pos, z_pos);

                // Central-difference normal from the height function
                let dx = height_at(x_pos + spacing, z_pos) - height_at(x_pos - spacing, z_pos);
                let dz = height_at(x_pos, z_pos + spacing) - height_at(x_pos, z_pos - spacing);
                let normal = Vec3::new(-dx, 2.0 * spacing, -dz).normalize();

                vertices.push(MeshVertex {
                    position: (offset + Vec3::new(x_pos, y_pos, z_pos)).to_array(),
                    normal: normal.to_array(),
                });
            }
        }

        // Triangle indices (counter-clockwise winding)
        for z in 0..grid_size {
            for x in 0..grid_size {
                let top_left = (z * (grid_size + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (grid_size + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_grid_creation() {
        let params = LandscapeParams::default();
        let grid = LandscapeGrid::new(&params);

        // Check vertex count: (grid_size + 1)^2
        assert_eq!(grid.vertices.len(), (params.grid_size + 1).pow(2));

        // Check triangle count: grid_size^2 * 2 triangles * 3 indices
        assert_eq!(grid.indices.len(), params.grid_size.pow(2) * 6);
    }

    #[test]
    fn test_landscape_heights_bounded_and_offset() {
        let params = LandscapeParams::default();
        let grid = LandscapeGrid::new(&params);

        for vertex in &grid.vertices {
            let y = vertex.position[1];
            assert!(y >= params.offset[1] - params.height);
            assert!(y <= params.offset[1] + params.height);

            let n = Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.y > 0.0); // Surface never overhangs
        }
    }
}
