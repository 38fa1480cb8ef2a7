//! Procedural mesh generation for the scene's primitives.

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::params::{hsl_to_rgb, SceneLayout};

/// Vertex data for lit meshes (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Vertex data for unlit line geometry (position + color)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Indexed triangle mesh
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Generate a UV sphere of the given radius.
///
/// Produces `(stacks + 1) * (slices + 1)` vertices with smooth normals;
/// the seam column is duplicated so the index grid stays rectangular.
pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> Mesh {
    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);

    for stack in 0..=stacks {
        let theta = PI * stack as f32 / stacks as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for slice in 0..=slices {
            let phi = TAU * slice as f32 / slices as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            vertices.push(MeshVertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
            });
        }
    }

    for stack in 0..stacks {
        for slice in 0..slices {
            let row = slices + 1;
            let top_left = stack * row + slice;
            let top_right = top_left + 1;
            let bottom_left = (stack + 1) * row + slice;
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

    Mesh { vertices, indices }
}

/// Regular tetrahedron with circumradius 1 and flat-shaded faces.
pub fn tetrahedron() -> Mesh {
    let inv_sqrt3 = 1.0 / 3.0_f32.sqrt();
    let corners = [
        [inv_sqrt3, inv_sqrt3, inv_sqrt3],
        [-inv_sqrt3, -inv_sqrt3, inv_sqrt3],
        [-inv_sqrt3, inv_sqrt3, -inv_sqrt3],
        [inv_sqrt3, -inv_sqrt3, -inv_sqrt3],
    ];
    let faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];

    let mut vertices = Vec::with_capacity(12);
    let mut indices = Vec::with_capacity(12);

    for face in faces {
        let [a, b, c] = face.map(|i: usize| glam::Vec3::from_array(corners[i]));
        let normal = (b - a).cross(c - a).normalize();

        for corner in [a, b, c] {
            indices.push(vertices.len() as u32);
            vertices.push(MeshVertex {
                position: corner.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    Mesh { vertices, indices }
}

/// Concentric ellipse rings parented to the big planet, as a line list.
///
/// Each ring is an 80-segment ellipse in the local XY plane, stretched a
/// little more per index and tinted a random dusty lightness.
pub fn ellipse_rings(layout: &SceneLayout, rng: &mut impl Rng) -> Vec<LineVertex> {
    let (radius_x, radius_y) = layout.ring_radii;
    let (lightness_lo, lightness_hi) = layout.ring_lightness_range;
    let mut vertices = Vec::with_capacity(layout.ring_count * layout.ring_segments * 2);

    for ring in 0..layout.ring_count {
        let i = ring as f32;
        let scale = [1.0 + i / 100.0, 0.9 + i / 30.0, 1.0 + i / 100.0];
        let color = hsl_to_rgb(
            layout.ring_hue_deg,
            layout.ring_saturation,
            rng.gen_range(lightness_lo..lightness_hi),
        );

        let point = |segment: usize| {
            let angle = TAU * segment as f32 / layout.ring_segments as f32;
            [
                radius_x * angle.cos() * scale[0],
                radius_y * angle.sin() * scale[1],
                0.0,
            ]
        };

        for segment in 0..layout.ring_segments {
            vertices.push(LineVertex {
                position: point(segment),
                color,
            });
            vertices.push(LineVertex {
                position: point(segment + 1),
                color,
            });
        }
    }

    vertices
}

/// Local transforms of a star's two tetrahedron children: the second is
/// turned a quarter around local X so the silhouettes interlock.
pub fn star_child_rotations() -> [glam::Mat4; 2] {
    [
        glam::Mat4::IDENTITY,
        glam::Mat4::from_rotation_x(FRAC_PI_2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_sphere_counts_and_normals() {
        let mesh = uv_sphere(1.0, 16, 24);
        assert_eq!(mesh.vertices.len(), 17 * 25);
        assert_eq!(mesh.indices.len(), 16 * 24 * 6);

        for vertex in &mesh.vertices {
            let n = glam::Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = uv_sphere(25.0, 8, 8);
        for vertex in &mesh.vertices {
            let p = glam::Vec3::from_array(vertex.position);
            assert!((p.length() - 25.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_tetrahedron_unit_circumradius() {
        let mesh = tetrahedron();
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.indices.len(), 12);

        for vertex in &mesh.vertices {
            let p = glam::Vec3::from_array(vertex.position);
            assert!((p.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tetrahedron_normals_face_outward() {
        let mesh = tetrahedron();
        for triangle in mesh.vertices.chunks_exact(3) {
            let centroid = triangle
                .iter()
                .map(|v| glam::Vec3::from_array(v.position))
                .sum::<glam::Vec3>()
                / 3.0;
            let normal = glam::Vec3::from_array(triangle[0].normal);
            assert!(centroid.dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_ring_vertex_count() {
        let layout = SceneLayout::default();
        let mut rng = StepRng::new(0, 1);
        let rings = ellipse_rings(&layout, &mut rng);
        assert_eq!(
            rings.len(),
            layout.ring_count * layout.ring_segments * 2
        );
    }
}
