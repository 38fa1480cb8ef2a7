//! Scene state: planets, particles, landscape, and the per-frame
//! audio-reactive update.

pub mod geometry;
pub mod landscape;
pub mod stars;

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

pub use geometry::{ellipse_rings, LineVertex, Mesh, MeshVertex};
pub use landscape::LandscapeGrid;
pub use stars::{Ejection, Star, StarField, StarId};

use crate::params::{ColorPalette, LandscapeParams, ReactiveMapping, SceneLayout};

/// A planet body: a sphere mesh of `radius` placed and scaled uniformly.
#[derive(Debug, Clone)]
pub struct Planet {
    pub radius: f32,
    pub position: Vec3,
    /// Euler XYZ rotation (radians)
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: [f32; 3],
}

impl Planet {
    /// World transform (mesh radius folded into the scale)
    pub fn model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale * self.radius,
            Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            self.position,
        )
    }
}

/// An ambient particle; its height is overwritten every reactive frame.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec3,
    pub scale: f32,
}

/// The three reactive planet bodies
pub struct Planets {
    pub big: Planet,
    pub medium: Planet,
    pub small: Planet,
}

/// Mutable scene state owned by the render loop.
///
/// Ownership per field: the render loop writes planets and particles every
/// frame; the interaction controller writes the palette fields via
/// `cycle_palette`; everything else is fixed after construction.
pub struct SceneState {
    pub planets: Planets,
    pub particles: Vec<Particle>,
    pub landscape: LandscapeGrid,
    /// Orbital ring line geometry, parented to the big planet
    pub rings: Vec<LineVertex>,
    pub palette: ColorPalette,
    /// Current clear color (cycled with the palette)
    pub sky_color: [f32; 3],
    /// Current key light tint (cycled with the palette)
    pub spot_color: [f32; 3],
    palette_index: usize,
    particle_color: [f32; 3],
}

impl SceneState {
    pub fn new(
        layout: &SceneLayout,
        landscape_params: &LandscapeParams,
        palette: ColorPalette,
        rng: &mut impl Rng,
    ) -> Self {
        let planets = Planets {
            big: Planet {
                radius: layout.planet_big_radius,
                position: Vec3::from_array(layout.planet_big_position),
                rotation: Vec3::from_array(layout.planet_big_rotation),
                scale: Vec3::splat(layout.planet_big_scale),
                color: palette.planet,
            },
            medium: Planet {
                radius: 1.0,
                position: Vec3::from_array(layout.planet_medium_position),
                rotation: Vec3::ZERO,
                scale: Vec3::splat(layout.planet_medium_scale),
                color: palette.planet,
            },
            small: Planet {
                radius: 1.0,
                position: Vec3::from_array(layout.planet_small_position),
                rotation: Vec3::ZERO,
                scale: Vec3::splat(layout.planet_small_scale),
                color: palette.planet,
            },
        };

        let particles = (0..layout.particle_count)
            .map(|_| Particle {
                position: Vec3::new(
                    rng.gen_range(layout.particle_x_range.0..layout.particle_x_range.1),
                    0.0,
                    rng.gen_range(layout.particle_z_range.0..layout.particle_z_range.1),
                ),
                scale: layout.particle_scale,
            })
            .collect();

        let rings = ellipse_rings(layout, rng);
        let landscape = LandscapeGrid::new(landscape_params);
        let sky_color = palette.sky;
        let spot_color = palette.spot;
        let particle_color = palette.particle;

        Self {
            planets,
            particles,
            landscape,
            rings,
            palette,
            sky_color,
            spot_color,
            palette_index: 0,
            particle_color,
        }
    }

    /// Apply one frame of audio reaction. `features` must already be
    /// zero-filtered; an empty vector skips the frame entirely.
    pub fn update(&mut self, features: &[f32], mapping: &ReactiveMapping) {
        if features.is_empty() {
            return;
        }
        let len = features.len();

        // Particle heights track the spectrum directly (overwrite, not
        // accumulate)
        for (i, particle) in self.particles.iter_mut().enumerate() {
            particle.position.y =
                features[i % len] / mapping.particle_divisor + mapping.particle_offset;
        }

        // Big planet rolls while the lead band is live; the angle
        // accumulates without bound
        if features[0] >= mapping.planet_threshold {
            self.planets.big.rotation.z += mapping.rotation_step;
        }

        // Small and medium planets breathe with their bands
        if features[1 % len] >= mapping.planet_threshold {
            let scale = mapping.scale_base + features[1 % len] / mapping.scale_divisor;
            self.planets.small.scale = Vec3::splat(scale);
        }
        if features[2 % len] >= mapping.planet_threshold {
            let scale = mapping.scale_base + features[2 % len] / mapping.scale_divisor;
            self.planets.medium.scale = Vec3::splat(scale);
        }
    }

    /// Advance to the next (light, sky) pair
    pub fn cycle_palette(&mut self) {
        self.palette_index = (self.palette_index + 1) % self.palette.cycle.len();
        let (spot, sky) = self.palette.cycle[self.palette_index];
        self.spot_color = spot;
        self.sky_color = sky;
    }

    pub fn particle_color(&self) -> [f32; 3] {
        self.particle_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene() -> SceneState {
        let mut rng = StdRng::seed_from_u64(3);
        SceneState::new(
            &SceneLayout::default(),
            &LandscapeParams {
                grid_size: 8,
                ..LandscapeParams::default()
            },
            ColorPalette::default(),
            &mut rng,
        )
    }

    #[test]
    fn test_uniform_spectrum_drives_all_bodies() {
        let mut scene = scene();
        let mapping = ReactiveMapping::default();
        let roll_before = scene.planets.big.rotation.z;

        scene.update(&[150.0, 150.0, 150.0], &mapping);

        assert!((scene.planets.big.rotation.z - roll_before - 0.005).abs() < 1e-6);
        assert_eq!(scene.planets.small.scale, Vec3::splat(12.5));
        assert_eq!(scene.planets.medium.scale, Vec3::splat(12.5));
        for particle in &scene.particles {
            assert!((particle.position.y - (150.0 / 100.0 - 0.48)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rotation_accumulates_without_bound() {
        let mut scene = scene();
        let mapping = ReactiveMapping::default();
        let roll_before = scene.planets.big.rotation.z;

        for _ in 0..1000 {
            scene.update(&[10.0], &mapping);
        }
        assert!((scene.planets.big.rotation.z - roll_before - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_short_vector_wraps_indices() {
        let mut scene = scene();
        let mapping = ReactiveMapping::default();

        // Single surviving feature feeds every slot via modulo
        scene.update(&[40.0], &mapping);

        assert_eq!(scene.planets.small.scale, Vec3::splat(5.0 + 40.0 / 20.0));
        assert_eq!(scene.planets.medium.scale, Vec3::splat(5.0 + 40.0 / 20.0));
        for particle in &scene.particles {
            assert!((particle.position.y - (40.0 / 100.0 - 0.48)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_quiet_features_leave_planets_alone() {
        let mut scene = scene();
        let mapping = ReactiveMapping::default();
        let roll_before = scene.planets.big.rotation.z;
        let small_before = scene.planets.small.scale;

        // Below the reaction threshold: particles still track, planets hold
        scene.update(&[0.5, 0.5, 0.5], &mapping);
        assert_eq!(scene.planets.big.rotation.z, roll_before);
        assert_eq!(scene.planets.small.scale, small_before);
        for particle in &scene.particles {
            assert!((particle.position.y - (0.5 / 100.0 - 0.48)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_vector_skips_frame() {
        let mut scene = scene();
        let mapping = ReactiveMapping::default();
        let heights: Vec<f32> = scene.particles.iter().map(|p| p.position.y).collect();

        scene.update(&[], &mapping);

        let after: Vec<f32> = scene.particles.iter().map(|p| p.position.y).collect();
        assert_eq!(heights, after);
    }

    #[test]
    fn test_palette_cycle_wraps() {
        let mut scene = scene();

        // Cycling starts from slot 0, so the first press lands on pair 1
        scene.cycle_palette();
        assert_eq!(scene.spot_color, scene.palette.cycle[1].0);
        assert_eq!(scene.sky_color, scene.palette.cycle[1].1);

        for _ in 0..scene.palette.cycle.len() {
            scene.cycle_palette();
        }
        // Five more presses land back on the same pair
        assert_eq!(scene.spot_color, scene.palette.cycle[1].0);
    }

    #[test]
    fn test_planet_model_folds_radius_into_scale() {
        let scene = scene();
        let model = scene.planets.big.model();
        let unit_x = model.transform_vector3(Vec3::X);
        // radius 25 * scale 1.5 = 37.5 world units per mesh unit
        assert!((unit_x.length() - 37.5).abs() < 1e-3);
    }
}
