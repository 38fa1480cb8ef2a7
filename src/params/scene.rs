//! Scene layout and audio-reactive mapping parameters.

use std::f32::consts::FRAC_PI_2;

/// Static placement of the planets, particle pool, and camera.
///
/// Positions are world units; the camera sits close to the origin looking
/// across the landscape toward the planets on the horizon.
#[derive(Debug, Clone)]
pub struct SceneLayout {
    /// Camera eye position
    pub camera_eye: [f32; 3],

    /// Camera look-at target
    pub camera_target: [f32; 3],

    /// Big planet center
    pub planet_big_position: [f32; 3],

    /// Big planet mesh radius (world units, before uniform scale)
    pub planet_big_radius: f32,

    /// Big planet uniform scale
    pub planet_big_scale: f32,

    /// Big planet initial rotation (Euler XYZ, radians)
    pub planet_big_rotation: [f32; 3],

    /// Medium planet center
    pub planet_medium_position: [f32; 3],

    /// Medium planet uniform scale (unit-radius mesh)
    pub planet_medium_scale: f32,

    /// Small planet center
    pub planet_small_position: [f32; 3],

    /// Small planet uniform scale (unit-radius mesh)
    pub planet_small_scale: f32,

    /// Ambient particle count
    pub particle_count: usize,

    /// Particle uniform scale (unit-radius mesh)
    pub particle_scale: f32,

    /// Particle spawn range on X (world units)
    pub particle_x_range: (f32, f32),

    /// Particle spawn range on Z (world units)
    pub particle_z_range: (f32, f32),

    /// Orbital ring count around the big planet
    pub ring_count: usize,

    /// Ring ellipse radii (X, Y) in big-planet local units
    pub ring_radii: (f32, f32),

    /// Line segments per ring
    pub ring_segments: usize,

    /// Ring color: HSL hue (degrees) and saturation, lightness randomized
    pub ring_hue_deg: f32,
    pub ring_saturation: f32,
    pub ring_lightness_range: (f32, f32),

    /// Key light position; the light aims at the origin from here
    pub key_light_position: [f32; 3],

    /// Ambient light level in [0, 1]
    pub ambient_level: f32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            camera_eye: [0.1, -0.14, 0.8],
            camera_target: [0.0, 0.0, 0.0],
            planet_big_position: [-150.0, 40.0, -180.0],
            planet_big_radius: 25.0,
            planet_big_scale: 1.5,
            planet_big_rotation: [1.5, 0.3, FRAC_PI_2],
            planet_medium_position: [40.0, 30.0, -100.0],
            planet_medium_scale: 5.5,
            planet_small_position: [20.0, 70.0, -160.0],
            planet_small_scale: 5.0,
            particle_count: 50,
            particle_scale: 0.1,
            particle_x_range: (-6.0, 6.0),
            particle_z_range: (-10.0, -4.0),
            ring_count: 30,
            ring_radii: (26.0, 35.0),
            ring_segments: 80,
            ring_hue_deg: 21.0,
            ring_saturation: 0.17,
            ring_lightness_range: (0.1, 0.6),
            key_light_position: [5.0, 8.22, -3.68],
            ambient_level: 0.35,
        }
    }
}

/// Mapping from the frequency feature vector to scene motion.
///
/// Thresholds and divisors operate on the byte-scaled feature values
/// ([0, 255]); they are tuned constants, not derived quantities.
#[derive(Debug, Clone)]
pub struct ReactiveMapping {
    /// Feature level at which planets start reacting
    pub planet_threshold: f32,

    /// Big planet roll increment per reactive frame (radians)
    pub rotation_step: f32,

    /// Base uniform scale for the breathing planets
    pub scale_base: f32,

    /// Feature divisor added on top of the base scale
    /// Formula: scale = scale_base + feature / scale_divisor
    pub scale_divisor: f32,

    /// Particle height divisor
    /// Formula: y = feature / particle_divisor + particle_offset
    pub particle_divisor: f32,

    /// Particle height offset (world units)
    pub particle_offset: f32,
}

impl Default for ReactiveMapping {
    fn default() -> Self {
        Self {
            planet_threshold: 1.0,
            rotation_step: 0.005,
            scale_base: 5.0,
            scale_divisor: 20.0,
            particle_divisor: 100.0,
            particle_offset: -0.48,
        }
    }
}

/// Procedural landscape parameters
#[derive(Debug, Clone)]
pub struct LandscapeParams {
    /// Grid resolution (quads per side)
    pub grid_size: usize,

    /// Spacing between grid vertices (world units)
    pub grid_spacing: f32,

    /// Height amplitude (world units)
    pub height: f32,

    /// Noise spatial frequency (cycles per world unit)
    pub frequency: f32,

    /// Perlin noise seed
    pub noise_seed: u32,

    /// World-space offset of the grid center
    pub offset: [f32; 3],
}

impl Default for LandscapeParams {
    fn default() -> Self {
        Self {
            grid_size: 128,
            grid_spacing: 0.25,
            height: 0.65,
            frequency: 0.18,
            noise_seed: 42,
            offset: [0.0, -0.5, -4.79],
        }
    }
}
