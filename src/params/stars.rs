//! Star spawn and ejection parameters.

/// Spawn rule and entrance animation for selectable stars.
#[derive(Debug, Clone)]
pub struct StarSpawnConfig {
    /// Feature level (byte scale) that triggers a spawn
    pub spawn_threshold: f32,

    /// Hard cap on concurrently selectable stars
    pub max_selectable: usize,

    /// Fixed roll around X at spawn (degrees)
    pub roll_deg: f32,

    /// Yaw around Y sampled uniformly from [0, yaw_max_deg) (degrees)
    pub yaw_max_deg: f32,

    /// Spawn range on X (world units)
    pub x_range: (f32, f32),

    /// Fixed spawn height (world units)
    pub spawn_height: f32,

    /// Spawn range on Z (world units)
    pub z_range: (f32, f32),

    /// Entrance tween: starting uniform scale
    pub grow_from: f32,

    /// Entrance tween: final uniform scale
    pub grow_to: f32,

    /// Entrance tween duration (seconds)
    pub grow_duration_s: f32,

    /// Entrance easing: elastic amplitude (>= 1)
    pub grow_amplitude: f32,

    /// Entrance easing: elastic period
    pub grow_period: f32,
}

impl Default for StarSpawnConfig {
    fn default() -> Self {
        Self {
            spawn_threshold: 100.0,
            max_selectable: 100,
            roll_deg: 90.0,
            yaw_max_deg: 45.0,
            x_range: (-4.0, 4.0),
            spawn_height: -0.43,
            z_range: (-5.0, -1.0),
            grow_from: 0.01,
            grow_to: 0.1,
            grow_duration_s: 1.0,
            grow_amplitude: 1.0,
            grow_period: 0.4,
        }
    }
}

/// Ejection timeline for clicked stars.
///
/// The three stages run back to back: fling the star to a far point, settle
/// its scale, then (for stars removed from an even index) pulse forever.
#[derive(Debug, Clone)]
pub struct EjectionConfig {
    /// Duration of each timeline stage (seconds)
    pub stage_duration_s: f32,

    /// Fling target range on X (world units)
    pub x_range: (f32, f32),

    /// Fling target range on Y (world units)
    pub y_range: (f32, f32),

    /// Fling target range on Z (world units)
    pub z_range: (f32, f32),

    /// Fling easing: back-ease-out overshoot
    pub fling_overshoot: f32,

    /// Settled uniform scale after ejection
    pub settle_scale: f32,

    /// Settle/pulse easing: elastic amplitude (>= 1)
    pub elastic_amplitude: f32,

    /// Settle/pulse easing: elastic period
    pub elastic_period: f32,

    /// Pulse scale endpoints (from, to)
    pub pulse_scale: (f32, f32),

    /// Pulse repeat delay sampled once per star (seconds)
    pub pulse_delay_range_s: (f32, f32),
}

impl Default for EjectionConfig {
    fn default() -> Self {
        Self {
            stage_duration_s: 5.0,
            x_range: (-300.0, 300.0),
            y_range: (2.0, 200.0),
            z_range: (-400.0, -200.0),
            fling_overshoot: 0.3,
            settle_scale: 0.8,
            elastic_amplitude: 1.0,
            elastic_period: 0.3,
            pulse_scale: (0.3, 1.0),
            pulse_delay_range_s: (3.0, 6.0),
        }
    }
}
